//! Per-user moral profile aggregation.
//!
//! Profiles are computed from one split at a time; the caller never mixes
//! train and test rows into the same call.

use anyhow::{Result, bail};
use std::collections::HashMap;
use tracing::info;

use crate::features::types::{FeaturedRow, Split, UserProfile};
use crate::features::utility::mean;

/// Scenario-level view of one answered dilemma.
struct ScenarioOutcome {
    scenario_type: String,
    conflict: bool,
    chose_lawful: bool,
    chose_majority: bool,
    chose_max_saved: bool,
}

fn fraction_or_neutral(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.5
    } else {
        count as f64 / total as f64
    }
}

/// Aggregates one split's rows into per-user profiles, sorted by user id.
pub fn create_user_profiles(rows: &[FeaturedRow], split: Split) -> Result<Vec<UserProfile>> {
    let mut scenarios: HashMap<&str, Vec<&FeaturedRow>> = HashMap::new();
    for row in rows {
        scenarios
            .entry(row.response_id.as_str())
            .or_default()
            .push(row);
    }

    let mut per_user: HashMap<&str, Vec<ScenarioOutcome>> = HashMap::new();
    for (response_id, pair) in &scenarios {
        let &[a, b] = pair.as_slice() else {
            bail!(
                "scenario {response_id} has {} option rows, expected 2",
                pair.len()
            );
        };
        let (chosen, rejected) = if a.saved == 1 { (a, b) } else { (b, a) };

        per_user
            .entry(chosen.user_id.as_str())
            .or_default()
            .push(ScenarioOutcome {
                scenario_type: chosen.scenario_type.clone(),
                conflict: chosen.lawful_vs_majority_conflict == 1,
                chose_lawful: chosen.chose_lawful == 1,
                chose_majority: chosen.chose_majority == 1,
                chose_max_saved: chosen.number_of_characters >= rejected.number_of_characters,
            });
    }

    let mut profiles: Vec<UserProfile> = per_user
        .into_iter()
        .map(|(user_id, outcomes)| {
            let conflicts: Vec<&ScenarioOutcome> =
                outcomes.iter().filter(|o| o.conflict).collect();

            let deontology_score = fraction_or_neutral(
                conflicts.iter().filter(|o| o.chose_lawful).count(),
                conflicts.len(),
            );
            let utilitarian_score = fraction_or_neutral(
                conflicts.iter().filter(|o| o.chose_max_saved).count(),
                conflicts.len(),
            );

            UserProfile {
                user_id: user_id.to_string(),
                utilitarian_score,
                deontology_score,
                consistency_score: consistency(&outcomes),
                n_scenarios: outcomes.len(),
                split: split.as_str().to_string(),
            }
        })
        .collect();

    profiles.sort_by(|x, y| x.user_id.cmp(&y.user_id));

    info!(
        users = profiles.len(),
        split = split.as_str(),
        "User moral profiles computed"
    );

    Ok(profiles)
}

/// Agreement rate with the user's own modal choice, averaged over scenario
/// types answered at least twice. A user who always picks the same side of a
/// repeated scenario type scores 1.0.
fn consistency(outcomes: &[ScenarioOutcome]) -> f64 {
    let mut by_type: HashMap<&str, (usize, usize)> = HashMap::new();
    for outcome in outcomes {
        let entry = by_type.entry(outcome.scenario_type.as_str()).or_default();
        entry.0 += 1;
        if outcome.chose_majority {
            entry.1 += 1;
        }
    }

    let rates: Vec<f64> = by_type
        .values()
        .filter(|(total, _)| *total >= 2)
        .map(|(total, majority)| {
            let p = *majority as f64 / *total as f64;
            p.max(1.0 - p)
        })
        .collect();

    if rates.is_empty() { 1.0 } else { mean(&rates) }
}
