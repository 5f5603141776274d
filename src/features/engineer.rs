//! Scenario-level feature derivation.
//!
//! Groups option rows by `ResponseID` and computes the lawfulness, majority
//! and conflict columns, broadcasting the scenario-level ones to both rows.

use anyhow::{Result, bail};
use std::collections::HashMap;
use tracing::info;

use crate::dataset::ResponseRow;
use crate::features::types::FeaturedRow;

/// Population-majority preferred attribute level for a scenario type, from
/// the published global preference directions. `None` when the type carries
/// no majority preference (e.g. `Random`).
fn majority_level(scenario_type: &str) -> Option<&'static str> {
    match scenario_type {
        "Utilitarian" => Some("More"),
        "Species" => Some("Hoomans"),
        "Age" => Some("Young"),
        "Gender" => Some("Female"),
        "Fitness" => Some("Fit"),
        "Social Status" => Some("High"),
        _ => None,
    }
}

/// 1 if the option is the legally compliant action. With a crossing signal
/// the green-light side is lawful; without one, staying the course
/// (non-intervention) breaks no law.
fn is_lawful(row: &ResponseRow) -> u8 {
    match row.crossing_signal {
        1 => 1,
        2 => 0,
        _ => u8::from(row.intervention == 0),
    }
}

/// Derives the five feature columns over the full option-row table.
///
/// Output has one row per input row, in input order. Fails on malformed
/// scenarios: anything other than two rows with exactly one chosen and
/// exactly one lawful option.
pub fn engineer_features(rows: &[ResponseRow]) -> Result<Vec<FeaturedRow>> {
    let mut scenarios: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, row) in rows.iter().enumerate() {
        scenarios.entry(row.response_id.as_str()).or_default().push(i);
    }

    let mut featured: Vec<FeaturedRow> = rows.iter().map(FeaturedRow::from_response).collect();
    let mut conflict_scenarios = 0usize;

    for (response_id, indices) in &scenarios {
        let &[a, b] = indices.as_slice() else {
            bail!(
                "scenario {response_id} has {} option rows, expected 2",
                indices.len()
            );
        };

        let chosen = match (rows[a].saved, rows[b].saved) {
            (1, 0) => a,
            (0, 1) => b,
            _ => bail!("scenario {response_id} must have exactly one chosen option"),
        };

        let law_a = is_lawful(&rows[a]);
        let law_b = is_lawful(&rows[b]);
        if law_a + law_b != 1 {
            bail!(
                "scenario {response_id} has {} lawful options, expected 1",
                law_a + law_b
            );
        }

        let (maj_a, maj_b) = match majority_level(&rows[a].scenario_type) {
            Some(level) => {
                let ma = u8::from(rows[a].attribute_level == level);
                let mb = u8::from(rows[b].attribute_level == level);
                // a scenario only has a majority option if exactly one row
                // carries the preferred level
                if ma + mb == 1 { (ma, mb) } else { (0, 0) }
            }
            None => (0, 0),
        };
        let has_majority = maj_a + maj_b == 1;

        featured[a].is_lawful = law_a;
        featured[b].is_lawful = law_b;
        featured[a].is_majority = maj_a;
        featured[b].is_majority = maj_b;

        let chose_lawful = if chosen == a { law_a } else { law_b };
        let chose_majority = if chosen == a { maj_a } else { maj_b };
        let conflict = u8::from(has_majority && maj_a != law_a);
        conflict_scenarios += conflict as usize;

        for &i in indices {
            featured[i].chose_lawful = chose_lawful;
            featured[i].chose_majority = chose_majority;
            featured[i].lawful_vs_majority_conflict = conflict;
        }
    }

    info!(
        rows = featured.len(),
        scenarios = scenarios.len(),
        conflict_scenarios,
        "Scenario features derived"
    );

    Ok(featured)
}
