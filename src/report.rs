//! Feature statistics tables and the Markdown report draft.

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

use crate::features::describe::feature_descriptions;
use crate::features::types::{FeatureDescription, FeatureStat, FeaturedRow, UserProfile};
use crate::features::utility::{mean, stddev};
use crate::output::{write_csv, write_json};

const SCENARIO_FEATURES: &[(&str, fn(&FeaturedRow) -> u8)] = &[
    ("is_lawful", |r| r.is_lawful),
    ("is_majority", |r| r.is_majority),
    ("chose_lawful", |r| r.chose_lawful),
    ("chose_majority", |r| r.chose_majority),
    ("lawful_vs_majority_conflict", |r| {
        r.lawful_vs_majority_conflict
    }),
];

const COUNTRY_FEATURES: &[(&str, fn(&FeaturedRow) -> Option<f64>)] = &[
    ("country_intervention_amce", |r| r.country_intervention_amce),
    ("country_law_amce", |r| r.country_law_amce),
    ("country_utilitarian_amce", |r| r.country_utilitarian_amce),
    ("country_species_amce", |r| r.country_species_amce),
    ("country_age_amce", |r| r.country_age_amce),
];

/// Descriptive statistics for every boolean scenario feature column.
pub fn compute_feature_stats(rows: &[FeaturedRow]) -> Vec<FeatureStat> {
    SCENARIO_FEATURES
        .iter()
        .map(|(name, get)| {
            let series: Vec<f64> = rows.iter().map(|r| get(r) as f64).collect();
            FeatureStat {
                feature: name.to_string(),
                mean: mean(&series),
                stddev: stddev(&series),
                min: rows.iter().map(get).min().unwrap_or(0),
                max: rows.iter().map(get).max().unwrap_or(0),
                sum: rows.iter().map(|r| get(r) as u64).sum(),
            }
        })
        .collect()
}

/// Writes `scenario_feature_stats.csv`.
pub fn write_feature_stats(rows: &[FeaturedRow], path: &Path) -> Result<()> {
    let stats = compute_feature_stats(rows);
    write_csv(path, &stats)?;
    info!(path = %path.display(), "Scenario feature statistics written");
    Ok(())
}

/// Writes the feature description table as both CSV and JSON.
pub fn write_descriptions(report_dir: &Path) -> Result<()> {
    let descriptions = feature_descriptions();

    let records: Vec<FeatureDescription> = descriptions
        .iter()
        .map(|(feature, description)| FeatureDescription {
            feature: feature.to_string(),
            description: description.to_string(),
        })
        .collect();
    write_csv(&report_dir.join("feature_descriptions.csv"), &records)?;

    let mut map = serde_json::Map::new();
    for (feature, description) in &descriptions {
        map.insert(
            feature.to_string(),
            serde_json::Value::String(description.to_string()),
        );
    }
    write_json(
        &report_dir.join("feature_descriptions.json"),
        &serde_json::Value::Object(map),
    )?;

    info!(features = descriptions.len(), "Feature descriptions written");
    Ok(())
}

/// Fraction of distinct scenarios flagged as lawful-vs-majority conflicts.
fn conflict_scenario_rate(rows: &[FeaturedRow]) -> f64 {
    let mut seen = HashSet::new();
    let mut conflicts = 0usize;
    let mut scenarios = 0usize;
    for row in rows {
        if seen.insert(row.response_id.as_str()) {
            scenarios += 1;
            conflicts += row.lawful_vs_majority_conflict as usize;
        }
    }
    if scenarios == 0 {
        0.0
    } else {
        conflicts as f64 / scenarios as f64
    }
}

/// Renders the feature-engineering chapter draft as Markdown.
pub fn render_markdown_report(
    featured: &[FeaturedRow],
    profiles: &[UserProfile],
    train_rows: usize,
    test_rows: usize,
) -> Result<String> {
    let descriptions: HashMap<&str, &str> = feature_descriptions().into_iter().collect();
    let mut md = String::new();

    writeln!(md, "# Feature Engineering\n")?;

    writeln!(md, "## Scenario-level features\n")?;
    writeln!(md, "| Feature | Description | Mean |")?;
    writeln!(md, "|---------|-------------|------|")?;
    for (name, get) in SCENARIO_FEATURES {
        let series: Vec<f64> = featured.iter().map(|r| get(r) as f64).collect();
        let description = descriptions.get(name).copied().unwrap_or("");
        writeln!(md, "| {} | {} | {:.3} |", name, description, mean(&series))?;
    }

    writeln!(md, "\n### Key rates\n")?;
    let chosen: Vec<&FeaturedRow> = featured.iter().filter(|r| r.saved == 1).collect();
    let lawful_rate = mean(&chosen.iter().map(|r| r.is_lawful as f64).collect::<Vec<_>>());
    let majority_rate = mean(&chosen.iter().map(|r| r.is_majority as f64).collect::<Vec<_>>());
    writeln!(md, "- Lawful choice rate: {:.1}%", lawful_rate * 100.0)?;
    writeln!(md, "- Majority choice rate: {:.1}%", majority_rate * 100.0)?;
    writeln!(
        md,
        "- Conflict scenario share: {:.1}%",
        conflict_scenario_rate(featured) * 100.0
    )?;

    let with_country = featured
        .iter()
        .filter(|r| r.country_features_available == 1)
        .count();
    if with_country > 0 {
        writeln!(md, "\n## Country-level features\n")?;
        writeln!(
            md,
            "AMCE estimates merged for {} of {} rows.\n",
            with_country,
            featured.len()
        )?;
        writeln!(md, "| Feature | Description | Mean | Std |")?;
        writeln!(md, "|---------|-------------|------|-----|")?;
        for (name, get) in COUNTRY_FEATURES {
            let series: Vec<f64> = featured.iter().filter_map(get).collect();
            let description = descriptions.get(name).copied().unwrap_or("");
            writeln!(
                md,
                "| {} | {} | {:.3} | {:.3} |",
                name,
                description,
                mean(&series),
                stddev(&series)
            )?;
        }
    }

    writeln!(md, "\n## User moral profiles\n")?;
    writeln!(
        md,
        "Profiles are computed separately for the train and test splits and \
         are intended for exploratory analysis only.\n"
    )?;
    writeln!(md, "| Metric | Description | Mean | Std |")?;
    writeln!(md, "|--------|-------------|------|-----|")?;
    let profile_metrics: &[(&str, fn(&UserProfile) -> f64)] = &[
        ("utilitarian_score", |p| p.utilitarian_score),
        ("deontology_score", |p| p.deontology_score),
        ("consistency_score", |p| p.consistency_score),
        ("n_scenarios", |p| p.n_scenarios as f64),
    ];
    for (name, get) in profile_metrics {
        let series: Vec<f64> = profiles.iter().map(|p| get(p)).collect();
        let description = descriptions.get(name).copied().unwrap_or("");
        writeln!(
            md,
            "| {} | {} | {:.3} | {:.3} |",
            name,
            description,
            mean(&series),
            stddev(&series)
        )?;
    }
    writeln!(md, "\n- Profiled users: {}", profiles.len())?;

    if !profiles.is_empty() {
        let strong = profiles.iter().filter(|p| p.utilitarian_score > 0.7).count();
        let weak = profiles.iter().filter(|p| p.utilitarian_score < 0.3).count();
        let moderate = profiles.len() - strong - weak;
        let pct = |n: usize| n as f64 / profiles.len() as f64 * 100.0;

        writeln!(md, "\n### Utilitarian leaning\n")?;
        writeln!(md, "- Strong (> 0.7): {} users ({:.1}%)", strong, pct(strong))?;
        writeln!(
            md,
            "- Moderate (0.3–0.7): {} users ({:.1}%)",
            moderate,
            pct(moderate)
        )?;
        writeln!(md, "- Weak (< 0.3): {} users ({:.1}%)", weak, pct(weak))?;
    }

    writeln!(md, "\n## Train/test split\n")?;
    writeln!(
        md,
        "User-level 80/20 partition; no user appears in both splits.\n"
    )?;
    writeln!(md, "- Train rows: {}", train_rows)?;
    writeln!(md, "- Test rows: {}", test_rows)?;

    Ok(md)
}

/// Writes the Markdown report draft to `path`.
pub fn write_markdown_report(
    featured: &[FeaturedRow],
    profiles: &[UserProfile],
    train_rows: usize,
    test_rows: usize,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let md = render_markdown_report(featured, profiles, train_rows, test_rows)?;
    std::fs::write(path, md)?;
    info!(path = %path.display(), "Markdown report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ResponseRow;
    use crate::features::engineer::engineer_features;

    fn sample_featured() -> Vec<FeaturedRow> {
        // one conflict scenario: lawful side loses on characters
        let rows = vec![
            ResponseRow {
                response_id: "r1".to_string(),
                user_id: "u1".to_string(),
                user_country: None,
                saved: 1,
                intervention: 0,
                crossing_signal: 1,
                scenario_type: "Utilitarian".to_string(),
                attribute_level: "Less".to_string(),
                number_of_characters: 1,
            },
            ResponseRow {
                response_id: "r1".to_string(),
                user_id: "u1".to_string(),
                user_country: None,
                saved: 0,
                intervention: 0,
                crossing_signal: 2,
                scenario_type: "Utilitarian".to_string(),
                attribute_level: "More".to_string(),
                number_of_characters: 5,
            },
        ];
        engineer_features(&rows).unwrap()
    }

    #[test]
    fn test_feature_stats_of_binary_columns() {
        let featured = sample_featured();
        let stats = compute_feature_stats(&featured);

        assert_eq!(stats.len(), 5);

        let lawful = stats.iter().find(|s| s.feature == "is_lawful").unwrap();
        assert_eq!(lawful.mean, 0.5);
        assert_eq!(lawful.min, 0);
        assert_eq!(lawful.max, 1);
        assert_eq!(lawful.sum, 1);

        let conflict = stats
            .iter()
            .find(|s| s.feature == "lawful_vs_majority_conflict")
            .unwrap();
        assert_eq!(conflict.mean, 1.0);
        assert_eq!(conflict.stddev, 0.0);
    }

    #[test]
    fn test_conflict_rate_counts_scenarios_once() {
        let featured = sample_featured();
        // two rows, one scenario, conflict on both rows
        assert_eq!(conflict_scenario_rate(&featured), 1.0);
    }

    #[test]
    fn test_markdown_report_mentions_each_feature() {
        let featured = sample_featured();
        let profiles = vec![UserProfile {
            user_id: "u1".to_string(),
            utilitarian_score: 0.2,
            deontology_score: 0.8,
            consistency_score: 1.0,
            n_scenarios: 1,
            split: "train".to_string(),
        }];

        let md = render_markdown_report(&featured, &profiles, 2, 0).unwrap();

        for (name, _) in SCENARIO_FEATURES {
            assert!(md.contains(name), "report missing {name}");
        }
        assert!(md.contains("utilitarian_score"));
        assert!(md.contains("Train rows: 2"));
        // no rows carry country features, so the section is omitted
        assert!(!md.contains("Country-level features"));
    }
}
