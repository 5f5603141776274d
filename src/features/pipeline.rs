//! Pipeline orchestration: load → derive features → country merge →
//! train/test split → per-split profiles → outputs and reports.

use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::dataset;
use crate::features::country::merge_country_features;
use crate::features::engineer::engineer_features;
use crate::features::profile::create_user_profiles;
use crate::features::split::{split_train_test, unique_users};
use crate::features::types::{Split, SplitIndex};
use crate::output::{write_csv, write_json};
use crate::report;

pub struct PipelineConfig {
    /// Cleaned survey CSV. Missing file is fatal.
    pub input: PathBuf,
    /// Optional per-country AMCE CSV. Missing file skips the merge.
    pub countries: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub report_dir: PathBuf,
    pub test_size: f64,
    pub seed: u64,
}

/// Runs the full feature-engineering pipeline and writes all outputs.
#[tracing::instrument(skip(config), fields(input = %config.input.display()))]
pub fn run(config: &PipelineConfig) -> Result<()> {
    let rows = dataset::load_survey(&config.input)?;

    let country_table = match &config.countries {
        Some(path) if path.exists() => Some(dataset::load_country_amce(path)?),
        Some(path) => {
            warn!(path = %path.display(), "Country AMCE file not found, skipping country feature merge");
            None
        }
        None => None,
    };

    let mut featured = engineer_features(&rows)?;
    if let Some(table) = &country_table {
        merge_country_features(&mut featured, table);
    }

    // Split before computing profiles, so neither side's statistics leak
    // into the other.
    let (train, test) = split_train_test(featured.clone(), config.test_size, config.seed)?;

    let mut profiles = create_user_profiles(&train, Split::Train)?;
    profiles.extend(create_user_profiles(&test, Split::Test)?);

    write_csv(&config.output_dir.join("featured_data.csv"), &featured)?;
    write_csv(&config.output_dir.join("train_data.csv"), &train)?;
    write_csv(&config.output_dir.join("test_data.csv"), &test)?;
    write_csv(
        &config.output_dir.join("user_moral_profiles.csv"),
        &profiles,
    )?;

    let total_rows = train.len() + test.len();
    let index = SplitIndex {
        train_users: unique_users(&train),
        test_users: unique_users(&test),
        split_date: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        test_size: if total_rows == 0 {
            0.0
        } else {
            test.len() as f64 / total_rows as f64
        },
        seed: config.seed,
    };
    write_json(&config.output_dir.join("train_test_split.json"), &index)?;

    report::write_descriptions(&config.report_dir)?;
    report::write_feature_stats(
        &featured,
        &config.report_dir.join("scenario_feature_stats.csv"),
    )?;
    report::write_markdown_report(
        &featured,
        &profiles,
        train.len(),
        test.len(),
        &config.report_dir.join("feature_engineering_report.md"),
    )?;

    info!(
        rows = featured.len(),
        users = profiles.len(),
        output_dir = %config.output_dir.display(),
        report_dir = %config.report_dir.display(),
        "Feature engineering pipeline complete"
    );

    Ok(())
}
