//! Data types produced by the feature-engineering pipeline.

use serde::{Deserialize, Serialize};

use crate::dataset::ResponseRow;

/// A survey option row plus all derived feature columns. Serializes to the
/// `featured_data.csv` / `train_data.csv` / `test_data.csv` schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeaturedRow {
    #[serde(rename = "ResponseID")]
    pub response_id: String,
    #[serde(rename = "UserID")]
    pub user_id: String,
    #[serde(rename = "UserCountry3")]
    pub user_country: Option<String>,
    #[serde(rename = "Saved")]
    pub saved: u8,
    #[serde(rename = "Intervention")]
    pub intervention: u8,
    #[serde(rename = "CrossingSignal")]
    pub crossing_signal: u8,
    #[serde(rename = "ScenarioType")]
    pub scenario_type: String,
    #[serde(rename = "AttributeLevel")]
    pub attribute_level: String,
    #[serde(rename = "NumberOfCharacters")]
    pub number_of_characters: u32,

    // per-option features
    pub is_lawful: u8,
    pub is_majority: u8,

    // scenario-level features, identical on both rows of a scenario
    pub chose_lawful: u8,
    pub chose_majority: u8,
    pub lawful_vs_majority_conflict: u8,

    // country features, empty when the country merge found no match
    pub country_intervention_amce: Option<f64>,
    pub country_law_amce: Option<f64>,
    pub country_utilitarian_amce: Option<f64>,
    pub country_species_amce: Option<f64>,
    pub country_age_amce: Option<f64>,
    pub country_features_available: u8,
}

impl FeaturedRow {
    /// Builds a featured row from a raw option row with all derived columns
    /// zeroed; the pipeline fills them in afterwards.
    pub fn from_response(row: &ResponseRow) -> Self {
        FeaturedRow {
            response_id: row.response_id.clone(),
            user_id: row.user_id.clone(),
            user_country: row.user_country.clone(),
            saved: row.saved,
            intervention: row.intervention,
            crossing_signal: row.crossing_signal,
            scenario_type: row.scenario_type.clone(),
            attribute_level: row.attribute_level.clone(),
            number_of_characters: row.number_of_characters,
            is_lawful: 0,
            is_majority: 0,
            chose_lawful: 0,
            chose_majority: 0,
            lawful_vs_majority_conflict: 0,
            country_intervention_amce: None,
            country_law_amce: None,
            country_utilitarian_amce: None,
            country_species_amce: None,
            country_age_amce: None,
            country_features_available: 0,
        }
    }
}

/// Which side of the train/test partition a profile was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }
}

/// Aggregate moral profile of one user within one split.
///
/// Profiles are descriptive only. They are computed separately for the train
/// and test splits so that neither side's statistics leak into the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    /// Fraction of conflict scenarios where the chosen option saved at least
    /// as many characters as the alternative.
    pub utilitarian_score: f64,
    /// Fraction of conflict scenarios where the user chose the lawful option.
    pub deontology_score: f64,
    /// Modal-choice agreement rate across repeated scenario types.
    pub consistency_score: f64,
    /// Distinct scenarios answered by the user within the split.
    pub n_scenarios: usize,
    pub split: String,
}

/// Index document written alongside the split CSVs, recording which users
/// landed on which side and the seed that produced the assignment.
#[derive(Debug, Serialize, Deserialize)]
pub struct SplitIndex {
    pub train_users: Vec<String>,
    pub test_users: Vec<String>,
    pub split_date: String,
    /// Achieved row fraction of the test split, not the requested one.
    pub test_size: f64,
    pub seed: u64,
}

/// Descriptive statistics for one derived feature column.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeatureStat {
    pub feature: String,
    pub mean: f64,
    pub stddev: f64,
    pub min: u8,
    pub max: u8,
    pub sum: u64,
}

/// One row of the feature description table.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeatureDescription {
    pub feature: String,
    pub description: String,
}
