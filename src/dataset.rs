//! CSV loading for the cleaned survey table, the per-country AMCE table,
//! and previously written featured tables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::features::types::FeaturedRow;

/// A single candidate option within a decision scenario, as exported by the
/// data-cleaning step. Two rows share each `ResponseID`: the chosen option
/// (`Saved == 1`) and the rejected one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseRow {
    #[serde(rename = "ResponseID")]
    pub response_id: String,
    #[serde(rename = "UserID")]
    pub user_id: String,
    /// ISO3 code; empty in the source data for users without geolocation.
    #[serde(rename = "UserCountry3")]
    pub user_country: Option<String>,
    #[serde(rename = "Saved")]
    pub saved: u8,
    /// 1 if this option requires the vehicle to swerve.
    #[serde(rename = "Intervention")]
    pub intervention: u8,
    /// 0 = no signal, 1 = crossing on green, 2 = crossing on red.
    #[serde(rename = "CrossingSignal")]
    pub crossing_signal: u8,
    #[serde(rename = "ScenarioType")]
    pub scenario_type: String,
    /// Level of the varied attribute for this option (e.g. "Young", "More").
    #[serde(rename = "AttributeLevel")]
    pub attribute_level: String,
    #[serde(rename = "NumberOfCharacters")]
    pub number_of_characters: u32,
}

/// One row of the external country table: AMCE preference estimates keyed by
/// ISO3 code.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryAmce {
    #[serde(rename = "ISO3")]
    pub iso3: String,
    #[serde(rename = "Intervention")]
    pub intervention: f64,
    #[serde(rename = "Law")]
    pub law: f64,
    #[serde(rename = "Utilitarian")]
    pub utilitarian: f64,
    #[serde(rename = "Species")]
    pub species: f64,
    #[serde(rename = "Age")]
    pub age: f64,
}

fn read_rows<R: Read, T: for<'de> Deserialize<'de>>(reader: R) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Loads the cleaned survey CSV. A missing or unreadable file is fatal.
pub fn load_survey(path: &Path) -> Result<Vec<ResponseRow>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open survey file {}", path.display()))?;
    let rows: Vec<ResponseRow> =
        read_rows(file).with_context(|| format!("invalid survey row in {}", path.display()))?;
    info!(rows = rows.len(), path = %path.display(), "Survey data loaded");
    Ok(rows)
}

/// Loads the per-country AMCE table.
pub fn load_country_amce(path: &Path) -> Result<Vec<CountryAmce>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open country table {}", path.display()))?;
    let rows: Vec<CountryAmce> =
        read_rows(file).with_context(|| format!("invalid country row in {}", path.display()))?;
    info!(countries = rows.len(), path = %path.display(), "Country AMCE table loaded");
    Ok(rows)
}

/// Loads a featured CSV produced by an earlier pipeline run.
pub fn load_featured(path: &Path) -> Result<Vec<FeaturedRow>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open featured file {}", path.display()))?;
    let rows: Vec<FeaturedRow> =
        read_rows(file).with_context(|| format!("invalid featured row in {}", path.display()))?;
    info!(rows = rows.len(), path = %path.display(), "Featured data loaded");
    Ok(rows)
}
