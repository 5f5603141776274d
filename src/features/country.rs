//! Left join of per-country AMCE estimates onto the featured table.

use std::collections::HashMap;
use tracing::info;

use crate::dataset::CountryAmce;
use crate::features::types::FeaturedRow;

/// Merges country AMCE columns onto every row by ISO3 code.
///
/// Rows without a country, or with a country absent from the table, keep
/// empty feature columns and `country_features_available = 0`; they are
/// never dropped.
pub fn merge_country_features(rows: &mut [FeaturedRow], table: &[CountryAmce]) {
    let by_iso3: HashMap<&str, &CountryAmce> =
        table.iter().map(|c| (c.iso3.as_str(), c)).collect();

    let mut matched = 0usize;
    for row in rows.iter_mut() {
        let hit = row
            .user_country
            .as_deref()
            .and_then(|code| by_iso3.get(code));

        if let Some(country) = hit {
            row.country_intervention_amce = Some(country.intervention);
            row.country_law_amce = Some(country.law);
            row.country_utilitarian_amce = Some(country.utilitarian);
            row.country_species_amce = Some(country.species);
            row.country_age_amce = Some(country.age);
            row.country_features_available = 1;
            matched += 1;
        } else {
            row.country_features_available = 0;
        }
    }

    info!(
        matched,
        unmatched = rows.len() - matched,
        countries = table.len(),
        "Country features merged"
    );
}
