//! Human-readable descriptions of every derived column, written alongside
//! the data so downstream analysis chapters can cite them.

/// Ordered (column, description) pairs covering scenario features, country
/// features, and profile metrics.
pub fn feature_descriptions() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "is_lawful",
            "1 if this option is the legally compliant action (green crossing signal, or staying the course when no signal is present)",
        ),
        (
            "is_majority",
            "1 if this option matches the population-majority preference for the scenario type",
        ),
        (
            "chose_lawful",
            "1 if the option chosen in this scenario was the lawful one (broadcast to both rows)",
        ),
        (
            "chose_majority",
            "1 if the option chosen in this scenario was the majority-preferred one (broadcast to both rows)",
        ),
        (
            "lawful_vs_majority_conflict",
            "1 if the lawful option and the majority-preferred option differ, forcing a tradeoff",
        ),
        (
            "country_intervention_amce",
            "country-level AMCE for preferring inaction over swerving",
        ),
        (
            "country_law_amce",
            "country-level AMCE for sparing the lawful side",
        ),
        (
            "country_utilitarian_amce",
            "country-level AMCE for sparing more characters",
        ),
        (
            "country_species_amce",
            "country-level AMCE for sparing humans over pets",
        ),
        (
            "country_age_amce",
            "country-level AMCE for sparing the young",
        ),
        (
            "country_features_available",
            "1 if the respondent's country was found in the AMCE table",
        ),
        (
            "utilitarian_score",
            "fraction of the user's conflict scenarios where the chosen option saved at least as many characters",
        ),
        (
            "deontology_score",
            "fraction of the user's conflict scenarios where the lawful option was chosen",
        ),
        (
            "consistency_score",
            "agreement rate with the user's own modal choice across repeated scenario types",
        ),
        (
            "n_scenarios",
            "number of distinct scenarios the user answered within the split",
        ),
    ]
}
