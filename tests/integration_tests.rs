use mm_featurizer::dataset;
use mm_featurizer::features::pipeline::{PipelineConfig, run};
use mm_featurizer::features::types::{SplitIndex, UserProfile};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

const N_USERS: usize = 10;

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("mm_featurizer_it_{}_{}", std::process::id(), name))
}

/// Two scenarios per user: a lawful-vs-utilitarian conflict and a
/// no-conflict age dilemma. Even-numbered users come from the USA.
fn write_survey_csv(path: &PathBuf) {
    let mut csv = String::from(
        "ResponseID,UserID,UserCountry3,Saved,Intervention,CrossingSignal,ScenarioType,AttributeLevel,NumberOfCharacters\n",
    );
    for u in 0..N_USERS {
        let country = if u % 2 == 0 { "USA" } else { "" };
        // conflict: green light protects the smaller group, user saves it
        csv.push_str(&format!(
            "c{u},u{u},{country},1,0,1,Utilitarian,Less,1\n\
             c{u},u{u},{country},0,0,2,Utilitarian,More,5\n"
        ));
        // no conflict: lawful side is also the majority-preferred one
        csv.push_str(&format!(
            "a{u},u{u},{country},1,0,0,Age,Young,2\n\
             a{u},u{u},{country},0,1,0,Age,Old,2\n"
        ));
    }
    fs::write(path, csv).unwrap();
}

fn write_countries_csv(path: &PathBuf) {
    fs::write(
        path,
        "ISO3,Intervention,Law,Utilitarian,Species,Age\n\
         USA,0.06,0.34,0.42,0.58,0.49\n",
    )
    .unwrap();
}

fn run_pipeline(name: &str) -> (PathBuf, PathBuf) {
    let base = scratch_dir(name);
    let _ = fs::remove_dir_all(&base);
    fs::create_dir_all(&base).unwrap();

    let input = base.join("cleaned_survey.csv");
    let countries = base.join("CountriesChangePr.csv");
    write_survey_csv(&input);
    write_countries_csv(&countries);

    let output_dir = base.join("processed");
    let report_dir = base.join("tables");
    run(&PipelineConfig {
        input,
        countries: Some(countries.clone()),
        output_dir: output_dir.clone(),
        report_dir: report_dir.clone(),
        test_size: 0.2,
        seed: 42,
    })
    .expect("pipeline failed");

    (output_dir, report_dir)
}

#[test]
fn test_full_pipeline_outputs() {
    let (output_dir, report_dir) = run_pipeline("outputs");

    for file in [
        "featured_data.csv",
        "train_data.csv",
        "test_data.csv",
        "user_moral_profiles.csv",
        "train_test_split.json",
    ] {
        assert!(output_dir.join(file).exists(), "missing {file}");
    }
    for file in [
        "feature_descriptions.csv",
        "feature_descriptions.json",
        "scenario_feature_stats.csv",
        "feature_engineering_report.md",
    ] {
        assert!(report_dir.join(file).exists(), "missing {file}");
    }

    let _ = fs::remove_dir_all(scratch_dir("outputs"));
}

#[test]
fn test_featured_data_round_trips_and_keeps_all_rows() {
    let (output_dir, _) = run_pipeline("round_trip");

    let featured = dataset::load_featured(&output_dir.join("featured_data.csv")).unwrap();
    assert_eq!(featured.len(), N_USERS * 4);

    // conflict column agrees across both rows of every scenario
    for pair in featured.chunks(2) {
        assert_eq!(pair[0].response_id, pair[1].response_id);
        assert_eq!(
            pair[0].lawful_vs_majority_conflict,
            pair[1].lawful_vs_majority_conflict
        );
        assert_eq!(pair[0].chose_lawful, pair[1].chose_lawful);
    }

    // USA rows carry country features, the rest are flagged unavailable
    for row in &featured {
        match row.user_country.as_deref() {
            Some("USA") => {
                assert_eq!(row.country_features_available, 1);
                assert_eq!(row.country_law_amce, Some(0.34));
            }
            _ => {
                assert_eq!(row.country_features_available, 0);
                assert_eq!(row.country_law_amce, None);
            }
        }
    }

    let _ = fs::remove_dir_all(scratch_dir("round_trip"));
}

#[test]
fn test_split_users_disjoint_and_rows_conserved() {
    let (output_dir, _) = run_pipeline("split");

    let train = dataset::load_featured(&output_dir.join("train_data.csv")).unwrap();
    let test = dataset::load_featured(&output_dir.join("test_data.csv")).unwrap();
    assert_eq!(train.len() + test.len(), N_USERS * 4);

    let index: SplitIndex = serde_json::from_str(
        &fs::read_to_string(output_dir.join("train_test_split.json")).unwrap(),
    )
    .unwrap();

    let train_users: HashSet<&String> = index.train_users.iter().collect();
    let test_users: HashSet<&String> = index.test_users.iter().collect();
    assert!(train_users.is_disjoint(&test_users));
    assert_eq!(train_users.len() + test_users.len(), N_USERS);
    assert_eq!(index.seed, 42);

    // every row's user sits in the matching user list
    for row in &train {
        assert!(train_users.contains(&row.user_id));
    }
    for row in &test {
        assert!(test_users.contains(&row.user_id));
    }

    let _ = fs::remove_dir_all(scratch_dir("split"));
}

#[test]
fn test_profiles_cover_every_user_once_per_split() {
    let (output_dir, _) = run_pipeline("profiles");

    let file = fs::File::open(output_dir.join("user_moral_profiles.csv")).unwrap();
    let mut rdr = csv::Reader::from_reader(file);
    let profiles: Vec<UserProfile> = rdr.deserialize().map(|r| r.unwrap()).collect();

    assert_eq!(profiles.len(), N_USERS);
    for p in &profiles {
        assert!((0.0..=1.0).contains(&p.deontology_score));
        assert!((0.0..=1.0).contains(&p.utilitarian_score));
        assert!((0.0..=1.0).contains(&p.consistency_score));
        assert_eq!(p.n_scenarios, 2);
        assert!(p.split == "train" || p.split == "test");
        // every user chose the lawful, smaller group in the conflict scenario
        assert_eq!(p.deontology_score, 1.0);
        assert_eq!(p.utilitarian_score, 0.0);
    }

    let _ = fs::remove_dir_all(scratch_dir("profiles"));
}

#[test]
fn test_missing_input_is_fatal() {
    let base = scratch_dir("missing_input");
    let _ = fs::remove_dir_all(&base);

    let result = run(&PipelineConfig {
        input: base.join("does_not_exist.csv"),
        countries: None,
        output_dir: base.join("processed"),
        report_dir: base.join("tables"),
        test_size: 0.2,
        seed: 42,
    });
    assert!(result.is_err());
}

#[test]
fn test_missing_country_file_degrades_gracefully() {
    let base = scratch_dir("no_countries");
    let _ = fs::remove_dir_all(&base);
    fs::create_dir_all(&base).unwrap();

    let input = base.join("cleaned_survey.csv");
    write_survey_csv(&input);

    let output_dir = base.join("processed");
    run(&PipelineConfig {
        input,
        countries: Some(base.join("CountriesChangePr.csv")),
        output_dir: output_dir.clone(),
        report_dir: base.join("tables"),
        test_size: 0.2,
        seed: 42,
    })
    .expect("pipeline should continue without the country table");

    let featured = dataset::load_featured(&output_dir.join("featured_data.csv")).unwrap();
    assert!(
        featured
            .iter()
            .all(|r| r.country_features_available == 0 && r.country_law_amce.is_none())
    );

    let _ = fs::remove_dir_all(&base);
}
