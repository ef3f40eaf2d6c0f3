//! Integration tests for a full validation run over an on-disk dataset.

use std::fs;
use std::path::Path;

use indicator_validator::{
    AmbiguousPolicy, DataValidator, GroupOutcome, IndicatorGroup, ValidatorError,
    ValidatorSettings,
};
use tempfile::TempDir;

// ============================================================================
// Fixtures
// ============================================================================

const RESULTS: &str = "data/calculation_results/companies";

fn dataset(roster: &str) -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join(RESULTS)).unwrap();
    fs::write(tmp.path().join("data/companies.json"), roster).unwrap();
    tmp
}

fn write_result(root: &Path, file_name: &str, content: &str) {
    fs::write(root.join(RESULTS).join(file_name), content).unwrap();
}

/// Write a valid file for every default group of `ts_code`.
fn write_complete(root: &Path, ts_code: &str) {
    for group in IndicatorGroup::default_catalogue() {
        write_result(
            root,
            &format!("{ts_code}_indicators_{}.json", group.file_stem()),
            &format!(r#"{{"{}": {{"value": 1.0}}}}"#, group.as_str()),
        );
    }
}

fn run(root: &Path) -> Result<indicator_validator::ValidationReport, ValidatorError> {
    DataValidator::new(ValidatorSettings::for_root(root)).run()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_single_file_company_misses_eighteen_groups() {
    let tmp = dataset(r#"[{"ts_code":"000001.SZ","name":"Test Co"}]"#);
    write_result(tmp.path(), "000001.SZ_indicators_7_11.json", r#"{"7.11": 1}"#);

    let report = run(tmp.path()).unwrap();

    let company = &report.companies[0];
    assert_eq!(company.ts_code, "000001.SZ");
    assert_eq!(company.missing_groups().len(), 18);
    assert!(company.checks[0].outcome.is_pass());
    assert!(!company.is_complete());
    assert!(!report.all_pass());
    assert!(report.to_text_report().contains("缺失 18 个指标组"));
}

#[test]
fn test_lookups_are_companies_times_groups() {
    let tmp = dataset(
        r#"[{"ts_code":"000001.SZ","name":"A"},
            {"ts_code":"000002.SZ","name":"B"},
            {"ts_code":"600000.SH","name":"C"}]"#,
    );

    let report = run(tmp.path()).unwrap();
    assert_eq!(report.lookups, 3 * 19);
    assert!(report.companies.iter().all(|c| c.checks.len() == 19));
}

#[test]
fn test_minimal_valid_file_passes() {
    let tmp = dataset(r#"[{"ts_code":"000001.SZ","name":"Test Co"}]"#);
    write_result(tmp.path(), "000001.SZ_indicators_7_11.json", r#"{"7.11": {}}"#);

    let report = run(tmp.path()).unwrap();
    match &report.companies[0].checks[0].outcome {
        GroupOutcome::Pass { matches, .. } => assert_eq!(*matches, 1),
        other => panic!("expected pass, got {other:?}"),
    }
}

#[test]
fn test_complete_dataset_passes() {
    let tmp = dataset(
        r#"[{"ts_code":"000001.SZ","name":"A"},{"ts_code":"600519.SH","name":"B"}]"#,
    );
    write_complete(tmp.path(), "000001.SZ");
    write_complete(tmp.path(), "600519.SH");

    let report = run(tmp.path()).unwrap();
    assert!(report.all_pass());
    assert_eq!(report.missing_total(), 0);
    assert!(report.to_text_report().contains("所有公司的数据文件测试通过"));
}

#[test]
fn test_failure_causes_are_distinguishable() {
    let tmp = dataset(r#"[{"ts_code":"000001.SZ","name":"Test Co"}]"#);
    write_complete(tmp.path(), "000001.SZ");
    write_result(tmp.path(), "000001.SZ_indicators_7_12.json", "{ truncated");
    write_result(tmp.path(), "000001.SZ_indicators_7_13.json", r#"{"7.12": {}}"#);
    fs::remove_file(tmp.path().join(RESULTS).join("000001.SZ_indicators_7_14.json")).unwrap();

    let report = run(tmp.path()).unwrap();
    let labels: Vec<&str> = report.companies[0]
        .checks
        .iter()
        .map(|c| c.outcome.label())
        .collect();

    assert_eq!(labels[0], "pass");
    assert_eq!(labels[1], "unreadable");
    assert_eq!(labels[2], "missing_key");
    assert_eq!(labels[3], "no_file");
    assert_eq!(report.companies[0].missing_groups().len(), 3);
}

#[test]
fn test_one_incomplete_company_fails_the_run() {
    let tmp = dataset(
        r#"[{"ts_code":"000001.SZ","name":"A"},{"ts_code":"000002.SZ","name":"B"}]"#,
    );
    write_complete(tmp.path(), "000001.SZ");

    let report = run(tmp.path()).unwrap();
    assert!(report.companies[0].is_complete());
    assert!(!report.companies[1].is_complete());
    assert!(!report.all_pass());
}

#[test]
fn test_multiple_matches_are_ambiguous_by_default() {
    let tmp = dataset(r#"[{"ts_code":"000001.SZ","name":"Test Co"}]"#);
    write_result(tmp.path(), "000001.SZ_indicators_7_11.json", r#"{"7.11": {}}"#);
    write_result(tmp.path(), "000001.SZ_indicators_7_11_old.json", r#"{"7.11": {}}"#);

    let report = run(tmp.path()).unwrap();
    assert_eq!(report.companies[0].checks[0].outcome.label(), "ambiguous");

    let mut settings = ValidatorSettings::for_root(tmp.path());
    settings.ambiguous_policy = AmbiguousPolicy::FirstMatch;
    let report = DataValidator::new(settings).run().unwrap();
    match &report.companies[0].checks[0].outcome {
        GroupOutcome::Pass { path, matches } => {
            assert_eq!(*matches, 2);
            assert!(path.ends_with("000001.SZ_indicators_7_11.json"));
        }
        other => panic!("expected pass, got {other:?}"),
    }
}

#[test]
fn test_running_twice_gives_identical_classifications() {
    let tmp = dataset(r#"[{"ts_code":"000001.SZ","name":"Test Co"}]"#);
    write_result(tmp.path(), "000001.SZ_indicators_7_11.json", r#"{"7.11": 1}"#);
    write_result(tmp.path(), "000001.SZ_indicators_7_21.json", "not json");

    let first = run(tmp.path()).unwrap();
    let second = run(tmp.path()).unwrap();

    assert_eq!(first.companies[0].checks, second.companies[0].checks);
    assert_eq!(first.all_pass(), second.all_pass());
}

// ============================================================================
// Prerequisites
// ============================================================================

#[test]
fn test_missing_results_dir_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("data")).unwrap();
    fs::write(tmp.path().join("data/companies.json"), "[]").unwrap();

    let err = run(tmp.path()).unwrap_err();
    assert!(matches!(err, ValidatorError::ResultsDirMissing(_)));
    assert!(err.to_string().contains("数据目录不存在"));
}

#[test]
fn test_missing_roster_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join(RESULTS)).unwrap();

    let err = run(tmp.path()).unwrap_err();
    assert!(matches!(err, ValidatorError::RosterMissing(_)));
    assert!(err.is_missing_prerequisite());
}

#[test]
fn test_empty_roster_passes_vacuously() {
    let tmp = dataset("[]");
    let report = run(tmp.path()).unwrap();
    assert_eq!(report.lookups, 0);
    assert!(report.all_pass());
}
