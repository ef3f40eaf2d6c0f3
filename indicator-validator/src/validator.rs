//! Validation run over the whole roster.

use chrono::Utc;
use indicator_common::config::ValidatorConfig;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::check::{check_group, AmbiguousPolicy, GroupOutcome, ResultsDir};
use crate::error::Result;
use crate::groups::IndicatorGroup;
use crate::report::{CompanyReport, GroupCheck, ValidationReport};
use crate::roster::load_roster;

/// Resolved inputs for one validation run.
#[derive(Debug, Clone)]
pub struct ValidatorSettings {
    /// Company roster file
    pub roster_path: PathBuf,
    /// Directory holding the result files
    pub results_dir: PathBuf,
    /// Groups to check for every company
    pub groups: Vec<IndicatorGroup>,
    /// Handling of several files matching one pattern
    pub ambiguous_policy: AmbiguousPolicy,
}

impl ValidatorSettings {
    /// Default layout under `data_root` with the 19 standard groups.
    pub fn for_root(data_root: impl Into<PathBuf>) -> Self {
        let config = ValidatorConfig {
            data_root: data_root.into(),
            ..ValidatorConfig::default()
        };
        Self {
            roster_path: config.roster_path(),
            results_dir: config.results_path(),
            groups: IndicatorGroup::default_catalogue(),
            ambiguous_policy: AmbiguousPolicy::default(),
        }
    }

    /// Resolve settings from configuration.
    pub fn from_config(config: &ValidatorConfig) -> Result<Self> {
        let ambiguous_policy = config
            .ambiguous_policy
            .parse::<AmbiguousPolicy>()
            .map_err(|e: String| indicator_common::Error::Config(e))?;

        Ok(Self {
            roster_path: config.roster_path(),
            results_dir: config.results_path(),
            groups: IndicatorGroup::parse_all(&config.groups)?,
            ambiguous_policy,
        })
    }
}

/// Checks result files for every (company, group) pair.
pub struct DataValidator {
    settings: ValidatorSettings,
}

impl DataValidator {
    pub fn new(settings: ValidatorSettings) -> Self {
        Self { settings }
    }

    /// Run the validation.
    ///
    /// Fails only when a prerequisite is missing (results directory, roster)
    /// or the roster cannot be parsed. Per-file problems end up in the report.
    pub fn run(&self) -> Result<ValidationReport> {
        let dir = ResultsDir::scan(&self.settings.results_dir)?;
        let roster = load_roster(&self.settings.roster_path)?;

        info!(
            companies = roster.len(),
            groups = self.settings.groups.len(),
            files = dir.file_count(),
            "Starting data file validation"
        );

        let mut lookups = 0usize;
        let mut companies = Vec::with_capacity(roster.len());

        for company in roster {
            let mut checks = Vec::with_capacity(self.settings.groups.len());

            for group in &self.settings.groups {
                lookups += 1;
                let outcome =
                    check_group(&dir, &company.ts_code, group, self.settings.ambiguous_policy)?;
                log_outcome(&company.ts_code, group, &outcome);
                checks.push(GroupCheck {
                    group: group.clone(),
                    outcome,
                });
            }

            companies.push(CompanyReport {
                ts_code: company.ts_code,
                name: company.name,
                checks,
            });
        }

        let report = ValidationReport {
            checked_at: Utc::now(),
            lookups,
            companies,
        };

        info!(
            lookups = report.lookups,
            missing = report.missing_total(),
            all_pass = report.all_pass(),
            "Data file validation finished"
        );
        Ok(report)
    }
}

fn log_outcome(ts_code: &str, group: &IndicatorGroup, outcome: &GroupOutcome) {
    match outcome {
        GroupOutcome::Pass { matches, .. } => {
            debug!(ts_code, group = %group, matches, "Group passed");
        }
        GroupOutcome::NoFile => {
            debug!(ts_code, group = %group, status = outcome.label(), "No result file");
        }
        GroupOutcome::Unreadable { path, error } => {
            warn!(ts_code, group = %group, path = %path.display(), error = %error, "Result file unreadable");
        }
        GroupOutcome::MissingKey { path } => {
            warn!(ts_code, group = %group, path = %path.display(), "Result file lacks group key");
        }
        GroupOutcome::Ambiguous { paths } => {
            warn!(ts_code, group = %group, matches = paths.len(), "Several result files match");
        }
    }
}
