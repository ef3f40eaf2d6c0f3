//! Indicator Validator Library
//!
//! Verifies that every company in the roster has, for each indicator group,
//! a result file that parses as JSON and carries a top-level key equal to the
//! group identifier.
//!
//! # Layout
//!
//! ```text
//! <data_root>/
//! └── data/
//!     ├── companies.json                      [{"ts_code": ..., "name": ...}, ...]
//!     └── calculation_results/companies/
//!         ├── 000001.SZ_indicators_7_11.json  {"7.11": {...}}
//!         └── ...
//! ```
//!
//! # Outcomes
//!
//! Each (company, group) lookup ends in exactly one of:
//! - **pass**: one file, parseable, holds the group key
//! - **no_file**: nothing matched `{ts_code}_indicators_{group}*.json`
//! - **unreadable**: read or JSON parse failure
//! - **missing_key**: parsed, but the group key is absent
//! - **ambiguous**: several files matched (default policy)
//!
//! A company is complete when none of its groups is missing; the run passes
//! when every company is complete.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod check;
pub mod error;
pub mod groups;
pub mod report;
pub mod roster;
pub mod validator;

pub use check::{check_group, AmbiguousPolicy, GroupOutcome, ResultsDir};
pub use error::{Result, ValidatorError};
pub use groups::{file_pattern, IndicatorGroup};
pub use report::{CompanyReport, GroupCheck, ReportSummary, ValidationReport};
pub use roster::{load_roster, Company};
pub use validator::{DataValidator, ValidatorSettings};
