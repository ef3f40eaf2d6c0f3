//! Validation report aggregation and rendering.

use chrono::{DateTime, Utc};
use console::style;
use serde::{Deserialize, Serialize};

use crate::check::GroupOutcome;
use crate::groups::IndicatorGroup;

/// Result of checking one group for one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCheck {
    pub group: IndicatorGroup,
    #[serde(flatten)]
    pub outcome: GroupOutcome,
}

/// All group checks for one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyReport {
    pub ts_code: String,
    pub name: String,
    pub checks: Vec<GroupCheck>,
}

impl CompanyReport {
    /// Groups that did not pass, in catalogue order.
    pub fn missing_groups(&self) -> Vec<&IndicatorGroup> {
        self.checks
            .iter()
            .filter(|c| !c.outcome.is_pass())
            .map(|c| &c.group)
            .collect()
    }

    /// A company is complete when no group is missing.
    pub fn is_complete(&self) -> bool {
        self.checks.iter().all(|c| c.outcome.is_pass())
    }
}

/// Report for a whole validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// When the run finished
    pub checked_at: DateTime<Utc>,
    /// Number of (company, group) lookups performed
    pub lookups: usize,
    /// Per-company results, in roster order
    pub companies: Vec<CompanyReport>,
}

/// Counts derived from a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub companies: usize,
    pub complete_companies: usize,
    pub lookups: usize,
    pub missing_groups: usize,
    pub all_pass: bool,
}

impl ValidationReport {
    /// Every company is complete. An empty roster passes.
    pub fn all_pass(&self) -> bool {
        self.companies.iter().all(CompanyReport::is_complete)
    }

    /// Total missing (company, group) pairs.
    pub fn missing_total(&self) -> usize {
        self.companies.iter().map(|c| c.missing_groups().len()).sum()
    }

    /// Summary counts.
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            companies: self.companies.len(),
            complete_companies: self.companies.iter().filter(|c| c.is_complete()).count(),
            lookups: self.lookups,
            missing_groups: self.missing_total(),
            all_pass: self.all_pass(),
        }
    }

    /// Serialize the report with its summary as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct Document<'a> {
            summary: ReportSummary,
            #[serde(flatten)]
            report: &'a ValidationReport,
        }

        serde_json::to_string_pretty(&Document {
            summary: self.summary(),
            report: self,
        })
    }

    /// Human-readable console report.
    pub fn to_text_report(&self) -> String {
        let mut report = String::new();

        report.push_str(&format!("测试 {} 家公司的数据文件...\n", self.companies.len()));

        for company in &self.companies {
            report.push_str(&format!(
                "\n测试公司: {} ({})\n",
                company.name, company.ts_code
            ));

            for check in &company.checks {
                report.push_str(&format_check_line(check));
                report.push('\n');
            }

            let missing = company.missing_groups();
            if missing.is_empty() {
                report.push_str(&format!("  {} 所有指标组文件完整\n", style("✅").green()));
            } else {
                let list: Vec<&str> = missing.iter().map(|g| g.as_str()).collect();
                report.push_str(&format!(
                    "  {} 缺失 {} 个指标组: [{}]\n",
                    style("❌").red(),
                    missing.len(),
                    list.join(", ")
                ));
            }
        }

        if self.all_pass() {
            report.push_str("\n🎉 所有公司的数据文件测试通过!\n");
        } else {
            report.push_str("\n⚠️  部分公司的数据文件缺失，请检查计算脚本\n");
        }

        report
    }
}

/// One per-group line; each failure cause has its own wording.
fn format_check_line(check: &GroupCheck) -> String {
    let group = check.group.as_str();
    match &check.outcome {
        GroupOutcome::Pass { matches, .. } => {
            format!("  通过 {group}: 找到 {matches} 个文件, 数据有效")
        }
        GroupOutcome::NoFile => {
            format!("  {} {group}: 未找到文件", style("缺失").red())
        }
        GroupOutcome::Unreadable { path, error } => format!(
            "  {} {group}: 文件读取失败 ({}): {error}",
            style("❌").red(),
            path.display()
        ),
        GroupOutcome::MissingKey { path } => format!(
            "  {} {group}: 文件存在但数据结构异常 ({})",
            style("警告").yellow(),
            path.display()
        ),
        GroupOutcome::Ambiguous { paths } => format!(
            "  {} {group}: 匹配到 {} 个文件, 无法确定使用哪一个",
            style("警告").yellow(),
            paths.len()
        ),
    }
}
