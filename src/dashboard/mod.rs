//! Dashboard composition: turns aggregator output and pass-through backend
//! records into the two read-only view models and the exportable report.

pub mod composer;
pub mod report;
pub mod types;

pub use composer::{build_report, compose_parent_view, compose_student_view, wallet_summary};
pub use report::write_report;
pub use types::{
    ChildOverview, ChildReport, ParentDashboardView, ProjectReportRow, ReportSummary,
    SkillReport, SkillReportRow, StudentDashboardView, TierCount, WalletSummary,
};
