use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::types::{ChildRef, ProjectRecord};
use crate::session::Identity;
use crate::wallet::{CategoryGroup, MaturityTier, TimeBucket, YearGroup};

/// Wallet headline numbers shared by both dashboard variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletSummary {
    pub endorsement_count: usize,
    /// Mean maturity across the wallet; 0 for an empty wallet.
    pub average_maturity: f64,
    /// Endorsement count per tier, Novice through Expert, zero-filled.
    pub tier_counts: Vec<TierCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierCount {
    pub tier: MaturityTier,
    pub count: usize,
}

/// Read-only student dashboard shape handed to the shell.
#[derive(Debug, Clone, Serialize)]
pub struct StudentDashboardView {
    pub summary: WalletSummary,
    pub categories: Vec<CategoryGroup>,
    pub timeline: Vec<YearGroup>,
    pub activity: Vec<TimeBucket>,
    pub projects: Vec<ProjectRecord>,
    pub notifications: Vec<Value>,
}

/// One child's rollup on the parent dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ChildOverview {
    pub child: ChildRef,
    pub skill_count: usize,
    pub project_count: usize,
    pub average_maturity: f64,
    pub categories: Vec<CategoryGroup>,
}

/// Read-only parent dashboard shape handed to the shell.
#[derive(Debug, Clone, Serialize)]
pub struct ParentDashboardView {
    pub children: Vec<ChildOverview>,
    pub notifications: Vec<Value>,
    pub consents: Vec<Value>,
}

/// Downloadable progress report.
///
/// A pure projection of already-fetched records; building one performs no
/// fetches. Serialized camelCase to match the export format the backend's
/// other documents use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillReport {
    pub generated_at: DateTime<Utc>,
    pub parent: Identity,
    pub summary: ReportSummary,
    pub children: Vec<ChildReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub child_count: usize,
    pub total_skills: usize,
    pub total_projects: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildReport {
    pub child: ChildRef,
    pub skill_count: usize,
    pub project_count: usize,
    pub skills: Vec<SkillReportRow>,
    pub projects: Vec<ProjectReportRow>,
}

/// Per-skill detail line: raw fields plus the derived maturity, so the
/// exported document stands alone without re-running the derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillReportRow {
    pub name: String,
    pub category: String,
    pub level: u8,
    pub progress: f64,
    pub maturity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReportRow {
    pub title: String,
    pub status: String,
    pub grade: Option<f64>,
}
