//! Composition of aggregator output and pass-through backend records into
//! the student view, the parent view, and the report payload.
//!
//! Everything here is pure: all inputs are already-resolved in-memory
//! records, and no function performs a fetch. If a dashboard fetch failed
//! upstream, the whole view errors there -- these functions never see
//! partial data.

use chrono::Utc;
use serde_json::Value;

use crate::api::types::{ChildDetailPayload, ProjectRecord};
use crate::session::Identity;
use crate::wallet::{
    self, MaturityTier, SkillEndorsement,
};

use super::types::{
    ChildOverview, ChildReport, ParentDashboardView, ProjectReportRow, ReportSummary,
    SkillReport, SkillReportRow, StudentDashboardView, TierCount, WalletSummary,
};

/// Headline numbers for a wallet: endorsement count, mean maturity, and a
/// zero-filled per-tier breakdown.
pub fn wallet_summary(skills: &[SkillEndorsement]) -> WalletSummary {
    let endorsement_count = skills.len();
    let average_maturity = if skills.is_empty() {
        0.0
    } else {
        skills.iter().map(wallet::maturity).sum::<f64>() / skills.len() as f64
    };

    let tier_counts = MaturityTier::all()
        .into_iter()
        .map(|tier| TierCount {
            tier,
            count: skills
                .iter()
                .filter(|s| MaturityTier::from_maturity(wallet::maturity(s)) == tier)
                .count(),
        })
        .collect();

    WalletSummary {
        endorsement_count,
        average_maturity,
        tier_counts,
    }
}

/// Build the student dashboard from the student's own wallet plus the
/// pass-through collaborator records.
pub fn compose_student_view(
    skills: &[SkillEndorsement],
    projects: Vec<ProjectRecord>,
    notifications: Vec<Value>,
) -> StudentDashboardView {
    StudentDashboardView {
        summary: wallet_summary(skills),
        categories: wallet::group_by_category(skills),
        timeline: wallet::group_by_year(skills),
        activity: wallet::time_series(skills),
        projects,
        notifications,
    }
}

/// Build the parent dashboard from the fetched per-child details plus the
/// pass-through collaborator records.
pub fn compose_parent_view(
    children: &[ChildDetailPayload],
    notifications: Vec<Value>,
    consents: Vec<Value>,
) -> ParentDashboardView {
    let children = children
        .iter()
        .map(|detail| {
            let summary = wallet_summary(&detail.skills);
            ChildOverview {
                child: detail.child.clone(),
                skill_count: detail.skills.len(),
                project_count: detail.projects.len(),
                average_maturity: summary.average_maturity,
                categories: wallet::group_by_category(&detail.skills),
            }
        })
        .collect();

    ParentDashboardView {
        children,
        notifications,
        consents,
    }
}

/// Project the fetched records into the downloadable report payload.
pub fn build_report(parent: &Identity, children: &[ChildDetailPayload]) -> SkillReport {
    let child_reports: Vec<ChildReport> = children
        .iter()
        .map(|detail| ChildReport {
            child: detail.child.clone(),
            skill_count: detail.skills.len(),
            project_count: detail.projects.len(),
            skills: detail
                .skills
                .iter()
                .map(|s| SkillReportRow {
                    name: s.skill.name.clone(),
                    category: s
                        .skill
                        .category
                        .clone()
                        .unwrap_or_else(|| wallet::UNCATEGORIZED.to_string()),
                    level: s.level,
                    progress: s.progress,
                    maturity: wallet::maturity(s),
                })
                .collect(),
            projects: detail
                .projects
                .iter()
                .map(|p| ProjectReportRow {
                    title: p.title.clone(),
                    status: p.status.clone(),
                    grade: p.grade,
                })
                .collect(),
        })
        .collect();

    let summary = ReportSummary {
        child_count: child_reports.len(),
        total_skills: child_reports.iter().map(|c| c.skill_count).sum(),
        total_projects: child_reports.iter().map(|c| c.project_count).sum(),
    };

    SkillReport {
        generated_at: Utc::now(),
        parent: parent.clone(),
        summary,
        children: child_reports,
    }
}
