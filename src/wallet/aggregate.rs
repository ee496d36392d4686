//! Pure aggregation over skill-endorsement records.
//!
//! Every function takes a borrowed slice and leaves it untouched; where an
//! ordering is produced it is built on defensive copies. Both dashboard
//! variants and the report build on these functions, so maturity math,
//! tier thresholds, and grouping rules live in exactly one place.

use std::collections::HashMap;

use chrono::Datelike;

use super::types::{CategoryGroup, SkillEndorsement, TimeBucket, YearGroup};

/// Bucket name for endorsements whose skill carries no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Maturity score for a single endorsement: `level * 10 + progress`.
///
/// Deliberately not rounded and not clamped: progress above 100 at the
/// source pushes the score above the nominal ceiling and that is surfaced
/// as-is. Display layers clamp and round for themselves.
pub fn maturity(endorsement: &SkillEndorsement) -> f64 {
    endorsement.level as f64 * 10.0 + endorsement.progress
}

/// Group endorsements by skill category.
///
/// Bucket order follows first appearance in the input; relative order
/// within a bucket is input order. Records without a category land in the
/// literal "Uncategorized" bucket. Every input record appears in exactly
/// one bucket.
pub fn group_by_category(skills: &[SkillEndorsement]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for endorsement in skills {
        let category = endorsement
            .skill
            .category
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        match groups.iter_mut().find(|g| g.category == category) {
            Some(group) => group.skills.push(endorsement.clone()),
            None => groups.push(CategoryGroup {
                category,
                skills: vec![endorsement.clone()],
            }),
        }
    }
    groups
}

/// Group endorsements by calendar year for the timeline view: years
/// descending, endorsements within a year most recent first.
pub fn group_by_year(skills: &[SkillEndorsement]) -> Vec<YearGroup> {
    let mut groups: Vec<YearGroup> = Vec::new();
    for endorsement in skills {
        let year = endorsement.endorsement_date.year();
        match groups.iter_mut().find(|g| g.year == year) {
            Some(group) => group.skills.push(endorsement.clone()),
            None => groups.push(YearGroup {
                year,
                skills: vec![endorsement.clone()],
            }),
        }
    }
    groups.sort_by(|a, b| b.year.cmp(&a.year));
    for group in &mut groups {
        group
            .skills
            .sort_by(|a, b| b.endorsement_date.cmp(&a.endorsement_date));
    }
    groups
}

/// Month-bucketed endorsement counts for activity charts, sorted strictly
/// ascending chronologically.
///
/// Note the direction: this is the opposite ordering from the timeline
/// view, so the two sorts are kept as separate code paths rather than one
/// parameterized routine applied twice.
pub fn time_series(skills: &[SkillEndorsement]) -> Vec<TimeBucket> {
    let mut buckets: Vec<TimeBucket> = Vec::new();
    for endorsement in skills {
        let date = endorsement.endorsement_date;
        let (year, month) = (date.year(), date.month());
        match buckets.iter_mut().find(|b| b.year == year && b.month == month) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(TimeBucket {
                label: date.format("%b %Y").to_string(),
                year,
                month,
                count: 1,
            }),
        }
    }
    buckets.sort_by_key(|b| (b.year, b.month));
    buckets
}

/// Endorsement counts per category. Unordered; consumers sort however
/// they display it.
pub fn category_distribution(skills: &[SkillEndorsement]) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for endorsement in skills {
        let category = endorsement
            .skill
            .category
            .as_deref()
            .unwrap_or(UNCATEGORIZED);
        *counts.entry(category.to_string()).or_insert(0) += 1;
    }
    counts
}
