use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The skill a wallet entry refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// The project the endorsement was earned on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
    pub title: String,
}

/// The graded submission behind the endorsement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRef {
    #[serde(default)]
    pub grade: Option<f64>,
}

/// Who signed off on the endorsement, typically a teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndorserRef {
    pub id: String,
    pub name: String,
}

/// One skill-endorsement record as served by the wallet endpoints.
///
/// Immutable once received. Every derived value -- maturity, tier,
/// groupings -- is computed on demand in `wallet::aggregate`, never stored
/// back onto the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEndorsement {
    pub id: String,
    pub skill: SkillRef,
    /// Assessed skill level, 0-10.
    pub level: u8,
    /// Progress toward the next level, 0-100 at the source.
    pub progress: f64,
    pub endorsement_date: DateTime<Utc>,
    pub project: ProjectRef,
    pub submission: SubmissionRef,
    pub endorsed_by: EndorserRef,
}

/// Display tier derived from a maturity score.
///
/// Variants are ordered lowest to highest so tier comparisons follow
/// maturity comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaturityTier {
    Novice,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl MaturityTier {
    /// Classify a maturity score.
    ///
    /// Breakpoints are closed on the lower bound: 80.0 is Expert, 60.0 is
    /// Advanced. This is the only place the thresholds live; both dashboard
    /// variants and the report classify through here.
    pub fn from_maturity(maturity: f64) -> Self {
        if maturity >= 80.0 {
            MaturityTier::Expert
        } else if maturity >= 60.0 {
            MaturityTier::Advanced
        } else if maturity >= 40.0 {
            MaturityTier::Intermediate
        } else if maturity >= 20.0 {
            MaturityTier::Beginner
        } else {
            MaturityTier::Novice
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaturityTier::Novice => "Novice",
            MaturityTier::Beginner => "Beginner",
            MaturityTier::Intermediate => "Intermediate",
            MaturityTier::Advanced => "Advanced",
            MaturityTier::Expert => "Expert",
        }
    }

    /// All tiers, lowest first. Handy for zero-filled tier counts.
    pub fn all() -> [MaturityTier; 5] {
        [
            MaturityTier::Novice,
            MaturityTier::Beginner,
            MaturityTier::Intermediate,
            MaturityTier::Advanced,
            MaturityTier::Expert,
        ]
    }
}

/// Endorsements sharing a skill category, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub skills: Vec<SkillEndorsement>,
}

/// Endorsements earned in one calendar year, most recent first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearGroup {
    pub year: i32,
    pub skills: Vec<SkillEndorsement>,
}

/// Endorsement count for one month, for activity charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeBucket {
    /// Display label, e.g. "Mar 2024".
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub count: usize,
}
