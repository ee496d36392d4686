//! The skill wallet: endorsement records and the pure aggregation engine
//! that derives maturity scores, tiers, and groupings from them.
//!
//! Aggregation never validates its input -- malformed records degrade
//! (a missing category falls into a default bucket) rather than error;
//! validation is the producing backend's job.

pub mod aggregate;
pub mod types;

pub use aggregate::{
    category_distribution, group_by_category, group_by_year, maturity, time_series,
    UNCATEGORIZED,
};
pub use types::{
    CategoryGroup, EndorserRef, MaturityTier, ProjectRef, SkillEndorsement, SkillRef,
    SubmissionRef, TimeBucket, YearGroup,
};
