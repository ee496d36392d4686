pub mod client;
pub mod types;

pub use client::{ApiClient, ACTIVE_ROLE_HEADER};
pub use types::{
    ChildDetailPayload, ChildRef, LoginPayload, LoginRequest, ParentDashboardPayload,
    ProjectRecord, StudentDashboardPayload, WalletPayload,
};
