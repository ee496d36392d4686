//! Wire types for the SkillWallet backend. Shapes mirror the server's
//! camelCase JSON; fields the client never reads stay server-side.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::session::Identity;
use crate::wallet::SkillEndorsement;

/// Body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response from `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub access_token: String,
    pub user: Identity,
}

/// A project assignment as served by the dashboards.
///
/// Only the fields the views and the report actually project are typed;
/// the record is otherwise pass-through data computed server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub grade: Option<f64>,
}

/// Response from `GET /student-dashboard/my-dashboard`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentDashboardPayload {
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
    #[serde(default)]
    pub notifications: Vec<Value>,
}

/// A child as listed on the parent dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildRef {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

/// Response from `GET /parent-dashboard/my-dashboard`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParentDashboardPayload {
    #[serde(default)]
    pub children: Vec<ChildRef>,
    #[serde(default)]
    pub notifications: Vec<Value>,
    #[serde(default)]
    pub consents: Vec<Value>,
}

/// Response from `GET /parent-dashboard/children/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChildDetailPayload {
    pub child: ChildRef,
    #[serde(default)]
    pub skills: Vec<SkillEndorsement>,
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
}

/// Response from `GET /skill-wallet/my-wallet` and
/// `GET /skill-wallet/student/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletPayload {
    #[serde(default)]
    pub endorsements: Vec<SkillEndorsement>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;

    #[test]
    fn test_login_payload_decodes_camel_case() {
        let json = r#"{
            "accessToken": "tok-abc",
            "user": {
                "id": "u-1",
                "email": "kim@example.com",
                "roles": ["Parent"]
            }
        }"#;
        let payload: LoginPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.access_token, "tok-abc");
        assert_eq!(payload.user.roles, vec![Role::Parent]);
    }

    #[test]
    fn test_wallet_payload_decodes_endorsement_record() {
        let json = r#"{
            "endorsements": [{
                "id": "e-1",
                "skill": { "id": "s-1", "name": "Soldering", "category": "Electronics" },
                "level": 7,
                "progress": 45.5,
                "endorsementDate": "2024-05-02T09:30:00Z",
                "project": { "id": "p-1", "title": "LED Badge" },
                "submission": { "grade": 92.0 },
                "endorsedBy": { "id": "t-1", "name": "Ms. Larsen" }
            }]
        }"#;
        let payload: WalletPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.endorsements.len(), 1);
        let e = &payload.endorsements[0];
        assert_eq!(e.skill.category.as_deref(), Some("Electronics"));
        assert_eq!(e.level, 7);
        assert_eq!(e.submission.grade, Some(92.0));
    }

    #[test]
    fn test_dashboard_payloads_tolerate_missing_collections() {
        let student: StudentDashboardPayload = serde_json::from_str("{}").unwrap();
        assert!(student.projects.is_empty());
        assert!(student.notifications.is_empty());

        let parent: ParentDashboardPayload = serde_json::from_str("{}").unwrap();
        assert!(parent.children.is_empty());
        assert!(parent.consents.is_empty());
    }
}
