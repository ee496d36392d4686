//! Role-based view gating.

use crate::session::{Role, Session};

/// Decide whether a protected view may render for the given session.
///
/// An empty `required_roles` set means "any authenticated user". Otherwise
/// the session's ACTIVE role must be one of the required roles: holding a
/// qualifying role without having switched to it is not enough -- access is
/// scoped to the role the user currently operates under, not to the full
/// identity. Redirecting on denial is the caller's job, and the caller does
/// not distinguish missing-auth from wrong-role.
pub fn can_access(session: &Session, required_roles: &[Role]) -> bool {
    if session.token.is_none() {
        return false;
    }
    if required_roles.is_empty() {
        return true;
    }
    match &session.active_role {
        Some(role) => required_roles.contains(role),
        None => false,
    }
}
