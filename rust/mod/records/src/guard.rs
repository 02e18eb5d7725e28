//! Ownership and scope guard.
//!
//! Reads are org-wide: any caller scoped to the record's organization may
//! see it, owner or not. Mutations additionally require ownership. Org
//! mismatch is always reported as not-found, never as forbidden — a 403
//! would leak that the record exists in another tenant.

use promptdeck_core::{Identity, ServiceError};

/// What the caller is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Mutate,
}

/// How a resource reports an org-matching record owned by someone else.
/// The choice is fixed per resource and holds across its GET/PUT/DELETE
/// trio (see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerMismatch {
    /// Fold into 404 — callers cannot tell the record exists.
    Conceal,
    /// Report 403.
    Forbid,
}

/// Per-resource scoping policy.
#[derive(Debug, Clone, Copy)]
pub struct ScopePolicy {
    /// Human resource name used in error messages.
    pub resource: &'static str,
    pub owner_mismatch: OwnerMismatch,
}

impl ScopePolicy {
    pub fn not_found(&self) -> ServiceError {
        ServiceError::NotFound(format!("{} not found", self.resource))
    }
}

/// Decide whether `identity` may perform `action` on a record owned by
/// `record_user_id` in `record_org_id`, as seen from scope `org_id`.
///
/// Checks are ordered: org scope first, then ownership. Cross-org
/// requests never reach the ownership check.
pub fn authorize(
    identity: Option<&Identity>,
    org_id: i64,
    record_org_id: i64,
    record_user_id: &str,
    action: Action,
    policy: &ScopePolicy,
) -> Result<(), ServiceError> {
    if record_org_id != org_id {
        return Err(policy.not_found());
    }

    if action == Action::Read {
        return Ok(());
    }

    let identity = identity
        .ok_or_else(|| ServiceError::Unauthorized("Authentication required".to_string()))?;

    if identity.id != record_user_id {
        return Err(match policy.owner_mismatch {
            OwnerMismatch::Conceal => policy.not_found(),
            OwnerMismatch::Forbid => {
                ServiceError::Forbidden("Permission denied".to_string())
            }
        });
    }

    Ok(())
}
