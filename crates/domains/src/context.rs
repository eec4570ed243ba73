//! # Request Context
//!
//! Every service call receives the caller's identity explicitly instead of
//! reaching into ambient request or session state.

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, Result};
use crate::models::UserId;

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub id: UserId,
    pub username: String,
}

/// Per-request caller information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub viewer: Option<Viewer>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { viewer: None }
    }

    pub fn authenticated(viewer: Viewer) -> Self {
        Self { viewer: Some(viewer) }
    }

    pub fn is_authenticated(&self) -> bool {
        self.viewer.is_some()
    }

    pub fn viewer_id(&self) -> Option<UserId> {
        self.viewer.as_ref().map(|v| v.id)
    }

    /// Returns the viewer or fails with [`DomainError::Unauthenticated`].
    pub fn require_viewer(&self) -> Result<&Viewer> {
        self.viewer.as_ref().ok_or(DomainError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_context_is_rejected_where_login_is_required() {
        let ctx = RequestContext::anonymous();
        assert_eq!(ctx.require_viewer(), Err(DomainError::Unauthenticated));
        assert_eq!(ctx.viewer_id(), None);
    }

    #[test]
    fn authenticated_context_exposes_viewer() {
        let id = UserId::new();
        let ctx = RequestContext::authenticated(Viewer { id, username: "bia".into() });
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.require_viewer().unwrap().id, id);
    }
}
