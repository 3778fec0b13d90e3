//! Promotion gate
//!
//! Evaluates whether one build request may proceed, against the privileged
//! user list and the compiled [`PermissionIndex`].
//!
//! Evaluation order:
//! 1. Events outside {promote, rollback} are allowed unconditionally.
//! 2. Privileged users may act on any environment/repository.
//! 3. Otherwise the trigger needs an index grant matching the target
//!    environment and repository exactly.
//!
//! The gate is immutable after construction and safe to share across any
//! number of concurrent callers.

use crate::authz::index::PermissionIndex;
use crate::authz::types::{AuthzRequest, Decision};
use crate::config::AuthzConfig;
use crate::error::SkipError;
use std::collections::HashSet;
use tracing::debug;

/// Authorization gate for promote and rollback builds
#[derive(Debug, Clone)]
pub struct PromotionGate {
    /// Users exempt from fine-grained checks for restricted events
    privileged: HashSet<String>,
    /// Per-user environment/repository grants
    index: PermissionIndex,
}

impl PromotionGate {
    /// Create a gate from a privileged user list and a built index
    pub fn new<I, S>(privileged_users: I, index: PermissionIndex) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            privileged: privileged_users.into_iter().map(Into::into).collect(),
            index,
        }
    }

    /// Build a gate from configuration, compiling whichever grant encoding
    /// is present
    pub fn from_config(config: &AuthzConfig) -> Self {
        let index = if let Some(records) = &config.grants {
            PermissionIndex::from_records(records)
        } else if !config.user_grants.is_empty() {
            PermissionIndex::from_user_grants(&config.user_grants)
        } else {
            PermissionIndex::new()
        };

        Self::new(config.privileged_users.iter().cloned(), index)
    }

    /// Number of privileged users
    pub fn privileged_count(&self) -> usize {
        self.privileged.len()
    }

    /// Number of users with fine-grained grants
    pub fn granted_user_count(&self) -> usize {
        self.index.user_count()
    }

    /// Decide whether a build request may proceed.
    ///
    /// Read-only and bounded-time; the outcome does not depend on any
    /// iteration order over the index.
    pub fn validate(&self, req: &AuthzRequest) -> Decision {
        if !req.is_restricted() {
            debug!(
                event = %req.event,
                trigger = %req.trigger,
                "Event requires no authorization"
            );
            return Decision::Allow;
        }

        if self.privileged.contains(&req.trigger) {
            debug!(
                trigger = %req.trigger,
                event = %req.event,
                environment = %req.environment,
                repo = %req.repo,
                "Authorized as privileged user"
            );
            return Decision::Allow;
        }

        if self.index.allows(&req.trigger, &req.environment, &req.repo) {
            debug!(
                trigger = %req.trigger,
                event = %req.event,
                environment = %req.environment,
                repo = %req.repo,
                "Authorized by user-level grant"
            );
            return Decision::Allow;
        }

        let reason = if self.index.contains_user(&req.trigger) {
            format!(
                "user '{}' has no grant for repo '{}' in environment '{}'",
                req.trigger, req.repo, req.environment
            )
        } else {
            format!("user '{}' has no grants", req.trigger)
        };

        debug!(
            trigger = %req.trigger,
            event = %req.event,
            environment = %req.environment,
            repo = %req.repo,
            reason = %reason,
            "Denied"
        );
        Decision::Deny(reason)
    }

    /// Decide, surfacing Deny as a [`SkipError`].
    ///
    /// Deny is a normal outcome instructing the host to skip the build, not
    /// an evaluation failure; callers must be able to tell the two apart.
    pub fn require(&self, req: &AuthzRequest) -> Result<(), SkipError> {
        match self.validate(req) {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(SkipError::new(&req.trigger, &req.event, reason)),
        }
    }
}
