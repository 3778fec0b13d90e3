//! Authorization types
//!
//! Core types used by the promotion gate.

use serde::Deserialize;
use std::fmt;

/// Build event kinds that require authorization before proceeding.
///
/// Every other event (push, pull_request, tag, cron, ...) bypasses the
/// permission system entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestrictedEvent {
    Promote,
    Rollback,
}

impl RestrictedEvent {
    /// Get the event name as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            RestrictedEvent::Promote => "promote",
            RestrictedEvent::Rollback => "rollback",
        }
    }

    /// Try to parse a restricted event from a raw event string
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "promote" => Some(RestrictedEvent::Promote),
            "rollback" => Some(RestrictedEvent::Rollback),
            _ => None,
        }
    }

    /// Get all restricted events
    pub const fn all() -> &'static [RestrictedEvent] {
        &[RestrictedEvent::Promote, RestrictedEvent::Rollback]
    }
}

impl fmt::Display for RestrictedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One build action to be authorized.
///
/// All fields are opaque strings compared by exact equality; the gate
/// neither mutates nor retains a request beyond the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthzRequest {
    /// Raw build event (e.g. "push", "promote", "rollback")
    pub event: String,
    /// Identity that triggered the build
    pub trigger: String,
    /// Target deployment environment
    pub environment: String,
    /// Repository the build belongs to
    pub repo: String,
}

impl AuthzRequest {
    pub fn new(
        event: impl Into<String>,
        trigger: impl Into<String>,
        environment: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            event: event.into(),
            trigger: trigger.into(),
            environment: environment.into(),
            repo: repo.into(),
        }
    }

    /// Whether this request's event requires authorization at all
    pub fn is_restricted(&self) -> bool {
        RestrictedEvent::try_parse(&self.event).is_some()
    }
}

/// Result of an authorization check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The build may proceed
    Allow,
    /// The build must be skipped, with a reason
    Deny(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Decision::Deny(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restricted_event_roundtrip() {
        for event in RestrictedEvent::all() {
            let s = event.as_str();
            let parsed = RestrictedEvent::try_parse(s).unwrap();
            assert_eq!(*event, parsed);
        }
    }

    #[test]
    fn test_unrestricted_events_do_not_parse() {
        for event in ["push", "pull_request", "tag", "cron", ""] {
            assert!(RestrictedEvent::try_parse(event).is_none());
        }
    }

    #[test]
    fn test_request_is_restricted() {
        assert!(AuthzRequest::new("promote", "johndoe", "uat", "repo1").is_restricted());
        assert!(AuthzRequest::new("rollback", "johndoe", "uat", "repo1").is_restricted());
        assert!(!AuthzRequest::new("push", "johndoe", "", "repo1").is_restricted());
    }

    #[test]
    fn test_decision_predicates() {
        assert!(Decision::Allow.is_allowed());
        assert!(!Decision::Allow.is_denied());
        assert!(Decision::Deny("no grant".into()).is_denied());
        assert!(!Decision::Deny("no grant".into()).is_allowed());
    }
}
