//! Authorization module
//!
//! Gates promote and rollback builds by user, target environment, and
//! repository.
//!
//! ## Permission Model
//!
//! A request is evaluated in order:
//!
//! 1. **Unrestricted events** (anything other than `promote`/`rollback`) are
//!    allowed unconditionally.
//! 2. **Privileged users** may run restricted events against any
//!    environment/repository.
//! 3. **User-level grants** allow a restricted event when the triggering
//!    user holds a grant whose environment and repository both match the
//!    request exactly.
//! 4. Everything else is denied, which the host must treat as "skip the
//!    build", not as a failure.
//!
//! Grants are supplied wholesale at startup in one of two encodings and
//! compiled into an immutable [`PermissionIndex`]:
//!
//! ```toml
//! [authz]
//! privileged_users = ["octopus", "admin"]
//! grants = """
//! johndoe,uat,repo1
//! johndoe,uat,repo2
//! """
//!
//! # or, equivalently:
//! # [authz.user_grants]
//! # johndoe = "uat[repo1,repo2]"
//! ```

pub mod gate;
pub mod index;
pub mod types;

pub use gate::PromotionGate;
pub use index::PermissionIndex;
pub use types::{AuthzRequest, Decision, RestrictedEvent};
