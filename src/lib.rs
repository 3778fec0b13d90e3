//! Drone promotion gate
//!
//! A [Drone CI](https://www.drone.io/) validation webhook that authorizes
//! `promote` and `rollback` builds by user, target environment, and
//! repository.
//!
//! ## Features
//!
//! - **Restricted events only** — anything other than promote/rollback
//!   passes through untouched
//! - **Privileged users** exempt from fine-grained checks
//! - **Per-user grants** compiled once at startup from either of two
//!   encodings (tabular records or per-user grant strings)
//! - **Drone skip semantics** — a denial answers with HTTP 498 so the build
//!   is skipped, never errored
//! - **Flexible configuration** via TOML files and environment variables
//!
//! ## Example Configuration
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//! # secret from DRONE_SECRET env var
//!
//! [authz]
//! privileged_users = ["octopus", "admin"]
//! grants = """
//! johndoe,uat,repo1
//! johndoe,uat,repo2
//! lucifer,prod,repo1
//! """
//! ```

pub mod authz;
pub mod config;
pub mod error;
pub mod server;
pub mod util;

// Re-export main types
pub use authz::{AuthzRequest, Decision, PermissionIndex, PromotionGate};
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result, SkipError};
