//! Permission index
//!
//! Compiles a raw permission specification into an in-memory index:
//! identity → environment → set of authorized repositories.
//!
//! Two raw encodings are accepted and normalize to the same index shape:
//!
//! - **Tabular records**: one `user,environment,repo` record per line.
//! - **Per-user grant strings**: `user = "uat[repo1,repo2]|prod[repo1]"`,
//!   environments separated by `|`, repositories bracketed and
//!   comma-separated.
//!
//! Malformed entries are skipped with a diagnostic rather than failing the
//! whole build: a partially valid specification still yields a working index
//! for the unaffected grants.

use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Immutable identity → environment → repository-set index.
///
/// Built once at startup and shared read-only thereafter; repeated
/// identity/environment pairs accumulate repositories (union, not
/// replacement).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionIndex {
    grants: HashMap<String, HashMap<String, HashSet<String>>>,
}

impl PermissionIndex {
    /// Create an empty index (grants nothing)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from tabular records, one `user,environment,repo` per line.
    ///
    /// Blank lines are ignored. Records without exactly three non-empty
    /// fields are skipped with a warning.
    pub fn from_records(raw: &str) -> Self {
        let mut index = Self::new();

        for (lineno, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            match fields.as_slice() {
                [user, env, repo]
                    if !user.is_empty() && !env.is_empty() && !repo.is_empty() =>
                {
                    index.insert(user, env, repo);
                }
                _ => {
                    warn!(line = lineno + 1, record = line, "Skipping malformed permission record");
                }
            }
        }

        index
    }

    /// Build from per-user grant strings.
    ///
    /// Each value describes all of one user's grants as
    /// `env1[repo1,repo2]|env2[repo3]`. Grants with missing brackets, an
    /// empty environment name, or an empty repository list are skipped with
    /// a warning.
    pub fn from_user_grants(grants: &HashMap<String, String>) -> Self {
        let mut index = Self::new();

        for (user, encoded) in grants {
            for grant in encoded.split('|') {
                let grant = grant.trim();
                if grant.is_empty() {
                    continue;
                }
                match parse_grant(grant) {
                    Some((env, repos)) => {
                        for repo in repos {
                            index.insert(user, env, repo);
                        }
                    }
                    None => {
                        warn!(user = %user, grant = %grant, "Skipping malformed grant");
                    }
                }
            }
        }

        index
    }

    /// Record one (identity, environment, repository) grant
    fn insert(&mut self, user: &str, env: &str, repo: &str) {
        self.grants
            .entry(user.to_string())
            .or_default()
            .entry(env.to_string())
            .or_default()
            .insert(repo.to_string());
    }

    /// Whether the index holds an entry for this identity at all
    pub fn contains_user(&self, user: &str) -> bool {
        self.grants.contains_key(user)
    }

    /// Whether this identity may act on exactly this environment/repository.
    ///
    /// Exact string equality on both fields; no prefix, glob, or
    /// case-insensitive matching.
    pub fn allows(&self, user: &str, env: &str, repo: &str) -> bool {
        self.grants
            .get(user)
            .and_then(|envs| envs.get(env))
            .is_some_and(|repos| repos.contains(repo))
    }

    /// Number of identities with at least one grant
    pub fn user_count(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

/// Parse a single `env[repo1,repo2]` grant.
///
/// Returns the environment name and its non-empty repository names, or
/// `None` when the grant is malformed or names no repository.
fn parse_grant(grant: &str) -> Option<(&str, Vec<&str>)> {
    let open = grant.find('[')?;
    if !grant.ends_with(']') {
        return None;
    }

    let env = grant[..open].trim();
    if env.is_empty() {
        return None;
    }

    let repos: Vec<&str> = grant[open + 1..grant.len() - 1]
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .collect();

    // a grant naming zero repositories can never match anything
    if repos.is_empty() {
        return None;
    }

    Some((env, repos))
}
