//! Route deduplication.
//!
//! The two extraction strategies disagree on what makes a route unique: the annotation-aware
//! strategy treats `(method, path)` as the identity, while the generic strategy also keys on the
//! origin file so the same path served from two files is reported twice. Both behaviors are
//! kept and selected through [`DedupKey`].

use super::{HttpMethod, Route};
use std::collections::HashSet;

/// Composite key used to decide whether two routes are duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupKey {
    /// `(method, path)`
    MethodPath,
    /// `(method, path, file)`
    MethodPathFile,
}

/// Keep the first occurrence of every key, preserving first-seen order.
pub fn dedup_routes(routes: Vec<Route>, key: DedupKey) -> Vec<Route> {
    let before = routes.len();
    let mut seen: HashSet<(HttpMethod, String, Option<String>)> = HashSet::new();

    let unique: Vec<Route> = routes
        .into_iter()
        .filter(|route| {
            let file = match key {
                DedupKey::MethodPath => None,
                DedupKey::MethodPathFile => Some(route.file.clone()),
            };
            seen.insert((route.method, route.path.clone(), file))
        })
        .collect();

    log::debug!("Deduplicated {} routes into {} ({:?})", before, unique.len(), key);
    unique
}
