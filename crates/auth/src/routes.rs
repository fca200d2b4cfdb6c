use serde::Serialize;

use crate::{Role, RouteAccessRequirement, RouteGuard};

/// A guarded route prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub prefix: String,
    pub guard: RouteGuard,
}

/// Route guards attached at composition time.
///
/// Lookup picks the longest prefix that matches on a segment boundary, so
/// `/admin` covers `/admin/users` but not `/administration`.
#[derive(Debug, Clone, Serialize)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    fallback: RouteGuard,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    /// Empty table; unknown paths require authentication.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            fallback: RouteGuard::Protected(RouteAccessRequirement::none()),
        }
    }

    /// The portal's routes: public sign-in, the client area, and the admin console.
    pub fn portal() -> Self {
        Self::new()
            .route("/auth", RouteGuard::Public)
            .route("/onboarding", RouteGuard::Protected(RouteAccessRequirement::none()))
            .route("/dashboard", RouteGuard::Protected(RouteAccessRequirement::none()))
            .route("/profile", RouteGuard::ClientOnboarding)
            .route("/admin", RouteGuard::Protected(RouteAccessRequirement::admin()))
            .route("/clients", RouteGuard::Protected(RouteAccessRequirement::staff()))
            .route(
                "/press",
                RouteGuard::Protected(RouteAccessRequirement::roles([Role::Press, Role::Admin])),
            )
            .route(
                "/research",
                RouteGuard::Protected(RouteAccessRequirement::roles([Role::Research, Role::Admin])),
            )
            .route(
                "/papers",
                RouteGuard::Protected(RouteAccessRequirement::roles([Role::Paper, Role::Admin])),
            )
    }

    /// Attach `guard` to `prefix`, replacing any guard already there.
    pub fn route(mut self, prefix: impl Into<String>, guard: RouteGuard) -> Self {
        let prefix = normalize(&prefix.into());
        match self.entries.iter_mut().find(|e| e.prefix == prefix) {
            Some(entry) => entry.guard = guard,
            None => self.entries.push(RouteEntry { prefix, guard }),
        }
        self
    }

    pub fn with_fallback(mut self, guard: RouteGuard) -> Self {
        self.fallback = guard;
        self
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn guard_for(&self, path: &str) -> &RouteGuard {
        let path = normalize(path);
        self.entries
            .iter()
            .filter(|e| covers(&e.prefix, &path))
            .max_by_key(|e| e.prefix.len())
            .map(|e| &e.guard)
            .unwrap_or(&self.fallback)
    }
}

fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn covers(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
