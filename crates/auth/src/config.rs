//! Redirect targets used by the gate.

use anyhow::Context;
use serde::Deserialize;

use portal_core::{DomainError, DomainResult};

pub const AUTH_PATH_VAR: &str = "PORTAL_AUTH_PATH";
pub const DASHBOARD_PATH_VAR: &str = "PORTAL_DASHBOARD_PATH";
pub const ONBOARDING_PATH_VAR: &str = "PORTAL_ONBOARDING_PATH";

/// Well-known application paths.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RoutePaths {
    /// Where anonymous visitors are sent.
    pub auth: String,
    /// Where actors lacking a route's role requirement are sent.
    pub dashboard: String,
    /// Onboarding wizard root. Also the prefix exempt from the onboarding redirect.
    pub onboarding: String,
}

impl Default for RoutePaths {
    fn default() -> Self {
        Self {
            auth: "/auth".to_string(),
            dashboard: "/dashboard".to_string(),
            onboarding: "/onboarding".to_string(),
        }
    }
}

impl RoutePaths {
    /// Load paths from the environment; unset variables keep their defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load paths through `lookup`, keyed by the `PORTAL_*_PATH` variable names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let paths = Self {
            auth: lookup(AUTH_PATH_VAR).unwrap_or(defaults.auth),
            dashboard: lookup(DASHBOARD_PATH_VAR).unwrap_or(defaults.dashboard),
            onboarding: lookup(ONBOARDING_PATH_VAR).unwrap_or(defaults.onboarding),
        };
        paths
            .validate()
            .context("invalid route paths in environment")?;
        Ok(paths)
    }

    pub fn validate(&self) -> DomainResult<()> {
        for (name, path) in [
            ("auth", &self.auth),
            ("dashboard", &self.dashboard),
            ("onboarding", &self.onboarding),
        ] {
            if !path.starts_with('/') {
                return Err(DomainError::validation(format!(
                    "{name} path must start with '/', got '{path}'"
                )));
            }
        }
        // Every path starts with the root, which would exempt all routes.
        if self.onboarding.trim_end_matches('/').is_empty() {
            return Err(DomainError::validation(
                "onboarding path cannot be the site root",
            ));
        }
        Ok(())
    }

    pub fn is_onboarding_path(&self, path: &str) -> bool {
        path.starts_with(self.onboarding.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let paths = RoutePaths::default();
        assert!(paths.validate().is_ok());
        assert_eq!(paths.auth, "/auth");
    }

    #[test]
    fn relative_or_empty_paths_are_rejected() {
        let mut paths = RoutePaths::default();
        paths.dashboard = "dashboard".to_string();
        assert!(matches!(paths.validate(), Err(DomainError::Validation(_))));

        paths.dashboard = String::new();
        assert!(paths.validate().is_err());
    }

    #[test]
    fn root_onboarding_path_is_rejected() {
        for root in ["/", "//"] {
            let paths = RoutePaths {
                onboarding: root.to_string(),
                ..RoutePaths::default()
            };
            assert_eq!(
                paths.validate(),
                Err(DomainError::validation("onboarding path cannot be the site root"))
            );
        }
    }

    #[test]
    fn lookup_applies_overrides_and_keeps_defaults() {
        let paths = RoutePaths::from_lookup(|name| {
            (name == DASHBOARD_PATH_VAR).then(|| "/home".to_string())
        })
        .unwrap();

        assert_eq!(paths.dashboard, "/home");
        assert_eq!(paths.auth, "/auth");
        assert_eq!(paths.onboarding, "/onboarding");
    }

    #[test]
    fn invalid_lookup_value_carries_context() {
        let err = RoutePaths::from_lookup(|name| {
            (name == AUTH_PATH_VAR).then(|| "login".to_string())
        })
        .unwrap_err();

        assert_eq!(err.to_string(), "invalid route paths in environment");
        let cause = err.downcast_ref::<DomainError>().unwrap();
        assert!(matches!(cause, DomainError::Validation(msg) if msg.contains("'login'")));
    }

    // The only test in this crate that touches the process environment.
    #[test]
    fn from_env_reads_portal_variables() {
        // SAFETY: no other test in this crate reads or writes environment
        // variables, so nothing observes them concurrently.
        unsafe {
            std::env::remove_var(AUTH_PATH_VAR);
            std::env::remove_var(DASHBOARD_PATH_VAR);
            std::env::set_var(ONBOARDING_PATH_VAR, "/welcome");
        }
        let paths = RoutePaths::from_env().unwrap();
        assert_eq!(paths.onboarding, "/welcome");
        assert_eq!(paths.auth, "/auth");

        unsafe { std::env::set_var(ONBOARDING_PATH_VAR, "/") };
        let err = RoutePaths::from_env().unwrap_err();
        assert!(format!("{err:#}").contains("site root"));

        unsafe { std::env::remove_var(ONBOARDING_PATH_VAR) };
        assert_eq!(RoutePaths::from_env().unwrap(), RoutePaths::default());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let paths: RoutePaths = serde_json::from_str(r#"{"auth":"/login"}"#).unwrap();
        assert_eq!(paths.auth, "/login");
        assert_eq!(paths.onboarding, "/onboarding");
    }

    #[test]
    fn onboarding_prefix_covers_nested_steps() {
        let paths = RoutePaths::default();
        assert!(paths.is_onboarding_path("/onboarding"));
        assert!(paths.is_onboarding_path("/onboarding/step-2"));
        assert!(!paths.is_onboarding_path("/dashboard"));
    }
}
