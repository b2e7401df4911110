//! Runtime configuration from `SAFECELL_*` environment variables.
//!
//! Every setting has a default; unparseable or out-of-range values are
//! ignored with a warning.

use std::path::PathBuf;
use std::time::Duration;

use crate::application::{StoreLimits, DEFAULT_MAX_DETECTIONS, DEFAULT_MAX_LOGS};
use crate::domain::UserRole;

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite file backing the local store
    pub db_path: PathBuf,
    /// Base URL of the prediction service (`/predict/` is appended)
    pub prediction_url: String,
    /// Base URL of the detection archive (`/detection-data/` is appended)
    pub detections_url: String,
    pub prediction_timeout: Duration,
    pub archive_timeout: Duration,
    pub max_detections: usize,
    pub max_logs: usize,
    /// Directory receiving CSV/XLS exports
    pub export_dir: PathBuf,
    pub user_name: String,
    pub user_email: String,
    pub user_role: UserRole,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/safecell.db"),
            prediction_url: "http://localhost:8000".to_string(),
            detections_url: "http://localhost:5000".to_string(),
            prediction_timeout: Duration::from_secs(60),
            archive_timeout: Duration::from_secs(15),
            max_detections: DEFAULT_MAX_DETECTIONS,
            max_logs: DEFAULT_MAX_LOGS,
            export_dir: PathBuf::from("exports"),
            user_name: "Health Worker".to_string(),
            user_email: "worker@safecell.local".to_string(),
            user_role: UserRole::HealthWorker,
        }
    }
}

fn positive<T: std::str::FromStr + PartialOrd + Default>(name: &str, raw: &str) -> Option<T> {
    match raw.trim().parse::<T>() {
        Ok(v) if v > T::default() => Some(v),
        _ => {
            tracing::warn!("Ignoring invalid {}={:?}", name, raw);
            None
        }
    }
}

fn url(name: &str, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.starts_with("http://") || raw.starts_with("https://") {
        Some(raw.trim_end_matches('/').to_string())
    } else {
        tracing::warn!("Ignoring {}: not an http(s) URL", name);
        None
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = lookup("SAFECELL_DB_PATH").filter(|v| !v.trim().is_empty()) {
            cfg.db_path = PathBuf::from(v.trim());
        }
        if let Some(v) = lookup("SAFECELL_PREDICTION_URL").and_then(|v| url("SAFECELL_PREDICTION_URL", &v)) {
            cfg.prediction_url = v;
        }
        if let Some(v) = lookup("SAFECELL_DETECTIONS_URL").and_then(|v| url("SAFECELL_DETECTIONS_URL", &v)) {
            cfg.detections_url = v;
        }
        if let Some(v) = lookup("SAFECELL_PREDICTION_TIMEOUT_SECS")
            .and_then(|v| positive::<u64>("SAFECELL_PREDICTION_TIMEOUT_SECS", &v))
        {
            cfg.prediction_timeout = Duration::from_secs(v);
        }
        if let Some(v) = lookup("SAFECELL_MAX_DETECTIONS")
            .and_then(|v| positive::<usize>("SAFECELL_MAX_DETECTIONS", &v))
        {
            cfg.max_detections = v;
        }
        if let Some(v) = lookup("SAFECELL_MAX_LOGS").and_then(|v| positive::<usize>("SAFECELL_MAX_LOGS", &v)) {
            cfg.max_logs = v;
        }
        if let Some(v) = lookup("SAFECELL_EXPORT_DIR").filter(|v| !v.trim().is_empty()) {
            cfg.export_dir = PathBuf::from(v.trim());
        }
        if let Some(v) = lookup("SAFECELL_USER_NAME").filter(|v| !v.trim().is_empty()) {
            cfg.user_name = v.trim().to_string();
        }
        if let Some(v) = lookup("SAFECELL_USER_EMAIL").filter(|v| v.contains('@')) {
            cfg.user_email = v.trim().to_string();
        }
        if let Some(v) = lookup("SAFECELL_USER_ROLE") {
            match UserRole::parse(&v) {
                Some(role) => cfg.user_role = role,
                None => tracing::warn!("Ignoring unknown SAFECELL_USER_ROLE={:?}", v),
            }
        }

        cfg
    }

    /// Retention caps for the local store.
    #[must_use]
    pub fn store_limits(&self) -> StoreLimits {
        StoreLimits {
            max_detections: self.max_detections,
            max_logs: self.max_logs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config_from(&[]);
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.store_limits(), StoreLimits::default());
    }

    #[test]
    fn test_overrides() {
        let cfg = config_from(&[
            ("SAFECELL_DB_PATH", "/var/lib/safecell/store.db"),
            ("SAFECELL_PREDICTION_URL", "https://predict.example.rw/"),
            ("SAFECELL_MAX_DETECTIONS", "250"),
            ("SAFECELL_USER_ROLE", "admin"),
            ("SAFECELL_USER_NAME", "Claudine"),
        ]);
        assert_eq!(cfg.db_path, PathBuf::from("/var/lib/safecell/store.db"));
        assert_eq!(cfg.prediction_url, "https://predict.example.rw");
        assert_eq!(cfg.max_detections, 250);
        assert_eq!(cfg.user_role, UserRole::Admin);
        assert_eq!(cfg.user_name, "Claudine");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = config_from(&[
            ("SAFECELL_PREDICTION_URL", "ftp://nope"),
            ("SAFECELL_MAX_DETECTIONS", "0"),
            ("SAFECELL_MAX_LOGS", "lots"),
            ("SAFECELL_USER_ROLE", "nurse"),
            ("SAFECELL_USER_EMAIL", "no-at-sign"),
        ]);
        let defaults = AppConfig::default();
        assert_eq!(cfg.prediction_url, defaults.prediction_url);
        assert_eq!(cfg.max_detections, DEFAULT_MAX_DETECTIONS);
        assert_eq!(cfg.max_logs, DEFAULT_MAX_LOGS);
        assert_eq!(cfg.user_role, UserRole::HealthWorker);
        assert_eq!(cfg.user_email, defaults.user_email);
    }
}
