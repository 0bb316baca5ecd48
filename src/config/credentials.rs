//! Admin API credential discovery
//!
//! Credentials live in a profile-keyed `credentials.json`:
//!
//! ```json
//! {
//!     "default": {
//!         "admin_api_url": "http://localhost:8001",
//!         "headers": { "apikey": "..." }
//!     }
//! }
//! ```
//!
//! The file is searched across a fixed list of directories (project-local
//! first, then the home directory). An explicit `--admin-url` flag or a URL
//! in the config file takes precedence over anything discovered here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_PROFILE: &str = "default";

const CREDENTIALS_FILE_NAME: &str = "credentials.json";
const SEARCH_DIRECTORIES: &[&str] = &["./.gateway", "~/.gateway"];

/// Admin API endpoint plus the headers sent with every request
#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    pub admin_api_url: String,

    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Credentials {
    /// Credentials carrying a bare URL and no extra headers
    pub fn from_url(admin_api_url: impl Into<String>) -> Self {
        Self {
            admin_api_url: admin_api_url.into(),
            headers: HashMap::new(),
        }
    }
}

/// Expand a leading `~` to the user's home directory.
fn resolve_path(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// First existing credentials file across the given directories.
fn find_file(directories: &[&str], file_name: &str) -> Option<PathBuf> {
    directories
        .iter()
        .map(|dir| resolve_path(dir).join(file_name))
        .find(|candidate| candidate.exists())
}

/// Load one profile from a credentials file.
pub fn load_credentials(path: &Path, profile: &str) -> Result<Credentials> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "cannot read credentials file {}: {e}",
            path.display()
        ))
    })?;

    let mut profiles: HashMap<String, Credentials> = serde_json::from_str(&raw).map_err(|e| {
        Error::Config(format!(
            "cannot parse credentials file {}: {e}",
            path.display()
        ))
    })?;

    profiles.remove(profile).ok_or_else(|| {
        Error::Config(format!(
            "profile \"{profile}\" not found in {}",
            path.display()
        ))
    })
}

/// Search the default directories for a credentials file and load the given
/// profile. `Ok(None)` means no file exists anywhere; a file that exists but
/// cannot be parsed or lacks the profile is an error.
pub fn discover_credentials(profile: &str) -> Result<Option<Credentials>> {
    match find_file(SEARCH_DIRECTORIES, CREDENTIALS_FILE_NAME) {
        Some(path) => load_credentials(&path, profile).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_credentials(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join(CREDENTIALS_FILE_NAME);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_profile_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_credentials(
            dir.path(),
            r#"{
                "default": {
                    "admin_api_url": "http://localhost:8001",
                    "headers": { "apikey": "secret" }
                },
                "staging": { "admin_api_url": "http://staging:8001" }
            }"#,
        );

        let credentials = load_credentials(&path, DEFAULT_PROFILE).unwrap();
        assert_eq!(credentials.admin_api_url, "http://localhost:8001");
        assert_eq!(credentials.headers.get("apikey").unwrap(), "secret");

        let staging = load_credentials(&path, "staging").unwrap();
        assert_eq!(staging.admin_api_url, "http://staging:8001");
        assert!(staging.headers.is_empty());
    }

    #[test]
    fn missing_profile_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_credentials(
            dir.path(),
            r#"{ "default": { "admin_api_url": "http://localhost:8001" } }"#,
        );

        let err = load_credentials(&path, "production").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_credentials(dir.path(), "not json");

        let err = load_credentials(&path, DEFAULT_PROFILE).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn resolve_path_expands_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(resolve_path("~"), home);
            assert_eq!(resolve_path("~/.gateway"), home.join(".gateway"));
        }
        assert_eq!(resolve_path("/etc/gateway"), PathBuf::from("/etc/gateway"));
    }

    #[test]
    fn find_file_prefers_earlier_directories() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write_credentials(first.path(), "{}");
        write_credentials(second.path(), "{}");

        let dirs = [
            first.path().to_str().unwrap(),
            second.path().to_str().unwrap(),
        ];
        let found = find_file(&dirs, CREDENTIALS_FILE_NAME).unwrap();
        assert_eq!(found, first.path().join(CREDENTIALS_FILE_NAME));
    }
}
