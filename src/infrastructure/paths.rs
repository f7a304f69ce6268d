//! Paths inside the Zellij plugin sandbox.
//!
//! The host filesystem is mounted under `/host`. User-supplied paths from the
//! plugin configuration are mapped into the sandbox here, and sandbox paths are
//! mapped back for display.

use std::path::PathBuf;

const HOST_ROOT: &str = "/host";

/// Returns the data directory for Vendorizer storage, traces, and exports.
///
/// Resolves to `~/.local/share/zellij/vendorizer` on the host when Zellij was
/// started from the home directory.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from(HOST_ROOT).join(".local/share/zellij").join("vendorizer")
}

/// Expands a leading `~` to the sandbox host root.
///
/// ```
/// use vendorizer::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/exports"), "/host/exports");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/abs"), "/abs");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', HOST_ROOT, 1)
    } else if path == "~" {
        HOST_ROOT.to_string()
    } else {
        path.to_string()
    }
}

/// Maps a configured path into the sandbox.
///
/// Tilde paths and relative paths land under `/host`; absolute paths are kept.
#[must_use]
pub fn resolve_config_path(raw: &str) -> PathBuf {
    let expanded = expand_tilde(raw.trim());
    let path = PathBuf::from(&expanded);
    if path.is_absolute() {
        path
    } else {
        PathBuf::from(HOST_ROOT).join(path)
    }
}

/// Removes the `/host` prefix for display.
///
/// ```
/// use vendorizer::infrastructure::strip_host_prefix;
///
/// assert_eq!(strip_host_prefix("/host/exports/v.csv"), "/exports/v.csv");
/// assert_eq!(strip_host_prefix("/tmp/v.csv"), "/tmp/v.csv");
/// ```
#[must_use]
pub fn strip_host_prefix(path: &str) -> String {
    path.strip_prefix(HOST_ROOT).unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_paths_land_in_sandbox() {
        assert_eq!(resolve_config_path("~/data/v.json"), PathBuf::from("/host/data/v.json"));
        assert_eq!(resolve_config_path("exports"), PathBuf::from("/host/exports"));
        assert_eq!(resolve_config_path(" /tmp/x "), PathBuf::from("/tmp/x"));
    }

    #[test]
    fn data_dir_is_under_host() {
        assert!(get_data_dir().starts_with(HOST_ROOT));
        assert!(get_data_dir().ends_with("vendorizer"));
    }
}
