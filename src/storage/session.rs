use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// File name of the session sidecar under the garage root.
const SESSION_FILE: &str = "session.toml";

/// Per-garage UI state that survives between invocations.
///
/// Holds the selected vehicle id. Kept out of the fleet snapshot on purpose:
/// the snapshot round-trip contract covers vehicles and their history only,
/// and losing the session must never cost data.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Id of the currently selected vehicle, if any.
    pub selected: Option<String>,
}

impl Session {
    /// Reads the session sidecar under `root`.
    ///
    /// A missing or unreadable sidecar yields the default (no selection);
    /// an unparseable one is reported and also yields the default.
    #[must_use]
    pub fn load(root: &Path) -> Self {
        let path = root.join(SESSION_FILE);
        let Ok(raw) = fs::read_to_string(path) else {
            return Self::default();
        };
        toml::from_str(&raw).unwrap_or_else(|error| {
            warn!(%error, "session file is corrupt; ignoring it");
            Self::default()
        })
    }

    /// Writes the session sidecar under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error when the root cannot be created or the file cannot
    /// be written.
    pub fn save(&self, root: &Path) -> io::Result<()> {
        let raw = toml::to_string(self).map_err(io::Error::other)?;
        fs::create_dir_all(root)?;
        fs::write(root.join(SESSION_FILE), raw)
    }
}

#[cfg(test)]
mod tests {
    use super::Session;

    #[test]
    fn round_trips_the_selection() {
        let tmp = tempfile::tempdir().unwrap();
        let session = Session {
            selected: Some("abc-123".to_string()),
        };
        session.save(tmp.path()).unwrap();
        assert_eq!(Session::load(tmp.path()), session);
    }

    #[test]
    fn missing_sidecar_yields_no_selection() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(Session::load(tmp.path()), Session::default());
    }

    #[test]
    fn corrupt_sidecar_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("session.toml"), "selected = [").unwrap();
        assert_eq!(Session::load(tmp.path()), Session::default());
    }
}
