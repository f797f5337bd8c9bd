//! Project-level configuration: an optional `sv2ipxact.toml` next to the
//! input file, or at the path given by `--config`, supplying
//! defaults for `library-dir`, `cache`, `threshold` and `revision` so repeat
//! invocations in one project don't need to repeat flags. Grounded on
//! `orbit`'s own `toml`/`serde_derive` manifest loading (`core::manifest`).

use std::path::{Path, PathBuf};

use serde_derive::Deserialize;

use crate::serializer::revision::Revision;

pub const CONFIG_FILE_NAME: &str = "sv2ipxact.toml";

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
pub struct ProjectConfig {
    #[serde(default)]
    pub library_dir: Option<PathBuf>,
    #[serde(default)]
    pub cache: Option<PathBuf>,
    #[serde(default)]
    pub threshold: Option<f32>,
    #[serde(default)]
    pub revision: Option<Revision>,
}

impl ProjectConfig {
    /// Resolves the config file path: explicit `--config`, otherwise a
    /// `sv2ipxact.toml` sitting beside the input file.
    pub fn resolve_path(explicit: Option<&Path>, input: &Path) -> Option<PathBuf> {
        if let Some(p) = explicit {
            return Some(p.to_path_buf());
        }
        let candidate = input.parent().unwrap_or(Path::new(".")).join(CONFIG_FILE_NAME);
        if candidate.exists() {
            Some(candidate)
        } else {
            None
        }
    }

    /// Loads and parses the config file at `path`; absence of the file at a
    /// non-explicit location is not an error, it simply means no overrides.
    pub fn load(path: &Path) -> Result<Self, crate::error::LastError> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| crate::error::LastError(e.to_string()))
    }
}
