use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};

use walkdir::WalkDir;

use crate::{
    config::ProjectConfig,
    foundation::error::{AegisError, AegisResult},
};

/// A rendered video found on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub modified: SystemTime,
    /// Size in bytes.
    pub len: u64,
}

/// Finds rendered artifacts for a scene class name.
pub trait ArtifactLocator {
    /// Candidates for `name`, newest first. Empty when nothing matches.
    fn find(&self, name: &str) -> AegisResult<Vec<Artifact>>;

    /// Where the locator searches, for user-facing messages.
    fn search_root(&self) -> &Path;
}

/// Searches a renderer output tree at any depth for `<name>.<ext>`.
///
/// The renderer nests output under directories derived from the source file and quality
/// preset, so the layout below `root` is not assumed.
#[derive(Clone, Debug)]
pub struct MediaTreeLocator {
    root: PathBuf,
    extensions: Vec<String>,
    partial_marker: String,
}

impl MediaTreeLocator {
    pub fn new(
        root: impl Into<PathBuf>,
        extensions: Vec<String>,
        partial_marker: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            extensions,
            partial_marker: partial_marker.into(),
        }
    }

    pub fn from_config(cfg: &ProjectConfig) -> Self {
        Self::new(
            cfg.artifact_root(),
            cfg.video_extensions.clone(),
            cfg.partial_marker.clone(),
        )
    }

    fn matches_name(&self, path: &Path, name: &str) -> bool {
        let (Some(stem), Some(ext)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.extension().and_then(|e| e.to_str()),
        ) else {
            return false;
        };
        stem == name && self.extensions.iter().any(|e| e == ext)
    }

    fn is_partial(&self, path: &Path) -> bool {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .any(|c| c.as_os_str() == self.partial_marker.as_str())
    }
}

impl ArtifactLocator for MediaTreeLocator {
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    fn find(&self, name: &str) -> AegisResult<Vec<Artifact>> {
        validate_scene_name(name)?;

        if !self.root.is_dir() {
            tracing::debug!("artifact root does not exist");
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !self.matches_name(path, name) || self.is_partial(path) {
                continue;
            }

            let meta = entry.metadata().map_err(|e| {
                AegisError::Other(anyhow::anyhow!("stat '{}': {e}", path.display()))
            })?;
            found.push(Artifact {
                path: path.to_path_buf(),
                modified: meta.modified()?,
                len: meta.len(),
            });
        }

        // Stable: equal timestamps keep walk order.
        found.sort_by(|a, b| b.modified.cmp(&a.modified));
        tracing::debug!(candidates = found.len(), "artifact search finished");
        Ok(found)
    }

    fn search_root(&self) -> &Path {
        &self.root
    }
}

/// Scene names are bare class identifiers, never paths.
pub fn validate_scene_name(name: &str) -> AegisResult<()> {
    if name.trim().is_empty() {
        return Err(AegisError::validation("scene name must be non-empty"));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(AegisError::validation(format!(
            "scene name '{name}' must not contain path separators"
        )));
    }
    Ok(())
}
