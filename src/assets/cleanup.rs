use std::path::{Path, PathBuf};

use anyhow::Context as _;
use walkdir::WalkDir;

use crate::foundation::error::AegisResult;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// What a clean of the renderer output tree would remove.
///
/// Computing a plan never touches the filesystem beyond reading metadata; only
/// [`CleanPlan::commit`] deletes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CleanPlan {
    NothingToDo,
    Pending {
        root: PathBuf,
        total_bytes: u64,
        file_count: u64,
    },
}

/// Result of a committed clean.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanReport {
    pub removed: PathBuf,
    pub freed_bytes: u64,
}

impl CleanPlan {
    #[tracing::instrument]
    pub fn compute(root: &Path) -> AegisResult<Self> {
        if !root.exists() {
            return Ok(Self::NothingToDo);
        }

        let mut total_bytes = 0u64;
        let mut file_count = 0u64;
        for entry in WalkDir::new(root) {
            let entry = entry.with_context(|| format!("walk '{}'", root.display()))?;
            if entry.file_type().is_file() {
                total_bytes += entry
                    .metadata()
                    .with_context(|| format!("stat '{}'", entry.path().display()))?
                    .len();
                file_count += 1;
            }
        }

        tracing::debug!(total_bytes, file_count, "clean plan computed");
        Ok(Self::Pending {
            root: root.to_path_buf(),
            total_bytes,
            file_count,
        })
    }

    pub fn total_bytes(&self) -> u64 {
        match self {
            Self::NothingToDo => 0,
            Self::Pending { total_bytes, .. } => *total_bytes,
        }
    }

    pub fn total_mb(&self) -> f64 {
        self.total_bytes() as f64 / BYTES_PER_MB
    }

    /// Delete the planned tree. `None` when there was nothing to do.
    pub fn commit(self) -> AegisResult<Option<CleanReport>> {
        let Self::Pending {
            root, total_bytes, ..
        } = self
        else {
            return Ok(None);
        };

        std::fs::remove_dir_all(&root)
            .with_context(|| format!("remove '{}'", root.display()))?;
        tracing::info!(root = %root.display(), freed = total_bytes, "removed render output");

        Ok(Some(CleanReport {
            removed: root,
            freed_bytes: total_bytes,
        }))
    }
}
