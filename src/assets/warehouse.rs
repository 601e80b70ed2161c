use std::{
    fs::{self, File, FileTimes},
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::error::{AegisError, AegisResult};

/// Result of a successful publish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishReceipt {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub bytes: u64,
    /// The warehouse directory did not exist before this publish.
    pub created_warehouse: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WarehouseListing {
    Missing,
    Empty,
    /// Visible entry names, sorted.
    Entries(Vec<String>),
}

/// Flat directory of published renders.
#[derive(Clone, Debug)]
pub struct Warehouse {
    dir: PathBuf,
}

impl Warehouse {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Destination file name: `<rename><.ext>` when renaming, else the source basename.
    pub fn destination_name(source: &Path, rename: Option<&str>) -> AegisResult<String> {
        match rename {
            Some(rename) => {
                if rename.is_empty() || rename.contains(['/', '\\']) {
                    return Err(AegisError::validation(format!(
                        "rename '{rename}' must be a plain file name"
                    )));
                }
                let ext = source
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default();
                Ok(format!("{rename}{ext}"))
            }
            None => source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    AegisError::validation(format!(
                        "source '{}' has no file name",
                        source.display()
                    ))
                }),
        }
    }

    /// Copy `source` into the warehouse, creating it if needed. Existing entries are overwritten.
    #[tracing::instrument(skip(self), fields(warehouse = %self.dir.display()))]
    pub fn publish(&self, source: &Path, rename: Option<&str>) -> AegisResult<PublishReceipt> {
        let name = Self::destination_name(source, rename)?;

        let created_warehouse = !self.dir.is_dir();
        if created_warehouse {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("create warehouse '{}'", self.dir.display()))?;
            tracing::info!("created warehouse directory");
        }

        let destination = self.dir.join(name);
        let bytes = copy_with_metadata(source, &destination)?;
        tracing::info!(
            source = %source.display(),
            destination = %destination.display(),
            bytes,
            "published artifact"
        );

        Ok(PublishReceipt {
            source: source.to_path_buf(),
            destination,
            bytes,
            created_warehouse,
        })
    }

    /// Visible (non-dot) entries. A directory holding only hidden entries lists as empty.
    pub fn list(&self) -> AegisResult<WarehouseListing> {
        if !self.dir.is_dir() {
            return Ok(WarehouseListing::Missing);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("read warehouse '{}'", self.dir.display()))?
        {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if !name.starts_with('.') {
                names.push(name);
            }
        }
        names.sort();

        if names.is_empty() {
            Ok(WarehouseListing::Empty)
        } else {
            Ok(WarehouseListing::Entries(names))
        }
    }
}

/// `fs::copy` plus the source's access and modification times.
fn copy_with_metadata(source: &Path, destination: &Path) -> AegisResult<u64> {
    let bytes = fs::copy(source, destination).with_context(|| {
        format!(
            "copy '{}' to '{}'",
            source.display(),
            destination.display()
        )
    })?;

    let meta = fs::metadata(source)?;
    let mut times = FileTimes::new().set_modified(meta.modified()?);
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    // Read-only sources produce read-only copies that cannot be reopened for writing.
    if let Err(e) = File::options()
        .write(true)
        .open(destination)
        .and_then(|f| f.set_times(times))
    {
        tracing::warn!(
            destination = %destination.display(),
            error = %e,
            "copied without preserving timestamps"
        );
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_keeps_source_extension() {
        let src = Path::new("media/videos/x/480p15/SupplyDemandScene.mp4");
        assert_eq!(
            Warehouse::destination_name(src, Some("lesson1")).unwrap(),
            "lesson1.mp4"
        );
        assert_eq!(
            Warehouse::destination_name(src, None).unwrap(),
            "SupplyDemandScene.mp4"
        );
    }

    #[test]
    fn rename_must_be_a_plain_name() {
        let src = Path::new("a/S.mp4");
        assert!(Warehouse::destination_name(src, Some("../escape")).is_err());
        assert!(Warehouse::destination_name(src, Some("")).is_err());
    }
}
