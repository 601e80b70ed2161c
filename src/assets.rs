//! Rendered video discovery, publishing to the warehouse, and output-tree cleanup.

pub mod cleanup;
pub mod locator;
pub mod warehouse;

use std::path::PathBuf;

use crate::{config::ProjectConfig, foundation::error::AegisResult};

pub use cleanup::{CleanPlan, CleanReport};
pub use locator::{Artifact, ArtifactLocator, MediaTreeLocator};
pub use warehouse::{PublishReceipt, Warehouse, WarehouseListing};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    /// No artifact matched; nothing was copied or created.
    NotFound { scene: String, searched: PathBuf },
    Published(PublishReceipt),
}

/// Asset operations over a locator, a warehouse and the renderer's media directory.
pub struct AssetManager<L> {
    locator: L,
    warehouse: Warehouse,
    media_dir: PathBuf,
}

impl AssetManager<MediaTreeLocator> {
    pub fn from_config(cfg: &ProjectConfig) -> Self {
        Self::new(
            MediaTreeLocator::from_config(cfg),
            Warehouse::new(cfg.warehouse_dir()),
            cfg.media_dir(),
        )
    }
}

impl<L: ArtifactLocator> AssetManager<L> {
    pub fn new(locator: L, warehouse: Warehouse, media_dir: impl Into<PathBuf>) -> Self {
        Self {
            locator,
            warehouse,
            media_dir: media_dir.into(),
        }
    }

    pub fn warehouse(&self) -> &Warehouse {
        &self.warehouse
    }

    pub fn media_dir(&self) -> &std::path::Path {
        &self.media_dir
    }

    /// Publish the most recently rendered artifact for `scene`.
    pub fn publish(&self, scene: &str, rename: Option<&str>) -> AegisResult<PublishOutcome> {
        let candidates = self.locator.find(scene)?;
        let Some(newest) = candidates.first() else {
            return Ok(PublishOutcome::NotFound {
                scene: scene.to_string(),
                searched: self.locator.search_root().to_path_buf(),
            });
        };
        if candidates.len() > 1 {
            tracing::debug!(
                count = candidates.len(),
                chosen = %newest.path.display(),
                "multiple renders found; publishing the newest"
            );
        }

        let receipt = self.warehouse.publish(&newest.path, rename)?;
        Ok(PublishOutcome::Published(receipt))
    }

    /// First phase of a clean: what deleting the media directory would remove.
    pub fn plan_clean(&self) -> AegisResult<CleanPlan> {
        CleanPlan::compute(&self.media_dir)
    }

    pub fn list(&self) -> AegisResult<WarehouseListing> {
        self.warehouse.list()
    }
}
