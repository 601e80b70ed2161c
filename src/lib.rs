//! Tooling around an external animation renderer.
//!
//! - [`launcher`]: interactive menu over the scene [`registry`] that renders the chosen scene
//! - [`assets`]: find rendered videos, publish them to the warehouse, clean render output
//! - [`prompt`]: build model prompts and render pasted replies
//!
//! Every operation takes an explicit [`ProjectConfig`]; nothing reads fixed global paths.
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod console;
mod foundation;
pub mod launcher;
pub mod logging;
pub mod prompt;
pub mod registry;
pub mod renderer;

pub use crate::assets::{
    Artifact, ArtifactLocator, AssetManager, CleanPlan, CleanReport, MediaTreeLocator,
    PublishOutcome, PublishReceipt, Warehouse, WarehouseListing,
};
pub use crate::config::{ProjectConfig, RendererConfig};
pub use crate::foundation::error::{AegisError, AegisResult};
pub use crate::launcher::{Launcher, LauncherOpts};
pub use crate::prompt::{PromptBridge, PromptTemplate};
pub use crate::registry::{Registry, SceneDescriptor};
pub use crate::renderer::{
    CommandRenderer, RecordingRenderer, RenderOutcome, RenderRequest, SceneRenderer,
};
