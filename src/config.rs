//! Project configuration.
//!
//! Every path the tools touch is relative to a single anchor directory. The anchor comes from
//! `--root`, then the `AEGIS_ROOT` environment variable, then the current directory. An
//! optional `aegis.json` in the anchor overrides individual fields.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{AegisError, AegisResult};

/// Environment variable consulted when no explicit anchor is given.
pub const ROOT_ENV: &str = "AEGIS_ROOT";

/// File name of the optional per-project override file.
pub const CONFIG_FILE_NAME: &str = "aegis.json";

/// How the external renderer is invoked.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Renderer executable. Relative paths containing a separator resolve against the anchor.
    pub program: String,
    /// Fixed quality preset flag passed on every invocation.
    pub quality_flag: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: ".venv/bin/manim".to_string(),
            quality_flag: "-ql".to_string(),
        }
    }
}

/// Paths and fixed names shared by the launcher, asset manager and prompt bridge.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    #[serde(skip)]
    root: PathBuf,

    /// Scene registry file name.
    pub registry: PathBuf,
    /// Renderer media directory (the temporary output tree lives under it).
    pub media_dir: PathBuf,
    /// Subdirectory of `media_dir` holding rendered videos.
    pub videos_subdir: PathBuf,
    /// Durable directory for published videos.
    pub warehouse_dir: PathBuf,
    /// Instruction template prepended to generated prompts.
    pub prompt_template: PathBuf,
    /// File that pasted model output is written to.
    pub generated_scene: PathBuf,
    /// Class name the generated scene is expected to declare.
    pub generated_class: String,
    /// Extensions (without dot) recognised as rendered videos.
    pub video_extensions: Vec<String>,
    /// Path component marking renderer-internal partial files.
    pub partial_marker: String,
    pub renderer: RendererConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            registry: PathBuf::from("scene_registry.json"),
            media_dir: PathBuf::from("media"),
            videos_subdir: PathBuf::from("videos"),
            warehouse_dir: PathBuf::from("final_video_warehouse"),
            prompt_template: PathBuf::from("prompts/system_prompt.md"),
            generated_scene: PathBuf::from("gen_scene.py"),
            generated_class: "GeneratedScene".to_string(),
            video_extensions: vec!["mp4".to_string(), "mov".to_string(), "webm".to_string()],
            partial_marker: "partial_movie_files".to_string(),
            renderer: RendererConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// Defaults anchored at `root`, without reading any override file.
    pub fn anchored(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Resolve the anchor and apply overrides from `config_file` or `<anchor>/aegis.json`.
    ///
    /// An explicit `config_file` must exist; the implicit one is optional.
    pub fn load(root: Option<&Path>, config_file: Option<&Path>) -> AegisResult<Self> {
        let root = resolve_anchor(root)?;

        let (path, required) = match config_file {
            Some(p) => (p.to_path_buf(), true),
            None => (root.join(CONFIG_FILE_NAME), false),
        };

        let mut cfg = if path.is_file() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            let cfg: Self = serde_json::from_str(&text).map_err(|e| {
                AegisError::serde(format!("parse config '{}': {e}", path.display()))
            })?;
            tracing::debug!(path = %path.display(), "loaded config overrides");
            cfg
        } else if required {
            return Err(AegisError::validation(format!(
                "config file '{}' does not exist",
                path.display()
            )));
        } else {
            Self::default()
        };

        cfg.root = root;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AegisResult<()> {
        if self.video_extensions.is_empty() {
            return Err(AegisError::validation(
                "video_extensions must list at least one extension",
            ));
        }
        if self.video_extensions.iter().any(|e| e.is_empty() || e.starts_with('.')) {
            return Err(AegisError::validation(
                "video_extensions entries must be non-empty and given without a leading dot",
            ));
        }
        if self.generated_class.trim().is_empty() {
            return Err(AegisError::validation("generated_class must be non-empty"));
        }
        if self.renderer.program.trim().is_empty() {
            return Err(AegisError::validation("renderer.program must be non-empty"));
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `rel` onto the anchor. Absolute paths are returned unchanged.
    pub fn resolve(&self, rel: &Path) -> PathBuf {
        if rel.is_absolute() {
            rel.to_path_buf()
        } else {
            self.root.join(rel)
        }
    }

    /// Registry locations in lookup order: the anchor, then its parent.
    pub fn registry_candidates(&self) -> Vec<PathBuf> {
        if self.registry.is_absolute() {
            return vec![self.registry.clone()];
        }
        vec![
            self.root.join(&self.registry),
            self.root.join("..").join(&self.registry),
        ]
    }

    pub fn media_dir(&self) -> PathBuf {
        self.resolve(&self.media_dir)
    }

    /// Root of the tree searched for rendered artifacts.
    pub fn artifact_root(&self) -> PathBuf {
        self.media_dir().join(&self.videos_subdir)
    }

    pub fn warehouse_dir(&self) -> PathBuf {
        self.resolve(&self.warehouse_dir)
    }

    pub fn prompt_template(&self) -> PathBuf {
        self.resolve(&self.prompt_template)
    }

    pub fn generated_scene(&self) -> PathBuf {
        self.resolve(&self.generated_scene)
    }

    /// Renderer program, anchored when it is a relative path rather than a bare command name.
    pub fn renderer_program(&self) -> PathBuf {
        let program = Path::new(&self.renderer.program);
        if program.components().count() > 1 {
            self.resolve(program)
        } else {
            program.to_path_buf()
        }
    }
}

fn resolve_anchor(explicit: Option<&Path>) -> AegisResult<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }
    if let Some(root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    let cwd = std::env::current_dir().context("resolve current directory")?;
    Ok(cwd)
}
