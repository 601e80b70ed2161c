use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use crate::{
    config::ProjectConfig,
    foundation::error::{AegisError, AegisResult},
};

/// A single scene render: source file plus the class to render from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderRequest {
    pub source: PathBuf,
    pub class_name: String,
    /// Passed as `--media_dir` when set; otherwise the renderer picks its default.
    pub media_dir: Option<PathBuf>,
}

impl RenderRequest {
    pub fn new(source: impl Into<PathBuf>, class_name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            class_name: class_name.into(),
            media_dir: None,
        }
    }

    pub fn with_media_dir(mut self, media_dir: impl Into<PathBuf>) -> Self {
        self.media_dir = Some(media_dir.into());
        self
    }
}

/// What happened to a render. The exit status is reported, never interpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOutcome {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
}

impl From<ExitStatus> for RenderOutcome {
    fn from(status: ExitStatus) -> Self {
        Self {
            exit_code: status.code(),
            success: status.success(),
        }
    }
}

/// Something that can render a scene to completion.
pub trait SceneRenderer {
    /// Full command line for `req`, for display.
    fn describe(&self, req: &RenderRequest) -> String;

    /// Run the render and block until it finishes.
    fn render(&mut self, req: &RenderRequest) -> AegisResult<RenderOutcome>;
}

/// Renders by running the external renderer as a child process with inherited stdio.
#[derive(Clone, Debug)]
pub struct CommandRenderer {
    program: PathBuf,
    quality_flag: String,
    working_dir: PathBuf,
}

impl CommandRenderer {
    pub fn new(
        program: impl Into<PathBuf>,
        quality_flag: impl Into<String>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            quality_flag: quality_flag.into(),
            working_dir: working_dir.into(),
        }
    }

    pub fn from_config(cfg: &ProjectConfig) -> Self {
        Self::new(
            cfg.renderer_program(),
            cfg.renderer.quality_flag.clone(),
            cfg.root(),
        )
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments after the program name: `<quality> [--media_dir DIR] <source> <class>`.
    pub fn args(&self, req: &RenderRequest) -> Vec<OsString> {
        let mut args = vec![OsString::from(&self.quality_flag)];
        if let Some(media_dir) = &req.media_dir {
            args.push(OsString::from("--media_dir"));
            args.push(media_dir.clone().into_os_string());
        }
        args.push(req.source.clone().into_os_string());
        args.push(OsString::from(&req.class_name));
        args
    }

    fn command(&self, req: &RenderRequest) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(req)).current_dir(&self.working_dir);
        cmd
    }
}

impl SceneRenderer for CommandRenderer {
    fn describe(&self, req: &RenderRequest) -> String {
        std::iter::once(self.program.clone().into_os_string())
            .chain(self.args(req))
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[tracing::instrument(skip(self), fields(program = %self.program.display()))]
    fn render(&mut self, req: &RenderRequest) -> AegisResult<RenderOutcome> {
        let status = self.command(req).status().map_err(|e| {
            AegisError::render(format!(
                "failed to spawn renderer '{}': {e}",
                self.program.display()
            ))
        })?;

        let outcome = RenderOutcome::from(status);
        if outcome.success {
            tracing::info!(class = %req.class_name, "renderer finished");
        } else {
            tracing::warn!(
                class = %req.class_name,
                code = ?outcome.exit_code,
                "renderer exited unsuccessfully"
            );
        }
        Ok(outcome)
    }
}

/// In-memory renderer for tests: records requests instead of spawning anything.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    /// Requests in call order.
    pub requests: Vec<RenderRequest>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneRenderer for RecordingRenderer {
    fn describe(&self, req: &RenderRequest) -> String {
        format!("record {} {}", req.source.display(), req.class_name)
    }

    fn render(&mut self, req: &RenderRequest) -> AegisResult<RenderOutcome> {
        self.requests.push(req.clone());
        Ok(RenderOutcome {
            exit_code: Some(0),
            success: true,
        })
    }
}
