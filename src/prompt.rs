//! Prompt assembly and the manual copy/paste bridge to the renderer.
//!
//! There is no model client: in simulate mode the prompt is printed for the user to submit
//! elsewhere, and the reply is pasted back on stdin.

use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    config::ProjectConfig,
    foundation::error::{AegisError, AegisResult},
    renderer::{RenderOutcome, RenderRequest, SceneRenderer},
};

/// Line that terminates pasted code.
pub const PASTE_SENTINEL: &str = "EOF";

const BANNER: &str = "========================================";
const OPEN_FENCE: &str = "```python";
const FENCE: &str = "```";

/// Instruction text prepended to every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn load(path: &Path) -> AegisResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read prompt template '{}'", path.display()))?;
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Template, then the user request, then the heading the model continues from.
    pub fn build_prompt(&self, request: &str) -> String {
        format!(
            "\n{}\n\n# User Request\n{}\n\n# Python Code\n",
            self.text, request
        )
    }
}

/// Read lines until [`PASTE_SENTINEL`] (surrounding whitespace ignored) or end of input.
pub fn collect_pasted<R: BufRead>(input: &mut R) -> std::io::Result<String> {
    let mut lines = Vec::new();
    for line in input.lines() {
        let line = line?;
        if line.trim() == PASTE_SENTINEL {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Remove markdown code fences and trim surrounding whitespace.
pub fn strip_fences(code: &str) -> String {
    code.replace(OPEN_FENCE, "")
        .replace(FENCE, "")
        .trim()
        .to_string()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeReport {
    pub scene_file: PathBuf,
    pub code_bytes: usize,
    pub render: RenderOutcome,
}

/// Prompt in, pasted code out, rendered through `R`.
pub struct PromptBridge<R> {
    template_path: PathBuf,
    scene_file: PathBuf,
    class_name: String,
    media_dir: PathBuf,
    renderer: R,
}

impl<R: SceneRenderer> PromptBridge<R> {
    pub fn from_config(cfg: &ProjectConfig, renderer: R) -> Self {
        Self {
            template_path: cfg.prompt_template(),
            scene_file: cfg.generated_scene(),
            class_name: cfg.generated_class.clone(),
            media_dir: cfg.media_dir(),
            renderer,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Direct model calls are not supported; nothing is read, written or rendered.
    pub fn run_automatic(
        &mut self,
        _request: &str,
        _api_key: Option<&str>,
    ) -> AegisResult<BridgeReport> {
        Err(AegisError::unimplemented(
            "automatic model calls are not available; use --simulate to paste the reply manually",
        ))
    }

    /// Print the prompt, collect the pasted reply, save it and render it.
    ///
    /// The saved file is overwritten unconditionally and its contents are not checked.
    pub fn run_simulated<I: BufRead, O: Write>(
        &mut self,
        request: &str,
        input: &mut I,
        output: &mut O,
    ) -> AegisResult<BridgeReport> {
        let template = PromptTemplate::load(&self.template_path)?;
        let prompt = template.build_prompt(request);

        writeln!(output, "\n{BANNER}")?;
        writeln!(output, "SIMULATION MODE: COPY THE TEXT BELOW TO YOUR LLM")?;
        writeln!(output, "{BANNER}\n")?;
        writeln!(output, "{prompt}")?;
        writeln!(output, "\n{BANNER}")?;
        writeln!(
            output,
            "PASTE THE GENERATED PYTHON CODE BELOW (end with a line containing only '{PASTE_SENTINEL}'):"
        )?;
        writeln!(output, "{BANNER}\n")?;
        output.flush()?;

        let code = strip_fences(&collect_pasted(input)?);
        std::fs::write(&self.scene_file, &code)
            .with_context(|| format!("write generated scene '{}'", self.scene_file.display()))?;
        writeln!(
            output,
            "\nSaved generated code to {}",
            self.scene_file.display()
        )?;
        tracing::info!(
            path = %self.scene_file.display(),
            bytes = code.len(),
            "saved generated scene"
        );

        let req = RenderRequest::new(&self.scene_file, &self.class_name)
            .with_media_dir(&self.media_dir);
        writeln!(output, "Running command: {}", self.renderer.describe(&req))?;
        output.flush()?;
        let render = self.renderer.render(&req)?;

        Ok(BridgeReport {
            scene_file: self.scene_file.clone(),
            code_bytes: code.len(),
            render,
        })
    }
}
