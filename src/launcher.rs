//! Interactive scene menu backed by the registry.

use std::io::{BufRead, Write};

use crate::{
    console,
    foundation::error::AegisResult,
    registry::{Registry, SceneDescriptor},
    renderer::{RenderRequest, SceneRenderer},
};

const RULE: &str = "==================================================";
const SEPARATOR: &str = "------------------------------";

/// Quit sentinel accepted at the menu prompt.
pub const QUIT: &str = "Q";

#[derive(Clone, Copy, Debug)]
pub struct LauncherOpts {
    /// Clear the terminal before each menu.
    pub clear_screen: bool,
}

impl Default for LauncherOpts {
    fn default() -> Self {
        Self { clear_screen: true }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice<'a> {
    Quit,
    Scene(&'a SceneDescriptor),
    Invalid,
}

/// Interpret a line typed at the menu prompt.
pub fn parse_choice<'a>(registry: &'a Registry, input: &str) -> Choice<'a> {
    let input = input.trim();
    if input.eq_ignore_ascii_case(QUIT) {
        return Choice::Quit;
    }
    match registry.find(input) {
        Some(scene) => Choice::Scene(scene),
        None => Choice::Invalid,
    }
}

/// The menu text, scenes in registry order.
pub fn render_menu(registry: &Registry) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str("      Aegis Course Library (scene registry)\n");
    out.push_str(RULE);
    out.push('\n');
    out.push_str("Choose a scene to render:\n\n");

    for scene in registry.scenes() {
        out.push_str(&format!("[{}] {}\n", scene.id, scene.title));
        out.push_str(&format!("    - {}\n", scene.description));
        out.push_str(SEPARATOR);
        out.push('\n');
    }

    out.push_str(&format!("[{QUIT}] Quit\n"));
    out.push_str(RULE);
    out.push('\n');
    out
}

/// Counts from one launcher session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub renders: usize,
    pub invalid_choices: usize,
}

pub struct Launcher<'r, R> {
    registry: &'r Registry,
    renderer: R,
    opts: LauncherOpts,
}

impl<'r, R: SceneRenderer> Launcher<'r, R> {
    pub fn new(registry: &'r Registry, renderer: R, opts: LauncherOpts) -> Self {
        Self {
            registry,
            renderer,
            opts,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Run the menu loop until the quit sentinel or end of input.
    ///
    /// Renderer spawn failures are printed and the menu continues.
    pub fn run<I: BufRead, O: Write>(
        &mut self,
        input: &mut I,
        output: &mut O,
    ) -> AegisResult<SessionSummary> {
        let mut summary = SessionSummary::default();

        loop {
            if self.opts.clear_screen {
                console::clear_screen(output)?;
            }
            write!(output, "{}", render_menu(self.registry))?;

            let Some(line) = console::read_line(input, output, "\nEnter an option (ID): ")? else {
                writeln!(output)?;
                break;
            };

            match parse_choice(self.registry, &line) {
                Choice::Quit => {
                    writeln!(output, "Thanks for using Aegis, goodbye!")?;
                    break;
                }
                Choice::Scene(scene) => {
                    self.launch(scene, output)?;
                    summary.renders += 1;
                    console::pause(input, output, "\nPress Enter to return to the menu...")?;
                }
                Choice::Invalid => {
                    tracing::debug!(input = %line.trim(), "unknown menu choice");
                    summary.invalid_choices += 1;
                    console::pause(input, output, "\nInvalid option, press Enter to retry...")?;
                }
            }
        }

        Ok(summary)
    }

    fn launch<O: Write>(&mut self, scene: &SceneDescriptor, output: &mut O) -> AegisResult<()> {
        let req = RenderRequest::new(&scene.file_path, &scene.class_name);
        writeln!(output, "\nPreparing to render: {}...", scene.title)?;
        writeln!(output, "Running: {}", self.renderer.describe(&req))?;
        output.flush()?;

        match self.renderer.render(&req) {
            Ok(outcome) => {
                tracing::debug!(id = %scene.id, success = outcome.success, "render returned");
            }
            Err(e) => writeln!(output, "Failed to start renderer: {e}")?,
        }
        Ok(())
    }
}
