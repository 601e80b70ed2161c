use std::{
    io::IsTerminal as _,
    path::PathBuf,
    process::ExitCode,
};

use aegis::{AegisError, CommandRenderer, Launcher, LauncherOpts, ProjectConfig, Registry};
use clap::Parser;

/// Interactive scene menu: pick a registered scene and render it.
#[derive(Parser, Debug)]
#[command(name = "aegis-menu", version)]
struct Cli {
    /// Project root all configured paths resolve against (default: $AEGIS_ROOT, then cwd).
    #[arg(long)]
    root: Option<PathBuf>,

    /// Config overrides (default: <root>/aegis.json when present).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    aegis::logging::init();
    let cli = Cli::parse();
    let cfg = ProjectConfig::load(cli.root.as_deref(), cli.config.as_deref())?;

    let registry = match Registry::discover(&cfg) {
        Ok(registry) => registry,
        Err(e @ AegisError::RegistryNotFound { .. }) => {
            eprintln!("Error: {e}");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };
    if registry.is_empty() {
        eprintln!("No scenes registered; nothing to launch.");
        return Ok(ExitCode::SUCCESS);
    }

    let opts = LauncherOpts {
        clear_screen: std::io::stdout().is_terminal(),
    };
    let mut launcher = Launcher::new(&registry, CommandRenderer::from_config(&cfg), opts);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let summary = launcher.run(&mut stdin.lock(), &mut stdout.lock())?;
    tracing::debug!(?summary, "launcher session ended");

    Ok(ExitCode::SUCCESS)
}
