use std::{path::PathBuf, process::ExitCode};

use aegis::{AegisError, CommandRenderer, ProjectConfig, PromptBridge};
use clap::Parser;

/// Build a scene-generation prompt and render the code pasted back from the model.
#[derive(Parser, Debug)]
#[command(name = "aegis-agent", version)]
struct Cli {
    /// Natural language description of the animation.
    prompt: String,

    /// Print the prompt and read the generated code from stdin.
    #[arg(long)]
    simulate: bool,

    /// API key for a model provider (accepted but not used yet).
    #[arg(long = "llm_key")]
    llm_key: Option<String>,

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

    if cli.llm_key.is_some() {
        tracing::debug!("--llm_key given; ignored");
    }

    let mut bridge = PromptBridge::from_config(&cfg, CommandRenderer::from_config(&cfg));

    let result = if cli.simulate {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        bridge.run_simulated(&cli.prompt, &mut stdin.lock(), &mut stdout.lock())
    } else {
        bridge.run_automatic(&cli.prompt, cli.llm_key.as_deref())
    };

    match result {
        Ok(report) => {
            tracing::debug!(?report, "bridge finished");
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ AegisError::Unimplemented(_)) => {
            eprintln!("Error: {e}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Err(e.into()),
    }
}
