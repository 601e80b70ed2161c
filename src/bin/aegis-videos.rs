use std::{
    io::{BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use aegis::{AssetManager, CleanPlan, ProjectConfig, PublishOutcome, WarehouseListing, console};
use clap::{CommandFactory as _, Parser, Subcommand, error::ErrorKind};

/// Video asset manager: publish renders to the warehouse and clean render output.
#[derive(Parser, Debug)]
#[command(name = "aegis-videos", version)]
struct Cli {
    /// Project root all configured paths resolve against (default: $AEGIS_ROOT, then cwd).
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Config overrides (default: <root>/aegis.json when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy the newest render of a scene into the warehouse.
    Publish(PublishArgs),
    /// Delete the renderer's temporary media directory.
    Clean(CleanArgs),
    /// List files in the warehouse.
    List,
}

#[derive(Parser, Debug)]
struct PublishArgs {
    /// Class name of the scene (e.g. SupplyDemandScene).
    scene_name: String,

    /// New file name for the published copy (extension is kept).
    #[arg(short, long)]
    rename: Option<String>,
}

#[derive(Parser, Debug)]
struct CleanArgs {
    /// Skip the confirmation prompt.
    #[arg(short, long)]
    force: bool,

    /// Report what would be deleted and stop.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    aegis::logging::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(
            e.kind(),
            ErrorKind::InvalidSubcommand | ErrorKind::UnknownArgument
        ) =>
        {
            Cli::command().print_help()?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => e.exit(),
    };

    let Some(cmd) = cli.cmd else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let cfg = ProjectConfig::load(cli.root.as_deref(), cli.config.as_deref())?;
    let manager = AssetManager::from_config(&cfg);

    match cmd {
        Command::Publish(args) => cmd_publish(&manager, args),
        Command::Clean(args) => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            cmd_clean(&manager, args, &mut stdin.lock(), &mut stdout.lock())
        }
        Command::List => cmd_list(&manager),
    }
}

fn cmd_publish<L: aegis::ArtifactLocator>(
    manager: &AssetManager<L>,
    args: PublishArgs,
) -> anyhow::Result<ExitCode> {
    match manager.publish(&args.scene_name, args.rename.as_deref()) {
        Ok(PublishOutcome::NotFound { scene, searched }) => {
            println!(
                "Error: could not find any rendered video for scene '{scene}' in {}",
                searched.display()
            );
            println!("Tip: run the renderer for this scene first.");
            Ok(ExitCode::FAILURE)
        }
        Ok(PublishOutcome::Published(receipt)) => {
            if receipt.created_warehouse {
                println!(
                    "Created warehouse directory: {}",
                    manager.warehouse().dir().display()
                );
            }
            println!("Success! Video published to: {}", receipt.destination.display());
            println!("   Source: {}", receipt.source.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Failed to publish video: {e:#}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_clean<L: aegis::ArtifactLocator, I: BufRead, O: Write>(
    manager: &AssetManager<L>,
    args: CleanArgs,
    input: &mut I,
    output: &mut O,
) -> anyhow::Result<ExitCode> {
    let plan = match manager.plan_clean() {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("Cleanup failed: {e:#}");
            return Ok(ExitCode::FAILURE);
        }
    };
    if plan == CleanPlan::NothingToDo {
        writeln!(
            output,
            "Media directory {} is already empty or does not exist.",
            manager.media_dir().display()
        )?;
        return Ok(ExitCode::SUCCESS);
    }

    writeln!(
        output,
        "Ready to clean {}/ directory.",
        manager.media_dir().display()
    )?;
    writeln!(output, "Total space to free: {:.2} MB", plan.total_mb())?;

    if args.dry_run {
        writeln!(output, "[Dry Run] No files were deleted.")?;
        return Ok(ExitCode::SUCCESS);
    }

    if !args.force
        && !console::confirm(
            input,
            output,
            "Are you sure you want to delete ALL temporary render files?",
        )?
    {
        writeln!(output, "Cleanup cancelled.")?;
        return Ok(ExitCode::SUCCESS);
    }

    match plan.commit() {
        Ok(_) => {
            writeln!(output, "Cleanup complete. Media directory removed.")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Cleanup failed: {e:#}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_list<L: aegis::ArtifactLocator>(manager: &AssetManager<L>) -> anyhow::Result<ExitCode> {
    println!(
        "\nFinal Video Warehouse ({}/):",
        manager.warehouse().dir().display()
    );
    match manager.list()? {
        WarehouseListing::Missing => println!("   (Directory not found)"),
        WarehouseListing::Empty => println!("   (Empty)"),
        WarehouseListing::Entries(names) => {
            for name in names {
                println!("   - {name}");
            }
        }
    }
    println!();
    Ok(ExitCode::SUCCESS)
}
