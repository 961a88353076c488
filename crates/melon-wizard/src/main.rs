//! MelonLoader Wizard - Project scaffolding for MelonLoader mods

use anyhow::Result;
use clap::{Parser, Subcommand};
use modwizard_core::tui::{CreateArgs, Outcome};
use modwizard_core::{GameInfo, ProductConfig, RuntimeBackend};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MelonLoader product configuration
#[derive(Clone)]
pub struct MelonWizardConfig;

impl ProductConfig for MelonWizardConfig {
    fn name(&self) -> &'static str {
        "melon-wizard"
    }

    fn display_name(&self) -> &'static str {
        "MelonLoader Wizard"
    }

    fn template_dir_env(&self) -> &'static str {
        "MELON_WIZARD_TEMPLATE_DIR"
    }

    fn template_url_env(&self) -> &'static str {
        "MELON_WIZARD_TEMPLATE_URL"
    }

    fn author_env(&self) -> &'static str {
        "MELON_WIZARD_AUTHOR"
    }

    fn docs_url(&self) -> &'static str {
        "https://melonwiki.xyz"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding MelonLoader mod projects"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install melon-wizard --force"
    }

    fn next_steps(&self, dir: &Path, game: &GameInfo) -> Vec<String> {
        let mut steps = Vec::new();

        // Step 1: cd to directory if not current
        if std::env::current_dir().ok().as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        // Step 2: build against the game's assemblies
        steps.push("dotnet build".to_string());

        // Step 3: IL2CPP assemblies only exist after the first modded launch
        if game.backend == RuntimeBackend::Il2Cpp {
            steps.push(
                "If references are missing, launch the game once with MelonLoader \
                 to generate its IL2CPP assemblies, then run the wizard again"
                    .to_string(),
            );
        }

        steps.push(format!("Read the MelonLoader docs: {}", self.docs_url()));

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "melon-wizard")]
#[command(about = "CLI for scaffolding MelonLoader mod projects")]
#[command(version)]
pub struct Args {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new mod project for an installed game
    Create(CliCreateArgs),
    /// Show what the wizard detects about a game and which assemblies it would reference
    Inspect(InspectArgs),
    /// Build a zip of a template directory for use with --template-url (for development use)
    BuildZip(BuildZipArgs),
}

#[derive(Parser, Debug, Default)]
pub struct CliCreateArgs {
    /// Game executable (the folder must contain <exe>_Data and MelonLoader)
    #[arg(short, long)]
    pub exe: Option<PathBuf>,

    /// Mod name, used for the project folder, assembly and namespace
    #[arg(short, long)]
    pub name: Option<String>,

    /// Folder to create the project folder in
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Author shown in the mod's MelonInfo
    #[arg(short, long)]
    pub author: Option<String>,

    /// Local directory to use as the template instead of the built-in one
    #[arg(long = "template-dir", conflicts_with = "template_url")]
    pub template_dir: Option<PathBuf>,

    /// URL of a template zip to use instead of the built-in template
    #[arg(long = "template-url")]
    pub template_url: Option<String>,

    /// Open the project folder when done
    #[arg(long)]
    pub open: bool,

    /// Write into an existing, non-empty project folder
    #[arg(long)]
    pub force: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            exe: args.exe,
            name: args.name,
            output: args.output,
            author: args.author,
            template_dir: args.template_dir,
            template_url: args.template_url,
            open: args.open,
            force: args.force,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Game executable to inspect
    pub exe: PathBuf,
}

#[derive(Parser, Debug)]
pub struct BuildZipArgs {
    /// Template directory to pack; the zip is written next to it
    #[arg(long = "template-dir")]
    pub template_dir: PathBuf,
}

/// Initialize the tracing subscriber for logging.
///
/// `--debug` forces debug output, otherwise `RUST_LOG` applies, defaulting to warnings.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("modwizard_core=debug,melon_wizard=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn create(config: &MelonWizardConfig, args: CreateArgs) -> Result<ExitCode> {
    let outcome = modwizard_core::run(config, args, CLI_VERSION).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    Ok(exit_code(outcome?))
}

fn exit_code(outcome: Outcome) -> ExitCode {
    match outcome {
        Outcome::Completed => ExitCode::SUCCESS,
        Outcome::Cancelled => ExitCode::from(130),
        Outcome::Failed => ExitCode::FAILURE,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.debug);
    tracing::debug!("melon-wizard starting with args: {:?}", args);

    let config = MelonWizardConfig;

    match args.command {
        Some(Command::Create(create_args)) => create(&config, create_args.into()).await,
        Some(Command::Inspect(inspect_args)) => {
            Ok(exit_code(modwizard_core::tui::run_inspect(&inspect_args.exe)?))
        }
        Some(Command::BuildZip(build_args)) => {
            modwizard_core::templates::build_zip(&config, &build_args.template_dir).await?;
            Ok(ExitCode::SUCCESS)
        }
        // No subcommand provided, default to create behavior (interactive mode)
        None => create(&config, CreateArgs::default()).await,
    }
}
