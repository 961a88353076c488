//! Charm-style CLI prompts using cliclack

use crate::config::{SettingsOverrides, WizardSettings};
use crate::error::WizardError;
use crate::game::{self, GameInfo};
use crate::product::ProductConfig;
use crate::project::{self, ProjectRequest};
use crate::report;
use crate::templates::{version, LoadedTemplate, TemplateSource};
use anyhow::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Game executable to inspect
    pub exe: Option<PathBuf>,

    /// Mod name (also the project folder and namespace)
    pub name: Option<String>,

    /// Folder the project directory is created in
    pub output: Option<PathBuf>,

    /// Author written into the mod info attribute
    pub author: Option<String>,

    /// Local directory to use as the template
    pub template_dir: Option<PathBuf>,

    /// URL of a template zip
    pub template_url: Option<String>,

    /// Open the project folder when done
    pub open: bool,

    /// Write into an existing non-empty project folder
    pub force: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// How a run ended, for the binary's exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
    Failed,
}

/// Run the create flow with interactive prompts. Every error ends here and
/// is shown to the user; only terminal I/O failures escape.
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<Outcome> {
    cliclack::intro(config.display_name())?;

    match create(config, args, cli_version).await {
        Ok(()) => Ok(Outcome::Completed),
        Err(e) if is_cancelled(&e) => {
            cliclack::outro_cancel("Project creation cancelled.")?;
            Ok(Outcome::Cancelled)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "project creation failed");
            cliclack::log::error(failure_message("Error during project creation", &e))?;
            cliclack::outro_cancel("No project was created.")?;
            Ok(Outcome::Failed)
        }
    }
}

/// Inspect a game and print the report. Errors are shown the same way
/// [`run`] shows them.
pub fn run_inspect(exe: &Path) -> Result<Outcome> {
    let exe = absolutize(exe.to_path_buf());
    match game::inspect(&exe) {
        Ok(info) => {
            let references = game::resolve(&info);
            print!("{}", report::inspection_report(&info, &references));
            Ok(Outcome::Completed)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "inspection failed");
            cliclack::log::error(failure_message("Error inspecting game", &e))?;
            Ok(Outcome::Failed)
        }
    }
}

/// User-facing text for a failed run: the error chain, without backtrace
fn failure_message(context: &str, error: &impl std::fmt::Display) -> String {
    format!("{}: {:#}", context, error)
}

async fn create<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    let settings = WizardSettings::resolve(
        config,
        SettingsOverrides {
            author: args.author.clone(),
            template_dir: args.template_dir.clone(),
            template_url: args.template_url.clone(),
            open_after: args.open,
            overwrite: args.force,
        },
    )?;

    // Step 1: Select and inspect the game
    let exe = select_executable(&args)?;
    let game = inspect_game(&exe)?;

    // Step 2: Name the mod
    let mod_name = select_mod_name(&args)?;

    // Step 3: Select where the project goes
    let output_dir = select_output_dir(&args)?;
    let overwrite = confirm_target(&output_dir.join(&mod_name), &settings, &args)?;

    // Step 4: Load the template
    let template = load_template(config, &settings.template_source, cli_version).await?;

    // Step 5: Create project
    let request = ProjectRequest {
        game,
        mod_name,
        author: settings.author.clone(),
        output_dir,
        overwrite,
    };
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");
    let created = match project::create_project(&template, &request).await {
        Ok(created) => created,
        Err(e) => {
            spinner.error("Failed to create project");
            return Err(e);
        }
    };
    spinner.stop(format!(
        "Created {} files with {} references in {}",
        created.files.len(),
        created.references.len(),
        created.path.display()
    ));

    for key in &created.missing_keys {
        cliclack::log::warning(format!("Replacement for key \"{}\" not found.", key))?;
    }

    // Step 6: Optionally open the result
    if settings.open_after {
        if let Err(e) = project::open_project(&created.path) {
            cliclack::log::warning(format!("Failed to open project: {}", e))?;
        }
    }

    // Step 7: Show next steps
    print_next_steps(config, &created.path, &request.game)?;

    Ok(())
}

fn is_cancelled(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<WizardError>()
        .is_some_and(WizardError::is_cancelled)
}

/// Turn a dismissed prompt into [`WizardError::UserCancelled`]
fn answered<T>(result: std::io::Result<T>) -> Result<T> {
    result.map_err(|e| match e.kind() {
        ErrorKind::Interrupted => WizardError::UserCancelled.into(),
        _ => anyhow::Error::from(e),
    })
}

fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    }
}

fn select_executable(args: &CreateArgs) -> Result<PathBuf> {
    if let Some(exe) = &args.exe {
        let exe = absolutize(exe.clone());
        cliclack::log::info(format!("Using executable: {}", exe.display()))?;
        return Ok(exe);
    }

    if args.yes {
        anyhow::bail!("No executable file selected. Pass --exe in non-interactive mode.");
    }

    let input: String = answered(
        cliclack::input("Game executable")
            .placeholder("C:/Games/MyGame/MyGame.exe")
            .validate(|input: &String| {
                let path = Path::new(input.trim().trim_matches('"'));
                if input.trim().is_empty() {
                    Err("No executable file selected.")
                } else if !path.is_file() {
                    Err("File does not exist.")
                } else {
                    Ok(())
                }
            })
            .interact(),
    )?;

    Ok(absolutize(PathBuf::from(input.trim().trim_matches('"'))))
}

fn inspect_game(exe: &Path) -> Result<GameInfo> {
    let info = game::inspect(exe)?;

    cliclack::log::success(format!(
        "{} by {}, MelonLoader {} ({})",
        info.game_name, info.game_developer, info.framework_version, info.backend
    ))?;
    if info.framework_version == game::FrameworkVersion::default() {
        cliclack::log::warning(
            "Could not read the MelonLoader version; assuming the oldest layout.",
        )?;
    }

    Ok(info)
}

fn select_mod_name(args: &CreateArgs) -> Result<String> {
    if let Some(name) = &args.name {
        project::validate_mod_name(name)?;
        cliclack::log::info(format!("Mod name: {}", name))?;
        return Ok(name.clone());
    }

    if args.yes {
        anyhow::bail!("Mod name is required. Pass --name in non-interactive mode.");
    }

    let name: String = answered(
        cliclack::input("Mod name")
            .placeholder("MyAwesomeMod")
            .validate(|input: &String| {
                project::validate_mod_name(input).map_err(|e| e.to_string())
            })
            .interact(),
    )?;

    Ok(name)
}

fn select_output_dir(args: &CreateArgs) -> Result<PathBuf> {
    let path = if let Some(dir) = &args.output {
        let p = absolutize(dir.clone());
        cliclack::log::info(format!("Using directory: {}", p.display()))?;
        p
    } else if args.yes {
        absolutize(PathBuf::from("."))
    } else {
        let input: String = answered(
            cliclack::input("Project location")
                .placeholder(".")
                .default_input(".")
                .interact(),
        )?;
        absolutize(PathBuf::from(input.trim()))
    };

    if !path.is_dir() {
        anyhow::bail!("Project location does not exist: {}", path.display());
    }

    Ok(path)
}

/// Decide whether writing into `project_dir` may overwrite existing files
fn confirm_target(project_dir: &Path, settings: &WizardSettings, args: &CreateArgs) -> Result<bool> {
    let count = std::fs::read_dir(project_dir)
        .map(|entries| entries.count())
        .unwrap_or(0);
    if count == 0 || settings.overwrite {
        return Ok(settings.overwrite);
    }

    cliclack::log::warning(format!(
        "{} already has {} existing items",
        project_dir.display(),
        count
    ))?;

    if args.yes {
        return Err(WizardError::TargetNotEmpty {
            path: project_dir.to_path_buf(),
        }
        .into());
    }

    let confirm: bool = answered(
        cliclack::confirm("Write into it anyway?")
            .initial_value(false)
            .interact(),
    )?;

    if confirm {
        Ok(true)
    } else {
        Err(WizardError::UserCancelled.into())
    }
}

async fn load_template<C: ProductConfig>(
    config: &C,
    source: &TemplateSource,
    cli_version: &str,
) -> Result<LoadedTemplate> {
    let spinner = cliclack::spinner();
    spinner.start(format!("Loading {}...", source.describe()));

    let template = match source.load(config.user_agent()).await {
        Ok(template) => template,
        Err(e) => {
            spinner.error("Failed to load template");
            return Err(e);
        }
    };
    spinner.stop(format!("Template: {}", template.manifest.name));

    if let Some(warning) =
        version::check_compatibility(cli_version, &template.manifest, config.upgrade_command())
    {
        cliclack::log::warning(warning)?;
    }

    Ok(template)
}

fn print_next_steps<C: ProductConfig>(config: &C, project_dir: &Path, game: &GameInfo) -> Result<()> {
    let steps = config.next_steps(project_dir, game);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro(format!(
        "Project created successfully at {}",
        project_dir.display()
    ))?;

    Ok(())
}
