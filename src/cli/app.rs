//! Main CLI application

use crate::config::{load_config, validate_config, Config};
use crate::error::{DiscoveryError, ExecutionError};
use crate::runner::{Context, ProcessManager, Selector, TerminalPrompt, Verbosity};
use crate::scripts::{candidate_directories, DiscoveryRules, Registry, ScriptEntry};
use crate::ui;
use anyhow::Context as _;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
}

impl App {
    pub fn new() -> Self {
        App {
            command: build_command(),
        }
    }

    /// Run the application with the process arguments
    pub async fn run(self) -> anyhow::Result<i32> {
        self.run_from(std::env::args_os()).await
    }

    /// Run the application with explicit arguments (first one is the binary name)
    pub async fn run_from<I, T>(mut self, args: I) -> anyhow::Result<i32>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().get_matches_from(args);

        if let Some(shell) = matches.get_one::<Shell>("completions") {
            clap_complete::generate(*shell, &mut self.command, "script-runner", &mut io::stdout());
            return Ok(0);
        }

        let verbosity = get_verbosity(&matches);
        super::init_logging(verbosity);

        let working_dir = std::env::current_dir().context("Failed to get current directory")?;
        let config_file = matches.get_one::<PathBuf>("file").map(PathBuf::as_path);
        let (config, config_path) =
            load_config(config_file, &working_dir).context("Failed to load configuration")?;
        validate_config(&config)?;

        if config.dotenv {
            load_dotenv(&working_dir);
        }

        let ctx = Context::from_config(&config)
            .with_working_dir(working_dir.clone())
            .with_verbosity(verbosity);
        if let Some(path) = &config_path {
            ctx.print_debug(&format!("Using config file: {}", path.display()));
        }

        let custom_dir = matches.get_one::<PathBuf>("path").map(PathBuf::as_path);
        let scripts = discover_scripts(&config, &ctx, &working_dir, custom_dir);

        if matches.get_flag("list") {
            ui::list_scripts(&scripts);
            return Ok(0);
        }

        let requested = matches.get_one::<String>("script").map(String::as_str);
        if requested.is_none() && ctx.verbosity >= Verbosity::Normal {
            ui::welcome_banner();
        }

        let prompt = TerminalPrompt::new();
        let name = Selector::new(&prompt, config.page_size).resolve(requested, &scripts)?;

        if requested.is_some() {
            ctx.print_debug(&format!("Running script: {}", name));
        } else {
            ctx.print_debug(&format!("Running selected script: {}", name));
        }

        let extra_args: Vec<String> = matches
            .get_many::<String>("args")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        let manager = ProcessManager::new(ctx.clone());
        match manager.execute(&name, &scripts, &extra_args).await {
            Ok(outcome) => Ok(outcome.exit_code()),
            Err(e) => {
                tracing::debug!(error = %e, script = %name, "script run failed");
                // Abnormal exits and spawn failures are reported as they resolve
                if !matches!(e, ExecutionError::AbnormalExit { .. } | ExecutionError::Spawn { .. }) {
                    ctx.print_error(&e.to_string());
                }
                Ok(e.exit_code())
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("script-runner")
        .version(crate::VERSION)
        .about("Discover, pick and run project scripts")
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Custom scripts directory path"),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List all available scripts")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("script")
                .short('s')
                .long("script")
                .value_name("NAME")
                .help("Run a specific script directly"),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Path to script-runner.yml config file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Show detailed script execution information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print script output and errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .value_parser(value_parser!(Shell))
                .help("Print a shell completion script and exit"),
        )
        .arg(
            Arg::new("args")
                .value_name("ARGS")
                .help("Arguments passed to the script (after --)")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Build the registry from the first candidate directory holding scripts
fn discover_scripts(
    config: &Config,
    ctx: &Context,
    working_dir: &Path,
    custom_dir: Option<&Path>,
) -> Vec<ScriptEntry> {
    let candidates = candidate_directories(working_dir, custom_dir, &config.directories);
    let registry = Registry::new(DiscoveryRules::from_config(config));
    let discovery = registry.discover(&candidates);

    for dir in &discovery.searched {
        ctx.print_debug(&format!("Searching for scripts in: {}", dir.display()));
    }

    for problem in &discovery.problems {
        match problem {
            DiscoveryError::DirectoryNotFound(_) => ctx.print_debug(&format!("  {}", problem)),
            DiscoveryError::Io { .. } => ctx.print_warn(&format!("❌ {}", problem)),
        }
    }

    if let Some(dir) = &discovery.directory {
        if ctx.is_verbose() {
            ctx.print_success(&format!(
                "✓ Found {} scripts in {}",
                discovery.entries.len(),
                dir.display()
            ));
        }
    }

    discovery.entries
}

/// Load `.env` from the working directory; a missing file is not an error
fn load_dotenv(working_dir: &Path) {
    let path = working_dir.join(".env");
    match dotenvy::from_path(&path) {
        Ok(()) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "failed to load environment file"),
    }
}

/// Run the CLI application with the process arguments
pub async fn run() -> anyhow::Result<i32> {
    App::new().run().await
}
