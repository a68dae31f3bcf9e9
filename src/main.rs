//! dye CLI
//!
//! Usage:
//!   dye [OPTIONS] <COMMAND>
//!
//! Commands:
//!   apply    Print shell code that applies a theme
//!   preview  Show the resolved colors and styles of a theme
//!   print    Print text styled with a theme style
//!   agents   List the available agents
//!   themes   List the themes in the themes directory

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dye::{
    apply, render_preview, render_styled, resolve_theme, AgentRegistry, ApplyConfig, DyeError,
    PreviewConfig, Settings, Theme,
};

#[derive(Parser)]
#[command(name = "dye", version)]
#[command(about = "Apply a declarative color theme to fzf, ls, eza, iTerm and other shell tools")]
struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    debug: bool,

    /// Force color output even when stdout is not a terminal
    #[arg(short = 'F', long, global = true)]
    force_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ThemeArgs {
    /// Theme file to use
    #[arg(short = 't', long, value_name = "PATH", conflicts_with_all = ["theme", "no_theme"])]
    theme_file: Option<PathBuf>,

    /// Theme from the themes directory, by name
    #[arg(long, value_name = "NAME", conflicts_with = "no_theme")]
    theme: Option<String>,

    /// Don't load any theme, not even $DYE_THEME_FILE
    #[arg(long)]
    no_theme: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print shell code that applies a theme; use with `source <(dye apply)`
    Apply {
        #[command(flatten)]
        theme: ThemeArgs,

        /// Only apply these scopes (comma separated)
        #[arg(short, long, value_delimiter = ',', value_name = "SCOPE")]
        scope: Vec<String>,

        /// Add comments to the generated shell output
        #[arg(short, long)]
        comment: bool,
    },

    /// Show the resolved colors and styles of a theme
    Preview {
        #[command(flatten)]
        theme: ThemeArgs,
    },

    /// Print text styled with a theme style
    Print {
        #[command(flatten)]
        theme: ThemeArgs,

        /// Style to apply
        #[arg(short, long)]
        style: Option<String>,

        /// Don't print a trailing newline
        #[arg(short = 'n')]
        no_newline: bool,

        /// Text to print
        string: Vec<String>,
    },

    /// List the available agents
    Agents,

    /// List the themes in the themes directory
    Themes,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr) // stdout is for shell code
        .init();

    let settings = Settings::from_env();

    if let Err(e) = run(&cli, &settings) {
        let color = cli.force_color || (!settings.no_color && io::stderr().is_terminal());
        eprintln!("dye: {}", e.report(color));
        std::process::exit(1);
    }
}

fn run(cli: &Cli, settings: &Settings) -> Result<(), DyeError> {
    let color = cli.force_color || (!settings.no_color && io::stdout().is_terminal());

    match &cli.command {
        Command::Apply {
            theme,
            scope,
            comment,
        } => {
            let theme = load_theme(settings, theme, true)?;
            let mut config = ApplyConfig::new().with_comments(*comment);
            if !scope.is_empty() {
                config = config.with_scopes(scope.iter().cloned());
            }
            let out = apply(&theme, &config)?;
            if !out.is_empty() {
                println!("{}", out);
            }
        }
        Command::Preview { theme } => {
            let theme = load_theme(settings, theme, true)?;
            let resolved = resolve_theme(&theme)?;
            let config = PreviewConfig::new().with_color(color);
            println!("{}", render_preview(&theme, &resolved, &config));
        }
        Command::Print {
            theme,
            style,
            no_newline,
            string,
        } => {
            let theme = load_theme(settings, theme, false)?;
            let resolved = resolve_theme(&theme)?;
            let text = render_styled(&resolved, style.as_deref(), &string.join(" "), color)?;
            if *no_newline {
                print!("{}", text);
            } else {
                println!("{}", text);
            }
        }
        Command::Agents => {
            let registry = AgentRegistry::with_builtin();
            let width = registry.iter().map(|a| a.name().len()).max().unwrap_or(0);
            println!("{:width$}  Description", "Agent", width = width);
            for agent in registry.iter() {
                println!("{:width$}  {}", agent.name(), agent.description(), width = width);
            }
        }
        Command::Themes => {
            for name in settings.list_themes()? {
                println!("{}", name);
            }
        }
    }
    Ok(())
}

/// Load the theme chosen by the flags, the environment, or nothing
fn load_theme(settings: &Settings, args: &ThemeArgs, required: bool) -> Result<Theme, DyeError> {
    if args.no_theme {
        return Ok(Theme::default());
    }

    match settings.locate_theme(args.theme_file.as_deref(), args.theme.as_deref())? {
        Some(path) => {
            debug!(path = %path.display(), "loading theme");
            Ok(Theme::from_file(&path)?)
        }
        None if required => Err(DyeError::NoTheme),
        None => Ok(Theme::default()),
    }
}
