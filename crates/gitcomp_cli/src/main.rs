//! `git-comp` command-line entry point.
//!
//! # Responsibility
//! - Parse verbs and route them to `gitcomp_core::CompService`.
//! - Resolve the configuration path once and pass it down explicitly.
//! - Choose output sinks (stdout or a commit message file).

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gitcomp_core::{
    init_logging, resolve_config_path, CompService, ConfigKey, GitIdentityProvider, HookGuard,
    Identity, IdentityError, IdentityProvider, RenderContext, RenderRequest, Strictness,
    TEMPLATE_FIELDS,
};
use log::info;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "git-comp",
    version,
    about = "git-comp is a git plugin to facilitate composition of commits."
)]
struct Cli {
    /// Configuration file path [default: ~/.git-comp.yaml]
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<String>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Write logs to rolling files in this absolute directory instead of stderr.
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Initialize git-comp and install the prepare-commit-msg hook.
    Init {
        /// Repository root to install the hook into [default: ask git from the
        /// current directory].
        #[arg(long, value_name = "DIR")]
        repo: Option<PathBuf>,
    },
    /// Manage authors.
    #[command(subcommand)]
    Author(AuthorCommand),
    /// Manage configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Render the commit message template.
    Render(RenderArgs),
}

#[derive(Debug, Subcommand)]
enum AuthorCommand {
    /// Add an author.
    Add {
        id: String,
        name: String,
        email: String,
    },
    /// List authors.
    List,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Display configuration.
    Display,
    /// Set configuration.
    #[command(after_help = config_set_after_help())]
    Set { key: String, value: String },
}

#[derive(Debug, Args)]
#[command(after_help = render_after_help())]
struct RenderArgs {
    /// Value bound to {{Type}}.
    #[arg(long = "type", value_name = "TYPE")]
    kind: Option<String>,
    #[arg(long)]
    scope: Option<String>,
    #[arg(long)]
    subject: Option<String>,
    #[arg(long)]
    body: Option<String>,
    #[arg(long)]
    issue: Option<String>,
    #[arg(long)]
    footer: Option<String>,
    /// Author id or email added as a Co-authored-by trailer; repeatable.
    #[arg(long = "co-author", value_name = "ID|EMAIL")]
    co_authors: Vec<String>,
    /// Render unbound fields as empty text instead of failing.
    #[arg(long)]
    lenient: bool,
    /// Write the message to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl RenderArgs {
    fn into_request(self) -> (RenderRequest, Option<PathBuf>) {
        let request = RenderRequest {
            context: RenderContext {
                kind: self.kind,
                scope: self.scope,
                subject: self.subject,
                body: self.body,
                issue: self.issue,
                footer: self.footer,
                co_authors: None,
            },
            co_authors: self.co_authors,
            strictness: if self.lenient {
                Strictness::Lenient
            } else {
                Strictness::Strict
            },
        };
        (request, self.output)
    }
}

fn config_set_after_help() -> String {
    let keys: Vec<&str> = ConfigKey::ALL.iter().map(|key| key.as_str()).collect();
    format!(
        "Valid keys:\n  {}\n\nExample:\n  git-comp config set issue_tracker \"Jira\"",
        keys.join("\n  ")
    )
}

fn render_after_help() -> String {
    format!("Template fields: {}", TEMPLATE_FIELDS.join(", "))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(&cli.log_level, cli.log_dir.as_deref()).map_err(anyhow::Error::msg)?;

    let config_path = resolve_config_path(cli.config.as_deref())?;
    info!(
        "event=cli_start module=cli status=ok config={}",
        config_path.display()
    );
    let service = CompService::new(config_path, LazyGitIdentity);
    dispatch(&service, cli.command)
}

fn dispatch(service: &CompService<LazyGitIdentity>, command: Command) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    match command {
        Command::Init { repo } => {
            let guard = match repo {
                Some(repo) => HookGuard::for_repository(repo),
                None => discover_hooks()?,
            };
            let report = service.init_with_guard(guard)?;
            if report.config_created {
                writeln!(stdout, "created {}", report.config_path.display())?;
            }
            writeln!(stdout, "installed {}", report.hook_path.display())?;
        }
        Command::Author(AuthorCommand::Add { id, name, email }) => {
            let author = service.add_author(&id, &name, &email)?;
            writeln!(stdout, "added {}: {}", author.id, author.render())?;
        }
        Command::Author(AuthorCommand::List) => {
            let authors = service.list_authors()?;
            if authors.is_empty() {
                writeln!(stdout, "no authors")?;
            }
            for author in authors {
                writeln!(stdout, "{}", author.render())?;
            }
        }
        Command::Config(ConfigCommand::Display) => {
            let yaml = service.display_config()?;
            write!(stdout, "---\n{yaml}")?;
        }
        Command::Config(ConfigCommand::Set { key, value }) => {
            let key = service.set_config(&key, &value)?;
            writeln!(stdout, "set {}", key.as_str())?;
        }
        Command::Render(args) => {
            let (request, output) = args.into_request();
            let message = service.render(&request)?;
            match output {
                Some(path) => std::fs::write(&path, &message)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => writeln!(stdout, "{message}")?,
            }
        }
    }
    Ok(())
}

/// Hooks directory of the repository containing the current directory.
fn discover_hooks() -> Result<HookGuard> {
    let git = GitIdentityProvider::new()?;
    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    Ok(HookGuard::discover(git.git_path(), &cwd)?)
}

/// Defers locating `git` until an identity is actually needed, so commands
/// against an existing configuration work without git on `PATH`.
struct LazyGitIdentity;

impl IdentityProvider for LazyGitIdentity {
    fn identity(&self) -> std::result::Result<Identity, IdentityError> {
        GitIdentityProvider::new()?.identity()
    }
}
