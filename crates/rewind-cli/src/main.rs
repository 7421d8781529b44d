mod completion;
mod interrupt;
mod messages;
mod prompt;
mod render;
mod session;
mod update;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use rewind_archive::{AvailabilityChecker, HttpDirectoryLister, HttpTransport, SnapshotNavigator};
use rewind_core::RewindConfig;
use rewind_mirror::MirrorConfig;
use tracing_subscriber::EnvFilter;

use crate::completion::{write_completions_script, CliCompletionShell};
use crate::interrupt::{spawn_interrupt_watcher, RestoreGuard};
use crate::messages::{Locale, Message};
use crate::prompt::TerminalPrompt;
use crate::render::TerminalRenderer;
use crate::session::{RollbackSession, RunOutcome, SessionOptions};
use crate::update::{ensure_privileged, run_system_update};

#[derive(Parser, Debug)]
#[command(name = "rewind", version)]
#[command(
    about = "Update pacman against a dated Arch Linux archive snapshot, then restore the mirrorlist",
    long_about = None
)]
pub(crate) struct Cli {
    /// Config file (default: /etc/rewind.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    endpoint: Option<String>,
    #[arg(long, global = true)]
    arch: Option<String>,
    #[arg(long, global = true)]
    mirrorlist: Option<PathBuf>,
    #[arg(long, global = true)]
    backup: Option<PathBuf>,
    /// Skip the initial confirmation
    #[arg(short = 'y', long)]
    yes: bool,
    /// Select and validate a date, print the mirror line, change nothing
    #[arg(long)]
    dry_run: bool,
    #[arg(long, global = true)]
    no_root_check: bool,
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Restore the mirrorlist from the backup left by an earlier run
    Restore,
    Completions {
        #[arg(value_enum)]
        shell: CliCompletionShell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run_cli(cli) {
        Ok(code) => code,
        Err(err) => {
            TerminalRenderer::current().print_error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn run_cli(cli: Cli) -> Result<ExitCode> {
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut stdout = std::io::stdout();
        write_completions_script(*shell, &mut stdout)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;
    let locale = Locale::detect();
    let renderer = TerminalRenderer::current();

    match &cli.command {
        Some(Commands::Restore) => {
            if !cli.no_root_check {
                ensure_privileged("rewind restore")?;
            }
            let mirror = MirrorConfig::from_config(&config);
            renderer.print_status("step", locale.text(Message::Restoring));
            mirror.restore()?;
            renderer.print_status("ok", locale.text(Message::Restored));
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Completions { .. }) => Ok(ExitCode::SUCCESS),
        None => run_rollback(&cli, &config, locale, renderer),
    }
}

fn run_rollback(
    cli: &Cli,
    config: &RewindConfig,
    locale: Locale,
    renderer: TerminalRenderer,
) -> Result<ExitCode> {
    if !cli.no_root_check && !cli.dry_run {
        ensure_privileged("rewind")?;
    }

    let guard = Arc::new(RestoreGuard::new(MirrorConfig::from_config(config)));
    spawn_interrupt_watcher(Arc::clone(&guard), locale)?;

    let transport = HttpTransport::new(config.http_timeout())
        .context("failed to initialize archive client")?;
    let navigator = SnapshotNavigator::new(
        config.endpoint.clone(),
        HttpDirectoryLister::new(transport.clone()),
    );
    let checker = AvailabilityChecker::from_config(transport, config);
    let options = SessionOptions {
        assume_yes: cli.yes,
        dry_run: cli.dry_run,
    };

    renderer.print_section("rewind");
    let mut session = RollbackSession::new(
        navigator,
        checker,
        guard,
        || run_system_update(config),
        options,
        locale,
        renderer,
    );
    let mut prompt = TerminalPrompt::stdio(locale);
    let outcome = session.run(&mut prompt).map_err(|err| {
        if session.state().has_mutated() {
            tracing::error!(state = ?session.state(), "rollback failed after the mirrorlist was touched");
        }
        err
    })?;

    let code = match outcome {
        RunOutcome::Completed { selection, .. } => {
            tracing::info!(date = %selection, "rollback completed");
            ExitCode::SUCCESS
        }
        RunOutcome::DryRun { .. } | RunOutcome::Declined => ExitCode::SUCCESS,
        RunOutcome::Cancelled => ExitCode::FAILURE,
    };
    Ok(code)
}

fn load_config(cli: &Cli) -> Result<RewindConfig> {
    let mut config = RewindConfig::load_or_default(cli.config.as_deref())?;
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(arch) = &cli.arch {
        config.arch = arch.clone();
    }
    if let Some(mirrorlist) = &cli.mirrorlist {
        config.mirrorlist_path = mirrorlist.clone();
    }
    if let Some(backup) = &cli.backup {
        config.backup_path = backup.clone();
    }
    config
        .validate()
        .context("invalid configuration after applying command-line overrides")?;
    Ok(config)
}
