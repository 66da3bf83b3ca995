use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use selftape_types::Role;
use selftape_util::AppSettings;

mod cli;
mod commands;

use cli::{Cli, Command};
use commands::Session;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Command::Edit { .. }));
    let settings = AppSettings::load();
    init_tracing(interactive.then(|| settings.resolved_log_path()).as_deref());

    let session = Session::open(&cli, &settings)?;
    match cli.command {
        // No subcommand => editor
        None => session.edit(None),
        Some(Command::Edit { target }) => session.edit(target),
        Some(command) => {
            let mut stdout = std::io::stdout().lock();
            commands::execute(&session, command, &mut stdout)
        }
    }
}

/// Logs go to stderr, or to `log_file` while the terminal UI owns the screen.
fn init_tracing(log_file: Option<&Path>) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let Some(path) = log_file else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        return;
    };
    // Without a writable log file the UI runs unlogged rather than drawing over the screen.
    if let Ok(file) = open_log_file(path) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    }
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent).with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// Store file: `--store`, then settings and `SELFTAPE_STORE_PATH`.
fn resolve_store_path(cli: &Cli, settings: &AppSettings) -> PathBuf {
    cli.store.clone().unwrap_or_else(|| settings.resolved_store_path())
}

/// Signed-in identity: flags, then settings, then a local administrator.
fn resolve_identity(cli: &Cli, settings: &AppSettings) -> (String, Role) {
    let user_id = cli
        .user
        .clone()
        .or_else(|| settings.user_id.clone())
        .unwrap_or_else(|| "local".to_string());
    let role = cli.role.or(settings.role).unwrap_or(Role::Admin);
    (user_id, role)
}
