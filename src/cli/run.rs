//! Command execution for the CLI.
//!
//! This module handles running CLI commands and producing output.

use crate::cli::{is_std_stream, Cli, Command};
use crate::config::{self, Config};
use crate::error::Error;
use crate::event_log::EventLog;
use crate::paths;
use crate::storage::FileSlot;
use crate::tasks::snapshot::export_file_name;
use crate::tasks::{FilterMode, SortMode, TaskStore};
use crate::templates;
use crate::view::{build_stats_view, build_view};
use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Output from running the CLI, with separate stdout and stderr messages.
#[derive(Debug)]
pub struct CliOutput {
    /// Exit code for the process.
    pub exit_code: ExitCode,
    /// Messages to print to stdout.
    pub stdout: Vec<String>,
    /// Messages to print to stderr.
    pub stderr: Vec<String>,
}

/// Everything a command needs to find its files.
struct Session {
    data_dir: PathBuf,
    config: Config,
    tasks_path: PathBuf,
}

impl Session {
    fn new(data_dir: PathBuf, data_file: Option<PathBuf>) -> Self {
        let config = Config::load_or_default(&data_dir);
        let tasks_path = data_file.unwrap_or_else(|| config.tasks_path(&data_dir));
        Self { data_dir, config, tasks_path }
    }

    fn open_store(&self) -> TaskStore<FileSlot> {
        let store = TaskStore::open(FileSlot::new(&self.tasks_path));
        if self.config.debug_logging {
            store.with_event_log(EventLog::in_dir(&self.data_dir))
        } else {
            store
        }
    }
}

/// Run a CLI command with the given stdin input.
pub fn run(cli: Cli, stdin: &str) -> CliOutput {
    let Some(data_dir) = cli.data_dir.or_else(paths::data_dir) else {
        return error_output("Error: Could not determine home directory".to_string());
    };

    let session = Session::new(data_dir, cli.data_file);

    match cli.command {
        Command::Version => run_version(),
        Command::EnsureConfig => run_ensure_config(&session.data_dir),
        Command::Add { text, priority } => {
            mutation_output(session.open_store().add(&text, priority), json_output)
        }
        Command::Toggle { id } => {
            mutation_output(session.open_store().toggle_complete(&id), json_output)
        }
        Command::Edit { id, text, priority } => {
            run_edit(&mut session.open_store(), &id, &text, priority)
        }
        Command::Delete { id } => mutation_output(session.open_store().delete(&id), json_output),
        Command::ClearCompleted => {
            mutation_output(session.open_store().clear_completed(), |&count| {
                if count == 0 {
                    success_output("No completed tasks to clear.".to_string())
                } else {
                    success_output(format!("Cleared {count} completed task(s)."))
                }
            })
        }
        Command::List { filter, sort, json } => {
            run_list(&session, &mut session.open_store(), filter, sort, json)
        }
        Command::Stats { json } => run_stats(&session, &session.open_store(), json),
        Command::Export { output } => run_export(&session.open_store(), output.as_deref()),
        Command::Import { path } => run_import(&mut session.open_store(), &path, stdin),
    }
}

// === Utility Commands ===

fn run_version() -> CliOutput {
    CliOutput {
        exit_code: ExitCode::SUCCESS,
        stdout: vec![],
        stderr: vec![format!("tasklist v{}", crate::VERSION)],
    }
}

fn run_ensure_config(data_dir: &Path) -> CliOutput {
    match config::ensure_config(data_dir) {
        Ok((config, created)) => {
            let verb = if created { "Created" } else { "Found" };
            let mut messages =
                vec![format!("{verb} config at {}", paths::config_path(data_dir).display())];
            messages.push(format!("  tasks: {}", config.tasks_path(data_dir).display()));
            messages.push(format!("  default_filter: {}", config.default_filter));
            messages.push(format!("  default_sort: {}", config.default_sort));
            messages.push(format!("  debug_logging: {}", config.debug_logging));
            CliOutput { exit_code: ExitCode::SUCCESS, stdout: vec![], stderr: messages }
        }
        Err(e) => error_output(format!("Error ensuring config: {e}")),
    }
}

// === Task Commands ===

fn run_edit(
    store: &mut TaskStore<FileSlot>,
    id: &str,
    text: &str,
    priority: Option<crate::tasks::Priority>,
) -> CliOutput {
    let Some(current) = store.get(id) else {
        return error_output(format!("Error: {}", Error::NotFound(id.to_string())));
    };
    let priority = priority.unwrap_or(current.priority);
    mutation_output(store.edit(id, text, priority), json_output)
}

fn run_list(
    session: &Session,
    store: &mut TaskStore<FileSlot>,
    filter: Option<FilterMode>,
    sort: Option<SortMode>,
    json: bool,
) -> CliOutput {
    store.set_filter(filter.unwrap_or(session.config.default_filter));
    store.set_sort(sort.unwrap_or(session.config.default_sort));
    let tasks = store.query();

    if json {
        return json_output(&tasks);
    }

    let view = build_view(&tasks, &store.stats(), store.filter(), store.sort(), Utc::now());
    render_output(session, || templates::render_list(&view))
}

fn run_stats(session: &Session, store: &TaskStore<FileSlot>, json: bool) -> CliOutput {
    let stats = store.stats();
    if json {
        return json_output(&stats);
    }

    let view = build_stats_view(&stats);
    render_output(session, || templates::render_stats(&view))
}

fn run_export(store: &TaskStore<FileSlot>, output: Option<&Path>) -> CliOutput {
    let snapshot = match store.export_snapshot() {
        Ok(s) => s,
        Err(e) => return error_output(format!("Error: {e}")),
    };

    let path = match output {
        Some(path) if is_std_stream(path) => return success_output(snapshot),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(export_file_name(Utc::now().date_naive())),
    };

    match std::fs::write(&path, snapshot) {
        Ok(()) => success_output(format!("Exported {} task(s) to {}", store.len(), path.display())),
        Err(e) => error_output(format!("Error writing {}: {e}", path.display())),
    }
}

fn run_import(store: &mut TaskStore<FileSlot>, path: &Path, stdin: &str) -> CliOutput {
    let data = if is_std_stream(path) {
        stdin.to_string()
    } else {
        match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) => return error_output(format!("Error reading {}: {e}", path.display())),
        }
    };

    mutation_output(store.import_snapshot(&data), |&count| {
        success_output(format!("Imported {count} task(s)."))
    })
}

// === Helpers ===

/// Turn the result of a store mutation into output.
///
/// A persistence failure means the command took effect in memory but was
/// not saved, so it is reported as a warning rather than as a rejection.
fn mutation_output<T>(
    result: crate::error::Result<T>,
    on_success: impl FnOnce(&T) -> CliOutput,
) -> CliOutput {
    match result {
        Ok(value) => on_success(&value),
        Err(e) if e.is_no_op() => error_output(format!("Error: {e}")),
        Err(e) => error_output(format!("Warning: {e}")),
    }
}

fn render_output(
    session: &Session,
    render: impl FnOnce() -> crate::error::Result<String>,
) -> CliOutput {
    if let Err(e) = templates::init_templates(Some(&paths::templates_dir(&session.data_dir))) {
        return error_output(format!("Error: {e}"));
    }
    match render() {
        Ok(text) => success_output(text.trim_end().to_string()),
        Err(e) => error_output(format!("Error: {e}")),
    }
}

fn json_output<T: Serialize>(value: &T) -> CliOutput {
    match serde_json::to_string_pretty(value) {
        Ok(json) => CliOutput { exit_code: ExitCode::SUCCESS, stdout: vec![json], stderr: vec![] },
        Err(e) => error_output(e.to_string()),
    }
}

fn success_output(message: String) -> CliOutput {
    CliOutput { exit_code: ExitCode::SUCCESS, stdout: vec![message], stderr: vec![] }
}

fn error_output(message: String) -> CliOutput {
    CliOutput { exit_code: ExitCode::from(1), stdout: vec![], stderr: vec![message] }
}
