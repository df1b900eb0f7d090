//! CLI smoke adapter over `todo_core`.
//!
//! # Responsibility
//! - Turn argv/env into `StoreConfig` and `LogConfig`.
//! - Own the SQLite connection for the lifetime of one command.
//! - Print results as JSON on stdout and failures on stderr.

use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use todo_core::{
    default_log_level, init_logging, open_store, LogConfig, RepoError, SqliteTodoRepository,
    StoreConfig, TodoId, TodoService,
};

const DEFAULT_DB_FILE_NAME: &str = "todo.sqlite3";
const USAGE: &str = "usage: todo_cli [--db <path>|--memory] <command>
commands:
  add <task> [description]
  list
  show <id>
  status <id> <INIT|IN_PROGRESS|DONE>
  rm <id>";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Add { task: String, description: String },
    List,
    Show(TodoId),
    Status { id: TodoId, status: String },
    Remove(TodoId),
}

#[derive(Debug)]
struct Invocation {
    store: StoreConfig,
    command: Command,
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match parse_args(&args, std::env::var_os("TODO_DB_PATH").map(PathBuf::from))
    {
        Ok(invocation) => invocation,
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    if let Some(dir) = std::env::var_os("TODO_LOG_DIR") {
        let level =
            std::env::var("TODO_LOG_LEVEL").unwrap_or_else(|_| default_log_level().to_string());
        if let Err(err) = init_logging(&LogConfig::new(level, dir)) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(invocation) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(invocation: Invocation) -> Result<serde_json::Value, String> {
    let conn = open_store(&invocation.store).map_err(describe)?;
    let repo = SqliteTodoRepository::new(&conn);
    let service = TodoService::try_new(repo).map_err(describe)?;

    let output = match invocation.command {
        Command::Add { task, description } => {
            json!(service.create_todo(task, description).map_err(describe)?)
        }
        Command::List => json!(service.fetch_todos().map_err(describe)?),
        Command::Show(id) => json!(service.fetch_todo(id).map_err(describe)?),
        Command::Status { id, status } => {
            json!(service.update_status(id, &status).map_err(describe)?)
        }
        Command::Remove(id) => {
            service.delete_todo(id).map_err(describe)?;
            json!({ "deleted": id })
        }
    };
    log::debug!("event=cli_command module=cli status=ok");
    Ok(output)
}

fn describe(err: RepoError) -> String {
    format!("{}: {err}", err.code())
}

fn parse_args(args: &[String], env_db_path: Option<PathBuf>) -> Result<Invocation, String> {
    let mut store = StoreConfig::file(
        env_db_path.unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME)),
    );
    let mut rest = args;

    loop {
        match rest {
            [flag, path, tail @ ..] if flag == "--db" => {
                store = StoreConfig::file(path);
                rest = tail;
            }
            [flag, tail @ ..] if flag == "--memory" => {
                store = StoreConfig::memory();
                rest = tail;
            }
            _ => break,
        }
    }

    let command = match rest {
        [cmd, task] if cmd == "add" => Command::Add {
            task: task.clone(),
            description: String::new(),
        },
        [cmd, task, description] if cmd == "add" => Command::Add {
            task: task.clone(),
            description: description.clone(),
        },
        [cmd] if cmd == "list" => Command::List,
        [cmd, id] if cmd == "show" => Command::Show(parse_id(id)?),
        [cmd, id, status] if cmd == "status" => Command::Status {
            id: parse_id(id)?,
            status: status.clone(),
        },
        [cmd, id] if cmd == "rm" => Command::Remove(parse_id(id)?),
        [] => return Err("missing command".to_string()),
        [cmd, ..] => return Err(format!("unrecognized arguments for `{cmd}`")),
    };

    Ok(Invocation { store, command })
}

fn parse_id(raw: &str) -> Result<TodoId, String> {
    raw.parse::<TodoId>()
        .map_err(|_| format!("invalid id `{raw}`"))
}

#[cfg(test)]
mod tests {
    use super::{parse_args, run, Command, Invocation};
    use std::path::PathBuf;
    use todo_core::{StoreConfig, StoreLocation};

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| (*arg).to_string()).collect()
    }

    #[test]
    fn db_flag_overrides_env_path() {
        let invocation = parse_args(
            &args(&["--db", "/tmp/explicit.sqlite3", "list"]),
            Some(PathBuf::from("/tmp/env.sqlite3")),
        )
        .unwrap();

        assert_eq!(
            invocation.store.location,
            StoreLocation::File(PathBuf::from("/tmp/explicit.sqlite3"))
        );
        assert_eq!(invocation.command, Command::List);
    }

    #[test]
    fn status_command_parses_id() {
        let invocation = parse_args(&args(&["status", "3", "DONE"]), None).unwrap();
        assert_eq!(
            invocation.command,
            Command::Status {
                id: 3,
                status: "DONE".to_string()
            }
        );
    }

    #[test]
    fn bad_id_and_missing_command_are_usage_errors() {
        assert!(parse_args(&args(&["show", "abc"]), None).is_err());
        assert!(parse_args(&args(&["--memory"]), None).is_err());
    }

    #[test]
    fn add_runs_against_memory_store() {
        let output = run(Invocation {
            store: StoreConfig::memory(),
            command: Command::Add {
                task: "smoke".to_string(),
                description: String::new(),
            },
        })
        .unwrap();

        assert_eq!(output["task"], "smoke");
        assert_eq!(output["status"], "INIT");
    }

    #[test]
    fn unreachable_store_reports_storage_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let message = run(Invocation {
            store: StoreConfig::file(dir.path().join("missing").join("todo.sqlite3")),
            command: Command::List,
        })
        .unwrap_err();
        assert!(message.starts_with("storage_unavailable"));
    }

    #[test]
    fn failures_carry_error_code() {
        let message = run(Invocation {
            store: StoreConfig::memory(),
            command: Command::Show(1),
        })
        .unwrap_err();
        assert!(message.starts_with("not_found"));
    }
}
