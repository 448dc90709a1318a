use std::path::PathBuf;

use serde::Serialize;

use crate::ascension::get_char_detail;
use crate::config::AppConfig;
use crate::data::{validate_character_dataset, CharacterDataset};
use crate::parallel::WorkerPool;

const USAGE: &str = "usage: waves-ascension <detail|lookup|model|validate|fingerprint>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Detail,
    Lookup,
    Model,
    Validate,
    Fingerprint,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("detail") => Some(Command::Detail),
        Some("lookup") => Some(Command::Lookup),
        Some("model") => Some(Command::Model),
        Some("validate") => Some(Command::Validate),
        Some("fingerprint") => Some(Command::Fingerprint),
        _ => None,
    }
}

pub fn run_with_args(args: &[String], config: &AppConfig) -> i32 {
    match parse_command(args) {
        Some(Command::Detail) => handle_detail(args, config),
        Some(Command::Lookup) => handle_lookup(args, config),
        Some(Command::Model) => handle_model(args, config),
        Some(Command::Validate) => handle_validate(args, config),
        Some(Command::Fingerprint) => handle_fingerprint(args, config),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_detail(args: &[String], config: &AppConfig) -> i32 {
    let (Some(char_id), Some(raw_level)) = (args.get(2), args.get(3)) else {
        eprintln!("usage: waves-ascension detail <char_id> <level> [breach]");
        return 2;
    };
    let Ok(level) = raw_level.parse::<u32>() else {
        eprintln!("invalid level '{raw_level}'");
        return 2;
    };
    let breach = match args.get(4).map(|raw| raw.parse::<i32>()) {
        None => None,
        Some(Ok(breach)) => Some(breach),
        Some(Err(_)) => {
            eprintln!("invalid breach '{}'", args[4]);
            return 2;
        }
    };

    let dataset = CharacterDataset::from_config(config);
    match get_char_detail(&dataset, char_id, level, breach) {
        Ok(result) => print_json(&result),
        Err(err) => {
            eprintln!("detail failed: {err}");
            1
        }
    }
}

fn handle_lookup(args: &[String], config: &AppConfig) -> i32 {
    let Some(name) = args.get(2) else {
        eprintln!("usage: waves-ascension lookup <name> [--loose]");
        return 2;
    };
    let loose = args.iter().skip(3).any(|arg| arg == "--loose");

    let dataset = CharacterDataset::from_config(config);
    match dataset.get_char_id(name, loose) {
        Some(char_id) => {
            println!("{char_id}");
            0
        }
        None => {
            eprintln!("no character named '{name}'");
            1
        }
    }
}

fn handle_model(args: &[String], config: &AppConfig) -> i32 {
    let Some(char_id) = args.get(2) else {
        eprintln!("usage: waves-ascension model <char_id>");
        return 2;
    };

    let dataset = CharacterDataset::from_config(config);
    match dataset.get_char_model(char_id) {
        Some(model) => print_json(&model),
        None => {
            eprintln!("unknown character id '{char_id}'");
            1
        }
    }
}

fn handle_validate(args: &[String], config: &AppConfig) -> i32 {
    let dir = dir_arg(args, config);
    match validate_character_dataset(&dir) {
        Ok(report) => {
            for diagnostic in &report.diagnostics {
                eprintln!("- {diagnostic}");
            }
            if report.has_errors() {
                eprintln!(
                    "validation failed: {} file(s), {} diagnostic(s)",
                    report.checked,
                    report.diagnostics.len()
                );
                1
            } else {
                println!("validation passed: {} file(s) in {}", report.checked, dir.display());
                0
            }
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

fn handle_fingerprint(args: &[String], config: &AppConfig) -> i32 {
    let dataset = CharacterDataset::new(dir_arg(args, config))
        .with_workers(WorkerPool::with_workers(config.load_workers));
    match dataset.load() {
        Ok(snapshot) => print_json(snapshot.report()),
        Err(err) => {
            eprintln!("fingerprint failed: {err}");
            1
        }
    }
}

fn dir_arg(args: &[String], config: &AppConfig) -> PathBuf {
    args.get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data_dir.clone())
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}
