use std::path::Path;

use serde::Serialize;

use crate::config::AppConfig;
use crate::data::store::{load_store, save_store, TrackStore};
use crate::data::track::{ArtianMode, Element, Outcome, WeaponType};
use crate::data::validate::validate_store_file;
use crate::error::StoreError;
use crate::planner::export::{chart_to_csv, chart_to_table};
use crate::server;
use crate::server::api::track_views;

const USAGE: &str = "usage: artian <serve|chart|tracks|add-track|add-result|edit-result|add-miss|toggle|delete-result|delete-track|clear|validate>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Chart,
    Tracks,
    AddTrack,
    AddResult,
    EditResult,
    AddMiss,
    Toggle,
    DeleteResult,
    DeleteTrack,
    Clear,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("chart") => Some(Command::Chart),
        Some("tracks") => Some(Command::Tracks),
        Some("add-track") => Some(Command::AddTrack),
        Some("add-result") => Some(Command::AddResult),
        Some("edit-result") => Some(Command::EditResult),
        Some("add-miss") => Some(Command::AddMiss),
        Some("toggle") => Some(Command::Toggle),
        Some("delete-result") => Some(Command::DeleteResult),
        Some("delete-track") => Some(Command::DeleteTrack),
        Some("clear") => Some(Command::Clear),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String], config: &AppConfig) -> i32 {
    let store_path = Path::new(&config.store_path);
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(config),
        Some(Command::Chart) => handle_chart(args, store_path),
        Some(Command::Tracks) => handle_tracks(args, store_path),
        Some(Command::AddTrack) => handle_add_track(args, store_path),
        Some(Command::AddResult) => handle_add_result(args, store_path),
        Some(Command::EditResult) => handle_edit_result(args, store_path),
        Some(Command::AddMiss) => {
            let Some(track_id) = args.get(2) else {
                eprintln!("usage: artian add-miss <track-id>");
                return 2;
            };
            mutate_and_print(store_path, |store| store.add_miss(track_id))
        }
        Some(Command::Toggle) => {
            let Some(result_id) = args.get(2) else {
                eprintln!("usage: artian toggle <result-id>");
                return 2;
            };
            mutate_and_print(store_path, |store| store.toggle_target(result_id))
        }
        Some(Command::DeleteResult) => {
            let Some(result_id) = args.get(2) else {
                eprintln!("usage: artian delete-result <result-id>");
                return 2;
            };
            mutate_and_print(store_path, |store| {
                store.delete_result(result_id).map(|()| status_ok())
            })
        }
        Some(Command::DeleteTrack) => {
            let Some(track_id) = args.get(2) else {
                eprintln!("usage: artian delete-track <track-id>");
                return 2;
            };
            mutate_and_print(store_path, |store| store.delete_track(track_id))
        }
        Some(Command::Clear) => {
            let Some(mode) = parse_mode_arg(args.get(2), "usage: artian clear <mode>") else {
                return 2;
            };
            mutate_and_print(store_path, |store| Ok(store.clear_mode(mode)))
        }
        Some(Command::Validate) => handle_validate(args, config),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_serve(config: &AppConfig) -> i32 {
    match server::run_server(config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn parse_mode_arg(raw: Option<&String>, usage: &str) -> Option<ArtianMode> {
    let Some(raw) = raw else {
        eprintln!("{usage}");
        return None;
    };
    match raw.parse::<ArtianMode>() {
        Ok(mode) => Some(mode),
        Err(err) => {
            eprintln!("{err}");
            None
        }
    }
}

fn load_or_report(store_path: &Path) -> Option<TrackStore> {
    match load_store(store_path) {
        Ok(store) => Some(store),
        Err(err) => {
            eprintln!("failed to load store '{}': {err}", store_path.display());
            None
        }
    }
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

/// Load, apply one mutation, save, and print the mutation's result as JSON.
fn mutate_and_print<T, F>(store_path: &Path, f: F) -> i32
where
    T: Serialize,
    F: FnOnce(&mut TrackStore) -> Result<T, StoreError>,
{
    let Some(mut store) = load_or_report(store_path) else {
        return 1;
    };
    let out = match f(&mut store) {
        Ok(out) => out,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    if let Err(err) = save_store(store_path, &store) {
        eprintln!("failed to save store '{}': {err}", store_path.display());
        return 1;
    }
    print_json(&out)
}

fn handle_chart(args: &[String], store_path: &Path) -> i32 {
    let Some(mode) = parse_mode_arg(args.get(2), "usage: artian chart <mode> [--csv|--table]")
    else {
        return 2;
    };
    let as_csv = args.iter().any(|arg| arg == "--csv");
    let as_table = args.iter().any(|arg| arg == "--table");

    let Some(store) = load_or_report(store_path) else {
        return 1;
    };
    let chart = match store.chart(mode) {
        Ok(chart) => chart,
        Err(err) => {
            eprintln!("chart failed: {err}");
            return 1;
        }
    };

    if as_csv {
        match chart_to_csv(&chart) {
            Ok(csv) => {
                print!("{csv}");
                0
            }
            Err(err) => {
                eprintln!("failed to write csv: {err}");
                1
            }
        }
    } else if as_table {
        print!("{}", chart_to_table(&chart));
        0
    } else {
        print_json(&chart)
    }
}

fn handle_tracks(args: &[String], store_path: &Path) -> i32 {
    let Some(mode) = parse_mode_arg(args.get(2), "usage: artian tracks <mode>") else {
        return 2;
    };
    let Some(store) = load_or_report(store_path) else {
        return 1;
    };
    print_json(&track_views(&store, mode))
}

fn handle_add_track(args: &[String], store_path: &Path) -> i32 {
    const USAGE: &str = "usage: artian add-track <mode> <weapon> <element>";
    let (Some(mode), Some(weapon), Some(element)) = (args.get(2), args.get(3), args.get(4)) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let parsed = (
        mode.parse::<ArtianMode>(),
        weapon.parse::<WeaponType>(),
        element.parse::<Element>(),
    );
    let (mode, weapon, element) = match parsed {
        (Ok(mode), Ok(weapon), Ok(element)) => (mode, weapon, element),
        (mode, weapon, element) => {
            for err in [mode.err(), weapon.err(), element.err()].into_iter().flatten() {
                eprintln!("{err}");
            }
            return 2;
        }
    };
    mutate_and_print(store_path, |store| store.add_track(mode, weapon, element))
}

fn handle_add_result(args: &[String], store_path: &Path) -> i32 {
    let (Some(track_id), Some(first), Some(second)) = (args.get(2), args.get(3), args.get(4)) else {
        eprintln!("usage: artian add-result <track-id> <first> <second> [--target]");
        return 2;
    };
    let is_target = args.iter().skip(5).any(|arg| arg == "--target");
    mutate_and_print(store_path, |store| {
        let mode = store
            .track(track_id)
            .map(|t| t.mode)
            .ok_or_else(|| StoreError::TrackNotFound(track_id.clone()))?;
        store.add_result(track_id, Outcome::for_mode(mode, first, second), is_target)
    })
}

fn handle_edit_result(args: &[String], store_path: &Path) -> i32 {
    let (Some(result_id), Some(first), Some(second)) = (args.get(2), args.get(3), args.get(4))
    else {
        eprintln!("usage: artian edit-result <result-id> <first> <second>");
        return 2;
    };
    mutate_and_print(store_path, |store| {
        let track_id = store
            .result(result_id)
            .map(|row| row.track_id.clone())
            .ok_or_else(|| StoreError::ResultNotFound(result_id.clone()))?;
        let mode = store
            .track(&track_id)
            .map(|t| t.mode)
            .ok_or(StoreError::TrackNotFound(track_id))?;
        store
            .update_outcome(result_id, Outcome::for_mode(mode, first, second))
            .map(|()| status_ok())
    })
}

fn status_ok() -> serde_json::Value {
    serde_json::json!({ "status": "ok" })
}

fn handle_validate(args: &[String], config: &AppConfig) -> i32 {
    let path = args
        .get(2)
        .map(String::as_str)
        .unwrap_or(config.store_path.as_str());

    let report = validate_store_file(path);
    for diag in &report.diagnostics {
        eprintln!("- {diag}");
    }
    if report.has_errors() {
        eprintln!("validation failed: {} issue(s)", report.diagnostics.len());
        1
    } else {
        println!("validation passed: {path}");
        0
    }
}
