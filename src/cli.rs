use std::sync::Arc;

use crate::config::AppConfig;
use crate::data::data_registry::DataRegistry;
use crate::data::validate::{validate_datasets, ValidationSeverity};
use crate::server;
use crate::server::api::illuvial_list;
use crate::synergy::export_csv::breakdown_to_csv;
use crate::synergy::{aggregate, CachedResolver, Resolve, UnknownPolicy};
use crate::team::Roster;

const USAGE: &str = "usage: illuvilytics <serve|catalog|label|breakdown|validate>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Catalog,
    Label,
    Breakdown,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("catalog") => Some(Command::Catalog),
        Some("label") => Some(Command::Label),
        Some("breakdown") => Some(Command::Breakdown),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let config = AppConfig::from_env();
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(&config),
        Some(Command::Catalog) => handle_catalog(&config, args),
        Some(Command::Label) => handle_label(&config, args),
        Some(Command::Breakdown) => handle_breakdown(&config, args),
        Some(Command::Validate) => handle_validate(&config, args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().skip(2).any(|arg| arg == flag)
}

fn positional(args: &[String]) -> Vec<&str> {
    args.iter()
        .skip(2)
        .map(String::as_str)
        .filter(|arg| !arg.starts_with("--"))
        .collect()
}

fn load_registry(config: &AppConfig) -> Option<Arc<DataRegistry>> {
    match DataRegistry::load(config) {
        Ok(registry) => Some(registry),
        Err(err) => {
            eprintln!("failed to load data: {err}");
            None
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
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

fn handle_catalog(config: &AppConfig, args: &[String]) -> i32 {
    let Some(registry) = load_registry(config) else {
        return 1;
    };
    let list = illuvial_list(&registry);

    if has_flag(args, "--table") {
        println!("id\tname\taffinity\tclass");
        for item in &list {
            println!(
                "{}\t{}\t{}\t{}",
                item.id, item.display_name, item.affinity_label, item.class_label
            );
        }
        return 0;
    }
    print_json(&list, "catalog")
}

fn handle_label(config: &AppConfig, args: &[String]) -> i32 {
    let name = positional(args).join(" ");
    if name.is_empty() {
        eprintln!("usage: illuvilytics label <display name>");
        return 2;
    }
    let Some(registry) = load_registry(config) else {
        return 1;
    };
    print_json(&registry.synergy().display_label(&name), "label")
}

fn handle_breakdown(config: &AppConfig, args: &[String]) -> i32 {
    let ids = positional(args);
    let Some(registry) = load_registry(config) else {
        return 1;
    };

    let roster = Roster::from_ids(&registry, ids.iter().copied());
    if roster.len() < ids.len() {
        eprintln!(
            "note: {} of {} id(s) were unknown, duplicated or over capacity",
            ids.len() - roster.len(),
            ids.len()
        );
    }

    let policy = if has_flag(args, "--count-unknown") {
        UnknownPolicy::Count
    } else {
        UnknownPolicy::Skip
    };
    let resolver = CachedResolver::new(registry.synergy());
    let breakdown = aggregate(roster.members(), &resolver, policy);

    if has_flag(args, "--csv") {
        return match breakdown_to_csv(&breakdown) {
            Ok(csv) => {
                print!("{csv}");
                0
            }
            Err(err) => {
                eprintln!("failed to write csv: {err}");
                1
            }
        };
    }

    if has_flag(args, "--table") {
        println!("kind\tname\tcount");
        for (name, count) in breakdown.ranked_affinities() {
            println!("affinity\t{name}\t{count}");
        }
        for (name, count) in breakdown.ranked_classes() {
            println!("class\t{name}\t{count}");
        }
        return 0;
    }

    print_json(&breakdown, "breakdown")
}

fn handle_validate(config: &AppConfig, args: &[String]) -> i32 {
    let paths = positional(args);
    let catalog_path = paths.first().copied().unwrap_or(config.catalog_path.as_str());
    let synergy_path = paths.get(1).copied().unwrap_or(config.synergy_path.as_str());

    let report = match validate_datasets(catalog_path, synergy_path) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };

    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }
    let errors = report.count(ValidationSeverity::Error);
    if errors > 0 {
        eprintln!("validation failed: {errors} error(s)");
        return 1;
    }
    println!(
        "validation passed: {catalog_path}, {synergy_path} ({} warning(s), {} info)",
        report.count(ValidationSeverity::Warning),
        report.count(ValidationSeverity::Info)
    );
    0
}
