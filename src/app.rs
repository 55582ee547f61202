//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments
//! - runs the travel + forecast pipeline
//! - prints the report
//! - writes the CSV/JSON/PNG outputs

use clap::Parser;

use crate::cli::{Command, InputArgs, RunArgs};
use crate::domain::RunConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `tripcast` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is the common case.
    let _ = dotenvy::dotenv();
    init_logging();

    // Clap requires a subcommand name, so a bare `tripcast` (or flags only) is
    // rewritten to `tripcast run ...` before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Legs(args) => handle_legs(args),
    }
}

fn init_logging() {
    // Tests and embedding callers may already have installed a logger.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init();
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_pipeline(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&config, &run.travel.legs, &run.travel.weekly_km, &run.forecast)
    );

    pipeline::write_outputs(&config, &run)?;

    println!("Analysis complete. Outputs saved to {}.", config.assets_dir.display());
    Ok(())
}

fn handle_legs(args: InputArgs) -> Result<(), AppError> {
    let config = input_config(&args);
    let travel = pipeline::compute_legs(&config)?;
    println!("{}", crate::report::format_legs_table(&travel.legs, &travel.weekly_km));
    Ok(())
}

pub fn run_config_from_args(args: &RunArgs) -> RunConfig {
    RunConfig {
        assets_dir: args.assets_dir.clone(),
        seed: args.seed,
        confidence: args.confidence,
        plot: !args.no_plot,
        ..input_config(&args.input)
    }
}

fn input_config(args: &InputArgs) -> RunConfig {
    RunConfig {
        cities_path: args.data_dir.join("cities.csv"),
        schedule_path: args.data_dir.join("schedule.csv"),
        base_city: args.base_city.clone(),
        ..RunConfig::default()
    }
}

/// Rewrite argv so `tripcast` defaults to `tripcast run`.
///
/// Rules:
/// - `tripcast`                        -> `tripcast run`
/// - `tripcast --seed 3 ...`           -> `tripcast run --seed 3 ...`
/// - `tripcast --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "legs");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs() {
        assert_eq!(rewrite_args(argv(&["tripcast"])), argv(&["tripcast", "run"]));
        assert_eq!(
            rewrite_args(argv(&["tripcast", "--seed", "3"])),
            argv(&["tripcast", "run", "--seed", "3"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            &["tripcast", "legs"][..],
            &["tripcast", "run", "--no-plot"][..],
            &["tripcast", "--help"][..],
            &["tripcast", "-V"][..],
        ] {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }

    #[test]
    fn bare_invocation_config_matches_defaults() {
        let cli = crate::cli::Cli::parse_from(rewrite_args(argv(&["tripcast"])));
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let config = run_config_from_args(&args);
        let expected = RunConfig::default();
        assert_eq!(config.cities_path, expected.cities_path);
        assert_eq!(config.schedule_path, expected.schedule_path);
        assert_eq!(config.assets_dir, expected.assets_dir);
        assert_eq!(config.base_city, expected.base_city);
        assert_eq!(config.seed, expected.seed);
        assert_eq!(config.confidence, expected.confidence);
        assert_eq!(config.plot, expected.plot);
    }

    #[test]
    fn data_dir_drives_both_input_paths() {
        let args = RunArgs {
            input: InputArgs {
                data_dir: PathBuf::from("season"),
                base_city: "Denver".to_string(),
            },
            no_plot: true,
            ..RunArgs::default()
        };
        let config = run_config_from_args(&args);
        assert_eq!(config.cities_path, PathBuf::from("season/cities.csv"));
        assert_eq!(config.schedule_path, PathBuf::from("season/schedule.csv"));
        assert_eq!(config.base_city, "Denver");
        assert!(!config.plot);
    }
}
