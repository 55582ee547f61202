//! Command-line parsing for the team travel cost forecaster.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! travel and forecasting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tripcast", version, about = "Team travel distance and flight cost forecaster")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconstruct legs, generate weekly costs, fit SARIMAX and write all outputs.
    ///
    /// This is also what a bare `tripcast` invocation runs.
    Run(RunArgs),
    /// Print the reconstructed legs and weekly km only (no forecast, no files).
    Legs(InputArgs),
}

/// Input locations shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Directory holding `cities.csv` and `schedule.csv`.
    #[arg(long, value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Home city every road trip starts from and returns to.
    #[arg(long, default_value = "Dallas")]
    pub base_city: String,
}

/// Options for the full run.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Directory the CSV, JSON and PNG outputs are written to.
    #[arg(long, value_name = "DIR", default_value = "assets")]
    pub assets_dir: PathBuf,

    /// Seed for the synthetic cost noise.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Confidence level of the forecast interval, in (0, 1).
    #[arg(long, default_value_t = 0.8)]
    pub confidence: f64,

    /// Skip the PNG charts.
    #[arg(long)]
    pub no_plot: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            input: InputArgs {
                data_dir: PathBuf::from("data"),
                base_city: "Dallas".to_string(),
            },
            assets_dir: PathBuf::from("assets"),
            seed: 0,
            confidence: 0.8,
            no_plot: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults_match_struct_default() {
        let cli = Cli::parse_from(["tripcast", "run"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let default = RunArgs::default();
        assert_eq!(args.input.data_dir, default.input.data_dir);
        assert_eq!(args.input.base_city, default.input.base_city);
        assert_eq!(args.assets_dir, default.assets_dir);
        assert_eq!(args.seed, default.seed);
        assert_eq!(args.confidence, default.confidence);
        assert_eq!(args.no_plot, default.no_plot);
    }

    #[test]
    fn run_flags() {
        let cli = Cli::parse_from([
            "tripcast",
            "run",
            "--data-dir",
            "in",
            "--assets-dir",
            "out",
            "--base-city",
            "Denver",
            "--seed",
            "7",
            "--confidence",
            "0.95",
            "--no-plot",
        ]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.input.data_dir, PathBuf::from("in"));
        assert_eq!(args.assets_dir, PathBuf::from("out"));
        assert_eq!(args.input.base_city, "Denver");
        assert_eq!(args.seed, 7);
        assert_eq!(args.confidence, 0.95);
        assert!(args.no_plot);
    }

    #[test]
    fn legs_subcommand() {
        let cli = Cli::parse_from(["tripcast", "legs", "--base-city", "Phoenix"]);
        let Command::Legs(args) = cli.command else {
            panic!("expected legs");
        };
        assert_eq!(args.base_city, "Phoenix");
        assert_eq!(args.data_dir, PathBuf::from("data"));
    }
}
