//! JSON-in/JSON-out front end for the strut solver.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::ExitCode;
use strut_highs::{Sense, Solver, SolverError};
use strut_model::{Integrality, Model, ValidationError};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "strut")]
#[command(about = "Solve a linear or mixed-integer problem described in JSON", long_about = None)]
struct Cli {
    /// Problem description file
    problem: PathBuf,

    /// Maximize the objective instead of minimizing it
    #[arg(long)]
    maximize: bool,

    /// Forward engine log output to the console
    #[arg(long)]
    engine_log: bool,
}

/// On-disk problem description. Missing bounds default to the matching
/// infinity, so `{}` bounds mean a free variable or row.
#[derive(Debug, Deserialize)]
struct ProblemFile {
    costs: Vec<f64>,
    bounds: Vec<ColumnBounds>,
    rows: Vec<RowSpec>,
    #[serde(default)]
    integrality: Vec<IntegralitySpec>,
}

#[derive(Debug, Deserialize)]
struct ColumnBounds {
    #[serde(default)]
    lower: Option<f64>,
    #[serde(default)]
    upper: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RowSpec {
    coefficients: Vec<f64>,
    #[serde(default)]
    lower: Option<f64>,
    #[serde(default)]
    upper: Option<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum IntegralitySpec {
    Continuous,
    Integer,
    ImplicitInteger,
}

impl From<IntegralitySpec> for Integrality {
    fn from(spec: IntegralitySpec) -> Self {
        match spec {
            IntegralitySpec::Continuous => Integrality::Continuous,
            IntegralitySpec::Integer => Integrality::Integer,
            IntegralitySpec::ImplicitInteger => Integrality::ImplicitInteger,
        }
    }
}

#[derive(Debug, Serialize)]
struct SolutionReport<'a> {
    status: &'a str,
    col_primal: &'a [f64],
    col_dual: &'a [f64],
    row_primal: &'a [f64],
    row_dual: &'a [f64],
}

fn build_model(file: ProblemFile) -> Result<Model, ValidationError> {
    let bounds = file
        .bounds
        .iter()
        .map(|b| {
            (
                b.lower.unwrap_or(f64::NEG_INFINITY),
                b.upper.unwrap_or(f64::INFINITY),
            )
        })
        .collect();

    let mut rows = Vec::with_capacity(file.rows.len());
    let mut row_lower = Vec::with_capacity(file.rows.len());
    let mut row_upper = Vec::with_capacity(file.rows.len());
    for row in file.rows {
        row_lower.push(row.lower.unwrap_or(f64::NEG_INFINITY));
        row_upper.push(row.upper.unwrap_or(f64::INFINITY));
        rows.push(row.coefficients);
    }

    let integrality = file.integrality.into_iter().map(Integrality::from).collect();

    Model::from_parts(file.costs, bounds, rows, row_lower, row_upper, integrality)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let source = match std::fs::read_to_string(&cli.problem) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", cli.problem.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let file: ProblemFile = match serde_json::from_str(&source) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Invalid problem file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let model = match build_model(file) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut solver = match Solver::new(model) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if cli.engine_log {
        solver.set_log_to_console(true);
    }
    if cli.maximize {
        solver.set_objective_sense(Sense::Maximize);
    }

    match solver.solve() {
        Ok(solution) => {
            let report = SolutionReport {
                status: "optimal",
                col_primal: solution.col_primal(),
                col_dual: solution.col_dual(),
                row_primal: solution.row_primal(),
                row_dual: solution.row_dual(),
            };
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            }
            solver.release_native();
            ExitCode::SUCCESS
        }
        Err(SolverError::SolveFailure { status }) => {
            eprintln!("Solver finished without an optimal solution: {}", status);
            solver.release_native();
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bounds_default_to_infinities() {
        let file: ProblemFile = serde_json::from_str(
            r#"{
                "costs": [2.0, 3.0],
                "bounds": [{"lower": 0.0, "upper": 3.0}, {"lower": 1.0}],
                "rows": [
                    {"coefficients": [0.0, 1.0], "upper": 6.0},
                    {"coefficients": [1.0, 2.0], "lower": 10.0, "upper": 14.0},
                    {"coefficients": [2.0, 1.0], "lower": 8.0}
                ]
            }"#,
        )
        .unwrap();

        let model = build_model(file).unwrap();
        assert_eq!(model.num_cols(), 2);
        assert_eq!(model.num_rows(), 3);
        assert_eq!(model.upper_bounds(), vec![3.0, f64::INFINITY]);
        assert_eq!(model.row_lower()[0], f64::NEG_INFINITY);
        assert_eq!(model.row_upper()[2], f64::INFINITY);
        assert!(!model.is_mip());
    }

    #[test]
    fn integrality_markers_parse() {
        let file: ProblemFile = serde_json::from_str(
            r#"{
                "costs": [1.0],
                "bounds": [{"lower": 0.0, "upper": 10.0}],
                "rows": [{"coefficients": [1.0], "upper": 5.0}],
                "integrality": ["integer"]
            }"#,
        )
        .unwrap();

        let model = build_model(file).unwrap();
        assert!(model.is_mip());
        assert_eq!(model.integrality(), &[Integrality::Integer]);
    }

    #[test]
    fn shape_errors_surface_from_the_model() {
        let file: ProblemFile = serde_json::from_str(
            r#"{
                "costs": [1.0, 2.0],
                "bounds": [{"lower": 0.0}],
                "rows": [{"coefficients": [1.0, 1.0], "upper": 5.0}]
            }"#,
        )
        .unwrap();

        assert!(build_model(file).is_err());
    }
}
