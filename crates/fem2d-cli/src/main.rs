use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Utc;
use fem2d_geom::LoopBuilder;
use fem2d_mesh::Mesher;
use fem2d_model::{Model, Progress, TaskProgress};
use fem2d_solver::{PlanarStressSolver, SolveSummary};
use serde::Serialize;

fn usage() {
    eprintln!("usage:");
    eprintln!("  fem2d bracket [--json <report.json>]");
    eprintln!("  fem2d plate [--json <report.json>]");
    eprintln!("  fem2d --help");
    eprintln!();
    eprintln!("examples:");
    eprintln!("  fem2d bracket");
    eprintln!("  fem2d plate --json plate-report.json");
}

/// Prints progress lines, throttled to phase changes and 25% steps.
struct ConsoleProgress {
    last_text: String,
    last_percent: u8,
}

impl ConsoleProgress {
    fn new() -> Self {
        Self {
            last_text: String::new(),
            last_percent: 0,
        }
    }
}

impl Progress for ConsoleProgress {
    fn report(&mut self, progress: TaskProgress) {
        let phase_changed = progress.text != self.last_text;
        if phase_changed || progress.percent >= self.last_percent.saturating_add(25) {
            println!("{}: {}%", progress.text, progress.percent);
            self.last_text = progress.text;
            self.last_percent = progress.percent;
        }
    }
}

#[derive(Serialize)]
struct RunReport {
    generated_at: String,
    scenario: String,
    nodes: usize,
    elements: usize,
    boundary_edges: usize,
    converged: bool,
    iterations: usize,
    residual_ratio: f64,
    min_von_mises: f64,
    max_von_mises: f64,
    max_displacement: f64,
}

impl RunReport {
    fn from_run(scenario: &str, model: &Model, summary: &SolveSummary) -> Self {
        let max_displacement = model
            .nodes
            .iter()
            .map(|n| (n.displacement[0].powi(2) + n.displacement[1].powi(2)).sqrt())
            .fold(0.0, f64::max);
        Self {
            generated_at: Utc::now().to_rfc3339(),
            scenario: scenario.to_string(),
            nodes: model.nodes.len(),
            elements: model.elements.len(),
            boundary_edges: model.edges.len(),
            converged: summary.converged,
            iterations: summary.iterations,
            residual_ratio: summary.residual_ratio,
            min_von_mises: model.min_value,
            max_von_mises: model.max_value,
            max_displacement,
        }
    }

    fn print(&self) {
        println!("scenario: {}", self.scenario);
        println!("nodes: {}", self.nodes);
        println!("elements: {}", self.elements);
        println!("boundary_edges: {}", self.boundary_edges);
        println!("converged: {}", self.converged);
        println!("iterations: {}", self.iterations);
        println!("residual_ratio: {:.3e}", self.residual_ratio);
        println!("min_von_mises: {:.4}", self.min_von_mises);
        println!("max_von_mises: {:.4}", self.max_von_mises);
        println!("max_displacement: {:.6}", self.max_displacement);
    }

    fn write_json(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|err| format!("failed to serialise report: {err}"))?;
        std::fs::write(path, json)
            .map_err(|err| format!("failed to write {}: {err}", path.display()))
    }
}

/// Three-hole bracket clamped at both bottom corners with a triangular
/// load distribution hung off the top edge.
fn build_bracket() -> Result<Model, String> {
    let spacing = 1.0;
    let outer = LoopBuilder::new()
        .add_rectangle(25.0, 5.0, 25.0, 5.0)
        .build(true, spacing)
        .map_err(|err| err.to_string())?;

    let mut mesher = Mesher::new();
    mesher.add_loop(outer).map_err(|err| err.to_string())?;
    for cx in [26.0, 9.0, 41.0] {
        let hole = LoopBuilder::new()
            .add_circle(cx, 5.0, 4.0)
            .build(true, spacing)
            .map_err(|err| err.to_string())?;
        mesher.add_loop(hole).map_err(|err| err.to_string())?;
    }

    let mut progress = ConsoleProgress::new();
    let mut model = mesher.triangulate_iteratively(&mut progress);

    for node in &mut model.nodes {
        let on_bottom = node.y.abs() < 1e-4;
        let on_top = (node.y - 10.0).abs() < 1e-4;
        if on_bottom && (node.x < 5.0 || node.x > 45.0) {
            node.fix_all();
        }
        if on_top && node.x > 20.0 && node.x < 26.0 {
            node.apply_load(0.0, (node.x - 20.0) * -250.0);
        }
        if on_top && node.x >= 26.0 && node.x < 31.0 {
            node.apply_load(0.0, (31.0 - node.x) * -250.0);
        }
    }
    Ok(model)
}

/// Square plate with a central hole, clamped on the left edge and
/// pulled to the right.
fn build_plate() -> Result<Model, String> {
    let outer = LoopBuilder::new()
        .add_rectangle(0.0, 0.0, 10.0, 10.0)
        .build(true, 1.0)
        .map_err(|err| err.to_string())?;
    let hole = LoopBuilder::new()
        .add_circle(0.0, 0.0, 3.0)
        .build(true, 0.5)
        .map_err(|err| err.to_string())?;

    let mut mesher = Mesher::new();
    mesher.add_loop(outer).map_err(|err| err.to_string())?;
    mesher.add_loop(hole).map_err(|err| err.to_string())?;

    let mut progress = ConsoleProgress::new();
    let mut model = mesher.triangulate_iteratively(&mut progress);

    for node in &mut model.nodes {
        if (node.x + 10.0).abs() < 1e-4 {
            node.fix_all();
        }
        if (node.x - 10.0).abs() < 1e-4 {
            node.apply_load(500.0, 0.0);
        }
    }
    Ok(model)
}

fn run_scenario(name: &str, json_path: Option<&Path>) -> Result<(), String> {
    let (mut model, material) = match name {
        "bracket" => (build_bracket()?, (10.0, 30000.0, 0.25)),
        "plate" => (build_plate()?, (1.0, 210000.0, 0.3)),
        _ => return Err(format!("unknown scenario: {name}")),
    };

    let (thickness, youngs, poisson) = material;
    let solver = PlanarStressSolver::new(thickness, youngs, poisson);
    let mut progress = ConsoleProgress::new();
    let summary = solver
        .solve(&mut model, &mut progress)
        .map_err(|err| err.to_string())?;

    model.compute_edges();
    model.plot_average_von_mises();

    let report = RunReport::from_run(name, &model, &summary);
    report.print();
    if let Some(path) = json_path {
        report.write_json(path)?;
        println!("report_written: {}", path.display());
    }
    Ok(())
}

fn parse_json_flag(args: &[String]) -> Result<Option<PathBuf>, String> {
    match args {
        [] => Ok(None),
        [flag, path] if flag == "--json" => Ok(Some(PathBuf::from(path))),
        _ => Err("expected: [--json <report.json>]".to_string()),
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.split_first() {
        Some((command, rest)) if command == "bracket" || command == "plate" => {
            let json_path = match parse_json_flag(rest) {
                Ok(path) => path,
                Err(err) => {
                    eprintln!("{err}");
                    usage();
                    return ExitCode::FAILURE;
                }
            };
            match run_scenario(command, json_path.as_deref()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("error: {err}");
                    ExitCode::FAILURE
                }
            }
        }
        Some((flag, _)) if flag == "--help" || flag == "-h" => {
            usage();
            ExitCode::SUCCESS
        }
        _ => {
            usage();
            ExitCode::FAILURE
        }
    }
}
