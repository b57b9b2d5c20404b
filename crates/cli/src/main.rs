use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use leafect::prelude::*;
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod batch;
mod io;
mod jobs;
mod provenance;

use batch::{run_contour_batch, run_ect_batch, EctParams};
use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "leafect")]
#[command(about = "Leaf contour recovery and Euler Characteristic Transforms")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Order unordered outline point clouds into closed contours
    Contour {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Arcs skipped between cut attempts
        #[arg(long, default_value_t = 10)]
        retry_step: usize,
        /// Accept a walk covering more than this fraction of the distinct points
        #[arg(long, default_value_t = 0.5)]
        min_coverage: f64,
        /// Only the top level of --input
        #[arg(long)]
        flat: bool,
    },
    /// Compute ECT matrices for ordered contour files
    Ect {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_delimiter = ',', default_values_t = vec![1])]
        angles: Vec<usize>,
        #[arg(long, value_delimiter = ',', default_values_t = vec![2])]
        resolutions: Vec<usize>,
        /// Use the general graph algorithm instead of the contour fast path
        #[arg(long)]
        graph: bool,
        #[arg(long)]
        flat: bool,
    },
    /// Write SLURM submission scripts, one per data directory
    Jobs {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "submit")]
        submit: PathBuf,
        #[arg(long, default_value = ".")]
        workdir: PathBuf,
        #[arg(long, default_value_t = 24)]
        hours: u32,
        /// Memory per job in GB
        #[arg(long, default_value_t = 8)]
        mem: u32,
        #[arg(long, default_value = "Nonscale")]
        skip_dir: String,
        #[arg(long, value_delimiter = ',', default_values_t = vec![1])]
        angles: Vec<usize>,
        #[arg(long, value_delimiter = ',', default_values_t = vec![2])]
        resolutions: Vec<usize>,
    },
    /// Sample a synthetic outline, order it and print its ECT as JSON
    Demo {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 200)]
        points: usize,
        #[arg(long, value_delimiter = ',', default_values_t = vec![4])]
        angles: Vec<usize>,
        #[arg(long, value_delimiter = ',', default_values_t = vec![8])]
        resolutions: Vec<usize>,
    },
    /// Print a small provenance JSON block, optionally describing a saved ECT file
    Report {
        #[arg(long)]
        ect: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Contour {
            input,
            out,
            retry_step,
            min_coverage,
            flat,
        } => {
            let cfg = OrderCfg {
                retry_step,
                min_coverage,
                ..OrderCfg::default()
            };
            tracing::info!(input = %input.display(), out = %out.display(), retry_step, min_coverage, "contour");
            let summary = run_contour_batch(&input, &out, &cfg, !flat)?;
            let params = json!({
                "command": "contour",
                "retry_step": retry_step,
                "min_coverage": min_coverage,
                "written": summary.written,
                "skipped": summary.skipped,
            });
            write_sidecar(&out, Payload::new(params).with_input(&input))?;
            Ok(())
        }
        Action::Ect {
            input,
            out,
            angles,
            resolutions,
            graph,
            flat,
        } => {
            tracing::info!(input = %input.display(), out = %out.display(), ?angles, ?resolutions, graph, "ect");
            let params = EctParams {
                angle_counts: angles,
                resolutions,
                graph_mode: graph,
            };
            let summary = run_ect_batch(&input, &out, &params, !flat)?;
            let record = json!({
                "command": "ect",
                "angle_counts": params.angle_counts,
                "resolutions": params.resolutions,
                "graph": graph,
                "written": summary.written,
                "skipped": summary.skipped,
            });
            write_sidecar(&out, Payload::new(record).with_input(&input))?;
            Ok(())
        }
        Action::Jobs {
            input,
            out,
            submit,
            workdir,
            hours,
            mem,
            skip_dir,
            angles,
            resolutions,
        } => {
            let cfg = jobs::JobCfg {
                data_dir: input,
                out_dir: out,
                submit_dir: submit,
                workdir,
                hours,
                mem_gb: mem,
                skip_dir: (!skip_dir.is_empty()).then_some(skip_dir),
                angle_counts: angles,
                resolutions,
            };
            jobs::write_jobs(&cfg)?;
            Ok(())
        }
        Action::Demo {
            seed,
            points,
            angles,
            resolutions,
        } => demo(seed, points, &angles, &resolutions),
        Action::Report { ect } => report(ect),
    }
}

fn demo(seed: u64, points: usize, angles: &[usize], resolutions: &[usize]) -> Result<()> {
    let cfg = OutlineCfg {
        points,
        ..OutlineCfg::default()
    };
    let cloud = sample_outline(cfg, ReplayToken { seed, index: 0 });
    let found = order_contour(&cloud, &OrderCfg::default()).context("ordering demo outline")?;
    let m = ect_matrix(EctInput::Contour(&found.contour), angles, resolutions)?;
    let out = json!({
        "seed": seed,
        "points": points,
        "contour_len": found.contour.len(),
        "attempts": found.attempts,
        "ect": io::EctRecord::from(&m),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn report(ect: Option<PathBuf>) -> Result<()> {
    let mut obj = json!({
        "code_rev": provenance::current_git_rev(),
        "version": leafect::VERSION,
        "params": {},
        "outputs": []
    });
    if let Some(path) = ect {
        let m = io::load_ect(&path)?;
        let computed = m.cells().iter().filter(|c| c.is_some()).count();
        obj["ect"] = json!({
            "path": path.display().to_string(),
            "angle_counts": m.angle_counts(),
            "resolutions": m.resolutions(),
            "shape": [m.shape().0, m.shape().1, m.shape().2],
            "computed_cells": computed,
        });
    }
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
