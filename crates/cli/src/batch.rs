//! Batch drivers: mirror an input tree of point clouds into contours or ECT matrices.
//!
//! Per-item policy
//! - Recoverable contour failures (too few points, low coverage) skip the file with a warning.
//! - Unexpected graph failures and I/O errors abort the whole batch.

use anyhow::{Context, Result};
use leafect::matrix::{ect_matrix, EctInput};
use leafect::order::{order_contour, OrderCfg};
use leafect::{Contour, ContourTopology, Vec2};
use std::fs;
use std::path::{Path, PathBuf};

use crate::io::{load_points, save_ect, save_points};

/// Input file extensions treated as point clouds.
const POINT_EXTS: [&str; 2] = ["csv", "txt"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub written: usize,
    pub skipped: usize,
}

/// ECT batch parameters.
#[derive(Clone, Debug)]
pub struct EctParams {
    pub angle_counts: Vec<usize>,
    pub resolutions: Vec<usize>,
    pub graph_mode: bool,
}

/// Point-cloud files under `root`, sorted; hidden entries are ignored.
pub fn collect_inputs(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).with_context(|| format!("listing {}", dir.display()))? {
            let path = entry?.path();
            if is_hidden(&path) {
                continue;
            }
            if path.is_dir() {
                if recursive {
                    stack.push(path);
                }
            } else if has_point_ext(&path) {
                out.push(path);
            }
        }
    }
    out.sort();
    Ok(out)
}

pub(crate) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn has_point_ext(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| POINT_EXTS.contains(&e))
}

/// `file` relative to `root`, re-rooted under `out` with extension `ext`.
pub fn mirror_path(root: &Path, file: &Path, out: &Path, ext: &str) -> PathBuf {
    let rel = file.strip_prefix(root).unwrap_or(file);
    out.join(rel).with_extension(ext)
}

/// Closed contour for a point cloud: kept as is if it already repeats its first point,
/// otherwise recovered with `order_contour`. `Ok(None)` means "skip this item".
pub fn contour_for(points: Vec<Vec2<f64>>, cfg: &OrderCfg, label: &str) -> Result<Option<Contour>> {
    if points.len() >= 2 && points.first() == points.last() {
        return Ok(Contour::from_repeated_endpoint(points));
    }
    match order_contour(&points, cfg) {
        Ok(found) => Ok(Some(found.contour)),
        Err(err) if err.is_recoverable() => {
            tracing::warn!(item = label, error = %err, "skipping");
            Ok(None)
        }
        Err(err) => Err(err).with_context(|| format!("ordering {label}")),
    }
}

/// Order every point cloud under `input` and write contours under `out`.
pub fn run_contour_batch(
    input: &Path,
    out: &Path,
    cfg: &OrderCfg,
    recursive: bool,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();
    for file in collect_inputs(input, recursive)? {
        let label = file.display().to_string();
        let points = load_points(&file)?;
        match contour_for(points, cfg, &label)? {
            Some(contour) => {
                let dest = mirror_path(input, &file, out, "csv");
                save_points(&dest, contour.points())?;
                summary.written += 1;
            }
            None => summary.skipped += 1,
        }
    }
    tracing::info!(
        written = summary.written,
        skipped = summary.skipped,
        "contour batch done"
    );
    Ok(summary)
}

/// ECT matrix of every contour file under `input`, written as JSON under `out`.
///
/// Files are read as ordered closed contours; a repeated endpoint is dropped first.
pub fn run_ect_batch(
    input: &Path,
    out: &Path,
    params: &EctParams,
    recursive: bool,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();
    for file in collect_inputs(input, recursive)? {
        let points = load_points(&file)?;
        let contour = Contour::from_repeated_endpoint(points.clone())
            .unwrap_or_else(|| Contour::new(points, ContourTopology::Closed));
        if contour.is_empty() {
            tracing::warn!(item = %file.display(), "empty contour, skipping");
            summary.skipped += 1;
            continue;
        }
        let graph;
        let shape = if params.graph_mode {
            graph = contour.to_graph();
            EctInput::Graph(&graph)
        } else {
            EctInput::Contour(&contour)
        };
        let m = ect_matrix(shape, &params.angle_counts, &params.resolutions)
            .with_context(|| format!("ECT of {}", file.display()))?;
        save_ect(&mirror_path(input, &file, out, "json"), &m)?;
        summary.written += 1;
    }
    tracing::info!(
        written = summary.written,
        skipped = summary.skipped,
        "ect batch done"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::load_ect;
    use leafect::sample::{sample_outline, OutlineCfg, ReplayToken};
    use tempfile::tempdir;

    fn ring(n: usize) -> Vec<Vec2<f64>> {
        (0..n)
            .map(|k| {
                let th = std::f64::consts::TAU * k as f64 / n as f64;
                Vec2::new(th.cos(), th.sin())
            })
            .collect()
    }

    #[test]
    fn collects_point_files_and_ignores_hidden() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("a/one.txt"), "0,0\n").unwrap();
        fs::write(root.join("a/b/two.csv"), "0,0\n").unwrap();
        fs::write(root.join("a/.DS_Store"), "").unwrap();
        fs::write(root.join("a/notes.md"), "").unwrap();
        let all = collect_inputs(root, true).unwrap();
        assert_eq!(all, vec![root.join("a/b/two.csv"), root.join("a/one.txt")]);
        let flat = collect_inputs(&root.join("a"), false).unwrap();
        assert_eq!(flat, vec![root.join("a/one.txt")]);
    }

    #[test]
    fn mirror_keeps_relative_layout() {
        let p = mirror_path(
            Path::new("/data/leaves"),
            Path::new("/data/leaves/oak/Scale1/l1.txt"),
            Path::new("/out"),
            "json",
        );
        assert_eq!(p, Path::new("/out/oak/Scale1/l1.json"));
    }

    #[test]
    fn contour_batch_orders_and_skips() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in");
        let out = dir.path().join("out");
        let cloud = sample_outline(
            OutlineCfg {
                points: 80,
                ..OutlineCfg::default()
            },
            ReplayToken { seed: 3, index: 0 },
        );
        crate::io::save_points(&input.join("oak/leaf1.csv"), &cloud).unwrap();
        // Already closed: first point repeated at the end.
        let mut closed = ring(10);
        closed.push(closed[0]);
        crate::io::save_points(&input.join("oak/leaf2.csv"), &closed).unwrap();
        // Two points: recoverable failure.
        crate::io::save_points(
            &input.join("oak/leaf3.csv"),
            &[Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)],
        )
        .unwrap();

        let summary = run_contour_batch(&input, &out, &OrderCfg::default(), true).unwrap();
        assert_eq!(
            summary,
            BatchSummary {
                written: 2,
                skipped: 1
            }
        );
        let ordered = load_points(&out.join("oak/leaf1.csv")).unwrap();
        assert!(ordered.len() > 40);
        let kept = load_points(&out.join("oak/leaf2.csv")).unwrap();
        assert_eq!(kept, ring(10));
        assert!(!out.join("oak/leaf3.csv").exists());
    }

    #[test]
    fn ect_batch_writes_padded_matrices() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("contours");
        let out = dir.path().join("ect");
        crate::io::save_points(&input.join("leaf.csv"), &ring(16)).unwrap();
        let params = EctParams {
            angle_counts: vec![1, 4],
            resolutions: vec![2, 3],
            graph_mode: false,
        };
        let summary = run_ect_batch(&input, &out, &params, true).unwrap();
        assert_eq!(summary.written, 1);
        let m = load_ect(&out.join("leaf.json")).unwrap();
        assert_eq!(m.shape(), (2, 2, 12));
        assert_eq!(m.get(0, 0, 2), None);
        // Full ring at the top threshold: one loop.
        assert_eq!(m.get(0, 0, 1), Some(0));

        let graph_out = dir.path().join("ect_graph");
        let params = EctParams {
            graph_mode: true,
            ..params
        };
        run_ect_batch(&input, &graph_out, &params, true).unwrap();
        assert_eq!(load_ect(&graph_out.join("leaf.json")).unwrap(), m);
    }
}
