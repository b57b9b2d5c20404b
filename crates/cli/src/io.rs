//! Storage: headerless two-column CSV point clouds (polars) and JSON ECT matrices.
//!
//! ECT cells that were never computed are written as `null`, so a reloaded matrix keeps the
//! unset/computed split.

use anyhow::{bail, Context, Result};
use leafect::matrix::EctMatrix;
use leafect::Vec2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;

/// Load an `x,y` point cloud without a header row.
///
/// Column types are inferred from every row, so integer-looking prefixes followed by
/// decimals still load; both columns are then cast to `f64`.
pub fn load_points(path: &Path) -> Result<Vec<Vec2<f64>>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(false)
        .with_infer_schema_length(None)
        .finish()
        .and_then(|lf| lf.collect())
        .with_context(|| format!("reading {}", path.display()))?;
    if df.width() < 2 {
        bail!(
            "{}: expected two coordinate columns, found {}",
            path.display(),
            df.width()
        );
    }
    let xs = column_f64(&df, 0).with_context(|| format!("column x of {}", path.display()))?;
    let ys = column_f64(&df, 1).with_context(|| format!("column y of {}", path.display()))?;
    Ok(xs.into_iter().zip(ys).map(|(x, y)| Vec2::new(x, y)).collect())
}

fn column_f64(df: &DataFrame, idx: usize) -> Result<Vec<f64>> {
    let col = df
        .select_at_idx(idx)
        .with_context(|| format!("missing column {idx}"))?;
    let col = col.cast(&DataType::Float64)?;
    let values = col.f64()?;
    values
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.with_context(|| format!("empty cell at row {row}")))
        .collect()
}

/// Write points as a headerless `x,y` CSV, creating parent directories.
pub fn save_points(path: &Path, points: &[Vec2<f64>]) -> Result<()> {
    ensure_parent(path)?;
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let mut df = polars::df!("x" => xs, "y" => ys)?;
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(false)
        .finish(&mut df)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// On-disk form of an `EctMatrix`.
#[derive(Debug, Serialize, Deserialize)]
pub struct EctRecord {
    pub angle_counts: Vec<usize>,
    pub resolutions: Vec<usize>,
    pub shape: [usize; 3],
    pub values: Vec<Vec<Vec<Option<i64>>>>,
}

impl From<&EctMatrix> for EctRecord {
    fn from(m: &EctMatrix) -> Self {
        let (a, r, s) = m.shape();
        let values = (0..a)
            .map(|i| (0..r).map(|j| m.slot(i, j).to_vec()).collect())
            .collect();
        Self {
            angle_counts: m.angle_counts().to_vec(),
            resolutions: m.resolutions().to_vec(),
            shape: [a, r, s],
            values,
        }
    }
}

impl EctRecord {
    pub fn into_matrix(self) -> Result<EctMatrix> {
        let cells: Vec<Option<i64>> = self.values.into_iter().flatten().flatten().collect();
        let m = EctMatrix::from_cells(&self.angle_counts, &self.resolutions, cells)?;
        let (a, r, s) = m.shape();
        if [a, r, s] != self.shape {
            bail!("declared shape {:?} does not match {:?}", self.shape, [a, r, s]);
        }
        Ok(m)
    }
}

pub fn save_ect(path: &Path, m: &EctMatrix) -> Result<()> {
    ensure_parent(path)?;
    let record = EctRecord::from(m);
    fs::write(path, serde_json::to_vec(&record)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn load_ect(path: &Path) -> Result<EctMatrix> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let record: EctRecord = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing {}", path.display()))?;
    record.into_matrix()
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}
