//! SLURM submission scripts: one `ect` job per data directory, plus a `run.sh` that submits all.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::batch::is_hidden;

/// Job generation settings.
#[derive(Clone, Debug)]
pub struct JobCfg {
    pub data_dir: PathBuf,
    /// Root of the ECT output tree; each job writes under its mirrored subdirectory.
    pub out_dir: PathBuf,
    /// Where `.sb` files and `run.sh` go.
    pub submit_dir: PathBuf,
    /// Directory each job `cd`s into; also holds `outputs/` logs.
    pub workdir: PathBuf,
    pub hours: u32,
    pub mem_gb: u32,
    /// Directories whose path contains this component are skipped.
    pub skip_dir: Option<String>,
    pub angle_counts: Vec<usize>,
    pub resolutions: Vec<usize>,
}

/// One generated job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    pub name: String,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Directories under `cfg.data_dir` that hold at least one non-hidden file, in sorted order.
pub fn plan_jobs(cfg: &JobCfg) -> Result<Vec<Job>> {
    let mut dirs = Vec::new();
    walk_dirs(&cfg.data_dir, &mut dirs)?;
    dirs.sort();
    let mut jobs = Vec::new();
    for dir in dirs {
        let rel = dir.strip_prefix(&cfg.data_dir).unwrap_or(&dir);
        if let Some(skip) = &cfg.skip_dir {
            if rel.components().any(|c| c.as_os_str() == skip.as_str()) {
                continue;
            }
        }
        if !has_visible_file(&dir)? {
            continue;
        }
        jobs.push(Job {
            name: job_name(&cfg.data_dir, rel),
            input: dir.clone(),
            output: cfg.out_dir.join(rel),
        });
    }
    Ok(jobs)
}

fn walk_dirs(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    out.push(dir.to_path_buf());
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() && !is_hidden(&path) {
            walk_dirs(&path, out)?;
        }
    }
    Ok(())
}

fn has_visible_file(dir: &Path) -> Result<bool> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && !is_hidden(&path) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Relative path components joined with `_`; the data root itself is named after its last component.
fn job_name(root: &Path, rel: &Path) -> String {
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string())
    } else {
        parts.join("_")
    }
}

fn join_list(values: &[usize]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Body of one `.sb` submission script.
pub fn render_job(cfg: &JobCfg, job: &Job) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "#!/bin/bash --login");
    let _ = writeln!(s, "########## SBATCH Lines for Resource Request ##########");
    let _ = writeln!(s, "#SBATCH --time={}:00:00", cfg.hours);
    let _ = writeln!(s, "#SBATCH --mem={}G", cfg.mem_gb);
    let _ = writeln!(s, "#SBATCH --job-name {}_ect", job.name);
    let _ = writeln!(
        s,
        "#SBATCH --output {}",
        cfg.workdir
            .join("outputs")
            .join(format!("{}_ect.out", job.name))
            .display()
    );
    let _ = writeln!(s, "########## Command Lines to Run ##########");
    let _ = writeln!(s, "cd {}", cfg.workdir.display());
    let _ = writeln!(s);
    let _ = writeln!(
        s,
        "leafect ect --input {} --out {} --angles {} --resolutions {} --flat",
        job.input.display(),
        job.output.display(),
        join_list(&cfg.angle_counts),
        join_list(&cfg.resolutions)
    );
    s
}

/// Write every `.sb` file and `run.sh` under `cfg.submit_dir`.
pub fn write_jobs(cfg: &JobCfg) -> Result<Vec<Job>> {
    let jobs = plan_jobs(cfg)?;
    fs::create_dir_all(&cfg.submit_dir)
        .with_context(|| format!("creating {}", cfg.submit_dir.display()))?;
    let mut run = String::from("#!/bin/bash\n");
    for job in &jobs {
        let file = format!("{}.sb", job.name);
        let path = cfg.submit_dir.join(&file);
        fs::write(&path, render_job(cfg, job))
            .with_context(|| format!("writing {}", path.display()))?;
        let _ = writeln!(run, "sbatch {file}");
    }
    let run_path = cfg.submit_dir.join("run.sh");
    fs::write(&run_path, run).with_context(|| format!("writing {}", run_path.display()))?;
    tracing::info!(jobs = jobs.len(), dir = %cfg.submit_dir.display(), "wrote submission scripts");
    Ok(jobs)
}
