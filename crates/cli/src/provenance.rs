use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Metadata recorded next to a batch output.
pub struct Payload {
    pub params: Value,
    pub inputs: Vec<String>,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            inputs: Vec::new(),
        }
    }

    pub fn with_input<P: AsRef<Path>>(mut self, input: P) -> Self {
        self.inputs
            .push(input.as_ref().to_string_lossy().into_owned());
        self
    }
}

/// On-disk sidecar layout.
#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: Option<String>,
    version: &'a str,
    callsite: String,
    params: &'a Value,
    inputs: &'a [String],
    outputs: Vec<String>,
}

/// Record how `artifact` was produced in a `.provenance.json` file beside it.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let caller = Location::caller();
    let sidecar = Sidecar {
        code_rev: current_git_rev(),
        version: leafect::VERSION,
        callsite: format!("{}:{}", caller.file(), caller.line()),
        params: &payload.params,
        inputs: &payload.inputs,
        outputs: vec![artifact.display().to_string()],
    };
    let path = provenance_path(artifact);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    fs::write(&path, serde_json::to_vec_pretty(&sidecar)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// `<dir>/<name>.provenance.json` for an artifact `<dir>/<name>`; the artifact's own
/// extension is kept so `leaf.json` and `leaf.csv` get separate sidecars.
fn provenance_path(artifact: &Path) -> PathBuf {
    let name = artifact
        .file_name()
        .map_or_else(|| "artifact".into(), |n| n.to_string_lossy());
    artifact.with_file_name(format!("{name}.provenance.json"))
}

/// Commit of the working tree the tool runs from, or `None` outside a git checkout.
pub fn current_git_rev() -> Option<String> {
    let out = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?;
    Some(rev.trim().to_owned()).filter(|r| !r.is_empty())
}
