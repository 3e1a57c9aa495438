//! `<stem>.provenance.json` sidecars next to every artifact the CLI writes.
//!
//! A sidecar records which engine build produced the artifact, from which
//! inputs, and with which resolved configuration (seed included), so
//! `shatter generate`/`repair` runs can be replayed.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact: the resolved configuration and the input files.
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

    pub fn with_input(mut self, path: &Path) -> Self {
        self.inputs.push(path.to_string_lossy().into_owned());
        self
    }
}

#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    engine_version: &'static str,
    /// `file:line` of the command that wrote the artifact.
    written_by: String,
    inputs: &'a [String],
    params: &'a Value,
    output: String,
}

/// Write the sidecar of an artifact that already exists on disk.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let caller = Location::caller();
    let sidecar = Sidecar {
        code_rev: current_git_rev(),
        engine_version: shatter::VERSION,
        written_by: format!("{}:{}", caller.file(), caller.line()),
        inputs: &payload.inputs,
        params: &payload.params,
        output: artifact.to_string_lossy().into_owned(),
    };
    let path = provenance_path(artifact);
    fs::write(&path, serde_json::to_vec_pretty(&sidecar)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "provenance");
    Ok(path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("provenance.json")
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else "unknown".
pub fn current_git_rev() -> String {
    option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|rev| !rev.is_empty())
        .or_else(git_head)
        .unwrap_or_else(|| "unknown".to_string())
}

fn git_head() -> Option<String> {
    let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok().map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_beside_the_artifact() {
        assert_eq!(
            provenance_path(Path::new("/tmp/out/cut.svg")),
            Path::new("/tmp/out/cut.provenance.json")
        );
        assert_eq!(
            provenance_path(Path::new("/tmp/out/impact")),
            Path::new("/tmp/out/impact.provenance.json")
        );
    }

    #[test]
    fn sidecar_lists_inputs_params_and_output() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("impact.json");
        fs::write(&artifact, "{}").unwrap();
        let payload = Payload::new(json!({"seed": 4})).with_input(Path::new("params.json"));
        let path = write_sidecar(&artifact, payload).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["output"], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["inputs"][0], "params.json");
        assert_eq!(parsed["params"]["seed"], 4);
        assert_eq!(parsed["engine_version"], shatter::VERSION);
        assert!(parsed["written_by"].as_str().unwrap().contains("provenance.rs:"));
    }
}
