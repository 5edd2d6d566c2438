use crate::config::TaskKind;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by `init-config`.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Target exists and `--force` was not given
    #[error("Config file already exists: {}. Use --force to overwrite.", .0.display())]
    AlreadyExists(PathBuf),
    /// I/O error when writing the template
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Starter configuration for `kind`.
///
/// Both engine tables are included so switching `engine` is a one-line
/// edit; only the task tables for `kind` are written.
pub fn default_config_toml(kind: TaskKind) -> String {
    format!(
        r#"[qcinput]
engine = "orca" # or "gaussian"
kind = "{kind}" # int | ts | sp

[molecule]
charge = 0
multiplicity = 1

[orca]
nprocs = 8
maxcore = 4000 # MB per core
base_keywords = ["r2scan-3c", "D4", "def2-mTZVPP"]
extra_keywords = []
smd = false
smd_solvent = "toluene"

{orca_task}
[gaussian]
nprocshared = 8
mem = "8GB"
method_basis = "B3LYP/def2TZVP"
extra_keywords = []

{gaussian_task}"#,
        kind = kind,
        orca_task = orca_task_table(kind),
        gaussian_task = gaussian_task_table(kind),
    )
}

fn orca_task_table(kind: TaskKind) -> String {
    match kind {
        TaskKind::Int => "[orca.task.int]\nkeywords = [\"Opt\", \"Freq\"]\n".to_string(),
        TaskKind::Sp => "[orca.task.sp]\nkeywords = [\"SP\"]\n".to_string(),
        TaskKind::Ts => r#"[orca.task.ts]
step1_keywords = ["Opt"]
step2_keywords = ["OptTS", "Freq"]
constraint_atoms = [[0, 1]] # 0-based atom indices, frozen in step 1
# Per-step resources; remove all four to use [orca] nprocs/maxcore for both steps
step1_nprocs = 36
step1_maxcore = 3555
step2_nprocs = 16
step2_maxcore = 8000
calc_hess = true
"#
        .to_string(),
    }
}

fn gaussian_task_table(kind: TaskKind) -> String {
    match kind {
        TaskKind::Int => "[gaussian.task.int]\nroute = [\"Opt\", \"Freq\"]\n".to_string(),
        TaskKind::Sp => "[gaussian.task.sp]\nroute = [\"SP\"]\n".to_string(),
        TaskKind::Ts => r#"[gaussian.task.ts]
step1_route = ["Opt=ModRedundant"]
constraint_atoms = [[1, 2]] # 1-based, written as "B i j F"; or set modredundant = ["..."]
step2_route = ["Opt=(TS,CalcFC,NoEigenTest,NoFreeze)", "Freq", "Geom=AllCheck", "Guess=Read"]
"#
        .to_string(),
    }
}

/// Writes the starter configuration to `path`.
///
/// # Errors
///
/// [`TemplateError::AlreadyExists`] if `path` exists and `force` is false.
pub fn write_template(path: &Path, kind: TaskKind, force: bool) -> Result<(), TemplateError> {
    if path.exists() && !force {
        return Err(TemplateError::AlreadyExists(path.to_path_buf()));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, default_config_toml(kind))?;
    info!("Wrote {} config template to {}", kind, path.display());
    Ok(())
}
