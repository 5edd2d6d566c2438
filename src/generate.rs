//! Input generation pipeline.
//!
//! [`generate_input`] is the pure core: it reconciles a resolved
//! configuration with a parsed structure and renders the deck.
//! [`run_generate`] wraps it with the file I/O used by the command line:
//! load structure, load config, render, then write the output. Nothing is
//! written unless every step succeeds.

use crate::config::{load_config, Config, ConfigError};
use crate::naming::{default_output_path, FileNaming};
use crate::parser::{load_structure, StructureData, StructureError};
use crate::template_generator::TemplateError;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Any failure of a qcinput command.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// Structure file could not be read or parsed
    #[error(transparent)]
    Structure(#[from] StructureError),
    /// Configuration could not be loaded, resolved or reconciled
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Config template could not be written
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// Output file could not be written
    #[error("Cannot write {}: {source}", path.display())]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Reconciles `config` with `structure` and renders the input deck.
pub fn generate_input(
    structure: &StructureData,
    config: Config,
    naming: &FileNaming,
) -> Result<String, GenerateError> {
    let config = config.reconcile(structure)?;
    Ok(config.render(&structure.geometry, naming)?)
}

/// Generates an input deck from files and writes it.
///
/// The output path defaults to the structure path with the engine's input
/// suffix. Returns the path written.
pub fn run_generate(
    structure_path: &Path,
    config_path: &Path,
    output_path: Option<&Path>,
) -> Result<PathBuf, GenerateError> {
    let structure = load_structure(structure_path)?;
    let config = load_config(config_path)?;

    let output = match output_path {
        Some(path) => path.to_path_buf(),
        None => default_output_path(structure_path, config.engine()),
    };
    if output.as_path() == structure_path {
        warn!(
            "Output {} is the structure file; it will be overwritten",
            output.display()
        );
    }
    let naming = FileNaming::new(&output);
    let engine = config.engine();
    let kind = config.kind();

    let text = generate_input(&structure, config, &naming)?;
    fs::write(&output, text).map_err(|source| GenerateError::Write {
        path: output.clone(),
        source,
    })?;

    info!(
        "Wrote {} {} input ({} atoms) to {}",
        engine,
        kind,
        structure.geometry.num_atoms(),
        output.display()
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_gjf, parse_xyz};

    const GAUSSIAN_INT: &str = r#"
[qcinput]
engine = "gaussian"
kind = "int"
[molecule]
charge = 0
multiplicity = 1
[gaussian]
nprocshared = 4
mem = "4GB"
method_basis = "PBE0/def2SVP"
[gaussian.task.int]
route = ["Opt", "Freq"]
"#;

    #[test]
    fn test_generate_input_from_xyz() {
        let structure = parse_xyz("2\nh2\nH 0.0 0.0 0.0\nH 0.0 0.0 0.74\n").unwrap();
        let config = Config::from_toml_str(GAUSSIAN_INT).unwrap();
        let text = generate_input(&structure, config, &FileNaming::new(Path::new("h2.gjf"))).unwrap();
        assert!(text.starts_with("%chk=h2.chk\n%NProcShared=4\n%Mem=4GB\n#P PBE0/def2SVP Opt Freq\n"));
        assert!(text.contains("\n0 1\nH 0.0 0.0 0.0\nH 0.0 0.0 0.74\n"));
    }

    #[test]
    fn test_generate_input_rejects_mismatched_gjf() {
        let structure = parse_gjf("#p sp\n\ncation\n\n1 2\nH 0.0 0.0 0.0\nH 0.0 0.0 0.74\n").unwrap();
        let config = Config::from_toml_str(GAUSSIAN_INT).unwrap();
        let err = generate_input(&structure, config, &FileNaming::new(Path::new("h2.gjf"))).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Config(ConfigError::ReconciliationMismatch { .. })
        ));
    }
}
