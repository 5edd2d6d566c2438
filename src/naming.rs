//! File naming derived from the output path.
//!
//! Generated inputs refer to other files by name: Gaussian decks name their
//! checkpoint file and the ORCA compound job reads the geometry written by its
//! first step. All of these names are built from the stem of the output file,
//! so several jobs can share a directory without clashing.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use qcinput::naming::FileNaming;
//!
//! let naming = FileNaming::new(Path::new("runs/water_ts.inp"));
//! assert_eq!(naming.basename(), "water_ts");
//! assert_eq!(naming.chk_file(), "water_ts.chk");
//! assert_eq!(naming.compound_xyz(1), "water_ts_Compound_1.xyz");
//! ```

use crate::config::Engine;
use std::path::{Path, PathBuf};

/// Manages file names based on the output file's basename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNaming {
    basename: String,
}

impl FileNaming {
    /// Creates a naming scheme from the path the input deck will be written to.
    ///
    /// Falls back to `qcinput` when the path has no usable stem.
    pub fn new(output_path: &Path) -> Self {
        let basename = output_path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("qcinput")
            .to_string();

        Self { basename }
    }

    /// Returns the basename used for file naming
    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// Gaussian checkpoint file.
    ///
    /// Format: `{basename}.chk`
    pub fn chk_file(&self) -> String {
        format!("{}.chk", self.basename)
    }

    /// Geometry file ORCA writes at the end of compound step `step`.
    ///
    /// Format: `{basename}_Compound_{step}.xyz`
    pub fn compound_xyz(&self, step: usize) -> String {
        format!("{}_Compound_{}.xyz", self.basename, step)
    }
}

/// Default output path: the structure path with the engine's input suffix.
///
/// ```
/// use std::path::{Path, PathBuf};
/// use qcinput::config::Engine;
/// use qcinput::naming::default_output_path;
///
/// assert_eq!(
///     default_output_path(Path::new("mols/water.xyz"), Engine::Orca),
///     PathBuf::from("mols/water.inp")
/// );
/// assert_eq!(
///     default_output_path(Path::new("water.xyz"), Engine::Gaussian),
///     PathBuf::from("water.gjf")
/// );
/// ```
pub fn default_output_path(structure_path: &Path, engine: Engine) -> PathBuf {
    structure_path.with_extension(engine.input_extension())
}
