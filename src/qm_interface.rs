//! Input deck rendering interface for the supported quantum chemistry programs.
//!
//! Every configuration arm knows how to write its own input file. The
//! [`InputRenderer`] trait is the contract between the resolved configuration
//! and the program-specific writers:
//!
//! - [`crate::orca`]: `.inp` files, including `%compound` TS jobs
//! - [`crate::gaussian`]: `.gjf` files, including `--Link1--` TS jobs
//!
//! Renderers are pure: they build the complete text in memory and either
//! return all of it or fail without producing anything. Writing the result to
//! disk is left to [`crate::generate`].
//!
//! # Usage Pattern
//!
//! ```
//! use std::path::Path;
//! use qcinput::config::Config;
//! use qcinput::naming::FileNaming;
//! use qcinput::parser::parse_xyz;
//!
//! let config = Config::from_toml_str(r#"
//! [qcinput]
//! engine = "orca"
//! kind = "sp"
//! [molecule]
//! charge = 0
//! multiplicity = 1
//! [orca]
//! nprocs = 4
//! maxcore = 2000
//! base_keywords = ["r2scan-3c"]
//! [orca.task.sp]
//! keywords = ["SP"]
//! "#)?;
//! let structure = parse_xyz("1\nhelium\nHe 0.0 0.0 0.0\n")?;
//! let text = config.render(&structure.geometry, &FileNaming::new(Path::new("he.inp")))?;
//! assert!(text.contains("! SP r2scan-3c NoPop\n"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::config::ConfigError;
use crate::geometry::GeometryBlock;
use crate::naming::FileNaming;

/// Common interface for writing program input decks.
pub trait InputRenderer {
    /// Renders the complete input text for `geometry`.
    ///
    /// `naming` supplies the names of files the deck refers to (checkpoint,
    /// intermediate compound geometry).
    ///
    /// # Errors
    ///
    /// [`ConfigError::Incomplete`] when a value built by hand skips a field the
    /// deck cannot be written without.
    fn render(&self, geometry: &GeometryBlock, naming: &FileNaming) -> Result<String, ConfigError>;
}

/// Joins rendered lines with `\n`.
///
/// Input decks end with a newline; renderers push a final empty line to get
/// one.
pub(crate) fn join_lines(lines: Vec<String>) -> String {
    lines.join("\n")
}

/// Fails with [`ConfigError::Incomplete`] naming every field that is blank.
pub(crate) fn require_filled(context: &str, fields: &[(&str, bool)]) -> Result<(), ConfigError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, filled)| !filled)
        .map(|(name, _)| name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Incomplete {
            context: context.to_string(),
            missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_filled_lists_blank_fields() {
        assert!(require_filled("Gaussian ts", &[("mem", true)]).is_ok());
        let err = require_filled(
            "Gaussian ts",
            &[("mem", false), ("method_basis", true), ("step2_route", false)],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Gaussian ts config is incomplete: missing mem, step2_route"
        );
    }

    #[test]
    fn test_join_lines_trailing_newline() {
        let text = join_lines(vec!["a".to_string(), "b".to_string(), String::new()]);
        assert_eq!(text, "a\nb\n");
    }
}
