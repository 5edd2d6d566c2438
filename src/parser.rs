//! Structure file parsing for XYZ and Gaussian GJF geometries.
//!
//! Two independent parsers are provided, dispatched on the file suffix:
//!
//! - **XYZ** (`.xyz`): atom count, comment line, then one atom per line. The
//!   declared count must match the number of atom lines exactly.
//! - **GJF** (`.gjf`): a Gaussian input file. There is no declared atom count
//!   and no hard boundary between the route, title and molecule sections, so
//!   the charge/multiplicity line is located heuristically (see
//!   [`parse_gjf`]).
//!
//! Both parsers return a [`StructureData`] holding a normalized
//! [`GeometryBlock`]. Only GJF files carry a charge and multiplicity.
//!
//! # Examples
//!
//! ```
//! use qcinput::parser::{parse_xyz, SourceFormat};
//!
//! let text = "3\nwater\nO 0.0 0.0 0.0\nH 0.757 0.586 0.0\nH -0.757 0.586 0.0\n";
//! let structure = parse_xyz(text)?;
//! assert_eq!(structure.geometry.num_atoms(), 3);
//! assert_eq!(structure.source_format, SourceFormat::Xyz);
//! assert_eq!(structure.charge, None);
//! # Ok::<(), qcinput::parser::StructureError>(())
//! ```

use crate::geometry::{is_atom_symbol, AtomLine, GeometryBlock};
use log::debug;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error type for structure parsing.
#[derive(Error, Debug)]
pub enum StructureError {
    /// File suffix is neither `.xyz` nor `.gjf`
    #[error("Unsupported input file suffix '{0}'. Supported suffixes: .xyz, .gjf.")]
    UnsupportedFormat(String),
    /// Header/atom-count mismatch, bad coordinate, wrong token count or empty file
    #[error("{0}")]
    MalformedGeometry(String),
    /// No charge/multiplicity line followed by a coordinate block was found
    #[error("Cannot find charge/multiplicity line followed by a geometry block in GJF file.")]
    GeometryAmbiguous,
    /// I/O error when reading the structure file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for structure parsing results
type Result<T> = std::result::Result<T, StructureError>;

/// Format a structure was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// XYZ coordinate file
    Xyz,
    /// Gaussian input file
    Gjf,
}

impl SourceFormat {
    /// Determines the format from a path's suffix (case-insensitive).
    ///
    /// ```
    /// use qcinput::parser::SourceFormat;
    /// use std::path::Path;
    ///
    /// assert_eq!(SourceFormat::from_path(Path::new("mol.XYZ")).unwrap(), SourceFormat::Xyz);
    /// assert!(SourceFormat::from_path(Path::new("mol.pdb")).is_err());
    /// ```
    pub fn from_path(path: &Path) -> Result<Self> {
        let suffix = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        match suffix.to_lowercase().as_str() {
            "xyz" => Ok(SourceFormat::Xyz),
            "gjf" => Ok(SourceFormat::Gjf),
            _ if suffix.is_empty() => Err(StructureError::UnsupportedFormat(String::new())),
            _ => Err(StructureError::UnsupportedFormat(format!(".{}", suffix))),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Xyz => write!(f, "xyz"),
            SourceFormat::Gjf => write!(f, "gjf"),
        }
    }
}

/// Geometry plus the optional charge/multiplicity found in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureData {
    /// Normalized atom lines
    pub geometry: GeometryBlock,
    /// Charge declared by the file (GJF only)
    pub charge: Option<i32>,
    /// Spin multiplicity declared by the file (GJF only)
    pub multiplicity: Option<i32>,
    /// Format the structure was parsed from
    pub source_format: SourceFormat,
}

/// Reads and parses a structure file, dispatching on its suffix.
///
/// # Errors
///
/// Returns [`StructureError::UnsupportedFormat`] for suffixes other than
/// `.xyz`/`.gjf` (checked before the file is read), [`StructureError::Io`] if
/// the file cannot be read, and the parser errors otherwise.
pub fn load_structure(path: &Path) -> Result<StructureData> {
    let format = SourceFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;
    debug!("Parsing {} structure from {}", format, path.display());
    parse_structure(&content, format)
}

/// Parses structure text in the given format.
pub fn parse_structure(content: &str, format: SourceFormat) -> Result<StructureData> {
    match format {
        SourceFormat::Xyz => parse_xyz(content),
        SourceFormat::Gjf => parse_gjf(content),
    }
}

/// Converts CRLF and lone CR line endings to LF.
fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

/// Parses an XYZ file.
///
/// Line 1 is the atom count, line 2 a free-text comment (discarded), and
/// lines 3..N the atoms. Leading and trailing whitespace of the whole file is
/// ignored.
pub fn parse_xyz(content: &str) -> Result<StructureData> {
    let content = normalize_line_endings(content);
    let lines: Vec<&str> = content.trim().lines().map(str::trim_end).collect();
    if lines.len() < 3 {
        return Err(StructureError::MalformedGeometry(
            "XYZ file must contain at least 3 lines.".into(),
        ));
    }

    let atom_count: usize = lines[0].trim().parse().map_err(|_| {
        StructureError::MalformedGeometry("The first line of XYZ must be atom count.".into())
    })?;

    let atom_lines = &lines[2..];
    if atom_count != atom_lines.len() {
        return Err(StructureError::MalformedGeometry(format!(
            "XYZ atom count mismatch: header={}, geometry lines={}.",
            atom_count,
            atom_lines.len()
        )));
    }

    let mut atoms = Vec::with_capacity(atom_count);
    for (idx, line) in atom_lines.iter().enumerate() {
        let line_no = idx + 3;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 4 || !is_atom_symbol(parts[0]) {
            return Err(StructureError::MalformedGeometry(format!(
                "Invalid XYZ atom line at line {}: '{}'",
                line_no, line
            )));
        }
        let atom = AtomLine::parse(line).ok_or_else(|| {
            StructureError::MalformedGeometry(format!(
                "Invalid coordinates at line {}: '{}'",
                line_no, line
            ))
        })?;
        atoms.push(atom);
    }

    let geometry = GeometryBlock::new(atoms).ok_or_else(|| {
        StructureError::MalformedGeometry("XYZ file declares zero atoms.".into())
    })?;

    Ok(StructureData {
        geometry,
        charge: None,
        multiplicity: None,
        source_format: SourceFormat::Xyz,
    })
}

/// Parses a Gaussian GJF file.
///
/// The charge/multiplicity line is the first line made of exactly two
/// integers that is followed by at least one atom line (blank lines between
/// the two are skipped). The geometry is the run of atom lines following it,
/// terminated by a blank line or by the first non-atom line. Route and title
/// sections are ignored.
///
/// # Examples
///
/// ```
/// use qcinput::parser::parse_gjf;
///
/// let text = "%chk=a.chk\n# B3LYP/6-31G* opt\n\ntitle 2 3\n\n-1 2\nC 0.0 0.0 0.0\nH 1.0 0.0 0.0\n\n";
/// let structure = parse_gjf(text)?;
/// assert_eq!(structure.charge, Some(-1));
/// assert_eq!(structure.multiplicity, Some(2));
/// assert_eq!(structure.geometry.num_atoms(), 2);
/// # Ok::<(), qcinput::parser::StructureError>(())
/// ```
pub fn parse_gjf(content: &str) -> Result<StructureData> {
    let content = normalize_line_endings(content);
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(StructureError::MalformedGeometry("GJF file is empty.".into()));
    }
    let lines: Vec<&str> = trimmed.lines().map(str::trim_end).collect();

    let (charge_idx, charge, multiplicity) =
        find_charge_multiplicity(&lines).ok_or(StructureError::GeometryAmbiguous)?;
    debug!(
        "GJF charge/multiplicity line {}: {} {}",
        charge_idx + 1,
        charge,
        multiplicity
    );

    let mut atoms = Vec::new();
    for (offset, line) in lines[charge_idx + 1..].iter().enumerate() {
        let stripped = line.trim();
        if stripped.is_empty() {
            if !atoms.is_empty() {
                break;
            }
            continue;
        }
        match AtomLine::parse(stripped) {
            Some(atom) => atoms.push(atom),
            None if !atoms.is_empty() => break,
            None => {
                return Err(StructureError::MalformedGeometry(format!(
                    "Invalid GJF atom line at line {}: '{}'",
                    charge_idx + offset + 2,
                    line
                )))
            }
        }
    }

    let geometry = GeometryBlock::new(atoms).ok_or_else(|| {
        StructureError::MalformedGeometry("No geometry section found in GJF file.".into())
    })?;

    Ok(StructureData {
        geometry,
        charge: Some(charge),
        multiplicity: Some(multiplicity),
        source_format: SourceFormat::Gjf,
    })
}

/// Returns `(index, charge, multiplicity)` of the first two-integer line
/// followed by a non-empty atom run.
fn find_charge_multiplicity(lines: &[&str]) -> Option<(usize, i32, i32)> {
    lines.iter().enumerate().find_map(|(idx, line)| {
        let (charge, multiplicity) = parse_integer_pair(line)?;
        if count_following_atoms(&lines[idx + 1..]) > 0 {
            Some((idx, charge, multiplicity))
        } else {
            None
        }
    })
}

fn parse_integer_pair(line: &str) -> Option<(i32, i32)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 2 {
        return None;
    }
    let first = parts[0].parse().ok()?;
    let second = parts[1].parse().ok()?;
    Some((first, second))
}

fn count_following_atoms(lines: &[&str]) -> usize {
    let mut count = 0;
    for line in lines {
        let stripped = line.trim();
        if stripped.is_empty() {
            if count > 0 {
                break;
            }
            continue;
        }
        if AtomLine::parse(stripped).is_none() {
            break;
        }
        count += 1;
    }
    count
}
