//! Geometry data structures shared by the structure parsers and the renderers.
//!
//! This module provides the textual representation of a molecular geometry:
//!
//! - [`AtomLine`]: one atom as its four original tokens (symbol, x, y, z)
//! - [`GeometryBlock`]: an ordered, non-empty list of atom lines
//!
//! Coordinates are kept as the strings found in the source file. They are
//! checked to be floating-point parseable but never reformatted, so the
//! rendered input reproduces the user's precision exactly.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    // Element symbol or atom label: "C", "Cl", "H1", "Fe2"
    static ref ATOM_SYMBOL_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").unwrap();
}

/// A single atom line of a Cartesian geometry.
///
/// # Examples
///
/// ```
/// use qcinput::geometry::AtomLine;
///
/// let atom = AtomLine::parse("  O   0.000000  0.000000   0.000000 ").unwrap();
/// assert_eq!(atom.symbol, "O");
/// assert_eq!(atom.to_string(), "O 0.000000 0.000000 0.000000");
///
/// assert!(AtomLine::parse("O 0.0 0.0").is_none());
/// assert!(AtomLine::parse("1 0.0 0.0 0.0").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomLine {
    /// Element symbol or label, matching `[A-Za-z][A-Za-z0-9]*`
    pub symbol: String,
    /// Cartesian x coordinate, verbatim
    pub x: String,
    /// Cartesian y coordinate, verbatim
    pub y: String,
    /// Cartesian z coordinate, verbatim
    pub z: String,
}

impl AtomLine {
    /// Parses a line of the form `<symbol> <x> <y> <z>`.
    ///
    /// Returns `None` unless the line has exactly four whitespace-separated
    /// tokens, the first is a valid atom symbol and the last three parse as
    /// `f64`.
    pub fn parse(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 4 {
            return None;
        }
        if !is_atom_symbol(parts[0]) {
            return None;
        }
        if parts[1..].iter().any(|token| token.parse::<f64>().is_err()) {
            return None;
        }
        Some(Self {
            symbol: parts[0].to_string(),
            x: parts[1].to_string(),
            y: parts[2].to_string(),
            z: parts[3].to_string(),
        })
    }
}

impl fmt::Display for AtomLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.symbol, self.x, self.y, self.z)
    }
}

/// Returns true if `token` is a valid atom symbol or label.
pub fn is_atom_symbol(token: &str) -> bool {
    ATOM_SYMBOL_RE.is_match(token)
}

/// Ordered, non-empty block of atom lines.
///
/// A `GeometryBlock` can only be built from at least one atom, so every
/// renderer can rely on having something to write between the coordinate
/// delimiters.
///
/// # Examples
///
/// ```
/// use qcinput::geometry::{AtomLine, GeometryBlock};
///
/// let atoms = vec![
///     AtomLine::parse("O 0.0 0.0 0.0").unwrap(),
///     AtomLine::parse("H 0.757 0.586 0.0").unwrap(),
/// ];
/// let block = GeometryBlock::new(atoms).unwrap();
/// assert_eq!(block.num_atoms(), 2);
/// assert_eq!(block.to_string(), "O 0.0 0.0 0.0\nH 0.757 0.586 0.0");
///
/// assert!(GeometryBlock::new(Vec::new()).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryBlock {
    atoms: Vec<AtomLine>,
}

impl GeometryBlock {
    /// Creates a block from parsed atom lines, or `None` if `atoms` is empty.
    pub fn new(atoms: Vec<AtomLine>) -> Option<Self> {
        if atoms.is_empty() {
            None
        } else {
            Some(Self { atoms })
        }
    }

    /// Number of atoms in the block.
    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// The atom lines in input order.
    pub fn atoms(&self) -> &[AtomLine] {
        &self.atoms
    }
}

impl fmt::Display for GeometryBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", atom)?;
        }
        Ok(())
    }
}
