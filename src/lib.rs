#![deny(missing_docs)]

//! qcinput - Quantum Chemistry Input Generator
//!
//! qcinput turns a molecular structure (`.xyz` or `.gjf`) into a ready-to-run
//! input deck for ORCA (`.inp`) or Gaussian (`.gjf`). What to write is
//! described by a TOML configuration selecting an engine and a calculation
//! kind.
//!
//! # Overview
//!
//! The pipeline is a sequence of pure text transformations:
//!
//! 1. **Structure parsing** ([`parser`]): XYZ files, or the charge/multiplicity
//!    line and atom block located heuristically in a GJF file
//! 2. **Configuration resolution** ([`config`]): TOML table to a tagged union
//!    with one variant per engine and kind, every required field checked
//! 3. **Reconciliation**: a GJF-declared charge/multiplicity must match
//!    `[molecule]`
//! 4. **Rendering** ([`orca`], [`gaussian`]): byte-exact input text
//!
//! # Calculation Kinds
//!
//! | Kind | ORCA | Gaussian |
//! |------|------|----------|
//! | `int` | `Opt Freq` | `Opt Freq` |
//! | `sp` | `SP` | `SP` |
//! | `ts` | `%compound`: constrained `Opt`, then `OptTS` | `Opt=ModRedundant`, `--Link1--`, TS optimization |
//!
//! # Quick Start
//!
//! ```no_run
//! use qcinput::generate::run_generate;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let written = run_generate(Path::new("water.xyz"), Path::new("qcinput.toml"), None)?;
//!     println!("{}", written.display());
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! Each stage has its own error type ([`parser::StructureError`],
//! [`config::ConfigError`], [`template_generator::TemplateError`]) and
//! [`generate::GenerateError`] wraps them. Errors are terminal: nothing is
//! written when any stage fails.

pub mod cli;
pub mod config;
pub mod gaussian;
pub mod generate;
pub mod geometry;
pub mod help;
pub mod keywords;
/// Dynamic file naming based on the output file basename
pub mod naming;
pub mod orca;
pub mod parser;
pub mod qm_interface;
/// Config templates for `init-config`
pub mod template_generator;
pub mod validation;

pub use config::Config;
pub use geometry::GeometryBlock;
