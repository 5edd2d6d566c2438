//! Command-line parsing and dispatch.
//!
//! ```text
//! qcinput [generate] <structure.xyz|.gjf> [-c|--config PATH] [-o|--output PATH]
//! qcinput init-config [-k|--kind int|ts|sp] [-o|--output PATH] [-f|--force]
//! qcinput -h|--help
//! qcinput -V|--version
//! ```
//!
//! A first argument that is not a command or a help/version flag is taken as
//! the structure path of `generate`.

use crate::config::{default_config_path, TaskKind};
use crate::generate::{run_generate, GenerateError};
use crate::template_generator::write_template;
use std::path::PathBuf;
use thiserror::Error;

/// Usage errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CliError {
    /// An option was given without its value
    #[error("Option '{0}' requires a value.")]
    MissingValue(String),
    /// Unknown option or extra positional argument
    #[error("Unexpected argument '{0}'.")]
    UnexpectedArgument(String),
    /// `generate` without a structure path
    #[error("Missing structure file. Usage: qcinput <path/to/structure.xyz|.gjf>")]
    MissingStructure,
    /// `--kind` value is not int, ts or sp
    #[error("{0}")]
    InvalidKind(String),
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write an input deck for a structure
    Generate {
        /// Structure file
        structure: PathBuf,
        /// `--config`, else the default lookup
        config: Option<PathBuf>,
        /// `--output`, else derived from the structure path
        output: Option<PathBuf>,
    },
    /// Write a starter configuration
    InitConfig {
        /// Task tables to include
        kind: TaskKind,
        /// `--output`, else the default config path
        output: Option<PathBuf>,
        /// Overwrite an existing file
        force: bool,
    },
    /// Print help
    Help,
    /// Print version
    Version,
}

/// Parses arguments, excluding the program name.
pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let Some(first) = args.first() else {
        return Ok(Command::Help);
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help),
        "-V" | "--version" => Ok(Command::Version),
        "generate" => parse_generate(&args[1..]),
        "init-config" => parse_init_config(&args[1..]),
        _ => parse_generate(args),
    }
}

fn option_value<'a, I>(flag: &str, rest: &mut I) -> Result<&'a String, CliError>
where
    I: Iterator<Item = &'a String>,
{
    rest.next()
        .ok_or_else(|| CliError::MissingValue(flag.to_string()))
}

fn parse_generate(args: &[String]) -> Result<Command, CliError> {
    let mut structure = None;
    let mut config = None;
    let mut output = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-c" | "--config" => config = Some(PathBuf::from(option_value(arg, &mut iter)?)),
            "-o" | "--output" => output = Some(PathBuf::from(option_value(arg, &mut iter)?)),
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(CliError::UnexpectedArgument(arg.clone()))
            }
            _ if structure.is_none() => structure = Some(PathBuf::from(arg)),
            _ => return Err(CliError::UnexpectedArgument(arg.clone())),
        }
    }

    Ok(Command::Generate {
        structure: structure.ok_or(CliError::MissingStructure)?,
        config,
        output,
    })
}

fn parse_init_config(args: &[String]) -> Result<Command, CliError> {
    let mut kind = TaskKind::Int;
    let mut output = None;
    let mut force = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-k" | "--kind" => {
                kind = option_value(arg, &mut iter)?
                    .parse()
                    .map_err(CliError::InvalidKind)?
            }
            "-o" | "--output" => output = Some(PathBuf::from(option_value(arg, &mut iter)?)),
            "-f" | "--force" => force = true,
            _ => return Err(CliError::UnexpectedArgument(arg.clone())),
        }
    }

    Ok(Command::InitConfig { kind, output, force })
}

/// Runs `generate` or `init-config` and returns the path written.
///
/// `Help` and `Version` write nothing and return `None`.
pub fn execute(command: &Command) -> Result<Option<PathBuf>, GenerateError> {
    match command {
        Command::Generate {
            structure,
            config,
            output,
        } => {
            let config = config.clone().unwrap_or_else(default_config_path);
            run_generate(structure, &config, output.as_deref()).map(Some)
        }
        Command::InitConfig {
            kind,
            output,
            force,
        } => {
            let path = output.clone().unwrap_or_else(default_config_path);
            write_template(&path, *kind, *force)?;
            Ok(Some(path))
        }
        Command::Help | Command::Version => Ok(None),
    }
}
