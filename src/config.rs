//! Configuration model and resolution for qcinput.
//!
//! This module turns a parsed TOML document into a strongly typed
//! [`Config`]. The configuration is a tagged union with one variant per
//! engine and calculation kind:
//!
//! - [`Config::OrcaInt`] / [`Config::OrcaSp`]: [`OrcaSingleStep`]
//! - [`Config::OrcaTs`]: [`OrcaTransitionState`]
//! - [`Config::GaussianInt`] / [`Config::GaussianSp`]: [`GaussianSingleStep`]
//! - [`Config::GaussianTs`]: [`GaussianTransitionState`]
//!
//! Each variant holds exactly the fields its input deck needs, so a value that
//! exists is always complete. Resolution is two-phase: [`Config::from_table`]
//! builds the provisional value and [`Config::reconcile`] checks it against
//! the charge and multiplicity declared by a GJF structure.
//!
//! # Configuration File Format
//!
//! ```toml
//! [qcinput]
//! engine = "orca"
//! kind = "int"
//!
//! [molecule]
//! charge = 0
//! multiplicity = 1
//!
//! [orca]
//! nprocs = 8
//! maxcore = 4000
//! base_keywords = ["r2scan-3c", "D4", "def2-mTZVPP"]
//!
//! [orca.task.int]
//! keywords = ["Opt", "Freq"]
//! ```
//!
//! Only the tables of the selected engine and kind are read. Missing tables
//! fail with [`ConfigError::MissingTable`], absent resource settings with
//! [`ConfigError::Incomplete`] and malformed values with
//! [`ConfigError::Invalid`].

use crate::geometry::GeometryBlock;
use crate::naming::FileNaming;
use crate::parser::StructureData;
use crate::qm_interface::InputRenderer;
use crate::validation::{require_present, Section, ValidationResult};
use log::debug;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use toml::Table;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "QCINPUT_CONFIG";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "qcinput.toml";

/// Errors that can occur while loading or resolving a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist
    #[error("Config file not found: {}. Run `qcinput init-config` or pass --config <path>.", .0.display())]
    NotFound(PathBuf),
    /// A required table is absent
    #[error("Missing [{table}] table in config. Run `qcinput init-config` to generate a starter config.")]
    MissingTable {
        /// Dotted path of the missing table
        table: String,
    },
    /// A value is present but has the wrong type or violates a constraint
    #[error("Config key '{key}' {reason}")]
    Invalid {
        /// Dotted path of the offending key
        key: String,
        /// What the value must look like
        reason: String,
    },
    /// Settings required by the selected engine and kind are absent
    #[error("{context} config is incomplete: missing {}", .missing.join(", "))]
    Incomplete {
        /// Engine and kind, e.g. `Gaussian sp`
        context: String,
        /// Dotted paths of every absent key
        missing: Vec<String>,
    },
    /// The GJF structure declares a different charge/multiplicity
    #[error(
        "GJF charge/multiplicity mismatch with config: gjf={gjf_charge}/{gjf_multiplicity}, \
         config={config_charge}/{config_multiplicity}. \
         Please align [molecule] in config with the GJF file."
    )]
    ReconciliationMismatch {
        /// Charge read from the GJF file
        gjf_charge: i32,
        /// Multiplicity read from the GJF file
        gjf_multiplicity: i32,
        /// Charge from `[molecule]`
        config_charge: i32,
        /// Multiplicity from `[molecule]`
        config_multiplicity: i32,
    },
    /// TOML syntax error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// I/O error when reading the configuration file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for configuration results
type Result<T> = std::result::Result<T, ConfigError>;

/// Supported quantum chemistry programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    /// ORCA, input suffix `.inp`
    Orca,
    /// Gaussian, input suffix `.gjf`
    Gaussian,
}

impl Engine {
    /// Value used for `qcinput.engine`.
    pub fn as_str(self) -> &'static str {
        match self {
            Engine::Orca => "orca",
            Engine::Gaussian => "gaussian",
        }
    }

    /// Program name as written in messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Engine::Orca => "ORCA",
            Engine::Gaussian => "Gaussian",
        }
    }

    /// Suffix of the generated input deck.
    pub fn input_extension(self) -> &'static str {
        match self {
            Engine::Orca => "inp",
            Engine::Gaussian => "gjf",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calculation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Geometry optimization of an intermediate followed by frequencies
    Int,
    /// Two-step transition state search
    Ts,
    /// Single-point energy
    Sp,
}

impl TaskKind {
    /// All kinds, in the order they are documented.
    pub const ALL: [TaskKind; 3] = [TaskKind::Int, TaskKind::Ts, TaskKind::Sp];

    /// Value used for `qcinput.kind` and in task table names.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Int => "int",
            TaskKind::Ts => "ts",
            TaskKind::Sp => "sp",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TaskKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown kind '{}'. Expected int, ts, or sp.", s))
    }
}

/// Total charge and spin multiplicity of the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Molecule {
    /// Total charge
    pub charge: i32,
    /// Spin multiplicity (2S+1)
    pub multiplicity: i32,
}

/// ORCA `%pal` / `%maxcore` settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrcaResources {
    /// Number of parallel processes
    pub nprocs: u32,
    /// Memory per core in MB
    pub maxcore: u32,
}

/// ORCA implicit solvation (`%cpcm` block).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrcaSolvation {
    /// Emit the SMD block
    pub smd: bool,
    /// Solvent name written to `SMDsolvent`
    pub solvent: String,
}

impl Default for OrcaSolvation {
    fn default() -> Self {
        Self {
            smd: false,
            solvent: "toluene".to_string(),
        }
    }
}

/// ORCA optimization or single-point input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrcaSingleStep {
    /// Charge and multiplicity
    pub molecule: Molecule,
    /// Parallelization and memory
    pub resources: OrcaResources,
    /// Method keywords from `[orca] base_keywords`
    pub base_keywords: Vec<String>,
    /// Job keywords from `[orca.task.<kind>] keywords`
    pub task_keywords: Vec<String>,
    /// User extras appended after the others
    pub extra_keywords: Vec<String>,
    /// Implicit solvation
    pub solvation: OrcaSolvation,
}

/// Resources of the two ORCA compound steps.
///
/// Either both steps share the `[orca]` settings or each step has its own,
/// taken from `[orca.task.ts]`. The two schemas are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrcaTsResources {
    /// `[orca] nprocs/maxcore` used for both steps
    Shared(OrcaResources),
    /// `step1_*` and `step2_*` settings
    PerStep {
        /// Constrained pre-optimization
        step1: OrcaResources,
        /// TS optimization
        step2: OrcaResources,
    },
}

impl OrcaTsResources {
    /// Resources of the constrained pre-optimization.
    pub fn step1(&self) -> &OrcaResources {
        match self {
            OrcaTsResources::Shared(shared) => shared,
            OrcaTsResources::PerStep { step1, .. } => step1,
        }
    }

    /// Resources of the TS optimization.
    pub fn step2(&self) -> &OrcaResources {
        match self {
            OrcaTsResources::Shared(shared) => shared,
            OrcaTsResources::PerStep { step2, .. } => step2,
        }
    }
}

/// ORCA two-step transition state search (`%compound` job).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrcaTransitionState {
    /// Charge and multiplicity
    pub molecule: Molecule,
    /// Per-step parallelization and memory
    pub resources: OrcaTsResources,
    /// Method keywords from `[orca] base_keywords`
    pub base_keywords: Vec<String>,
    /// Keywords of the constrained optimization
    pub step1_keywords: Vec<String>,
    /// Keywords of the TS optimization
    pub step2_keywords: Vec<String>,
    /// User extras appended to both steps
    pub extra_keywords: Vec<String>,
    /// 0-based atom pairs whose distance is frozen in step 1
    pub constraint_atoms: Vec<(usize, usize)>,
    /// Compute the exact Hessian at the start of step 2
    pub calc_hess: bool,
    /// Implicit solvation, applied to both steps
    pub solvation: OrcaSolvation,
}

/// Gaussian Link 0 and model settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaussianResources {
    /// `%NProcShared`
    pub nprocshared: u32,
    /// `%Mem`, e.g. `8GB`
    pub mem: String,
    /// Model chemistry, e.g. `B3LYP/def2TZVP`
    pub method_basis: String,
}

/// Gaussian optimization or single-point input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaussianSingleStep {
    /// `int` or `sp`
    pub kind: TaskKind,
    /// Charge and multiplicity
    pub molecule: Molecule,
    /// Link 0 and model settings
    pub resources: GaussianResources,
    /// Route keywords from `[gaussian.task.<kind>] route`
    pub route: Vec<String>,
    /// User extras appended to the route
    pub extra_keywords: Vec<String>,
}

/// Gaussian two-step transition state search joined by `--Link1--`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaussianTransitionState {
    /// Charge and multiplicity
    pub molecule: Molecule,
    /// Link 0 and model settings, shared by both steps
    pub resources: GaussianResources,
    /// Route of the ModRedundant pre-optimization
    pub step1_route: Vec<String>,
    /// Route of the TS optimization
    pub step2_route: Vec<String>,
    /// ModRedundant section lines, e.g. `B 1 2 F`
    pub modredundant_lines: Vec<String>,
    /// User extras appended to both routes
    pub extra_keywords: Vec<String>,
}

/// Resolved configuration, one variant per engine and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Config {
    /// ORCA optimization + frequencies
    OrcaInt(OrcaSingleStep),
    /// ORCA single point
    OrcaSp(OrcaSingleStep),
    /// ORCA compound TS search
    OrcaTs(OrcaTransitionState),
    /// Gaussian optimization + frequencies
    GaussianInt(GaussianSingleStep),
    /// Gaussian single point
    GaussianSp(GaussianSingleStep),
    /// Gaussian Link1 TS search
    GaussianTs(GaussianTransitionState),
}

impl Config {
    /// Parses TOML text and resolves it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: Table = toml::from_str(content)?;
        Self::from_table(&table)
    }

    /// Resolves a parsed TOML document into the arm selected by
    /// `qcinput.engine` and `qcinput.kind`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingTable`] for an absent `[qcinput]`, `[molecule]`,
    ///   `[<engine>]`, `[<engine>.task]` or `[<engine>.task.<kind>]`
    /// - [`ConfigError::Incomplete`] for absent resource settings
    /// - [`ConfigError::Invalid`] for any malformed or absent task value
    pub fn from_table(table: &Table) -> Result<Self> {
        let root = Section::root(table);
        let qcinput = root.subsection("qcinput")?;
        let molecule_section = root.subsection("molecule")?;

        let engine = match qcinput.choice("engine", &["orca", "gaussian"])? {
            "orca" => Engine::Orca,
            _ => Engine::Gaussian,
        };
        let kind = match qcinput.choice("kind", &["int", "ts", "sp"])? {
            "int" => TaskKind::Int,
            "ts" => TaskKind::Ts,
            _ => TaskKind::Sp,
        };

        let engine_section = root.subsection(engine.as_str())?;
        let task = engine_section
            .subsection("task")?
            .subsection(kind.as_str())?;

        let molecule = Molecule {
            charge: molecule_section.int32("charge")?,
            multiplicity: molecule_section.int32("multiplicity")?,
        };
        let context = format!("{} {}", engine.display_name(), kind);

        let config = match (engine, kind) {
            (Engine::Orca, TaskKind::Int) => Config::OrcaInt(resolve_orca_single_step(
                &engine_section,
                &task,
                molecule,
                &context,
            )?),
            (Engine::Orca, TaskKind::Sp) => Config::OrcaSp(resolve_orca_single_step(
                &engine_section,
                &task,
                molecule,
                &context,
            )?),
            (Engine::Orca, TaskKind::Ts) => Config::OrcaTs(resolve_orca_transition_state(
                &engine_section,
                &task,
                molecule,
                &context,
            )?),
            (Engine::Gaussian, TaskKind::Int) => Config::GaussianInt(
                resolve_gaussian_single_step(&engine_section, &task, kind, molecule, &context)?,
            ),
            (Engine::Gaussian, TaskKind::Sp) => Config::GaussianSp(
                resolve_gaussian_single_step(&engine_section, &task, kind, molecule, &context)?,
            ),
            (Engine::Gaussian, TaskKind::Ts) => Config::GaussianTs(
                resolve_gaussian_transition_state(&engine_section, &task, molecule, &context)?,
            ),
        };

        debug!("Resolved {} config", context);
        Ok(config)
    }

    /// Engine of the selected arm.
    pub fn engine(&self) -> Engine {
        match self {
            Config::OrcaInt(_) | Config::OrcaSp(_) | Config::OrcaTs(_) => Engine::Orca,
            Config::GaussianInt(_) | Config::GaussianSp(_) | Config::GaussianTs(_) => {
                Engine::Gaussian
            }
        }
    }

    /// Calculation kind of the selected arm.
    pub fn kind(&self) -> TaskKind {
        match self {
            Config::OrcaInt(_) | Config::GaussianInt(_) => TaskKind::Int,
            Config::OrcaTs(_) | Config::GaussianTs(_) => TaskKind::Ts,
            Config::OrcaSp(_) | Config::GaussianSp(_) => TaskKind::Sp,
        }
    }

    /// Charge and multiplicity of the selected arm.
    pub fn molecule(&self) -> &Molecule {
        match self {
            Config::OrcaInt(c) | Config::OrcaSp(c) => &c.molecule,
            Config::OrcaTs(c) => &c.molecule,
            Config::GaussianInt(c) | Config::GaussianSp(c) => &c.molecule,
            Config::GaussianTs(c) => &c.molecule,
        }
    }

    /// Checks the configuration against a parsed structure.
    ///
    /// Structures that declare a charge and multiplicity (GJF) must agree
    /// with `[molecule]`. XYZ structures carry neither and always pass.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ReconciliationMismatch`] reporting both pairs.
    pub fn reconcile(self, structure: &StructureData) -> Result<Self> {
        if let (Some(charge), Some(multiplicity)) = (structure.charge, structure.multiplicity) {
            let molecule = self.molecule();
            if molecule.charge != charge || molecule.multiplicity != multiplicity {
                return Err(ConfigError::ReconciliationMismatch {
                    gjf_charge: charge,
                    gjf_multiplicity: multiplicity,
                    config_charge: molecule.charge,
                    config_multiplicity: molecule.multiplicity,
                });
            }
            debug!(
                "Structure charge/multiplicity {}/{} matches config",
                charge, multiplicity
            );
        }
        Ok(self)
    }

    /// Renders the input deck for `geometry`.
    pub fn render(&self, geometry: &GeometryBlock, naming: &FileNaming) -> Result<String> {
        self.renderer().render(geometry, naming)
    }

    fn renderer(&self) -> &dyn InputRenderer {
        match self {
            Config::OrcaInt(c) | Config::OrcaSp(c) => c,
            Config::OrcaTs(c) => c,
            Config::GaussianInt(c) | Config::GaussianSp(c) => c,
            Config::GaussianTs(c) => c,
        }
    }
}

fn resolve_orca_solvation(orca: &Section<'_>) -> ValidationResult<OrcaSolvation> {
    let defaults = OrcaSolvation::default();
    Ok(OrcaSolvation {
        smd: orca.optional_bool("smd", defaults.smd)?,
        solvent: orca.optional_nonempty_str("smd_solvent", &defaults.solvent)?,
    })
}

fn resolve_orca_single_step(
    orca: &Section<'_>,
    task: &Section<'_>,
    molecule: Molecule,
    context: &str,
) -> ValidationResult<OrcaSingleStep> {
    require_present(context, &[(orca, "nprocs"), (orca, "maxcore")])?;
    Ok(OrcaSingleStep {
        molecule,
        resources: OrcaResources {
            nprocs: orca.positive_int("nprocs")?,
            maxcore: orca.positive_int("maxcore")?,
        },
        base_keywords: orca.nonempty_str_list("base_keywords")?,
        task_keywords: task.nonempty_str_list("keywords")?,
        extra_keywords: orca.optional_str_list("extra_keywords")?,
        solvation: resolve_orca_solvation(orca)?,
    })
}

const ORCA_STEP_RESOURCE_KEYS: [&str; 4] = [
    "step1_nprocs",
    "step1_maxcore",
    "step2_nprocs",
    "step2_maxcore",
];

fn resolve_orca_transition_state(
    orca: &Section<'_>,
    task: &Section<'_>,
    molecule: Molecule,
    context: &str,
) -> ValidationResult<OrcaTransitionState> {
    let per_step = ORCA_STEP_RESOURCE_KEYS.iter().any(|key| task.contains(key));

    let mut required: Vec<(&Section<'_>, &str)> = if per_step {
        ORCA_STEP_RESOURCE_KEYS
            .iter()
            .map(|key| (task, *key))
            .collect()
    } else {
        vec![(orca, "nprocs"), (orca, "maxcore")]
    };
    required.push((task, "calc_hess"));
    require_present(context, &required)?;

    let resources = if per_step {
        if orca.contains("nprocs") || orca.contains("maxcore") {
            debug!(
                "Using per-step resources from [{}]; [orca] nprocs/maxcore not used",
                task.path()
            );
        }
        OrcaTsResources::PerStep {
            step1: OrcaResources {
                nprocs: task.positive_int("step1_nprocs")?,
                maxcore: task.positive_int("step1_maxcore")?,
            },
            step2: OrcaResources {
                nprocs: task.positive_int("step2_nprocs")?,
                maxcore: task.positive_int("step2_maxcore")?,
            },
        }
    } else {
        OrcaTsResources::Shared(OrcaResources {
            nprocs: orca.positive_int("nprocs")?,
            maxcore: orca.positive_int("maxcore")?,
        })
    };

    Ok(OrcaTransitionState {
        molecule,
        resources,
        base_keywords: orca.nonempty_str_list("base_keywords")?,
        step1_keywords: task.nonempty_str_list("step1_keywords")?,
        step2_keywords: task.nonempty_str_list("step2_keywords")?,
        extra_keywords: orca.optional_str_list("extra_keywords")?,
        constraint_atoms: task.int_pairs("constraint_atoms")?,
        calc_hess: task.bool("calc_hess")?,
        solvation: resolve_orca_solvation(orca)?,
    })
}

fn resolve_gaussian_resources(
    gaussian: &Section<'_>,
    context: &str,
) -> ValidationResult<GaussianResources> {
    require_present(
        context,
        &[
            (gaussian, "nprocshared"),
            (gaussian, "mem"),
            (gaussian, "method_basis"),
        ],
    )?;
    Ok(GaussianResources {
        nprocshared: gaussian.positive_int("nprocshared")?,
        mem: gaussian.nonempty_str("mem")?,
        method_basis: gaussian.nonempty_str("method_basis")?,
    })
}

fn resolve_gaussian_single_step(
    gaussian: &Section<'_>,
    task: &Section<'_>,
    kind: TaskKind,
    molecule: Molecule,
    context: &str,
) -> ValidationResult<GaussianSingleStep> {
    Ok(GaussianSingleStep {
        kind,
        molecule,
        resources: resolve_gaussian_resources(gaussian, context)?,
        route: task.nonempty_str_list("route")?,
        extra_keywords: gaussian.optional_str_list("extra_keywords")?,
    })
}

fn resolve_gaussian_transition_state(
    gaussian: &Section<'_>,
    task: &Section<'_>,
    molecule: Molecule,
    context: &str,
) -> ValidationResult<GaussianTransitionState> {
    Ok(GaussianTransitionState {
        molecule,
        resources: resolve_gaussian_resources(gaussian, context)?,
        step1_route: task.nonempty_str_list("step1_route")?,
        step2_route: task.nonempty_str_list("step2_route")?,
        modredundant_lines: resolve_modredundant(task)?,
        extra_keywords: gaussian.optional_str_list("extra_keywords")?,
    })
}

/// `constraint_atoms` pairs become frozen bonds; otherwise `modredundant` is
/// taken verbatim.
fn resolve_modredundant(task: &Section<'_>) -> ValidationResult<Vec<String>> {
    if task.contains("constraint_atoms") {
        let pairs = task.int_pairs("constraint_atoms")?;
        Ok(pairs
            .into_iter()
            .map(|(i, j)| format!("B {} {} F", i, j))
            .collect())
    } else if task.contains("modredundant") {
        task.str_or_str_list("modredundant")
    } else {
        Err(ConfigError::Invalid {
            key: task.key_path("constraint_atoms"),
            reason: format!("or '{}' must be set.", task.key_path("modredundant")),
        })
    }
}

/// Configuration path used when `--config` is not given.
///
/// `QCINPUT_CONFIG` if set (a leading `~` is expanded from `HOME`), otherwise
/// `qcinput.toml` in the current directory.
pub fn default_config_path() -> PathBuf {
    match env::var(CONFIG_ENV_VAR) {
        Ok(value) if !value.is_empty() => {
            let home = env::var_os("HOME").map(PathBuf::from);
            expand_home(&value, home.as_deref())
        }
        _ => env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_CONFIG_FILE),
    }
}

fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    match home {
        Some(home) if path == "~" => home.to_path_buf(),
        Some(home) => match path.strip_prefix("~/") {
            Some(rest) => home.join(rest),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

/// Reads and resolves a configuration file.
///
/// # Errors
///
/// [`ConfigError::NotFound`] if `path` does not exist, [`ConfigError::Toml`]
/// for syntax errors and the resolution errors of [`Config::from_table`].
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let config = Config::from_toml_str(&content)?;
    debug!(
        "Loaded {} {} config from {}",
        config.engine(),
        config.kind(),
        path.display()
    );
    Ok(config)
}
