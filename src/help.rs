//! Help text, version and generator banner for qcinput

const GENERATOR_BANNER: &str = concat!("Generated by qcinput v", env!("CARGO_PKG_VERSION"));

/// Banner written into every generated input deck.
///
/// ORCA decks carry it as a `#` comment, Gaussian decks as the title card.
pub fn generator_banner() -> &'static str {
    GENERATOR_BANNER
}

/// `qcinput <version>`, printed by `--version`.
pub fn version_string() -> String {
    format!("qcinput {}", env!("CARGO_PKG_VERSION"))
}

/// Global help text.
pub fn global_help() -> String {
    let lines = [
        "qcinput - Quantum chemistry input generator for ORCA and Gaussian",
        "",
        "USAGE:",
        "    qcinput <path/to/structure.xyz|.gjf> [OPTIONS]",
        "    qcinput generate <path/to/structure.xyz|.gjf> [OPTIONS]",
        "    qcinput init-config [--kind int|ts|sp] [--output PATH] [--force]",
        "",
        "COMMANDS:",
        "    generate            Write an input deck for the structure (default)",
        "    init-config         Write a starter qcinput.toml",
        "",
        "GENERATE OPTIONS:",
        "    -c, --config PATH   Configuration file",
        "    -o, --output PATH   Output file (default: <structure stem>.inp or .gjf)",
        "",
        "INIT-CONFIG OPTIONS:",
        "    -k, --kind KIND     Task tables to include: int, ts or sp (default: int)",
        "    -o, --output PATH   Where to write the template (default: ./qcinput.toml)",
        "    -f, --force         Overwrite an existing file",
        "",
        "OPTIONS:",
        "    -h, --help          Show this help",
        "    -V, --version       Show version",
        "",
        "Default behavior:",
        "    The config is read from --config, else $QCINPUT_CONFIG, else ./qcinput.toml.",
        "    [qcinput] engine selects ORCA (.inp) or Gaussian (.gjf); kind selects",
        "    int (Opt+Freq), ts (two-step transition state) or sp (single point).",
        "    GJF charge/multiplicity must match [molecule] in the config.",
        "",
        "EXAMPLES:",
        "    qcinput init-config --kind ts",
        "    qcinput water.xyz",
        "    qcinput ts_guess.gjf -c ts.toml -o ts_guess.inp",
    ];
    lines.join("\n")
}

/// Print global help
pub fn print_global_help() {
    println!("{}", global_help());
}
