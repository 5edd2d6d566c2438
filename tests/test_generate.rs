use qcinput::config::ConfigError;
use qcinput::generate::{run_generate, GenerateError};
use qcinput::parser::StructureError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const WATER_XYZ: &str = "3
water molecule
O 0.000000 0.000000 0.000000
H 0.757000 0.586000 0.000000
H -0.757000 0.586000 0.000000
";

const ORCA_INT: &str = r#"
[qcinput]
engine = "orca"
kind = "int"

[molecule]
charge = 0
multiplicity = 1

[orca]
nprocs = 8
maxcore = 4000
base_keywords = ["r2scan-3c", "D4", "def2-mTZVPP"]

[orca.task.int]
keywords = ["Opt", "Freq"]
"#;

const ORCA_TS: &str = r#"
[qcinput]
engine = "orca"
kind = "ts"

[molecule]
charge = 0
multiplicity = 1

[orca]
nprocs = 8
maxcore = 4000
base_keywords = ["r2scan-3c", "D4", "def2-mTZVPP"]
extra_keywords = ["TightSCF", "NormalSCF"]
smd = true
smd_solvent = "water"

[orca.task.ts]
step1_keywords = ["Opt"]
step2_keywords = ["OptTS", "Freq"]
constraint_atoms = [[0, 1]]
calc_hess = true
"#;

const GAUSSIAN_SP: &str = r#"
[qcinput]
engine = "gaussian"
kind = "sp"

[molecule]
charge = 0
multiplicity = 1

[gaussian]
nprocshared = 8
mem = "8GB"
method_basis = "B3LYP/def2TZVP"

[gaussian.task.sp]
route = ["SP"]
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_orca_int_from_xyz() {
    let dir = TempDir::new().unwrap();
    let xyz = write(&dir, "water.xyz", WATER_XYZ);
    let config = write(&dir, "qcinput.toml", ORCA_INT);

    let written = run_generate(&xyz, &config, None).unwrap();
    assert_eq!(written, dir.path().join("water.inp"));

    let text = fs::read_to_string(&written).unwrap();
    let lines = lines(&written);
    assert!(lines.contains(&"! Opt Freq r2scan-3c D4 def2-mTZVPP NoPop".to_string()));
    assert!(lines.contains(&"* xyz 0 1".to_string()));
    assert!(text.contains("%pal\n  nprocs 8\nend\n%maxcore 4000\n"));
    assert!(text.contains("H -0.757000 0.586000 0.000000\n*\n"));
    assert!(!text.contains("%cpcm"));
}

#[test]
fn test_orca_ts_shared_resources_and_smd() {
    let dir = TempDir::new().unwrap();
    let xyz = write(&dir, "water_ts.xyz", WATER_XYZ);
    let config = write(&dir, "ts.toml", ORCA_TS);

    let written = run_generate(&xyz, &config, None).unwrap();
    let text = fs::read_to_string(&written).unwrap();

    assert!(text.contains("        {B 0 1 C}\n"));
    assert!(text.contains("\n      calc_hess true\n"));
    assert!(text.contains("    * xyzfile 0 1 water_ts_Compound_1.xyz *\n"));
    assert!(text.contains("    ! r2scan-3c D4 def2-mTZVPP Opt TightSCF NormalSCF NoPop\n"));
    assert!(text.contains("    ! r2scan-3c D4 def2-mTZVPP OptTS Freq TightSCF NormalSCF NoPop\n"));
    assert_eq!(text.matches("      nprocs 8\n").count(), 2);
    assert_eq!(text.matches("    %maxcore 4000\n").count(), 2);
    assert_eq!(text.matches("      SMD true\n").count(), 2);
    assert_eq!(text.matches("      SMDsolvent \"water\"\n").count(), 2);
}

#[test]
fn test_orca_ts_per_step_resources_and_custom_output() {
    let dir = TempDir::new().unwrap();
    let xyz = write(&dir, "guess.xyz", WATER_XYZ);
    let per_step = ORCA_TS.replace(
        "calc_hess = true",
        "calc_hess = false\nstep1_nprocs = 36\nstep1_maxcore = 3555\nstep2_nprocs = 16\nstep2_maxcore = 8000",
    );
    let config = write(&dir, "ts.toml", &per_step);
    let output = dir.path().join("renamed.inp");

    let written = run_generate(&xyz, &config, Some(&output)).unwrap();
    assert_eq!(written, output);

    let text = fs::read_to_string(&output).unwrap();
    let step1 = text.find("      nprocs 36\n    end\n    %maxcore 3555\n").unwrap();
    let step2 = text.find("      nprocs 16\n    end\n    %maxcore 8000\n").unwrap();
    assert!(step1 < step2);
    assert!(!text.contains("nprocs 8\n"));
    assert!(text.contains("      calc_hess false\n"));
    assert!(text.contains("* xyzfile 0 1 renamed_Compound_1.xyz *"));
}

#[test]
fn test_gaussian_sp_from_xyz() {
    let dir = TempDir::new().unwrap();
    let xyz = write(&dir, "water.xyz", WATER_XYZ);
    let config = write(&dir, "qcinput.toml", GAUSSIAN_SP);

    let written = run_generate(&xyz, &config, None).unwrap();
    assert_eq!(written, dir.path().join("water.gjf"));

    let lines = lines(&written);
    assert_eq!(lines[0], "%chk=water.chk");
    for expected in ["%NProcShared=8", "%Mem=8GB", "#P B3LYP/def2TZVP SP", "0 1"] {
        assert!(lines.contains(&expected.to_string()), "missing {}", expected);
    }
    assert!(fs::read_to_string(&written).unwrap().ends_with("0.000000\n\n\n"));
}

#[test]
fn test_gaussian_default_output_replaces_gjf_source() {
    let dir = TempDir::new().unwrap();
    let gjf = write(
        &dir,
        "water.gjf",
        "#p hf/sto-3g\n\nold deck\n\n0 1\nO 0.0 0.0 0.0\nH 0.757 0.586 0.0\nH -0.757 0.586 0.0\n\n",
    );
    let config = write(&dir, "qcinput.toml", GAUSSIAN_SP);

    let written = run_generate(&gjf, &config, None).unwrap();
    assert_eq!(written, gjf);

    let lines = lines(&written);
    assert_eq!(lines[0], "%chk=water.chk");
    assert!(lines.contains(&"#P B3LYP/def2TZVP SP".to_string()));
    assert!(!lines.contains(&"old deck".to_string()));
    assert!(lines.contains(&"H -0.757 0.586 0.0".to_string()));
}

#[test]
fn test_gaussian_ts_from_gjf() {
    let dir = TempDir::new().unwrap();
    let gjf = write(
        &dir,
        "guess.gjf",
        "%chk=old.chk\n#p opt b3lyp/6-31g*\n\nTS guess\n\n0 1\nO 0.0 0.0 0.0\nH 0.757 0.586 0.0\nH -0.757 0.586 0.0\n\n",
    );
    let ts = GAUSSIAN_SP
        .replace("kind = \"sp\"", "kind = \"ts\"")
        .replace(
            "[gaussian.task.sp]\nroute = [\"SP\"]",
            "[gaussian.task.ts]\nstep1_route = [\"Opt=ModRedundant\"]\nconstraint_atoms = [[1, 2]]\nstep2_route = [\"Opt=(TS,CalcFC,NoEigenTest,NoFreeze)\", \"Freq\", \"Geom=AllCheck\", \"Guess=Read\"]",
        );
    let config = write(&dir, "qcinput.toml", &ts);
    let output = dir.path().join("ts_run.gjf");

    run_generate(&gjf, &config, Some(&output)).unwrap();
    let text = fs::read_to_string(&output).unwrap();

    assert_eq!(text.matches("%chk=ts_run.chk\n%NProcShared=8\n%Mem=8GB\n").count(), 2);
    assert!(text.contains("#p B3LYP/def2TZVP Opt=ModRedundant\n"));
    assert!(text.contains("H -0.757 0.586 0.0\n\nB 1 2 F\n\n--Link1--\n"));
    assert!(text.ends_with(
        "#p B3LYP/def2TZVP Opt=(TS,CalcFC,NoEigenTest,NoFreeze) Freq Geom=AllCheck Guess=Read\n\n"
    ));
    assert!(!text.contains("old.chk"));
}

#[test]
fn test_missing_method_basis_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let xyz = write(&dir, "water.xyz", WATER_XYZ);
    let config = write(
        &dir,
        "qcinput.toml",
        &GAUSSIAN_SP.replace("method_basis = \"B3LYP/def2TZVP\"\n", ""),
    );

    let err = run_generate(&xyz, &config, None).unwrap_err();
    match &err {
        GenerateError::Config(ConfigError::Incomplete { missing, .. }) => {
            assert_eq!(missing, &vec!["gaussian.method_basis".to_string()]);
        }
        other => panic!("Expected Incomplete, got {:?}", other),
    }
    assert!(err.to_string().contains("method_basis"));
    assert!(!dir.path().join("water.gjf").exists());
}

#[test]
fn test_gjf_mismatch_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let gjf = write(
        &dir,
        "anion.gjf",
        "#p sp\n\nanion\n\n-1 2\nO 0.0 0.0 0.0\nH 0.96 0.0 0.0\n\n",
    );
    let config = write(&dir, "qcinput.toml", ORCA_INT);

    let err = run_generate(&gjf, &config, None).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("gjf=-1/2, config=0/1"));
    assert!(message.contains("[molecule]"));
    assert!(!dir.path().join("anion.inp").exists());
}

#[test]
fn test_missing_config_mentions_init_config() {
    let dir = TempDir::new().unwrap();
    let xyz = write(&dir, "water.xyz", WATER_XYZ);

    let err = run_generate(&xyz, &dir.path().join("qcinput.toml"), None).unwrap_err();
    assert!(err.to_string().contains("init-config"));
}

#[test]
fn test_unsupported_and_malformed_structures() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "qcinput.toml", ORCA_INT);

    let pdb = write(&dir, "water.pdb", "ATOM\n");
    assert!(matches!(
        run_generate(&pdb, &config, None).unwrap_err(),
        GenerateError::Structure(StructureError::UnsupportedFormat(_))
    ));

    let short = write(&dir, "short.xyz", "4\nmissing one\nO 0 0 0\nH 1 0 0\nH 0 1 0\n");
    let err = run_generate(&short, &config, None).unwrap_err();
    assert!(matches!(
        err,
        GenerateError::Structure(StructureError::MalformedGeometry(_))
    ));
    assert!(!dir.path().join("short.inp").exists());
}
