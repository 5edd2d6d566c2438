//! ORCA input deck rendering.
//!
//! Two layouts are produced:
//!
//! - single-step (`int`, `sp`): one `!` line, `%pal`, `%maxcore`, optional
//!   `%cpcm` and the `* xyz` geometry block
//! - transition state (`ts`): a `%compound` job whose first step optimizes
//!   with frozen bonds and whose second step runs `OptTS` from the geometry
//!   written by the first
//!
//! Every `!` line is the ordered merge of the configured keyword groups with
//! `NoPop` ensured.

use crate::config::{
    ConfigError, OrcaResources, OrcaSingleStep, OrcaSolvation, OrcaTransitionState,
};
use crate::geometry::GeometryBlock;
use crate::help::generator_banner;
use crate::keywords::{ensure_nopop, merge_keywords};
use crate::naming::FileNaming;
use crate::qm_interface::{join_lines, InputRenderer};
use log::warn;

/// Step indentation inside `%compound`.
const STEP_INDENT: &str = "    ";

fn keyword_line(groups: [&[String]; 3]) -> String {
    format!("! {}", ensure_nopop(merge_keywords(groups)).join(" "))
}

/// `%pal` and `%maxcore` lines, each prefixed with `indent`.
fn resource_lines(resources: &OrcaResources, indent: &str) -> Vec<String> {
    vec![
        format!("{}%pal", indent),
        format!("{}  nprocs {}", indent, resources.nprocs),
        format!("{}end", indent),
        format!("{}%maxcore {}", indent, resources.maxcore),
    ]
}

/// `%cpcm` block when SMD is enabled, nothing otherwise.
fn solvation_lines(solvation: &OrcaSolvation, indent: &str) -> Vec<String> {
    if !solvation.smd {
        return Vec::new();
    }
    vec![
        format!("{}%cpcm", indent),
        format!("{}  SMD true", indent),
        format!("{}  SMDsolvent \"{}\"", indent, solvation.solvent),
        format!("{}end", indent),
    ]
}

impl InputRenderer for OrcaSingleStep {
    fn render(&self, geometry: &GeometryBlock, _naming: &FileNaming) -> Result<String, ConfigError> {
        let mut lines = vec![
            format!("# {}", generator_banner()),
            keyword_line([
                self.task_keywords.as_slice(),
                self.base_keywords.as_slice(),
                self.extra_keywords.as_slice(),
            ]),
        ];
        lines.extend(resource_lines(&self.resources, ""));
        lines.extend(solvation_lines(&self.solvation, ""));
        lines.extend([
            format!("* xyz {} {}", self.molecule.charge, self.molecule.multiplicity),
            geometry.to_string(),
            "*".to_string(),
            String::new(),
        ]);
        Ok(join_lines(lines))
    }
}

impl InputRenderer for OrcaTransitionState {
    fn render(&self, geometry: &GeometryBlock, naming: &FileNaming) -> Result<String, ConfigError> {
        let num_atoms = geometry.num_atoms();
        for &(i, j) in &self.constraint_atoms {
            if i >= num_atoms || j >= num_atoms {
                warn!(
                    "Constraint {{B {} {} C}} refers to an atom outside the {}-atom geometry (indices are 0-based)",
                    i, j, num_atoms
                );
            }
        }

        let charge = self.molecule.charge;
        let multiplicity = self.molecule.multiplicity;

        let mut lines = vec![
            format!("# {}", generator_banner()),
            "%compound".to_string(),
            "  New_Step".to_string(),
            format!(
                "{}{}",
                STEP_INDENT,
                keyword_line([
                    self.base_keywords.as_slice(),
                    self.step1_keywords.as_slice(),
                    self.extra_keywords.as_slice(),
                ])
            ),
        ];
        lines.extend(resource_lines(self.resources.step1(), STEP_INDENT));
        lines.extend(solvation_lines(&self.solvation, STEP_INDENT));
        lines.extend(["    %geom".to_string(), "      Constraints".to_string()]);
        lines.extend(
            self.constraint_atoms
                .iter()
                .map(|(i, j)| format!("        {{B {} {} C}}", i, j)),
        );
        lines.extend([
            "      end".to_string(),
            "    end".to_string(),
            format!("    * xyz {} {}", charge, multiplicity),
            geometry.to_string(),
            "    *".to_string(),
            "  Step_End".to_string(),
            String::new(),
            "  New_Step".to_string(),
            format!(
                "{}{}",
                STEP_INDENT,
                keyword_line([
                    self.base_keywords.as_slice(),
                    self.step2_keywords.as_slice(),
                    self.extra_keywords.as_slice(),
                ])
            ),
        ]);
        lines.extend(resource_lines(self.resources.step2(), STEP_INDENT));
        lines.extend(solvation_lines(&self.solvation, STEP_INDENT));
        lines.extend([
            "    %geom".to_string(),
            format!("      calc_hess {}", self.calc_hess),
            "    end".to_string(),
            format!(
                "    * xyzfile {} {} {} *",
                charge,
                multiplicity,
                naming.compound_xyz(1)
            ),
            "  Step_End".to_string(),
            "end".to_string(),
            String::new(),
        ]);
        Ok(join_lines(lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Molecule, OrcaTsResources};
    use crate::geometry::AtomLine;
    use std::path::Path;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn water() -> GeometryBlock {
        GeometryBlock::new(vec![
            AtomLine::parse("O 0 0 0").unwrap(),
            AtomLine::parse("H 0.757 0.586 0").unwrap(),
            AtomLine::parse("H -0.757 0.586 0").unwrap(),
        ])
        .unwrap()
    }

    fn single_step() -> OrcaSingleStep {
        OrcaSingleStep {
            molecule: Molecule { charge: 0, multiplicity: 1 },
            resources: OrcaResources { nprocs: 8, maxcore: 4000 },
            base_keywords: words(&["r2scan-3c", "D4", "def2-mTZVPP"]),
            task_keywords: words(&["Opt", "Freq"]),
            extra_keywords: Vec::new(),
            solvation: OrcaSolvation::default(),
        }
    }

    fn transition_state() -> OrcaTransitionState {
        OrcaTransitionState {
            molecule: Molecule { charge: 0, multiplicity: 1 },
            resources: OrcaTsResources::PerStep {
                step1: OrcaResources { nprocs: 36, maxcore: 3555 },
                step2: OrcaResources { nprocs: 16, maxcore: 8000 },
            },
            base_keywords: words(&["r2scan-3c", "D4", "def2-mTZVPP"]),
            step1_keywords: words(&["Opt"]),
            step2_keywords: words(&["OptTS", "Freq"]),
            extra_keywords: Vec::new(),
            constraint_atoms: vec![(0, 1)],
            calc_hess: true,
            solvation: OrcaSolvation::default(),
        }
    }

    #[test]
    fn test_single_step_layout() {
        let text = single_step()
            .render(&water(), &FileNaming::new(Path::new("water.inp")))
            .unwrap();
        let expected = format!(
            "# {}\n\
             ! Opt Freq r2scan-3c D4 def2-mTZVPP NoPop\n\
             %pal\n  nprocs 8\nend\n\
             %maxcore 4000\n\
             * xyz 0 1\n\
             O 0 0 0\nH 0.757 0.586 0\nH -0.757 0.586 0\n\
             *\n",
            generator_banner()
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_single_step_smd_and_extras() {
        let mut config = single_step();
        config.extra_keywords = words(&["TightSCF", "Opt", "nopop"]);
        config.solvation = OrcaSolvation {
            smd: true,
            solvent: "water".to_string(),
        };
        let text = config
            .render(&water(), &FileNaming::new(Path::new("water.inp")))
            .unwrap();
        assert!(text.contains("! Opt Freq r2scan-3c D4 def2-mTZVPP TightSCF nopop\n"));
        assert!(text.contains("%maxcore 4000\n%cpcm\n  SMD true\n  SMDsolvent \"water\"\nend\n* xyz 0 1\n"));
    }

    #[test]
    fn test_transition_state_layout() {
        let text = transition_state()
            .render(&water(), &FileNaming::new(Path::new("runs/water_ts.inp")))
            .unwrap();
        let expected = format!(
            "# {}\n\
             %compound\n\
             \x20 New_Step\n\
             \x20   ! r2scan-3c D4 def2-mTZVPP Opt NoPop\n\
             \x20   %pal\n\
             \x20     nprocs 36\n\
             \x20   end\n\
             \x20   %maxcore 3555\n\
             \x20   %geom\n\
             \x20     Constraints\n\
             \x20       {{B 0 1 C}}\n\
             \x20     end\n\
             \x20   end\n\
             \x20   * xyz 0 1\n\
             O 0 0 0\nH 0.757 0.586 0\nH -0.757 0.586 0\n\
             \x20   *\n\
             \x20 Step_End\n\
             \n\
             \x20 New_Step\n\
             \x20   ! r2scan-3c D4 def2-mTZVPP OptTS Freq NoPop\n\
             \x20   %pal\n\
             \x20     nprocs 16\n\
             \x20   end\n\
             \x20   %maxcore 8000\n\
             \x20   %geom\n\
             \x20     calc_hess true\n\
             \x20   end\n\
             \x20   * xyzfile 0 1 water_ts_Compound_1.xyz *\n\
             \x20 Step_End\n\
             end\n",
            generator_banner()
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_transition_state_shared_resources_and_smd() {
        let mut config = transition_state();
        config.resources = OrcaTsResources::Shared(OrcaResources { nprocs: 8, maxcore: 4000 });
        config.calc_hess = false;
        config.constraint_atoms = vec![(0, 1), (1, 2)];
        config.solvation.smd = true;
        let text = config
            .render(&water(), &FileNaming::new(Path::new("w.inp")))
            .unwrap();

        assert_eq!(text.matches("      nprocs 8\n").count(), 2);
        assert_eq!(text.matches("    %maxcore 4000\n").count(), 2);
        assert_eq!(text.matches("      SMDsolvent \"toluene\"\n").count(), 2);
        assert!(text.contains("        {B 0 1 C}\n        {B 1 2 C}\n"));
        assert!(text.contains("      calc_hess false\n"));
        assert!(text.ends_with("  Step_End\nend\n"));
    }
}
