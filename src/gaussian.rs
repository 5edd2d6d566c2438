//! Gaussian input deck rendering.
//!
//! Single-step decks (`int`, `sp`) are one job. Transition state decks chain
//! a ModRedundant pre-optimization and the TS optimization with `--Link1--`,
//! both writing the same checkpoint file named after the output stem.

use crate::config::{
    ConfigError, GaussianResources, GaussianSingleStep, GaussianTransitionState,
};
use crate::geometry::GeometryBlock;
use crate::help::generator_banner;
use crate::keywords::merge_keywords;
use crate::naming::FileNaming;
use crate::qm_interface::{join_lines, require_filled, InputRenderer};

/// Link 0 section: checkpoint, processors, memory.
fn link0_lines(resources: &GaussianResources, naming: &FileNaming) -> Vec<String> {
    vec![
        format!("%chk={}", naming.chk_file()),
        format!("%NProcShared={}", resources.nprocshared),
        format!("%Mem={}", resources.mem),
    ]
}

/// Route keywords: model chemistry first, then the job keywords, then extras.
fn route_keywords(resources: &GaussianResources, route: &[String], extra: &[String]) -> String {
    let method = [resources.method_basis.clone()];
    merge_keywords([method.as_slice(), route, extra]).join(" ")
}

fn resource_fields(resources: &GaussianResources) -> [(&'static str, bool); 2] {
    [
        ("mem", !resources.mem.trim().is_empty()),
        ("method_basis", !resources.method_basis.trim().is_empty()),
    ]
}

impl InputRenderer for GaussianSingleStep {
    fn render(&self, geometry: &GeometryBlock, naming: &FileNaming) -> Result<String, ConfigError> {
        let mut fields = resource_fields(&self.resources).to_vec();
        fields.push(("route", !self.route.is_empty()));
        require_filled(&format!("Gaussian {}", self.kind), &fields)?;

        let mut lines = link0_lines(&self.resources, naming);
        lines.extend([
            format!(
                "#P {}",
                route_keywords(&self.resources, &self.route, &self.extra_keywords)
            ),
            String::new(),
            generator_banner().to_string(),
            String::new(),
            format!("{} {}", self.molecule.charge, self.molecule.multiplicity),
            geometry.to_string(),
            String::new(),
            String::new(),
            String::new(),
        ]);
        Ok(join_lines(lines))
    }
}

impl InputRenderer for GaussianTransitionState {
    fn render(&self, geometry: &GeometryBlock, naming: &FileNaming) -> Result<String, ConfigError> {
        let mut fields = resource_fields(&self.resources).to_vec();
        fields.extend([
            ("step1_route", !self.step1_route.is_empty()),
            ("modredundant", !self.modredundant_lines.is_empty()),
            ("step2_route", !self.step2_route.is_empty()),
        ]);
        require_filled("Gaussian ts", &fields)?;

        let mut lines = link0_lines(&self.resources, naming);
        lines.extend([
            format!(
                "#p {}",
                route_keywords(&self.resources, &self.step1_route, &self.extra_keywords)
            ),
            String::new(),
            generator_banner().to_string(),
            String::new(),
            format!("{} {}", self.molecule.charge, self.molecule.multiplicity),
            geometry.to_string(),
            String::new(),
        ]);
        lines.extend(self.modredundant_lines.iter().cloned());
        lines.extend([String::new(), "--Link1--".to_string()]);
        lines.extend(link0_lines(&self.resources, naming));
        lines.extend([
            format!(
                "#p {}",
                route_keywords(&self.resources, &self.step2_route, &self.extra_keywords)
            ),
            String::new(),
            String::new(),
        ]);
        Ok(join_lines(lines))
    }
}
