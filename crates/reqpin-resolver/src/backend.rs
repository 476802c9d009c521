//! The seam to the package resolution backend.

use reqpin_core::marker::MarkerEnvironment;
use reqpin_core::parse::ParseError;
use reqpin_core::reqfile::RequirementLine;
use reqpin_core::requirement::{PackageName, Requirement};

/// Questions the merge engine delegates to the outside world.
pub trait Backend {
    /// Turn a declaration into a [`Requirement`].
    fn parse(&self, line: &RequirementLine) -> Result<Requirement, ParseError> {
        line.parse()
    }

    /// Whether the requirement's environment markers hold here.
    fn matches_environment(&self, requirement: &Requirement) -> bool;

    /// Registry key for the requirement, `None` for unnamed links.
    fn canonical_name(&self, requirement: &Requirement) -> Option<PackageName> {
        requirement.name().cloned()
    }
}

/// Backend that evaluates markers against a fixed [`MarkerEnvironment`].
#[derive(Debug, Clone, Default)]
pub struct MarkerBackend {
    environment: MarkerEnvironment,
}

impl MarkerBackend {
    pub fn new(environment: MarkerEnvironment) -> Self {
        Self { environment }
    }

    pub fn environment(&self) -> &MarkerEnvironment {
        &self.environment
    }
}

impl Backend for MarkerBackend {
    fn matches_environment(&self, requirement: &Requirement) -> bool {
        requirement
            .markers()
            .map_or(true, |markers| markers.evaluate(&self.environment))
    }
}

impl<B: Backend + ?Sized> Backend for &B {
    fn parse(&self, line: &RequirementLine) -> Result<Requirement, ParseError> {
        (**self).parse(line)
    }

    fn matches_environment(&self, requirement: &Requirement) -> bool {
        (**self).matches_environment(requirement)
    }

    fn canonical_name(&self, requirement: &Requirement) -> Option<PackageName> {
        (**self).canonical_name(requirement)
    }
}
