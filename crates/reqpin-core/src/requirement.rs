use std::borrow::Borrow;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::link::SourceLink;
use crate::marker::Markers;
use crate::parse::ParseError;
use crate::specifier::Specifier;

/// A package name as written by its first declaration.
///
/// Equality is exact; use [`PackageName::folded`] for the case-insensitive
/// alias key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    /// Validate and wrap a package name.
    pub fn parse(name: &str) -> Result<Self, ParseError> {
        let valid = !name.is_empty()
            && name.chars().all(is_name_char)
            && name.starts_with(|c: char| c.is_ascii_alphanumeric())
            && name.ends_with(|c: char| c.is_ascii_alphanumeric());
        if valid {
            Ok(Self(name.to_string()))
        } else {
            Err(ParseError::InvalidName {
                line: name.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form used as the alias key.
    pub fn folded(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// Case-insensitive comparison.
    pub fn matches(&self, other: &PackageName) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

pub(crate) fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a requirement was declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Given directly as a command-line argument.
    CommandLine,
    /// A line of a requirements file (`-r`).
    RequirementsFile { path: PathBuf, line: usize },
    /// A line of a constraints file (`-c`).
    ConstraintsFile { path: PathBuf, line: usize },
    /// Introduced as a dependency of the named package.
    Dependency(PackageName),
    /// Free-form origin supplied by an embedding caller.
    Other(String),
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::CommandLine => f.write_str("command line"),
            Provenance::RequirementsFile { path, line } => {
                write!(f, "-r {} (line {line})", path.display())
            }
            Provenance::ConstraintsFile { path, line } => {
                write!(f, "-c {} (line {line})", path.display())
            }
            Provenance::Dependency(parent) => write!(f, "{parent}"),
            Provenance::Other(text) => f.write_str(text),
        }
    }
}

/// A single package declaration.
///
/// Everything except the constraint flag and the origin is fixed at
/// construction. Those two change together, once, through
/// [`Requirement::activate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    name: Option<PackageName>,
    extras: Vec<String>,
    specifier: Specifier,
    link: Option<SourceLink>,
    markers: Option<Markers>,
    editable: bool,
    constraint: bool,
    origin: Provenance,
}

impl Requirement {
    /// A plain named requirement without version bound.
    pub fn named(name: PackageName, origin: Provenance) -> Self {
        Self {
            name: Some(name),
            extras: Vec::new(),
            specifier: Specifier::any(),
            link: None,
            markers: None,
            editable: false,
            constraint: false,
            origin,
        }
    }

    /// A requirement identified by its link; named when the link carries an
    /// `#egg=` fragment.
    pub fn from_link(link: SourceLink, origin: Provenance) -> Self {
        Self {
            name: link.egg_name(),
            extras: Vec::new(),
            specifier: Specifier::any(),
            link: Some(link),
            markers: None,
            editable: false,
            constraint: false,
            origin,
        }
    }

    pub fn with_specifier(mut self, specifier: Specifier) -> Self {
        self.specifier = specifier;
        self
    }

    pub fn with_link(mut self, link: SourceLink) -> Self {
        self.link = Some(link);
        self
    }

    pub fn with_extras(mut self, extras: Vec<String>) -> Self {
        self.extras = extras;
        self
    }

    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = Some(markers);
        self
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_constraint(mut self, constraint: bool) -> Self {
        self.constraint = constraint;
        self
    }

    pub fn name(&self) -> Option<&PackageName> {
        self.name.as_ref()
    }

    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    pub fn specifier(&self) -> &Specifier {
        &self.specifier
    }

    pub fn link(&self) -> Option<&SourceLink> {
        self.link.as_ref()
    }

    pub fn markers(&self) -> Option<&Markers> {
        self.markers.as_ref()
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_constraint(&self) -> bool {
        self.constraint
    }

    pub fn origin(&self) -> &Provenance {
        &self.origin
    }

    /// Turn a constraint into an install target declared at `origin`.
    ///
    /// The specifier and link of the constraint stay authoritative. A no-op
    /// on a requirement that is already an install target.
    pub fn activate(&mut self, origin: Provenance) {
        if self.constraint {
            self.constraint = false;
            self.origin = origin;
        }
    }

    /// `name[extras]<specifier>`, or the link for unnamed requirements.
    ///
    /// This is the key used for dependency-graph exports.
    pub fn identity(&self) -> String {
        match &self.name {
            Some(name) => {
                let mut out = name.to_string();
                if !self.extras.is_empty() {
                    out.push('[');
                    out.push_str(&self.extras.join(","));
                    out.push(']');
                }
                out.push_str(&self.specifier.to_string());
                out
            }
            None => self
                .link
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.link) {
            (Some(_), Some(link)) => write!(f, "{} from {link}", self.identity())?,
            _ => f.write_str(&self.identity())?,
        }
        write!(f, " (from {})", self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> PackageName {
        PackageName::parse(s).unwrap()
    }

    #[test]
    fn activation_flips_once_and_reattributes() {
        let mut req = Requirement::named(name("pkg"), Provenance::Other("pins".into()))
            .with_constraint(true);
        req.activate(Provenance::CommandLine);
        assert!(!req.is_constraint());
        assert_eq!(req.origin(), &Provenance::CommandLine);

        req.activate(Provenance::Other("later".into()));
        assert_eq!(req.origin(), &Provenance::CommandLine);
    }

    #[test]
    fn identity_includes_extras_and_specifier() {
        let req = Requirement::named(name("Pkg"), Provenance::CommandLine)
            .with_extras(vec!["a".into(), "b".into()])
            .with_specifier(Specifier::parse(">=1").unwrap());
        assert_eq!(req.identity(), "Pkg[a,b]>=1");
    }

    #[test]
    fn display_mentions_link_and_origin() {
        let link = SourceLink::parse("git+ssh://git@server/pkg.git@2.0").unwrap();
        let req = Requirement::named(name("pkg"), Provenance::Other("parent1".into())).with_link(link);
        assert_eq!(
            req.to_string(),
            "pkg from git+ssh://git@server/pkg.git@2.0 (from parent1)"
        );
    }

    #[test]
    fn name_validation() {
        assert!(PackageName::parse("zope.interface").is_ok());
        assert!(PackageName::parse("-bad").is_err());
        assert!(PackageName::parse("bad-").is_err());
        assert!(PackageName::parse("sp ace").is_err());
        assert!(name("Django").matches(&name("django")));
        assert_eq!(name("Django").folded(), "django");
    }
}
