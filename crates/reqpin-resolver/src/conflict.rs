//! Errors that abort a merge session.

use miette::Diagnostic;
use thiserror::Error;

use reqpin_core::requirement::PackageName;

/// A conflict the merge engine cannot reconcile.
///
/// Requirements are carried in their display form (`pkg==1.0 (from ...)`)
/// so the message points at both declarations.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum MergeError {
    /// A top-level requirement repeats an already accepted one.
    #[error("Double requirement given: {new} (already in {existing}, name='{name}')")]
    #[diagnostic(
        code(reqpin::double_requirement),
        help("remove one of the declarations, or allow doubles together with a constraints file")
    )]
    DoubleRequirement {
        name: PackageName,
        new: String,
        existing: String,
    },

    /// Two constraints for one package that link precedence cannot order.
    #[error("Duplicate constraint {new}, existing {existing}")]
    #[diagnostic(
        code(reqpin::duplicate_constraint),
        help("keep one constraint per package; a constraint with a link overrides one without")
    )]
    DuplicateConstraint {
        name: PackageName,
        new: String,
        existing: String,
    },

    /// Accepted requirements without a matching constraint.
    #[error("Package(s) missing from constraints: {}", join_names(.names))]
    #[diagnostic(
        code(reqpin::missing_constraints),
        help("pin every package in a constraints file")
    )]
    MissingConstraints { names: Vec<PackageName> },
}

fn join_names(names: &[PackageName]) -> String {
    names
        .iter()
        .map(PackageName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
