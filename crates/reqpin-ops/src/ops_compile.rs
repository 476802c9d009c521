//! Operation: compile requirements and constraints into a pinned list.

use std::collections::VecDeque;
use std::path::PathBuf;

use indexmap::IndexMap;

use reqpin_core::config::GlobalConfig;
use reqpin_core::reqfile::{read_requirements_file, RequirementLine};
use reqpin_core::requirement::{PackageName, Provenance, Requirement};
use reqpin_resolver::backend::{Backend, MarkerBackend};
use reqpin_resolver::merge::{MergeOptions, MergeSession};
use reqpin_resolver::render;
use reqpin_util::errors::ReqpinError;
use reqpin_util::fs::{write_output, STDOUT_MARKER};

use crate::index::PackageIndex;

/// Inputs and switches for `reqpin compile`.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Requirement specs given as arguments.
    pub specs: Vec<String>,
    /// `-e` arguments.
    pub editables: Vec<String>,
    /// `-r` requirements files.
    pub requirements: Vec<PathBuf>,
    /// `-c` constraints files.
    pub constraints: Vec<PathBuf>,
    /// Package index for dependency discovery; falls back to the config.
    pub index: Option<PathBuf>,
    /// Don't discover dependencies.
    pub flat: bool,
    /// Accept repeated top-level requirements.
    pub allow_double: bool,
    /// Destination of the pinned list (`-` for stdout).
    pub output: Option<String>,
    /// Destination of the JSON dependency graph (`-` for stdout).
    pub json_output: Option<String>,
}

/// What a compile run produced.
#[derive(Debug, Clone)]
pub struct CompileResult {
    pub pinned: Vec<String>,
    pub graph: IndexMap<String, Vec<String>>,
    /// Requirements dropped because their markers did not match.
    pub skipped: usize,
}

/// Compile the inputs and write the requested outputs.
pub fn compile(opts: &CompileOptions, config: &GlobalConfig) -> miette::Result<CompileResult> {
    let session = resolve(opts, config)?;

    let result = CompileResult {
        pinned: session.render_pinned_list(),
        graph: session.render_dependency_graph(),
        skipped: session.skipped().len(),
    };

    let pinned_text = pinned_text(&result.pinned);
    match (&opts.output, &opts.json_output) {
        (None, None) => write_output(STDOUT_MARKER, &pinned_text)?,
        (output, json_output) => {
            if let Some(destination) = output {
                write_output(destination, &pinned_text)?;
            }
            if let Some(destination) = json_output {
                let json = render::to_json(&result.graph).map_err(|e| ReqpinError::Generic {
                    message: format!("Failed to serialize dependency graph: {e}"),
                })?;
                write_output(destination, &format!("{json}\n"))?;
            }
        }
    }

    Ok(result)
}

/// Run a merge session over every input, including discovered
/// dependencies, and check constraint coverage.
pub fn resolve(
    opts: &CompileOptions,
    config: &GlobalConfig,
) -> miette::Result<MergeSession<MarkerBackend>> {
    let allow_double = opts.allow_double || config.compile.allow_double;
    if allow_double && opts.constraints.is_empty() {
        return Err(ReqpinError::Usage {
            message: "--allow-double can only be used together with -c/--constraint".to_string(),
        }
        .into());
    }
    let flat = opts.flat || config.compile.flat;

    let index_path = opts
        .index
        .clone()
        .or_else(|| config.compile.index.as_ref().map(PathBuf::from));
    let index = match (&index_path, flat) {
        (Some(path), false) => PackageIndex::from_path(path)?,
        _ => PackageIndex::empty(),
    };

    let backend = MarkerBackend::new(config.marker_environment());
    let mut session = MergeSession::new(backend, MergeOptions { allow_double });

    let (inputs, constraint_names) = collect_inputs(opts, session.backend())?;
    tracing::debug!(inputs = inputs.len(), flat, "submitting requirements");

    let mut queue = VecDeque::new();
    for requirement in inputs {
        queue.extend(session.submit(requirement, None)?);
    }

    if !flat {
        discover(&mut session, &index, queue)?;
    }

    if !opts.constraints.is_empty() {
        session.validate_constraints(&constraint_names)?;
    }

    Ok(session)
}

/// Parse every input in submission order: constraints files, specs,
/// editables, then requirements files. Also returns the names declared by
/// the constraints files.
fn collect_inputs<B: Backend>(
    opts: &CompileOptions,
    backend: &B,
) -> miette::Result<(Vec<Requirement>, Vec<PackageName>)> {
    let mut lines = Vec::new();
    for path in &opts.constraints {
        lines.extend(read_requirements_file(path, true)?);
    }
    let from_constraints = lines.len();
    lines.extend(
        opts.specs
            .iter()
            .map(|spec| RequirementLine::command_line(spec.as_str(), false)),
    );
    lines.extend(
        opts.editables
            .iter()
            .map(|spec| RequirementLine::command_line(spec.as_str(), true)),
    );
    for path in &opts.requirements {
        lines.extend(read_requirements_file(path, false)?);
    }

    let mut requirements = Vec::with_capacity(lines.len());
    let mut constraint_names = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let requirement = backend.parse(line)?;
        if i < from_constraints {
            constraint_names.extend(backend.canonical_name(&requirement));
        }
        requirements.push(requirement);
    }
    Ok((requirements, constraint_names))
}

/// Breadth-first walk over the index, starting from the requirements the
/// session asked to explore.
fn discover<B: Backend>(
    session: &mut MergeSession<B>,
    index: &PackageIndex,
    mut queue: VecDeque<Requirement>,
) -> miette::Result<()> {
    while let Some(requirement) = queue.pop_front() {
        let Some(parent) = session.backend().canonical_name(&requirement) else {
            continue;
        };
        for dependency in index.dependencies_of(&parent) {
            let line = RequirementLine {
                text: dependency.clone(),
                editable: false,
                constraint: false,
                origin: Provenance::Dependency(parent.clone()),
            };
            let dependency = session.backend().parse(&line)?;
            queue.extend(session.submit(dependency, Some(&parent))?);
        }
    }
    Ok(())
}

fn pinned_text(pinned: &[String]) -> String {
    pinned.iter().map(|line| format!("{line}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_text_ends_every_line() {
        assert_eq!(pinned_text(&[]), "");
        assert_eq!(
            pinned_text(&["a==1".to_string(), "b".to_string()]),
            "a==1\nb\n"
        );
    }
}
