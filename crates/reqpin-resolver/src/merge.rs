//! The merge engine: folds requirements into the registry one at a time.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, warn};

use reqpin_core::requirement::{PackageName, Requirement};

use crate::backend::Backend;
use crate::conflict::MergeError;
use crate::graph::DependencyGraph;
use crate::registry::RequirementRegistry;
use crate::render;

/// Session-wide switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    /// Accept a repeated top-level requirement with a warning instead of
    /// failing.
    pub allow_double: bool,
}

/// One reconciliation run over a stream of requirements.
///
/// The session owns the registry and the dependency graph. Any error is
/// fatal: state mutated before the failing call is kept, and the caller is
/// expected to drop the whole session.
#[derive(Debug)]
pub struct MergeSession<B> {
    backend: B,
    options: MergeOptions,
    registry: RequirementRegistry,
    graph: DependencyGraph,
    skipped: Vec<Requirement>,
}

impl<B: Backend> MergeSession<B> {
    pub fn new(backend: B, options: MergeOptions) -> Self {
        Self {
            backend,
            options,
            registry: RequirementRegistry::new(),
            graph: DependencyGraph::new(),
            skipped: Vec::new(),
        }
    }

    /// Submit one requirement.
    ///
    /// `parent` names the requirement that introduced `incoming` as a
    /// dependency; `None` means it was supplied by the user. The parent must
    /// already be in the registry.
    ///
    /// Returns the requirements whose own dependencies still have to be
    /// explored: empty, or exactly the one that was just inserted or
    /// activated.
    pub fn submit(
        &mut self,
        incoming: Requirement,
        parent: Option<&PackageName>,
    ) -> Result<Vec<Requirement>, MergeError> {
        if !self.backend.matches_environment(&incoming) {
            warn!(
                requirement = %incoming,
                markers = %incoming.markers().map(ToString::to_string).unwrap_or_default(),
                "ignoring requirement: markers don't match your environment"
            );
            self.skipped.push(incoming);
            return Ok(Vec::new());
        }

        let Some(name) = self.backend.canonical_name(&incoming) else {
            debug!(requirement = %incoming, "adding unnamed requirement");
            self.registry.push_unnamed(incoming.clone());
            // Nothing can ever activate an unnamed constraint.
            if incoming.is_constraint() {
                return Ok(Vec::new());
            }
            return Ok(vec![incoming]);
        };

        let top_level_install = parent.is_none() && !incoming.is_constraint();

        let (key, scan) = match self.registry.lookup_mut(&name) {
            None => {
                debug!(%name, constraint = incoming.is_constraint(), "adding requirement");
                let scan = vec![incoming.clone()];
                self.registry.insert(name.clone(), incoming);
                (name, scan)
            }
            Some((key, existing)) => {
                let key = key.clone();
                if parent.is_none() && !existing.is_constraint() {
                    if !self.options.allow_double {
                        return Err(MergeError::DoubleRequirement {
                            name: key,
                            new: incoming.to_string(),
                            existing: existing.to_string(),
                        });
                    }
                    warn!(
                        "Allowing double requirement: {incoming} (already in {existing}, name='{key}')"
                    );
                }
                let scan = merge_into(&key, existing, incoming)?;
                (key, scan)
            }
        };

        if top_level_install {
            self.graph.add_root(&key);
        }
        if let Some(parent) = parent {
            let parent_key = self
                .registry
                .resolve_key(parent)
                .cloned()
                .unwrap_or_else(|| parent.clone());
            self.graph.add_edge(&parent_key, &key);
        }
        Ok(scan)
    }

    /// Check that every accepted requirement is covered by a constraint.
    ///
    /// `constraint_names` are the names read from the constraints input;
    /// they match case-insensitively. All offenders are reported together.
    pub fn validate_constraints<'a>(
        &self,
        constraint_names: impl IntoIterator<Item = &'a PackageName>,
    ) -> Result<(), MergeError> {
        let known: HashSet<String> = constraint_names
            .into_iter()
            .map(PackageName::folded)
            .collect();
        let names: Vec<PackageName> = self
            .registry
            .iter()
            .filter(|(_, requirement)| !requirement.is_constraint())
            .filter(|(name, _)| !known.contains(&name.folded()))
            .map(|(name, _)| name.clone())
            .collect();
        if names.is_empty() {
            Ok(())
        } else {
            Err(MergeError::MissingConstraints { names })
        }
    }

    /// One pinned-requirements line per requirement to install.
    pub fn render_pinned_list(&self) -> Vec<String> {
        render::pinned_list(&self.registry)
    }

    /// Parent identity → dependency identities, in first-insertion order.
    pub fn render_dependency_graph(&self) -> IndexMap<String, Vec<String>> {
        render::dependency_graph(&self.registry, &self.graph)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn registry(&self) -> &RequirementRegistry {
        &self.registry
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Requirements dropped because their markers did not match.
    pub fn skipped(&self) -> &[Requirement] {
        &self.skipped
    }
}

/// Reconcile `incoming` with the entry already stored under `key`.
fn merge_into(
    key: &PackageName,
    existing: &mut Requirement,
    incoming: Requirement,
) -> Result<Vec<Requirement>, MergeError> {
    if !existing.is_constraint() {
        // Already explored once.
        return Ok(Vec::new());
    }

    if !incoming.is_constraint() {
        debug!(name = %key, origin = %incoming.origin(), "activating constraint");
        existing.activate(incoming.origin().clone());
        return Ok(vec![existing.clone()]);
    }

    match (incoming.link(), existing.link()) {
        (Some(_), None) => {
            debug!(name = %key, "link constraint overrides version constraint");
            *existing = incoming;
            Ok(Vec::new())
        }
        (None, Some(_)) => {
            debug!(name = %key, "ignoring version constraint after link constraint");
            Ok(Vec::new())
        }
        _ => Err(MergeError::DuplicateConstraint {
            name: key.clone(),
            new: incoming.to_string(),
            existing: existing.to_string(),
        }),
    }
}
