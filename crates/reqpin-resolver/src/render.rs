//! Read-only views of a finished session: pinned list and graph export.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use reqpin_core::requirement::Requirement;

use crate::graph::DependencyGraph;
use crate::registry::RequirementRegistry;

/// Indentation used for the JSON graph export.
const JSON_INDENT: &[u8] = b"    ";

/// The pinned-list line for one requirement: `-e ` for editables, then the
/// link when there is one, else name and specifier.
pub fn pinned_line(requirement: &Requirement) -> String {
    let prefix = if requirement.is_editable() { "-e " } else { "" };
    match (requirement.link(), requirement.name()) {
        (Some(link), _) => format!("{prefix}{link}"),
        (None, Some(name)) => format!("{prefix}{name}{}", requirement.specifier()),
        (None, None) => prefix.trim_end().to_string(),
    }
}

/// One line per requirement to install: named entries in insertion order,
/// then unnamed ones. Constraints that were never activated are left out.
pub fn pinned_list(registry: &RequirementRegistry) -> Vec<String> {
    registry.to_install().map(pinned_line).collect()
}

/// Parent identity → dependency identities, from the graph's edges.
pub fn dependency_graph(
    registry: &RequirementRegistry,
    graph: &DependencyGraph,
) -> IndexMap<String, Vec<String>> {
    let identity = |name| {
        registry
            .get(name)
            .map(Requirement::identity)
            .unwrap_or_else(|| name.to_string())
    };
    let mut export = IndexMap::new();
    for (parent, dependencies) in graph.edges() {
        let rendered: Vec<String> = dependencies.into_iter().map(identity).collect();
        export
            .entry(identity(parent))
            .or_insert_with(Vec::new)
            .extend(rendered);
    }
    export
}

/// Serialize a graph export as JSON with four-space indentation, keys in
/// insertion order.
pub fn to_json(export: &IndexMap<String, Vec<String>>) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    export.serialize(&mut serializer)?;
    // serde_json only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
