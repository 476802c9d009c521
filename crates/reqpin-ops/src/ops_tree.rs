//! Operation: display the dependency tree.

use reqpin_core::config::GlobalConfig;
use reqpin_core::requirement::{PackageName, Requirement};
use reqpin_util::errors::ReqpinError;

use crate::ops_compile::{resolve, CompileOptions};

/// Options for `reqpin tree`.
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    /// Maximum tree depth to display.
    pub depth: Option<usize>,
    /// Show the path from a top-level requirement to this package instead.
    pub why: Option<String>,
}

/// Resolve the inputs and render the dependency tree, or the `--why` path.
pub fn tree(
    inputs: &CompileOptions,
    opts: &TreeOptions,
    config: &GlobalConfig,
) -> miette::Result<String> {
    let session = resolve(inputs, config)?;
    let registry = session.registry();
    let label = |name: &PackageName| {
        registry
            .get(name)
            .map(Requirement::identity)
            .unwrap_or_else(|| name.to_string())
    };

    if let Some(ref target) = opts.why {
        let target = PackageName::parse(target).map_err(|e| ReqpinError::Usage {
            message: e.to_string(),
        })?;
        let Some(path) = session.graph().find_path(&target) else {
            return Ok(format!("Dependency '{target}' not found in the graph.\n"));
        };
        let mut output = format!("Path to {target}:\n");
        for (i, node) in path.iter().enumerate() {
            output.push_str(&format!("{}{}\n", "  ".repeat(i), label(node)));
        }
        if let Some(found) = path.last() {
            let dependents = session.graph().dependents_of(found);
            if !dependents.is_empty() {
                let names: Vec<String> = dependents.into_iter().map(|n| label(n)).collect();
                output.push_str(&format!("Required by: {}\n", names.join(", ")));
            }
        }
        return Ok(output);
    }

    let mut output = session.graph().print_tree(opts.depth, &label);
    // Unnamed requirements are not graph nodes.
    for requirement in registry.unnamed() {
        output.push_str(&requirement.identity());
        output.push('\n');
    }
    Ok(output)
}
