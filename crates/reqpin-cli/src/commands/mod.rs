//! Command dispatch and handler modules.

mod compile;
mod tree;

use miette::Result;

use reqpin_core::config::GlobalConfig;
use reqpin_ops::ops_compile::CompileOptions;

use crate::cli::{Cli, Command, InputArgs};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = GlobalConfig::load()?;
    match cli.command {
        Command::Compile {
            inputs,
            output,
            json_output,
        } => compile::exec(inputs, output, json_output, &config),
        Command::Tree { inputs, depth, why } => tree::exec(inputs, depth, why, &config),
    }
}

/// Compile options carrying only the inputs; output routing is left unset.
fn compile_options(inputs: InputArgs) -> CompileOptions {
    CompileOptions {
        specs: inputs.specs,
        editables: inputs.editables,
        requirements: inputs.requirements,
        constraints: inputs.constraints,
        index: inputs.index,
        flat: inputs.flat,
        allow_double: inputs.allow_double,
        output: None,
        json_output: None,
    }
}
