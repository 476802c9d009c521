//! Handler for `reqpin compile`.

use miette::Result;

use reqpin_core::config::GlobalConfig;
use reqpin_ops::ops_compile::{self, CompileOptions};
use reqpin_util::fs::STDOUT_MARKER;
use reqpin_util::progress;

use crate::cli::InputArgs;

pub fn exec(
    inputs: InputArgs,
    output: Option<String>,
    json_output: Option<String>,
    config: &GlobalConfig,
) -> Result<()> {
    let opts = CompileOptions {
        output,
        json_output,
        ..super::compile_options(inputs)
    };

    let result = ops_compile::compile(&opts, config)?;

    for destination in [&opts.output, &opts.json_output].into_iter().flatten() {
        if destination != STDOUT_MARKER {
            progress::status_info("Wrote", destination);
        }
    }

    if result.skipped > 0 {
        progress::status_warn(
            "Skipped",
            &format!(
                "{} for other environments",
                progress::plural(result.skipped, "requirement")
            ),
        );
    }
    progress::status(
        "Compiled",
        &progress::plural(result.pinned.len(), "requirement"),
    );
    Ok(())
}
