//! Handler for `reqpin tree`.

use miette::Result;

use reqpin_core::config::GlobalConfig;
use reqpin_ops::ops_tree::{self, TreeOptions};

use crate::cli::InputArgs;

pub fn exec(
    inputs: InputArgs,
    depth: Option<u32>,
    why: Option<String>,
    config: &GlobalConfig,
) -> Result<()> {
    let opts = TreeOptions {
        depth: depth.map(|d| d as usize),
        why,
    };

    let rendered = ops_tree::tree(&super::compile_options(inputs), &opts, config)?;
    print!("{rendered}");
    Ok(())
}
