//! Requirements and constraints files.
//!
//! Files are read into [`RequirementLine`]s, which keep the raw text and the
//! provenance so that the backend can turn them into requirements later.
//! Nested `-r` and `-c` includes are followed relative to the including file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use reqpin_util::errors::ReqpinError;
use reqpin_util::fs::{read_to_string, resolve_relative};

use crate::parse::{parse_editable, parse_requirement, ParseError};
use crate::requirement::{Provenance, Requirement};

/// One requirement declaration read from a file or the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementLine {
    pub text: String,
    pub editable: bool,
    pub constraint: bool,
    pub origin: Provenance,
}

impl RequirementLine {
    /// A line given on the command line.
    pub fn command_line(text: impl Into<String>, editable: bool) -> Self {
        Self {
            text: text.into(),
            editable,
            constraint: false,
            origin: Provenance::CommandLine,
        }
    }

    /// Parse the line into a [`Requirement`].
    pub fn parse(&self) -> Result<Requirement, ParseError> {
        if self.editable {
            parse_editable(&self.text, self.constraint, self.origin.clone())
        } else {
            parse_requirement(&self.text, self.constraint, self.origin.clone())
        }
    }
}

/// Read a requirements file (`constraint = false`) or a constraints file
/// (`constraint = true`), following nested includes.
pub fn read_requirements_file(
    path: &Path,
    constraint: bool,
) -> Result<Vec<RequirementLine>, ReqpinError> {
    let mut lines = Vec::new();
    let mut stack = HashSet::new();
    read_into(path, constraint, &mut stack, &mut lines)?;
    Ok(lines)
}

fn read_into(
    path: &Path,
    constraint: bool,
    stack: &mut HashSet<PathBuf>,
    out: &mut Vec<RequirementLine>,
) -> Result<(), ReqpinError> {
    let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !stack.insert(key.clone()) {
        return Err(ReqpinError::Parse {
            message: format!("{} includes itself", path.display()),
        });
    }

    let content = read_to_string(path)?;
    for (line_no, text) in logical_lines(&content) {
        let origin = if constraint {
            Provenance::ConstraintsFile {
                path: path.to_path_buf(),
                line: line_no,
            }
        } else {
            Provenance::RequirementsFile {
                path: path.to_path_buf(),
                line: line_no,
            }
        };

        match split_directive(&text) {
            Some(("-r" | "--requirement", target)) => {
                let nested = resolve_relative(path, target);
                read_into(&nested, constraint, stack, out)?;
            }
            Some(("-c" | "--constraint", target)) => {
                let nested = resolve_relative(path, target);
                read_into(&nested, true, stack, out)?;
            }
            Some(("-e" | "--editable", target)) => out.push(RequirementLine {
                text: target.to_string(),
                editable: true,
                constraint,
                origin,
            }),
            Some((option, _)) => {
                tracing::debug!(%origin, option, "ignoring unsupported option");
            }
            None => out.push(RequirementLine {
                text,
                editable: false,
                constraint,
                origin,
            }),
        }
    }

    stack.remove(&key);
    Ok(())
}

/// Join `\` continuations and strip comments, yielding `(first line number, text)`.
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut result = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let (start, mut text) = match pending.take() {
            Some((start, mut acc)) => {
                acc.push_str(raw);
                (start, acc)
            }
            None => (line_no, raw.to_string()),
        };

        if let Some(stripped) = text.strip_suffix('\\') {
            let stripped = stripped.to_string();
            pending = Some((start, stripped));
            continue;
        }

        text = strip_comment(&text).trim().to_string();
        if !text.is_empty() {
            result.push((start, text));
        }
    }

    if let Some((start, text)) = pending {
        let text = strip_comment(&text).trim().to_string();
        if !text.is_empty() {
            result.push((start, text));
        }
    }
    result
}

/// A `#` starts a comment at the beginning of a line or after whitespace.
fn strip_comment(line: &str) -> &str {
    let mut prev_space = true;
    for (i, c) in line.char_indices() {
        if c == '#' && prev_space {
            return &line[..i];
        }
        prev_space = c.is_whitespace();
    }
    line
}

/// Split `-x value`, `-xvalue` or `--long=value` into `(option, value)`.
fn split_directive(text: &str) -> Option<(&str, &str)> {
    if !text.starts_with('-') {
        return None;
    }
    if let Some(long) = text.strip_prefix("--") {
        let end = long
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(long.len());
        let option = &text[..end + 2];
        let value = text[end + 2..].trim_start_matches('=').trim();
        return Some((option, value));
    }
    let option = text.get(..2)?;
    Some((option, text[2..].trim()))
}
