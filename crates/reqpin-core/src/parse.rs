//! Requirement-line parsing.
//!
//! Accepted forms:
//!
//! - `name[extras] <specifiers> ; <markers>`
//! - `name[extras] @ <url> ; <markers>`
//! - `<url or path>[#egg=name] ; <markers>`

use miette::Diagnostic;
use thiserror::Error;

use crate::link::{is_path_like, is_url_like, SourceLink};
use crate::marker::Markers;
use crate::requirement::{is_name_char, PackageName, Provenance, Requirement};
use crate::specifier::Specifier;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    #[error("empty requirement")]
    Empty,

    #[error("invalid package name in '{line}'")]
    #[diagnostic(help("names start and end with a letter or digit and may contain '.', '_' and '-'"))]
    InvalidName { line: String },

    #[error("invalid extras in '{line}'")]
    InvalidExtras { line: String },

    #[error("invalid version specifier '{spec}'")]
    #[diagnostic(help("use clauses such as '==1.0' or '>=1.2,<2'"))]
    InvalidSpecifier { spec: String },

    #[error("invalid link '{link}': {reason}")]
    InvalidLink { link: String, reason: String },

    #[error("invalid environment marker '{marker}': {reason}")]
    InvalidMarker { marker: String, reason: String },

    #[error("editable requirement '{line}' must be a path or VCS URL")]
    NotEditable { line: String },

    #[error("unnamed requirements are not allowed as constraints: '{line}'")]
    #[diagnostic(help("name the package with '#egg=<name>' or use '<name> @ <url>'"))]
    UnnamedConstraint { line: String },
}

/// Parse one requirement line.
pub fn parse_requirement(
    line: &str,
    constraint: bool,
    origin: Provenance,
) -> Result<Requirement, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let (body, markers) = split_markers(line)?;
    let bare_link = (is_url_like(body) || is_path_like(body)) && !is_direct_reference(body);
    let requirement = if bare_link {
        Requirement::from_link(SourceLink::parse(body)?, origin)
    } else {
        parse_named(body, origin)?
    };

    if constraint && requirement.name().is_none() {
        return Err(ParseError::UnnamedConstraint {
            line: line.to_string(),
        });
    }

    let requirement = match markers {
        Some(markers) => requirement.with_markers(markers),
        None => requirement,
    };
    Ok(requirement.with_constraint(constraint))
}

/// Parse the argument of `-e`/`--editable`: a local path or a VCS URL.
pub fn parse_editable(
    line: &str,
    constraint: bool,
    origin: Provenance,
) -> Result<Requirement, ParseError> {
    let requirement = parse_requirement(line, constraint, origin)?;
    match requirement.link() {
        Some(_) => Ok(requirement.with_editable(true)),
        None => Err(ParseError::NotEditable {
            line: line.trim().to_string(),
        }),
    }
}

/// Split off a `; markers` suffix.
///
/// For link forms the separator must be preceded by whitespace, since `;`
/// is legal inside URLs.
fn split_markers(line: &str) -> Result<(&str, Option<Markers>), ParseError> {
    let link_form = is_url_like(line) || line.contains(" @ ") || line.contains("@ ");
    let split_at = line.char_indices().find_map(|(i, c)| {
        if c != ';' {
            return None;
        }
        let spaced = line[..i].ends_with(char::is_whitespace);
        (!link_form || spaced).then_some(i)
    });

    match split_at {
        Some(i) => {
            let markers = Markers::parse(&line[i + 1..])?;
            Ok((line[..i].trim_end(), Some(markers)))
        }
        None => Ok((line, None)),
    }
}

/// True for `name[extras] @ url`.
fn is_direct_reference(body: &str) -> bool {
    let name_len = body.find(|c: char| !is_name_char(c)).unwrap_or(body.len());
    if name_len == 0 {
        return false;
    }
    let mut rest = body[name_len..].trim_start();
    if rest.starts_with('[') {
        match rest.find(']') {
            Some(close) => rest = rest[close + 1..].trim_start(),
            None => return false,
        }
    }
    rest.starts_with('@')
}

fn parse_named(body: &str, origin: Provenance) -> Result<Requirement, ParseError> {
    let name_end = body
        .char_indices()
        .find(|&(_, c)| !is_name_char(c))
        .map_or(body.len(), |(i, _)| i);
    let name = PackageName::parse(&body[..name_end]).map_err(|_| ParseError::InvalidName {
        line: body.to_string(),
    })?;

    let mut rest = body[name_end..].trim_start();
    let mut extras = Vec::new();
    if let Some(after) = rest.strip_prefix('[') {
        let close = after.find(']').ok_or_else(|| ParseError::InvalidExtras {
            line: body.to_string(),
        })?;
        for extra in after[..close].split(',') {
            let extra = extra.trim();
            if extra.is_empty() {
                continue;
            }
            if PackageName::parse(extra).is_err() {
                return Err(ParseError::InvalidExtras {
                    line: body.to_string(),
                });
            }
            extras.push(extra.to_string());
        }
        rest = after[close + 1..].trim_start();
    }

    let requirement = Requirement::named(name, origin).with_extras(extras);
    if let Some(url) = rest.strip_prefix('@') {
        return Ok(requirement.with_link(SourceLink::parse(url)?));
    }
    Ok(requirement.with_specifier(Specifier::parse(rest)?))
}
