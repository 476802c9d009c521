//! Source links: VCS URLs, direct archive URLs and local paths.

use std::fmt;

use url::Url;

use crate::parse::ParseError;
use crate::requirement::PackageName;

/// Scheme prefixes that mark a version-control link (`git+https://...`).
pub const VCS_PREFIXES: [&str; 4] = ["git+", "hg+", "svn+", "bzr+"];

/// What a [`SourceLink`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// A version-control checkout, e.g. `git+ssh://host/repo.git@v1`.
    Vcs,
    /// A remote or `file:` archive URL.
    Archive,
    /// A local directory or archive path.
    Path,
}

/// A direct reference to an artifact, kept verbatim as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLink {
    raw: String,
    kind: LinkKind,
}

impl SourceLink {
    /// Parse a link. URLs are validated; anything else must look like a path.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ParseError::InvalidLink {
                link: raw.to_string(),
                reason: "empty link".to_string(),
            });
        }

        if is_url_like(raw) {
            let url = Url::parse(raw).map_err(|e| ParseError::InvalidLink {
                link: raw.to_string(),
                reason: e.to_string(),
            })?;
            let kind = if VCS_PREFIXES.iter().any(|p| url.scheme().starts_with(p)) {
                LinkKind::Vcs
            } else {
                LinkKind::Archive
            };
            return Ok(Self {
                raw: raw.to_string(),
                kind,
            });
        }

        if is_path_like(raw) {
            return Ok(Self {
                raw: raw.to_string(),
                kind: LinkKind::Path,
            });
        }

        Err(ParseError::InvalidLink {
            link: raw.to_string(),
            reason: "neither a URL nor a filesystem path".to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    /// Value of a `#fragment` key such as `egg` or `subdirectory`.
    pub fn fragment_value(&self, key: &str) -> Option<&str> {
        let (_, fragment) = self.raw.split_once('#')?;
        fragment.split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k == key && !v.is_empty()).then_some(v)
        })
    }

    /// Package name carried by an `#egg=name[-version]` fragment.
    pub fn egg_name(&self) -> Option<PackageName> {
        let egg = self.fragment_value("egg")?;
        let name = match egg
            .char_indices()
            .find(|&(i, c)| c == '-' && egg[i + 1..].starts_with(|n: char| n.is_ascii_digit()))
        {
            Some((i, _)) => &egg[..i],
            None => egg,
        };
        PackageName::parse(name).ok()
    }
}

impl fmt::Display for SourceLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// True when `s` starts with a URL scheme (`scheme:` followed by `//` or a
/// `file:` path).
pub(crate) fn is_url_like(s: &str) -> bool {
    s.contains("://") || s.starts_with("file:")
}

/// True when `s` reads as a filesystem path rather than a package name.
pub(crate) fn is_path_like(s: &str) -> bool {
    s.starts_with('.')
        || s.starts_with('/')
        || s.starts_with('~')
        || s.contains(std::path::MAIN_SEPARATOR)
        || s.contains('/')
        || [".zip", ".tar.gz", ".tgz", ".tar.bz2", ".whl"]
            .iter()
            .any(|ext| s.split('#').next().is_some_and(|p| p.ends_with(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vcs_link_with_egg() {
        let link = SourceLink::parse("git+ssh://git@server/pkg.git@2.0#egg=pkg").unwrap();
        assert_eq!(link.kind(), LinkKind::Vcs);
        assert_eq!(link.egg_name().unwrap().as_str(), "pkg");
        assert_eq!(link.to_string(), "git+ssh://git@server/pkg.git@2.0#egg=pkg");
    }

    #[test]
    fn egg_version_suffix_is_dropped() {
        let link = SourceLink::parse("https://host/a.tar.gz#egg=My_Pkg-1.0&subdirectory=src").unwrap();
        assert_eq!(link.kind(), LinkKind::Archive);
        assert_eq!(link.egg_name().unwrap().as_str(), "My_Pkg");
        assert_eq!(link.fragment_value("subdirectory"), Some("src"));
    }

    #[test]
    fn path_links() {
        assert_eq!(SourceLink::parse("./vendor/pkg").unwrap().kind(), LinkKind::Path);
        assert_eq!(SourceLink::parse("dist/pkg-1.0.tar.gz").unwrap().kind(), LinkKind::Path);
        assert!(SourceLink::parse("./vendor/pkg").unwrap().egg_name().is_none());
    }

    #[test]
    fn rejects_plain_words() {
        assert!(SourceLink::parse("requests").is_err());
        assert!(SourceLink::parse("").is_err());
    }
}
