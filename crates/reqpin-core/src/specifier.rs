//! Version specifiers (`==1.0`, `>=2,<3`, ...).
//!
//! Specifiers are kept as written: reqpin never solves version ranges, it
//! only carries the authoritative bound through to the pinned output.

use std::fmt;

use crate::parse::ParseError;

/// Comparison operator of a single specifier clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    ArbitraryEqual,
    Equal,
    NotEqual,
    LessEqual,
    GreaterEqual,
    Compatible,
    Less,
    Greater,
}

impl Operator {
    /// Operators ordered so that longer tokens are tried first.
    const ALL: [Operator; 8] = [
        Operator::ArbitraryEqual,
        Operator::Equal,
        Operator::NotEqual,
        Operator::LessEqual,
        Operator::GreaterEqual,
        Operator::Compatible,
        Operator::Less,
        Operator::Greater,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::ArbitraryEqual => "===",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::Compatible => "~=",
            Operator::Less => "<",
            Operator::Greater => ">",
        }
    }

    /// Split a leading operator token off `s`.
    fn strip_from(s: &str) -> Option<(Operator, &str)> {
        Self::ALL
            .iter()
            .find_map(|op| s.strip_prefix(op.as_str()).map(|rest| (*op, rest)))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `<op><version>` clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub op: Operator,
    pub version: String,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.version)
    }
}

/// A comma-separated list of clauses. May be empty (no constraint).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Specifier {
    clauses: Vec<Clause>,
}

impl Specifier {
    /// The empty specifier, matching any version.
    pub fn any() -> Self {
        Self::default()
    }

    /// Parse `>=1.0, <2` style text. Surrounding parentheses are accepted.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut body = text.trim();
        if let Some(inner) = body.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
            body = inner.trim();
        }
        if body.is_empty() {
            return Ok(Self::any());
        }

        let mut clauses = Vec::new();
        for part in body.split(',') {
            let part = part.trim();
            let invalid = || ParseError::InvalidSpecifier {
                spec: text.trim().to_string(),
            };
            let (op, version) = Operator::strip_from(part).ok_or_else(invalid)?;
            let version = version.trim();
            if version.is_empty() || !version.chars().all(is_version_char) {
                return Err(invalid());
            }
            clauses.push(Clause {
                op,
                version: version.to_string(),
            });
        }
        Ok(Self { clauses })
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

fn is_version_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '*' | '+' | '!' | '-' | '_')
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiple_clauses_in_order() {
        let spec = Specifier::parse(">= 1.0, <2").unwrap();
        assert_eq!(spec.clauses().len(), 2);
        assert_eq!(spec.clauses()[0].op, Operator::GreaterEqual);
        assert_eq!(spec.to_string(), ">=1.0,<2");
    }

    #[test]
    fn longest_operator_wins() {
        let spec = Specifier::parse("===1.0-local").unwrap();
        assert_eq!(spec.clauses()[0].op, Operator::ArbitraryEqual);
        assert_eq!(spec.clauses()[0].version, "1.0-local");
    }

    #[test]
    fn parenthesised_and_empty() {
        assert_eq!(Specifier::parse("(==1.2)").unwrap().to_string(), "==1.2");
        assert!(Specifier::parse("  ").unwrap().is_empty());
    }

    #[test]
    fn rejects_missing_operator() {
        assert!(Specifier::parse("1.0").is_err());
        assert!(Specifier::parse("==").is_err());
        assert!(Specifier::parse(">=1.0,").is_err());
    }
}
