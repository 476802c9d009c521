//! Environment markers (`python_version >= "3.8" and sys_platform == "linux"`).

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::parse::ParseError;

/// Python version assumed when nothing else is configured.
pub const DEFAULT_PYTHON_VERSION: &str = "3.12";

/// Marker variables that may appear in an expression.
pub const MARKER_VARIABLES: [&str; 12] = [
    "os_name",
    "sys_platform",
    "platform_machine",
    "platform_python_implementation",
    "platform_release",
    "platform_system",
    "platform_version",
    "python_version",
    "python_full_version",
    "implementation_name",
    "implementation_version",
    "extra",
];

const VERSION_VARIABLES: [&str; 3] = [
    "python_version",
    "python_full_version",
    "implementation_version",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerOp {
    Equal,
    NotEqual,
    LessEqual,
    GreaterEqual,
    Less,
    Greater,
    Compatible,
    ArbitraryEqual,
    In,
    NotIn,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkerValue {
    Variable(String),
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkerExpr {
    Compare {
        lhs: MarkerValue,
        op: MarkerOp,
        rhs: MarkerValue,
    },
    And(Vec<MarkerExpr>),
    Or(Vec<MarkerExpr>),
}

/// A parsed marker expression together with its source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Markers {
    raw: String,
    expr: MarkerExpr,
}

impl Markers {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let raw = text.trim();
        let tokens = tokenize(raw)?;
        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            raw,
        };
        let expr = parser.parse_or()?;
        if parser.pos != tokens.len() {
            return Err(invalid(raw, "unexpected trailing tokens"));
        }
        Ok(Self {
            raw: raw.to_string(),
            expr,
        })
    }

    pub fn expr(&self) -> &MarkerExpr {
        &self.expr
    }

    pub fn evaluate(&self, env: &MarkerEnvironment) -> bool {
        self.expr.evaluate(env)
    }
}

impl fmt::Display for Markers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl MarkerExpr {
    pub fn evaluate(&self, env: &MarkerEnvironment) -> bool {
        match self {
            MarkerExpr::And(items) => items.iter().all(|e| e.evaluate(env)),
            MarkerExpr::Or(items) => items.iter().any(|e| e.evaluate(env)),
            MarkerExpr::Compare { lhs, op, rhs } => {
                let versioned = [lhs, rhs].iter().any(|v| {
                    matches!(v, MarkerValue::Variable(name) if VERSION_VARIABLES.contains(&name.as_str()))
                });
                let left = env.resolve(lhs);
                let right = env.resolve(rhs);
                compare(left, *op, right, versioned)
            }
        }
    }
}

fn compare(left: &str, op: MarkerOp, right: &str, versioned: bool) -> bool {
    match op {
        MarkerOp::In => right.contains(left),
        MarkerOp::NotIn => !right.contains(left),
        MarkerOp::ArbitraryEqual => left == right,
        MarkerOp::Compatible => {
            let components: Vec<&str> = right.split('.').collect();
            let prefix = components[..components.len().saturating_sub(1)].join(".");
            let same_series = prefix.is_empty()
                || compare_versions(&truncate(left, components.len() - 1), &prefix)
                    == Ordering::Equal;
            compare_versions(left, right) != Ordering::Less && same_series
        }
        _ => {
            let ordering = if versioned {
                compare_versions(left, right)
            } else {
                left.cmp(right)
            };
            match op {
                MarkerOp::Equal => ordering == Ordering::Equal,
                MarkerOp::NotEqual => ordering != Ordering::Equal,
                MarkerOp::LessEqual => ordering != Ordering::Greater,
                MarkerOp::GreaterEqual => ordering != Ordering::Less,
                MarkerOp::Less => ordering == Ordering::Less,
                MarkerOp::Greater => ordering == Ordering::Greater,
                _ => unreachable!("handled above"),
            }
        }
    }
}

fn truncate(version: &str, parts: usize) -> String {
    version.split('.').take(parts).collect::<Vec<_>>().join(".")
}

/// Compare dotted versions component-wise, padding with zeros.
fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |s: &str| -> Vec<u64> {
        s.split('.')
            .map(|part| {
                let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().unwrap_or(0)
            })
            .collect()
    };
    let (a, b) = (parse(a), parse(b));
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Values of the marker variables for the environment being compiled for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerEnvironment {
    values: BTreeMap<String, String>,
}

impl MarkerEnvironment {
    /// Describe the running platform with [`DEFAULT_PYTHON_VERSION`].
    pub fn host() -> Self {
        let os = std::env::consts::OS;
        let arch = std::env::consts::ARCH;
        let (os_name, sys_platform, platform_system) = match os {
            "linux" => ("posix", "linux", "Linux"),
            "macos" => ("posix", "darwin", "Darwin"),
            "windows" => ("nt", "win32", "Windows"),
            other => ("posix", other, other),
        };
        let machine = match (os, arch) {
            ("macos", "aarch64") => "arm64",
            ("windows", "x86_64") => "AMD64",
            (_, arch) => arch,
        };

        let mut values = BTreeMap::new();
        let mut set = |k: &str, v: &str| {
            values.insert(k.to_string(), v.to_string());
        };
        set("os_name", os_name);
        set("sys_platform", sys_platform);
        set("platform_system", platform_system);
        set("platform_machine", machine);
        set("platform_python_implementation", "CPython");
        set("platform_release", "");
        set("platform_version", "");
        set("implementation_name", "cpython");
        set("python_version", DEFAULT_PYTHON_VERSION);
        set("python_full_version", &format!("{DEFAULT_PYTHON_VERSION}.0"));
        set("implementation_version", &format!("{DEFAULT_PYTHON_VERSION}.0"));
        set("extra", "");
        Self { values }
    }

    /// Apply overrides, e.g. from the `[environment]` config table.
    ///
    /// Overriding `python_version` alone also moves the derived full versions.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        if let Some(version) = overrides.get("python_version") {
            for key in ["python_full_version", "implementation_version"] {
                if !overrides.contains_key(key) {
                    self.values.insert(key.to_string(), format!("{version}.0"));
                }
            }
        }
        for (key, value) in overrides {
            self.values.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn get(&self, variable: &str) -> Option<&str> {
        self.values.get(variable).map(String::as_str)
    }

    fn resolve<'a>(&'a self, value: &'a MarkerValue) -> &'a str {
        match value {
            MarkerValue::Literal(s) => s,
            MarkerValue::Variable(name) => self.get(name).unwrap_or(""),
        }
    }
}

impl Default for MarkerEnvironment {
    fn default() -> Self {
        Self::host()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    And,
    Or,
    Op(MarkerOp),
    Ident(String),
    Str(String),
}

fn invalid(marker: &str, reason: &str) -> ParseError {
    ParseError::InvalidMarker {
        marker: marker.to_string(),
        reason: reason.to_string(),
    }
}

fn tokenize(raw: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = raw.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '"' | '\'' => {
                let end = chars[i + 1..]
                    .iter()
                    .position(|&ch| ch == c)
                    .ok_or_else(|| invalid(raw, "unterminated string"))?;
                tokens.push(Token::Str(chars[i + 1..i + 1 + end].iter().collect()));
                i += end + 2;
            }
            '=' | '!' | '<' | '>' | '~' => {
                let rest: String = chars[i..chars.len().min(i + 3)].iter().collect();
                let (op, len) = if rest.starts_with("===") {
                    (MarkerOp::ArbitraryEqual, 3)
                } else if rest.starts_with("==") {
                    (MarkerOp::Equal, 2)
                } else if rest.starts_with("!=") {
                    (MarkerOp::NotEqual, 2)
                } else if rest.starts_with("<=") {
                    (MarkerOp::LessEqual, 2)
                } else if rest.starts_with(">=") {
                    (MarkerOp::GreaterEqual, 2)
                } else if rest.starts_with("~=") {
                    (MarkerOp::Compatible, 2)
                } else if rest.starts_with('<') {
                    (MarkerOp::Less, 1)
                } else if rest.starts_with('>') {
                    (MarkerOp::Greater, 1)
                } else {
                    return Err(invalid(raw, "unknown operator"));
                };
                tokens.push(Token::Op(op));
                i += len;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                match word.as_str() {
                    "and" => tokens.push(Token::And),
                    "or" => tokens.push(Token::Or),
                    "in" => {
                        if tokens.last() == Some(&Token::Ident("not".to_string())) {
                            tokens.pop();
                            tokens.push(Token::Op(MarkerOp::NotIn));
                        } else {
                            tokens.push(Token::Op(MarkerOp::In));
                        }
                    }
                    _ => tokens.push(Token::Ident(word)),
                }
            }
            _ => return Err(invalid(raw, &format!("unexpected character '{c}'"))),
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    raw: &'a str,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn parse_or(&mut self) -> Result<MarkerExpr, ParseError> {
        let mut items = vec![self.parse_and()?];
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            items.push(self.parse_and()?);
        }
        Ok(if items.len() == 1 {
            items.remove(0)
        } else {
            MarkerExpr::Or(items)
        })
    }

    fn parse_and(&mut self) -> Result<MarkerExpr, ParseError> {
        let mut items = vec![self.parse_atom()?];
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            items.push(self.parse_atom()?);
        }
        Ok(if items.len() == 1 {
            items.remove(0)
        } else {
            MarkerExpr::And(items)
        })
    }

    fn parse_atom(&mut self) -> Result<MarkerExpr, ParseError> {
        if self.peek() == Some(&Token::LParen) {
            self.pos += 1;
            let inner = self.parse_or()?;
            return match self.next() {
                Some(Token::RParen) => Ok(inner),
                _ => Err(invalid(self.raw, "missing ')'")),
            };
        }
        let lhs = self.parse_value()?;
        let op = match self.next() {
            Some(Token::Op(op)) => *op,
            _ => return Err(invalid(self.raw, "expected a comparison operator")),
        };
        let rhs = self.parse_value()?;
        Ok(MarkerExpr::Compare { lhs, op, rhs })
    }

    fn parse_value(&mut self) -> Result<MarkerValue, ParseError> {
        let raw = self.raw;
        match self.next() {
            Some(Token::Str(s)) => Ok(MarkerValue::Literal(s.clone())),
            Some(Token::Ident(name)) if MARKER_VARIABLES.contains(&name.as_str()) => {
                Ok(MarkerValue::Variable(name.clone()))
            }
            Some(Token::Ident(name)) => Err(invalid(raw, &format!("unknown variable '{name}'"))),
            _ => Err(invalid(raw, "expected a variable or a quoted string")),
        }
    }
}
