//! Line parsing for port-occupancy tables.
//!
//! Rows come from the OLT's ONT listing and are only loosely structured:
//!
//! ```text
//! 1/1/1/1    1/1/1/1/2      ALCL:B3DA95BD up down -26.0 6.0 "NOME" DESCRICAO
//! 1/1/8/6    1/1/8/6/1      ALCL:FC205F5D up up -27.6 2.5 JAQUELINE_RODRIGUES_DE_LIMA Blarg/39530/2132-jaquelinerlima
//! ```
//!
//! The client name is located by an ordered list of [`NameMatcher`]s; the
//! first one that matches wins. Malformed rows degrade to a partial or empty
//! [`ParsedIdentity`] rather than failing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static QUOTED_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).expect("valid regex"));

static BARE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:up|down)\s+(?:up|down)\s+[-\d.]+\s+[\d.]+\s+([A-Z_]+)").expect("valid regex")
});

static POSITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+/\d+/\d+/\d+(?:/\d+)?").expect("valid regex"));

static UNDEFINED_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bundefined\b").expect("valid regex"));

/// A client name located in a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    /// The normalized client name.
    pub name: String,

    /// Byte offset in the row right after the name.
    pub end: usize,
}

/// Trait for name matchers, tried in order by [`parse_line`].
pub trait NameMatcher: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the client name found in the row, or None if no match.
    fn find_name(&self, line: &str) -> Option<NameMatch>;
}

/// Matches a double-quoted client name.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotedName;

impl NameMatcher for QuotedName {
    fn name(&self) -> &'static str {
        "quoted"
    }

    fn find_name(&self, line: &str) -> Option<NameMatch> {
        let caps = QUOTED_NAME.captures(line)?;
        let whole = caps.get(0)?;
        let inner = caps.get(1)?;
        Some(NameMatch {
            name: inner.as_str().trim().to_string(),
            end: whole.end(),
        })
    }
}

/// Matches an unquoted `NAME_WITH_UNDERSCORES` following the two status
/// columns and the two signal levels.
#[derive(Debug, Clone, Copy, Default)]
pub struct BareName;

impl NameMatcher for BareName {
    fn name(&self) -> &'static str {
        "bare"
    }

    fn find_name(&self, line: &str) -> Option<NameMatch> {
        let run = BARE_NAME.captures(line)?.get(1)?;
        Some(NameMatch {
            name: run.as_str().trim().replace('_', " "),
            end: run.end(),
        })
    }
}

/// The default matcher order: quoted names first, then bare names.
pub fn default_matchers() -> [&'static dyn NameMatcher; 2] {
    [&QuotedName, &BareName]
}

/// Identity fields extracted from a single table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIdentity {
    /// Full port path, e.g. `1/1/8/6/1`.
    pub position: String,

    /// Client name.
    pub name: String,

    /// Whatever follows the name (usually the box/CTO description).
    pub description: String,
}

impl ParsedIdentity {
    /// Position if present, else name, else None.
    pub fn key(&self) -> Option<&str> {
        if !self.position.is_empty() {
            Some(&self.position)
        } else if !self.name.is_empty() {
            Some(&self.name)
        } else {
            None
        }
    }

    /// Check if nothing could be extracted.
    pub fn is_empty(&self) -> bool {
        self.position.is_empty() && self.name.is_empty() && self.description.is_empty()
    }
}

/// Parse a table row with the default matchers.
pub fn parse_line(line: &str) -> ParsedIdentity {
    parse_line_with(line, &default_matchers())
}

/// Parse a table row, trying `matchers` in order for the client name.
pub fn parse_line_with(line: &str, matchers: &[&dyn NameMatcher]) -> ParsedIdentity {
    if line.trim().is_empty() {
        return ParsedIdentity::default();
    }

    let found = matchers.iter().find_map(|m| {
        m.find_name(line).inspect(|found| {
            log::trace!("{} matcher found name {:?} in {:?}", m.name(), found.name, line);
        })
    });

    let positions: Vec<&str> = POSITION.find_iter(line).map(|m| m.as_str()).collect();
    // The first path is rack/slot only; the second is the full port path.
    let position = match positions.as_slice() {
        [] => String::new(),
        [only] => only.to_string(),
        [_, second, ..] => second.to_string(),
    };

    let (name, description) = match found {
        Some(NameMatch { name, end }) => (name, clean_description(&line[end..])),
        None => (String::new(), String::new()),
    };

    ParsedIdentity {
        position,
        name,
        description,
    }
}

fn clean_description(rest: &str) -> String {
    let stripped = UNDEFINED_TOKEN.replace_all(rest, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The text shown for a removed client in the ledger.
///
/// `<position>    "<name>"    <description>` when position and name were
/// found, otherwise the raw row.
pub fn display_text(line: &str) -> String {
    let identity = parse_line(line);
    if identity.position.is_empty() || identity.name.is_empty() {
        return line.to_string();
    }

    let mut text = format!("{}    \"{}\"", identity.position, identity.name);
    if !identity.description.is_empty() {
        text.push_str("    ");
        text.push_str(&identity.description);
    }
    text
}

/// Key used to de-duplicate clients across comparisons.
///
/// Position if present, else name, else the raw (trimmed) row. Stable across
/// repeated parses of the same row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    /// Derive the identity of a raw row.
    pub fn from_line(line: &str) -> Self {
        let identity = parse_line(line);
        match identity.key() {
            Some(key) => Self(key.to_string()),
            None => Self(line.trim().to_string()),
        }
    }

    /// Get the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUOTED: &str =
        r#"1/1/1/1    1/1/1/1/2      ALCL:B3DA95BD up down -26.0 6.0 "NILSON BARBOSA" SNT-CON-NQ-SP32-SS6-P01"#;
    const BARE: &str = "1/1/8/6    1/1/8/6/1      ALCL:FC205F5D up up -27.6 2.5 JAQUELINE_RODRIGUES_DE_LIMA Blarg/39530/2132-jaquelinerlima";

    #[test]
    fn test_quoted_name() {
        let parsed = parse_line(QUOTED);
        assert_eq!(parsed.name, "NILSON BARBOSA");
        assert_eq!(parsed.position, "1/1/1/1/2");
        assert_eq!(parsed.description, "SNT-CON-NQ-SP32-SS6-P01");
    }

    #[test]
    fn test_quoted_name_is_trimmed() {
        let parsed = parse_line(r#"1/1/1/1 1/1/1/1/1 ALCL:AAA up up -20 5 "  JOHN DOE  " desc"#);
        assert_eq!(parsed.name, "JOHN DOE");
        assert_eq!(parsed.description, "desc");
    }

    #[test]
    fn test_bare_name_underscores_become_spaces() {
        let parsed = parse_line(BARE);
        assert_eq!(parsed.name, "JAQUELINE RODRIGUES DE LIMA");
        assert_eq!(parsed.position, "1/1/8/6/1");
        assert_eq!(parsed.description, "Blarg/39530/2132-jaquelinerlima");
    }

    #[test]
    fn test_bare_name_status_is_case_insensitive() {
        let parsed = parse_line("1/1/1/1 1/1/1/1/3 ALCL:X UP DOWN -20.1 3.0 MARIA_SILVA box-7");
        assert_eq!(parsed.name, "MARIA SILVA");
        assert_eq!(parsed.description, "box-7");
    }

    #[test]
    fn test_position_selection() {
        assert_eq!(parse_line("1/1/1/1 1/1/1/1/5 x").position, "1/1/1/1/5");
        assert_eq!(parse_line("only 1/2/3/4 here").position, "1/2/3/4");
        assert_eq!(parse_line("no path at all").position, "");
    }

    #[test]
    fn test_undefined_is_stripped_from_description() {
        let parsed =
            parse_line(r#"1/1/1/1 1/1/1/1/1 ALCL:A up up -20 5 "ANA"   undefined   CTO-12   undefined"#);
        assert_eq!(parsed.description, "CTO-12");

        let parsed = parse_line(r#"1/1/1/1 1/1/1/1/1 ALCL:A up up -20 5 "ANA" undefined"#);
        assert_eq!(parsed.description, "");
    }

    #[test]
    fn test_blank_line_is_empty_identity() {
        assert!(parse_line("").is_empty());
        assert!(parse_line("   \t ").is_empty());
    }

    #[test]
    fn test_malformed_line_degrades() {
        let parsed = parse_line("garbage row without structure");
        assert_eq!(parsed, ParsedIdentity::default());
        assert_eq!(parsed.key(), None);
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(parse_line(QUOTED), parse_line(QUOTED));
        assert_eq!(parse_line(BARE), parse_line(BARE));
    }

    #[test]
    fn test_matchers_are_independent() {
        assert!(QuotedName.find_name(BARE).is_none());
        let bare = BareName.find_name(BARE).unwrap();
        assert_eq!(bare.name, "JAQUELINE RODRIGUES DE LIMA");
        assert_eq!(&BARE[bare.end..bare.end + 6], " Blarg");

        // Custom order: bare-only never sees quoted names.
        let parsed = parse_line_with(QUOTED, &[&BareName]);
        assert_eq!(parsed.name, "");
        assert_eq!(parsed.position, "1/1/1/1/2");
    }

    #[test]
    fn test_display_text() {
        assert_eq!(
            display_text(r#"1/1/1/1 1/1/1/1/1 ALCL:AAA up up -20 5 "JOHN DOE" desc"#),
            "1/1/1/1/1    \"JOHN DOE\"    desc"
        );
        assert_eq!(
            display_text(r#"1/1/1/1 1/1/1/1/1 ALCL:AAA up up -20 5 "JOHN DOE""#),
            "1/1/1/1/1    \"JOHN DOE\""
        );
        assert_eq!(display_text("no identity here"), "no identity here");
    }

    #[test]
    fn test_client_identity_fallbacks() {
        assert_eq!(ClientIdentity::from_line(QUOTED).as_str(), "1/1/1/1/2");
        assert_eq!(
            ClientIdentity::from_line(r#"ALCL:X up down -20 3 "ZE""#).as_str(),
            "ZE"
        );
        assert_eq!(
            ClientIdentity::from_line("  something down  ").as_str(),
            "something down"
        );
    }
}
