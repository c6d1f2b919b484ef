//! Inline citation tokens in assistant prose.
//!
//! A citation is written into the text as `[REF:agg:<id>]` or `[REF:rec:<id>]`
//! and mirrored, without brackets, into the reply's `references` list as
//! `agg:<id>` / `rec:<id>`. Ids are limited to `[A-Za-z0-9:-]`.

use crate::error::ReferenceError;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const TOKEN_PATTERN: &str = r"\[REF:(agg|rec):([A-Za-z0-9:-]+)\]";

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("reference token pattern compiles"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RefKind {
    /// A spend aggregate.
    Agg,
    /// A recommendation record.
    Rec,
}

impl RefKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RefKind::Agg => "agg",
            RefKind::Rec => "rec",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "agg" => Some(RefKind::Agg),
            "rec" => Some(RefKind::Rec),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Reference {
    pub kind: RefKind,
    pub id: String,
}

impl Reference {
    pub fn new(kind: RefKind, id: impl Into<String>) -> Result<Self, ReferenceError> {
        let id = id.into();
        if !is_valid_id(&id) {
            return Err(ReferenceError::InvalidReference {
                raw: format!("{}:{id}", kind.as_str()),
            });
        }
        Ok(Self { kind, id })
    }

    /// The bracketed inline form, e.g. `[REF:rec:rec-dev-schedules]`.
    pub fn token(&self) -> String {
        format!("[REF:{}:{}]", self.kind.as_str(), self.id)
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ':' || c == '-')
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.id)
    }
}

impl FromStr for Reference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReferenceError::InvalidReference { raw: s.to_string() };
        let (kind, id) = s.split_once(':').ok_or_else(invalid)?;
        let kind = RefKind::parse(kind).ok_or_else(invalid)?;
        Reference::new(kind, id).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Reference {
    type Error = ReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Reference> for String {
    fn from(value: Reference) -> Self {
        value.to_string()
    }
}

/// Every cited reference in `text`, in order of first appearance.
pub fn extract_references(text: &str) -> Vec<Reference> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for caps in token_regex().captures_iter(text) {
        let (Some(kind), Some(id)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let Some(kind) = RefKind::parse(kind.as_str()) else {
            continue;
        };
        let reference = Reference {
            kind,
            id: id.as_str().to_string(),
        };
        if seen.insert(reference.clone()) {
            out.push(reference);
        }
    }
    out
}

/// Every listed reference must be cited at least once in `text`. Extra tokens
/// in the text are allowed.
pub fn validate_references(text: &str, references: &[Reference]) -> Result<(), ReferenceError> {
    let cited: BTreeSet<Reference> = extract_references(text).into_iter().collect();
    for reference in references {
        if !cited.contains(reference) {
            return Err(ReferenceError::MissingToken {
                reference: reference.to_string(),
            });
        }
    }
    Ok(())
}

/// Like [`validate_references`], and additionally every token in the text must
/// be listed.
pub fn validate_lockstep(text: &str, references: &[Reference]) -> Result<(), ReferenceError> {
    validate_references(text, references)?;
    let listed: BTreeSet<&Reference> = references.iter().collect();
    for cited in extract_references(text) {
        if !listed.contains(&cited) {
            return Err(ReferenceError::UnlistedToken {
                reference: cited.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(s: &str) -> Reference {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_displays_bare_form() {
        let reference = r("agg:spend:ec2:last-30-days");
        assert_eq!(reference.kind, RefKind::Agg);
        assert_eq!(reference.id, "spend:ec2:last-30-days");
        assert_eq!(reference.to_string(), "agg:spend:ec2:last-30-days");
        assert_eq!(reference.token(), "[REF:agg:spend:ec2:last-30-days]");
    }

    #[test]
    fn rejects_bad_references() {
        for bad in ["", "agg", "agg:", "foo:bar", "rec:has space", "rec:under_score", "REC:x"] {
            assert!(bad.parse::<Reference>().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn serde_uses_bare_string_form() {
        let v = serde_json::to_value(vec![r("rec:rec-dev-schedules")]).unwrap();
        assert_eq!(v, serde_json::json!(["rec:rec-dev-schedules"]));
        let back: Vec<Reference> = serde_json::from_value(v).unwrap();
        assert_eq!(back, vec![r("rec:rec-dev-schedules")]);
        assert!(serde_json::from_value::<Reference>(serde_json::json!("nope")).is_err());
    }

    #[test]
    fn extracts_tokens_in_order_without_duplicates() {
        let text = "EC2 drove most spend [REF:agg:spend-ec2] and \
                    rightsizing helps [REF:rec:rec-ec2-rightsizing]; again [REF:agg:spend-ec2]. \
                    Not a token: [REF:foo:bar] or [REF:agg:]";
        assert_eq!(
            extract_references(text),
            vec![r("agg:spend-ec2"), r("rec:rec-ec2-rightsizing")]
        );
    }

    #[test]
    fn every_listed_reference_must_be_cited() {
        let text = "Spend rose [REF:agg:spend-total].";
        assert!(validate_references(text, &[r("agg:spend-total")]).is_ok());
        assert!(validate_references(text, &[]).is_ok());
        assert_eq!(
            validate_references(text, &[r("agg:spend-total"), r("rec:rec-rds-reserved")]),
            Err(ReferenceError::MissingToken {
                reference: "rec:rec-rds-reserved".to_string()
            })
        );
    }

    #[test]
    fn lockstep_rejects_unlisted_tokens() {
        let text = "A [REF:agg:a] and B [REF:rec:b].";
        assert!(validate_references(text, &[r("agg:a")]).is_ok());
        assert_eq!(
            validate_lockstep(text, &[r("agg:a")]),
            Err(ReferenceError::UnlistedToken {
                reference: "rec:b".to_string()
            })
        );
        assert!(validate_lockstep(text, &[r("rec:b"), r("agg:a")]).is_ok());
    }
}
