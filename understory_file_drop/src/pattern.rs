// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! MIME type patterns for accepted files.
//!
//! Patterns use the same shape as an HTML `accept` attribute restricted to
//! media types: a comma-separated list of `type/subtype`, `type/*` or `*/*`.
//!
//! ```
//! use understory_file_drop::pattern::TypePattern;
//!
//! let images: TypePattern = "image/*, application/pdf".parse().unwrap();
//! assert!(images.matches("image/png"));
//! assert!(images.matches("Application/PDF"));
//! assert!(!images.matches("text/plain"));
//!
//! // The default pattern accepts anything, even an undeclared type.
//! assert!(TypePattern::default().matches(""));
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::error::PatternError;

/// One `type/subtype` or `type/*` entry of a [`TypePattern`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MediaRange {
    kind: String,
    /// `None` for a `type/*` wildcard.
    subtype: Option<String>,
}

impl MediaRange {
    /// The top-level type, lowercased.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The subtype, or `None` for a wildcard.
    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    /// Returns `true` if `mime` falls inside this range.
    ///
    /// Parameters (`; charset=...`) are ignored. An empty or malformed type
    /// never matches.
    pub fn matches(&self, mime: &str) -> bool {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        let Some((kind, subtype)) = essence.split_once('/') else {
            return false;
        };
        if !kind.eq_ignore_ascii_case(&self.kind) {
            return false;
        }
        match &self.subtype {
            Some(expected) => subtype.eq_ignore_ascii_case(expected),
            None => !subtype.is_empty(),
        }
    }
}

impl fmt::Display for MediaRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subtype {
            Some(subtype) => write!(f, "{}/{}", self.kind, subtype),
            None => write!(f, "{}/*", self.kind),
        }
    }
}

/// Pattern tested against a dropped file's declared MIME type.
///
/// With the `serde` feature it (de)serializes as its string form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum TypePattern {
    /// Matches every file, including ones with no declared type.
    #[default]
    Any,
    /// Matches files inside at least one of the ranges.
    OneOf(Vec<MediaRange>),
}

impl TypePattern {
    /// Parses an `accept`-style list such as `"image/*,text/plain"`.
    ///
    /// A `*` or `*/*` entry anywhere turns the whole pattern into
    /// [`TypePattern::Any`]. Empty entries between commas are skipped.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let mut ranges = Vec::new();
        let mut any = false;
        for entry in pattern.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let lower = entry.to_ascii_lowercase();
            if lower == "*" || lower == "*/*" {
                any = true;
                continue;
            }
            let Some((kind, subtype)) = lower.split_once('/') else {
                return Err(PatternError::MissingSubtype {
                    entry: entry.to_string(),
                });
            };
            let (kind, subtype) = (kind.trim(), subtype.trim());
            if kind.is_empty() || subtype.is_empty() {
                return Err(PatternError::MissingSubtype {
                    entry: entry.to_string(),
                });
            }
            if kind == "*" {
                return Err(PatternError::WildcardType {
                    entry: entry.to_string(),
                });
            }
            let range = MediaRange {
                kind: kind.to_string(),
                subtype: (subtype != "*").then(|| subtype.to_string()),
            };
            if !ranges.contains(&range) {
                ranges.push(range);
            }
        }
        if any {
            Ok(Self::Any)
        } else if ranges.is_empty() {
            Err(PatternError::Empty)
        } else {
            Ok(Self::OneOf(ranges))
        }
    }

    /// Returns `true` if a file declaring `mime` passes this pattern.
    pub fn matches(&self, mime: &str) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf(ranges) => ranges.iter().any(|r| r.matches(mime)),
        }
    }
}

impl FromStr for TypePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TypePattern {
    type Error = PatternError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TypePattern> for String {
    fn from(pattern: TypePattern) -> Self {
        pattern.to_string()
    }
}

impl fmt::Display for TypePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*/*"),
            Self::OneOf(ranges) => {
                for (i, range) in ranges.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{range}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> TypePattern {
        s.parse().unwrap()
    }

    #[test]
    fn wildcard_subtype_matches_family_only() {
        let images = p("image/*");
        assert!(images.matches("image/png"));
        assert!(images.matches("IMAGE/JPEG"));
        assert!(!images.matches("text/plain"));
        assert!(!images.matches("image/"));
        assert!(!images.matches("image"));
    }

    #[test]
    fn exact_range_ignores_parameters() {
        let text = p("text/plain");
        assert!(text.matches("text/plain; charset=utf-8"));
        assert!(!text.matches("text/html"));
    }

    #[test]
    fn undeclared_type_only_passes_any() {
        assert!(TypePattern::Any.matches(""));
        assert!(!p("image/*").matches(""));
    }

    #[test]
    fn star_entry_collapses_to_any() {
        assert_eq!(p("image/png, */*"), TypePattern::Any);
        assert_eq!(p("*"), TypePattern::Any);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(TypePattern::parse(""), Err(PatternError::Empty));
        assert_eq!(TypePattern::parse(" , "), Err(PatternError::Empty));
        assert_eq!(
            TypePattern::parse("image"),
            Err(PatternError::MissingSubtype {
                entry: "image".into()
            })
        );
        assert_eq!(
            TypePattern::parse("image/png,/png"),
            Err(PatternError::MissingSubtype {
                entry: "/png".into()
            })
        );
        assert_eq!(
            TypePattern::parse("*/png"),
            Err(PatternError::WildcardType {
                entry: "*/png".into()
            })
        );
    }

    #[test]
    fn display_is_canonical() {
        let pattern = p(" Image/* ,text/PLAIN,,image/*");
        assert_eq!(pattern.to_string(), "image/*, text/plain");
        assert_eq!(p(&pattern.to_string()), pattern);
        assert_eq!(TypePattern::Any.to_string(), "*/*");
    }

    #[test]
    fn range_accessors() {
        let TypePattern::OneOf(ranges) = p("image/*,text/plain") else {
            panic!("expected ranges");
        };
        assert_eq!(ranges[0].kind(), "image");
        assert_eq!(ranges[0].subtype(), None);
        assert_eq!(ranges[1].subtype(), Some("plain"));
    }
}
