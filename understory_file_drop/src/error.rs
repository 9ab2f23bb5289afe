// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned while wiring up drop targets.
//!
//! Nothing that happens during a drag gesture is an error: rejected files are
//! reported through [`DropHandler`](crate::target::DropHandler) and empty drops
//! through [`DropStatus`](crate::target::DropStatus). The types here only cover
//! construction-time mistakes.

use alloc::string::String;
use core::fmt;

use crate::subscription::TargetId;

/// Error returned by [`HoverRegistry::attach`](crate::registry::HoverRegistry::attach).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttachError<K> {
    /// Another attached target already renders to `element`.
    ElementInUse {
        /// The contested element.
        element: K,
        /// The target currently attached to it.
        owner: TargetId,
    },
    /// The target is already attached to a different element.
    AlreadyAttached {
        /// The target that was attached twice.
        target: TargetId,
        /// The element it is currently attached to.
        element: K,
    },
}

impl<K: fmt::Debug> fmt::Display for AttachError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElementInUse { element, owner } => {
                write!(f, "element {element:?} is already a drop target of {owner:?}")
            }
            Self::AlreadyAttached { target, element } => {
                write!(f, "{target:?} is already attached to element {element:?}")
            }
        }
    }
}

impl<K: fmt::Debug> core::error::Error for AttachError<K> {}

/// Error returned when parsing a [`TypePattern`](crate::pattern::TypePattern).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern contained no media ranges at all.
    Empty,
    /// An entry had no `/subtype` part, e.g. `"image"`.
    MissingSubtype {
        /// The offending entry.
        entry: String,
    },
    /// An entry used a wildcard type with a concrete subtype, e.g. `"*/png"`.
    WildcardType {
        /// The offending entry.
        entry: String,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("type pattern is empty"),
            Self::MissingSubtype { entry } => {
                write!(f, "media range `{entry}` has no subtype")
            }
            Self::WildcardType { entry } => {
                write!(f, "media range `{entry}` uses `*` as type with a concrete subtype")
            }
        }
    }
}

impl core::error::Error for PatternError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn attach_error_names_the_owner() {
        let err = AttachError::ElementInUse {
            element: 7_u32,
            owner: TargetId::from_raw(3),
        };
        let msg = err.to_string();
        assert!(msg.contains('7'), "message should name the element: {msg}");
        assert!(msg.contains("TargetId(3)"), "message should name the owner: {msg}");
    }

    #[test]
    fn pattern_error_quotes_entry() {
        let err = PatternError::WildcardType {
            entry: "*/png".into(),
        };
        assert_eq!(
            err.to_string(),
            "media range `*/png` uses `*` as type with a concrete subtype"
        );
    }
}
