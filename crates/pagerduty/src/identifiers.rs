//! Newtype resource identifiers.
//!
//! Every PagerDuty resource is addressed by an opaque string id (e.g.
//! `"PJFWPEP"`). Each resource kind gets its own newtype so that an
//! [`ExtensionId`] cannot be passed where a [`ServiceId`] is expected, even
//! though both are strings on the wire.
//!
//! Identifiers are interpolated into request paths (`/extensions/{id}`), so
//! construction rejects values that would change the shape of the path.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            ///
            /// Returns `None` if the value is empty, is a dot segment (`.` or
            /// `..`), or contains a character that cannot appear inside a
            /// single path segment (`/`, `?`, `#`, or whitespace).
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if is_path_safe(&v) { Some(Self(v)) } else { None }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

fn is_path_safe(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && !value
            .chars()
            .any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace())
}

string_id! {
    /// Identifies an extension (a third-party integration attached to an account).
    ExtensionId
}

string_id! {
    /// Identifies an extension schema: the vendor-defined type of an extension
    /// (e.g. the generic webhook schema).
    ExtensionSchemaId
}

string_id! {
    /// Identifies a service. Services are the usual objects an extension is
    /// attached to.
    ServiceId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identifier_is_rejected() {
        assert!(ExtensionId::new("").is_none());
    }

    #[test]
    fn identifiers_that_would_escape_the_path_segment_are_rejected() {
        assert!(ExtensionId::new("E1/enable").is_none());
        assert!(ExtensionId::new("E1?x=1").is_none());
        assert!(ExtensionId::new("E1#frag").is_none());
        assert!(ExtensionId::new("E 1").is_none());
    }

    #[test]
    fn dot_segments_are_rejected() {
        assert!(ExtensionId::new(".").is_none());
        assert!(ExtensionId::new("..").is_none());
        assert!(ServiceId::new("..").is_none());
        assert!(ExtensionId::new("...").is_some());
        assert!(ExtensionId::new("E1.v2").is_some());
    }

    #[test]
    fn identifier_displays_its_raw_value() {
        let id = ExtensionId::new("PJFWPEP").unwrap();
        assert_eq!(id.as_str(), "PJFWPEP");
        assert_eq!(id.to_string(), "PJFWPEP");
    }

    #[test]
    fn identifier_serializes_as_a_bare_string() {
        let id = ServiceId::new("PIJ90N7").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""PIJ90N7""#);
    }
}
