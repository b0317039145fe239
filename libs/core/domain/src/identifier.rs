//! Strongly-typed, string-backed identifiers.

use std::fmt;
use std::hash::Hash;

/// Opaque identifier of exactly one aggregate kind.
///
/// Identifiers are immutable value objects compared by value. Each aggregate
/// gets its own type (see [`define_identifier!`](crate::define_identifier)),
/// so a role id can never be passed where an account id is expected.
pub trait Identifier: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync {
    /// Borrow the raw value.
    fn value(&self) -> &str;

    /// Whether the raw value is empty or whitespace only.
    fn is_blank(&self) -> bool {
        self.value().trim().is_empty()
    }
}

/// Generate a fresh identifier value (time-ordered UUID v7, simple form).
pub fn unique_value() -> String {
    uuid::Uuid::now_v7().simple().to_string()
}

/// Declare a string-backed identifier type.
///
/// The calling crate must depend on `serde` (with `derive`).
///
/// ```rust
/// core_domain::define_identifier!(
///     /// Identifier of a widget.
///     WidgetId
/// );
///
/// use core_domain::Identifier;
///
/// let id = WidgetId::from_string("w-1");
/// assert_eq!(id.value(), "w-1");
/// assert_ne!(WidgetId::unique(), WidgetId::unique());
/// ```
#[macro_export]
macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a new, unique identifier.
            pub fn unique() -> Self {
                Self($crate::identifier::unique_value())
            }

            /// Wrap an existing raw value (e.g. loaded from storage).
            pub fn from_string(value: impl Into<String>) -> Self {
                Self(value.into())
            }
        }

        impl $crate::Identifier for $name {
            fn value(&self) -> &str {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::std::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ::std::convert::From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::define_identifier!(SampleId);
    crate::define_identifier!(OtherId);

    #[test]
    fn test_identifiers_compare_by_value() {
        assert_eq!(SampleId::from_string("abc"), SampleId::from_string("abc"));
        assert_ne!(SampleId::from_string("abc"), SampleId::from_string("abd"));
    }

    #[test]
    fn test_unique_identifiers_differ() {
        let first = SampleId::unique();
        let second = SampleId::unique();

        assert_ne!(first, second);
        assert_eq!(first.value().len(), 32);
    }

    #[test]
    fn test_blank_identifier() {
        assert!(OtherId::from_string("   ").is_blank());
        assert!(!OtherId::unique().is_blank());
    }

    #[test]
    fn test_identifier_serializes_transparently() {
        let id = SampleId::from_string("role-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"role-1\"");

        let back: SampleId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert_eq!(back.to_string(), "role-1");
    }
}
