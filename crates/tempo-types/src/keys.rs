//! String-backed key wrappers for rooms and players.
//!
//! Keys are opaque to the core: the server assigns them at session
//! creation and the store uses them to scope its logs. They are
//! human-readable (e.g. `cedar-7f2a`) rather than raw UUIDs so they can
//! appear in URLs and page headers as-is. Uniqueness is assumed, not
//! enforced.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing key value.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Return the key as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(key: $name) -> Self {
                key.0
            }
        }
    };
}

define_key! {
    /// Identifier scoping one game's snapshot log and its subscribers.
    RoomKey
}

define_key! {
    /// Identifier scoping one player's raw input log.
    PlayerId
}
