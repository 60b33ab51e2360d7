use serde::{Deserialize, Serialize};

/// Declares an opaque string identifier.
///
/// Each identifier is a distinct type so a SKU can never be passed where a
/// user or order identifier is expected.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates the identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the identifier is the empty string.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of the user owning a cart and an order history.
    ///
    /// The core only ever sees an already-resolved user id, never the
    /// session token it was looked up from.
    UserId
);

string_id!(
    /// Stock keeping unit: the stable, unique identifier of a purchasable item.
    Sku
);

string_id!(
    /// Opaque, unguessable order identifier (`order-<base64url>`).
    ///
    /// Also used as the payment idempotency key.
    OrderId
);
