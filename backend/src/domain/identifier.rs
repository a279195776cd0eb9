//! UUID-backed identifier newtypes.

/// Declare a UUID newtype serialised as its hyphenated string form.
macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Parse an identifier from its string form.
            pub fn parse(raw: &str) -> Result<Self, $crate::domain::IdentifierError> {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err($crate::domain::IdentifierError::Empty);
                }
                ::uuid::Uuid::parse_str(trimmed)
                    .map(Self)
                    .map_err(|_| $crate::domain::IdentifierError::Malformed)
            }

            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

pub(crate) use uuid_identifier;

/// Rejections raised when parsing an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// No identifier was supplied.
    #[error("identifier must not be empty")]
    Empty,
    /// The value is not a UUID.
    #[error("identifier must be a valid UUID")]
    Malformed,
}
