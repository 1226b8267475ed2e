//! Newtype IDs for type-safe entity references.
//!
//! Every catalog row is keyed by a UUID. The `define_id!` macro wraps it in a
//! distinct type per entity so a `SizeId` can never be passed where a
//! `ColorId` is expected.

use uuid::Uuid;

/// Macro to define a type-safe UUID wrapper.
///
/// Creates a newtype wrapper around [`Uuid`] with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - `generate()`, `from_uuid()`, `as_uuid()` and `FromStr`
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use storeadmin_core::define_id;
/// define_id!(ShelfId);
/// define_id!(AisleId);
///
/// let shelf = ShelfId::generate();
/// let parsed: ShelfId = shelf.to_string().parse().unwrap();
/// assert_eq!(shelf, parsed);
///
/// // These are different types, so this won't compile:
/// // let _: AisleId = shelf;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Generate a fresh random (v4) identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Get the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> ::uuid::Uuid {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                ::uuid::Uuid::parse_str(s.trim()).map(Self)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(id: ::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <::uuid::Uuid as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <::uuid::Uuid as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <::uuid::Uuid as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <::uuid::Uuid as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(OwnerId);
define_id!(StoreId);
define_id!(BillboardId);
define_id!(CategoryId);
define_id!(SizeId);
define_id!(ColorId);
define_id!(ProductId);
define_id!(ImageId);
define_id!(OrderId);
define_id!(OrderItemId);

/// Parse an identifier typed into a form field.
///
/// Blank input counts as missing, so callers can report "is required"
/// rather than "is not a valid id".
///
/// # Errors
///
/// Returns `Err(None)` for blank input and `Err(Some(_))` for malformed input.
pub fn parse_optional_id<T>(raw: &str) -> Result<T, Option<uuid::Error>>
where
    T: From<Uuid>,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(None);
    }
    Uuid::parse_str(trimmed).map(T::from).map_err(Some)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_bare_uuid() {
        let raw = Uuid::new_v4();
        let id = StoreId::from_uuid(raw);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{raw}\""));
    }

    #[test]
    fn test_from_str_trims_whitespace() {
        let raw = Uuid::new_v4();
        let parsed: SizeId = format!("  {raw} ").parse().unwrap();
        assert_eq!(parsed.as_uuid(), raw);
    }

    #[test]
    fn test_generate_is_unique() {
        assert_ne!(ProductId::generate(), ProductId::generate());
    }

    #[test]
    fn test_parse_optional_id_blank_is_missing() {
        let result: Result<ColorId, _> = parse_optional_id("   ");
        assert!(matches!(result, Err(None)));
    }

    #[test]
    fn test_parse_optional_id_malformed() {
        let result: Result<ColorId, _> = parse_optional_id("not-a-uuid");
        assert!(matches!(result, Err(Some(_))));
    }
}
