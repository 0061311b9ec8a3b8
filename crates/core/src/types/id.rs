//! Newtype IDs for type-safe entity references.
//!
//! Two macros cover the two ID families in the system:
//!
//! - [`define_id!`] wraps `i32` for locally-owned entities (vendors,
//!   purchase orders) whose rows are created by this backend.
//! - [`define_catalog_id!`] wraps `String` for Square-sourced objects
//!   (merchants, items, variations, locations) whose identifiers are opaque
//!   tokens minted by Square and mirrored locally by the sync layer.
//!
//! Mixing the two families, or two IDs within a family, is a compile error.

/// Macro to define a type-safe ID wrapper around `i32`.
///
/// Creates a newtype wrapper with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use restock_core::define_id;
/// define_id!(VendorId);
/// define_id!(PurchaseOrderId);
///
/// let vendor_id = VendorId::new(1);
/// let po_id = PurchaseOrderId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: VendorId = po_id;
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
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

/// Macro to define a type-safe ID wrapper around `String`.
///
/// Used for Square catalog object identifiers, which are opaque strings.
/// Provides the same trait surface as [`define_id!`] plus `as_str()` and
/// `From<&str>`.
#[macro_export]
macro_rules! define_catalog_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub const fn new(id: String) -> Self {
                Self(id)
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <String as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <String as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

// Locally-owned entities
define_id!(VendorId);
define_id!(PurchaseOrderId);
define_id!(PurchaseOrderItemId);

// Square-sourced catalog objects
define_catalog_id!(MerchantId);
define_catalog_id!(ItemId);
define_catalog_id!(VariationId);
define_catalog_id!(LocationId);

impl VendorId {
    /// Sentinel id for the synthetic "unassigned items" dashboard bucket.
    ///
    /// Never collides with a real vendor: `ops.vendors.id` is a positive
    /// serial column.
    pub const UNASSIGNED: Self = Self(-1);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_id_roundtrip() {
        let id = VendorId::new(42);
        assert_eq!(id.as_i32(), 42);
        assert_eq!(i32::from(id), 42);
        assert_eq!(VendorId::from(42), id);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_catalog_id_roundtrip() {
        let id = VariationId::from("SQ_VAR_ABC123");
        assert_eq!(id.as_str(), "SQ_VAR_ABC123");
        assert_eq!(id.to_string(), "SQ_VAR_ABC123");
        assert_eq!(String::from(id), "SQ_VAR_ABC123");
    }

    #[test]
    fn test_serde_transparent() {
        let id = VendorId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");

        let merchant: MerchantId = serde_json::from_str("\"M123\"").unwrap();
        assert_eq!(merchant.as_str(), "M123");
    }

    #[test]
    fn test_unassigned_sentinel_is_negative() {
        assert!(VendorId::UNASSIGNED.as_i32() < 0);
    }
}
