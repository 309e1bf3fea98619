//! Newtype IDs for type-safe entity references.
//!
//! Local users and remote cafes are both keyed by integers; wrapping them keeps
//! a user id from ever being sent to the catalog API as a cafe id.

/// Define an `i32`-backed ID wrapper.
///
/// The generated type is `Copy`, serializes transparently (so it works with
/// axum's `Path` extractor and session storage) and converts to and from `i32`.
///
/// ```rust
/// # use cafe_catalog_core::define_id;
/// define_id!(TableId);
///
/// let id = TableId::new(4);
/// assert_eq!(id.as_i32(), 4);
/// assert_eq!(id.to_string(), "4");
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
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw id.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// The raw id.
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
    };
}

define_id!(UserId);
define_id!(CafeId);
