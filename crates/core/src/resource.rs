//! The kinds of store-scoped data an owner manages.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A manageable resource kind.
///
/// Drives URL paths, notice wording and the "still referenced" message
/// shown when a delete is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Store,
    Billboard,
    Category,
    Size,
    Color,
    Product,
    Order,
}

impl Resource {
    /// Store-nested kinds, in dashboard navigation order.
    pub const NESTED: [Self; 6] = [
        Self::Billboard,
        Self::Category,
        Self::Size,
        Self::Color,
        Self::Product,
        Self::Order,
    ];

    /// URL segment, e.g. `billboards` in `/api/{storeId}/billboards`.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Store => "stores",
            Self::Billboard => "billboards",
            Self::Category => "categories",
            Self::Size => "sizes",
            Self::Color => "colors",
            Self::Product => "products",
            Self::Order => "orders",
        }
    }

    /// Lowercase singular noun.
    #[must_use]
    pub const fn singular(self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Billboard => "billboard",
            Self::Category => "category",
            Self::Size => "size",
            Self::Color => "color",
            Self::Product => "product",
            Self::Order => "order",
        }
    }

    /// Capitalized singular noun for headings and notices.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Store => "Store",
            Self::Billboard => "Billboard",
            Self::Category => "Category",
            Self::Size => "Size",
            Self::Color => "Color",
            Self::Product => "Product",
            Self::Order => "Order",
        }
    }

    /// Capitalized plural for list headings.
    #[must_use]
    pub const fn plural_title(self) -> &'static str {
        match self {
            Self::Store => "Stores",
            Self::Billboard => "Billboards",
            Self::Category => "Categories",
            Self::Size => "Sizes",
            Self::Color => "Colors",
            Self::Product => "Products",
            Self::Order => "Orders",
        }
    }

    /// What has to be removed before a row of this kind can be deleted.
    #[must_use]
    pub const fn dependents(self) -> Option<&'static str> {
        match self {
            Self::Store => Some("products and categories"),
            Self::Billboard => Some("categories"),
            Self::Category | Self::Size | Self::Color => Some("products"),
            Self::Product => Some("orders"),
            Self::Order => None,
        }
    }

    /// Message shown when a delete is refused because dependents remain.
    #[must_use]
    pub fn still_referenced_message(self) -> String {
        match (self, self.dependents()) {
            (Self::Store, Some(deps)) => format!("Make sure you removed all {deps} first."),
            (_, Some(deps)) => format!(
                "Make sure you removed all {deps} using this {} first.",
                self.singular()
            ),
            (_, None) => format!("This {} is still in use.", self.singular()),
        }
    }

    /// Look up a store-nested kind by its URL segment.
    #[must_use]
    pub fn from_path(segment: &str) -> Option<Self> {
        Self::NESTED.into_iter().find(|r| r.path() == segment)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_round_trips_nested_kinds() {
        for kind in Resource::NESTED {
            assert_eq!(Resource::from_path(kind.path()), Some(kind));
        }
        assert_eq!(Resource::from_path("stores"), None);
        assert_eq!(Resource::from_path("settings"), None);
    }

    #[test]
    fn test_still_referenced_messages() {
        assert_eq!(
            Resource::Billboard.still_referenced_message(),
            "Make sure you removed all categories using this billboard first."
        );
        assert_eq!(
            Resource::Size.still_referenced_message(),
            "Make sure you removed all products using this size first."
        );
        assert_eq!(
            Resource::Store.still_referenced_message(),
            "Make sure you removed all products and categories first."
        );
        assert_eq!(
            Resource::Order.still_referenced_message(),
            "This order is still in use."
        );
    }
}
