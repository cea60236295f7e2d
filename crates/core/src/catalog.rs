//! Menu items as the storefront sees them.

use serde::{Deserialize, Serialize};

use crate::types::{MenuId, Price};

/// A purchasable menu item.
///
/// Items are immutable once fetched. A refresh replaces the whole
/// [`Catalog`] rather than editing items in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Server-assigned identifier.
    pub id: MenuId,
    /// Display name.
    pub name: String,
    /// Category label, if the item has one.
    pub category: Option<String>,
    /// Unit price.
    pub price: Price,
    /// Product image location, if any.
    pub image_url: Option<String>,
}

/// The ordered list of items currently on sale.
///
/// Order is the server's order and is stable between refreshes, so anything
/// derived by walking the catalog (cart selection, totals) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Create a catalog from items in display order.
    #[must_use]
    pub const fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: MenuId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns `true` if the catalog has an item with this id.
    #[must_use]
    pub fn contains(&self, id: MenuId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate items in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, CatalogItem> {
        self.items.iter()
    }

    /// Number of items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the catalog has no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop one item locally, returning it if it was present.
    pub fn remove(&mut self, id: MenuId) -> Option<CatalogItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogItem;
    type IntoIter = std::slice::Iter<'a, CatalogItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl From<Vec<CatalogItem>> for Catalog {
    fn from(items: Vec<CatalogItem>) -> Self {
        Self::new(items)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build an item with just an id, name and price.
    pub(crate) fn item(id: i64, name: &str, price: u32) -> CatalogItem {
        CatalogItem {
            id: MenuId::new(id),
            name: name.to_string(),
            category: None,
            price: Price::new(price),
            image_url: None,
        }
    }

    #[test]
    fn test_get_and_contains() {
        let catalog = Catalog::new(vec![item(1, "Narino", 15860), item(2, "Sidamo", 10000)]);
        assert_eq!(catalog.get(MenuId::new(2)).map(|i| i.name.as_str()), Some("Sidamo"));
        assert!(!catalog.contains(MenuId::new(3)));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut catalog = Catalog::new(vec![item(1, "a", 1), item(2, "b", 2), item(3, "c", 3)]);
        let removed = catalog.remove(MenuId::new(2));
        assert_eq!(removed.map(|i| i.id), Some(MenuId::new(2)));
        let ids: Vec<i64> = catalog.iter().map(|i| i.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(catalog.remove(MenuId::new(2)).is_none());
    }
}
