//! Response shapes of the menu/order service and their normalization.
//!
//! The menu listing has gone through several shapes (`snake_case` from the
//! proxy, `camelCase` from the backend DTOs, a bare `id`/`name` product
//! list, and the backend's `{ "data": [...] }` envelope). Everything is
//! funnelled into [`CatalogItem`] here so the rest of the crate sees one
//! representation.

use beanstall_core::{CatalogItem, MenuId, Price};
use serde::Deserialize;
use serde_json::Value;

/// `GET /menu` body: a bare array or an enveloped one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum MenuListing {
    Bare(Vec<Value>),
    Enveloped { data: Vec<Value> },
}

impl MenuListing {
    pub(crate) fn into_entries(self) -> Vec<Value> {
        match self {
            Self::Bare(entries) | Self::Enveloped { data: entries } => entries,
        }
    }
}

/// One entry of the menu listing, in any of its known spellings.
///
/// Each spelling is its own field so an entry carrying several of them (a
/// proxy that adds `id` next to `menu_id`) still parses; the first present
/// spelling wins, in declaration order.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MenuEntry {
    menu_id: Option<RawId>,
    #[serde(rename = "menuId")]
    menu_id_camel: Option<RawId>,
    id: Option<RawId>,
    menu_name: Option<String>,
    #[serde(rename = "menuName")]
    menu_name_camel: Option<String>,
    name: Option<String>,
    category: Option<String>,
    price: Option<i64>,
    #[serde(rename = "menuPrice")]
    menu_price: Option<i64>,
    img_url: Option<String>,
    #[serde(rename = "imgUrl")]
    img_url_camel: Option<String>,
    #[serde(rename = "imageUrl")]
    image_url: Option<String>,
    #[serde(rename = "imageURL")]
    image_url_upper: Option<String>,
}

/// Ids arrive as numbers from the backend and as strings from older proxies.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl TryFrom<MenuEntry> for CatalogItem {
    type Error = String;

    fn try_from(entry: MenuEntry) -> Result<Self, Self::Error> {
        let id = match entry
            .menu_id
            .or(entry.menu_id_camel)
            .or(entry.id)
            .ok_or("menu entry has no id")?
        {
            RawId::Number(n) => MenuId::new(n),
            RawId::Text(s) => s
                .parse::<MenuId>()
                .map_err(|_| format!("menu id '{s}' is not numeric"))?,
        };
        let name = entry
            .menu_name
            .or(entry.menu_name_camel)
            .or(entry.name)
            .ok_or_else(|| format!("menu {id} has no name"))?;
        let raw_price = entry
            .price
            .or(entry.menu_price)
            .ok_or_else(|| format!("menu {id} has no price"))?;
        let price = u32::try_from(raw_price)
            .map(Price::new)
            .map_err(|_| format!("menu {id} has invalid price {raw_price}"))?;
        let image_url = entry
            .img_url
            .or(entry.img_url_camel)
            .or(entry.image_url)
            .or(entry.image_url_upper);

        Ok(Self {
            id,
            name,
            category: non_blank(entry.category),
            price,
            image_url: non_blank(image_url),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Normalize one listing entry, or explain why it was dropped.
pub(crate) fn normalize_entry(entry: Value) -> Result<CatalogItem, String> {
    let entry: MenuEntry = serde_json::from_value(entry).map_err(|e| e.to_string())?;
    CatalogItem::try_from(entry)
}

/// `POST /upload/image` success body.
#[derive(Debug, Deserialize)]
pub(crate) struct UploadReply {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snake_case_entry() {
        let item = normalize_entry(json!({
            "menu_id": 3,
            "category": "Beans",
            "menu_name": "Columbia Quintio",
            "price": 10420,
            "img_url": "http://localhost:8080/uploads/a.png"
        }))
        .unwrap();

        assert_eq!(item.id, MenuId::new(3));
        assert_eq!(item.name, "Columbia Quintio");
        assert_eq!(item.category.as_deref(), Some("Beans"));
        assert_eq!(item.price, Price::new(10420));
        assert_eq!(
            item.image_url.as_deref(),
            Some("http://localhost:8080/uploads/a.png")
        );
    }

    #[test]
    fn test_camel_case_entry() {
        let item = normalize_entry(json!({
            "menuId": 1,
            "menuName": "Narino",
            "menuPrice": 15860,
            "imgUrl": ""
        }))
        .unwrap();

        assert_eq!(item.id, MenuId::new(1));
        assert_eq!(item.price, Price::new(15860));
        assert_eq!(item.category, None);
        assert_eq!(item.image_url, None);
    }

    #[test]
    fn test_string_id_product_entry() {
        let item = normalize_entry(json!({
            "id": "4",
            "name": "Ethiopia Sidamo",
            "price": 10000
        }))
        .unwrap();
        assert_eq!(item.id, MenuId::new(4));
    }

    #[test]
    fn test_rejects_bad_entries() {
        assert!(normalize_entry(json!({"id": "x", "name": "n", "price": 1})).is_err());
        assert!(normalize_entry(json!({"id": 1, "name": "n", "price": -5})).is_err());
        assert!(normalize_entry(json!({"id": 1, "price": 5})).is_err());
    }

    #[test]
    fn test_duplicate_spellings_take_the_first() {
        let item = normalize_entry(json!({
            "menu_id": 5,
            "menuId": 99,
            "id": "100",
            "menu_name": "Kenya AA",
            "name": "ignored",
            "price": 9000,
            "menuPrice": 1,
            "img_url": "",
            "imageUrl": "http://img/kenya.png"
        }))
        .unwrap();

        assert_eq!(item.id, MenuId::new(5));
        assert_eq!(item.name, "Kenya AA");
        assert_eq!(item.price, Price::new(9000));
        // A blank first spelling still wins over a later one.
        assert_eq!(item.image_url, None);
    }

    #[test]
    fn test_null_fields_count_as_missing() {
        let item = normalize_entry(json!({
            "menu_id": null,
            "menuId": 2,
            "menuName": "Brazil",
            "price": 6000,
            "category": null
        }))
        .unwrap();
        assert_eq!(item.id, MenuId::new(2));
        assert_eq!(item.category, None);
    }

    #[test]
    fn test_listing_shapes() {
        let bare: MenuListing = serde_json::from_value(json!([{"id": 1}])).unwrap();
        assert_eq!(bare.into_entries().len(), 1);

        let wrapped: MenuListing =
            serde_json::from_value(json!({"resultCode": "200-1", "data": [{}, {}]})).unwrap();
        assert_eq!(wrapped.into_entries().len(), 2);
    }
}
