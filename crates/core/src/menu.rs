//! Menu create/update/delete inputs and image uploads.
//!
//! Each mutation has a raw input type (what the user typed) and a validated
//! wire body. Validation happens entirely here so the storefront client only
//! ever sends bodies that passed the same checks the service enforces.

use serde::Serialize;

use crate::types::{Email, MenuId, Price};
use crate::validation::{ValidationError, require};

/// Where a new menu item's image comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageSource {
    /// No image.
    #[default]
    None,
    /// An image already hosted somewhere.
    Url(String),
    /// A local file that must be uploaded first.
    Upload(ImageUpload),
}

/// An image file waiting to be uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name, kept for the multipart part.
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Largest accepted upload, in MiB.
    pub const MAX_MIB: usize = 5;
    /// Largest accepted upload, in bytes.
    pub const MAX_BYTES: usize = Self::MAX_MIB * 1024 * 1024;

    /// Check the file before any bytes leave the machine.
    ///
    /// # Errors
    ///
    /// Returns `EmptyImage`, `NotAnImage`, or `ImageTooLarge`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bytes.is_empty() {
            return Err(ValidationError::EmptyImage);
        }
        if !self.content_type.starts_with("image/") {
            return Err(ValidationError::NotAnImage {
                content_type: self.content_type.clone(),
            });
        }
        if self.bytes.len() > Self::MAX_BYTES {
            return Err(ValidationError::ImageTooLarge {
                max_mib: Self::MAX_MIB,
            });
        }
        Ok(())
    }
}

/// Raw input for creating a menu item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuDraft {
    /// Proposer's email, recorded as the item's owner.
    pub email: String,
    /// Category label.
    pub category: String,
    /// Item name.
    pub name: String,
    /// Price as typed.
    pub price: String,
    /// Image to attach.
    pub image: ImageSource,
}

/// A draft that passed validation. The image is resolved separately because
/// an upload has to finish before the create request can be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMenu {
    /// Owner email.
    pub email: Email,
    /// Trimmed category.
    pub category: String,
    /// Trimmed name.
    pub name: String,
    /// Price within the menu range.
    pub price: Price,
    /// Image still to resolve.
    pub image: ImageSource,
}

/// Body of `POST /menu`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateMenuBody {
    /// Owner email.
    pub email: Email,
    /// Category label.
    pub category: String,
    /// Item name.
    #[serde(rename = "menuName")]
    pub menu_name: String,
    /// Price in won.
    pub price: Price,
    /// Image location; empty when there is none.
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

impl MenuDraft {
    /// Validate the draft.
    ///
    /// Checks email, category, name, price, then the image file (if any), and
    /// stops at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for the first invalid field.
    pub fn validate(&self) -> Result<NewMenu, ValidationError> {
        let email = Email::parse(require("email", &self.email)?)?;
        let category = require("category", &self.category)?.to_owned();
        let name = require("name", &self.name)?.to_owned();
        let price = Price::parse_menu_price(&self.price)?;
        let image = match &self.image {
            ImageSource::Upload(upload) => {
                upload.validate()?;
                self.image.clone()
            }
            ImageSource::Url(url) if url.trim().is_empty() => ImageSource::None,
            ImageSource::Url(url) => ImageSource::Url(url.trim().to_owned()),
            ImageSource::None => ImageSource::None,
        };

        Ok(NewMenu {
            email,
            category,
            name,
            price,
            image,
        })
    }
}

impl NewMenu {
    /// Build the create body with the image location resolved.
    #[must_use]
    pub fn into_body(self, image_url: Option<String>) -> CreateMenuBody {
        CreateMenuBody {
            email: self.email,
            category: self.category,
            menu_name: self.name,
            price: self.price,
            image_url: image_url.unwrap_or_default(),
        }
    }
}

/// Raw input for updating a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEdit {
    /// Item to update.
    pub id: MenuId,
    /// Must match the creator's email on the server.
    pub email: String,
    /// New category.
    pub category: String,
    /// New name.
    pub name: String,
    /// New price as typed.
    pub price: String,
    /// New image location. `None` is sent as an empty string, which the
    /// service stores as is and so clears the item's image.
    pub image_url: Option<String>,
}

/// Body of `PUT /menu/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateMenuBody {
    /// Ownership token.
    pub email: Email,
    /// Category label.
    pub category: String,
    /// Item name.
    pub menu_name: String,
    /// Price in won.
    pub price: Price,
    /// Image location, sent verbatim. An empty string clears the image.
    pub image: String,
}

impl MenuEdit {
    /// Validate the edit.
    ///
    /// Only the email and the price are checked; the service keeps whatever
    /// category and name it is sent.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for the first invalid field.
    pub fn validate(&self) -> Result<UpdateMenuBody, ValidationError> {
        let email = Email::parse(require("email", &self.email)?)?;
        let category = self.category.trim().to_owned();
        let menu_name = self.name.trim().to_owned();
        let price = Price::parse_menu_price(&self.price)?;
        let image = self
            .image_url
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_owned();

        Ok(UpdateMenuBody {
            email,
            category,
            menu_name,
            price,
            image,
        })
    }
}

/// Raw input for deleting a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRemoval {
    /// Item to delete.
    pub id: MenuId,
    /// Must match the creator's email on the server.
    pub email: String,
}

/// Body of `DELETE /menu/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteMenuBody {
    /// Ownership token.
    pub email: Email,
}

impl MenuRemoval {
    /// Validate the removal.
    ///
    /// # Errors
    ///
    /// Returns `MissingField("email")` or `InvalidEmail`.
    pub fn validate(&self) -> Result<DeleteMenuBody, ValidationError> {
        let email = Email::parse(require("email", &self.email)?)?;
        Ok(DeleteMenuBody { email })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::PriceError;

    fn draft() -> MenuDraft {
        MenuDraft {
            email: "roaster@example.com".to_string(),
            category: "Beans".to_string(),
            name: " Ethiopia Sidamo ".to_string(),
            price: "10000".to_string(),
            image: ImageSource::None,
        }
    }

    fn png(len: usize) -> ImageUpload {
        ImageUpload {
            file_name: "bag.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0; len],
        }
    }

    #[test]
    fn test_draft_validates_in_field_order() {
        let mut input = draft();
        input.email = String::new();
        input.price = "x".to_string();
        assert_eq!(
            input.validate(),
            Err(ValidationError::MissingField("email"))
        );

        let mut input = draft();
        input.category = " ".to_string();
        assert_eq!(
            input.validate(),
            Err(ValidationError::MissingField("category"))
        );
    }

    #[test]
    fn test_draft_price_ceiling_is_inclusive() {
        let mut input = draft();
        input.price = "10000000".to_string();
        assert_eq!(input.validate().unwrap().price, Price::new(10_000_000));

        input.price = "10000001".to_string();
        assert_eq!(
            input.validate(),
            Err(ValidationError::InvalidPrice(PriceError::OutOfRange {
                max: 10_000_000
            }))
        );
    }

    #[test]
    fn test_create_body_wire_shape() {
        let body = draft()
            .validate()
            .unwrap()
            .into_body(Some("http://img/1.png".to_string()));
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "email": "roaster@example.com",
                "category": "Beans",
                "menuName": "Ethiopia Sidamo",
                "price": 10000,
                "imageURL": "http://img/1.png"
            })
        );
    }

    #[test]
    fn test_blank_image_url_becomes_none() {
        let mut input = draft();
        input.image = ImageSource::Url("  ".to_string());
        assert_eq!(input.validate().unwrap().image, ImageSource::None);
    }

    #[test]
    fn test_image_upload_rules() {
        assert_eq!(png(0).validate(), Err(ValidationError::EmptyImage));
        assert!(png(ImageUpload::MAX_BYTES).validate().is_ok());
        assert_eq!(
            png(ImageUpload::MAX_BYTES + 1).validate(),
            Err(ValidationError::ImageTooLarge { max_mib: 5 })
        );

        let mut text = png(10);
        text.content_type = "text/plain".to_string();
        assert!(matches!(
            text.validate(),
            Err(ValidationError::NotAnImage { .. })
        ));
    }

    #[test]
    fn test_draft_rejects_bad_upload() {
        let mut input = draft();
        input.image = ImageSource::Upload(png(0));
        assert_eq!(input.validate(), Err(ValidationError::EmptyImage));
    }

    #[test]
    fn test_edit_body_wire_shape() {
        let edit = MenuEdit {
            id: MenuId::new(4),
            email: "roaster@example.com".to_string(),
            category: "Beans".to_string(),
            name: "Sidamo".to_string(),
            price: "12000".to_string(),
            image_url: None,
        };
        assert_eq!(
            serde_json::to_value(edit.validate().unwrap()).unwrap(),
            serde_json::json!({
                "email": "roaster@example.com",
                "category": "Beans",
                "menu_name": "Sidamo",
                "price": 12000,
                "image": ""
            })
        );
    }

    #[test]
    fn test_edit_rejects_bad_email() {
        let edit = MenuEdit {
            id: MenuId::new(4),
            email: "roaster".to_string(),
            category: "Beans".to_string(),
            name: "Sidamo".to_string(),
            price: "12000".to_string(),
            image_url: None,
        };
        assert!(matches!(
            edit.validate(),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_edit_checks_only_email_and_price() {
        let edit = MenuEdit {
            id: MenuId::new(4),
            email: "roaster@example.com".to_string(),
            category: String::new(),
            name: " ".to_string(),
            price: "-1".to_string(),
            image_url: Some(" http://img/4.png ".to_string()),
        };
        assert!(matches!(
            edit.validate(),
            Err(ValidationError::InvalidPrice(_))
        ));

        let edit = MenuEdit {
            price: "0".to_string(),
            ..edit
        };
        let body = edit.validate().unwrap();
        assert_eq!(body.menu_name, "");
        assert_eq!(body.image, "http://img/4.png");
    }

    #[test]
    fn test_removal_requires_email() {
        let removal = MenuRemoval {
            id: MenuId::new(4),
            email: String::new(),
        };
        assert_eq!(
            removal.validate(),
            Err(ValidationError::MissingField("email"))
        );
    }
}
