//! Menu listing and management commands.

use std::path::Path;

use beanstall_core::{ImageSource, ImageUpload, MenuDraft, MenuEdit, MenuId, MenuRemoval};
use beanstall_storefront::services::{
    self,
    menu::{CatalogSync, MutationOutcome},
};
use beanstall_storefront::{ApiClient, Session};

use super::CliError;

/// Fields shared by create and update.
pub struct Fields {
    pub email: String,
    pub category: String,
    pub name: String,
    pub price: String,
}

/// Print every item on sale.
#[allow(clippy::print_stdout)]
pub async fn list(client: &ApiClient) -> Result<(), CliError> {
    let mut session = Session::new();
    services::catalog::refresh(client, &mut session).await?;

    if session.catalog().is_empty() {
        println!("The menu is empty.");
        return Ok(());
    }
    for item in session.catalog() {
        println!(
            "{:>4}  {:<12} {:<28} {:>12}",
            item.id,
            item.category.as_deref().unwrap_or("-"),
            item.name,
            item.price.to_string()
        );
    }
    Ok(())
}

/// Create an item, uploading `image_file` first if given.
pub async fn create(
    client: &ApiClient,
    fields: Fields,
    image_url: Option<String>,
    image_file: Option<&Path>,
) -> Result<(), CliError> {
    let image = match (image_file, image_url) {
        (Some(path), _) => ImageSource::Upload(read_image(path)?),
        (None, Some(url)) => ImageSource::Url(url),
        (None, None) => ImageSource::None,
    };
    let draft = MenuDraft {
        email: fields.email,
        category: fields.category,
        name: fields.name,
        price: fields.price,
        image,
    };

    let mut session = Session::new();
    let outcome = services::menu::create(client, &mut session, &draft).await?;
    report(&outcome);
    Ok(())
}

/// Update an item owned by `fields.email`.
pub async fn update(
    client: &ApiClient,
    id: MenuId,
    fields: Fields,
    image_url: Option<String>,
) -> Result<(), CliError> {
    let edit = MenuEdit {
        id,
        email: fields.email,
        category: fields.category,
        name: fields.name,
        price: fields.price,
        image_url,
    };

    let mut session = Session::new();
    let outcome = services::menu::update(client, &mut session, &edit).await?;
    report(&outcome);
    Ok(())
}

/// Delete an item owned by `email`.
pub async fn delete(client: &ApiClient, id: MenuId, email: String) -> Result<(), CliError> {
    let removal = MenuRemoval { id, email };

    let mut session = Session::new();
    let outcome = services::menu::delete(client, &mut session, &removal).await?;
    report(&outcome);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn report(outcome: &MutationOutcome) {
    println!("{}", outcome.message);
    if outcome.catalog == CatalogSync::Stale {
        tracing::warn!("The change went through but the menu could not be reloaded");
    }
}

fn read_image(path: &Path) -> Result<ImageUpload, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::ReadImage {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_owned(), |name| name.to_string_lossy().into_owned());

    Ok(ImageUpload {
        content_type: content_type_for(path).to_owned(),
        file_name,
        bytes,
    })
}

/// MIME type from the file extension. Unknown extensions are rejected later
/// by upload validation.
fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(Path::new("a/b.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(
            content_type_for(Path::new("notes.txt")),
            "application/octet-stream"
        );
        assert_eq!(content_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_read_image_missing_file() {
        let err = read_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, CliError::ReadImage { .. }));
    }
}
