/// Uploaded image storage
///
/// Images land beneath the media root under a per-kind prefix, named
/// `<slug>-<uuid4><ext>` so concurrent uploads with the same name never
/// collide. The slug comes from the owning entity (username for profile
/// images, post title for post images); the original extension is kept.
use crate::config::MediaConfig;
use crate::error::AppError;
use actix_multipart::Field;
use futures_util::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

pub const PROFILE_IMAGE_PREFIX: &str = "uploads/profile_images";
pub const POST_IMAGE_PREFIX: &str = "uploads/posts_images";

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Lowercase ASCII slug: alphanumerics kept, everything else collapsed to
/// single hyphens, no leading or trailing hyphen.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

fn extension_of(filename: &str) -> Result<String, AppError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| AppError::Validation("Image file has no extension.".to_string()))?;

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(AppError::Validation(format!(
            "Unsupported image extension '.{ext}'. Allowed: jpg, jpeg, png, gif, webp."
        )))
    }
}

/// Relative storage path for an uploaded image.
pub fn image_path(prefix: &str, stem: &str, filename: &str) -> Result<String, AppError> {
    let ext = extension_of(filename)?;
    let slug = slugify(stem);
    let slug = if slug.is_empty() { "image" } else { &slug };

    Ok(format!("{prefix}/{slug}-{}.{ext}", Uuid::new_v4()))
}

/// Stream one multipart field to disk under the media root, enforcing the
/// size cap as bytes arrive. Returns the relative path to store.
pub async fn store_image(
    config: &MediaConfig,
    prefix: &str,
    stem: &str,
    field: &mut Field,
) -> Result<String, AppError> {
    let filename = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(|name| name.to_string())
        .ok_or_else(|| AppError::Validation("Image filename is required.".to_string()))?;

    if let Some(content_type) = field.content_type() {
        if content_type.type_() != mime::IMAGE {
            return Err(AppError::Validation(
                "Uploaded file is not an image.".to_string(),
            ));
        }
    }

    let relative = image_path(prefix, stem, &filename)?;
    let absolute = Path::new(&config.root).join(&relative);

    if let Some(parent) = absolute.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create media directory: {e}")))?;
    }

    let mut file = tokio::fs::File::create(&absolute)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create media file: {e}")))?;

    let mut written: usize = 0;
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(format!("Upload aborted: {e}")))?;
        written += chunk.len();
        if written > config.max_upload_bytes {
            drop(file);
            let _ = tokio::fs::remove_file(&absolute).await;
            return Err(AppError::Validation(
                "Image exceeds the upload size limit.".to_string(),
            ));
        }
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write media file: {e}")))?;
    }

    file.flush()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to flush media file: {e}")))?;

    Ok(relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_and_lowercases() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  multiple   spaces  "), "multiple-spaces");
        assert_eq!(slugify("Ünïcode stripped"), "ncode-stripped");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn image_path_keeps_prefix_slug_and_extension() {
        let path = image_path(PROFILE_IMAGE_PREFIX, "Some User", "avatar.PNG").unwrap();
        assert!(path.starts_with("uploads/profile_images/some-user-"));
        assert!(path.ends_with(".png"));
    }

    #[test]
    fn image_path_falls_back_when_slug_is_empty() {
        let path = image_path(POST_IMAGE_PREFIX, "!!!", "photo.jpg").unwrap();
        assert!(path.starts_with("uploads/posts_images/image-"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = image_path(POST_IMAGE_PREFIX, "title", "payload.exe").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(image_path(POST_IMAGE_PREFIX, "title", "noext").is_err());
    }

    #[test]
    fn distinct_uploads_get_distinct_paths() {
        let a = image_path(POST_IMAGE_PREFIX, "same title", "a.jpg").unwrap();
        let b = image_path(POST_IMAGE_PREFIX, "same title", "a.jpg").unwrap();
        assert_ne!(a, b);
    }
}
