// src/image_processing.rs

use image::ImageFormat;
use std::io::Cursor;

use crate::errors::AppError;

/// Image bytes after re-encoding, with the MIME type of their format.
#[derive(Debug)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

/// Decodes the upload and encodes it again in its own format, off the async runtime.
pub async fn reencode(bytes: Vec<u8>) -> Result<EncodedImage, AppError> {
    tokio::task::spawn_blocking(move || reencode_blocking(&bytes))
        .await
        .map_err(|e| AppError::InternalServerError(format!("Re-encoding task failed: {}", e)))?
}

fn reencode_blocking(bytes: &[u8]) -> Result<EncodedImage, AppError> {
    let format = image::guess_format(bytes).map_err(|e| {
        tracing::warn!("Upload is not a recognised image: {}", e);
        AppError::UnprocessableEntity("Unsupported image format".to_string())
    })?;
    if !matches!(
        format,
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP
    ) {
        return Err(AppError::UnprocessableEntity(format!(
            "Unsupported image format: {:?}",
            format
        )));
    }

    let decoded = image::load_from_memory_with_format(bytes, format).map_err(|e| {
        tracing::warn!("Could not decode {:?} upload: {}", format, e);
        AppError::UnprocessableEntity("Image could not be decoded".to_string())
    })?;

    let mut out = Cursor::new(Vec::with_capacity(bytes.len()));
    decoded.write_to(&mut out, format).map_err(|e| {
        tracing::error!("Could not re-encode {:?} image: {}", format, e);
        AppError::UnprocessableEntity("Image could not be re-encoded".to_string())
    })?;

    Ok(EncodedImage {
        bytes: out.into_inner(),
        mime_type: format.to_mime_type(),
    })
}

#[cfg(test)]
pub(crate) fn sample_png() -> Vec<u8> {
    let pixels = image::RgbImage::from_pixel(4, 3, image::Rgb([200, 40, 90]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(pixels)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    #[tokio::test]
    async fn png_is_reencoded_as_png() {
        let encoded = reencode(sample_png()).await.unwrap();
        assert_eq!(encoded.mime_type, "image/png");

        let decoded = image::load_from_memory(&encoded.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.to_rgb8().get_pixel(0, 0), &image::Rgb([200, 40, 90]));
    }

    #[tokio::test]
    async fn garbage_is_rejected() {
        let result = reencode(b"definitely not an image".to_vec()).await;
        assert!(matches!(result, Err(AppError::UnprocessableEntity(_))));
    }

    #[tokio::test]
    async fn truncated_png_is_rejected() {
        let mut bytes = sample_png();
        bytes.truncate(20);
        let result = reencode(bytes).await;
        assert!(matches!(result, Err(AppError::UnprocessableEntity(_))));
    }
}
