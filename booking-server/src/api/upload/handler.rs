//! Image upload handler
//!
//! Accepts PNG, JPEG and WebP, re-encodes everything to bounded JPEG.

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use axum::extract::{Multipart, State};
use image::DynamicImage;
use serde::Serialize;
use uuid::Uuid;

use crate::api::{ApiResponse, AppResult};
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::utils::{AppError, ErrorCode};

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for catalog images
const JPEG_QUALITY: u8 = 80;

/// Stored images are capped at this width; taller aspect ratios scale down
const MAX_WIDTH: u32 = 800;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_id: String,
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub url: String,
}

/// Validate size, extension and decodability
fn validate_image(data: &[u8], ext: &str) -> Result<DynamicImage, AppError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::new(ErrorCode::FileTooLarge)
            .with_detail("max_bytes", MAX_FILE_SIZE));
    }

    let ext_lower = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
        return Err(AppError::new(ErrorCode::UnsupportedFileFormat)
            .with_detail("format", ext_lower)
            .with_detail("supported", SUPPORTED_FORMATS.join(", ")));
    }

    image::load_from_memory(data).map_err(|e| {
        AppError::with_message(
            ErrorCode::InvalidImageFile,
            format!("Invalid image file ({}): {}", ext_lower, e),
        )
    })
}

/// Downscale to [`MAX_WIDTH`] and re-encode as JPEG
fn compress_image(img: DynamicImage) -> Result<Vec<u8>, AppError> {
    let img = if img.width() > MAX_WIDTH {
        let height = (img.height() as u64 * MAX_WIDTH as u64 / img.width() as u64) as u32;
        img.resize(MAX_WIDTH, height.max(1), image::imageops::FilterType::Lanczos3)
    } else {
        img
    };

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img.write_with_encoder(encoder).map_err(|e| {
            AppError::with_message(
                ErrorCode::ImageProcessingFailed,
                format!("Failed to compress image: {}", e),
            )
        })?;
    }
    Ok(buffer)
}

/// POST /api/upload/image - store an image and return its public URL
pub async fn upload_image(
    State(state): State<ServerState>,
    _admin: AdminUser,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<UploadResponse>> {
    let images_dir = state.config().uploads_dir();
    fs::create_dir_all(&images_dir).map_err(|e| {
        AppError::with_message(
            ErrorCode::FileStorageFailed,
            format!("Failed to create images directory: {}", e),
        )
    })?;

    let mut field_data: Option<Vec<u8>> = None;
    let mut original_filename = None;

    while let Some(f) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?
    {
        let name = f.name().map(|s| s.to_string());
        if name.as_deref() == Some("file") || name.as_deref() == Some("") {
            original_filename = f.file_name().map(|s| s.to_string());
            field_data = Some(
                f.bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?
                    .to_vec(),
            );
            break;
        }
    }

    let data = field_data.ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;
    let filename = original_filename.ok_or_else(|| AppError::new(ErrorCode::NoFilename))?;

    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    let ext = PathBuf::from(&filename)
        .extension()
        .and_then(|ext| ext.to_str().map(|s| s.to_string()))
        .ok_or_else(|| {
            AppError::new(ErrorCode::UnsupportedFileFormat).with_detail("filename", filename.clone())
        })?;

    if let Some(mime) = mime_guess::from_path(&filename).first()
        && mime.type_() != mime_guess::mime::IMAGE
    {
        return Err(AppError::new(ErrorCode::UnsupportedFileFormat)
            .with_detail("content_type", mime.to_string()));
    }

    let img = validate_image(&data, &ext)?;
    let compressed_data = compress_image(img)?;

    let file_id = Uuid::new_v4().to_string();
    let new_filename = format!("{}.jpg", file_id);
    let file_path = images_dir.join(&new_filename);

    fs::write(&file_path, &compressed_data).map_err(|e| {
        AppError::with_message(
            ErrorCode::FileStorageFailed,
            format!("Failed to save file: {}", e),
        )
    })?;

    tracing::info!(
        original_name = %filename,
        size = %compressed_data.len(),
        "image uploaded"
    );

    let url = format!("/uploads/images/{}", new_filename);
    Ok(ApiResponse::success(UploadResponse {
        file_id,
        filename: new_filename,
        original_name: filename,
        size: compressed_data.len(),
        url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::new_rgb8(width, height);
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .expect("encode test image");
        buffer
    }

    #[test]
    fn test_validate_accepts_real_png() {
        let data = sample_png(10, 10);
        assert!(validate_image(&data, "png").is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_data() {
        assert!(validate_image(b"not an image", "png").is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_extension() {
        let data = sample_png(10, 10);
        assert!(validate_image(&data, "bmp").is_err());
    }

    #[test]
    fn test_compress_caps_width() {
        let data = sample_png(1600, 400);
        let img = validate_image(&data, "png").expect("valid image");
        let jpeg = compress_image(img).expect("compress");
        let reloaded = image::load_from_memory(&jpeg).expect("reload");
        assert_eq!(reloaded.width(), MAX_WIDTH);
        assert_eq!(reloaded.height(), 200);
    }
}
