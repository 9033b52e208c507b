use std::io::Cursor;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};

use super::types::{ImagePreview, ViewSize};
use crate::error::{AppError, AppResult};

pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Largest size with the source aspect ratio that fits inside `bounds`.
pub fn fit_within(width: u32, height: u32, bounds: ViewSize) -> (u32, u32) {
    if width == 0 || height == 0 || bounds.width == 0 || bounds.height == 0 {
        return (0, 0);
    }
    let scale = f64::min(
        bounds.width as f64 / width as f64,
        bounds.height as f64 / height as f64,
    );
    let w = ((width as f64 * scale).round() as u32).clamp(1, bounds.width);
    let h = ((height as f64 * scale).round() as u32).clamp(1, bounds.height);
    (w, h)
}

pub fn mime_type(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|f| f.to_mime_type())
        .unwrap_or("image/png")
}

pub fn to_data_url(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type(bytes), B64.encode(bytes))
}

/// Reads an image file and returns it as an inline data URL for a chat request.
pub async fn encode_image_file(path: &Path) -> AppResult<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(to_data_url(&bytes))
}

pub fn decode_base64(b64: &str) -> AppResult<Vec<u8>> {
    Ok(B64.decode(b64.trim())?)
}

pub fn decode_image(bytes: &[u8]) -> AppResult<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Scales an image to fit the view and re-encodes it as a PNG data URL.
pub fn render_preview(img: &DynamicImage, bounds: ViewSize) -> AppResult<ImagePreview> {
    let (src_w, src_h) = img.dimensions();
    let (w, h) = fit_within(src_w, src_h, bounds);
    if w == 0 || h == 0 {
        return Err(AppError::Invalid(format!(
            "Cannot fit {}x{} image into {}x{}",
            src_w, src_h, bounds.width, bounds.height
        )));
    }

    let scaled = if (w, h) == (src_w, src_h) {
        img.clone()
    } else {
        img.resize_exact(w, h, FilterType::Triangle)
    };

    let mut png = Vec::new();
    scaled.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(ImagePreview {
        data_url: format!("data:image/png;base64,{}", B64.encode(&png)),
        width: w,
        height: h,
    })
}

/// Loads a bitmap from disk and renders a preview, off the async workers.
pub async fn load_preview(path: &Path, bounds: ViewSize) -> AppResult<ImagePreview> {
    let bytes = tokio::fs::read(path).await?;
    tokio::task::spawn_blocking(move || {
        let img = decode_image(&bytes)?;
        render_preview(&img, bounds)
    })
    .await
    .map_err(|e| AppError::Io(std::io::Error::other(e)))?
}

pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
