//! Payload decoding at the pipeline's input boundary.
//!
//! Sources and masks arrive as encoded raster containers (PNG, JPEG,
//! BMP, WebP) produced by upload or drawing collaborators. This is the
//! only place raw payload bytes become raster buffers.

use image::DynamicImage;

use crate::types::PipelineError;

/// Decode an encoded raster payload.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty and
/// [`PipelineError::Decode`] if the container is unrecognized or
/// corrupt.
pub fn decode_raster(bytes: &[u8]) -> Result<DynamicImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    Ok(image::load_from_memory(bytes)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_returns_empty_input() {
        let result = decode_raster(&[]);
        assert!(matches!(result, Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn corrupt_payload_returns_decode_error() {
        let result = decode_raster(&[0xFF, 0xFE, 0x00, 0x01]);
        assert!(matches!(result, Err(PipelineError::Decode(_))));
    }

    #[test]
    fn valid_png_decodes_with_dimensions_intact() {
        let img = image::RgbaImage::from_pixel(17, 31, image::Rgba([128, 64, 32, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();

        let decoded = decode_raster(&buf).unwrap();
        assert_eq!(decoded.width(), 17);
        assert_eq!(decoded.height(), 31);
    }
}
