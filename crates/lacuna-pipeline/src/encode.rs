//! Payload encoding at the pipeline's output boundary.
//!
//! The processed raster leaves the core as a single PNG-encoded
//! payload; persisting or offering it for download is a downstream
//! collaborator's job.

use image::ImageEncoder;

use crate::types::{PipelineError, RgbImage};

/// Encode a processed raster as a PNG payload.
///
/// # Errors
///
/// Returns [`PipelineError::Decode`] if PNG encoding fails (the
/// `image` crate reports encode and decode failures with one error
/// type).
pub fn encode_png(raster: &RgbImage) -> Result<Vec<u8>, PipelineError> {
    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder.write_image(
        raster.as_raw(),
        raster.width(),
        raster.height(),
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(png_bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::decode::decode_raster;

    #[test]
    fn encoded_payload_round_trips_through_decode() {
        let raster = RgbImage::from_fn(9, 7, |x, y| image::Rgb([x as u8, y as u8, 200]));
        let payload = encode_png(&raster).unwrap();
        assert!(!payload.is_empty());

        let decoded = decode_raster(&payload).unwrap().to_rgb8();
        assert_eq!(decoded, raster);
    }
}
