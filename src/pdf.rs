//! PDF output – wraps a rasterized surface in a single-page PDF using
//! `printpdf` (v0.8 ops-based API).
//!
//! The page is sized to the bitmap at 1 px = 1 pt and the image is placed
//! at the page origin. Only the JPEG path is used; the encoder collaborator
//! does not take lossless input here.

use std::fs;
use std::path::Path;

use printpdf::*;

use crate::error::RasterError;
use crate::surface::Surface;

const PT_TO_MM: f32 = 0.352778;

/// JPEG quality used when handing the bitmap to the PDF encoder.
const JPEG_QUALITY: u8 = 90;

/// Encode a surface into single-page PDF bytes.
///
/// Returns [`RasterError::EmptySurface`] for degenerate surfaces; callers
/// decide whether that is a hard error or a skipped artifact.
pub fn encode_pdf(surface: &Surface, title: &str) -> Result<Vec<u8>, RasterError> {
    let rgb = surface.to_rgb8().ok_or(RasterError::EmptySurface)?;
    let (px_w, px_h) = (surface.width(), surface.height());

    // `::image` disambiguates from printpdf's own `image` module pulled in
    // by the glob import above.
    let mut jpeg = Vec::new();
    let mut encoder = ::image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    encoder.encode(&rgb, px_w, px_h, ::image::ExtendedColorType::Rgb8)?;

    let mut doc = PdfDocument::new(title);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let raw = RawImage::decode_from_bytes(&jpeg, &mut warnings)
        .map_err(|e| RasterError::Pdf(e.to_string()))?;
    let xobj_id = doc.add_image(&raw);

    // 1 px = 1 pt; page matches the bitmap exactly.
    let page_w = Mm(px_w as f32 * PT_TO_MM);
    let page_h = Mm(px_h as f32 * PT_TO_MM);

    // At dpi=72 printpdf renders 1 px = 1 pt, so no scaling is needed and
    // the image's bottom-left corner sits at the page origin.
    let ops = vec![Op::UseXobject {
        id: xobj_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(0.0)),
            translate_y: Some(Pt(0.0)),
            dpi: Some(72.0),
            scale_x: Some(1.0),
            scale_y: Some(1.0),
            rotate: None,
        },
    }];

    let page = PdfPage::new(page_w, page_h, ops);
    doc.with_pages(vec![page]);
    let bytes = doc.save(&PdfSaveOptions::default(), &mut Vec::new());

    Ok(bytes)
}

/// Encode a surface and persist it at `path`.
pub fn write_pdf(surface: &Surface, title: &str, path: &Path) -> Result<(), RasterError> {
    let bytes = encode_pdf(surface, title)?;
    fs::write(path, &bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn encode_small_surface() {
        let mut surface = Surface::new(16, 16);
        surface.fill(Color::WHITE);
        let bytes = encode_pdf(&surface, "test").unwrap();
        assert!(bytes.len() > 100, "PDF should have content");
        // PDF magic number
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn degenerate_surface_is_rejected() {
        let surface = Surface::new(0, 0);
        assert!(matches!(
            encode_pdf(&surface, "empty"),
            Err(RasterError::EmptySurface)
        ));
    }
}
