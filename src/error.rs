//! Error types for the rasterization pipeline.
//!
//! Every operation returns a `Result` so callers can observe decode and
//! encode failures directly rather than inferring them from missing
//! output.

use thiserror::Error;

/// Failures while building, encoding, or parsing the SVG wrapper markup.
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("not a data URI (expected `data:image/svg+xml;base64,...`): {0:?}")]
    NotADataUri(String),

    #[error("data URI is not base64-encoded (header must contain `;base64`)")]
    NotBase64,

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("data URI payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("wrapper markup has no <svg> root element")]
    MissingSvgRoot,

    #[error("wrapper must contain exactly one <foreignObject>, found {0}")]
    ForeignObjectCount(usize),

    #[error("wrapper has an invalid `{attr}` attribute: {value:?}")]
    BadDimension { attr: &'static str, value: String },

    #[error("foreignObject contains no element")]
    EmptyForeignObject,
}

/// Top-level error for rasterization jobs.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("invalid background color: {0:?}")]
    InvalidBackground(String),

    #[error(transparent)]
    Markup(#[from] MarkupError),

    #[error("surface has zero dimensions")]
    EmptySurface,

    #[error("JPEG encode error: {0}")]
    JpegEncode(#[from] image::ImageError),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("PDF encode error: {0}")]
    Pdf(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
