//! # domshot – rasterize an HTML element subtree into a bitmap or PDF
//!
//! One [`Rasterizer`] job per export request. The pipeline stages are:
//!
//! 1. **Parse** – HTML string → DOM tree ([`dom`])
//! 2. **Style** – inline styles and utility classes ([`style`])
//! 3. **Measure / layout** – flexbox layout with Taffy ([`layout`])
//! 4. **Wrap** – serialize the element into an SVG `foreignObject`
//!    document and a data URI ([`markup`])
//! 5. **Decode** – paint the wrapper into the bitmap surface ([`decode`],
//!    [`surface`])
//! 6. **PDF** – optionally emit a single-image PDF via printpdf ([`pdf`])
//!
//! ```no_run
//! use domshot::{first_element, parse_html, Rasterizer};
//!
//! let nodes = parse_html(r#"<div style="width: 320px; height: 120px; background: navy"></div>"#);
//! let element = first_element(&nodes).expect("an element");
//! let mut job = Rasterizer::new(element, None)?;
//! let bitmap = job.to_bitmap()?;
//! let png = bitmap.to_png()?;
//! job.to_pdf("report")?; // writes report.pdf
//! # Ok::<(), domshot::RasterError>(())
//! ```

pub mod decode;
pub mod dom;
pub mod error;
pub mod layout;
pub mod markup;
pub mod pdf;
pub mod rasterizer;
pub mod style;
pub mod surface;
pub mod templates;

// Re-exports for convenience
pub use dom::{first_element, parse_html};
pub use error::{MarkupError, RasterError};
pub use rasterizer::Rasterizer;
pub use surface::Surface;
