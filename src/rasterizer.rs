//! Rasterizer – the rasterization job object.
//!
//! One job per export: construction measures the element, allocates and
//! background-fills the surface, and freezes the wrapper markup. The
//! element's size is captured once and never re-measured, so a job built
//! before the element changes renders the old dimensions. Build a new job
//! per export when the element may have changed.

use std::path::PathBuf;

use crate::dom::ElementNode;
use crate::error::RasterError;
use crate::layout::measure_element;
use crate::markup;
use crate::pdf;
use crate::style::{self, Color};
use crate::surface::Surface;

pub struct Rasterizer {
    width: u32,
    height: u32,
    background: Color,
    surface: Surface,
    markup: String,
}

impl Rasterizer {
    /// Create a job for an element.
    ///
    /// The background is resolved in order: the explicit argument, the
    /// element's own computed background color, opaque white. An element
    /// that measures 0×0 is accepted and produces a degenerate job whose
    /// exports are no-ops.
    pub fn new(element: &ElementNode, background: Option<&str>) -> Result<Self, RasterError> {
        let (width, height) = measure_element(element);
        if width == 0 || height == 0 {
            log::warn!("element measured {width}x{height}; exports will be no-ops");
        }

        let background = match background {
            Some(s) => {
                style::parse_color(s).ok_or_else(|| RasterError::InvalidBackground(s.to_string()))?
            }
            None => {
                let computed = style::resolve_style(element).background_color;
                if computed.is_transparent() {
                    Color::WHITE
                } else {
                    computed
                }
            }
        };

        // Background fill keeps transparent regions of the widget from
        // producing a transparent export.
        let mut surface = Surface::new(width, height);
        surface.fill(background);

        let markup = markup::build_wrapper(element, width, height);

        Ok(Self {
            width,
            height,
            background,
            surface,
            markup,
        })
    }

    /// Width captured at construction time.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height captured at construction time.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The resolved background fill color.
    pub fn background(&self) -> Color {
        self.background
    }

    /// The frozen SVG wrapper markup for this job.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// The backing surface in its current state (background fill until the
    /// first `to_bitmap` call).
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Rasterize the wrapper markup into the surface and return it.
    ///
    /// The draw always completes before this returns. The surface is not
    /// cleared between calls: a second call composites over the first
    /// draw's result.
    pub fn to_bitmap(&mut self) -> Result<&Surface, RasterError> {
        let uri = markup::to_data_uri(&self.markup);
        crate::decode::decode_into(&uri, &mut self.surface)?;
        Ok(&self.surface)
    }

    /// Rasterize and persist a single-image PDF at `<file_name>.pdf`.
    ///
    /// `file_name` may include a directory prefix. Degenerate 0×0 jobs
    /// write no artifact and return `Ok(None)`.
    pub fn to_pdf(&mut self, file_name: &str) -> Result<Option<PathBuf>, RasterError> {
        self.to_bitmap()?;

        if self.surface.is_empty() {
            log::warn!("skipping PDF export: surface has zero dimensions");
            return Ok(None);
        }

        let path = PathBuf::from(format!("{file_name}.pdf"));
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.to_string());
        pdf::write_pdf(&self.surface, &title, &path)?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{first_element, parse_html};

    fn element(html: &str) -> ElementNode {
        let nodes = parse_html(html);
        first_element(&nodes).expect("element").clone()
    }

    #[test]
    fn surface_matches_measured_size() {
        let elem = element(r#"<div style="width: 120px; height: 48px"></div>"#);
        let job = Rasterizer::new(&elem, None).unwrap();
        assert_eq!(job.width(), 120);
        assert_eq!(job.height(), 48);
        assert_eq!(job.surface().width(), 120);
        assert_eq!(job.surface().height(), 48);
    }

    #[test]
    fn default_background_is_white() {
        let elem = element(r#"<div style="width: 4px; height: 4px"></div>"#);
        let job = Rasterizer::new(&elem, None).unwrap();
        assert_eq!(job.background(), Color::WHITE);
        assert_eq!(job.surface().pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn element_background_used_when_none_given() {
        let elem = element(r#"<div style="width: 4px; height: 4px; background: navy"></div>"#);
        let job = Rasterizer::new(&elem, None).unwrap();
        assert_eq!(job.background().to_rgba8(), [0, 0, 128, 255]);
    }

    #[test]
    fn explicit_background_wins() {
        let elem = element(r#"<div style="width: 4px; height: 4px; background: navy"></div>"#);
        let job = Rasterizer::new(&elem, Some("#00ff00")).unwrap();
        assert_eq!(job.background().to_rgba8(), [0, 255, 0, 255]);
    }

    #[test]
    fn invalid_background_is_rejected() {
        let elem = element(r#"<div style="width: 4px; height: 4px"></div>"#);
        assert!(matches!(
            Rasterizer::new(&elem, Some("not-a-color")),
            Err(RasterError::InvalidBackground(_))
        ));
    }

    #[test]
    fn markup_is_frozen_at_construction() {
        let elem = element(r#"<div style="width: 4px; height: 4px"></div>"#);
        let mut job = Rasterizer::new(&elem, None).unwrap();
        let before = job.markup().to_string();
        job.to_bitmap().unwrap();
        assert_eq!(job.markup(), before);
    }

    #[test]
    fn degenerate_job_is_accepted() {
        let elem = element("<p>no size anywhere</p>");
        let mut job = Rasterizer::new(&elem, None).unwrap();
        assert_eq!(job.width(), 0);
        let surface = job.to_bitmap().unwrap();
        assert!(surface.is_empty());
    }
}
