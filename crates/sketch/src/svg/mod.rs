//! Vector export of the accumulated strokes
//!
//! Segments are grouped into runs: consecutive segments that join end to
//! start and share a rounded width become one `<path>` element with an
//! absolute `M` followed by relative `c` commands. All coordinates are
//! rounded to whole pixels.

mod path;
mod point;

pub use path::SvgPath;
pub use point::SvgPoint;

use sketchpad_config::{DEFAULT_PEN_COLOR, color_to_hex};

use crate::types::CurveSegment;

const SVG_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n";

/// Accumulates curve segments into an SVG document
#[derive(Debug, Clone, PartialEq)]
pub struct SvgBuilder {
    /// Closed runs in emission order
    paths: Vec<SvgPath>,
    /// Run still accepting segments
    current: Option<SvgPath>,
    /// Shared stroke color as `#rrggbb`
    stroke_color: String,
}

impl Default for SvgBuilder {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            current: None,
            stroke_color: color_to_hex(DEFAULT_PEN_COLOR),
        }
    }
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all accumulated paths (the stroke color is kept)
    pub fn clear(&mut self) {
        self.paths.clear();
        self.current = None;
    }

    /// Set the color written on the shared `<g>` element
    pub fn set_stroke_color(&mut self, color: [f32; 4]) {
        self.stroke_color = color_to_hex(color);
    }

    pub fn stroke_color(&self) -> &str {
        &self.stroke_color
    }

    /// Append one segment drawn at `stroke_width` (rounded to an integer).
    ///
    /// A new run starts when none is open, when the segment does not start
    /// where the run ended, or when the rounded width changes.
    pub fn append(&mut self, curve: &CurveSegment, stroke_width: f32) -> &mut Self {
        let width = stroke_width.round() as i32;
        let start = SvgPoint::from(curve.start);

        let continues = self
            .current
            .as_ref()
            .is_some_and(|path| path.continues(start, width));

        if !continues {
            if let Some(finished) = self.current.take() {
                self.paths.push(finished);
            }
            self.current = Some(SvgPath::new(start, width));
        }

        if let Some(path) = self.current.as_mut() {
            path.append(
                SvgPoint::from(curve.control1),
                SvgPoint::from(curve.control2),
                SvgPoint::from(curve.end),
            );
        }
        self
    }

    /// Runs that contain at least one command
    fn visible_paths(&self) -> impl Iterator<Item = &SvgPath> {
        self.paths
            .iter()
            .chain(self.current.iter())
            .filter(|path| !path.is_empty())
    }

    /// Number of `<path>` elements `build` will emit
    pub fn path_count(&self) -> usize {
        self.visible_paths().count()
    }

    pub fn is_empty(&self) -> bool {
        self.path_count() == 0
    }

    /// Render the document with the given canvas size.
    ///
    /// The open run is rendered as closed without being closed, so calling
    /// `build` again (or appending more segments) behaves the same.
    pub fn build(&self, width: u32, height: u32) -> String {
        let mut out = String::from(SVG_HEADER);
        out.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
        ));
        out.push_str(&format!(
            "<g stroke-linejoin=\"round\" stroke-linecap=\"round\" fill=\"none\" stroke=\"{}\">",
            self.stroke_color
        ));
        for path in self.visible_paths() {
            out.push_str(&path.to_string());
        }
        out.push_str("</g></svg>");
        out
    }
}
