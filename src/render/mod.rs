//! Choropleth rendering: the [`RenderSpec`] the pipeline is responsible for, and two
//! backends that draw it (a static SVG and an interactive Leaflet page).

mod bins;
mod color;
mod html;
mod spec;
mod svg;

pub use bins::Bins;
pub use color::Rgb;
pub use html::HtmlRenderer;
pub use spec::{LabelPoint, RenderSpec, TileProvider};
pub use svg::SvgRenderer;

/// Escape text for XML and HTML bodies and attribute values.
pub(crate) fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
