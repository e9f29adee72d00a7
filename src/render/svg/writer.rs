//! SVG document scaffolding.

use std::io::Write;

use geo::Rect;

use crate::{error::Result, render::escape_markup};

/// Write the XML declaration, the opening `<svg>` tag and a white background.
/// The data attributes record the layer extent so the drawing can be mapped back to coordinates.
pub(super) fn write_svg_header<W: Write>(writer: &mut W, width: f64, height: f64, scale: f64, bounds: &Rect<f64>, epsg: u32) -> Result<()> {
    writeln!(writer, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
    writeln!(writer, r##"<svg xmlns="http://www.w3.org/2000/svg"
        width="{width:.0}" height="{height:.0}"
        viewBox="0 0 {width:.0} {height:.0}"
        data-x-min="{x_min}" data-x-max="{x_max}"
        data-y-min="{y_min}" data-y-max="{y_max}"
        data-epsg="{epsg}" data-scale="{scale}">"##,
        x_min = bounds.min().x,
        x_max = bounds.max().x,
        y_min = bounds.min().y,
        y_max = bounds.max().y,
    )?;
    writeln!(writer, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
    Ok(())
}

pub(super) fn write_svg_styles<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, r##"<defs>
<style>
    .region {{ stroke: #333333; stroke-width: 0.5; fill-opacity: 0.85; vector-effect: non-scaling-stroke; }}
    .label {{ font: 10px sans-serif; fill: #111827; text-anchor: middle; paint-order: stroke; stroke: #ffffff; stroke-width: 2; }}
    .title {{ font: bold 18px sans-serif; fill: #111827; }}
    .legend {{ font: 12px sans-serif; fill: #111827; }}
    .scale {{ stroke: #111827; stroke-width: 2; }}
</style>
</defs>"##)?;
    Ok(())
}

pub(super) fn write_svg_title<W: Write>(writer: &mut W, x: f64, y: f64, title: &str) -> Result<()> {
    writeln!(writer, r#"<text class="title" x="{x:.1}" y="{y:.1}">{}</text>"#, escape_markup(title))?;
    Ok(())
}

pub(super) fn write_svg_footer<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "</svg>")?;
    Ok(())
}
