//! Drawing primitives: region paths, labels, legend and scale bar.

use std::io::Write;

use geo::{Coord, CoordsIter, LineString, MultiPolygon, Rect};
use tracing::warn;

use crate::{
    error::Result,
    geom::{is_geographic, Transformer},
    join::JoinedLayer,
    render::{escape_markup, RenderSpec},
};

/// Maps layer coordinates onto the SVG canvas (y down).
/// Geographic layers are stretched by cos(mid-latitude) so shapes keep their proportions.
#[derive(Clone, Copy, Debug)]
pub(super) struct Frame {
    pub(super) bounds: Rect<f64>,
    pub(super) scale: f64,
    pub(super) aspect: f64,
    pub(super) left: f64,
    pub(super) top: f64,
}

impl Frame {
    pub(super) fn new(bounds: Rect<f64>, epsg: u32, map_width: f64, left: f64, top: f64) -> Self {
        let aspect = if is_geographic(epsg) { bounds.center().y.to_radians().cos() } else { 1.0 };
        let scale = map_width / (bounds.width() * aspect);
        Self { bounds, scale, aspect, left, top }
    }

    /// Canvas size of the map area.
    #[inline] pub(super) fn width(&self) -> f64 { self.bounds.width() * self.aspect * self.scale }

    #[inline] pub(super) fn height(&self) -> f64 { self.bounds.height() * self.scale }

    #[inline]
    pub(super) fn project(&self, coord: &Coord<f64>) -> (f64, f64) {
        let x = self.left + (coord.x - self.bounds.min().x) * self.aspect * self.scale;
        let y = self.top + (self.bounds.max().y - coord.y) * self.scale;
        (x, y)
    }
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
pub(super) fn multipolygon_to_path(shape: &MultiPolygon<f64>, frame: &Frame) -> String {
    let mut out = String::new();

    for polygon in &shape.0 {
        ring_to_path(polygon.exterior(), frame, &mut out);
        for interior in polygon.interiors() {
            ring_to_path(interior, frame, &mut out);
        }
    }

    out
}

fn ring_to_path(ring: &LineString<f64>, frame: &Frame, out: &mut String) {
    let mut coords = ring.coords_iter().map(|coord| frame.project(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.2},{y:.2}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.2},{y:.2}"));
        }
        out.push('Z');
    }
}

/// One filled path per region; holes render through the even-odd rule.
pub(super) fn draw_regions(writer: &mut impl Write, joined: &JoinedLayer, spec: &RenderSpec, frame: &Frame) -> Result<()> {
    let fills = spec.fill_colors(joined);
    for ((region, shape, score), fill) in joined.iter().zip(fills) {
        let value = score.get(spec.category)
            .map_or_else(|| "no data".to_string(), |v| format!("{v:.1}"));
        writeln!(
            writer,
            r#"<path class="region" fill-rule="evenodd" style="fill:{fill}" d="{}"><title>{}: {value}</title></path>"#,
            multipolygon_to_path(shape, frame),
            escape_markup(&region.name),
        )?;
    }
    Ok(())
}

pub(super) fn draw_labels(writer: &mut impl Write, spec: &RenderSpec, frame: &Frame) -> Result<()> {
    let Some(labels) = &spec.labels else { return Ok(()) };
    for label in labels {
        let (x, y) = frame.project(&Coord { x: label.lon, y: label.lat });
        writeln!(writer, r#"<text class="label" x="{x:.2}" y="{y:.2}">{}</text>"#, escape_markup(&label.name))?;
    }
    Ok(())
}

pub(super) const LEGEND_ROW: f64 = 18.0;

/// Swatches stacked under a heading, starting at (x, y).
pub(super) fn draw_legend(writer: &mut impl Write, spec: &RenderSpec, x: f64, y: f64) -> Result<()> {
    writeln!(writer, r#"<g class="legend">"#)?;
    writeln!(writer, r#"<text x="{x:.1}" y="{:.1}" font-weight="bold">{}</text>"#, y + 12.0, escape_markup(&spec.legend_title))?;
    for (row, (label, color)) in spec.legend().iter().enumerate() {
        let top = y + LEGEND_ROW * (row as f64 + 1.0);
        writeln!(writer, r##"<rect x="{x:.1}" y="{top:.1}" width="14" height="14" fill="{color}" stroke="#333333" stroke-width="0.5"/>"##)?;
        writeln!(writer, r#"<text x="{:.1}" y="{:.1}">{}</text>"#, x + 20.0, top + 11.0, escape_markup(label))?;
    }
    writeln!(writer, "</g>")?;
    Ok(())
}

/// Largest 1, 2 or 5 x 10^k not above `limit`.
pub(super) fn nice_length(limit: f64) -> f64 {
    let magnitude = 10f64.powf(limit.log10().floor());
    [5.0, 2.0, 1.0].into_iter()
        .map(|step| step * magnitude)
        .find(|&length| length <= limit)
        .unwrap_or(magnitude)
}

pub(super) fn format_distance(metres: f64) -> String {
    if metres >= 1000.0 { format!("{} km", metres / 1000.0) } else { format!("{metres} m") }
}

/// Ground metres per layer unit along the horizontal line through the layer's centre,
/// measured in the local UTM zone.
fn metres_per_unit(bounds: &Rect<f64>, epsg: u32) -> Result<f64> {
    let center = bounds.center();
    let lonlat = if is_geographic(epsg) { center } else { Transformer::new(epsg, 4326)?.coord(center)? };
    let utm = Transformer::to_utm(epsg, lonlat)?;

    let half = bounds.width() / 2.0;
    let west = utm.coord(Coord { x: center.x - half, y: center.y })?;
    let east = utm.coord(Coord { x: center.x + half, y: center.y })?;
    Ok((east.x - west.x).hypot(east.y - west.y) / bounds.width())
}

/// A bar about a quarter of the map width, ending at (right, y). Skipped with a warning
/// when the layer cannot be measured.
pub(super) fn draw_scale_bar(writer: &mut impl Write, frame: &Frame, epsg: u32, right: f64, y: f64) -> Result<()> {
    let metres_per_unit = match metres_per_unit(&frame.bounds, epsg) {
        Ok(m) if m.is_finite() && m > 0.0 => m,
        Ok(m) => { warn!(metres_per_unit = m, "degenerate scale; skipping scale bar"); return Ok(()) }
        Err(e) => { warn!(error = %e, "cannot measure layer; skipping scale bar"); return Ok(()) }
    };

    let pixels_per_metre = frame.aspect * frame.scale / metres_per_unit;
    let length = nice_length(frame.width() / 4.0 / pixels_per_metre);
    let pixels = length * pixels_per_metre;
    let left = right - pixels;

    writeln!(writer, r#"<g class="scale-bar">"#)?;
    writeln!(writer, r#"<line class="scale" x1="{left:.2}" y1="{y:.2}" x2="{right:.2}" y2="{y:.2}"/>"#)?;
    writeln!(writer, r#"<line class="scale" x1="{left:.2}" y1="{:.2}" x2="{left:.2}" y2="{y:.2}"/>"#, y - 5.0)?;
    writeln!(writer, r#"<line class="scale" x1="{right:.2}" y1="{:.2}" x2="{right:.2}" y2="{y:.2}"/>"#, y - 5.0)?;
    writeln!(writer, r#"<text class="legend" x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
        (left + right) / 2.0, y - 8.0, format_distance(length))?;
    writeln!(writer, "</g>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use geo::{Coord, Rect};

    use super::{format_distance, nice_length, Frame};

    #[test]
    fn nice_lengths() {
        assert_eq!(nice_length(7.3), 5.0);
        assert_eq!(nice_length(2500.0), 2000.0);
        assert_eq!(nice_length(45.0), 20.0);
        assert_eq!(format_distance(2000.0), "2 km");
        assert_eq!(format_distance(500.0), "500 m");
    }

    #[test]
    fn frame_flips_y_and_fits_width() {
        let bounds = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 100.0, y: 50.0 });
        let frame = Frame::new(bounds, 27700, 200.0, 10.0, 30.0);
        assert_eq!(frame.scale, 2.0);
        assert_eq!(frame.height(), 100.0);
        assert_eq!(frame.project(&Coord { x: 0.0, y: 50.0 }), (10.0, 30.0));
        assert_eq!(frame.project(&Coord { x: 100.0, y: 0.0 }), (210.0, 130.0));
    }

    #[test]
    fn geographic_frames_shrink_longitude() {
        let bounds = Rect::new(Coord { x: -3.0, y: 59.0 }, Coord { x: -2.0, y: 61.0 });
        let frame = Frame::new(bounds, 4326, 100.0, 0.0, 0.0);
        assert!((frame.aspect - 0.5).abs() < 1e-9);
        assert!((frame.width() - 100.0).abs() < 1e-9);
        assert!((frame.height() - 400.0).abs() < 1e-9);
    }
}
