//! Static choropleth output.

mod draw;
mod writer;

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use tracing::info;

use crate::{
    config::RenderConfig,
    error::{Error, Result},
    join::JoinedLayer,
    render::RenderSpec,
};

use draw::{draw_labels, draw_legend, draw_regions, draw_scale_bar, Frame, LEGEND_ROW};
use writer::{write_svg_footer, write_svg_header, write_svg_styles, write_svg_title};

const TITLE_BAND: f64 = 32.0;

/// Draws a [`RenderSpec`] as a standalone SVG document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SvgRenderer {
    /// Canvas width in pixels; the height follows from the layer's aspect ratio.
    pub width: f64,
    pub margin: f64,
}

impl Default for SvgRenderer {
    fn default() -> Self { Self { width: 1200.0, margin: 20.0 } }
}

impl SvgRenderer {
    pub fn new(width: f64, margin: f64) -> Self { Self { width, margin } }

    pub fn from_config(config: &RenderConfig) -> Self { Self::new(config.width, config.margin) }

    /// Write the map for `joined` as styled by `spec`.
    pub fn render<W: Write>(&self, joined: &JoinedLayer, spec: &RenderSpec, writer: &mut W) -> Result<()> {
        if spec.epsg != joined.epsg() {
            return Err(Error::InvalidRenderSpec(format!(
                "spec built for EPSG:{} but layer is EPSG:{}", spec.epsg, joined.epsg()
            )));
        }

        let bounds = joined.layer().bounds()
            .ok_or_else(|| Error::InvalidRenderSpec("no geometry to draw".into()))?;
        if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
            return Err(Error::InvalidRenderSpec("layer has zero extent".into()));
        }
        if self.width <= 2.0 * self.margin {
            return Err(Error::InvalidRenderSpec(format!("width {} leaves no room inside margin {}", self.width, self.margin)));
        }

        let title_band = if spec.title.is_empty() { 0.0 } else { TITLE_BAND };
        let frame = Frame::new(bounds, spec.epsg, self.width - 2.0 * self.margin, self.margin, self.margin + title_band);

        let legend_top = frame.top + frame.height() + self.margin;
        let legend_height = LEGEND_ROW * (spec.legend().len() as f64 + 1.0);
        let height = legend_top + legend_height + self.margin;

        write_svg_header(writer, self.width, height, frame.scale, &bounds, spec.epsg)?;
        write_svg_styles(writer)?;
        if title_band > 0.0 {
            write_svg_title(writer, self.margin, self.margin + 20.0, &spec.title)?;
        }

        draw_regions(writer, joined, spec, &frame)?;
        draw_labels(writer, spec, &frame)?;
        draw_legend(writer, spec, self.margin, legend_top)?;
        if spec.scale_bar {
            draw_scale_bar(writer, &frame, spec.epsg, self.width - self.margin, legend_top + LEGEND_ROW)?;
        }

        write_svg_footer(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn render_to_string(&self, joined: &JoinedLayer, spec: &RenderSpec) -> Result<String> {
        let mut buffer = Vec::new();
        self.render(joined, spec, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| Error::InvalidRenderSpec(format!("SVG output is not valid UTF-8: {e}")))
    }

    pub fn render_to_file(&self, joined: &JoinedLayer, spec: &RenderSpec, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.render(joined, spec, &mut BufWriter::new(file))?;
        info!(path = %path.display(), regions = joined.len(), "wrote SVG map");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::SvgRenderer;
    use crate::{
        config::RenderConfig,
        error::Error,
        join::{join_scores, JoinedLayer},
        map::{Region, RegionLayer},
        render::RenderSpec,
        score::{ScoreTable, WardScore},
        types::Category,
    };

    fn square(x0: f64, y0: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x0, y: y0), (x: x0 + size, y: y0), (x: x0 + size, y: y0 + size), (x: x0, y: y0 + size), (x: x0, y: y0),
        ]])
    }

    fn joined(epsg: u32, origin: (f64, f64), size: f64) -> JoinedLayer {
        let layer = RegionLayer::from_features(vec![
            (Region::new("Leith", None), square(origin.0, origin.1, size)),
            (Region::new("Forth & Inverleith", None), square(origin.0 + size, origin.1, size)),
        ], epsg);
        let mut gaps = [None; 8];
        gaps[0] = Some(60.0);
        let table = ScoreTable::new(vec![
            WardScore { name: "Leith".into(), gaps },
            WardScore { name: "Forth & Inverleith".into(), gaps: [None; 8] },
        ]);
        join_scores(&layer, &table).0
    }

    #[test]
    fn draws_regions_legend_and_labels() {
        let joined = joined(27700, (325_000.0, 673_000.0), 1000.0);
        let config = RenderConfig { labels: true, ..Default::default() };
        let spec = RenderSpec::build(&joined, Category::C1, &config).unwrap();
        let svg = SvgRenderer::new(400.0, 10.0).render_to_string(&joined, &spec).unwrap();

        assert!(svg.starts_with("<?xml"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r#"<path class="region""#).count(), 2);
        assert!(svg.contains(&format!("fill:{}", spec.color_for(Some(60.0)))));
        assert!(svg.contains(&format!("fill:{}", spec.missing_color)));
        assert!(svg.contains("Forth &amp; Inverleith"));
        assert!(!svg.contains("Forth & Inverleith"));
        assert_eq!(svg.matches(r#"<text class="label""#).count(), 2);
        assert!(svg.contains(">Missing<"));
        assert!(svg.contains(r#"data-epsg="27700""#));
    }

    #[test]
    fn legend_has_one_outlined_swatch_per_entry() {
        let joined = joined(27700, (325_000.0, 673_000.0), 1000.0);
        let spec = RenderSpec::build(&joined, Category::C1, &RenderConfig::default()).unwrap();
        let svg = SvgRenderer::default().render_to_string(&joined, &spec).unwrap();

        let swatches: Vec<&str> = svg.lines().filter(|line| line.starts_with("<rect x=")).collect();
        assert_eq!(swatches.len(), spec.legend().len());
        for ((_, color), swatch) in spec.legend().iter().zip(&swatches) {
            assert!(swatch.contains(&format!(r#"fill="{color}""#)));
            assert!(swatch.contains(r##"stroke="#333333""##));
        }
    }

    #[test]
    fn scale_bar_is_measured_in_metres() {
        let joined = joined(27700, (325_000.0, 673_000.0), 1200.0);
        let spec = RenderSpec::build(&joined, Category::C1, &RenderConfig::default()).unwrap();
        let svg = SvgRenderer::default().render_to_string(&joined, &spec).unwrap();
        assert!(svg.contains(r#"class="scale-bar""#));
        assert!(svg.contains("500 m"));

        let spec = RenderSpec { scale_bar: false, ..spec };
        let svg = SvgRenderer::default().render_to_string(&joined, &spec).unwrap();
        assert!(!svg.contains("scale-bar"));
    }

    #[test]
    fn geographic_layers_get_a_scale_bar_too() {
        let joined = joined(4326, (-3.2, 55.95), 0.02);
        let spec = RenderSpec::build(&joined, Category::C1, &RenderConfig::default()).unwrap();
        let svg = SvgRenderer::default().render_to_string(&joined, &spec).unwrap();
        assert!(svg.contains(r#"class="scale-bar""#));
    }

    #[test]
    fn spec_and_layer_must_agree_on_crs() {
        let joined = joined(27700, (325_000.0, 673_000.0), 1000.0);
        let spec = RenderSpec::build(&joined, Category::C1, &RenderConfig::default()).unwrap();
        let spec = RenderSpec { epsg: 4326, ..spec };
        assert!(matches!(
            SvgRenderer::default().render_to_string(&joined, &spec),
            Err(Error::InvalidRenderSpec(_))
        ));
    }
}
