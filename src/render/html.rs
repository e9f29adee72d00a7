//! Interactive choropleth: a standalone HTML page driving a Leaflet web map.

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use serde_json::{json, Value};
use tracing::info;

use crate::{
    error::{Error, Result},
    join::JoinedLayer,
    render::{escape_markup, RenderSpec},
};

const LEAFLET_VERSION: &str = "1.9.4";

/// Map behaviour; all data arrives through the `regions` and `config` globals.
const MAP_SCRIPT: &str = r#"
const escapeHtml = (text) => String(text ?? '').replace(/[&<>"']/g, (c) => ({
    '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
}[c]));

const map = L.map('map').setView(config.center, config.zoom);
L.tileLayer(config.tiles.url, { attribution: config.tiles.attribution, maxZoom: 19 }).addTo(map);

L.geoJSON(regions, {
    style: (feature) => ({
        fillColor: feature.properties.fill,
        color: '#333333',
        weight: 0.8,
        fillOpacity: 0.75,
    }),
    onEachFeature: (feature, layer) => {
        if (!config.popups) return;
        const p = feature.properties;
        const value = p[config.field];
        layer.bindPopup(
            `<b>${escapeHtml(p.name)}</b><br>${escapeHtml(p.council)}<br>` +
            `${escapeHtml(config.legendTitle)}: ${value === null ? 'no data' : value.toFixed(1)}`
        );
    },
}).addTo(map);

for (const label of config.labels) {
    L.marker([label.lat, label.lon], { opacity: 0, interactive: false })
        .bindTooltip(label.name, { permanent: true, direction: 'center', className: 'region-label' })
        .addTo(map);
}

const legend = L.control({ position: 'bottomright' });
legend.onAdd = () => {
    const div = L.DomUtil.create('div', 'legend');
    div.innerHTML = `<b>${escapeHtml(config.legendTitle)}</b>` + config.legend
        .map(([label, color]) => `<div><i style="background:${color}"></i>${escapeHtml(label)}</div>`)
        .join('');
    return div;
};
legend.addTo(map);

if (config.scaleBar) L.control.scale({ imperial: false }).addTo(map);
"#;

/// Serialize for inclusion inside a `<script>` element.
fn script_json(value: &Value) -> Result<String> {
    let text = serde_json::to_string(value).map_err(std::io::Error::from)?;
    Ok(text.replace("</", "<\\/"))
}

/// Writes a [`RenderSpec`] as a Leaflet page. Needs lon/lat (EPSG:4326) input.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self { Self }

    pub fn render<W: Write>(&self, joined: &JoinedLayer, spec: &RenderSpec, writer: &mut W) -> Result<()> {
        if spec.epsg != 4326 || joined.epsg() != 4326 {
            return Err(Error::InvalidRenderSpec(format!(
                "web maps need EPSG:4326 coordinates, got EPSG:{}", joined.epsg()
            )));
        }

        let fills = spec.fill_colors(joined).iter().map(ToString::to_string).collect::<Vec<_>>();
        let regions = joined.to_geojson(spec.category, Some(&fills));
        let config = json!({
            "center": [spec.center.y(), spec.center.x()],
            "zoom": spec.zoom,
            "field": spec.fill,
            "legendTitle": spec.legend_title,
            "legend": spec.legend().into_iter()
                .map(|(label, color)| json!([label, color.to_string()]))
                .collect::<Vec<_>>(),
            "labels": spec.labels.as_deref().unwrap_or_default().iter()
                .map(|label| json!({ "name": label.name, "lon": label.lon, "lat": label.lat }))
                .collect::<Vec<_>>(),
            "tiles": { "url": spec.tiles.url, "attribution": spec.tiles.attribution },
            "popups": spec.popups,
            "scaleBar": spec.scale_bar,
        });

        let title = escape_markup(&spec.title);
        writeln!(writer, r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.js"></script>
<style>
    html, body {{ height: 100%; margin: 0; font-family: sans-serif; }}
    #title {{ position: absolute; top: 10px; left: 60px; z-index: 1000; background: #ffffff; padding: 6px 10px; font-weight: bold; }}
    #map {{ height: 100%; }}
    .legend {{ background: #ffffff; padding: 6px 8px; line-height: 18px; color: #333333; }}
    .legend i {{ width: 14px; height: 14px; float: left; margin-right: 6px; opacity: 0.85; border: 1px solid #333333; }}
    .region-label {{ background: transparent; border: none; box-shadow: none; font-size: 10px; }}
</style>
</head>
<body>
<div id="title">{title}</div>
<div id="map"></div>
<script>"##)?;
        writeln!(writer, "const regions = {};", script_json(&regions)?)?;
        writeln!(writer, "const config = {};", script_json(&config)?)?;
        writer.write_all(MAP_SCRIPT.as_bytes())?;
        writeln!(writer, "</script>\n</body>\n</html>")?;
        writer.flush()?;
        Ok(())
    }

    pub fn render_to_string(&self, joined: &JoinedLayer, spec: &RenderSpec) -> Result<String> {
        let mut buffer = Vec::new();
        self.render(joined, spec, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| Error::InvalidRenderSpec(format!("HTML output is not valid UTF-8: {e}")))
    }

    pub fn render_to_file(&self, joined: &JoinedLayer, spec: &RenderSpec, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.render(joined, spec, &mut BufWriter::new(file))?;
        info!(path = %path.display(), regions = joined.len(), "wrote interactive map");
        Ok(())
    }
}
