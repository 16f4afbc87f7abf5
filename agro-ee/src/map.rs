//! Map visualization: per-period color ramps, region framing and tile layers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Zoom used when a region has no usable extent.
pub const DEFAULT_ZOOM: u8 = 8;

/// Min/max stretch and palette handed to the remote tile renderer.
///
/// The bounds come from the observed min/max of the selected period over
/// the region, so every year gets its own contrast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisParams {
    pub min: f64,
    pub max: f64,
    pub palette: Vec<String>,
}

impl VisParams {
    /// Palette as bare hex digits, the form the maps endpoint expects.
    pub fn palette_hex(&self) -> Vec<String> {
        self.palette
            .iter()
            .map(|c| c.trim_start_matches('#').to_string())
            .collect()
    }

    pub fn ramp(&self) -> ColorRamp {
        ColorRamp::new(self.min, self.max, &self.palette)
    }
}

/// Parse a `#rrggbb` color.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Linear color ramp across evenly spaced palette stops between `min` and `max`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    min: f64,
    max: f64,
    colors: Vec<(u8, u8, u8)>,
}

/// A value/color pair for map legends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendStop {
    pub value: f64,
    pub color: String,
}

impl ColorRamp {
    /// Unparseable palette entries render as neutral gray.
    pub fn new(min: f64, max: f64, palette: &[String]) -> Self {
        let colors = palette
            .iter()
            .map(|c| hex_to_rgb(c).unwrap_or((200, 200, 200)))
            .collect();
        Self { min, max, colors }
    }

    /// Color for a value; values outside the bounds are clamped and a flat
    /// range maps everything to the middle of the palette.
    pub fn color_at(&self, value: f64) -> (u8, u8, u8) {
        if self.colors.is_empty() {
            return (200, 200, 200);
        }
        let range = self.max - self.min;
        let normalized = if range.abs() < f64::EPSILON || !value.is_finite() {
            0.5
        } else {
            ((value - self.min) / range).clamp(0.0, 1.0)
        };
        let last = self.colors.len() - 1;
        let position = normalized * last as f64;
        let low = position.floor() as usize;
        let high = (low + 1).min(last);
        let t = position - low as f64;
        let (r1, g1, b1) = self.colors[low];
        let (r2, g2, b2) = self.colors[high];
        let mix = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
        (mix(r1, r2), mix(g1, g2), mix(b1, b2))
    }

    pub fn hex_at(&self, value: f64) -> String {
        let (r, g, b) = self.color_at(value);
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// `n` evenly spaced legend entries from min to max.
    pub fn legend_stops(&self, n: usize) -> Vec<LegendStop> {
        let n = n.max(2);
        (0..n)
            .map(|i| {
                let value = self.min + (self.max - self.min) * i as f64 / (n - 1) as f64;
                LegendStop {
                    value,
                    color: self.hex_at(value),
                }
            })
            .collect()
    }
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Bounds {
    /// Bounding box of every coordinate pair in a GeoJSON geometry.
    pub fn from_geojson(geometry: &Value) -> Option<Self> {
        let mut bounds: Option<Bounds> = None;
        collect_positions(&geometry["coordinates"], &mut bounds);
        if let Some(parts) = geometry["geometries"].as_array() {
            for part in parts {
                if let Some(b) = Bounds::from_geojson(part) {
                    bounds = Some(match bounds {
                        Some(acc) => acc.union(&b),
                        None => b,
                    });
                }
            }
        }
        bounds
    }

    fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}

fn collect_positions(node: &Value, bounds: &mut Option<Bounds>) {
    let Some(items) = node.as_array() else {
        return;
    };
    if let (Some(lon), Some(lat)) = (
        items.first().and_then(Value::as_f64),
        items.get(1).and_then(Value::as_f64),
    ) {
        let point = Bounds {
            west: lon,
            south: lat,
            east: lon,
            north: lat,
        };
        *bounds = Some(match bounds {
            Some(acc) => acc.union(&point),
            None => point,
        });
        return;
    }
    for item in items {
        collect_positions(item, bounds);
    }
}

/// Center and zoom framing a region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
    pub bounds: Option<Bounds>,
}

impl MapView {
    /// Frame the extent: the zoom is the largest web-mercator level at which
    /// the wider side still fits in one 256 px tile span times four.
    pub fn fit(bounds: Bounds) -> Self {
        let (latitude, longitude) = bounds.center();
        let span = (bounds.east - bounds.west)
            .abs()
            .max((bounds.north - bounds.south).abs());
        let zoom = if span <= 0.0 {
            DEFAULT_ZOOM
        } else {
            ((360.0 * 4.0 / span).log2().floor() as i32).clamp(3, 14) as u8
        };
        Self {
            latitude,
            longitude,
            zoom,
            bounds: Some(bounds),
        }
    }
}

/// A remote XYZ tile layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    /// Template with `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
}

impl TileLayer {
    /// Build the layer from a `maps` resource name such as `projects/p/maps/abc`.
    pub fn from_map_name(api_url: &str, map_name: &str, label: &str) -> Self {
        Self {
            name: label.to_string(),
            url_template: format!(
                "{}/{}/tiles/{{z}}/{{x}}/{{y}}",
                api_url.trim_end_matches('/'),
                map_name
            ),
        }
    }
}

/// Everything a result map needs: tiles, stretch, legend and framing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultMap {
    pub layer: TileLayer,
    pub vis: VisParams,
    pub legend: Vec<LegendStop>,
    pub view: MapView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn palette(colors: &[&str]) -> Vec<String> {
        colors.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#FF0000"), Some((255, 0, 0)));
        assert_eq!(hex_to_rgb("00ff00"), Some((0, 255, 0)));
        assert_eq!(hex_to_rgb("#GGGGGG"), None);
        assert_eq!(hex_to_rgb("#fff"), None);
    }

    #[test]
    fn ramp_interpolates_between_stops() {
        let ramp = ColorRamp::new(0.0, 100.0, &palette(&["#000000", "#ffffff"]));
        assert_eq!(ramp.color_at(0.0), (0, 0, 0));
        assert_eq!(ramp.color_at(100.0), (255, 255, 255));
        assert_eq!(ramp.color_at(50.0), (128, 128, 128));
    }

    #[test]
    fn ramp_clamps_out_of_range_values() {
        let ramp = ColorRamp::new(10.0, 20.0, &palette(&["#0000ff", "#ff0000"]));
        assert_eq!(ramp.color_at(-5.0), (0, 0, 255));
        assert_eq!(ramp.color_at(99.0), (255, 0, 0));
    }

    #[test]
    fn flat_range_maps_to_palette_middle() {
        let ramp = ColorRamp::new(5.0, 5.0, &palette(&["#000000", "#888888", "#ffffff"]));
        assert_eq!(ramp.hex_at(5.0), "#888888");
    }

    #[test]
    fn legend_spans_bounds() {
        let vis = VisParams {
            min: 900.0,
            max: 1800.0,
            palette: palette(&["#ffffff", "#171cb1"]),
        };
        let stops = vis.ramp().legend_stops(4);
        assert_eq!(stops.len(), 4);
        assert_eq!(stops[0].value, 900.0);
        assert_eq!(stops[3].value, 1800.0);
        assert_eq!(stops[0].color, "#ffffff");
        assert_eq!(vis.palette_hex(), vec!["ffffff", "171cb1"]);
    }

    #[test]
    fn bounds_from_multipolygon() {
        let geometry = json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[-48.6, -19.2], [-47.9, -19.2], [-47.9, -18.6], [-48.6, -19.2]]],
                [[[-48.0, -18.5], [-47.8, -18.5], [-47.8, -18.4], [-48.0, -18.5]]]
            ]
        });
        let bounds = Bounds::from_geojson(&geometry).unwrap();
        assert_eq!(bounds.west, -48.6);
        assert_eq!(bounds.east, -47.8);
        assert_eq!(bounds.south, -19.2);
        assert_eq!(bounds.north, -18.4);
    }

    #[test]
    fn bounds_missing_for_empty_geometry() {
        assert!(Bounds::from_geojson(&json!({"type": "Polygon", "coordinates": []})).is_none());
    }

    #[test]
    fn fit_zooms_closer_for_smaller_regions() {
        let municipality = MapView::fit(Bounds {
            west: -48.6,
            south: -19.2,
            east: -47.8,
            north: -18.4,
        });
        let state = MapView::fit(Bounds {
            west: -51.0,
            south: -22.9,
            east: -39.8,
            north: -14.2,
        });
        assert!(municipality.zoom > state.zoom);
        assert!((municipality.latitude + 18.8).abs() < 1e-9);
    }

    #[test]
    fn tile_layer_template() {
        let layer = TileLayer::from_map_name(
            "https://earthengine.googleapis.com/v1/",
            "projects/demo/maps/abc123",
            "Precipitação 2016",
        );
        assert_eq!(
            layer.url_template,
            "https://earthengine.googleapis.com/v1/projects/demo/maps/abc123/tiles/{z}/{x}/{y}"
        );
    }
}
