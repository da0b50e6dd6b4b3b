use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use geo::{Geometry, MultiPolygon, Polygon};
use geojson::GeoJson;

// ---------------------------------------------------------------------------
// World country outlines for the choropleth maps
// ---------------------------------------------------------------------------

/// Shoelace area (flat approximation) of a polygon's exterior ring.
fn poly_area(poly: &Polygon<f64>) -> f64 {
    let coords = &poly.exterior().0;
    let mut sum = 0.0;
    for window in coords.windows(2) {
        let a = window[0];
        let b = window[1];
        sum += a.x * b.y - b.x * a.y;
    }
    (sum * 0.5).abs()
}

/// Country outlines keyed by ISO3 code, with overall lon/lat bounds.
///
/// Built from a GeoJSON FeatureCollection (Natural-Earth-style: each feature
/// carries an `ISO_A3` or `ADM0_A3` property and a Polygon/MultiPolygon
/// geometry). The asset is optional at runtime; the dashboard degrades to a
/// notice when it is absent.
pub struct WorldMap {
    items: Vec<(String, MultiPolygon<f64>)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl WorldMap {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading map asset {}", path.display()))?;
        let raw = GeoJson::from_str(&text).context("parsing GeoJSON")?;
        Self::from_geojson(raw)
    }

    pub fn from_geojson(raw: GeoJson) -> Result<Self> {
        let mut items = Vec::new();

        if let GeoJson::FeatureCollection(fc) = raw {
            for feature in fc.features {
                let iso3 = feature
                    .properties
                    .as_ref()
                    .and_then(|p| {
                        p.get("ISO_A3")
                            .or_else(|| p.get("ADM0_A3"))
                            .and_then(|v| v.as_str())
                    })
                    .unwrap_or("")
                    .to_ascii_uppercase();
                if iso3.len() != 3 {
                    continue;
                }

                if let Some(gj) = feature.geometry {
                    let geom: Geometry<f64> = gj
                        .value
                        .try_into()
                        .context("converting GeoJSON geometry")?;
                    let mut mp: MultiPolygon<f64> = match geom {
                        Geometry::Polygon(p) => p.into(),
                        Geometry::MultiPolygon(m) => m,
                        _ => continue,
                    };

                    // Drop tiny fragments of multi-part geometries.
                    if mp.0.len() > 1 {
                        let polys = std::mem::take(&mut mp.0);
                        let areas: Vec<f64> = polys.iter().map(poly_area).collect();
                        let max_area = areas.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                        let threshold = max_area * 0.05;
                        let filtered: Vec<Polygon<f64>> = polys
                            .into_iter()
                            .zip(areas)
                            .filter(|(_, area)| *area >= threshold)
                            .map(|(poly, _)| poly)
                            .collect();
                        if filtered.is_empty() {
                            continue;
                        }
                        mp = MultiPolygon(filtered);
                    }

                    items.push((iso3, mp));
                }
            }
        }

        if items.is_empty() {
            anyhow::bail!("no usable country features in map asset");
        }

        let (mut minx, mut miny, mut maxx, mut maxy) = (
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        );
        for (_, mp) in &items {
            for poly in &mp.0 {
                for coord in poly.exterior().0.iter() {
                    minx = minx.min(coord.x);
                    miny = miny.min(coord.y);
                    maxx = maxx.max(coord.x);
                    maxy = maxy.max(coord.y);
                }
            }
        }

        Ok(Self {
            items,
            x_bounds: [minx, maxx],
            y_bounds: [miny, maxy],
        })
    }

    /// Number of countries with usable geometry.
    pub fn feature_count(&self) -> usize {
        self.items.len()
    }

    /// `(iso3, geometry)` pairs for drawing.
    pub fn items(&self) -> &[(String, MultiPolygon<f64>)] {
        &self.items
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        self.x_bounds
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        self.y_bounds
    }
}
