//! Choropleth Renderer
//! Rasterizes the joined state boundaries into an RGBA image, filled with
//! the diverging ramp according to the selected category's values.

use crate::charts::colormap;
use crate::data::JoinedView;
use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use rayon::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const EDGE: Rgba<u8> = Rgba([230, 230, 230, 255]);
const MARGIN: f64 = 12.0;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No geometry to render")]
    NoGeometry,
    #[error("Degenerate map extent")]
    EmptyExtent,
    #[error("Canvas {0}x{1} too small to render into")]
    CanvasTooSmall(u32, u32),
}

/// Lon/lat -> pixel projection: bounding box fitted to the canvas with
/// preserved aspect ratio, y flipped so north is up.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    min_x: f64,
    min_y: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    height: f64,
}

impl Projection {
    pub fn fit(bounds: (f64, f64, f64, f64), width: u32, height: u32) -> Result<Self, RenderError> {
        let (min_x, min_y, max_x, max_y) = bounds;
        let dx = max_x - min_x;
        let dy = max_y - min_y;
        if dx <= 0.0 || dy <= 0.0 {
            return Err(RenderError::EmptyExtent);
        }
        let usable_w = width as f64 - 2.0 * MARGIN;
        let usable_h = height as f64 - 2.0 * MARGIN;
        if usable_w <= 0.0 || usable_h <= 0.0 {
            return Err(RenderError::CanvasTooSmall(width, height));
        }

        let scale = (usable_w / dx).min(usable_h / dy);
        Ok(Self {
            min_x,
            min_y,
            scale,
            offset_x: MARGIN + (usable_w - dx * scale) / 2.0,
            offset_y: MARGIN + (usable_h - dy * scale) / 2.0,
            height: height as f64,
        })
    }

    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = self.offset_x + (lon - self.min_x) * self.scale;
        let y = self.height - self.offset_y - (lat - self.min_y) * self.scale;
        (x, y)
    }
}

/// One state's projected rings plus its fill color, ready to draw.
struct ProjectedState {
    fill: Rgba<u8>,
    /// (exterior, interiors) per polygon of the multipolygon.
    polygons: Vec<(Vec<Point<i32>>, Vec<Vec<Point<i32>>>)>,
}

pub struct ChoroplethRenderer;

impl ChoroplethRenderer {
    /// Render the selected category as a filled map. `values` pairs every
    /// joined state with its (possibly null) value in row order.
    pub fn render(
        view: &JoinedView,
        values: &[(String, Option<f64>)],
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, RenderError> {
        if view.geometries.is_empty() {
            return Err(RenderError::NoGeometry);
        }

        let value_map: HashMap<&str, Option<f64>> = values
            .iter()
            .map(|(state, value)| (state.as_str(), *value))
            .collect();
        let (min, max) = value_range(values);

        let projection = Projection::fit(geometry_bounds(view), width, height)?;

        // Projection and color assignment are data-parallel; drawing into
        // the shared buffer stays serial.
        let states: Vec<ProjectedState> = view
            .geometries
            .par_iter()
            .map(|(name, geometry)| {
                let fill = match value_map.get(name.as_str()).copied().flatten() {
                    Some(value) => colormap::color_for(value, min, max),
                    None => colormap::NO_DATA,
                };
                let polygons = geometry
                    .iter()
                    .map(|polygon| {
                        let exterior = project_ring(polygon.exterior(), &projection);
                        let interiors = polygon
                            .interiors()
                            .iter()
                            .map(|ring| project_ring(ring, &projection))
                            .collect();
                        (exterior, interiors)
                    })
                    .collect();
                ProjectedState { fill, polygons }
            })
            .collect();

        let mut img: RgbaImage = ImageBuffer::from_pixel(width, height, BACKGROUND);
        for state in &states {
            for (exterior, interiors) in &state.polygons {
                fill_ring(&mut img, exterior, state.fill);
                for hole in interiors {
                    fill_ring(&mut img, hole, BACKGROUND);
                }
            }
        }
        // Edges last so shared borders stay visible over both fills.
        for state in &states {
            for (exterior, interiors) in &state.polygons {
                stroke_ring(&mut img, exterior);
                for hole in interiors {
                    stroke_ring(&mut img, hole);
                }
            }
        }

        Ok(img)
    }
}

fn geometry_bounds(view: &JoinedView) -> (f64, f64, f64, f64) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for geometry in view.geometries.values() {
        for polygon in geometry.iter() {
            for coord in polygon.exterior().coords() {
                min_x = min_x.min(coord.x);
                min_y = min_y.min(coord.y);
                max_x = max_x.max(coord.x);
                max_y = max_y.max(coord.y);
            }
        }
    }
    (min_x, min_y, max_x, max_y)
}

fn value_range(values: &[(String, Option<f64>)]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (_, value) in values {
        if let Some(v) = value {
            min = min.min(*v);
            max = max.max(*v);
        }
    }
    if min.is_infinite() {
        (0.0, 0.0)
    } else {
        (min, max)
    }
}

/// Project a ring to integer pixels, dropping the closing point and any
/// consecutive duplicates (imageproc polygons must be open).
fn project_ring(ring: &geo::LineString<f64>, projection: &Projection) -> Vec<Point<i32>> {
    let mut points: Vec<Point<i32>> = Vec::with_capacity(ring.0.len());
    for coord in ring.coords() {
        let (x, y) = projection.project(coord.x, coord.y);
        let point = Point::new(x.round() as i32, y.round() as i32);
        if points.last() != Some(&point) {
            points.push(point);
        }
    }
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

fn fill_ring(img: &mut RgbaImage, ring: &[Point<i32>], color: Rgba<u8>) {
    if ring.len() >= 3 {
        draw_polygon_mut(img, ring, color);
    }
}

fn stroke_ring(img: &mut RgbaImage, ring: &[Point<i32>]) {
    if ring.len() < 2 {
        return;
    }
    for window in ring.windows(2) {
        draw_line_segment_mut(
            img,
            (window[0].x as f32, window[0].y as f32),
            (window[1].x as f32, window[1].y as f32),
            EDGE,
        );
    }
    let first = ring[0];
    let last = ring[ring.len() - 1];
    draw_line_segment_mut(
        img,
        (last.x as f32, last.y as f32),
        (first.x as f32, first.y as f32),
        EDGE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::STATE_KEY;
    use geo::{polygon, MultiPolygon};
    use polars::prelude::{Column, DataFrame};

    fn square(x0: f64, y0: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
        ]])
    }

    fn view_with(names: &[&str]) -> JoinedView {
        let geometries = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), square(i as f64 * 2.0, 0.0, 1.0)))
            .collect();
        let table = DataFrame::new(vec![Column::new(STATE_KEY.into(), names)]).unwrap();
        JoinedView { table, geometries }
    }

    #[test]
    fn projection_maps_bounds_onto_canvas() {
        let projection = Projection::fit((60.0, 5.0, 100.0, 40.0), 800, 700).unwrap();
        let (x0, y0) = projection.project(60.0, 5.0);
        let (x1, y1) = projection.project(100.0, 40.0);

        // South-west corner lands low-left, north-east high-right.
        assert!(x0 < x1);
        assert!(y0 > y1);
        for v in [x0, y0, x1, y1] {
            assert!(v >= 0.0 && v <= 800.0_f64.max(700.0));
        }
        assert!(x0 >= MARGIN - 1.0 && y1 >= MARGIN - 1.0);
    }

    #[test]
    fn degenerate_extent_is_rejected() {
        assert!(matches!(
            Projection::fit((10.0, 10.0, 10.0, 20.0), 800, 700),
            Err(RenderError::EmptyExtent)
        ));
    }

    #[test]
    fn render_honors_canvas_dimensions() {
        let view = view_with(&["Delhi", "Goa"]);
        let values = vec![
            ("Delhi".to_string(), Some(10.0)),
            ("Goa".to_string(), Some(1.0)),
        ];
        let img = ChoroplethRenderer::render(&view, &values, 320, 240).unwrap();
        assert_eq!((img.width(), img.height()), (320, 240));
    }

    #[test]
    fn states_without_values_render_no_data() {
        let view = view_with(&["Delhi"]);
        let img = ChoroplethRenderer::render(&view, &[("Delhi".to_string(), None)], 100, 100)
            .unwrap();
        // Center pixel of the lone square must be the no-data fill.
        let center = img.get_pixel(50, 50);
        assert_eq!(*center, colormap::NO_DATA);
    }

    #[test]
    fn empty_geometry_is_an_error() {
        let view = JoinedView {
            table: DataFrame::new(vec![Column::new(STATE_KEY.into(), Vec::<String>::new())])
                .unwrap(),
            geometries: std::collections::HashMap::new(),
        };
        assert!(matches!(
            ChoroplethRenderer::render(&view, &[], 100, 100),
            Err(RenderError::NoGeometry)
        ));
    }
}
