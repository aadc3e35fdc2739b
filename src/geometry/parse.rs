use serde::Deserialize;

use crate::geometry::{COLOR_FLOATS_PER_TRIANGLE, POSITION_FLOATS_PER_TRIANGLE, VERTICES_PER_TRIANGLE};

#[derive(thiserror::Error, Debug)]
pub enum GeometryError {
    #[error("invalid geometry json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("geometry has no triangles")]
    Empty,

    #[error("positions length {len} is not a multiple of 9 (3 vertices x 3 floats)")]
    PositionsNotTriangles { len: usize },

    #[error("colors length {len} is not a multiple of 12 (3 vertices x 4 floats)")]
    ColorsNotTriangles { len: usize },

    #[error("positions describe {positions} triangles but colors describe {colors}")]
    TriangleCountMismatch { positions: usize, colors: usize },

    #[error("{field}[{index}] is not a finite number")]
    NonFinite { field: &'static str, index: usize },
}

#[derive(Deserialize)]
struct GeometryFile {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl Geometry {
    pub fn new(positions: Vec<f32>, colors: Vec<f32>) -> Result<Self, GeometryError> {
        if positions.len() % POSITION_FLOATS_PER_TRIANGLE != 0 {
            return Err(GeometryError::PositionsNotTriangles {
                len: positions.len(),
            });
        }
        if colors.len() % COLOR_FLOATS_PER_TRIANGLE != 0 {
            return Err(GeometryError::ColorsNotTriangles { len: colors.len() });
        }

        let position_triangles = positions.len() / POSITION_FLOATS_PER_TRIANGLE;
        let color_triangles = colors.len() / COLOR_FLOATS_PER_TRIANGLE;
        if position_triangles != color_triangles {
            return Err(GeometryError::TriangleCountMismatch {
                positions: position_triangles,
                colors: color_triangles,
            });
        }
        if position_triangles == 0 {
            return Err(GeometryError::Empty);
        }

        check_finite("positions", &positions)?;
        check_finite("colors", &colors)?;

        Ok(Self { positions, colors })
    }

    /// Parses `{"positions": [...], "colors": [...]}`. Other fields are ignored.
    pub fn from_json(text: &str) -> Result<Self, GeometryError> {
        let file: GeometryFile = serde_json::from_str(text)?;
        Self::new(file.positions, file.colors)
    }

    pub fn default_triangle() -> Self {
        Self {
            positions: vec![
                0.0, 0.5, 0.0, //
                -0.5, -0.5, 0.0, //
                0.5, -0.5, 0.0,
            ],
            colors: vec![
                1.0, 0.0, 0.0, 1.0, //
                0.0, 1.0, 0.0, 1.0, //
                0.0, 0.0, 1.0, 1.0,
            ],
        }
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / POSITION_FLOATS_PER_TRIANGLE
    }

    pub fn vertex_count(&self) -> usize {
        self.triangle_count() * VERTICES_PER_TRIANGLE
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::default_triangle()
    }
}

fn check_finite(field: &'static str, values: &[f32]) -> Result<(), GeometryError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(GeometryError::NonFinite { field, index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors(triangles: usize) -> Vec<f32> {
        vec![0.5; triangles * COLOR_FLOATS_PER_TRIANGLE]
    }

    // ── new ───────────────────────────────────────────────────────────────

    #[test]
    fn new_accepts_whole_triangles() {
        let g = Geometry::new(vec![0.0; 18], colors(2)).unwrap();
        assert_eq!(g.triangle_count(), 2);
        assert_eq!(g.vertex_count(), 6);
    }

    #[test]
    fn new_rejects_partial_position_triangle() {
        let err = Geometry::new(vec![0.0; 10], colors(1)).unwrap_err();
        assert!(matches!(err, GeometryError::PositionsNotTriangles { len: 10 }));
    }

    #[test]
    fn new_rejects_partial_color_triangle() {
        let err = Geometry::new(vec![0.0; 9], vec![1.0; 8]).unwrap_err();
        assert!(matches!(err, GeometryError::ColorsNotTriangles { len: 8 }));
    }

    #[test]
    fn new_rejects_mismatched_counts() {
        let err = Geometry::new(vec![0.0; 18], colors(1)).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::TriangleCountMismatch {
                positions: 2,
                colors: 1
            }
        ));
    }

    #[test]
    fn new_rejects_empty() {
        let err = Geometry::new(vec![], vec![]).unwrap_err();
        assert!(matches!(err, GeometryError::Empty));
    }

    #[test]
    fn new_rejects_non_finite() {
        let mut positions = vec![0.0; 9];
        positions[4] = f32::NAN;
        let err = Geometry::new(positions, colors(1)).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::NonFinite {
                field: "positions",
                index: 4
            }
        ));
    }

    // ── from_json ─────────────────────────────────────────────────────────

    #[test]
    fn from_json_two_triangles() {
        let text = r#"{
            "positions": [0,0,0, 1,0,0, 0,1,0, 0,0,0, -1,0,0, 0,-1,0],
            "colors": [1,0,0,1, 1,0,0,1, 1,0,0,1, 0,0,1,1, 0,0,1,1, 0,0,1,1]
        }"#;
        let g = Geometry::from_json(text).unwrap();
        assert_eq!(g.triangle_count(), 2);
        assert_eq!(g.positions()[12], -1.0);
        assert_eq!(g.colors()[14], 1.0);
    }

    #[test]
    fn from_json_ignores_extra_fields() {
        let text = r#"{"name": "tri", "positions": [0,0,0,1,0,0,0,1,0],
            "colors": [1,1,1,1,1,1,1,1,1,1,1,1], "normals": []}"#;
        assert_eq!(Geometry::from_json(text).unwrap().triangle_count(), 1);
    }

    #[test]
    fn from_json_missing_field_is_error() {
        let err = Geometry::from_json(r#"{"positions": [0,0,0,1,0,0,0,1,0]}"#).unwrap_err();
        assert!(matches!(err, GeometryError::Json(_)));
        assert!(err.to_string().contains("colors"));
    }

    #[test]
    fn from_json_malformed_text_is_error() {
        let err = Geometry::from_json("{\"positions\": [0, 0,").unwrap_err();
        assert!(matches!(err, GeometryError::Json(_)));
    }

    #[test]
    fn from_json_non_numeric_entry_is_error() {
        let text = r#"{"positions": ["a",0,0,1,0,0,0,1,0], "colors": [1,1,1,1,1,1,1,1,1,1,1,1]}"#;
        assert!(matches!(Geometry::from_json(text), Err(GeometryError::Json(_))));
    }

    // ── default ───────────────────────────────────────────────────────────

    #[test]
    fn default_is_one_triangle() {
        let g = Geometry::default();
        assert_eq!(g.triangle_count(), 1);
        assert_eq!(g.positions().len(), 9);
        assert_eq!(g.colors().len(), 12);
    }
}
