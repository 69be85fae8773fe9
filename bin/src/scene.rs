use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tricolor::demo::{DEMO_ALPHA, DEMO_COLORS, DEMO_LOCATIONS, DEMO_TRIANGLES};
use tricolor::{
    Color, Ellipsoid, GeometryOptions, Triangle, Vertex, VertexAttributes, VertexFormat,
};

/// A scene file: named vertices joined into triangles, and/or loose
/// positions where every three form a triangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct SceneFile {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vertices: Vec<SceneVertex>,
    /// Index triples into `vertices`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triangles: Vec<[usize; 3]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<ScenePosition>,
    /// One RGBA color per entry of `positions`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<[f32; 4]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SceneVertex {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Degrees
    pub longitude: f64,
    /// Degrees
    pub latitude: f64,
    /// Meters above the ellipsoid
    #[serde(default)]
    pub height: f64,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ScenePosition {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default)]
    pub height: f64,
}

impl SceneFile {

    pub fn demo() -> Self {
        let vertices = DEMO_LOCATIONS
            .iter()
            .zip(DEMO_COLORS)
            .enumerate()
            .map(|(i, (&(longitude, latitude, height), color))| {
                let color = color.with_alpha(DEMO_ALPHA);
                SceneVertex {
                    id: Some(format!("vertex-{i}")),
                    longitude,
                    latitude,
                    height,
                    color: [color.red, color.green, color.blue, color.alpha],
                }
            })
            .collect();
        SceneFile {
            vertices,
            triangles: DEMO_TRIANGLES.to_vec(),
            ..SceneFile::default()
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let scene_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene {}", path.display()))?;
        let scene = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&scene_str)?,
            Some("toml") => toml::from_str(&scene_str)?,
            _ => bail!("Unsupported scene file format. Use .json or .toml"),
        };
        Ok(scene)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let scene_str = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::to_string_pretty(self)?,
            _ => serde_json::to_string_pretty(self)?,
        };
        let mut file = File::create(path)?;
        file.write_all(scene_str.as_bytes())?;
        Ok(())
    }

    /// Converts the scene into geometry options, validating each vertex
    /// against `vertex_format`.
    pub fn to_options(
        &self,
        ellipsoid: Ellipsoid,
        vertex_format: VertexFormat,
    ) -> anyhow::Result<GeometryOptions> {
        let vertices = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mut attributes = VertexAttributes::default()
                    .with_position(ellipsoid.from_degrees(v.longitude, v.latitude, v.height))
                    .with_color(Color::from(v.color));
                attributes.id = v.id.clone();
                Vertex::new(attributes, vertex_format)
                    .map(Rc::new)
                    .with_context(|| format!("Invalid vertex {}", i))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let triangles = self
            .triangles
            .iter()
            .enumerate()
            .map(|(i, corners)| -> anyhow::Result<Triangle> {
                let corners = corners
                    .iter()
                    .map(|&index| {
                        vertices.get(index).cloned().with_context(|| {
                            format!("Triangle {} refers to missing vertex {}", i, index)
                        })
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;
                Ok(Triangle::with_format(None, corners, vertex_format)?)
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let positions: Vec<_> = self
            .positions
            .iter()
            .map(|p| ellipsoid.from_degrees(p.longitude, p.latitude, p.height))
            .collect();
        let colors: Vec<Color> = self.colors.iter().copied().map(Color::from).collect();

        Ok(GeometryOptions {
            triangles: (!triangles.is_empty()).then_some(triangles),
            positions: (!positions.is_empty()).then_some(positions),
            colors: (!colors.is_empty()).then_some(colors),
            ellipsoid,
            vertex_format,
            ..GeometryOptions::default()
        })
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_scene_survives_toml() {
        let scene = SceneFile::demo();
        let text = toml::to_string_pretty(&scene).unwrap();
        let parsed: SceneFile = toml::from_str(&text).unwrap();
        assert_eq!(parsed.vertices.len(), 5);
        assert_eq!(parsed.triangles, DEMO_TRIANGLES.to_vec());
    }

    #[test]
    fn positions_mode_from_json() {
        let scene: SceneFile = serde_json::from_str(
            r#"{
                "positions": [
                    {"longitude": 0.0, "latitude": 0.0},
                    {"longitude": 1.0, "latitude": 0.0},
                    {"longitude": 0.0, "latitude": 1.0}
                ],
                "colors": [[1, 0, 0, 1], [0, 1, 0, 1], [0, 0, 1, 1]]
            }"#,
        )
        .unwrap();
        let options = scene
            .to_options(Ellipsoid::wgs84(), VertexFormat::POSITION_AND_COLOR)
            .unwrap();
        assert!(options.triangles.is_none());
        assert_eq!(options.positions.map(|p| p.len()), Some(3));
        assert_eq!(options.colors.map(|c| c.len()), Some(3));
    }

    #[test]
    fn out_of_range_triangle_is_an_error() {
        let mut scene = SceneFile::demo();
        scene.triangles.push([0, 1, 9]);
        let err = scene
            .to_options(Ellipsoid::wgs84(), VertexFormat::POSITION_AND_COLOR)
            .unwrap_err();
        assert!(err.to_string().contains("missing vertex 9"));
    }

    #[test]
    fn strict_format_rejects_plain_vertices() {
        let err = SceneFile::demo()
            .to_options(Ellipsoid::wgs84(), VertexFormat::ALL)
            .unwrap_err();
        assert!(err.to_string().contains("Invalid vertex 0"));
    }
}
