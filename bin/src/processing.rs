use std::fs;
use std::path::Path;
use anyhow::Context;
use serde::Serialize;
use tricolor::draw::DrawMesh;
use tricolor::ellipsoid::RADIANS_PER_DEGREE;
use tricolor::{
    Appearance, AppearanceOptions, Ellipsoid, Geometry, MultiColorTriangleGeometry, Primitive,
    PrimitiveCollection, VertexFormat,
};
use crate::config::Config;
use crate::scene::SceneFile;

/// What was produced for one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SceneReport {
    pub triangles: usize,
    pub vertices: usize,
}

#[derive(Debug, Serialize)]
struct MeshSummary<'a> {
    name: &'a str,
    vertex_count: usize,
    triangle_count: usize,
    index_bytes: usize,
    has_positions: bool,
    bounding_sphere_center: [f64; 3],
    bounding_sphere_radius: f64,
    translucent: bool,
    alpha_blending: bool,
    depth_mask: Option<bool>,
    back_face_culling: bool,
}

impl<'a> MeshSummary<'a> {
    fn new(name: &'a str, primitive: &Primitive) -> Self {
        let geometry = &primitive.geometry;
        let render_state = primitive.appearance.get_render_state();
        let center = geometry.bounding_sphere.center;
        MeshSummary {
            name,
            vertex_count: geometry.vertex_count(),
            triangle_count: geometry.triangle_count(),
            index_bytes: geometry.indices.width(),
            has_positions: geometry.attributes.position.is_some(),
            bounding_sphere_center: [center.x, center.y, center.z],
            bounding_sphere_radius: geometry.bounding_sphere.radius,
            translucent: primitive.appearance.is_translucent(),
            alpha_blending: render_state.blending.is_some_and(|b| b.enabled),
            depth_mask: render_state.depth_mask,
            back_face_culling: render_state.cull_face.is_some(),
        }
    }
}

pub(crate) struct Processor {
    config: Config
}

impl Processor {

    pub(crate) fn new(config: Config) -> Self {
        Processor {
            config
        }
    }

    fn ellipsoid(&self) -> Ellipsoid {
        self.config.geometry.ellipsoid.into()
    }

    fn vertex_format(&self) -> VertexFormat {
        self.config.geometry.vertex_format.into()
    }

    /// Builds the geometry for `scene` and wraps it in a primitive.
    pub(crate) fn build(&self, scene: &SceneFile) -> anyhow::Result<Primitive> {
        let mut options = scene.to_options(self.ellipsoid(), self.vertex_format())?;
        options.granularity = self.config.geometry.granularity * RADIANS_PER_DEGREE;
        options.connect_vertices = self.config.geometry.connect_vertices;

        let geometry = MultiColorTriangleGeometry::new(options)
            .context("Invalid scene geometry")?
            .create_geometry()?;

        let appearance = Appearance::new(AppearanceOptions {
            translucent: self.config.appearance.translucent,
            ..AppearanceOptions::default()
        });

        Ok(Primitive::new(geometry, appearance.clone()).with_depth_fail_appearance(appearance))
    }

    /// Processes one scene file, or the built-in demo scene when `input` is `None`.
    pub(crate) fn process(&self, input: Option<&Path>) -> anyhow::Result<SceneReport> {
        let (scene, asset_name) = match input {
            Some(path) => {
                let name = path.file_stem()
                    .context("Invalid scene filename")?
                    .to_string_lossy()
                    .into_owned();
                (SceneFile::load(path)?, name)
            }
            None => (SceneFile::demo(), "demo".to_string()),
        };

        tracing::info!(
            scene = %asset_name,
            vertices = scene.vertices.len(),
            triangles = scene.triangles.len(),
            positions = scene.positions.len(),
            "processing scene"
        );

        let mut primitives: Vec<Primitive> = Vec::new();
        let index = primitives.add(self.build(&scene)?);
        let primitive = &primitives[index];
        let geometry = &primitive.geometry;

        let output_dir = &self.config.output.output_folder;
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

        if !self.config.output.skip_obj {
            let mesh_path = output_dir.join(format!("{}.obj", asset_name));
            if geometry.attributes.position.is_some() {
                geometry.export_obj(&mesh_path)
                    .with_context(|| format!("Failed to export mesh {}", mesh_path.display()))?;
            } else {
                tracing::warn!(scene = %asset_name, "vertex format drops positions, skipping OBJ export");
            }
        }

        if !self.config.output.skip_summary {
            let summary_path = output_dir.join(format!("{}.json", asset_name));
            let summary = serde_json::to_string_pretty(&MeshSummary::new(&asset_name, primitive))?;
            fs::write(&summary_path, summary)
                .with_context(|| format!("Failed to write summary {}", summary_path.display()))?;
        }

        if !self.config.output.skip_preview {
            self.save_preview(geometry, &output_dir.join(format!("{}_preview.png", asset_name)))?;
        }

        Ok(SceneReport {
            triangles: geometry.triangle_count(),
            vertices: geometry.vertex_count(),
        })
    }

    fn save_preview(&self, geometry: &Geometry, path: &Path) -> anyhow::Result<()> {
        let image = geometry.draw(
            self.config.output.preview_width,
            self.config.output.preview_height,
            &self.ellipsoid(),
        );
        image.save(path)
            .with_context(|| format!("Failed to save preview {}", path.display()))?;
        tracing::debug!(path = %path.display(), "saved preview");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VertexFormatPreset;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("tricolor-{}-{}", name, std::process::id()))
    }

    #[test]
    fn demo_scene_writes_every_output() {
        let mut config = Config::default();
        config.output.output_folder = scratch_dir("demo");
        config.output.preview_width = 64;
        config.output.preview_height = 64;
        let processor = Processor::new(config.clone());

        let report = processor.process(None).unwrap();
        assert_eq!(report, SceneReport { triangles: 4, vertices: 12 });

        let out = &config.output.output_folder;
        assert!(out.join("demo.obj").is_file());
        assert!(out.join("demo_preview.png").is_file());
        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("demo.json")).unwrap()).unwrap();
        assert_eq!(summary["vertex_count"], 12);
        assert_eq!(summary["alpha_blending"], true);
        fs::remove_dir_all(out).ok();
    }

    #[test]
    fn opaque_config_disables_blending() {
        let mut config = Config::default();
        config.appearance.translucent = false;
        let primitive = Processor::new(config).build(&SceneFile::demo()).unwrap();
        assert!(!primitive.appearance.is_translucent());
        assert_eq!(primitive.appearance.get_render_state().depth_mask, Some(true));
    }

    #[test]
    fn strict_vertex_format_fails_the_build() {
        let mut config = Config::default();
        config.geometry.vertex_format = VertexFormatPreset::All;
        assert!(Processor::new(config).build(&SceneFile::demo()).is_err());
    }
}
