use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tricolor::{Ellipsoid, VertexFormat};

#[derive(Clone, Copy, ValueEnum, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum VertexFormatPreset {
    /// Positions only; colors are still carried but not required
    PositionOnly,
    /// Positions and per-vertex colors
    #[default]
    PositionAndColor,
    /// Every attribute, including normals, tangents and texture coordinates
    All,
}

impl From<VertexFormatPreset> for VertexFormat {
    fn from(preset: VertexFormatPreset) -> Self {
        match preset {
            VertexFormatPreset::PositionOnly => VertexFormat::POSITION_ONLY,
            VertexFormatPreset::PositionAndColor => VertexFormat::POSITION_AND_COLOR,
            VertexFormatPreset::All => VertexFormat::ALL,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum EllipsoidPreset {
    /// WGS84 reference ellipsoid
    #[default]
    Wgs84,
    /// Sphere of radius 1
    UnitSphere,
}

impl From<EllipsoidPreset> for Ellipsoid {
    fn from(preset: EllipsoidPreset) -> Self {
        match preset {
            EllipsoidPreset::Wgs84 => Ellipsoid::wgs84(),
            EllipsoidPreset::UnitSphere => Ellipsoid::unit_sphere(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Config {
    /// Input setting
    #[serde(default)]
    pub input: InputConfig,
    /// Geometry construction parameters
    #[serde(default)]
    pub geometry: GeometryConfig,
    /// Appearance parameters
    #[serde(default)]
    pub appearance: AppearanceConfig,
    /// Batch processing settings
    #[serde(default)]
    pub batch: BatchConfig,
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct InputConfig {
    /// Scene file or directory; the built-in demo scene when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct GeometryConfig {
    /// Attributes every vertex must carry
    #[serde(default)]
    pub vertex_format: VertexFormatPreset,
    /// Reference surface the mesh is flattened onto
    #[serde(default)]
    pub ellipsoid: EllipsoidPreset,
    /// Sampling granularity in degrees
    #[serde(default = "default_granularity")]
    pub granularity: f64,
    /// Attempt to link vertices shared between triangles
    #[serde(default)]
    pub connect_vertices: bool,
}

fn default_granularity() -> f64 {
    1.0
}

impl Default for GeometryConfig {
    fn default() -> Self {
        GeometryConfig {
            vertex_format: VertexFormatPreset::PositionAndColor,
            ellipsoid: EllipsoidPreset::Wgs84,
            granularity: default_granularity(),
            connect_vertices: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AppearanceConfig {
    /// Enable alpha blending
    #[serde(default = "default_translucent")]
    pub translucent: bool,
}

fn default_translucent() -> bool {
    true
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        AppearanceConfig {
            translucent: default_translucent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct BatchConfig {
    /// File patterns to include in batch processing
    pub include_patterns: Vec<String>,
    /// File patterns to exclude from batch processing
    pub exclude_patterns: Vec<String>,
    /// Number of parallel workers for batch processing
    pub workers: usize,
    /// Continue batch processing even if some files fail
    pub continue_on_error: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            include_patterns: vec!["*.json".to_string(), "*.toml".to_string()],
            exclude_patterns: vec![],
            workers: 1,
            continue_on_error: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct OutputConfig {
    /// Output folder for generated files
    pub output_folder: PathBuf,
    /// Skip writing the OBJ mesh
    pub skip_obj: bool,
    /// Skip writing the JSON mesh summary
    pub skip_summary: bool,
    /// Skip rendering the PNG preview
    pub skip_preview: bool,
    /// Preview width in pixels
    pub preview_width: u32,
    /// Preview height in pixels
    pub preview_height: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            output_folder: PathBuf::from("output"),
            skip_obj: false,
            skip_summary: false,
            skip_preview: false,
            preview_width: 512,
            preview_height: 512,
        }
    }
}

impl Config {

    pub fn load(config_path: &Path) -> anyhow::Result<Config> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let config: Config = match config_path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&config_str)?,
            Some("toml") => toml::from_str(&config_str)?,
            _ => bail!("Unsupported config file format. Use .json or .toml"),
        };
        Ok(config)
    }

    pub fn save_default(config_path: &Path) -> anyhow::Result<()> {
        let config = Config::default();
        let config_str = match config_path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::to_string_pretty(&config)?,
            _ => serde_json::to_string_pretty(&config)?, // Default to JSON
        };

        let mut file = File::create(config_path)?;
        file.write_all(config_str.as_bytes())?;
        tracing::info!("Generated default configuration file: {}", config_path.display());
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.appearance.translucent);
        assert_eq!(config.geometry.vertex_format, VertexFormatPreset::PositionAndColor);
        assert_eq!(config.geometry.granularity, 1.0);
    }

    #[test]
    fn default_round_trips_through_json() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        let config: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config.batch.include_patterns, vec!["*.json", "*.toml"]);
        assert_eq!(config.output.preview_width, 512);
    }

    #[test]
    fn presets_map_to_library_values() {
        assert_eq!(VertexFormat::from(VertexFormatPreset::All), VertexFormat::ALL);
        assert_eq!(Ellipsoid::from(EllipsoidPreset::UnitSphere), Ellipsoid::unit_sphere());
    }
}
