use std::fmt;

/// A per-vertex attribute that a [`VertexFormat`] can request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    Position,
    Normal,
    TexCoord,
    Tangent,
    Binormal,
    Color,
}

impl fmt::Display for VertexAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexAttribute::Position => f.write_str("position"),
            VertexAttribute::Normal => f.write_str("normal"),
            VertexAttribute::TexCoord => f.write_str("tex_coord"),
            VertexAttribute::Tangent => f.write_str("tangent"),
            VertexAttribute::Binormal => f.write_str("binormal"),
            VertexAttribute::Color => f.write_str("color"),
        }
    }
}

/// Selects which attributes a vertex must carry and which survive into the
/// final mesh buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct VertexFormat {
    pub position: bool,
    pub normal: bool,
    pub tex_coord: bool,
    pub tangent: bool,
    pub binormal: bool,
    pub color: bool,
}

impl VertexFormat {
    pub const POSITION_ONLY: VertexFormat = VertexFormat {
        position: true,
        normal: false,
        tex_coord: false,
        tangent: false,
        binormal: false,
        color: false,
    };

    pub const POSITION_AND_COLOR: VertexFormat = VertexFormat {
        color: true,
        ..VertexFormat::POSITION_ONLY
    };

    pub const ALL: VertexFormat = VertexFormat {
        position: true,
        normal: true,
        tex_coord: true,
        tangent: true,
        binormal: true,
        color: true,
    };

    #[inline]
    #[must_use]
    pub fn requires(&self, attribute: VertexAttribute) -> bool {
        match attribute {
            VertexAttribute::Position => self.position,
            VertexAttribute::Normal => self.normal,
            VertexAttribute::TexCoord => self.tex_coord,
            VertexAttribute::Tangent => self.tangent,
            VertexAttribute::Binormal => self.binormal,
            VertexAttribute::Color => self.color,
        }
    }
}

impl Default for VertexFormat {
    fn default() -> Self {
        VertexFormat::POSITION_AND_COLOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_position_and_color() {
        let format = VertexFormat::default();
        assert!(format.requires(VertexAttribute::Position));
        assert!(format.requires(VertexAttribute::Color));
        assert!(!format.requires(VertexAttribute::Normal));
        assert!(!format.requires(VertexAttribute::TexCoord));
    }

    #[test]
    fn position_only_drops_color() {
        assert!(!VertexFormat::POSITION_ONLY.requires(VertexAttribute::Color));
    }
}
