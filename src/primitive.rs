use crate::appearance::Appearance;
use crate::mesh::Geometry;

/// A geometry paired with the appearance a renderer should draw it with.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub geometry: Geometry,
    pub appearance: Appearance,
    /// Used where the geometry fails the depth test.
    pub depth_fail_appearance: Option<Appearance>,
    /// Geometry is always prepared eagerly before hand-off.
    pub asynchronous: bool,
}

impl Primitive {
    pub fn new(geometry: Geometry, appearance: Appearance) -> Self {
        Self {
            geometry,
            appearance,
            depth_fail_appearance: None,
            asynchronous: false,
        }
    }

    #[must_use]
    pub fn with_depth_fail_appearance(mut self, appearance: Appearance) -> Self {
        self.depth_fail_appearance = Some(appearance);
        self
    }
}

/// The host scene's list of things to draw.
pub trait PrimitiveCollection {
    /// Adds a primitive and returns its position in the collection.
    fn add(&mut self, primitive: Primitive) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PrimitiveCollection for Vec<Primitive> {
    fn add(&mut self, primitive: Primitive) -> usize {
        self.push(primitive);
        self.len() - 1
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}
