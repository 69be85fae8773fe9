use crate::vertex_format::VertexFormat;

pub const DEFAULT_VERTEX_SHADER_SOURCE: &str = include_str!("shaders/multi_color.vert");
pub const DEFAULT_FRAGMENT_SHADER_SOURCE: &str = include_str!("shaders/multi_color.frag");

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlendEquation {
    Add,
    Subtract,
    ReverseSubtract,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlendFunction {
    Zero,
    One,
    SourceAlpha,
    OneMinusSourceAlpha,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlendingState {
    pub enabled: bool,
    pub equation_rgb: BlendEquation,
    pub equation_alpha: BlendEquation,
    pub function_source_rgb: BlendFunction,
    pub function_source_alpha: BlendFunction,
    pub function_destination_rgb: BlendFunction,
    pub function_destination_alpha: BlendFunction,
}

impl BlendingState {
    pub const DISABLED: BlendingState = BlendingState {
        enabled: false,
        equation_rgb: BlendEquation::Add,
        equation_alpha: BlendEquation::Add,
        function_source_rgb: BlendFunction::One,
        function_source_alpha: BlendFunction::One,
        function_destination_rgb: BlendFunction::Zero,
        function_destination_alpha: BlendFunction::Zero,
    };

    pub const ALPHA_BLEND: BlendingState = BlendingState {
        enabled: true,
        equation_rgb: BlendEquation::Add,
        equation_alpha: BlendEquation::Add,
        function_source_rgb: BlendFunction::SourceAlpha,
        function_source_alpha: BlendFunction::One,
        function_destination_rgb: BlendFunction::OneMinusSourceAlpha,
        function_destination_alpha: BlendFunction::OneMinusSourceAlpha,
    };
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CullFace {
    Front,
    Back,
    FrontAndBack,
}

/// Fixed-function state. `None` leaves the renderer's default in place.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RenderState {
    pub depth_test: Option<bool>,
    pub depth_mask: Option<bool>,
    pub blending: Option<BlendingState>,
    pub cull_face: Option<CullFace>,
}

impl RenderState {
    /// Depth testing always; alpha blending without depth writes when
    /// translucent; back-face culling only for closed surfaces.
    pub fn default_for(translucent: bool, closed: bool) -> Self {
        let mut state = RenderState {
            depth_test: Some(true),
            ..RenderState::default()
        };
        if translucent {
            state.depth_mask = Some(false);
            state.blending = Some(BlendingState::ALPHA_BLEND);
        }
        if closed {
            state.cull_face = Some(CullFace::Back);
        }
        state
    }

    /// Fields set in `self` take precedence over `fallback`.
    #[must_use]
    pub fn or(self, fallback: RenderState) -> Self {
        RenderState {
            depth_test: self.depth_test.or(fallback.depth_test),
            depth_mask: self.depth_mask.or(fallback.depth_mask),
            blending: self.blending.or(fallback.blending),
            cull_face: self.cull_face.or(fallback.cull_face),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppearanceOptions {
    pub translucent: bool,
    pub vertex_shader_source: Option<String>,
    pub fragment_shader_source: Option<String>,
    /// Overrides individual fields of the derived render state.
    pub render_state: Option<RenderState>,
}

impl Default for AppearanceOptions {
    fn default() -> Self {
        Self {
            translucent: true,
            vertex_shader_source: None,
            fragment_shader_source: None,
            render_state: None,
        }
    }
}

/// Shader pair and render state for drawing per-vertex colored triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    translucent: bool,
    closed: bool,
    vertex_shader_source: String,
    fragment_shader_source: String,
    render_state: RenderState,
    vertex_format: VertexFormat,
}

impl Appearance {
    /// The format every appearance of this kind is compatible with.
    pub const VERTEX_FORMAT: VertexFormat = VertexFormat::POSITION_AND_COLOR;

    pub fn new(options: AppearanceOptions) -> Self {
        let closed = false;
        let defaults = RenderState::default_for(options.translucent, closed);
        let render_state = match options.render_state {
            Some(overrides) => overrides.or(defaults),
            None => defaults,
        };
        Self {
            translucent: options.translucent,
            closed,
            vertex_shader_source: options
                .vertex_shader_source
                .unwrap_or_else(|| DEFAULT_VERTEX_SHADER_SOURCE.to_string()),
            fragment_shader_source: options
                .fragment_shader_source
                .unwrap_or_else(|| DEFAULT_FRAGMENT_SHADER_SOURCE.to_string()),
            render_state,
            vertex_format: Self::VERTEX_FORMAT,
        }
    }

    #[inline]
    pub fn translucent(&self) -> bool {
        self.translucent
    }

    /// Always `false`: the surface is open, so back faces stay visible.
    #[inline]
    pub fn closed(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn vertex_shader_source(&self) -> &str {
        &self.vertex_shader_source
    }

    #[inline]
    pub fn fragment_shader_source(&self) -> &str {
        &self.fragment_shader_source
    }

    #[inline]
    pub fn render_state(&self) -> &RenderState {
        &self.render_state
    }

    #[inline]
    pub fn vertex_format(&self) -> &VertexFormat {
        &self.vertex_format
    }

    /// No material is involved, so this is the fragment source unchanged.
    pub fn get_fragment_shader_source(&self) -> String {
        self.fragment_shader_source.clone()
    }

    pub fn is_translucent(&self) -> bool {
        self.translucent
    }

    /// The render state to draw with, with blending and depth writes
    /// matching [`Appearance::is_translucent`].
    pub fn get_render_state(&self) -> RenderState {
        let mut state = self.render_state;
        if self.is_translucent() {
            state.depth_mask = Some(false);
            state.blending = Some(BlendingState::ALPHA_BLEND);
        } else {
            state.depth_mask = Some(true);
        }
        state
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Self::new(AppearanceOptions::default())
    }
}
