//! The component contract: what the renderer knows about the things it draws.

use lyon::math::Point;
use serde::{Deserialize, Serialize};

use circuitkit_core::units::Size;
use circuitkit_settings::DocumentDefaults;

use crate::recorder::GraphicsRecorder;

/// Stable identity of a component within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub u64);

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a component is asked to present itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DrawState {
    #[default]
    Normal,
    Selected,
    Dragging,
}

/// When a control point is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisibilityPolicy {
    Never,
    WhenSelected,
    Always,
}

/// A draggable handle of a component, positioned in document pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub position: Point,
    pub visibility: VisibilityPolicy,
}

impl ControlPoint {
    pub fn new(position: Point, visibility: VisibilityPolicy) -> Self {
        Self {
            position,
            visibility,
        }
    }
}

/// The page being drawn: only its size and grid are relevant here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub width: Size,
    pub height: Size,
    pub grid_spacing: Size,
}

impl Document {
    pub fn new(name: impl Into<String>, width: Size, height: Size) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            grid_spacing: DocumentDefaults::default().grid_spacing,
        }
    }

    pub fn from_defaults(name: impl Into<String>, defaults: &DocumentDefaults) -> Self {
        Self {
            name: name.into(),
            width: defaults.width,
            height: defaults.height,
            grid_spacing: defaults.grid_spacing,
        }
    }

    pub fn with_grid_spacing(mut self, spacing: Size) -> Self {
        self.grid_spacing = spacing;
        self
    }
}

/// A self-drawing scene element.
///
/// `draw` issues primitives on the recorder, which forwards them to the real
/// surface and records the covered area. Components mark their conductive
/// parts with [`GraphicsRecorder::start_tracking_continuity_area`].
/// Errors and panics are contained by the renderer.
pub trait Drawable {
    fn id(&self) -> ComponentId;

    fn name(&self) -> &str;

    fn draw(
        &self,
        g: &mut GraphicsRecorder<'_>,
        state: DrawState,
        outline_mode: bool,
        document: &Document,
    ) -> anyhow::Result<()>;

    /// Handles in document pixels, in a stable order.
    fn control_points(&self) -> Vec<ControlPoint> {
        Vec::new()
    }
}

/// Decides which components take part in a render pass.
pub trait ComponentFilter {
    fn accepts(&self, component: &dyn Drawable) -> bool;
}

impl<F> ComponentFilter for F
where
    F: Fn(&dyn Drawable) -> bool,
{
    fn accepts(&self, component: &dyn Drawable) -> bool {
        self(component)
    }
}
