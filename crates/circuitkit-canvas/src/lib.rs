//! # CircuitKit Canvas
//!
//! Drawing and area-tracking engine for schematic and PCB layouts. Components
//! draw themselves onto a [`Surface`]; every primitive they issue is also folded
//! into a [`ComponentArea`] describing what the component covers and which parts
//! of it conduct.
//!
//! ## Architecture
//!
//! ```text
//! SceneRenderer (one repaint pass, z-order, hit-testing)
//!   ├── AreaCache (ComponentId -> ComponentArea + DrawState)
//!   ├── ResourceCache (zoom-compensated strokes)
//!   └── GraphicsRecorder (Surface proxy, one session per component)
//!         ├── Region (CSG area algebra)
//!         └── Surface (PixmapSurface, HeadlessSurface)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use circuitkit_canvas::{PixmapSurface, RenderContext, SceneRenderer};
//!
//! let mut renderer = SceneRenderer::new(circuitkit_core::event_bus());
//! let mut surface = PixmapSurface::new(800, 600)?;
//! let failed = renderer.render(&mut surface, &document, &components, &RenderContext::default());
//! let hits = renderer.find_components_at(point(120.0, 80.0), &components);
//! ```

pub mod area;
pub mod cache;
pub mod component;
pub mod font_manager;
pub mod geometry;
pub mod grid;
pub mod headless;
pub mod pixmap_surface;
pub mod recorder;
pub mod region;
pub mod renderer;
pub mod resources;
pub mod surface;

pub use area::ComponentArea;
pub use cache::AreaCache;
pub use component::{
    ComponentFilter, ComponentId, ControlPoint, Document, DrawState, Drawable, VisibilityPolicy,
};
pub use geometry::{ArcKind, PathSignature};
pub use headless::{DrawCall, HeadlessSurface};
pub use pixmap_surface::PixmapSurface;
pub use recorder::{GraphicsRecorder, DEFAULT_TOLERANCE, MIN_TRACKED_STROKE_WIDTH};
pub use region::Region;
pub use renderer::{canvas_dimensions, canvas_pixel_size, DrawOptions, RenderContext, SceneRenderer};
pub use resources::ResourceCache;
pub use surface::{
    Color, Composite, Font, Image, LineCap, LineJoin, RenderHints, RenderQuality, StrokeStyle,
    Surface, SurfaceState, TextMetrics,
};

pub use lyon::math::{point, vector, Angle, Box2D, Point, Transform};
pub use lyon::path::Path;
