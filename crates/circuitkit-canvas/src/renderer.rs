//! Scene repaint orchestration and hit-testing.
//!
//! [`SceneRenderer`] draws a list of components in z-order through a
//! [`GraphicsRecorder`], keeps the recorded [`ComponentArea`]s in an
//! [`AreaCache`] and answers point queries against that cache.
//!
//! Cached areas are expressed in the device pixel frame of the pass that
//! recorded them. When the surface transform or zoom changes between passes
//! the whole cache is dropped.

use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use lyon::math::{Box2D, Point, Transform};
use tracing::{debug, error, trace, warn};

use circuitkit_core::{AppEvent, ErrorEvent, EventBus, RenderError, RenderEvent};
use circuitkit_settings::{Config, GridType, RenderSettings, ThemeSettings};

use crate::area::ComponentArea;
use crate::cache::AreaCache;
use crate::component::{
    ComponentFilter, ComponentId, Document, DrawState, Drawable, VisibilityPolicy,
};
use crate::grid;
use crate::recorder::{GraphicsRecorder, DEFAULT_TOLERANCE};
use crate::region::Region;
use crate::resources::ResourceCache;
use crate::surface::{
    Color, Composite, RenderHints, RenderQuality, StrokeStyle, Surface, SurfaceState,
};

/// Side of a control point marker in device pixels.
pub const CONTROL_POINT_SIZE: f32 = 5.0;

/// Side of a hovered control point marker in device pixels.
pub const HOVERED_CONTROL_POINT_SIZE: f32 = 7.0;

const SELECTION_DASH: [f32; 2] = [4.0, 4.0];

/// Per-pass rendering switches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOptions {
    pub zoom_enabled: bool,
    pub antialiasing: bool,
    pub high_quality: bool,
    pub grid_type: GridType,
    pub show_control_points: bool,
    pub selection_highlighting: bool,
    pub outline_mode: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self::from(&RenderSettings::default())
    }
}

impl From<&RenderSettings> for DrawOptions {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            zoom_enabled: settings.zoom_enabled,
            antialiasing: settings.antialiasing,
            high_quality: settings.high_quality,
            grid_type: settings.grid_type,
            show_control_points: settings.show_control_points,
            selection_highlighting: settings.selection_highlighting,
            outline_mode: settings.outline_mode,
        }
    }
}

impl DrawOptions {
    fn hints(&self) -> RenderHints {
        RenderHints {
            antialias: self.antialiasing,
            quality: if self.high_quality {
                RenderQuality::Quality
            } else {
                RenderQuality::Speed
            },
        }
    }
}

/// Everything about the editor state a render pass needs besides the
/// components themselves.
#[derive(Default)]
pub struct RenderContext<'a> {
    pub options: DrawOptions,
    /// Components rejected by the filter are neither drawn nor cached.
    pub filter: Option<&'a dyn ComponentFilter>,
    pub selected: HashSet<ComponentId>,
    pub locked: HashSet<ComponentId>,
    pub grouped: HashSet<ComponentId>,
    /// Hovered control points, by component and control point index.
    pub control_point_preview: HashMap<ComponentId, HashSet<usize>>,
    /// Components not yet placed, drawn translucently over the scene.
    pub component_preview: Vec<&'a dyn Drawable>,
    pub dragging: bool,
    /// Rubber-band selection in device pixels.
    pub selection_rect: Option<Box2D>,
}

impl<'a> RenderContext<'a> {
    pub fn new(options: DrawOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The state `id` is drawn in during this pass.
    pub fn draw_state(&self, id: ComponentId) -> DrawState {
        if self.options.selection_highlighting && self.selected.contains(&id) {
            if self.dragging {
                DrawState::Dragging
            } else {
                DrawState::Selected
            }
        } else {
            DrawState::Normal
        }
    }

    fn accepts(&self, component: &dyn Drawable) -> bool {
        self.filter.map_or(true, |f| f.accepts(component))
    }
}

/// Document size in device pixels, times `zoom` when `use_zoom` is set.
pub fn canvas_dimensions(document: &Document, zoom: f64, use_zoom: bool) -> (f64, f64) {
    let factor = if use_zoom { zoom } else { 1.0 };
    (
        document.width.to_pixels() * factor,
        document.height.to_pixels() * factor,
    )
}

/// Whole-pixel surface size needed to show `document` at `zoom`.
pub fn canvas_pixel_size(document: &Document, zoom: f64) -> (u32, u32) {
    let (w, h) = canvas_dimensions(document, zoom, true);
    (w.ceil().max(1.0) as u32, h.ceil().max(1.0) as u32)
}

pub struct SceneRenderer {
    cache: AreaCache,
    cache_frame: Option<Transform>,
    resources: ResourceCache,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    theme: ThemeSettings,
    options: DrawOptions,
    tolerance: f32,
    locked_composite: Composite,
    preview_composite: Composite,
    events: Arc<EventBus>,
}

impl SceneRenderer {
    pub fn new(events: Arc<EventBus>) -> Self {
        Self::from_config(&Config::default(), events)
    }

    pub fn from_config(config: &Config, events: Arc<EventBus>) -> Self {
        let render = &config.render;
        Self {
            cache: AreaCache::new(),
            cache_frame: None,
            resources: ResourceCache::new(),
            zoom: render.default_zoom.clamp(render.min_zoom, render.max_zoom),
            min_zoom: render.min_zoom,
            max_zoom: render.max_zoom,
            theme: config.theme.clone(),
            options: DrawOptions::from(render),
            tolerance: if render.curve_tolerance > 0.0 {
                render.curve_tolerance
            } else {
                DEFAULT_TOLERANCE
            },
            locked_composite: Composite::alpha(render.locked_alpha),
            preview_composite: Composite::alpha(render.preview_alpha),
            events,
        }
    }

    /// Options taken from the configuration this renderer was built with.
    pub fn default_options(&self) -> DrawOptions {
        self.options
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_range(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), RenderError> {
        if !zoom.is_finite() || zoom < self.min_zoom || zoom > self.max_zoom {
            return Err(RenderError::InvalidZoom {
                zoom,
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        let old = self.zoom;
        if old == zoom {
            return Ok(());
        }
        self.zoom = zoom;
        debug!("Zoom changed {} -> {}", old, zoom);
        self.events
            .notify(AppEvent::Render(RenderEvent::ZoomChanged { old, new: zoom }));
        Ok(())
    }

    pub fn theme(&self) -> &ThemeSettings {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: ThemeSettings) {
        debug!("Theme changed to {}", theme.name);
        let name = theme.name.clone();
        self.theme = theme;
        self.events
            .notify(AppEvent::Render(RenderEvent::ThemeChanged { name }));
    }

    /// Document size in pixels at the current zoom.
    pub fn canvas_dimensions(&self, document: &Document, use_zoom: bool) -> (f64, f64) {
        canvas_dimensions(document, self.zoom, use_zoom)
    }

    /// Repaint the whole scene. Returns the components whose draw routine
    /// failed during this pass, each listed once.
    pub fn render(
        &mut self,
        surface: &mut dyn Surface,
        document: &Document,
        components: &[&dyn Drawable],
        ctx: &RenderContext<'_>,
    ) -> Vec<ComponentId> {
        let zoom = if ctx.options.zoom_enabled { self.zoom } else { 1.0 };
        let (width, height) = canvas_dimensions(document, zoom, true);
        debug!(
            "Rendering {} components at zoom {} ({:.0}x{:.0} px)",
            components.len(),
            zoom,
            width,
            height
        );

        let initial = SurfaceState::capture(&*surface);
        surface.set_hints(ctx.options.hints());
        surface.clear(Color::from(self.theme.background));

        if ctx.options.grid_type != GridType::None {
            let spacing = document.grid_spacing.to_pixels() * zoom;
            grid::draw_grid(
                &mut *surface,
                ctx.options.grid_type,
                spacing,
                width,
                height,
                Color::from(self.theme.grid),
                Color::from(self.theme.major_grid),
            );
        }

        let frame = initial.transform.pre_scale(zoom as f32, zoom as f32);
        if self.cache_frame != Some(frame) {
            if self.cache_frame.is_some() {
                self.drop_cache("drawing frame changed");
            }
            self.cache_frame = Some(frame);
        }
        surface.set_transform(frame);

        let mut failed = Vec::new();
        {
            let mut g = GraphicsRecorder::new(&mut *surface, &mut self.resources, zoom)
                .with_tolerance(self.tolerance);

            for &component in components {
                if !ctx.accepts(component) {
                    continue;
                }
                let id = component.id();
                let state = ctx.draw_state(id);

                let reuse = self.cache.get_valid(id, state).is_some();
                if reuse {
                    trace!("Area cache hit for {} #{}", component.name(), id);
                    g.begin_without_recording();
                } else {
                    if self.cache.invalidate(id) {
                        trace!("Draw state of {} #{} changed, recomputing", component.name(), id);
                    }
                    g.begin();
                }
                if ctx.locked.contains(&id) {
                    g.force_composite(self.locked_composite);
                }

                let outcome =
                    draw_guarded(component, &mut g, state, ctx.options.outline_mode, document);
                let area = g.end();

                match outcome {
                    Ok(()) if !reuse && !area.is_empty() => {
                        self.cache.insert(id, area, state);
                    }
                    Ok(()) => {}
                    Err(reason) => {
                        if self.cache.invalidate(id) {
                            debug!("Dropped cached area of failed #{}", id);
                        }
                        report_failure(&self.events, &mut failed, component, reason);
                    }
                }
            }
        }

        if ctx.options.show_control_points {
            surface.set_transform(initial.transform);
            self.draw_control_points(&mut *surface, components, ctx, &frame);
        }

        if !ctx.component_preview.is_empty() {
            surface.set_transform(frame);
            let mut g = GraphicsRecorder::new(&mut *surface, &mut self.resources, zoom)
                .with_tolerance(self.tolerance);
            for &component in &ctx.component_preview {
                g.begin_without_recording();
                g.force_composite(self.preview_composite);
                let outcome = draw_guarded(
                    component,
                    &mut g,
                    DrawState::Normal,
                    ctx.options.outline_mode,
                    document,
                );
                g.end();
                if let Err(reason) = outcome {
                    report_failure(&self.events, &mut failed, component, reason);
                }
            }
        }

        if let Some(rect) = ctx.selection_rect {
            surface.set_transform(initial.transform);
            surface.set_composite(Composite::OPAQUE);
            surface.set_stroke(StrokeStyle::new(1.0).with_dash(SELECTION_DASH.to_vec()));
            surface.set_color(Color::from(self.theme.selection_rect));
            surface.draw_rect(rect.min.x, rect.min.y, rect.width(), rect.height());
        }

        initial.restore(&mut *surface);
        failed
    }

    fn draw_control_points(
        &self,
        surface: &mut dyn Surface,
        components: &[&dyn Drawable],
        ctx: &RenderContext<'_>,
        frame: &Transform,
    ) {
        let normal = Color::from(self.theme.control_point);
        let selected = Color::from(self.theme.selected_control_point);
        let hovered = Color::from(self.theme.hovered_control_point);
        surface.set_composite(Composite::OPAQUE);
        surface.set_stroke(StrokeStyle::new(1.0));

        // unselected and grouped components first
        for &component in components.iter().filter(|c| ctx.accepts(**c)) {
            let id = component.id();
            let is_selected = ctx.selected.contains(&id);
            let is_grouped = ctx.grouped.contains(&id);
            if is_selected && !is_grouped {
                continue;
            }
            for point in component.control_points() {
                let visible = match point.visibility {
                    VisibilityPolicy::Always => true,
                    VisibilityPolicy::WhenSelected => is_grouped && is_selected,
                    VisibilityPolicy::Never => false,
                };
                if visible {
                    let at = frame.transform_point(point.position);
                    draw_marker(surface, at, normal, CONTROL_POINT_SIZE);
                }
            }
        }

        for &component in components.iter().filter(|c| ctx.accepts(**c)) {
            let id = component.id();
            if !ctx.selected.contains(&id) || ctx.grouped.contains(&id) {
                continue;
            }
            for point in component.control_points() {
                if point.visibility != VisibilityPolicy::Never {
                    let at = frame.transform_point(point.position);
                    draw_marker(surface, at, selected, CONTROL_POINT_SIZE);
                }
            }
        }

        // hover markers on top of everything else
        for &component in components.iter().filter(|c| ctx.accepts(**c)) {
            let Some(indices) = ctx.control_point_preview.get(&component.id()) else {
                continue;
            };
            for (index, point) in component.control_points().into_iter().enumerate() {
                if indices.contains(&index) {
                    draw_marker(
                        surface,
                        frame.transform_point(point.position),
                        hovered,
                        HOVERED_CONTROL_POINT_SIZE,
                    );
                }
            }
        }
    }

    /// Forget the cached area of `id`; the next pass recomputes it.
    pub fn invalidate(&mut self, id: ComponentId) {
        if self.cache.invalidate(id) {
            debug!("Invalidated cached area of #{}", id);
        }
    }

    /// Drop every cached area, for example when a project is loaded.
    pub fn clear_cache(&mut self) {
        self.drop_cache("cleared");
    }

    fn drop_cache(&mut self, reason: &str) {
        let entries = self.cache.clear();
        debug!("Area cache {} ({} entries)", reason, entries);
        self.events
            .notify(AppEvent::Render(RenderEvent::CacheCleared { entries }));
    }

    pub fn cache(&self) -> &AreaCache {
        &self.cache
    }

    pub fn component_area(&self, id: ComponentId) -> Option<Arc<ComponentArea>> {
        self.cache.get(id)
    }

    /// Components whose cached area contains `point`, topmost first.
    pub fn find_components_at(
        &self,
        point: Point,
        components: &[&dyn Drawable],
    ) -> Vec<ComponentId> {
        let mut hits: Vec<ComponentId> = components
            .iter()
            .map(|c| c.id())
            .filter(|id| self.cache.get(*id).is_some_and(|area| area.contains(point)))
            .collect();
        hits.reverse();
        hits
    }

    /// Positive continuity regions that contain `point`, per component in
    /// document order. Areas whose negative regions also cover `point` are
    /// left out.
    pub fn continuity_areas_at(
        &self,
        point: Point,
        components: &[&dyn Drawable],
    ) -> Vec<(ComponentId, Vec<Region>)> {
        components
            .iter()
            .filter_map(|c| {
                let id = c.id();
                let area = self.cache.get(id)?;
                if area.negative_at(point).next().is_some() {
                    return None;
                }
                let regions: Vec<Region> = area.positive_at(point).cloned().collect();
                (!regions.is_empty()).then_some((id, regions))
            })
            .collect()
    }
}

fn draw_marker(surface: &mut dyn Surface, at: Point, color: Color, size: f32) {
    let half = size / 2.0;
    surface.set_color(color);
    surface.fill_rect(at.x - half, at.y - half, size, size);
    surface.set_color(color.darker());
    surface.draw_rect(at.x - half, at.y - half, size, size);
}

/// Run `component.draw`, turning both errors and panics into a message.
fn draw_guarded(
    component: &dyn Drawable,
    g: &mut GraphicsRecorder<'_>,
    state: DrawState,
    outline_mode: bool,
    document: &Document,
) -> Result<(), String> {
    match panic::catch_unwind(AssertUnwindSafe(|| {
        component.draw(g, state, outline_mode, document)
    })) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(format!("{:#}", e)),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

fn report_failure(
    events: &EventBus,
    failed: &mut Vec<ComponentId>,
    component: &dyn Drawable,
    reason: String,
) {
    let id = component.id();
    let err = RenderError::ComponentDrawFailed {
        id: id.0,
        name: component.name().to_string(),
        reason: reason.clone(),
    };
    error!(component = component.name(), id = id.0, "{}", err);
    events.notify(AppEvent::Error(ErrorEvent::ComponentDrawFailed {
        id: id.0,
        name: component.name().to_string(),
        message: reason,
    }));
    if failed.contains(&id) {
        warn!("Component #{} failed more than once in one pass", id);
    } else {
        failed.push(id);
    }
}
