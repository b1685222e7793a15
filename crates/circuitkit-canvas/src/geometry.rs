//! Path construction and inspection helpers shared by the surfaces, the
//! recorder and [`Region`](crate::region::Region).

use lyon::math::{point, vector, Angle, Box2D, Point, Transform};
use lyon::path::builder::BorderRadii;
use lyon::path::iterator::*;
use lyon::path::{Event, Path, Winding};

/// How the ends of an open arc are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcKind {
    /// Just the curve
    Open,
    /// Curve closed through the ellipse center
    Pie,
}

/// A flattened subpath in f64 coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    /// Vertices in drawing order.
    pub points: Vec<[f64; 2]>,
    /// Whether the subpath was explicitly closed.
    pub closed: bool,
}

/// Apply `t` to a point in f64.
pub fn apply(t: &Transform, p: [f64; 2]) -> [f64; 2] {
    let (x, y) = (p[0], p[1]);
    [
        x * t.m11 as f64 + y * t.m21 as f64 + t.m31 as f64,
        x * t.m12 as f64 + y * t.m22 as f64 + t.m32 as f64,
    ]
}

/// Largest axis scale factor of a transform, used to convert device
/// tolerances into local ones.
pub fn max_scale(t: &Transform) -> f32 {
    let sx = (t.m11 * t.m11 + t.m12 * t.m12).sqrt();
    let sy = (t.m21 * t.m21 + t.m22 * t.m22).sqrt();
    sx.max(sy)
}

/// Flatten a path into polylines, transforming every vertex by `transform`.
///
/// `tolerance` is measured in the output frame.
pub fn flatten(path: &Path, transform: &Transform, tolerance: f32) -> Vec<Polyline> {
    let scale = max_scale(transform);
    let local_tolerance = if scale > f32::EPSILON {
        (tolerance / scale).max(1e-4)
    } else {
        tolerance
    };

    let mut out = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    for event in path.iter().flattened(local_tolerance) {
        match event {
            Event::Begin { at } => {
                current.clear();
                current.push(apply(transform, [at.x as f64, at.y as f64]));
            }
            Event::Line { to, .. } => {
                current.push(apply(transform, [to.x as f64, to.y as f64]));
            }
            Event::End { close, .. } => {
                if !current.is_empty() {
                    out.push(Polyline {
                        points: std::mem::take(&mut current),
                        closed: close,
                    });
                }
            }
            Event::Quadratic { .. } | Event::Cubic { .. } => {}
        }
    }
    out
}

/// Tight bounds of `path` after applying `transform`, or `None` for an empty path.
pub fn transformed_bounds(path: &Path, transform: &Transform) -> Option<Box2D> {
    if path.iter().next().is_none() {
        return None;
    }
    let transformed = path.clone().transformed(transform);
    Some(lyon::algorithms::aabb::bounding_box(transformed.iter()))
}

/// Exact geometric fingerprint of a path in a given frame.
///
/// Two primitives with equal signatures cover the same outline, which is
/// what outline de-duplication compares.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSignature(Vec<u32>);

impl PathSignature {
    /// Signature of `path` once mapped through `transform`.
    pub fn of(path: &Path, transform: &Transform) -> Self {
        fn push(out: &mut Vec<u32>, p: Point) {
            out.push(p.x.to_bits());
            out.push(p.y.to_bits());
        }

        let mut out = Vec::new();
        for event in path.iter() {
            match event {
                Event::Begin { at } => {
                    out.push(0);
                    push(&mut out, transform.transform_point(at));
                }
                Event::Line { to, .. } => {
                    out.push(1);
                    push(&mut out, transform.transform_point(to));
                }
                Event::Quadratic { ctrl, to, .. } => {
                    out.push(2);
                    push(&mut out, transform.transform_point(ctrl));
                    push(&mut out, transform.transform_point(to));
                }
                Event::Cubic {
                    ctrl1, ctrl2, to, ..
                } => {
                    out.push(3);
                    push(&mut out, transform.transform_point(ctrl1));
                    push(&mut out, transform.transform_point(ctrl2));
                    push(&mut out, transform.transform_point(to));
                }
                Event::End { close, .. } => out.push(if close { 5 } else { 4 }),
            }
        }
        Self(out)
    }
}

/// Rectangle from origin and size.
pub fn rect_box(x: f32, y: f32, w: f32, h: f32) -> Box2D {
    Box2D::new(
        point(x.min(x + w), y.min(y + h)),
        point(x.max(x + w), y.max(y + h)),
    )
}

pub fn line_path(x1: f32, y1: f32, x2: f32, y2: f32) -> Path {
    let mut builder = Path::builder();
    builder.begin(point(x1, y1));
    builder.line_to(point(x2, y2));
    builder.end(false);
    builder.build()
}

pub fn rect_path(x: f32, y: f32, w: f32, h: f32) -> Path {
    let mut builder = Path::builder();
    builder.add_rectangle(&rect_box(x, y, w, h), Winding::Positive);
    builder.build()
}

/// Rounded rectangle; `arc` is the corner diameter as in most 2D APIs.
pub fn round_rect_path(x: f32, y: f32, w: f32, h: f32, arc: f32) -> Path {
    let radius = (arc / 2.0).min(w.abs() / 2.0).min(h.abs() / 2.0).max(0.0);
    if radius <= 0.0 {
        return rect_path(x, y, w, h);
    }
    let mut builder = Path::builder();
    builder.add_rounded_rectangle(
        &rect_box(x, y, w, h),
        &BorderRadii::new(radius),
        Winding::Positive,
    );
    builder.build()
}

/// Ellipse inscribed in the given rectangle.
pub fn oval_path(x: f32, y: f32, w: f32, h: f32) -> Path {
    let mut builder = Path::builder();
    builder.add_ellipse(
        point(x + w / 2.0, y + h / 2.0),
        vector((w / 2.0).abs(), (h / 2.0).abs()),
        Angle::radians(0.0),
        Winding::Positive,
    );
    builder.build()
}

/// Elliptical arc inscribed in the given rectangle.
///
/// Angles are in degrees, counter-clockwise from 3 o'clock with y pointing
/// down, so a positive extent sweeps upwards on screen.
pub fn arc_path(
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    start_deg: f32,
    extent_deg: f32,
    kind: ArcKind,
) -> Path {
    let (cx, cy) = (x + w / 2.0, y + h / 2.0);
    let (rx, ry) = (w / 2.0, h / 2.0);
    let extent = extent_deg.clamp(-360.0, 360.0);
    let steps = ((extent.abs() / 6.0).ceil() as usize).max(2);

    let mut builder = Path::builder();
    let at = |deg: f32| {
        let a = deg.to_radians();
        point(cx + rx * a.cos(), cy - ry * a.sin())
    };

    if kind == ArcKind::Pie {
        builder.begin(point(cx, cy));
        builder.line_to(at(start_deg));
    } else {
        builder.begin(at(start_deg));
    }
    for i in 1..=steps {
        builder.line_to(at(start_deg + extent * i as f32 / steps as f32));
    }
    builder.end(kind != ArcKind::Open);
    builder.build()
}

/// Polygon or polyline through `points`.
pub fn poly_path(points: &[Point], closed: bool) -> Path {
    let mut builder = Path::builder();
    if let Some((first, rest)) = points.split_first() {
        builder.begin(*first);
        for p in rest {
            builder.line_to(*p);
        }
        builder.end(closed);
    }
    builder.build()
}
