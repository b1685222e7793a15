//! Constructive area geometry for component footprints.
//!
//! A [`Region`] is a closed point set built from filled or stroked paths and
//! combined with union, subtraction and intersection. The boolean work is done
//! by `csgrs`; the flattened rings are kept alongside for containment, bounds
//! and area queries.

use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use lyon::algorithms::hit_test::hit_test_path;
use lyon::math::{point, Box2D, Point, Transform};
use lyon::path::{FillRule, Path};
use lyon::tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};
use tracing::debug;

use crate::geometry::{self, Polyline};
use crate::surface::{LineCap, StrokeStyle};

/// Rings with less area than this are dropped as slivers.
const MIN_RING_AREA: f64 = 1e-6;

/// Segments for the round joints of a stroke outline.
const JOINT_SEGMENTS: usize = 16;

type Ring = Vec<[f64; 2]>;

#[derive(Debug, Clone, PartialEq)]
struct Shell {
    exterior: Ring,
    holes: Vec<Ring>,
}

/// A 2D area with set operations.
#[derive(Clone)]
pub struct Region {
    sketch: Sketch<()>,
    shells: Vec<Shell>,
    outline: Path,
    bounds: Option<Box2D>,
}

impl std::fmt::Debug for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Region")
            .field("polygons", &self.shells.len())
            .field("bounds", &self.bounds)
            .field("area", &self.area())
            .finish()
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::empty()
    }
}

impl Region {
    /// The empty region.
    pub fn empty() -> Self {
        Self {
            sketch: Sketch::new(),
            shells: Vec::new(),
            outline: Path::new(),
            bounds: None,
        }
    }

    fn from_sketch(sketch: Sketch<()>) -> Self {
        let mut shells = Vec::new();
        let mp = sketch.to_multipolygon();
        for poly in mp.0 {
            let exterior = clean_ring(poly.exterior().0.iter().map(|c| [c.x, c.y]));
            if ring_area(&exterior) < MIN_RING_AREA {
                continue;
            }
            let holes = poly
                .interiors()
                .iter()
                .map(|ring| clean_ring(ring.0.iter().map(|c| [c.x, c.y])))
                .filter(|ring| ring_area(ring) >= MIN_RING_AREA)
                .collect();
            shells.push(Shell { exterior, holes });
        }
        Self::assemble(sketch, shells)
    }

    fn assemble(sketch: Sketch<()>, shells: Vec<Shell>) -> Self {
        let mut builder = Path::builder();
        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];
        for shell in &shells {
            for ring in std::iter::once(&shell.exterior).chain(shell.holes.iter()) {
                if let Some((first, rest)) = ring.split_first() {
                    builder.begin(point(first[0] as f32, first[1] as f32));
                    for p in rest {
                        builder.line_to(point(p[0] as f32, p[1] as f32));
                    }
                    builder.close();
                }
            }
            for p in &shell.exterior {
                min = [min[0].min(p[0]), min[1].min(p[1])];
                max = [max[0].max(p[0]), max[1].max(p[1])];
            }
        }
        let bounds = (!shells.is_empty()).then(|| {
            Box2D::new(
                point(min[0] as f32, min[1] as f32),
                point(max[0] as f32, max[1] as f32),
            )
        });
        Self {
            sketch,
            shells,
            outline: builder.build(),
            bounds,
        }
    }

    /// Region enclosed by a polygon under the even-odd rule. Fewer than three
    /// vertices or a zero area yields the empty region.
    ///
    /// Self-intersecting rings (a bow-tie, a pentagram) are split into
    /// triangles first, so every lobe the surface paints is covered.
    pub fn from_polygon(points: &[[f64; 2]]) -> Self {
        let ring = clean_ring(points.iter().copied());
        if ring.len() < 3 {
            return Self::empty();
        }
        if !is_simple(&ring) {
            return Self::union_all(even_odd_triangles(&ring));
        }
        if ring_area(&ring) < MIN_RING_AREA {
            return Self::empty();
        }
        Self::from_sketch(Sketch::polygon(&ring, None))
    }

    /// Axis-aligned rectangle.
    pub fn from_rect(rect: &Box2D) -> Self {
        let (x0, y0) = (rect.min.x as f64, rect.min.y as f64);
        let (x1, y1) = (rect.max.x as f64, rect.max.y as f64);
        Self::from_polygon(&[[x0, y0], [x1, y0], [x1, y1], [x0, y1]])
    }

    /// Interior of `path` mapped through `transform`, under the even-odd rule.
    /// Open subpaths are closed implicitly.
    pub fn from_fill(path: &Path, transform: &Transform, tolerance: f32) -> Self {
        let pieces: Vec<Region> = geometry::flatten(path, transform, tolerance)
            .into_iter()
            .map(|line| Self::from_polygon(&line.points))
            .filter(|r| !r.is_empty())
            .collect();

        let mut iter = pieces.into_iter();
        let Some(first) = iter.next() else {
            return Self::empty();
        };
        iter.fold(first, |acc, next| acc.xor(&next))
    }

    /// Outline of `path` stroked with `style` in the local frame, mapped
    /// through `transform`. Dashes are ignored, so the dashed outline is
    /// covered entirely.
    pub fn from_stroke(
        path: &Path,
        style: &StrokeStyle,
        transform: &Transform,
        tolerance: f32,
    ) -> Self {
        let half = style.width as f64 / 2.0;
        if half <= 0.0 {
            return Self::empty();
        }

        let mut pieces = Vec::new();
        for line in geometry::flatten(path, &Transform::identity(), tolerance) {
            thick_polyline(&line, half, style.cap, transform, &mut pieces);
        }
        Self::union_all(pieces)
    }

    /// Union of many regions, combined pairwise to keep intermediate shapes small.
    pub fn union_all(regions: impl IntoIterator<Item = Region>) -> Self {
        let mut layer: Vec<Region> = regions.into_iter().filter(|r| !r.is_empty()).collect();
        while layer.len() > 1 {
            let mut next = Vec::with_capacity(layer.len().div_ceil(2));
            let mut iter = layer.into_iter();
            while let Some(a) = iter.next() {
                match iter.next() {
                    Some(b) => next.push(a.union(&b)),
                    None => next.push(a),
                }
            }
            layer = next;
        }
        layer.pop().unwrap_or_default()
    }

    pub fn union(&self, other: &Region) -> Region {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        Self::from_sketch(self.sketch.union(&other.sketch))
    }

    pub fn subtract(&self, other: &Region) -> Region {
        if self.is_empty() || !self.bounds_overlap(other) {
            return self.clone();
        }
        Self::from_sketch(self.sketch.difference(&other.sketch))
    }

    pub fn intersection(&self, other: &Region) -> Region {
        if !self.bounds_overlap(other) {
            return Self::empty();
        }
        Self::from_sketch(self.sketch.intersection(&other.sketch))
    }

    /// Symmetric difference.
    pub fn xor(&self, other: &Region) -> Region {
        if !self.bounds_overlap(other) {
            return self.union(other);
        }
        self.union(other).subtract(&self.intersection(other))
    }

    /// Whether the two regions share any area.
    pub fn intersects(&self, other: &Region) -> bool {
        self.bounds_overlap(other) && !self.intersection(other).is_empty()
    }

    /// Point containment. Points exactly on the boundary may go either way.
    pub fn contains(&self, p: Point) -> bool {
        match self.bounds {
            Some(b) if p.x >= b.min.x && p.x <= b.max.x && p.y >= b.min.y && p.y <= b.max.y => {
                hit_test_path(&p, self.outline.iter(), FillRule::EvenOdd, 0.01)
            }
            _ => false,
        }
    }

    pub fn bounds(&self) -> Option<Box2D> {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.shells.is_empty()
    }

    /// Covered area, holes excluded.
    pub fn area(&self) -> f64 {
        self.shells
            .iter()
            .map(|s| ring_area(&s.exterior) - s.holes.iter().map(|h| ring_area(h)).sum::<f64>())
            .sum()
    }

    /// Number of disjoint polygons making up the region.
    pub fn polygon_count(&self) -> usize {
        self.shells.len()
    }

    /// The region mapped through `transform`.
    pub fn transformed(&self, transform: &Transform) -> Region {
        let pieces = self.shells.iter().map(|shell| {
            let exterior: Ring = shell
                .exterior
                .iter()
                .map(|p| geometry::apply(transform, *p))
                .collect();
            let mut region = Region::from_polygon(&exterior);
            for hole in &shell.holes {
                let hole: Ring = hole.iter().map(|p| geometry::apply(transform, *p)).collect();
                region = region.subtract(&Region::from_polygon(&hole));
            }
            region
        });
        Self::union_all(pieces.collect::<Vec<_>>())
    }

    /// Closed outline of every ring, suitable for filling with the even-odd rule.
    pub fn to_path(&self) -> Path {
        self.outline.clone()
    }

    fn bounds_overlap(&self, other: &Region) -> bool {
        match (self.bounds, other.bounds) {
            (Some(a), Some(b)) => {
                a.min.x <= b.max.x && b.min.x <= a.max.x && a.min.y <= b.max.y && b.min.y <= a.max.y
            }
            _ => false,
        }
    }
}

/// Drop repeated vertices and the closing duplicate.
fn clean_ring(points: impl Iterator<Item = [f64; 2]>) -> Ring {
    let mut ring: Ring = Vec::new();
    for p in points {
        if ring
            .last()
            .is_some_and(|last| (p[0] - last[0]).abs() < 1e-9 && (p[1] - last[1]).abs() < 1e-9)
        {
            continue;
        }
        ring.push(p);
    }
    if ring.len() > 1 {
        let (first, last) = (ring[0], ring[ring.len() - 1]);
        if (first[0] - last[0]).abs() < 1e-9 && (first[1] - last[1]).abs() < 1e-9 {
            ring.pop();
        }
    }
    ring
}

/// Unsigned shoelace area.
fn ring_area(ring: &Ring) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        twice += a[0] * b[1] - b[0] * a[1];
    }
    (twice / 2.0).abs()
}

fn orient(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// `c` lies within the bounding box of segment `a`-`b`.
fn within(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> bool {
    c[0] >= a[0].min(b[0])
        && c[0] <= a[0].max(b[0])
        && c[1] >= a[1].min(b[1])
        && c[1] <= a[1].max(b[1])
}

fn segments_touch(p1: [f64; 2], p2: [f64; 2], q1: [f64; 2], q2: [f64; 2]) -> bool {
    const EPS: f64 = 1e-9;
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);
    if ((d1 > EPS && d2 < -EPS) || (d1 < -EPS && d2 > EPS))
        && ((d3 > EPS && d4 < -EPS) || (d3 < -EPS && d4 > EPS))
    {
        return true;
    }
    (d1.abs() <= EPS && within(q1, q2, p1))
        || (d2.abs() <= EPS && within(q1, q2, p2))
        || (d3.abs() <= EPS && within(p1, p2, q1))
        || (d4.abs() <= EPS && within(p1, p2, q2))
}

/// No two non-adjacent edges of the closed ring meet.
fn is_simple(ring: &[[f64; 2]]) -> bool {
    let n = ring.len();
    if n < 4 {
        return true;
    }
    let edge = |i: usize| (ring[i], ring[(i + 1) % n]);
    for i in 0..n {
        let (a, b) = edge(i);
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (c, d) = edge(j);
            if segments_touch(a, b, c, d) {
                return false;
            }
        }
    }
    true
}

/// Triangles covering the even-odd interior of a self-intersecting ring.
fn even_odd_triangles(ring: &[[f64; 2]]) -> Vec<Region> {
    let mut builder = Path::builder();
    builder.begin(point(ring[0][0] as f32, ring[0][1] as f32));
    for p in &ring[1..] {
        builder.line_to(point(p[0] as f32, p[1] as f32));
    }
    builder.close();
    let path = builder.build();

    let mut buffers: VertexBuffers<[f64; 2], u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();
    let result = tessellator.tessellate_path(
        &path,
        &FillOptions::even_odd(),
        &mut BuffersBuilder::new(&mut buffers, |v: FillVertex| {
            let p = v.position();
            [p.x as f64, p.y as f64]
        }),
    );
    if let Err(err) = result {
        debug!("Could not split self-intersecting ring: {:?}", err);
        return Vec::new();
    }

    buffers
        .indices
        .chunks_exact(3)
        .map(|t| {
            let corners = [
                buffers.vertices[t[0] as usize],
                buffers.vertices[t[1] as usize],
                buffers.vertices[t[2] as usize],
            ];
            Region::from_polygon(&corners)
        })
        .collect()
}

fn disc(center: [f64; 2], radius: f64, transform: &Transform) -> Region {
    let points: Ring = (0..JOINT_SEGMENTS)
        .map(|i| {
            let a = i as f64 * std::f64::consts::TAU / JOINT_SEGMENTS as f64;
            geometry::apply(transform, [center[0] + radius * a.cos(), center[1] + radius * a.sin()])
        })
        .collect();
    Region::from_polygon(&points)
}

/// Quads for every segment, round joints at interior vertices, caps per `cap`.
fn thick_polyline(
    line: &Polyline,
    half: f64,
    cap: LineCap,
    transform: &Transform,
    out: &mut Vec<Region>,
) {
    let mut pts = line.points.clone();
    if line.closed && pts.len() > 2 {
        pts.push(pts[0]);
    }

    let segments: Vec<([f64; 2], [f64; 2])> = pts
        .windows(2)
        .map(|w| (w[0], w[1]))
        .filter(|(a, b)| (b[0] - a[0]).hypot(b[1] - a[1]) > 1e-9)
        .collect();

    if segments.is_empty() {
        // A dot: covered only when the cap has extent.
        if let (Some(p), LineCap::Round | LineCap::Square) = (pts.first(), cap) {
            out.push(disc(*p, half, transform));
        }
        return;
    }

    let last = segments.len() - 1;
    for (i, (a, b)) in segments.iter().enumerate() {
        let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
        let len = dx.hypot(dy);
        let (ux, uy) = (dx / len, dy / len);
        let (nx, ny) = (-uy * half, ux * half);

        let open = !line.closed;
        let ext_start = if open && i == 0 && cap == LineCap::Square { half } else { 0.0 };
        let ext_end = if open && i == last && cap == LineCap::Square { half } else { 0.0 };
        let a = [a[0] - ux * ext_start, a[1] - uy * ext_start];
        let b = [b[0] + ux * ext_end, b[1] + uy * ext_end];

        let quad: Ring = [
            [a[0] + nx, a[1] + ny],
            [b[0] + nx, b[1] + ny],
            [b[0] - nx, b[1] - ny],
            [a[0] - nx, a[1] - ny],
        ]
        .iter()
        .map(|p| geometry::apply(transform, *p))
        .collect();
        out.push(Region::from_polygon(&quad));
    }

    for (i, (_, b)) in segments.iter().enumerate() {
        if i < last || line.closed {
            out.push(disc(*b, half, transform));
        }
    }
    if !line.closed && cap == LineCap::Round {
        out.push(disc(segments[0].0, half, transform));
        out.push(disc(segments[last].1, half, transform));
    }
}
