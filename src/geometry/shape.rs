use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};

use super::Geometry;

const DEFAULT_CURVE_SEGMENTS: u32 = 12;

/// Closed 2D outline built from line and bezier segments, optionally with holes
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    points: Vec<Vec2>,
    holes: Vec<Vec<Vec2>>,
    curve_segments: u32,
}

impl Shape {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            holes: Vec::new(),
            curve_segments: DEFAULT_CURVE_SEGMENTS,
        }
    }

    /// Number of samples taken along each curve segment
    pub fn with_curve_segments(mut self, segments: u32) -> Self {
        self.curve_segments = segments.max(1);
        self
    }

    /// Restart the outline at `(x, y)`
    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.points.clear();
        self.points.push(Vec2::new(x, y));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.points.push(Vec2::new(x, y));
        self
    }

    pub fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        let p0 = self.current();
        let (c, p1) = (Vec2::new(cx, cy), Vec2::new(x, y));
        for i in 1..=self.curve_segments {
            let t = i as f32 / self.curve_segments as f32;
            let k = 1.0 - t;
            self.points.push(p0 * k * k + c * 2.0 * k * t + p1 * t * t);
        }
        self
    }

    pub fn bezier_curve_to(
        &mut self,
        c1x: f32,
        c1y: f32,
        c2x: f32,
        c2y: f32,
        x: f32,
        y: f32,
    ) -> &mut Self {
        let p0 = self.current();
        let (c1, c2, p1) = (Vec2::new(c1x, c1y), Vec2::new(c2x, c2y), Vec2::new(x, y));
        for i in 1..=self.curve_segments {
            let t = i as f32 / self.curve_segments as f32;
            let k = 1.0 - t;
            let point =
                p0 * k * k * k + c1 * 3.0 * k * k * t + c2 * 3.0 * k * t * t + p1 * t * t * t;
            self.points.push(point);
        }
        self
    }

    /// Cut the region enclosed by `hole` out of this shape
    pub fn add_hole(&mut self, hole: &Shape) -> &mut Self {
        self.push_hole(hole.outline());
        self
    }

    fn push_hole(&mut self, mut outline: Vec<Vec2>) {
        if outline.len() < 3 {
            return;
        }
        if signed_area(&outline) > 0.0 {
            outline.reverse();
        }
        self.holes.push(outline);
    }

    fn current(&self) -> Vec2 {
        self.points.last().copied().unwrap_or(Vec2::ZERO)
    }

    /// Counter-clockwise outline without consecutive duplicates or a repeated closing point
    pub fn outline(&self) -> Vec<Vec2> {
        let mut points = clean(&self.points);
        if signed_area(&points) < 0.0 {
            points.reverse();
        }
        points
    }

    /// Hole outlines, each clockwise
    pub fn holes(&self) -> &[Vec<Vec2>] {
        &self.holes
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::new()
    }
}

/// Any number of closed subpaths, as drawn by a font outline.
///
/// Each `move_to` starts a new subpath. [`ShapePath::to_shapes`] sorts the
/// subpaths into filled shapes and holes by how deeply they nest, so the
/// winding direction of the input does not matter.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePath {
    subpaths: Vec<Shape>,
    curve_segments: u32,
}

impl ShapePath {
    pub fn new() -> Self {
        Self {
            subpaths: Vec::new(),
            curve_segments: DEFAULT_CURVE_SEGMENTS,
        }
    }

    pub fn with_curve_segments(mut self, segments: u32) -> Self {
        self.curve_segments = segments.max(1);
        self
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        let mut subpath = Shape::new().with_curve_segments(self.curve_segments);
        subpath.move_to(x, y);
        self.subpaths.push(subpath);
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.current().line_to(x, y);
        self
    }

    pub fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        self.current().quadratic_curve_to(cx, cy, x, y);
        self
    }

    pub fn bezier_curve_to(
        &mut self,
        c1x: f32,
        c1y: f32,
        c2x: f32,
        c2y: f32,
        x: f32,
        y: f32,
    ) -> &mut Self {
        self.current().bezier_curve_to(c1x, c1y, c2x, c2y, x, y);
        self
    }

    fn current(&mut self) -> &mut Shape {
        if self.subpaths.is_empty() {
            self.move_to(0.0, 0.0);
        }
        let last = self.subpaths.len() - 1;
        &mut self.subpaths[last]
    }

    pub fn subpath_count(&self) -> usize {
        self.subpaths.len()
    }

    /// Filled shapes with their holes.
    ///
    /// A subpath inside an even number of others is filled; one inside an odd
    /// number becomes a hole of the smallest filled subpath around it.
    pub fn to_shapes(&self) -> Vec<Shape> {
        let outlines: Vec<Vec<Vec2>> = self
            .subpaths
            .iter()
            .map(Shape::outline)
            .filter(|outline| outline.len() >= 3)
            .collect();
        let areas: Vec<f32> = outlines.iter().map(|o| signed_area(o)).collect();

        let encloses = |outer: usize, inner: usize| {
            outer != inner
                && areas[outer] > areas[inner]
                && contains(&outlines[outer], outlines[inner][0])
        };
        let depth: Vec<usize> = (0..outlines.len())
            .map(|i| (0..outlines.len()).filter(|&j| encloses(j, i)).count())
            .collect();

        let mut shapes = Vec::new();
        let mut shape_of = vec![None; outlines.len()];
        for (i, outline) in outlines.iter().enumerate() {
            if depth[i] % 2 == 0 {
                shape_of[i] = Some(shapes.len());
                shapes.push(Shape {
                    points: outline.clone(),
                    holes: Vec::new(),
                    curve_segments: self.curve_segments,
                });
            }
        }

        for (i, outline) in outlines.iter().enumerate() {
            if depth[i] % 2 == 0 {
                continue;
            }
            let parent = (0..outlines.len())
                .filter(|&j| depth[j] + 1 == depth[i] && encloses(j, i))
                .min_by(|&a, &b| areas[a].total_cmp(&areas[b]))
                .and_then(|j| shape_of[j]);
            if let Some(parent) = parent {
                shapes[parent].push_hole(outline.clone());
            }
        }

        shapes
    }
}

impl Default for ShapePath {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop consecutive duplicates and a closing point equal to the first
fn clean(points: &[Vec2]) -> Vec<Vec2> {
    let mut cleaned: Vec<Vec2> = Vec::with_capacity(points.len());
    for p in points {
        if cleaned.last().map_or(true, |last| last.distance_squared(*p) > 1e-10) {
            cleaned.push(*p);
        }
    }
    if cleaned.len() > 1 && cleaned[0].distance_squared(cleaned[cleaned.len() - 1]) <= 1e-10 {
        cleaned.pop();
    }
    cleaned
}

fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum::<f32>()
        * 0.5
}

/// Even-odd point in polygon test
fn contains(polygon: &[Vec2], point: Vec2) -> bool {
    let n = polygon.len();
    let mut inside = false;
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[(i + n - 1) % n]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
    }
    inside
}

/// Outline followed by each hole, in the order triangle indices refer to them
fn contour_points(outline: &[Vec2], holes: &[Vec<Vec2>]) -> Vec<Vec2> {
    let mut points = outline.to_vec();
    for hole in holes {
        points.extend_from_slice(hole);
    }
    points
}

/// Triangulate an outline with holes; every triangle is returned counter-clockwise
fn triangulate(outline: &[Vec2], holes: &[Vec<Vec2>]) -> Vec<[u32; 3]> {
    if outline.len() < 3 {
        return Vec::new();
    }

    let points = contour_points(outline, holes);
    let coords: Vec<f64> = points.iter().flat_map(|p| [p.x as f64, p.y as f64]).collect();
    let hole_starts: Vec<usize> = holes
        .iter()
        .scan(outline.len(), |start, hole| {
            let this = *start;
            *start += hole.len();
            Some(this)
        })
        .collect();

    let indices = match earcutr::earcut(&coords, &hole_starts, 2) {
        Ok(indices) if !indices.is_empty() => indices,
        // earcutr can fail on degenerate input; fan the outer outline from its first vertex
        _ => (1..outline.len() - 1).flat_map(|i| [0, i, i + 1]).collect(),
    };

    indices
        .chunks_exact(3)
        .map(|tri| {
            let (a, b, c) = (points[tri[0]], points[tri[1]], points[tri[2]]);
            if (b - a).perp_dot(c - a) < 0.0 {
                [tri[0] as u32, tri[2] as u32, tri[1] as u32]
            } else {
                [tri[0] as u32, tri[1] as u32, tri[2] as u32]
            }
        })
        .collect()
}

/// Filled shape in the XY plane facing +Z; UVs are the raw XY coordinates
pub fn shape_geometry(shape: &Shape) -> Geometry {
    let outline = shape.outline();
    let points = contour_points(&outline, shape.holes());
    let mut mesh = Geometry::with_capacity(points.len(), points.len() * 3);

    for p in &points {
        mesh.push_vertex(p.extend(0.0), Vec3::Z, [p.x, p.y]);
    }
    for [a, b, c] in triangulate(&outline, shape.holes()) {
        mesh.push_triangle(a, b, c);
    }

    mesh
}

/// Rounded edge between the caps and the side walls of an extrusion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bevel {
    /// How far the bevel reaches past each cap along Z
    pub thickness: f32,
    /// How far the bevel pushes the outline outwards
    pub size: f32,
    pub segments: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeOptions {
    pub depth: f32,
    pub bevel: Option<Bevel>,
}

impl ExtrudeOptions {
    pub fn new(depth: f32) -> Self {
        Self { depth, bevel: None }
    }

    pub fn with_bevel(mut self, bevel: Bevel) -> Self {
        self.bevel = Some(bevel);
        self
    }

    /// (z, outward offset) of each ring of wall vertices, back to front
    fn layers(&self) -> Vec<(f32, f32)> {
        let Some(bevel) = self.bevel else {
            return vec![(0.0, 0.0), (self.depth, 0.0)];
        };
        let segments = bevel.segments.max(1);
        let ramp = |step: u32| {
            let angle = step as f32 / segments as f32 * FRAC_PI_2;
            (bevel.thickness * angle.cos(), bevel.size * angle.sin())
        };

        let mut layers: Vec<(f32, f32)> = (0..segments)
            .map(ramp)
            .map(|(z, offset)| (-z, offset))
            .collect();
        layers.push((0.0, bevel.size));
        layers.push((self.depth, bevel.size));
        layers.extend(
            (0..segments)
                .rev()
                .map(ramp)
                .map(|(z, offset)| (self.depth + z, offset)),
        );
        layers
    }
}

/// Direction each vertex moves so that both adjacent edges shift out by one unit
fn bevel_directions(contour: &[Vec2]) -> Vec<Vec2> {
    let n = contour.len();
    (0..n)
        .map(|i| {
            let (prev, point, next) = (contour[(i + n - 1) % n], contour[i], contour[(i + 1) % n]);
            let outward = |edge: Vec2| Vec2::new(edge.y, -edge.x).normalize_or_zero();
            let (n0, n1) = (outward(point - prev), outward(next - point));
            // Spikes are capped at twice the offset
            let cos = 1.0 + n0.dot(n1);
            (n0 + n1).normalize_or_zero() * (2.0 / cos.max(0.5)).sqrt()
        })
        .collect()
}

/// Extrude a shape along +Z by `depth`: back cap at z = 0, front cap at z = depth, flat side walls
pub fn extrude_geometry(shape: &Shape, depth: f32) -> Geometry {
    extrude_shape(shape, &ExtrudeOptions::new(depth))
}

/// Extrude a shape along +Z; a bevel grows the caps outwards past both ends
pub fn extrude_shape(shape: &Shape, options: &ExtrudeOptions) -> Geometry {
    let outline = shape.outline();
    let triangles = triangulate(&outline, shape.holes());
    let contours: Vec<&[Vec2]> = std::iter::once(outline.as_slice())
        .chain(shape.holes().iter().map(Vec::as_slice))
        .collect();
    let directions: Vec<Vec<Vec2>> = contours.iter().map(|c| bevel_directions(c)).collect();
    let layers = options.layers();
    let mut mesh = Geometry::default();

    let at = |contour: usize, i: usize, (z, offset): (f32, f32)| {
        (contours[contour][i] + directions[contour][i] * offset).extend(z)
    };

    for (layer, normal, front) in [
        (layers[0], -Vec3::Z, false),
        (layers[layers.len() - 1], Vec3::Z, true),
    ] {
        let base = mesh.vertex_count() as u32;
        for (c, contour) in contours.iter().enumerate() {
            for (i, p) in contour.iter().enumerate() {
                mesh.push_vertex(at(c, i, layer), normal, [p.x, p.y]);
            }
        }
        for [a, b, c] in &triangles {
            if front {
                mesh.push_triangle(base + a, base + b, base + c);
            } else {
                mesh.push_triangle(base + a, base + c, base + b);
            }
        }
    }

    for (c, contour) in contours.iter().enumerate() {
        let n = contour.len();
        for pair in layers.windows(2) {
            let (near, far) = (pair[0], pair[1]);
            let mut walked = 0.0;
            for i in 0..n {
                let j = (i + 1) % n;
                let edge = contour[j] - contour[i];
                let (u0, u1) = (walked, walked + edge.length());
                walked = u1;

                let (a, b) = (at(c, i, near), at(c, j, near));
                let (p, d) = (at(c, j, far), at(c, i, far));
                let normal = (b - a)
                    .cross(d - a)
                    .try_normalize()
                    .or_else(|| Vec3::new(edge.y, -edge.x, 0.0).try_normalize())
                    .unwrap_or(Vec3::X);

                let a = mesh.push_vertex(a, normal, [u0, near.0]);
                let b = mesh.push_vertex(b, normal, [u1, near.0]);
                let p = mesh.push_vertex(p, normal, [u1, far.0]);
                let d = mesh.push_vertex(d, normal, [u0, far.0]);
                mesh.push_triangle(a, b, p);
                mesh.push_triangle(a, p, d);
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(clockwise: bool) -> Shape {
        let mut shape = Shape::new();
        shape.move_to(0.0, 0.0);
        if clockwise {
            shape.line_to(0.0, 1.0).line_to(1.0, 1.0).line_to(1.0, 0.0);
        } else {
            shape.line_to(1.0, 0.0).line_to(1.0, 1.0).line_to(0.0, 1.0);
        }
        shape.line_to(0.0, 0.0);
        shape
    }

    /// Square ring: 4 x 4 outside, 2 x 2 hole
    fn frame(path: &mut ShapePath, x: f32, inner_clockwise: bool) {
        path.move_to(x, 0.0)
            .line_to(x + 4.0, 0.0)
            .line_to(x + 4.0, 4.0)
            .line_to(x, 4.0);
        path.move_to(x + 1.0, 1.0);
        if inner_clockwise {
            path.line_to(x + 1.0, 3.0).line_to(x + 3.0, 3.0).line_to(x + 3.0, 1.0);
        } else {
            path.line_to(x + 3.0, 1.0).line_to(x + 3.0, 3.0).line_to(x + 1.0, 3.0);
        }
    }

    fn area(mesh: &Geometry) -> f32 {
        mesh.indices
            .chunks_exact(3)
            .map(|tri| {
                let p: Vec<Vec3> = tri
                    .iter()
                    .map(|&i| Vec3::from_array(mesh.positions[i as usize]))
                    .collect();
                (p[1] - p[0]).cross(p[2] - p[0]).z * 0.5
            })
            .sum()
    }

    #[test]
    fn test_outline_drops_closing_point_and_is_ccw() {
        let outline = square(true).outline();
        assert_eq!(outline.len(), 4);
        assert!(signed_area(&outline) > 0.0);
    }

    #[test]
    fn test_bezier_sampling() {
        let mut shape = Shape::new().with_curve_segments(4);
        shape.move_to(0.0, 0.0).bezier_curve_to(0.0, 1.0, 1.0, 1.0, 1.0, 0.0);
        let outline = shape.outline();
        assert_eq!(outline.len(), 5);
        assert!((outline.iter().map(|p| p.y).fold(0.0, f32::max) - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_shape_geometry_faces_forward() {
        for clockwise in [false, true] {
            let mesh = shape_geometry(&square(clockwise));
            assert_eq!(mesh.triangle_count(), 2);
            for tri in mesh.indices.chunks_exact(3) {
                let p: Vec<Vec3> = tri
                    .iter()
                    .map(|&i| Vec3::from_array(mesh.positions[i as usize]))
                    .collect();
                assert!((p[1] - p[0]).cross(p[2] - p[0]).z > 0.0);
            }
        }
    }

    #[test]
    fn test_hole_is_left_open() {
        let mut outer = Shape::new();
        outer.move_to(0.0, 0.0).line_to(4.0, 0.0).line_to(4.0, 4.0).line_to(0.0, 4.0);
        let mut hole = Shape::new();
        hole.move_to(1.0, 1.0).line_to(3.0, 1.0).line_to(3.0, 3.0).line_to(1.0, 3.0);
        outer.add_hole(&hole);

        assert!(signed_area(&outer.holes()[0]) < 0.0, "holes run clockwise");
        let mesh = shape_geometry(&outer);
        assert_eq!(mesh.vertex_count(), 8);
        assert!((area(&mesh) - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_shape_path_nesting_ignores_winding() {
        for inner_clockwise in [false, true] {
            let mut path = ShapePath::new();
            frame(&mut path, 0.0, inner_clockwise);
            frame(&mut path, 10.0, !inner_clockwise);
            assert_eq!(path.subpath_count(), 4);

            let shapes = path.to_shapes();
            assert_eq!(shapes.len(), 2);
            for shape in &shapes {
                assert_eq!(shape.holes().len(), 1);
                assert!((area(&shape_geometry(shape)) - 12.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_island_inside_hole_is_filled() {
        let mut path = ShapePath::new();
        frame(&mut path, 0.0, true);
        path.move_to(1.5, 1.5).line_to(2.5, 1.5).line_to(2.5, 2.5).line_to(1.5, 2.5);

        let shapes = path.to_shapes();
        assert_eq!(shapes.len(), 2);
        let total: f32 = shapes.iter().map(|s| area(&shape_geometry(s))).sum();
        assert!((total - 13.0).abs() < 1e-4);
    }

    #[test]
    fn test_extrude_counts() {
        let mesh = extrude_geometry(&square(false), 2.0);
        // two caps of 2 triangles + 4 walls of 2 triangles
        assert_eq!(mesh.triangle_count(), 12);
        let max_z = mesh.positions.iter().map(|p| p[2]).fold(f32::MIN, f32::max);
        assert_eq!(max_z, 2.0);
    }

    #[test]
    fn test_extruded_hole_has_inner_walls() {
        let mut path = ShapePath::new();
        frame(&mut path, 0.0, false);
        let shape = &path.to_shapes()[0];
        let mesh = extrude_geometry(shape, 1.0);
        // caps of 8 triangles each, 8 wall quads
        assert_eq!(mesh.triangle_count(), 2 * 8 + 8 * 2);

        // Inner walls face into the hole
        let centre = Vec3::new(2.0, 2.0, 0.5);
        let inner = mesh
            .positions
            .iter()
            .zip(&mesh.normals)
            .filter(|(p, n)| n[2] == 0.0 && p[0] > 0.5 && p[0] < 3.5 && p[1] > 0.5 && p[1] < 3.5);
        for (p, n) in inner {
            let towards_centre = centre - Vec3::from_array(*p);
            assert!(Vec3::from_array(*n).dot(towards_centre) > 0.0);
        }
    }

    #[test]
    fn test_bevel_grows_outline_past_caps() {
        let bevel = Bevel {
            thickness: 0.2,
            size: 0.1,
            segments: 2,
        };
        let mesh = extrude_shape(&square(false), &ExtrudeOptions::new(1.0).with_bevel(bevel));
        let extent = |axis: usize| {
            let values = mesh.positions.iter().map(|p| p[axis]);
            let min = values.clone().fold(f32::MAX, f32::min);
            (min, values.fold(f32::MIN, f32::max))
        };

        let (min_x, max_x) = extent(0);
        assert!((min_x + 0.1).abs() < 1e-5 && (max_x - 1.1).abs() < 1e-5);
        let (min_z, max_z) = extent(2);
        assert!((min_z + 0.2).abs() < 1e-5 && (max_z - 1.2).abs() < 1e-5);

        // 6 rings of wall vertices give 5 bands of 4 quads
        assert_eq!(mesh.triangle_count(), 2 * 2 + 5 * 4 * 2);
        for n in &mesh.normals {
            assert!((Vec3::from_array(*n).length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_heart_outline_triangulates() {
        let (x, y) = (-2.5, -5.0);
        let mut shape = Shape::new();
        shape
            .move_to(x + 2.5, y + 2.5)
            .bezier_curve_to(x + 2.5, y + 2.5, x + 2.0, y, x, y)
            .bezier_curve_to(x - 3.0, y, x - 3.0, y + 3.5, x - 3.0, y + 3.5)
            .bezier_curve_to(x - 3.0, y + 5.5, x - 1.5, y + 7.7, x + 2.5, y + 9.5)
            .bezier_curve_to(x + 6.0, y + 7.7, x + 8.0, y + 4.5, x + 8.0, y + 3.5)
            .bezier_curve_to(x + 8.0, y + 3.5, x + 8.0, y, x + 5.0, y)
            .bezier_curve_to(x + 3.5, y, x + 2.5, y + 2.5, x + 2.5, y + 2.5);
        let mesh = shape_geometry(&shape);
        assert_eq!(mesh.vertex_count(), 6 * 12);
        assert!(mesh.triangle_count() > 0);
        assert!(mesh.triangle_count() <= mesh.vertex_count() - 2);
    }
}
