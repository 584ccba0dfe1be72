use glam::Vec3;
use rand::Rng;

use super::Geometry;

/// How consecutive points of a line are connected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    /// Each point connects to the next
    Strip,
    /// Points are taken in pairs
    Segments,
    /// Strip that closes back to the first point
    Loop,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineGeometry {
    pub points: Vec<Vec3>,
    pub mode: LineMode,
}

impl LineGeometry {
    pub fn new(points: Vec<Vec3>, mode: LineMode) -> Self {
        Self { points, mode }
    }

    pub fn strip(points: Vec<Vec3>) -> Self {
        Self::new(points, LineMode::Strip)
    }

    pub fn segments(points: Vec<Vec3>) -> Self {
        Self::new(points, LineMode::Segments)
    }

    pub fn closed(points: Vec<Vec3>) -> Self {
        Self::new(points, LineMode::Loop)
    }

    /// Every unique triangle edge of `mesh` as a segment list
    pub fn wireframe(mesh: &Geometry) -> Self {
        let points = mesh
            .edge_indices()
            .into_iter()
            .filter_map(|i| mesh.positions.get(i as usize))
            .map(|p| Vec3::from_array(*p))
            .collect();
        Self::segments(points)
    }

    /// Points in draw order; a loop repeats its first point at the end
    pub fn draw_points(&self) -> Vec<Vec3> {
        let mut points = self.points.clone();
        if self.mode == LineMode::Loop {
            if let Some(first) = self.points.first() {
                points.push(*first);
            }
        }
        if self.mode == LineMode::Segments && points.len() % 2 == 1 {
            points.pop();
        }
        points
    }

    /// Cumulative distance along the line for each draw point, used for dashes
    pub fn line_distances(&self) -> Vec<f32> {
        let points = self.draw_points();
        let mut distances = Vec::with_capacity(points.len());

        match self.mode {
            LineMode::Strip | LineMode::Loop => {
                let mut total = 0.0;
                for (i, p) in points.iter().enumerate() {
                    if i > 0 {
                        total += points[i - 1].distance(*p);
                    }
                    distances.push(total);
                }
            }
            LineMode::Segments => {
                for pair in points.chunks_exact(2) {
                    let start = distances.last().copied().unwrap_or(0.0);
                    distances.push(start);
                    distances.push(start + pair[0].distance(pair[1]));
                }
            }
        }

        distances
    }

    /// Number of drawn segments
    pub fn segment_count(&self) -> usize {
        let n = self.draw_points().len();
        match self.mode {
            LineMode::Segments => n / 2,
            LineMode::Strip | LineMode::Loop => n.saturating_sub(1),
        }
    }
}

/// Unconnected points, drawn as sprites
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointGeometry {
    pub positions: Vec<Vec3>,
}

impl PointGeometry {
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self { positions }
    }

    /// `count` points with each coordinate uniform in `[-spread / 2, spread / 2]`
    pub fn scatter<R: Rng + ?Sized>(count: usize, spread: f32, rng: &mut R) -> Self {
        let half = spread.abs() * 0.5;
        let positions = (0..count)
            .map(|_| {
                Vec3::new(
                    rng.random_range(-half..=half),
                    rng.random_range(-half..=half),
                    rng.random_range(-half..=half),
                )
            })
            .collect();
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
