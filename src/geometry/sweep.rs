use std::f32::consts::TAU;

use glam::{Quat, Vec2, Vec3};

use super::Geometry;

/// Revolve a profile (x = radius, y = height) around the Y axis
pub fn lathe_geometry(
    profile: &[Vec2],
    segments: u32,
    phi_start: f32,
    phi_length: f32,
) -> Geometry {
    let segments = segments.max(1);
    let len = profile.len() as u32;
    let mut mesh = Geometry::default();
    if len < 2 {
        return mesh;
    }

    for i in 0..=segments {
        let phi = phi_start + i as f32 / segments as f32 * phi_length;
        let (sin, cos) = phi.sin_cos();
        for (j, point) in profile.iter().enumerate() {
            let position = Vec3::new(point.x * sin, point.y, point.x * cos);
            let uv = [i as f32 / segments as f32, j as f32 / (len - 1) as f32];
            mesh.push_vertex(position, Vec3::ZERO, uv);
        }
    }

    for i in 0..segments {
        for j in 0..len - 1 {
            let base = j + i * len;
            let a = base;
            let b = base + len;
            let c = base + len + 1;
            let d = base + 1;
            mesh.push_triangle(a, b, d);
            mesh.push_triangle(c, d, b);
        }
    }

    mesh.compute_normals();
    mesh
}

/// Sweep a circle of `radius` along `path(t)` for `t` in `[0, 1]`
pub fn tube_geometry<F>(
    path: F,
    tubular_segments: u32,
    radius: f32,
    radial_segments: u32,
    closed: bool,
) -> Geometry
where
    F: Fn(f32) -> Vec3,
{
    let ts = tubular_segments.max(1);
    let rs = radial_segments.max(3);
    let frames = frames(&path, ts, closed);
    let mut mesh =
        Geometry::with_capacity(((ts + 1) * (rs + 1)) as usize, (ts * rs * 6) as usize);

    for i in 0..=ts {
        let k = if closed && i == ts { 0 } else { i };
        let point = path(k as f32 / ts as f32);
        let (normal, binormal) = (frames.normals[k as usize], frames.binormals[k as usize]);

        for j in 0..=rs {
            let v = j as f32 / rs as f32 * TAU;
            let (sin, cos) = (v.sin(), -v.cos());
            let direction = (normal * cos + binormal * sin).normalize();
            mesh.push_vertex(
                point + direction * radius,
                direction,
                [i as f32 / ts as f32, j as f32 / rs as f32],
            );
        }
    }

    let row = rs + 1;
    for j in 1..=ts {
        for i in 1..=rs {
            let a = row * (j - 1) + (i - 1);
            let b = row * j + (i - 1);
            let c = row * j + i;
            let d = row * (j - 1) + i;
            mesh.push_triangle(a, b, d);
            mesh.push_triangle(b, c, d);
        }
    }

    mesh
}

/// Tube wound `p` times around the Z axis and `q` times through the hole
pub fn torus_knot_geometry(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> Geometry {
    let p = p.max(1) as f32;
    let q = q as f32;
    let knot = move |t: f32| {
        let u = t * p * TAU;
        let (sin, cos) = u.sin_cos();
        let winding = q / p * u;
        let reach = radius * (2.0 + winding.cos()) * 0.5;
        Vec3::new(reach * cos, reach * sin, radius * winding.sin() * 0.5)
    };
    tube_geometry(knot, tubular_segments, tube, radial_segments, true)
}

struct Frames {
    normals: Vec<Vec3>,
    binormals: Vec<Vec3>,
}

/// Parallel-transport frames along the path
fn frames<F: Fn(f32) -> Vec3>(path: &F, segments: u32, closed: bool) -> Frames {
    const EPSILON: f32 = 1e-4;

    let tangents: Vec<Vec3> = (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let (t0, t1) = ((t - EPSILON).max(0.0), (t + EPSILON).min(1.0));
            (path(t1) - path(t0)).try_normalize().unwrap_or(Vec3::X)
        })
        .collect();

    let first = tangents[0];
    let abs = first.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vec3::X
    } else if abs.y <= abs.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    let seed = first.cross(axis).normalize();

    let mut normals = Vec::with_capacity(tangents.len());
    normals.push(first.cross(seed).normalize());

    for i in 1..tangents.len() {
        let mut normal = normals[i - 1];
        let rotation_axis = tangents[i - 1].cross(tangents[i]);
        if rotation_axis.length() > f32::EPSILON {
            let angle = tangents[i - 1].dot(tangents[i]).clamp(-1.0, 1.0).acos();
            normal = Quat::from_axis_angle(rotation_axis.normalize(), angle) * normal;
        }
        normals.push(normal);
    }

    if closed {
        let last = normals[normals.len() - 1];
        let mut theta = normals[0].dot(last).clamp(-1.0, 1.0).acos() / segments as f32;
        if first.dot(normals[0].cross(last)) > 0.0 {
            theta = -theta;
        }
        for (i, normal) in normals.iter_mut().enumerate().skip(1) {
            *normal = Quat::from_axis_angle(tangents[i], theta * i as f32) * *normal;
        }
    }

    let binormals = tangents.iter().zip(&normals).map(|(t, n)| t.cross(*n)).collect();

    Frames { normals, binormals }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn on_knot(radius: f32, p: f32, q: f32, point: Vec3) -> f32 {
        // Distance from `point` to the nearest sampled point of the knot centre line
        (0..4000)
            .map(|i| {
                let u = i as f32 / 4000.0 * p * TAU;
                let w = q / p * u;
                let reach = radius * (2.0 + w.cos()) * 0.5;
                Vec3::new(reach * u.cos(), reach * u.sin(), radius * w.sin() * 0.5)
            })
            .map(|c| c.distance(point))
            .fold(f32::MAX, f32::min)
    }

    #[test]
    fn test_lathe_half_turn() {
        let profile: Vec<Vec2> = (0..10)
            .map(|i| Vec2::new((i as f32 * 0.2).sin() * 3.0 + 3.0, (i as f32 - 5.0) * 0.8))
            .collect();
        let mesh = lathe_geometry(&profile, 20, 0.0, PI);
        assert_eq!(mesh.vertex_count(), 21 * 10);
        assert_eq!(mesh.triangle_count(), 20 * 9 * 2);
        // A half turn from 0 never reaches negative x
        assert!(mesh.positions.iter().all(|p| p[0] >= -1e-4));
    }

    #[test]
    fn test_lathe_degenerate_profile() {
        let mesh = lathe_geometry(&[Vec2::ONE], 8, 0.0, TAU);
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_tube_around_straight_line() {
        let mesh = tube_geometry(|t| Vec3::new(t * 4.0, 0.0, 0.0), 8, 0.5, 12, false);
        assert_eq!(mesh.vertex_count(), 9 * 13);
        for p in &mesh.positions {
            let radial = Vec3::new(0.0, p[1], p[2]).length();
            assert!((radial - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_tube_follows_sine_curve() {
        let curve = |t: f32| Vec3::new(t * 3.0 - 1.5, (TAU * t).sin(), 0.0) * 4.0;
        let mesh = tube_geometry(curve, 30, 0.5, 20, true);
        assert_eq!(mesh.triangle_count(), 30 * 20 * 2);
        for n in &mesh.normals {
            assert!((Vec3::from_array(*n).length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_torus_knot_wraps_its_centre_line() {
        let mesh = torus_knot_geometry(0.6, 0.1, 64, 20, 2, 3);
        assert_eq!(mesh.vertex_count(), 65 * 21);
        assert_eq!(mesh.triangle_count(), 64 * 20 * 2);
        for p in mesh.positions.iter().step_by(7) {
            let distance = on_knot(0.6, 2.0, 3.0, Vec3::from_array(*p));
            assert!((distance - 0.1).abs() < 0.02, "vertex {} off the tube", distance);
        }
    }
}
