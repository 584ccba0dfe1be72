use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::Geometry;

/// Angular range swept by a round primitive, in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpan {
    pub start: f32,
    pub length: f32,
}

impl ArcSpan {
    pub const FULL: ArcSpan = ArcSpan {
        start: 0.0,
        length: TAU,
    };

    pub fn new(start: f32, length: f32) -> Self {
        Self { start, length }
    }

    /// Angle at fraction `t` of the span
    pub fn at(&self, t: f32) -> f32 {
        self.start + t * self.length
    }
}

impl Default for ArcSpan {
    fn default() -> Self {
        Self::FULL
    }
}

/// Axis-aligned box centred at the origin with per-face normals and UVs
pub fn box_geometry(width: f32, height: f32, depth: f32) -> Geometry {
    box_segmented_geometry(width, height, depth, 1, 1, 1)
}

/// Box whose faces are split into a grid along each axis
pub fn box_segmented_geometry(
    width: f32,
    height: f32,
    depth: f32,
    width_segments: u32,
    height_segments: u32,
    depth_segments: u32,
) -> Geometry {
    let half = Vec3::new(width, height, depth) * 0.5;
    let (ws, hs, ds) = (
        width_segments.max(1),
        height_segments.max(1),
        depth_segments.max(1),
    );

    // (normal, u, v, u segments, v segments) with u x v == normal so quads wind
    // counter-clockwise from outside
    let faces = [
        (Vec3::X, -Vec3::Z, Vec3::Y, ds, hs),
        (-Vec3::X, Vec3::Z, Vec3::Y, ds, hs),
        (Vec3::Y, Vec3::X, -Vec3::Z, ws, ds),
        (-Vec3::Y, Vec3::X, Vec3::Z, ws, ds),
        (Vec3::Z, Vec3::X, Vec3::Y, ws, hs),
        (-Vec3::Z, -Vec3::X, Vec3::Y, ws, hs),
    ];
    let vertices: u32 = faces.iter().map(|f| (f.3 + 1) * (f.4 + 1)).sum();
    let indices: u32 = faces.iter().map(|f| f.3 * f.4 * 6).sum();
    let mut mesh = Geometry::with_capacity(vertices as usize, indices as usize);

    for (normal, u, v, su, sv) in faces {
        let center = normal * half;
        let (u, v) = (u * half, v * half);
        let base = mesh.vertex_count() as u32;

        for iy in 0..=sv {
            let fy = iy as f32 / sv as f32;
            for ix in 0..=su {
                let fx = ix as f32 / su as f32;
                let position = center + u * (fx * 2.0 - 1.0) + v * (fy * 2.0 - 1.0);
                mesh.push_vertex(position, normal, [fx, 1.0 - fy]);
            }
        }

        let row = su + 1;
        for iy in 0..sv {
            for ix in 0..su {
                let a = base + iy * row + ix;
                let b = a + 1;
                let c = a + row + 1;
                let d = a + row;
                mesh.push_triangle(a, b, c);
                mesh.push_triangle(a, c, d);
            }
        }
    }

    mesh
}

/// Plane in XY facing +Z, centred at the origin
pub fn plane_geometry(width: f32, height: f32, segments_x: u32, segments_y: u32) -> Geometry {
    let sx = segments_x.max(1);
    let sy = segments_y.max(1);
    let mut mesh =
        Geometry::with_capacity(((sx + 1) * (sy + 1)) as usize, (sx * sy * 6) as usize);

    for y in 0..=sy {
        let v = y as f32 / sy as f32;
        for x in 0..=sx {
            let u = x as f32 / sx as f32;
            let position = Vec3::new((u - 0.5) * width, (v - 0.5) * height, 0.0);
            mesh.push_vertex(position, Vec3::Z, [u, 1.0 - v]);
        }
    }

    for y in 0..sy {
        for x in 0..sx {
            let a = y * (sx + 1) + x;
            let b = a + 1;
            let c = a + sx + 1;
            let d = c + 1;
            mesh.push_triangle(a, d, c);
            mesh.push_triangle(a, b, d);
        }
    }

    mesh
}

/// Flat disc in XY facing +Z
pub fn circle_geometry(radius: f32, segments: u32) -> Geometry {
    circle_arc_geometry(radius, segments, ArcSpan::FULL)
}

/// Disc sector covering `arc`, counter-clockwise from +X
pub fn circle_arc_geometry(radius: f32, segments: u32, arc: ArcSpan) -> Geometry {
    let segments = segments.max(3);
    let mut mesh = Geometry::with_capacity(segments as usize + 2, segments as usize * 3);
    let center = mesh.push_vertex(Vec3::ZERO, Vec3::Z, [0.5, 0.5]);

    for i in 0..=segments {
        let (sin, cos) = arc.at(i as f32 / segments as f32).sin_cos();
        mesh.push_vertex(
            Vec3::new(radius * cos, radius * sin, 0.0),
            Vec3::Z,
            [(cos + 1.0) * 0.5, (sin + 1.0) * 0.5],
        );
    }

    for i in 1..=segments {
        mesh.push_triangle(center, i, i + 1);
    }

    mesh
}

/// UV sphere; `width_segments` around the equator, `height_segments` pole to pole
pub fn sphere_geometry(radius: f32, width_segments: u32, height_segments: u32) -> Geometry {
    sphere_arc_geometry(
        radius,
        width_segments,
        height_segments,
        ArcSpan::FULL,
        ArcSpan::new(0.0, PI),
    )
}

/// Part of a sphere: `phi` sweeps around Y, `theta` runs down from the north pole
pub fn sphere_arc_geometry(
    radius: f32,
    width_segments: u32,
    height_segments: u32,
    phi: ArcSpan,
    theta: ArcSpan,
) -> Geometry {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut mesh =
        Geometry::with_capacity(((ws + 1) * (hs + 1)) as usize, (ws * hs * 6) as usize);

    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let (theta_sin, theta_cos) = theta.at(v).sin_cos();
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let (phi_sin, phi_cos) = phi.at(u).sin_cos();
            let direction = Vec3::new(-phi_cos * theta_sin, theta_cos, phi_sin * theta_sin);
            mesh.push_vertex(direction * radius, direction, [u, 1.0 - v]);
        }
    }

    // Triangles collapse to a point only where the span touches a pole
    let north_pole = theta.start <= 0.0;
    let south_pole = theta.start + theta.length >= PI;
    let row = ws + 1;
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 || !north_pole {
                mesh.push_triangle(a, b, d);
            }
            if iy != hs - 1 || !south_pole {
                mesh.push_triangle(b, c, d);
            }
        }
    }

    mesh
}

/// Cylinder (or frustum) along Y, centred at the origin
pub fn cylinder_geometry(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
    open_ended: bool,
) -> Geometry {
    cylinder_arc_geometry(
        radius_top,
        radius_bottom,
        height,
        radial_segments,
        height_segments,
        open_ended,
        ArcSpan::FULL,
    )
}

/// Cylinder wall and caps covering `arc` around Y, measured from +Z towards +X
pub fn cylinder_arc_geometry(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
    open_ended: bool,
    arc: ArcSpan,
) -> Geometry {
    let rs = radial_segments.max(3);
    let hs = height_segments.max(1);
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;
    let mut mesh = Geometry::default();

    for y in 0..=hs {
        let v = y as f32 / hs as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        for x in 0..=rs {
            let u = x as f32 / rs as f32;
            let (sin, cos) = arc.at(u).sin_cos();
            let position = Vec3::new(radius * sin, half - v * height, radius * cos);
            let normal = Vec3::new(sin, slope, cos).normalize();
            mesh.push_vertex(position, normal, [u, 1.0 - v]);
        }
    }

    let row = rs + 1;
    for y in 0..hs {
        for x in 0..rs {
            let a = y * row + x;
            let b = (y + 1) * row + x;
            let c = (y + 1) * row + x + 1;
            let d = y * row + x + 1;
            mesh.push_triangle(a, b, d);
            mesh.push_triangle(b, c, d);
        }
    }

    if !open_ended {
        if radius_top > 0.0 {
            push_cap(&mut mesh, radius_top, half, rs, arc, true);
        }
        if radius_bottom > 0.0 {
            push_cap(&mut mesh, radius_bottom, -half, rs, arc, false);
        }
    }

    mesh
}

fn push_cap(mesh: &mut Geometry, radius: f32, y: f32, segments: u32, arc: ArcSpan, top: bool) {
    let normal = if top { Vec3::Y } else { -Vec3::Y };
    let center = mesh.push_vertex(Vec3::new(0.0, y, 0.0), normal, [0.5, 0.5]);
    let start = mesh.vertex_count() as u32;

    for x in 0..=segments {
        let (sin, cos) = arc.at(x as f32 / segments as f32).sin_cos();
        let uv = [cos * 0.5 + 0.5, sin * 0.5 * normal.y + 0.5];
        mesh.push_vertex(Vec3::new(radius * sin, y, radius * cos), normal, uv);
    }

    for x in 0..segments {
        let i = start + x;
        if top {
            mesh.push_triangle(i, i + 1, center);
        } else {
            mesh.push_triangle(i + 1, i, center);
        }
    }
}

/// Cone along Y with its apex at `+height / 2`
pub fn cone_geometry(
    radius: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
    open_ended: bool,
) -> Geometry {
    cone_arc_geometry(
        radius,
        height,
        radial_segments,
        height_segments,
        open_ended,
        ArcSpan::FULL,
    )
}

pub fn cone_arc_geometry(
    radius: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
    open_ended: bool,
    arc: ArcSpan,
) -> Geometry {
    cylinder_arc_geometry(
        0.0,
        radius,
        height,
        radial_segments,
        height_segments,
        open_ended,
        arc,
    )
}

/// Annulus in XY facing +Z
pub fn ring_geometry(
    inner_radius: f32,
    outer_radius: f32,
    theta_segments: u32,
    phi_segments: u32,
) -> Geometry {
    ring_arc_geometry(
        inner_radius,
        outer_radius,
        theta_segments,
        phi_segments,
        ArcSpan::FULL,
    )
}

/// Annulus sector covering `arc`, counter-clockwise from +X
pub fn ring_arc_geometry(
    inner_radius: f32,
    outer_radius: f32,
    theta_segments: u32,
    phi_segments: u32,
    arc: ArcSpan,
) -> Geometry {
    let ts = theta_segments.max(3);
    let ps = phi_segments.max(1);
    let step = (outer_radius - inner_radius) / ps as f32;
    let mut mesh =
        Geometry::with_capacity(((ts + 1) * (ps + 1)) as usize, (ts * ps * 6) as usize);

    for j in 0..=ps {
        let radius = inner_radius + j as f32 * step;
        for i in 0..=ts {
            let (sin, cos) = arc.at(i as f32 / ts as f32).sin_cos();
            let position = Vec3::new(radius * cos, radius * sin, 0.0);
            let uv = [
                (position.x / outer_radius + 1.0) * 0.5,
                (position.y / outer_radius + 1.0) * 0.5,
            ];
            mesh.push_vertex(position, Vec3::Z, uv);
        }
    }

    let row = ts + 1;
    for j in 0..ps {
        for i in 0..ts {
            let a = j * row + i;
            let b = a + row;
            let c = a + row + 1;
            let d = a + 1;
            mesh.push_triangle(a, b, d);
            mesh.push_triangle(b, c, d);
        }
    }

    mesh
}

/// Torus around the Z axis
pub fn torus_geometry(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> Geometry {
    torus_arc_geometry(radius, tube, radial_segments, tubular_segments, ArcSpan::FULL)
}

/// Torus section covering `arc` around Z, counter-clockwise from +X; the ends stay open
pub fn torus_arc_geometry(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
    arc: ArcSpan,
) -> Geometry {
    let rs = radial_segments.max(3);
    let ts = tubular_segments.max(3);
    let mut mesh =
        Geometry::with_capacity(((rs + 1) * (ts + 1)) as usize, (rs * ts * 6) as usize);

    for j in 0..=rs {
        let v = j as f32 / rs as f32 * TAU;
        for i in 0..=ts {
            let u = arc.at(i as f32 / ts as f32);
            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let normal = (position - center).normalize();
            let uv = [i as f32 / ts as f32, j as f32 / rs as f32];
            mesh.push_vertex(position, normal, uv);
        }
    }

    let row = ts + 1;
    for j in 1..=rs {
        for i in 1..=ts {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.push_triangle(a, b, d);
            mesh.push_triangle(b, c, d);
        }
    }

    mesh
}
