//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Filled axis-aligned ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        vertices.extend(quad([inner1, outer1, outer2, inner2], color));
    }

    vertices
}

/// Two triangles covering the corners, given in winding order
pub fn quad(corners: [Vec2; 4], color: [f32; 4]) -> [Vertex; 6] {
    let [a, b, c, d] = corners;
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(a.x, a.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Axis-aligned rectangle from its top-left corner
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> [Vertex; 6] {
    quad(
        [
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
        ],
        color,
    )
}

/// Vertical gradient rectangle
pub fn gradient_rect(x: f32, y: f32, w: f32, h: f32, top: [f32; 4], bottom: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(x, y, top),
        Vertex::new(x + w, y, top),
        Vertex::new(x + w, y + h, bottom),
        Vertex::new(x, y, top),
        Vertex::new(x + w, y + h, bottom),
        Vertex::new(x, y + h, bottom),
    ]
}

/// Thick line segment between two points
pub fn segment(from: Vec2, to: Vec2, thickness: f32, color: [f32; 4]) -> [Vertex; 6] {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (thickness / 2.0);
    quad([from + perp, to + perp, to - perp, from - perp], color)
}

/// Rectangle of `size` rotated by `angle` about `pivot`, with the pivot at
/// the given local offset from the rectangle's top-left corner
pub fn rotated_rect(
    pivot: Vec2,
    local_origin: Vec2,
    size: Vec2,
    angle: f32,
    color: [f32; 4],
) -> [Vertex; 6] {
    let (sin, cos) = angle.sin_cos();
    let rotate = |p: Vec2| pivot + Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos);
    let tl = -local_origin;
    quad(
        [
            rotate(tl),
            rotate(tl + Vec2::new(size.x, 0.0)),
            rotate(tl + size),
            rotate(tl + Vec2::new(0.0, size.y)),
        ],
        color,
    )
}

/// Four-pointed sparkle
pub fn diamond(center: Vec2, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let waist = radius * 0.3;
    let points = [
        Vec2::new(0.0, -radius),
        Vec2::new(waist, -waist),
        Vec2::new(radius, 0.0),
        Vec2::new(waist, waist),
        Vec2::new(0.0, radius),
        Vec2::new(-waist, waist),
        Vec2::new(-radius, 0.0),
        Vec2::new(-waist, -waist),
    ];
    let mut vertices = Vec::with_capacity(points.len() * 3);
    for i in 0..points.len() {
        let a = center + points[i];
        let b = center + points[(i + 1) % points.len()];
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }
    vertices
}

/// Heart: two lobes and a point
pub fn heart(center: Vec2, size: f32, color: [f32; 4]) -> Vec<Vertex> {
    let lobe = size * 0.3;
    let mut vertices = circle(center + Vec2::new(-lobe, -lobe * 0.5), lobe, color, 10);
    vertices.extend(circle(center + Vec2::new(lobe, -lobe * 0.5), lobe, color, 10));
    let left = center + Vec2::new(-lobe * 2.0, -lobe * 0.2);
    let right = center + Vec2::new(lobe * 2.0, -lobe * 0.2);
    let tip = center + Vec2::new(0.0, size * 0.7);
    vertices.push(Vertex::new(left.x, left.y, color));
    vertices.push(Vertex::new(right.x, right.y, color));
    vertices.push(Vertex::new(tip.x, tip.y, color));
    vertices
}

/// Filled triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> [Vertex; 3] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_counts() {
        assert_eq!(circle(Vec2::ZERO, 5.0, [1.0; 4], 12).len(), 36);
        assert_eq!(ring(Vec2::ZERO, 4.0, 5.0, [1.0; 4], 12).len(), 72);
        assert_eq!(diamond(Vec2::ZERO, 5.0, [1.0; 4]).len() % 3, 0);
        assert_eq!(heart(Vec2::ZERO, 5.0, [1.0; 4]).len() % 3, 0);
    }

    #[test]
    fn test_rect_covers_corners() {
        let v = rect(10.0, 20.0, 30.0, 40.0, [1.0; 4]);
        let xs: Vec<f32> = v.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_rotated_rect_keeps_pivot() {
        let pivot = Vec2::new(100.0, 100.0);
        let v = rotated_rect(pivot, Vec2::ZERO, Vec2::new(10.0, 4.0), 0.5, [1.0; 4]);
        assert_eq!(v[0].position, [pivot.x, pivot.y]);
    }
}
