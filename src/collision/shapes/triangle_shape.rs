use glam::{Affine3A, Vec3A};

use crate::linear_math::{SIMD_EPSILON, aabb_util_2::Aabb};

/// Barycentric weight below which a closest point is no longer considered
/// to be inside the face.
pub const FEATURE_EPSILON: f32 = 1e-6;

/// The Voronoi region of the triangle that produced a closest point.
///
/// Edge `i` runs from `points[i]` to `points[(i + 1) % 3]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriangleFeature {
    Vertex(usize),
    Edge(usize),
    Face,
}

#[derive(Clone, Copy, Debug)]
pub struct ContactInfo {
    /// Unit normal on the triangle, pointing toward the sphere center.
    pub result_normal: Vec3A,
    /// Closest point on the triangle.
    pub contact_point: Vec3A,
    /// `distance - radius`, negative when overlapping.
    pub depth: f32,
    pub feature: TriangleFeature,
}

/// A triangle made from 3 points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TriangleShape {
    pub points: [Vec3A; 3],
    /// `edges` = \[`p1 - p0`, `p2 - p1`, `p0 - p2`]
    pub edges: [Vec3A; 3],
    pub normal: Vec3A,
    pub normal_length: f32,
}

impl TriangleShape {
    #[inline]
    /// Create a new triangle from 3 points.
    pub fn new(points: [Vec3A; 3]) -> Self {
        let edges = [
            points[1] - points[0],
            points[2] - points[1],
            points[0] - points[2],
        ];

        let (normal, normal_length) = edges[0].cross(-edges[2]).normalize_and_length();

        Self {
            points,
            edges,
            normal,
            normal_length,
        }
    }

    /// Zero-area or non-finite triangles have no usable normal.
    #[inline]
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.normal_length.is_finite() && self.normal_length > SIMD_EPSILON)
            || !self.points.iter().all(|p| p.is_finite())
    }

    #[must_use]
    pub fn get_aabb(&self, t: &Affine3A) -> Aabb {
        let world = self.points.map(|p| t.transform_point3a(p));
        Aabb {
            min: world[0].min(world[1]).min(world[2]),
            max: world[0].max(world[1]).max(world[2]),
        }
    }

    /// Largest distance from the local origin to a vertex.
    #[must_use]
    pub fn get_bounding_radius(&self) -> f32 {
        self.points.iter().map(|p| p.length()).fold(0.0, f32::max)
    }

    /// Closest point on the triangle to the point `obj`, where
    /// `obj_to_points[i] = obj - points[i]`, along with its region.
    ///
    /// Boundary cases resolve to the vertex or edge region, never to the face.
    /// <https://stackoverflow.com/a/74395029/10930209>
    pub fn closest_point(&self, obj_to_points: &[Vec3A; 3]) -> (Vec3A, TriangleFeature) {
        let ab = self.edges[0];
        let ac = -self.edges[2];

        let d1 = ab.dot(obj_to_points[0]);
        let d2 = ac.dot(obj_to_points[0]);
        if d1 <= 0. && d2 <= 0. {
            return (self.points[0], TriangleFeature::Vertex(0));
        }

        let d3 = ab.dot(obj_to_points[1]);
        let d4 = ac.dot(obj_to_points[1]);
        if d3 >= 0. && d4 <= d3 {
            return (self.points[1], TriangleFeature::Vertex(1));
        }

        let d5 = ab.dot(obj_to_points[2]);
        let d6 = ac.dot(obj_to_points[2]);
        if d6 >= 0. && d5 <= d6 {
            return (self.points[2], TriangleFeature::Vertex(2));
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0. && d1 >= 0. && d3 <= 0. {
            let v = d1 / (d1 - d3);
            return (self.points[0] + v * ab, TriangleFeature::Edge(0));
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0. && d2 >= 0. && d6 <= 0. {
            let v = d2 / (d2 - d6);
            return (self.points[0] + v * ac, TriangleFeature::Edge(2));
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0. && (d4 - d3) >= 0. && (d5 - d6) >= 0. {
            let v = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return (self.points[1] + v * self.edges[1], TriangleFeature::Edge(1));
        }

        let denom = 1. / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        let u = 1. - v - w;
        let point = self.points[0] + v * ab + w * ac;

        // weight of vertex i is ~0 => the point sits on the opposite edge
        let feature = if u <= FEATURE_EPSILON {
            TriangleFeature::Edge(1)
        } else if v <= FEATURE_EPSILON {
            TriangleFeature::Edge(2)
        } else if w <= FEATURE_EPSILON {
            TriangleFeature::Edge(0)
        } else {
            TriangleFeature::Face
        };

        (point, feature)
    }

    #[inline]
    fn obj_to_points(&self, obj: Vec3A) -> [Vec3A; 3] {
        [obj - self.points[0], obj - self.points[1], obj - self.points[2]]
    }

    /// Signed distance between a sphere and the triangle, `None` if either is
    /// degenerate.
    #[must_use]
    pub fn sphere_distance(&self, obj_center: Vec3A, radius: f32) -> Option<f32> {
        if self.is_degenerate() || !obj_center.is_finite() || !(radius > 0.) {
            return None;
        }

        let (closest, _) = self.closest_point(&self.obj_to_points(obj_center));
        Some(closest.distance(obj_center) - radius)
    }

    #[must_use]
    /// Check if a sphere is within `radius + threshold` of the triangle.
    /// Touching exactly at `radius + threshold` is not a contact.
    pub fn intersect_sphere(
        &self,
        obj_center: Vec3A,
        radius: f32,
        threshold: f32,
    ) -> Option<ContactInfo> {
        if self.is_degenerate() || !obj_center.is_finite() || !(radius > 0.) {
            return None;
        }

        let mut triangle_normal = self.normal;
        let obj_to_points = self.obj_to_points(obj_center);
        let mut distance_from_plane = obj_to_points[0].dot(triangle_normal);

        if distance_from_plane < 0. {
            distance_from_plane *= -1.0;
            triangle_normal *= -1.0;
        }

        let radius_with_threshold = radius + threshold;
        if distance_from_plane >= radius_with_threshold {
            return None;
        }

        let (contact_point, feature) = self.closest_point(&obj_to_points);
        let contact_to_center = obj_center - contact_point;
        let distance_sqr = contact_to_center.length_squared();

        if distance_sqr >= radius_with_threshold * radius_with_threshold {
            return None;
        }

        let distance = distance_sqr.sqrt();
        let result_normal = if feature == TriangleFeature::Face || distance <= SIMD_EPSILON {
            triangle_normal
        } else {
            contact_to_center / distance
        };

        Some(ContactInfo {
            result_normal,
            contact_point,
            depth: distance - radius,
            feature,
        })
    }
}
