/// Face ordering and culling applied to transformed polygons
use nalgebra::Vector3;

use crate::pipeline::Polygon;
use crate::transform::Transform;

/// Which visibility pass a pipeline runs after transforming the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityPolicy {
    /// Painter's ordering by an approximate per-face depth key; nothing dropped
    #[default]
    DepthSort,
    /// Drop faces whose normal points against the view direction
    BackfaceCull,
}

impl VisibilityPolicy {
    pub fn apply(self, polygons: Vec<Polygon>, view_direction: &Vector3<f64>) -> Vec<Polygon> {
        match self {
            VisibilityPolicy::DepthSort => depth_sort(polygons),
            VisibilityPolicy::BackfaceCull => backface_cull(polygons, view_direction),
        }
    }
}

/// `max(depth) / point_count` for one polygon
pub fn depth_key(polygon: &Polygon) -> f64 {
    let deepest = polygon
        .screen
        .iter()
        .map(|p| p.depth)
        .fold(f64::NEG_INFINITY, f64::max);
    deepest / polygon.screen.len() as f64
}

/// Stable ascending sort on [`depth_key`]; draw the result front to back of the list
pub fn depth_sort(mut polygons: Vec<Polygon>) -> Vec<Polygon> {
    polygons.sort_by(|a, b| depth_key(a).total_cmp(&depth_key(b)));
    polygons
}

/// Normal of the plane through the first three clip-space points.
///
/// Collinear points give the zero vector, not NaN.
pub fn face_normal(polygon: &Polygon) -> Vector3<f64> {
    let [p1, p2, p3] = [polygon.clip[0], polygon.clip[1], polygon.clip[2]];
    let edge1 = p2 - p1;
    let edge2 = p3 - p1;
    Transform::normalize_or_zero(edge1.cross(&edge2))
}

/// Keep faces with `normal . view_direction >= 0`.
///
/// Zero-area faces have a zero normal, so the dot product is zero and they
/// are always kept.
pub fn backface_cull(polygons: Vec<Polygon>, view_direction: &Vector3<f64>) -> Vec<Polygon> {
    polygons
        .into_iter()
        .filter(|polygon| face_normal(polygon).dot(view_direction) >= 0.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ScreenPoint;

    fn polygon(face: usize, depths: &[f64]) -> Polygon {
        Polygon {
            face,
            clip: depths.iter().map(|&d| Vector3::new(0.0, 0.0, d)).collect(),
            screen: depths
                .iter()
                .map(|&depth| ScreenPoint { x: 0.0, y: 0.0, depth })
                .collect(),
        }
    }

    fn flat(face: usize, pts: [[f64; 3]; 3]) -> Polygon {
        Polygon {
            face,
            clip: pts.iter().map(|p| Vector3::from(*p)).collect(),
            screen: pts
                .iter()
                .map(|p| ScreenPoint { x: p[0], y: p[1], depth: p[2] })
                .collect(),
        }
    }

    #[test]
    fn test_depth_key_uses_max_over_count() {
        assert_eq!(depth_key(&polygon(0, &[1.0, 4.0, 2.0, 3.0])), 1.0);
        assert_eq!(depth_key(&polygon(0, &[-3.0, -6.0, -9.0])), -1.0);
    }

    #[test]
    fn test_depth_sort_ascending() {
        let sorted = depth_sort(vec![
            polygon(0, &[3.0, 9.0, 6.0]),
            polygon(1, &[-3.0, -1.5, -6.0]),
            polygon(2, &[0.0, 1.5, 0.3]),
        ]);
        let order: Vec<_> = sorted.iter().map(|p| p.face).collect();
        assert_eq!(order, vec![1, 2, 0]);
        let keys: Vec<_> = sorted.iter().map(depth_key).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_depth_sort_is_stable_and_keeps_everything() {
        let sorted = depth_sort(vec![
            polygon(0, &[2.0, 2.0, 2.0]),
            polygon(1, &[1.0, 1.0, 1.0]),
            polygon(2, &[2.0, 2.0, 2.0]),
        ]);
        let order: Vec<_> = sorted.iter().map(|p| p.face).collect();
        assert_eq!(order, vec![1, 0, 2]);
    }

    #[test]
    fn test_backface_cull_by_winding() {
        let ccw = flat(0, [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let cw = flat(1, [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]);
        let kept = backface_cull(vec![ccw, cw], &Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].face, 0);
    }

    #[test]
    fn test_zero_area_face_is_kept() {
        let line = flat(7, [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]]);
        assert_eq!(face_normal(&line), Vector3::zeros());
        let kept = backface_cull(vec![line], &Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(kept.len(), 1);
    }
}
