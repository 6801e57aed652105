/// Per-frame model/view/projection transform of a whole mesh
use nalgebra::{Matrix4, Vector3};

use crate::geometry::Mesh;
use crate::projection::{Camera, ProjectionConfig, Viewport, DEFAULT_FAR, DEFAULT_FOV_DEGREES, DEFAULT_NEAR};
use crate::state::ModelState;
use crate::transform::Transform;
use crate::visibility::VisibilityPolicy;

/// View direction used for culling when no camera is configured
pub fn default_view_direction() -> Vector3<f64> {
    Vector3::z()
}

/// Everything fixed at startup
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub viewport: Viewport,
    /// Uniform model scale
    pub scale: f64,
    pub near: f64,
    pub far: f64,
    pub fov_degrees: f64,
    /// Without a camera the view transform is the identity
    pub camera: Option<Camera>,
    pub visibility: VisibilityPolicy,
}

impl RenderConfig {
    pub fn projection(&self) -> ProjectionConfig {
        ProjectionConfig {
            aspect: self.viewport.aspect(),
            near: self.near,
            far: self.far,
            fov_degrees: self.fov_degrees,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            scale: 0.1,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            fov_degrees: DEFAULT_FOV_DEGREES,
            camera: None,
            visibility: VisibilityPolicy::default(),
        }
    }
}

/// A projected point: centred pixel coordinates plus clip-space depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

/// One transformed face, in the winding order of its source face
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Index of the source face in the mesh
    pub face: usize,
    /// Clip-space x, y, z before viewport scaling
    pub clip: Vec<Vector3<f64>>,
    pub screen: Vec<ScreenPoint>,
}

/// Precomputed fixed matrices plus the configured visibility pass
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: RenderConfig,
    projection: Matrix4<f64>,
    view: Matrix4<f64>,
    scale: Matrix4<f64>,
    view_direction: Vector3<f64>,
}

impl Pipeline {
    pub fn new(config: RenderConfig) -> Self {
        let projection = config.projection().matrix();
        let (view, view_direction) = match &config.camera {
            Some(camera) => (camera.view_matrix(), camera.direction()),
            None => (Matrix4::identity(), default_view_direction()),
        };
        let scale = Transform::scale(config.scale);

        tracing::debug!(
            width = config.viewport.width,
            height = config.viewport.height,
            scale = config.scale,
            fov = config.fov_degrees,
            camera = config.camera.is_some(),
            visibility = ?config.visibility,
            "built render pipeline"
        );

        Self {
            config,
            projection,
            view,
            scale,
            view_direction,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn view_direction(&self) -> Vector3<f64> {
        self.view_direction
    }

    /// `projection * view * rotation * scale` for this frame
    pub fn model_view_projection(&self, state: &ModelState) -> Matrix4<f64> {
        let rotation = state.rotation.matrix();
        let view_projection = Transform::multiply(&self.projection, &self.view);
        Transform::multiply(&Transform::multiply(&view_projection, &rotation), &self.scale)
    }

    /// Transform every face of `mesh`, keeping mesh face order
    pub fn transform(&self, mesh: &Mesh, state: &ModelState) -> Vec<Polygon> {
        let mvp = self.model_view_projection(state);
        let (half_w, half_h) = self.config.viewport.half_extents();

        mesh.faces()
            .iter()
            .enumerate()
            .map(|(face, f)| {
                let clip: Vec<Vector3<f64>> = f
                    .vertices(mesh)
                    .map(|v| Transform::apply(&mvp, &v.position).xyz())
                    .collect();
                let screen = clip
                    .iter()
                    .map(|c| ScreenPoint {
                        x: c.x * half_w,
                        y: c.y * half_h,
                        depth: c.z,
                    })
                    .collect();
                Polygon { face, clip, screen }
            })
            .collect()
    }

    /// Transform and filter one frame; the returned order is the draw order
    pub fn frame(&self, mesh: &Mesh, state: &ModelState) -> Vec<Polygon> {
        let polygons = self.transform(mesh, state);
        let total = polygons.len();
        let visible = self
            .config
            .visibility
            .apply(polygons, &self.view_direction);
        tracing::trace!(total, visible = visible.len(), "frame");
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Rotation;

    #[test]
    fn test_one_polygon_per_face() {
        let mesh = Mesh::cube(2.0);
        let pipeline = Pipeline::new(RenderConfig::default());
        let polygons = pipeline.transform(&mesh, &ModelState::default());
        assert_eq!(polygons.len(), mesh.face_count());
        for (i, polygon) in polygons.iter().enumerate() {
            assert_eq!(polygon.face, i);
            assert_eq!(polygon.screen.len(), mesh.faces()[i].len());
            assert_eq!(polygon.clip.len(), polygon.screen.len());
        }
    }

    #[test]
    fn test_screen_scales_clip_by_half_viewport() {
        let pipeline = Pipeline::new(RenderConfig {
            viewport: Viewport::new(200.0, 100.0),
            ..Default::default()
        });
        let polygons = pipeline.transform(&Mesh::cube(1.0), &ModelState::new(Rotation::new(10.0, 20.0, 30.0), 0.0));
        for polygon in &polygons {
            for (c, s) in polygon.clip.iter().zip(&polygon.screen) {
                assert_eq!(s.x, c.x * 100.0);
                assert_eq!(s.y, c.y * 50.0);
                assert_eq!(s.depth, c.z);
            }
        }
    }

    #[test]
    fn test_depth_sort_frame_keeps_all_faces() {
        let mesh = Mesh::cube(2.0);
        let pipeline = Pipeline::new(RenderConfig::default());
        let frame = pipeline.frame(&mesh, &ModelState::default());
        let mut faces: Vec<_> = frame.iter().map(|p| p.face).collect();
        faces.sort_unstable();
        assert_eq!(faces, (0..6).collect::<Vec<_>>());
    }
}
