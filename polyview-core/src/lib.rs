/// Polyview Core - mesh loading, transform pipeline and visibility
///
/// This library provides the stateless core of the renderer: OBJ parsing,
/// 4x4 transform matrices, the model/view/projection chain and the
/// visibility passes that turn a mesh into ordered screen-space polygons.

pub mod error;
pub mod geometry;
pub mod obj;
pub mod pipeline;
pub mod projection;
pub mod state;
pub mod transform;
pub mod visibility;

// Re-export commonly used types
pub use error::LoadError;
pub use geometry::{Face, Mesh, Vertex, DEFAULT_MODEL};
pub use pipeline::{Pipeline, Polygon, RenderConfig, ScreenPoint};
pub use projection::{Camera, ProjectionConfig, Viewport};
pub use state::{InputEvent, ModelState, Rotation};
pub use transform::Transform;
pub use visibility::VisibilityPolicy;
