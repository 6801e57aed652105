/// Geometry primitives: vertices, faces and meshes
use nalgebra::Vector4;

use crate::error::LoadError;
use crate::obj;

/// The cube rendered when no model is supplied, as OBJ text
pub const DEFAULT_MODEL: &str = include_str!("../assets/cube.obj");

/// A homogeneous vertex position (x, y, z, w)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector4<f64>,
}

impl Vertex {
    /// A point with `w = 1`
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::with_w(x, y, z, 1.0)
    }

    pub fn with_w(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self {
            position: Vector4::new(x, y, z, w),
        }
    }
}

/// A planar polygon referencing mesh vertices by 0-based index.
///
/// Index order is the winding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub indices: Vec<usize>,
}

impl Face {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Dereference this face's vertices in winding order
    pub fn vertices<'m>(&'m self, mesh: &'m Mesh) -> impl Iterator<Item = &'m Vertex> + 'm {
        self.indices.iter().map(move |&i| &mesh.vertices[i])
    }
}

/// A polygonal mesh: shared vertices plus ordered faces.
///
/// Built once through [`Mesh::from_obj`] or [`Mesh::cube`]; the fields are
/// read-only to the rest of the crate and every face index is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Parse OBJ vertex/face records into a mesh
    pub fn from_obj(source: &str) -> Result<Self, LoadError> {
        obj::parse_obj(source)
    }

    /// The embedded default cube
    pub fn default_model() -> Result<Self, LoadError> {
        Self::from_obj(DEFAULT_MODEL)
    }

    pub(crate) fn from_parts(vertices: Vec<Vertex>, faces: Vec<Face>) -> Self {
        debug_assert!(faces
            .iter()
            .all(|f| f.indices.iter().all(|&i| i < vertices.len())));
        Self { vertices, faces }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Create an axis-aligned cube centred on the origin.
    ///
    /// Faces are quads wound counter-clockwise when seen from outside, in
    /// the order -z, +z, -y, +y, -x, +x.
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let vertices = vec![
            Vertex::new(-h, -h, -h),
            Vertex::new(h, -h, -h),
            Vertex::new(h, h, -h),
            Vertex::new(-h, h, -h),
            Vertex::new(-h, -h, h),
            Vertex::new(h, -h, h),
            Vertex::new(h, h, h),
            Vertex::new(-h, h, h),
        ];
        let faces = [
            [0, 3, 2, 1], // -z
            [4, 5, 6, 7], // +z
            [0, 1, 5, 4], // -y
            [3, 7, 6, 2], // +y
            [0, 4, 7, 3], // -x
            [1, 2, 6, 5], // +x
        ]
        .into_iter()
        .map(|f| Face::new(f.to_vec()))
        .collect();

        Self::from_parts(vertices, faces)
    }
}
