/// Errors raised while loading a mesh
///
/// Every variant is fatal: a mesh source that produces one of these is
/// rejected as a whole and no partial mesh is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("line {line}: malformed {kind} record: {text:?}")]
    Malformed {
        line: usize,
        kind: &'static str,
        text: String,
    },
    #[error("line {line}: face references vertex {index}, but only {vertex_count} vertices are defined")]
    IndexOutOfRange {
        line: usize,
        index: i64,
        vertex_count: usize,
    },
    #[error("line {line}: face has {count} vertices, at least 3 are required")]
    DegenerateFace { line: usize, count: usize },
}
