/// Wavefront OBJ parser for the vertex/face subset of the format
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{char, i64 as index, space0, space1},
    combinator::{all_consuming, eof, opt},
    multi::many1,
    number::complete::double,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::LoadError;
use crate::geometry::{Face, Mesh, Vertex};

/// A record we care about, with the text following its keyword
enum Record<'a> {
    Vertex(&'a str),
    Face(&'a str),
    Other,
}

fn classify(line: &str) -> Record<'_> {
    fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
        terminated(tag(kw), alt((space1, eof)))
    }

    if let Ok((rest, _)) = keyword("v")(line) {
        Record::Vertex(rest)
    } else if let Ok((rest, _)) = keyword("f")(line) {
        Record::Face(rest)
    } else {
        Record::Other
    }
}

fn vertex_fields(input: &str) -> IResult<&str, Vertex> {
    let (input, (x, y, z, w)) = all_consuming(terminated(
        tuple((
            double,
            preceded(space1, double),
            preceded(space1, double),
            opt(preceded(space1, double)),
        )),
        space0,
    ))(input)?;
    Ok((input, Vertex::with_w(x, y, z, w.unwrap_or(1.0))))
}

/// `index[/texture[/normal]]`; only the position index is kept
fn face_ref(input: &str) -> IResult<&str, i64> {
    terminated(index, opt(preceded(char('/'), is_not(" \t"))))(input)
}

fn face_fields(input: &str) -> IResult<&str, Vec<i64>> {
    all_consuming(terminated(many1(preceded(space0, face_ref)), space0))(input)
}

/// Parse OBJ text into a [`Mesh`].
///
/// Vertex lines (`v x y z [w]`) and face lines (`f i[/t[/n]] ...`) are read;
/// anything else is skipped. Face indices are 1-based and may only refer to
/// vertices defined earlier in the text. The first bad record aborts the load.
pub fn parse_obj(source: &str) -> Result<Mesh, LoadError> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for (n, raw) in source.lines().enumerate() {
        let line_no = n + 1;
        let line = raw.trim_end();

        match classify(line) {
            Record::Vertex(rest) => {
                let (_, vertex) = vertex_fields(rest).map_err(|_| LoadError::Malformed {
                    line: line_no,
                    kind: "vertex",
                    text: line.to_string(),
                })?;
                vertices.push(vertex);
            }
            Record::Face(rest) => {
                let (_, refs) = face_fields(rest).map_err(|_| LoadError::Malformed {
                    line: line_no,
                    kind: "face",
                    text: line.to_string(),
                })?;
                if refs.len() < 3 {
                    return Err(LoadError::DegenerateFace {
                        line: line_no,
                        count: refs.len(),
                    });
                }

                let indices = refs
                    .into_iter()
                    .map(|i| resolve_index(i, vertices.len(), line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                faces.push(Face::new(indices));
            }
            Record::Other => {}
        }
    }

    tracing::debug!(
        vertices = vertices.len(),
        faces = faces.len(),
        "loaded OBJ mesh"
    );

    Ok(Mesh::from_parts(vertices, faces))
}

fn resolve_index(index: i64, vertex_count: usize, line: usize) -> Result<usize, LoadError> {
    match usize::try_from(index) {
        Ok(i) if (1..=vertex_count).contains(&i) => Ok(i - 1),
        _ => Err(LoadError::IndexOutOfRange {
            line,
            index,
            vertex_count,
        }),
    }
}
