use derive_more::{Display, From};

use crate::types::Value;

pub type Result<T> = core::result::Result<T, SpholyError>;

#[derive(Debug, Display, From)]
pub enum SpholyError {
    /// A field parameter was zero, negative or not finite.
    #[display("invalid parameter `{name}`: {value} (must be finite and positive)")]
    InvalidParameter { name: &'static str, value: Value },
    /// The shape selector did not name one of the five polyhedra.
    #[display("unknown shape `{_0}`")]
    UnknownShape(String),
    /// A sampling grid with a non-positive step or an inverted box.
    #[display("invalid sampling bounds: {_0}")]
    InvalidBounds(String),
    /// A voxel was evaluated with anything other than 8 corner values.
    #[display("expected 8 voxel corner values")]
    InvalidCorners,
    /// A triangle referenced a vertex that does not exist.
    #[display("triangle vertex index out of range")]
    InvalidIndex,
    /// The level set never crossed the sampling grid.
    #[display("surface does not cross the sampling grid")]
    EmptyMesh,
    #[display("i/o error: {_0}")]
    #[from]
    Io(std::io::Error),
}

impl std::error::Error for SpholyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpholyError::Io(err) => Some(err),
            _ => None,
        }
    }
}
