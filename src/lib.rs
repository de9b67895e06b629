pub mod blend;
pub mod error;
pub mod field;
pub mod grid;
pub mod interp;
pub mod mesh;
pub mod pipeline;
pub mod shape;
pub mod stl;
pub mod tables;
pub mod types;
pub mod utils;

pub use error::{Result, SpholyError};
pub use field::{Field, FieldParams};
pub use pipeline::{MeshConfig, generate_mesh};
pub use shape::ShapeKind;
