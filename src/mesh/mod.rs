pub mod vertex;
pub mod primitives;

pub use vertex::{Mesh, Vertex};
pub use primitives::{primitive, quad};
