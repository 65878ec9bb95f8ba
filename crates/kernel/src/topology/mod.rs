pub mod edge;
pub mod polygon;
pub mod polyhedron;
pub mod primitives;
