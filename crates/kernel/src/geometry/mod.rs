pub mod scalar;
pub mod angle;
pub mod vector;
pub mod point;
pub mod line;
pub mod plane;
