pub mod dot;
pub mod graph;
