pub mod graph;
pub mod shortest_path;

pub use graph::{NetworkSpec, RoadNetwork};
pub use shortest_path::{reconstruct_path, shortest_paths, Route, ShortestPaths};
