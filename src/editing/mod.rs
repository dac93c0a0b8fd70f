pub mod geo;
pub mod insertion;
pub mod tracker;

pub use insertion::{InsertionChoice, best_insertion};
pub use tracker::{EditError, RouteEditTracker, Undone};
