pub mod api;
pub mod clock;
pub mod config;
pub mod editing;
pub mod images;
pub mod model;
pub mod normalize;
pub mod session;
pub mod store;
pub mod ui;
pub mod validate;
