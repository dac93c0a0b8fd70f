pub mod core;
pub mod kv;
pub mod migrate;
pub mod paths;
pub mod status;

pub use self::core::*;
