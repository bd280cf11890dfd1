//! Discovery of the containers a collection pass iterates over.
pub mod docker;

pub use docker::{Error, list_running_containers};
