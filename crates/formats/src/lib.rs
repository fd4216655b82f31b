pub mod dataset_loader;
pub mod locations;

pub use dataset_loader::*;
pub use locations::*;
