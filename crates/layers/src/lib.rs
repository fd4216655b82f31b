pub mod layer;
pub mod popup;
pub mod recording;
pub mod surface;
pub mod symbology;

pub use layer::*;
pub use popup::*;
pub use recording::*;
pub use surface::*;
pub use symbology::*;
