pub mod arc;
pub mod geodesy;
pub mod projection;
pub mod vec;

pub use arc::*;
pub use geodesy::*;
pub use projection::*;
pub use vec::*;
