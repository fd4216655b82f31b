//! Outreach map: hub-and-spoke partner network with three filtered views.
//!
//! [`ViewController`] owns the current view and a [`RenderScheduler`] whose
//! per-activation [`RenderToken`](foundation::ids::RenderToken) keeps
//! insertions staged for an abandoned view from ever reaching the map.

pub mod config;
pub mod controller;
pub mod filter;
pub mod rules;
pub mod scheduler;
pub mod view;
pub mod widget;

pub use config::*;
pub use controller::*;
pub use filter::*;
pub use rules::*;
pub use scheduler::*;
pub use view::*;
pub use widget::*;
