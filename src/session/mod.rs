//! Active video session: markers, chapter ranges and the controller.

mod chapters;
mod controller;
mod markers;

pub use chapters::*;
pub use controller::*;
pub use markers::*;
