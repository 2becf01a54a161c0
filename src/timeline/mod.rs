//! Timeline view-model: pointer tracking plus the derived per-frame layout.

mod layout;
mod view_model;

pub use layout::*;
pub use view_model::*;
