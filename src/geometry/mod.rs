//! Pixel-space geometry for the fisheye timeline.
//!
//! Everything here is pure: inputs are pre-measured widths and positions, so the
//! functions can be exercised without any UI toolkit.

mod fisheye;
mod path;

pub use fisheye::*;
pub use path::*;
