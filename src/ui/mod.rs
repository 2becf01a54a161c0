mod embed_panel;
mod main_window;
mod search_panel;
mod timeline_widget;

pub use embed_panel::*;
pub use main_window::*;
pub use search_panel::*;
pub use timeline_widget::*;
