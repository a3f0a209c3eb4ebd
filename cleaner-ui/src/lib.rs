pub mod api;
pub mod components;
pub mod editor;

pub use api::*;
pub use components::*;
pub use editor::*;
