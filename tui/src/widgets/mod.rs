//! Widgets

pub mod about;
pub mod code_view;

pub use about::AboutPanel;
pub use code_view::{tail_rows, wrap_rows, CodeView, CodeViewState};
