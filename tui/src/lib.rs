//! Folio TUI - Terminal surface for the folio code reel
//!
//! A full-screen rendition of the portfolio page: a framed panel where
//! sample source files type themselves out, a link bar with fading hover
//! titles, and an about panel that swaps in over the reel.
//!
//! # Architecture
//!
//! - **Compositor**: layered rendering with z-ordering for the swapping panels
//! - **Links**: link bar hit testing and the fading title label
//! - **Panels**: the code/about swap with its delayed fades
//! - **Widgets**: the code view (wrapping, tail-follow, cursor) and about text

pub mod app;
pub mod compositor;
pub mod fade;
pub mod links;
pub mod panels;
pub mod theme;
pub mod widgets;

pub use app::App;
