//! Folio Core - Headless Typewriter Reel
//!
//! The code reel of the folio showcase: sample source files are picked at
//! random, fetched, and typed into a display surface one unit at a time.
//! Nothing in this crate knows how the surface is drawn; the TUI (or a test)
//! just reads the [`SharedSurface`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────── Reel (driver loop) ────────────────────────────┐
//! │                                                                            │
//! │   ┌──────────────────┐   claim / start   ┌──────────────┐   append         │
//! │   │ ContentScheduler │ ────────────────▶ │  Typewriter  │ ──────────▶ Surface
//! │   │ Catalog + Picker │ ◀──────────────── │ (animator)   │                  │
//! │   └────────┬─────────┘    is_running     └──────────────┘                  │
//! │            │ Fetch(id)                                                     │
//! │            ▼                                                               │
//! │   ┌──────────────────┐                                                     │
//! │   │  ContentFetcher  │  HttpFetcher (reqwest) / StaticFetcher              │
//! │   └──────────────────┘                                                     │
//! └────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Typewriter`]: reveals text one unit per tick
//! - [`ContentScheduler`]: picks the next file when the typewriter is idle
//! - [`Reel`]: steps both from a single `tokio::select!` loop
//! - [`FolioConfig`]: layered configuration (CLI > env > TOML > defaults)
//!
//! # Quick Start
//!
//! ```ignore
//! use folio_core::{load_config, Reel, SharedSurface};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let surface = SharedSurface::new();
//!     let mut reel = Reel::http(&config, surface.clone())?;
//!     reel.run(async { let _ = tokio::signal::ctrl_c().await; }).await;
//!     println!("{}", surface.snapshot().0);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod picker;
pub mod reel;
pub mod scheduler;
pub mod surface;
pub mod typewriter;

pub use catalog::{Catalog, DEFAULT_FILES};
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, FolioConfig, DEFAULT_MAX_LINES,
};
pub use error::{FolioError, Result};
pub use fetch::{ContentFetcher, FetchError, HttpFetcher, StaticFetcher};
pub use picker::{IndexPicker, SequencePicker, UniformPicker};
pub use reel::{Reel, ReelEvent, ReelState, ReelStats};
pub use scheduler::{Completion, ContentScheduler, PollDecision};
pub use surface::{Glyph, SharedSurface, Surface, TextSurface, WIDE_SPACE};
pub use typewriter::{Tick, Typewriter, DEFAULT_TICK_INTERVAL_MS};
