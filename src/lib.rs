//! # ballbox
//!
//! Balls falling in a box, with a settings panel to play with.
//!
//! A grid of colored balls is dropped inside a rectangle. Gravity pulls them
//! down, the walls bounce them back with a little energy lost on every hit,
//! and an egui window lets you change gravity, ball count, spacing, radius
//! and container size while it runs.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ballbox::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     Simulation::new()
//!         .with_settings(Settings { gravity: 4.0, ..Settings::default() })
//!         .run()
//! }
//! ```
//!
//! ## Headless use
//!
//! [`World`] holds the whole simulation and needs no window, so it can be
//! stepped and drawn into a [`Canvas`] directly:
//!
//! ```
//! use ballbox::{draw_world, Canvas, Settings, World};
//!
//! let mut world = World::with_seed(Settings::default(), 42);
//! world.set_running(true);
//! for _ in 0..60 {
//!     world.sync_settings();
//!     world.step(1.0 / 60.0);
//! }
//!
//! let mut canvas = Canvas::new(1000, 1000);
//! draw_world(&mut canvas, &world);
//! ```
//!
//! ## Controls
//!
//! | Input | Effect |
//! |-------|--------|
//! | "Start/Stop Simulation" button, `Space` | toggle the simulation |
//! | "Reset Particles" button, `R` | respawn the grid and stop |
//! | `Escape` | quit |

pub mod ball;
pub mod canvas;
pub mod error;
mod gpu;
pub mod panel;
pub mod scene;
pub mod settings;
mod simulation;
pub mod time;
pub mod world;

pub use ball::{Ball, Rgba};
pub use canvas::Canvas;
pub use error::{AppError, GpuError, SettingsError};
pub use glam::Vec2;
pub use panel::{settings_panel, PanelAction, PanelState};
pub use scene::draw_world;
pub use settings::Settings;
pub use simulation::Simulation;
pub use time::FrameClock;
pub use world::{Container, World};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use ballbox::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::AppError;
    pub use crate::settings::Settings;
    pub use crate::simulation::Simulation;
    pub use crate::world::World;
    pub use crate::Vec2;
}
