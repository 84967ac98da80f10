//! Shared test fakes and utilities for the Storyforge composition engine.

mod canvas;
mod clock;
mod logging;

pub use canvas::{CountdownCanvas, StaticCanvas};
pub use clock::RecordingClock;
pub use logging::init_tracing;
