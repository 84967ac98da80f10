//! Storyforge Core — shared abstractions.
//!
//! This crate defines the value model, error taxonomy and runtime
//! collaborators (clock, canvas, configuration) that the story composition
//! context depends on. It contains no composition logic.

pub mod canvas;
pub mod clock;
pub mod config;
pub mod error;
pub mod value;
