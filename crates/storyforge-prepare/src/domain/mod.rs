//! Domain types for the Story Composition context.

pub mod annotations;
pub mod arg_types;
pub mod context;
pub mod functions;
