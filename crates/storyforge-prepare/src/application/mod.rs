//! Application services for the Story Composition context.

pub mod decorators;
pub mod enhancers;
pub mod loaders;
pub mod merge;
pub mod prepared_story;
pub mod preparer;
pub mod readiness;
pub mod targets;
