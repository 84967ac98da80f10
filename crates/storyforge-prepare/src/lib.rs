//! Storyforge — Story Composition bounded context.
//!
//! Responsible for merging project, component and story annotations into
//! prepared stories, running argType/args enhancers, composing decorators
//! around the render function, and resolving targeted, mapped and
//! conditional arguments on every invocation.

pub mod application;
pub mod domain;
