//! Annotation levels: project, component, story.

use std::fmt;
use std::sync::Arc;

use storyforge_core::value::{Args, Globals, Parameters};

use super::arg_types::ArgTypes;
use super::functions::{
    ArgTypesEnhancer, ArgsEnhancer, Decorator, DecoratorStrategy, LoaderFn, PlayFn, RenderFn,
};

/// Fields every annotation level may declare.
pub struct Annotations<O> {
    /// Render function.
    pub render: Option<RenderFn<O>>,
    /// Decorators, innermost first.
    pub decorators: Vec<Decorator<O>>,
    /// Loaders, in declaration order.
    pub loaders: Vec<LoaderFn>,
    /// Nested parameters.
    pub parameters: Parameters,
    /// ArgType declarations.
    pub arg_types: ArgTypes,
    /// Initial argument values.
    pub args: Args,
    /// Tags; `!tag` removes a tag added at a lower level.
    pub tags: Vec<String>,
}

impl<O> Default for Annotations<O> {
    fn default() -> Self {
        Self {
            render: None,
            decorators: Vec::new(),
            loaders: Vec::new(),
            parameters: Parameters::new(),
            arg_types: ArgTypes::new(),
            args: Args::new(),
            tags: Vec::new(),
        }
    }
}

impl<O> fmt::Debug for Annotations<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotations")
            .field("render", &self.render.is_some())
            .field("decorators", &self.decorators.len())
            .field("loaders", &self.loaders.len())
            .field("parameters", &self.parameters)
            .field("arg_types", &self.arg_types)
            .field("args", &self.args)
            .field("tags", &self.tags)
            .finish()
    }
}

/// Project-wide annotations plus the hooks only the project level supplies.
pub struct ProjectAnnotations<O> {
    /// Shared annotation fields.
    pub annotations: Annotations<O>,
    /// Initial global values.
    pub initial_globals: Globals,
    /// ArgTypes enhancers, run in order.
    pub arg_types_enhancers: Vec<ArgTypesEnhancer>,
    /// Args enhancers, run in order.
    pub args_enhancers: Vec<ArgsEnhancer>,
    /// Decoration strategy; sequential wrapping when `None`.
    pub apply_decorators: Option<Arc<dyn DecoratorStrategy<O>>>,
}

impl<O> Default for ProjectAnnotations<O> {
    fn default() -> Self {
        Self {
            annotations: Annotations::default(),
            initial_globals: Globals::new(),
            arg_types_enhancers: Vec::new(),
            args_enhancers: Vec::new(),
            apply_decorators: None,
        }
    }
}

impl<O> fmt::Debug for ProjectAnnotations<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectAnnotations")
            .field("annotations", &self.annotations)
            .field("initial_globals", &self.initial_globals)
            .field("arg_types_enhancers", &self.arg_types_enhancers.len())
            .field("args_enhancers", &self.args_enhancers.len())
            .field("apply_decorators", &self.apply_decorators.is_some())
            .finish()
    }
}

/// Component-level (meta) annotations.
pub struct ComponentAnnotations<O> {
    /// Component identifier.
    pub id: String,
    /// Component title.
    pub title: String,
    /// Shared annotation fields.
    pub annotations: Annotations<O>,
    /// Default play function for the component's stories.
    pub play: Option<PlayFn>,
}

impl<O> ComponentAnnotations<O> {
    /// Creates empty component annotations.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            annotations: Annotations::default(),
            play: None,
        }
    }
}

impl<O> fmt::Debug for ComponentAnnotations<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentAnnotations")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("annotations", &self.annotations)
            .field("play", &self.play.is_some())
            .finish()
    }
}

/// Story-level annotations.
pub struct StoryAnnotations<O> {
    /// Story identifier.
    pub id: String,
    /// Story display name.
    pub name: String,
    /// Shared annotation fields.
    pub annotations: Annotations<O>,
    /// Play function; overrides the component's.
    pub play: Option<PlayFn>,
}

impl<O> StoryAnnotations<O> {
    /// Creates empty story annotations.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            annotations: Annotations::default(),
            play: None,
        }
    }
}

impl<O> fmt::Debug for StoryAnnotations<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryAnnotations")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("annotations", &self.annotations)
            .field("play", &self.play.is_some())
            .finish()
    }
}
