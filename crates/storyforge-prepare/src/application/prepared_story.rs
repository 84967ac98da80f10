//! The prepared story and its invoke phase.

use std::fmt;
use std::sync::Arc;

use storyforge_core::clock::Clock;
use storyforge_core::config::{FeatureFlags, ReadinessPolicy};
use storyforge_core::error::StoryError;
use storyforge_core::value::{Args, Globals, Parameters};
use tracing::debug;

use super::loaders::run_loaders;
use super::readiness::wait_for_render;
use super::targets::resolve_args;
use crate::domain::arg_types::ArgTypes;
use crate::domain::context::{StepRunner, StoryContext};
use crate::domain::functions::{LoaderFn, PlayFn, StoryFn};

/// Runtime collaborators a prepared story needs during invocation.
#[derive(Clone)]
pub(crate) struct InvokeRuntime {
    pub features: FeatureFlags,
    pub readiness: ReadinessPolicy,
    pub clock: Arc<dyn Clock>,
    pub step_runner: Arc<dyn StepRunner>,
}

/// A story with its annotations merged, enhanced and decorated.
///
/// Holds no runtime args or globals: every invocation supplies its own
/// `StoryContext`.
pub struct PreparedStory<O> {
    /// Story identifier.
    pub id: String,
    /// Story display name.
    pub name: String,
    /// Component title.
    pub title: String,
    /// Merged tags.
    pub tags: Vec<String>,
    /// Merged parameters.
    pub parameters: Parameters,
    /// Merged and enhanced argTypes.
    pub arg_types: ArgTypes,
    /// Merged and enhanced initial args.
    pub initial_args: Args,
    /// Project-level initial globals.
    pub initial_globals: Globals,
    /// The render function with args bound from the context, no decorators.
    pub undecorated_story_fn: StoryFn<O>,
    /// The render function wrapped by every decorator.
    pub unbound_story_fn: StoryFn<O>,
    pub(crate) loaders: Vec<LoaderFn>,
    pub(crate) play_function: Option<PlayFn>,
    pub(crate) runtime: InvokeRuntime,
}

impl<O> PreparedStory<O> {
    /// Builds a fresh invocation context. `args` overlay the initial args and
    /// `globals` overlay the project's initial globals.
    #[must_use]
    pub fn new_context(&self, args: Args, globals: Globals) -> StoryContext {
        let mut merged_args = self.initial_args.clone();
        merged_args.extend(args);
        let mut merged_globals = self.initial_globals.clone();
        merged_globals.extend(globals);
        StoryContext {
            id: self.id.clone(),
            name: self.name.clone(),
            title: self.title.clone(),
            tags: self.tags.clone(),
            parameters: self.parameters.clone(),
            arg_types: self.arg_types.clone(),
            initial_args: self.initial_args.clone(),
            args: merged_args,
            globals: merged_globals,
            ..StoryContext::default()
        }
    }

    /// Resolves targeted, mapped and conditional args for one invocation.
    #[must_use]
    pub fn prepare_context(&self, context: StoryContext) -> StoryContext {
        resolve_args(context, self.runtime.features)
    }

    /// Number of loaders resolved across the three levels.
    #[must_use]
    pub fn loader_count(&self) -> usize {
        self.loaders.len()
    }

    /// Whether the story (or its component) declares a play function.
    #[must_use]
    pub fn has_play_function(&self) -> bool {
        self.play_function.is_some()
    }

    /// Runs every loader concurrently and attaches the merged result as
    /// `context.loaded`.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::User` with the first loader failure.
    pub async fn apply_loaders(
        &self,
        mut context: StoryContext,
    ) -> Result<StoryContext, StoryError> {
        context.loaded = run_loaders(&self.loaders, &context).await?;
        Ok(context)
    }

    /// Invokes the decorated render pipeline.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::User` with any render or decorator failure.
    pub fn render(&self, context: &StoryContext) -> Result<O, StoryError> {
        (self.unbound_story_fn)(context).map_err(StoryError::User)
    }

    /// Runs the play function, if any, once the canvas has content. The play
    /// context gets the configured step runner attached.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::RenderTargetNeverPopulated` when the canvas stays
    /// empty, or `StoryError::User` with the play function's failure.
    pub async fn play(&self, mut context: StoryContext) -> Result<(), StoryError> {
        let Some(play) = &self.play_function else {
            return Ok(());
        };
        match &context.canvas {
            Some(canvas) => {
                wait_for_render(
                    canvas.as_ref(),
                    self.runtime.clock.as_ref(),
                    &self.runtime.readiness,
                )
                .await?;
            }
            None => debug!(story_id = %self.id, "no canvas attached, skipping readiness wait"),
        }
        context.step_runner = Some(Arc::clone(&self.runtime.step_runner));
        play(context).await.map_err(StoryError::User)
    }

    /// Runs the whole invoke phase: resolve args, load, render, play.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any stage.
    pub async fn run(&self, context: StoryContext) -> Result<O, StoryError> {
        let context = self.prepare_context(context);
        let context = self.apply_loaders(context).await?;
        let output = self.render(&context)?;
        self.play(context).await?;
        Ok(output)
    }
}

impl<O> fmt::Debug for PreparedStory<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedStory")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("title", &self.title)
            .field("tags", &self.tags)
            .field("parameters", &self.parameters)
            .field("arg_types", &self.arg_types)
            .field("initial_args", &self.initial_args)
            .field("loaders", &self.loaders.len())
            .field("play_function", &self.play_function.is_some())
            .finish_non_exhaustive()
    }
}
