//! Contexts passed through enhancers, loaders, decorators, render and play.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use storyforge_core::canvas::Canvas;
use storyforge_core::error::BoxError;
use storyforge_core::value::{Args, Globals, Loaded, Parameters};

use super::arg_types::ArgTypes;
use super::functions::PlayFn;

/// Snapshot of merged annotation state handed to enhancers.
#[derive(Debug, Clone, Default)]
pub struct EnhancerContext {
    /// Story (or component) identifier.
    pub id: String,
    /// Story display name; empty when preparing a component.
    pub name: String,
    /// Component title.
    pub title: String,
    /// Merged tags.
    pub tags: Vec<String>,
    /// Merged parameters.
    pub parameters: Parameters,
    /// ArgTypes accumulated so far.
    pub arg_types: ArgTypes,
    /// Initial args accumulated so far.
    pub initial_args: Args,
}

/// Runs a named play step. Supplied by the runtime layer, e.g. to report
/// steps to an interactions panel.
#[async_trait]
pub trait StepRunner: Send + Sync + std::fmt::Debug {
    /// Runs `play` as the step called `label`.
    async fn run_step(
        &self,
        label: &str,
        play: PlayFn,
        context: StoryContext,
    ) -> Result<(), BoxError>;
}

/// Step runner that simply invokes the step body.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectStepRunner;

#[async_trait]
impl StepRunner for DirectStepRunner {
    async fn run_step(
        &self,
        _label: &str,
        play: PlayFn,
        context: StoryContext,
    ) -> Result<(), BoxError> {
        play(context).await
    }
}

/// Per-invocation state handed to loaders, decorators, render and play.
///
/// A fresh context is built for every invocation; prepared stories never
/// keep one.
#[derive(Debug, Clone, Default)]
pub struct StoryContext {
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
    /// Enhanced argTypes.
    pub arg_types: ArgTypes,
    /// Enhanced initial args.
    pub initial_args: Args,
    /// Working args: mapped, visible and (with targeting) untargeted only.
    pub args: Args,
    /// Args exactly as supplied, before mapping and filtering.
    pub unmapped_args: Args,
    /// Every supplied arg regardless of target.
    pub all_args: Args,
    /// Supplied args partitioned by target; `None` when targeting is off.
    pub args_by_target: Option<BTreeMap<String, Args>>,
    /// Current globals.
    pub globals: Globals,
    /// Merged loader output.
    pub loaded: Loaded,
    /// Render target handle.
    pub canvas: Option<Arc<dyn Canvas>>,
    /// Step runner available to play functions.
    pub step_runner: Option<Arc<dyn StepRunner>>,
}

impl StoryContext {
    /// Returns this context with a render target attached.
    #[must_use]
    pub fn with_canvas(mut self, canvas: Arc<dyn Canvas>) -> Self {
        self.canvas = Some(canvas);
        self
    }

    /// Runs a labelled step of a play function through the attached step
    /// runner, or directly when none is attached.
    ///
    /// # Errors
    ///
    /// Returns whatever error the step body (or runner) produces.
    pub async fn step(&self, label: &str, play: PlayFn) -> Result<(), BoxError> {
        match &self.step_runner {
            Some(runner) => runner.run_step(label, play, self.clone()).await,
            None => play(self.clone()).await,
        }
    }
}
