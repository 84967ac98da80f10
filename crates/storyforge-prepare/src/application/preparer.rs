//! The story preparer: the prepare phase of the composition pipeline.
//!
//! Preparation is synchronous and side-effect free; preparing the same
//! annotations twice yields equivalent prepared stories.

use std::sync::Arc;

use storyforge_core::clock::{Clock, SystemClock};
use storyforge_core::config::{FeatureFlags, ReadinessPolicy};
use storyforge_core::error::StoryError;
use storyforge_core::value::{Args, Parameters};
use tracing::{debug, instrument};

use super::decorators::{SequentialDecorators, collect_decorators};
use super::enhancers::{enhance_arg_types, enhance_args};
use super::merge::{
    combine_arg_types, combine_args, combine_parameters, combine_tags, normalize_arg_types,
};
use super::prepared_story::{InvokeRuntime, PreparedStory};
use crate::domain::annotations::{
    Annotations, ComponentAnnotations, ProjectAnnotations, StoryAnnotations,
};
use crate::domain::arg_types::ArgTypes;
use crate::domain::context::{DirectStepRunner, EnhancerContext, StepRunner, StoryContext};
use crate::domain::functions::{DecoratorStrategy, LoaderFn, StoryFn};

/// Process-wide configuration threaded into the preparer.
#[derive(Clone)]
pub struct PreparerConfig {
    /// Feature-flag bag.
    pub features: FeatureFlags,
    /// Poll schedule for the pre-play readiness wait.
    pub readiness: ReadinessPolicy,
    /// Clock used by the readiness wait.
    pub clock: Arc<dyn Clock>,
    /// Step runner exposed to play functions.
    pub step_runner: Arc<dyn StepRunner>,
}

impl Default for PreparerConfig {
    fn default() -> Self {
        Self {
            features: FeatureFlags::default(),
            readiness: ReadinessPolicy::default(),
            clock: Arc::new(SystemClock),
            step_runner: Arc::new(DirectStepRunner),
        }
    }
}

impl std::fmt::Debug for PreparerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparerConfig")
            .field("features", &self.features)
            .field("readiness", &self.readiness)
            .field("step_runner", &self.step_runner)
            .finish_non_exhaustive()
    }
}

/// Component annotations after merging with the project level and running
/// the enhancer chains.
#[derive(Debug, Clone)]
pub struct PreparedMeta {
    /// Component identifier.
    pub id: String,
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
}

/// Merged annotation fields before enhancement.
struct Merged {
    tags: Vec<String>,
    parameters: Parameters,
    arg_types: ArgTypes,
    args: Args,
}

/// Prepares stories against one set of project annotations.
pub struct StoryPreparer<O> {
    project: Arc<ProjectAnnotations<O>>,
    config: PreparerConfig,
}

impl<O: 'static> StoryPreparer<O> {
    /// Creates a preparer for `project` with explicit runtime configuration.
    #[must_use]
    pub fn new(project: ProjectAnnotations<O>, config: PreparerConfig) -> Self {
        Self {
            project: Arc::new(project),
            config,
        }
    }

    /// Returns the runtime configuration.
    #[must_use]
    pub fn config(&self) -> &PreparerConfig {
        &self.config
    }

    /// Prepares the component level on its own.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::User` if an enhancer fails.
    #[instrument(skip_all, fields(component_id = %component.id))]
    pub fn prepare_meta(
        &self,
        component: &ComponentAnnotations<O>,
    ) -> Result<PreparedMeta, StoryError> {
        let merged = merge_levels(&[&self.project.annotations, &component.annotations]);
        let (arg_types, initial_args) = self.enhance(EnhancerContext {
            id: component.id.clone(),
            name: String::new(),
            title: component.title.clone(),
            tags: merged.tags.clone(),
            parameters: merged.parameters.clone(),
            arg_types: merged.arg_types,
            initial_args: merged.args,
        })?;

        Ok(PreparedMeta {
            id: component.id.clone(),
            title: component.title.clone(),
            tags: merged.tags,
            parameters: merged.parameters,
            arg_types,
            initial_args,
        })
    }

    /// Prepares a story: merges the three levels, runs enhancers, composes
    /// decorators and resolves loaders and the play function.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::MissingRender` if no level declares a render
    /// function, or `StoryError::User` if an enhancer fails.
    #[instrument(skip_all, fields(story_id = %story.id))]
    pub fn prepare_story(
        &self,
        story: &StoryAnnotations<O>,
        component: &ComponentAnnotations<O>,
    ) -> Result<PreparedStory<O>, StoryError> {
        let project = &self.project.annotations;
        let levels: [&Annotations<O>; 3] =
            [project, &component.annotations, &story.annotations];

        let render = story
            .annotations
            .render
            .as_ref()
            .or(component.annotations.render.as_ref())
            .or(project.render.as_ref())
            .cloned()
            .ok_or_else(|| StoryError::MissingRender {
                story_id: story.id.clone(),
            })?;

        let merged = merge_levels(&levels);
        let (arg_types, initial_args) = self.enhance(EnhancerContext {
            id: story.id.clone(),
            name: story.name.clone(),
            title: component.title.clone(),
            tags: merged.tags.clone(),
            parameters: merged.parameters.clone(),
            arg_types: merged.arg_types,
            initial_args: merged.args,
        })?;

        let undecorated_story_fn: StoryFn<O> =
            Arc::new(move |context: &StoryContext| render(&context.args, context));
        let decorators = collect_decorators(
            &story.annotations.decorators,
            &component.annotations.decorators,
            &project.decorators,
        );
        let unbound_story_fn = match &self.project.apply_decorators {
            Some(strategy) => strategy.decorate(Arc::clone(&undecorated_story_fn), &decorators),
            None => SequentialDecorators.decorate(Arc::clone(&undecorated_story_fn), &decorators),
        };

        let loaders: Vec<LoaderFn> = levels
            .iter()
            .flat_map(|level| level.loaders.iter().cloned())
            .collect();
        let play_function = story.play.clone().or_else(|| component.play.clone());

        debug!(
            decorators = decorators.len(),
            loaders = loaders.len(),
            has_play = play_function.is_some(),
            "story prepared"
        );

        Ok(PreparedStory {
            id: story.id.clone(),
            name: story.name.clone(),
            title: component.title.clone(),
            tags: merged.tags,
            parameters: merged.parameters,
            arg_types,
            initial_args,
            initial_globals: self.project.initial_globals.clone(),
            undecorated_story_fn,
            unbound_story_fn,
            loaders,
            play_function,
            runtime: InvokeRuntime {
                features: self.config.features,
                readiness: self.config.readiness,
                clock: Arc::clone(&self.config.clock),
                step_runner: Arc::clone(&self.config.step_runner),
            },
        })
    }

    fn enhance(&self, mut context: EnhancerContext) -> Result<(ArgTypes, Args), StoryError> {
        context.arg_types = normalize_arg_types(enhance_arg_types(
            &self.project.arg_types_enhancers,
            &context,
        )?);
        let initial_args = enhance_args(&self.project.args_enhancers, &context)?;
        Ok((context.arg_types, initial_args))
    }
}

impl<O> std::fmt::Debug for StoryPreparer<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryPreparer")
            .field("project", &self.project)
            .field("config", &self.config)
            .finish()
    }
}

fn merge_levels<O>(levels: &[&Annotations<O>]) -> Merged {
    let tags: Vec<&[String]> = levels.iter().map(|level| level.tags.as_slice()).collect();
    let parameters: Vec<&Parameters> = levels.iter().map(|level| &level.parameters).collect();
    let arg_types: Vec<&ArgTypes> = levels.iter().map(|level| &level.arg_types).collect();
    let args: Vec<&Args> = levels.iter().map(|level| &level.args).collect();
    Merged {
        tags: combine_tags(&tags),
        parameters: combine_parameters(&parameters),
        arg_types: combine_arg_types(&arg_types),
        args: combine_args(&args),
    }
}
