//! User-supplied function types.
//!
//! Every function is shared behind an `Arc` so prepared stories can hand out
//! cheap clones. `O` is the renderer's output type.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use storyforge_core::error::BoxError;
use storyforge_core::value::{Args, Loaded};

use super::arg_types::ArgTypes;
use super::context::{EnhancerContext, StoryContext};

/// A framework render function: `(args, context) -> output`.
pub type RenderFn<O> = Arc<dyn Fn(&Args, &StoryContext) -> Result<O, BoxError> + Send + Sync>;

/// A render function with its arguments already bound: `(context) -> output`.
///
/// This is the shape decorators receive as their inner function and the shape
/// of the composed pipeline.
pub type StoryFn<O> = Arc<dyn Fn(&StoryContext) -> Result<O, BoxError> + Send + Sync>;

/// A decorator receives the next-inner story function and the current context.
pub type Decorator<O> =
    Arc<dyn Fn(&StoryFn<O>, &StoryContext) -> Result<O, BoxError> + Send + Sync>;

/// Strategy that turns a story function and its decorators into one story
/// function. Replaceable so runtimes can add lifecycle hooks around each
/// decorator without changing callers.
pub trait DecoratorStrategy<O>: Send + Sync {
    /// Wraps `story_fn` with `decorators`; the first decorator is innermost.
    fn decorate(&self, story_fn: StoryFn<O>, decorators: &[Decorator<O>]) -> StoryFn<O>;
}

/// An asynchronous loader producing data exposed to render and play as `loaded`.
pub type LoaderFn =
    Arc<dyn Fn(StoryContext) -> BoxFuture<'static, Result<Loaded, BoxError>> + Send + Sync>;

/// A post-render interaction script. Also the body type of a play step.
pub type PlayFn =
    Arc<dyn Fn(StoryContext) -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

/// Derives a new argTypes mapping from the accumulated enhancer context.
pub type ArgTypesEnhancer =
    Arc<dyn Fn(&EnhancerContext) -> Result<ArgTypes, BoxError> + Send + Sync>;

/// Derives a partial argument mapping from the accumulated enhancer context.
pub type ArgsEnhancer = Arc<dyn Fn(&EnhancerContext) -> Result<Args, BoxError> + Send + Sync>;

/// Adapts a legacy `(context) -> output` render function, which reads its
/// arguments from `context.args`.
#[must_use]
pub fn legacy_render<O, F>(render: F) -> RenderFn<O>
where
    F: Fn(&StoryContext) -> Result<O, BoxError> + Send + Sync + 'static,
    O: 'static,
{
    Arc::new(move |_args: &Args, context: &StoryContext| render(context))
}
