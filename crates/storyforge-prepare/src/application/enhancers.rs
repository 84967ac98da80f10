//! ArgTypes and args enhancer chains.
//!
//! Both chains are strict left folds in declaration order. An enhancer error
//! aborts the chain and is returned unchanged.

use storyforge_core::error::StoryError;
use storyforge_core::value::Args;
use tracing::debug;

use crate::domain::arg_types::ArgTypes;
use crate::domain::context::EnhancerContext;
use crate::domain::functions::{ArgTypesEnhancer, ArgsEnhancer};

/// Runs argTypes enhancers; each one sees the previous one's output as
/// `context.arg_types` and replaces it.
///
/// # Errors
///
/// Returns `StoryError::User` with the first enhancer error.
pub fn enhance_arg_types(
    enhancers: &[ArgTypesEnhancer],
    context: &EnhancerContext,
) -> Result<ArgTypes, StoryError> {
    let mut accumulated = context.clone();
    for enhancer in enhancers {
        accumulated.arg_types = enhancer(&accumulated).map_err(StoryError::User)?;
    }
    debug!(
        story_id = %context.id,
        enhancers = enhancers.len(),
        arg_types = accumulated.arg_types.len(),
        "argTypes enhanced"
    );
    Ok(accumulated.arg_types)
}

/// Runs args enhancers; each returns a partial mapping shallow-merged onto
/// the accumulated initial args, which it sees as `context.initial_args`.
///
/// # Errors
///
/// Returns `StoryError::User` with the first enhancer error.
pub fn enhance_args(
    enhancers: &[ArgsEnhancer],
    context: &EnhancerContext,
) -> Result<Args, StoryError> {
    let mut accumulated = context.clone();
    for enhancer in enhancers {
        let partial = enhancer(&accumulated).map_err(StoryError::User)?;
        accumulated.initial_args.extend(partial);
    }
    debug!(
        story_id = %context.id,
        enhancers = enhancers.len(),
        args = accumulated.initial_args.len(),
        "args enhanced"
    );
    Ok(accumulated.initial_args)
}
