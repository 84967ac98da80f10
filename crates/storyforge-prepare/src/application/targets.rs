//! Per-invocation argument resolution: target routing, value mapping and
//! conditional inclusion.

use std::collections::BTreeMap;

use serde_json::Value;
use storyforge_core::config::FeatureFlags;
use storyforge_core::value::Args;
use tracing::trace;

use crate::domain::arg_types::{ArgTypes, include_conditional_arg};
use crate::domain::context::StoryContext;

/// Bucket for arguments whose argType declares no target.
pub const UNTARGETED: &str = "UNTARGETED";

/// Partitions args by their argType target. Buckets exist only when at least
/// one argument lands in them.
#[must_use]
pub fn group_args_by_target(args: &Args, arg_types: &ArgTypes) -> BTreeMap<String, Args> {
    let mut groups: BTreeMap<String, Args> = BTreeMap::new();
    for (name, value) in args {
        let target = arg_types
            .get(name)
            .and_then(|arg_type| arg_type.target.as_deref())
            .unwrap_or(UNTARGETED);
        groups
            .entry(target.to_owned())
            .or_default()
            .insert(name.clone(), value.clone());
    }
    groups
}

/// Resolves every argument through its argType mapping table. Array values
/// map element-wise.
#[must_use]
pub fn map_args(args: &Args, arg_types: &ArgTypes) -> Args {
    args.iter()
        .map(|(name, value)| {
            let mapped = match arg_types.get(name) {
                Some(arg_type) if arg_type.mapping.is_some() => match value {
                    Value::Array(items) => {
                        Value::Array(items.iter().map(|item| arg_type.map_value(item)).collect())
                    }
                    other => arg_type.map_value(other),
                },
                _ => value.clone(),
            };
            (name.clone(), mapped)
        })
        .collect()
}

/// Resolves the context's supplied args for one invocation.
///
/// On return `unmapped_args` and `all_args` hold the args as supplied,
/// `args_by_target` holds the per-target partition (targeting on only), and
/// `args` holds the mapped, visible args of the working set: the untargeted
/// bucket with targeting on, every arg otherwise. Conditions are evaluated
/// against the full mapped argument set and the current globals.
#[must_use]
pub fn resolve_args(mut context: StoryContext, features: FeatureFlags) -> StoryContext {
    let supplied = std::mem::take(&mut context.args);
    let mapped = map_args(&supplied, &context.arg_types);

    let (working, args_by_target) = if features.arg_type_targets {
        let groups = group_args_by_target(&supplied, &context.arg_types);
        let untargeted = groups.get(UNTARGETED).cloned().unwrap_or_default();
        (untargeted, Some(groups))
    } else {
        (supplied.clone(), None)
    };

    let included: Args = working
        .keys()
        .filter(|name| {
            include_conditional_arg(context.arg_types.get(*name), &mapped, &context.globals)
        })
        .filter_map(|name| mapped.get(name).map(|value| (name.clone(), value.clone())))
        .collect();

    trace!(
        story_id = %context.id,
        supplied = supplied.len(),
        included = included.len(),
        targeted = features.arg_type_targets,
        "args resolved"
    );

    context.all_args = supplied.clone();
    context.unmapped_args = supplied;
    context.args_by_target = args_by_target;
    context.args = included;
    context
}
