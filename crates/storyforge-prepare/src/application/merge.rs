//! Layered merging of annotation fields.
//!
//! Inputs are ordered lowest precedence first (project, component, story).

use serde_json::{Map, Value};
use storyforge_core::value::{Args, Parameters};

use crate::domain::arg_types::{ArgType, ArgTypes};

/// Deep-merges `overlay` into `base`. Objects merge key by key; every other
/// value (arrays included) replaces the base value whole.
pub fn merge_json(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => merge_maps(base, overlay),
        (base, overlay) => *base = overlay.clone(),
    }
}

fn merge_maps(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        match base.get_mut(key) {
            Some(existing) => merge_json(existing, value),
            None => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Deep-merges parameter sets.
#[must_use]
pub fn combine_parameters(levels: &[&Parameters]) -> Parameters {
    let mut combined = Parameters::new();
    for level in levels {
        merge_maps(&mut combined, level);
    }
    combined
}

/// Shallow-merges initial args: a higher level replaces an argument's whole
/// value.
#[must_use]
pub fn combine_args(levels: &[&Args]) -> Args {
    let mut combined = Args::new();
    for level in levels {
        combined.extend(level.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    combined
}

/// Merges argType declarations per argument name and fills in missing names.
#[must_use]
pub fn combine_arg_types(levels: &[&ArgTypes]) -> ArgTypes {
    let mut combined = ArgTypes::new();
    for level in levels {
        for (name, arg_type) in *level {
            combined
                .entry(name.clone())
                .and_modify(|existing| overlay_arg_type(existing, arg_type))
                .or_insert_with(|| arg_type.clone());
        }
    }
    normalize_arg_types(combined)
}

fn overlay_arg_type(base: &mut ArgType, overlay: &ArgType) {
    if overlay.name.is_some() {
        base.name.clone_from(&overlay.name);
    }
    if overlay.target.is_some() {
        base.target.clone_from(&overlay.target);
    }
    if overlay.condition.is_some() {
        base.condition.clone_from(&overlay.condition);
    }
    if let Some(mapping) = &overlay.mapping {
        merge_maps(base.mapping.get_or_insert_with(Map::new), mapping);
    }
    merge_maps(&mut base.extra, &overlay.extra);
}

/// Sets each descriptor's `name` to its key when not declared.
#[must_use]
pub fn normalize_arg_types(mut arg_types: ArgTypes) -> ArgTypes {
    for (key, arg_type) in &mut arg_types {
        if arg_type.name.is_none() {
            arg_type.name = Some(key.clone());
        }
    }
    arg_types
}

/// Concatenates tags in level order, keeping first appearances. `!tag`
/// removes a tag added earlier and is never emitted itself.
#[must_use]
pub fn combine_tags(levels: &[&[String]]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in levels.iter().flat_map(|level| level.iter()) {
        if let Some(removed) = tag.strip_prefix('!') {
            tags.retain(|t| t != removed);
        } else if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::arg_types::{Condition, ConditionTest};

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|t| (*t).to_owned()).collect()
    }

    #[test]
    fn test_combine_parameters_merges_nested_objects_by_precedence() {
        // Arrange
        let project = map(json!({
            "layout": "padded",
            "backgrounds": { "default": "light", "values": ["light", "dark"] },
            "docs": { "source": { "type": "auto" } }
        }));
        let component = map(json!({
            "backgrounds": { "default": "dark" },
            "docs": { "source": { "language": "rust" } }
        }));
        let story = map(json!({
            "layout": "centered",
            "backgrounds": { "values": ["blue"] }
        }));

        // Act
        let combined = combine_parameters(&[&project, &component, &story]);

        // Assert
        assert_eq!(
            Value::Object(combined),
            json!({
                "layout": "centered",
                "backgrounds": { "default": "dark", "values": ["blue"] },
                "docs": { "source": { "type": "auto", "language": "rust" } }
            })
        );
    }

    #[test]
    fn test_combine_parameters_non_object_replaces_object() {
        let project = map(json!({ "viewport": { "width": 320 } }));
        let story = map(json!({ "viewport": false }));

        let combined = combine_parameters(&[&project, &story]);

        assert_eq!(combined.get("viewport"), Some(&json!(false)));
    }

    #[test]
    fn test_combine_parameters_with_no_levels_is_empty() {
        assert!(combine_parameters(&[]).is_empty());
    }

    #[test]
    fn test_combine_args_replaces_whole_values() {
        let project = map(json!({ "style": { "color": "red", "size": 1 }, "label": "p" }));
        let story = map(json!({ "style": { "color": "blue" } }));

        let combined = combine_args(&[&project, &story]);

        assert_eq!(
            Value::Object(combined),
            json!({ "style": { "color": "blue" }, "label": "p" })
        );
    }

    #[test]
    fn test_combine_arg_types_overlays_per_argument() {
        // Arrange
        let mut project = ArgTypes::new();
        project.insert(
            "size".to_owned(),
            ArgType::targeted("panelA").with_mapping(map(json!({ "s": 8, "m": 12 }))),
        );
        project.insert(
            "label".to_owned(),
            serde_json::from_value(json!({ "control": { "type": "text" } })).unwrap(),
        );
        let mut story = ArgTypes::new();
        story.insert(
            "size".to_owned(),
            ArgType::default()
                .with_mapping(map(json!({ "m": 14 })))
                .with_condition(Condition::arg("label", ConditionTest::Truthy(true))),
        );

        // Act
        let combined = combine_arg_types(&[&project, &story]);

        // Assert
        let size = &combined["size"];
        assert_eq!(size.name.as_deref(), Some("size"));
        assert_eq!(size.target.as_deref(), Some("panelA"));
        assert_eq!(size.mapping, Some(map(json!({ "s": 8, "m": 14 }))));
        assert!(size.condition.is_some());
        assert_eq!(combined["label"].name.as_deref(), Some("label"));
        assert_eq!(
            combined["label"].extra.get("control"),
            Some(&json!({ "type": "text" }))
        );
    }

    #[test]
    fn test_combine_tags_dedupes_in_append_order() {
        let project = tags(&["dev", "test"]);
        let component = tags(&["autodocs", "dev"]);
        let story = tags(&["test", "experimental"]);

        let combined = combine_tags(&[&project, &component, &story]);

        assert_eq!(combined, tags(&["dev", "test", "autodocs", "experimental"]));
    }

    #[test]
    fn test_combine_tags_removal_marker_drops_earlier_tag() {
        let project = tags(&["dev", "test"]);
        let story = tags(&["!test", "!never-added"]);

        let combined = combine_tags(&[&project, &story]);

        assert_eq!(combined, tags(&["dev"]));
    }
}
