//! Decorator composition.

use std::sync::Arc;

use crate::domain::context::StoryContext;
use crate::domain::functions::{Decorator, DecoratorStrategy, StoryFn};

/// Default strategy: each decorator wraps the accumulated function, so
/// `[d1, d2, d3]` yields `d3(d2(d1(story_fn)))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialDecorators;

impl<O: 'static> DecoratorStrategy<O> for SequentialDecorators {
    fn decorate(&self, story_fn: StoryFn<O>, decorators: &[Decorator<O>]) -> StoryFn<O> {
        decorators.iter().fold(story_fn, |inner, decorator| {
            let decorator = Arc::clone(decorator);
            let wrapped: StoryFn<O> =
                Arc::new(move |context: &StoryContext| decorator(&inner, context));
            wrapped
        })
    }
}

/// Collects decorators story-level first, then component, then project, so
/// story decorators sit closest to the render function.
#[must_use]
pub fn collect_decorators<O>(
    story: &[Decorator<O>],
    component: &[Decorator<O>],
    project: &[Decorator<O>],
) -> Vec<Decorator<O>> {
    story
        .iter()
        .chain(component)
        .chain(project)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use storyforge_core::error::BoxError;

    use super::*;

    type Trace = Arc<Mutex<Vec<String>>>;

    fn tracing_decorator(label: &'static str, trace: &Trace) -> Decorator<String> {
        let trace = Arc::clone(trace);
        Arc::new(move |inner: &StoryFn<String>, context: &StoryContext| {
            trace.lock().unwrap().push(format!("enter {label}"));
            let output = inner(context)?;
            trace.lock().unwrap().push(format!("exit {label}"));
            Ok(format!("{label}({output})"))
        })
    }

    fn base() -> StoryFn<String> {
        Arc::new(|_context: &StoryContext| Ok("base".to_owned()))
    }

    #[test]
    fn test_collect_then_decorate_wraps_story_innermost() {
        // Arrange
        let trace: Trace = Arc::default();
        let decorators = collect_decorators(
            &[tracing_decorator("D1", &trace)],
            &[tracing_decorator("D2", &trace)],
            &[tracing_decorator("D3", &trace)],
        );

        // Act
        let story_fn = SequentialDecorators.decorate(base(), &decorators);
        let output = story_fn(&StoryContext::default()).unwrap();

        // Assert
        assert_eq!(output, "D3(D2(D1(base)))");
        assert_eq!(
            *trace.lock().unwrap(),
            vec!["enter D3", "enter D2", "enter D1", "exit D1", "exit D2", "exit D3"]
        );
    }

    #[test]
    fn test_decorate_without_decorators_returns_base() {
        let story_fn = SequentialDecorators.decorate(base(), &[]);
        assert_eq!(story_fn(&StoryContext::default()).unwrap(), "base");
    }

    #[test]
    fn test_decorator_may_skip_inner_function() {
        // Arrange
        let calls = Arc::new(Mutex::new(0));
        let counted = Arc::clone(&calls);
        let counting_base: StoryFn<String> = Arc::new(move |_context: &StoryContext| {
            *counted.lock().unwrap() += 1;
            Ok("base".to_owned())
        });
        let short_circuit: Decorator<String> =
            Arc::new(|_inner: &StoryFn<String>, _context: &StoryContext| {
                Ok("placeholder".to_owned())
            });

        // Act
        let story_fn = SequentialDecorators.decorate(counting_base, &[short_circuit]);
        let output = story_fn(&StoryContext::default()).unwrap();

        // Assert
        assert_eq!(output, "placeholder");
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_decorator_can_pass_updated_context_inward() {
        let echo_name: StoryFn<String> =
            Arc::new(|context: &StoryContext| Ok(context.name.clone()));
        let rename: Decorator<String> =
            Arc::new(|inner: &StoryFn<String>, context: &StoryContext| {
                let updated = StoryContext {
                    name: "Renamed".to_owned(),
                    ..context.clone()
                };
                inner(&updated)
            });

        let story_fn = SequentialDecorators.decorate(echo_name, &[rename]);

        assert_eq!(story_fn(&StoryContext::default()).unwrap(), "Renamed");
    }

    #[test]
    fn test_decorator_error_propagates() {
        let failing: Decorator<String> =
            Arc::new(|_inner: &StoryFn<String>, _context: &StoryContext| {
                Err::<String, BoxError>("theme provider missing".into())
            });

        let story_fn = SequentialDecorators.decorate(base(), &[failing]);
        let err = story_fn(&StoryContext::default()).unwrap_err();

        assert_eq!(err.to_string(), "theme provider missing");
    }
}
