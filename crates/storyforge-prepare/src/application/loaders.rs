//! Loader fan-out.

use futures_util::future::try_join_all;
use storyforge_core::error::StoryError;
use storyforge_core::value::Loaded;
use tracing::debug;

use crate::domain::context::StoryContext;
use crate::domain::functions::LoaderFn;

/// Runs every loader concurrently against a snapshot of `context` and
/// merges their results in declaration order (last write wins per key).
///
/// # Errors
///
/// Returns `StoryError::User` with the first loader failure; no partial
/// result is kept.
pub async fn run_loaders(
    loaders: &[LoaderFn],
    context: &StoryContext,
) -> Result<Loaded, StoryError> {
    debug!(story_id = %context.id, loaders = loaders.len(), "running loaders");
    let results = try_join_all(loaders.iter().map(|loader| loader(context.clone())))
        .await
        .map_err(StoryError::User)?;
    let mut loaded = Loaded::new();
    for result in results {
        loaded.extend(result);
    }
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use futures_util::FutureExt;
    use serde_json::{Value, json};
    use storyforge_core::error::BoxError;

    use super::*;

    fn map(value: Value) -> Loaded {
        value.as_object().cloned().unwrap()
    }

    fn delayed_loader(delay_ms: u64, output: Value) -> LoaderFn {
        Arc::new(move |_context: StoryContext| {
            let output = map(output.clone());
            async move {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok::<Loaded, BoxError>(output)
            }
            .boxed()
        })
    }

    #[tokio::test]
    async fn test_results_merge_in_declared_order() {
        // Arrange: the first loader finishes last.
        let loaders = vec![
            delayed_loader(20, json!({ "a": 1 })),
            delayed_loader(0, json!({ "a": 2, "b": 3 })),
        ];

        // Act
        let loaded = run_loaders(&loaders, &StoryContext::default()).await.unwrap();

        // Assert
        assert_eq!(loaded, map(json!({ "a": 2, "b": 3 })));
    }

    #[tokio::test]
    async fn test_no_loaders_yield_empty_mapping() {
        let loaded = run_loaders(&[], &StoryContext::default()).await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_loaders_see_the_invocation_context() {
        let echo_id: LoaderFn = Arc::new(|context: StoryContext| {
            async move { Ok::<Loaded, BoxError>(map(json!({ "id": context.id }))) }.boxed()
        });
        let context = StoryContext {
            id: "card--empty".to_owned(),
            ..StoryContext::default()
        };

        let loaded = run_loaders(&[echo_id], &context).await.unwrap();

        assert_eq!(loaded["id"], json!("card--empty"));
    }

    #[tokio::test]
    async fn test_failing_loader_aborts_load() {
        let failing: LoaderFn = Arc::new(|_context: StoryContext| {
            async { Err::<Loaded, BoxError>("fixture missing".into()) }.boxed()
        });

        let result = run_loaders(
            &[delayed_loader(0, json!({ "a": 1 })), failing],
            &StoryContext::default(),
        )
        .await;

        match result {
            Err(StoryError::User(err)) => assert_eq!(err.to_string(), "fixture missing"),
            other => panic!("expected User error, got {other:?}"),
        }
    }
}
