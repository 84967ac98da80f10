//! Story composition error types.

use thiserror::Error;

/// Error type returned by user-supplied functions (enhancers, loaders,
/// decorators, render and play functions).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level story composition error type.
#[derive(Debug, Error)]
pub enum StoryError {
    /// No render function is declared at story, component, or project level.
    #[error("no render function resolvable for story {story_id}")]
    MissingRender {
        /// The story that could not be prepared.
        story_id: String,
    },

    /// The render target never reported content within the poll budget.
    #[error("render target never populated after {max_attempts} attempts")]
    RenderTargetNeverPopulated {
        /// The attempt ceiling that was exhausted.
        max_attempts: u32,
    },

    /// Invalid runtime configuration (feature flags, environment).
    #[error("configuration error: {0}")]
    Config(String),

    /// An error raised by a user-supplied function, passed through untouched.
    #[error(transparent)]
    User(BoxError),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[derive(Debug, Error)]
    #[error("loader exploded")]
    struct LoaderFailure(#[source] std::io::Error);

    #[test]
    fn test_missing_render_names_the_story() {
        let err = StoryError::MissingRender {
            story_id: "button--primary".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "no render function resolvable for story button--primary"
        );
    }

    #[test]
    fn test_readiness_timeout_names_the_bound() {
        let err = StoryError::RenderTargetNeverPopulated { max_attempts: 100 };
        assert!(err.to_string().contains("100 attempts"));
    }

    #[test]
    fn test_user_error_is_transparent() {
        // Arrange
        let inner = LoaderFailure(std::io::Error::other("disk gone"));

        // Act
        let err = StoryError::User(Box::new(inner));

        // Assert
        assert_eq!(err.to_string(), "loader exploded");
        let source = err.source().expect("source chain is preserved");
        assert_eq!(source.to_string(), "disk gone");
    }
}
