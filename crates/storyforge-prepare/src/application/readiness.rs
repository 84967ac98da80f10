//! Waiting for a render target to populate before play runs.

use storyforge_core::canvas::Canvas;
use storyforge_core::clock::Clock;
use storyforge_core::config::ReadinessPolicy;
use storyforge_core::error::StoryError;
use tracing::{debug, warn};

/// Polls `canvas` until it reports content.
///
/// Checks up to `policy.max_attempts` times; after failed attempt `n` it
/// sleeps `policy.delay_for(n)` (triangular backoff) before checking again.
/// No sleep follows the final check.
///
/// # Errors
///
/// Returns `StoryError::RenderTargetNeverPopulated` once every attempt has
/// found the canvas empty.
pub async fn wait_for_render(
    canvas: &dyn Canvas,
    clock: &dyn Clock,
    policy: &ReadinessPolicy,
) -> Result<(), StoryError> {
    let started = clock.now();
    for attempt in 1..=policy.max_attempts {
        if canvas.has_content() {
            debug!(
                attempt,
                waited_ms = (clock.now() - started).num_milliseconds(),
                "render target populated"
            );
            return Ok(());
        }
        if attempt < policy.max_attempts {
            clock.sleep(policy.delay_for(attempt)).await;
        }
    }
    warn!(
        max_attempts = policy.max_attempts,
        "render target never populated"
    );
    Err(StoryError::RenderTargetNeverPopulated {
        max_attempts: policy.max_attempts,
    })
}
