//! Test canvases — scripted `Canvas` implementations for tests.

use std::sync::atomic::{AtomicU32, Ordering};

use storyforge_core::canvas::Canvas;

/// A canvas whose populated state never changes.
#[derive(Debug, Clone, Copy)]
pub struct StaticCanvas(pub bool);

impl Canvas for StaticCanvas {
    fn has_content(&self) -> bool {
        self.0
    }
}

/// A canvas that reports content once it has been checked `empty_checks`
/// times. Counts every check so tests can assert on poll attempts.
#[derive(Debug)]
pub struct CountdownCanvas {
    empty_checks: u32,
    checks: AtomicU32,
}

impl CountdownCanvas {
    /// Creates a canvas that stays empty for the first `empty_checks` checks.
    #[must_use]
    pub fn new(empty_checks: u32) -> Self {
        Self {
            empty_checks,
            checks: AtomicU32::new(0),
        }
    }

    /// Returns how many times `has_content` has been called.
    #[must_use]
    pub fn checks(&self) -> u32 {
        self.checks.load(Ordering::SeqCst)
    }
}

impl Canvas for CountdownCanvas {
    fn has_content(&self) -> bool {
        let previous = self.checks.fetch_add(1, Ordering::SeqCst);
        previous >= self.empty_checks
    }
}
