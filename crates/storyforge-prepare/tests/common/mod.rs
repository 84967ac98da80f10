//! Shared test helpers for preparation pipeline integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::FutureExt;
use serde_json::Value;
use storyforge_core::clock::Clock;
use storyforge_core::config::FeatureFlags;
use storyforge_core::error::BoxError;
use storyforge_core::value::{Args, Loaded};
use storyforge_prepare::application::preparer::PreparerConfig;
use storyforge_prepare::domain::context::{StepRunner, StoryContext};
use storyforge_prepare::domain::functions::{LoaderFn, PlayFn};
use storyforge_test_support::RecordingClock;

/// Converts a JSON object literal into an argument-style map.
pub fn map(value: Value) -> Args {
    value.as_object().cloned().unwrap_or_default()
}

/// Step runner that records step labels before running each step.
#[derive(Debug, Default)]
pub struct RecordingStepRunner {
    labels: Mutex<Vec<String>>,
}

impl RecordingStepRunner {
    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().unwrap().clone()
    }
}

#[async_trait]
impl StepRunner for RecordingStepRunner {
    async fn run_step(
        &self,
        label: &str,
        play: PlayFn,
        context: StoryContext,
    ) -> Result<(), BoxError> {
        self.labels.lock().unwrap().push(label.to_owned());
        play(context).await
    }
}

/// Build a preparer config with a recording clock and step runner.
pub fn recording_config(
    arg_type_targets: bool,
) -> (PreparerConfig, Arc<RecordingClock>, Arc<RecordingStepRunner>) {
    let clock = Arc::new(RecordingClock::default());
    let runner = Arc::new(RecordingStepRunner::default());
    let config = PreparerConfig {
        features: FeatureFlags { arg_type_targets },
        clock: Arc::clone(&clock) as Arc<dyn Clock>,
        step_runner: Arc::clone(&runner) as Arc<dyn StepRunner>,
        ..PreparerConfig::default()
    };
    (config, clock, runner)
}

/// A loader that resolves to `output` after `delay_ms` of real time.
pub fn delayed_loader(delay_ms: u64, output: Value) -> LoaderFn {
    Arc::new(move |_context: StoryContext| {
        let output = map(output.clone());
        async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Ok::<Loaded, BoxError>(output)
        }
        .boxed()
    })
}
