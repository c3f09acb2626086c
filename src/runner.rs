use std::sync::Arc;
use std::time::Instant;

use futures::future;
use log::{debug, info, warn};

use crate::config::RunConfig;
use crate::report::{CheckRecorder, TRANSPORT_ERROR};
use crate::scenario::Scenario;

/// Read-only state shared by every worker: the pooled HTTP client, the run
/// configuration, and the check recorder.
#[derive(Clone)]
pub struct RequestContext {
    pub client: reqwest::Client,
    pub config: Arc<RunConfig>,
    pub recorder: Arc<CheckRecorder>,
}

/// Realizes a scenario's concurrency/duration policy: spawns the workers,
/// lets each loop back-to-back until the deadline, then drains them.
pub struct Runner {
    context: RequestContext,
}

impl Runner {
    pub fn new(config: Arc<RunConfig>, recorder: Arc<CheckRecorder>) -> anyhow::Result<Self> {
        let client = reqwest::ClientBuilder::new().build()?;
        Ok(Self {
            context: RequestContext {
                client,
                config,
                recorder,
            },
        })
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Run one scenario to completion and return the number of finished
    /// worker iterations.
    ///
    /// The deadline is cooperative: it is checked between iterations only, so
    /// an in-flight request is always allowed to finish. A transport error
    /// counts as a failed check and does not stop the worker.
    pub async fn run(&self, scenario: Scenario) -> u64 {
        if !scenario.start_offset.is_zero() {
            tokio::time::sleep(scenario.start_offset).await;
        }

        info!(
            "start scenario run: {} ({} workers for {:?})",
            scenario.name, scenario.concurrency, scenario.duration
        );
        let deadline = Instant::now() + scenario.duration;

        let mut workers = Vec::with_capacity(scenario.concurrency);
        for worker_id in 0..scenario.concurrency {
            let context = self.context.clone();
            let entry = scenario.entry;
            let name = scenario.name;

            workers.push(tokio::spawn(async move {
                let mut iterations: u64 = 0;
                while Instant::now() < deadline {
                    match entry(&context).await {
                        Ok(check) => context.recorder.record_check(&check),
                        Err(err) => {
                            warn!("{} worker {}: transport error: {}", name, worker_id, err);
                            context.recorder.record(TRANSPORT_ERROR, false);
                        }
                    }
                    iterations += 1;
                }
                debug!(
                    "{} worker {} drained after {} iterations",
                    name, worker_id, iterations
                );
                iterations
            }));
        }

        let mut completed: u64 = 0;
        for joined in future::join_all(workers).await {
            match joined {
                Ok(iterations) => completed += iterations,
                Err(err) => warn!("{} worker task failed: {:?}", scenario.name, err),
            }
        }

        info!(
            "scenario run exit: {} ({} iterations)",
            scenario.name, completed
        );
        completed
    }
}
