//! Round orchestration: plan generation, worker fan-out, barriers.

use crate::worker;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use trx_config::Config;
use trx_corpus::WordCorpus;

/// Operation counts for one worker session in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    pub owner_id: i32,
    pub insert_cnt: u32,
    pub update_cnt: u32,
    pub delete_cnt: u32,
}

/// Outcome of one round.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundMetrics {
    /// Number of worker sessions launched.
    pub workers: usize,
    /// Number of sessions that failed (connection or DML).
    pub failures: usize,
    /// Wall-clock time from first spawn to last join.
    pub elapsed: Duration,
}

/// Build one plan per owner id `1..=workers`. Insert counts are uniform
/// in `[1, max_insert]`; update and delete counts are each uniform in
/// `[1, insert_cnt]`, drawn independently.
pub fn build_plans<R: Rng + ?Sized>(workers: u32, max_insert: u32, rng: &mut R) -> Vec<BatchPlan> {
    (1..=workers as i32)
        .map(|owner_id| {
            let insert_cnt = rng.random_range(1..=max_insert);
            BatchPlan {
                owner_id,
                insert_cnt,
                update_cnt: rng.random_range(1..=insert_cnt),
                delete_cnt: rng.random_range(1..=insert_cnt),
            }
        })
        .collect()
}

/// Uniform inter-round pause in `[batch_pause_min, batch_pause_max]`
/// seconds, inclusive.
pub fn pause_duration<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Duration {
    Duration::from_secs(rng.random_range(config.batch_pause_min..=config.batch_pause_max))
}

/// Run one round: spawn every worker session, then wait for all of them.
///
/// The join is a barrier, not a pipeline; a failed or panicked worker is
/// counted and never cancels its siblings. Workers log their own
/// failures, so only panics are logged here.
pub async fn run_round(
    config: Arc<Config>,
    corpus: Option<Arc<WordCorpus>>,
    plans: Vec<BatchPlan>,
) -> RoundMetrics {
    let start = Instant::now();
    let workers = plans.len();

    let mut handles = Vec::with_capacity(workers);
    for plan in plans {
        let config = Arc::clone(&config);
        let corpus = corpus.clone();
        handles.push((
            plan.owner_id,
            tokio::spawn(worker::run_worker(config, corpus, plan)),
        ));
    }

    let mut failures = 0;
    for (owner_id, handle) in handles {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => failures += 1,
            Err(e) => {
                warn!(owner_id, "worker task aborted: {e}");
                failures += 1;
            }
        }
    }

    RoundMetrics {
        workers,
        failures,
        elapsed: start.elapsed(),
    }
}

/// Execute `n` sequential rounds, pausing between rounds but not after
/// the last one.
pub async fn run_rounds(n: u32, config: Arc<Config>, corpus: Option<Arc<WordCorpus>>) {
    for round in 1..=n {
        let plans = {
            let mut rng = rand::rng();
            build_plans(config.workers, config.max_insert, &mut rng)
        };
        let metrics = run_round(Arc::clone(&config), corpus.clone(), plans).await;
        info!(
            "batch {} finished, elapsed {:.2} seconds ({} workers, {} failed)",
            round,
            metrics.elapsed.as_secs_f64(),
            metrics.workers,
            metrics.failures
        );

        if round < n {
            let pause = {
                let mut rng = rand::rng();
                pause_duration(&config, &mut rng)
            };
            debug!(?pause, "pausing before next batch");
            tokio::time::sleep(pause).await;
        }
    }
}
