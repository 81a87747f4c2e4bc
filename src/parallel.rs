//! Thread-partition policy and the fork/join helper shared by the assembly
//! and post-processing phases.

use std::ops::Range;

use serde::Deserialize;

use crate::error::Result;

/// Controls how a phase is split across worker threads.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Upper bound on workers per phase; `None` uses rayon's thread count.
    pub max_threads: Option<usize>,
    /// Work items below which adding another worker is not worth it.
    pub min_items_per_thread: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            max_threads: None,
            min_items_per_thread: 16,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThreadParameters {
    pub workers: usize,
    pub items_per_worker: usize,
}

impl ParallelConfig {
    /// Everything on the calling thread.
    pub fn serial() -> Self {
        Self {
            max_threads: Some(1),
            ..Default::default()
        }
    }

    pub fn with_max_threads(max_threads: usize) -> Self {
        Self {
            max_threads: Some(max_threads),
            min_items_per_thread: 1,
        }
    }

    /// Worker count and chunk size for `total` items. Applied contiguously,
    /// `workers` chunks of `items_per_worker` (the last one possibly shorter)
    /// cover exactly `0..total`.
    pub fn thread_parameters(&self, total: usize) -> ThreadParameters {
        if total == 0 {
            return ThreadParameters {
                workers: 0,
                items_per_worker: 0,
            };
        }
        let max_threads = self
            .max_threads
            .unwrap_or_else(rayon::current_num_threads)
            .max(1);
        let wanted = total.div_ceil(self.min_items_per_thread.max(1));
        let items_per_worker = total.div_ceil(max_threads.min(wanted).max(1));
        ThreadParameters {
            workers: total.div_ceil(items_per_worker),
            items_per_worker,
        }
    }

    pub fn partition(&self, total: usize) -> Vec<Range<usize>> {
        let params = self.thread_parameters(total);
        (0..params.workers)
            .map(|w| {
                let start = w * params.items_per_worker;
                start..(start + params.items_per_worker).min(total)
            })
            .collect()
    }
}

/// Runs `work` once per input and returns the results in input order.
///
/// A pool sized to the number of inputs lives for the duration of the call.
/// All inputs but the last are spawned onto it while the last one runs on the
/// calling thread, and the scope joins every task before returning.
pub fn fork_join<I, T, F>(inputs: Vec<I>, work: F) -> Result<Vec<T>>
where
    I: Send,
    T: Send,
    F: Fn(I) -> T + Sync,
{
    let workers = inputs.len();
    if workers <= 1 {
        return Ok(inputs.into_iter().map(work).collect());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("torsion-worker-{i}"))
        .build()?;

    let mut slots: Vec<Option<T>> = (0..workers).map(|_| None).collect();
    let (head_slots, last_slot) = slots.split_at_mut(workers - 1);
    let mut inputs = inputs;
    let last_input = inputs.pop();
    let work = &work;
    pool.in_place_scope(|s| {
        for (input, slot) in inputs.into_iter().zip(head_slots.iter_mut()) {
            s.spawn(move |_| *slot = Some(work(input)));
        }
        if let Some(input) = last_input {
            last_slot[0] = Some(work(input));
        }
    });
    Ok(slots.into_iter().flatten().collect())
}
