//! # Batch Generation
//!
//! Generates many chunks on a pool of scoped worker threads. Workers pull
//! coordinates from a shared queue, so slow chunks do not hold up the rest.
//! Every chunk reports its own result: one failing coordinate never aborts
//! the batch.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crossbeam_channel::unbounded;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::chunk::{Chunk, ChunkCoord};
use crate::error::{GenResult, GenerationError};
use crate::generator::WorldGenerator;

/// Shared progress and cancellation state of a running batch.
#[derive(Debug, Default)]
pub struct BatchProgress {
    completed: AtomicUsize,
    total: AtomicUsize,
    cancel_requested: AtomicBool,
}

impl BatchProgress {
    /// Creates idle progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&self, total: usize) {
        self.total.store(total, Ordering::Release);
        self.completed.store(0, Ordering::Release);
    }

    /// Chunks finished so far, including failed and cancelled ones.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    /// Chunks in the current batch.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Acquire)
    }

    /// Fraction finished, 0-1. An empty batch counts as done.
    #[must_use]
    pub fn progress(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            return 1.0;
        }
        self.completed() as f32 / total as f32
    }

    /// Asks workers to skip every chunk they have not started.
    pub fn cancel(&self) {
        self.cancel_requested.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_requested.load(Ordering::Acquire)
    }
}

/// Result of one chunk in a batch.
#[derive(Debug)]
pub struct ChunkOutcome {
    /// Requested coordinate.
    pub coord: ChunkCoord,
    /// Generated chunk or the reason it is missing.
    pub result: GenResult<Chunk>,
}

/// Generates `coords` on `workers` threads.
///
/// Outcomes come back in the order of `coords`. Chunks not yet started when
/// [`BatchProgress::cancel`] is called report [`GenerationError::Cancelled`].
///
/// # Errors
///
/// Returns [`GenerationError::InvalidConfig`] when `workers` is zero.
/// Per-chunk failures are reported in the outcomes instead.
pub fn generate_batch(
    generator: &WorldGenerator,
    coords: &[ChunkCoord],
    workers: usize,
    progress: &BatchProgress,
) -> GenResult<Vec<ChunkOutcome>> {
    if workers == 0 {
        return Err(GenerationError::InvalidConfig(
            "batch needs at least one worker".into(),
        ));
    }

    let total = coords.len();
    progress.begin(total);
    info!(
        chunks = total,
        workers,
        generator = generator.metadata().id,
        "batch generation started"
    );

    let slots: Mutex<Vec<Option<GenResult<Chunk>>>> =
        Mutex::new((0..total).map(|_| None).collect());
    let (sender, receiver) = unbounded::<(usize, ChunkCoord)>();

    std::thread::scope(|scope| {
        for _ in 0..workers.min(total) {
            let receiver = receiver.clone();
            let slots = &slots;
            scope.spawn(move || {
                while let Ok((index, coord)) = receiver.recv() {
                    let result = if progress.is_cancelled() {
                        Err(GenerationError::Cancelled)
                    } else {
                        generator.generate(coord)
                    };
                    if let Err(err) = &result {
                        if !matches!(err, GenerationError::Cancelled) {
                            debug!(x = coord.x, z = coord.z, %err, "chunk failed");
                        }
                    }
                    slots.lock()[index] = Some(result);
                    progress.completed.fetch_add(1, Ordering::AcqRel);
                }
            });
        }
        drop(receiver);

        for job in coords.iter().copied().enumerate() {
            if sender.send(job).is_err() {
                break;
            }
        }
        drop(sender);
    });

    let outcomes: Vec<ChunkOutcome> = slots
        .into_inner()
        .into_iter()
        .zip(coords)
        .map(|(slot, &coord)| ChunkOutcome {
            coord,
            result: slot.unwrap_or_else(|| Err(GenerationError::Cancelled)),
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if progress.is_cancelled() {
        warn!(chunks = total, failed, "batch generation cancelled");
    } else {
        info!(chunks = total, failed, "batch generation finished");
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::ChunkGenerator;
    use crate::noise::WorldSeed;

    fn terrain() -> WorldGenerator {
        ChunkGenerator::new(WorldSeed::new(42)).into()
    }

    #[test]
    fn test_zero_workers_rejected() {
        let result = generate_batch(&terrain(), &[], 0, &BatchProgress::new());
        assert!(matches!(result, Err(GenerationError::InvalidConfig(_))));
    }

    #[test]
    fn test_outcomes_keep_input_order() {
        let coords: Vec<ChunkCoord> = (0..6).map(|i| ChunkCoord::new(i, -i)).collect();
        let progress = BatchProgress::new();
        let outcomes = generate_batch(&terrain(), &coords, 3, &progress).unwrap();

        assert_eq!(outcomes.len(), coords.len());
        for (outcome, coord) in outcomes.iter().zip(&coords) {
            assert_eq!(outcome.coord, *coord);
            let chunk = outcome.result.as_ref().unwrap();
            assert_eq!(chunk.coord(), *coord);
        }
        assert_eq!(progress.completed(), 6);
        assert!((progress.progress() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_failing_chunk_is_isolated() {
        let coords = [
            ChunkCoord::new(0, 0),
            ChunkCoord::new(i32::MAX, 0),
            ChunkCoord::new(1, 0),
        ];
        let outcomes = generate_batch(&terrain(), &coords, 2, &BatchProgress::new()).unwrap();

        assert!(outcomes[0].result.is_ok());
        assert!(matches!(
            outcomes[1].result,
            Err(GenerationError::CoordinateOverflow { .. })
        ));
        assert!(outcomes[2].result.is_ok());
    }

    #[test]
    fn test_cancelled_batch_skips_chunks() {
        let progress = BatchProgress::new();
        progress.cancel();

        let coords: Vec<ChunkCoord> = (0..4).map(|i| ChunkCoord::new(i, 0)).collect();
        let outcomes = generate_batch(&terrain(), &coords, 2, &progress).unwrap();

        assert!(outcomes
            .iter()
            .all(|o| matches!(o.result, Err(GenerationError::Cancelled))));
        assert_eq!(progress.completed(), 4);
    }

    #[test]
    fn test_empty_batch() {
        let progress = BatchProgress::new();
        let outcomes = generate_batch(&WorldGenerator::Empty, &[], 4, &progress).unwrap();
        assert!(outcomes.is_empty());
        assert!((progress.progress() - 1.0).abs() < f32::EPSILON);
    }
}
