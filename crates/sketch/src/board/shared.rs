//! Thread-safe board handle with off-thread replays.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use super::{InputEvent, ReplayError, ReplayJob, SketchBoard};
use crate::error::SketchError;
use crate::raster::{NullSink, RasterSink};

/// Cloneable handle serializing all access to one [`SketchBoard`].
///
/// Undo and redo move history under the lock, then replay on a blocking
/// tokio task without holding it. The result is installed only if no newer
/// input or rebuild happened in the meantime.
#[derive(Debug)]
pub struct SharedSketchBoard<S: RasterSink = NullSink> {
    inner: Arc<Mutex<SketchBoard<S>>>,
}

impl<S: RasterSink> Clone for SharedSketchBoard<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: RasterSink + Send + 'static> SharedSketchBoard<S> {
    pub fn new(board: SketchBoard<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(board)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SketchBoard<S>>, SketchError> {
        self.inner.lock().map_err(|_| SketchError::LockPoisoned)
    }

    /// Run `f` with exclusive access to the board
    pub fn with<R>(&self, f: impl FnOnce(&mut SketchBoard<S>) -> R) -> Result<R, SketchError> {
        let mut board = self.lock()?;
        Ok(f(&mut board))
    }

    pub fn handle_input(&self, event: InputEvent) -> Result<(), SketchError> {
        self.lock()?.handle_input(event)
    }

    pub fn build_svg(&self) -> Result<String, SketchError> {
        Ok(self.lock()?.build_svg())
    }

    pub fn clear(&self) -> Result<usize, SketchError> {
        Ok(self.lock()?.clear())
    }

    pub fn is_empty(&self) -> Result<bool, SketchError> {
        Ok(self.lock()?.is_empty())
    }

    /// Undo up to `steps` strokes; the rebuild runs off the async runtime
    pub async fn undo(&self, steps: usize) -> Result<usize, SketchError> {
        let (moved, job) = self.lock()?.prepare_undo(steps)?;
        self.finish(job).await?;
        Ok(moved)
    }

    /// Redo up to `steps` entries; the rebuild runs off the async runtime
    pub async fn redo(&self, steps: usize) -> Result<usize, SketchError> {
        let (moved, job) = self.lock()?.prepare_redo(steps)?;
        self.finish(job).await?;
        Ok(moved)
    }

    async fn finish(&self, job: Option<ReplayJob>) -> Result<(), SketchError> {
        let Some(job) = job else {
            return Ok(());
        };
        let generation = job.generation();

        let output = match tokio::task::spawn_blocking(move || job.run()).await? {
            Ok(output) => output,
            Err(ReplayError::Cancelled(_)) => {
                debug!("SharedSketchBoard: replay {} superseded while running", generation);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        match self.lock()?.apply_replay(output) {
            Ok(()) => Ok(()),
            Err(ReplayError::Stale { .. }) => {
                debug!("SharedSketchBoard: replay {} finished too late", generation);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}
