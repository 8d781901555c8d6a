use crate::config::EngineConfig;
use crate::error::{Error, VerifyError};
use crate::progress::{progress_channel, rate, ProgressEvent, ProgressReporter};
use crate::target::Target;
use crate::template::{HeaderTemplate, NonceEncoding};
use crate::verify::verify_solution;
use crate::work::{CancelToken, TerminalLatch};
use flume::{Receiver, RecvTimeoutError, Sender};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span};

/// A nonce whose candidate hash is below the target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub nonce: u32,
    pub hash: [u8; 32],
    /// Hashes computed in this run, the winning one included.
    pub attempts: u64,
    pub elapsed: Duration,
}

impl Solution {
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn hash_rate(&self) -> f64 {
        rate(self.attempts, self.elapsed)
    }

    /// Recompute the hash for this nonce and check it against `target`.
    pub fn verify(
        &self,
        template: &HeaderTemplate,
        encoding: NonceEncoding,
        target: &Target,
    ) -> Result<(), VerifyError> {
        verify_solution(template, encoding, target, self.nonce, &self.hash)
    }
}

/// Terminal outcome of one search run. None of these are errors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MiningResult {
    Found(Solution),
    /// Every nonce up to the configured maximum was tried.
    Exhausted { attempts: u64 },
    /// Cancellation was observed before the next attempt.
    Cancelled { attempts: u64 },
}

impl MiningResult {
    pub fn is_found(&self) -> bool {
        matches!(self, MiningResult::Found(_))
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            MiningResult::Found(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn attempts(&self) -> u64 {
        match self {
            MiningResult::Found(solution) => solution.attempts,
            MiningResult::Exhausted { attempts } | MiningResult::Cancelled { attempts } => {
                *attempts
            }
        }
    }
}

/// Worker-owned search position.
#[derive(Debug)]
struct SearchState {
    current_nonce: u32,
    attempts_done: u64,
    start_time: Instant,
}

/// Validated, immutable inputs of one run.
#[derive(Clone, Debug)]
struct SearchJob {
    template: HeaderTemplate,
    target: Target,
    start_nonce: u32,
    max_nonce: u32,
    encoding: NonceEncoding,
    progress_interval: u64,
}

/// Starts double SHA-256 nonce searches.
#[derive(Clone, Debug, Default)]
pub struct MiningEngine {
    config: EngineConfig,
}

impl MiningEngine {
    pub fn new(config: EngineConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn job(
        &self,
        template: HeaderTemplate,
        target: Target,
        start_nonce: u32,
    ) -> Result<SearchJob, Error> {
        self.config.validate()?;
        if target.is_zero() {
            return Err(Error::InvalidTarget("target must be > 0".into()));
        }
        if start_nonce > self.config.max_nonce {
            return Err(Error::InvalidNonceRange {
                start: start_nonce,
                max: self.config.max_nonce,
            });
        }
        Ok(SearchJob {
            template,
            target,
            start_nonce,
            max_nonce: self.config.max_nonce,
            encoding: self.config.nonce_encoding,
            progress_interval: self.config.progress_interval,
        })
    }

    /// Validate the inputs and run the search on a dedicated thread.
    ///
    /// Returns as soon as the threads are spawned. The search thread only
    /// `try_send`s progress into a buffer of `progress_buffer` events; a
    /// second thread drains that buffer into `reporter`, so a slow reporter
    /// loses events but never slows the search. Events still buffered when
    /// the terminal result is published are discarded.
    pub fn start<R>(
        &self,
        template: HeaderTemplate,
        target: Target,
        start_nonce: u32,
        mut reporter: R,
    ) -> Result<MiningHandle, Error>
    where
        R: ProgressReporter + 'static,
    {
        let job = self.job(template, target, start_nonce)?;
        let cancel = CancelToken::new();
        let latch = Arc::new(TerminalLatch::new());
        let (result_tx, result_rx) = flume::bounded(1);
        let (mut sink, progress_rx) = progress_channel(self.config.progress_buffer);

        let delivery_latch = latch.clone();
        let delivery = thread::Builder::new()
            .name(format!("{}-progress", self.config.thread_name))
            .spawn(move || deliver_progress(&progress_rx, &mut reporter, &delivery_latch))?;

        let worker_cancel = cancel.clone();
        let worker_latch = latch.clone();
        let spawned = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || {
                let result = run_search(&job, &mut sink, &worker_cancel);
                if sink.dropped() > 0 {
                    debug!(dropped = sink.dropped(), "progress events dropped");
                }
                publish(&worker_latch, &result_tx, result);
            });
        let worker = match spawned {
            Ok(worker) => worker,
            Err(err) => {
                // the unsent closure owned the progress sender, so delivery ends
                let _ = delivery.join();
                return Err(err.into());
            }
        };

        Ok(MiningHandle {
            cancel,
            latch,
            result_rx,
            worker: Some(worker),
            delivery: Some(delivery),
        })
    }

    /// Run the same search on the calling thread.
    ///
    /// `reporter` is called inline between attempts.
    pub fn mine_blocking<R>(
        &self,
        template: HeaderTemplate,
        target: Target,
        start_nonce: u32,
        reporter: &mut R,
        cancel: &CancelToken,
    ) -> Result<MiningResult, Error>
    where
        R: ProgressReporter + ?Sized,
    {
        let job = self.job(template, target, start_nonce)?;
        Ok(run_search(&job, reporter, cancel))
    }

    /// Re-check a solution against this engine's encoding and nonce range.
    pub fn verify(
        &self,
        template: &HeaderTemplate,
        target: &Target,
        solution: &Solution,
    ) -> Result<(), VerifyError> {
        if solution.nonce > self.config.max_nonce {
            return Err(VerifyError::NonceOutOfRange {
                nonce: solution.nonce,
                max: self.config.max_nonce,
            });
        }
        solution.verify(template, self.config.nonce_encoding, target)
    }
}

fn publish(latch: &TerminalLatch, tx: &Sender<MiningResult>, result: MiningResult) {
    if latch.try_close() {
        // a dropped handle no longer wants the result
        let _ = tx.send(result);
    }
}

fn deliver_progress<R>(rx: &Receiver<ProgressEvent>, reporter: &mut R, latch: &TerminalLatch)
where
    R: ProgressReporter + ?Sized,
{
    for event in rx.iter() {
        if latch.is_closed() {
            break;
        }
        reporter.report(event);
    }
}

fn run_search<R>(job: &SearchJob, reporter: &mut R, cancel: &CancelToken) -> MiningResult
where
    R: ProgressReporter + ?Sized,
{
    let span = info_span!(
        "mining",
        start_nonce = job.start_nonce,
        max_nonce = job.max_nonce,
        target_hex = %job.target
    );
    let _enter = span.enter();
    debug!(template_len = job.template.len(), "search started");

    let mut state = SearchState {
        current_nonce: job.start_nonce,
        attempts_done: 0,
        start_time: Instant::now(),
    };

    loop {
        if cancel.is_cancelled() {
            debug!(attempts = state.attempts_done, "search cancelled");
            return MiningResult::Cancelled {
                attempts: state.attempts_done,
            };
        }

        let nonce = state.current_nonce;
        let hash = job.template.hash_nonce(nonce, job.encoding);
        state.attempts_done += 1;

        if job.target.is_met_by(&hash) {
            let solution = Solution {
                nonce,
                hash,
                attempts: state.attempts_done,
                elapsed: state.start_time.elapsed(),
            };
            info!(
                nonce,
                attempts = solution.attempts,
                hash = %solution.hash_hex(),
                "found solution"
            );
            return MiningResult::Found(solution);
        }

        if state.attempts_done % job.progress_interval == 0 {
            let event = ProgressEvent {
                nonce,
                hash,
                attempts: state.attempts_done,
                elapsed: state.start_time.elapsed(),
            };
            debug!(nonce, attempts = event.attempts, "progress");
            reporter.report(event);
        }

        if nonce == job.max_nonce {
            info!(attempts = state.attempts_done, "nonce range exhausted");
            return MiningResult::Exhausted {
                attempts: state.attempts_done,
            };
        }
        state.current_nonce = nonce + 1;
    }
}

/// Handle to a search running on its own thread.
///
/// Dropping the handle cancels the search and joins both the search and the
/// progress delivery threads. Once a result has been awaited, the delivery
/// thread is left to finish any `report` call in flight on its own.
#[derive(Debug)]
pub struct MiningHandle {
    cancel: CancelToken,
    latch: Arc<TerminalLatch>,
    result_rx: Receiver<MiningResult>,
    worker: Option<thread::JoinHandle<()>>,
    delivery: Option<thread::JoinHandle<()>>,
}

impl MiningHandle {
    /// Ask the worker to stop; it reports `Cancelled` unless it already finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Whether the terminal result has been published.
    pub fn is_finished(&self) -> bool {
        self.latch.is_closed()
    }

    /// Block until the search ends.
    pub fn await_result(mut self) -> MiningResult {
        match self.result_rx.recv() {
            Ok(result) => self.finish(result),
            Err(_) => self.worker_lost(),
        }
    }

    /// Block for at most `timeout`; hands the handle back if the search is still running.
    pub fn await_result_timeout(mut self, timeout: Duration) -> Result<MiningResult, Self> {
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => Ok(self.finish(result)),
            Err(RecvTimeoutError::Timeout) => Err(self),
            Err(RecvTimeoutError::Disconnected) => self.worker_lost(),
        }
    }

    /// Suspend the calling task until the search ends.
    pub async fn result_async(mut self) -> MiningResult {
        match self.result_rx.recv_async().await {
            Ok(result) => self.finish(result),
            Err(_) => self.worker_lost(),
        }
    }

    fn finish(&mut self, result: MiningResult) -> MiningResult {
        // stale progress is discarded once the latch is closed
        self.delivery.take();
        result
    }

    fn worker_lost(&mut self) -> ! {
        if let Some(worker) = self.worker.take() {
            if let Err(payload) = worker.join() {
                std::panic::resume_unwind(payload);
            }
        }
        unreachable!("mining worker exited without publishing a result")
    }
}

impl Drop for MiningHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        if let Some(delivery) = self.delivery.take() {
            let _ = delivery.join();
        }
    }
}
