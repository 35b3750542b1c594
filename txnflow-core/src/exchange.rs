//! Bounded exchange-loop drivers.
//!
//! Both loops are sequential and non-resumable: a fixed message target, no
//! retries, no partial-send recovery. The receive driver is written against
//! an abstract poll so the cancellation and counting logic is testable
//! without a broker or real timing.

use crate::config::CountPolicy;
use crate::error::{ClientError, ClientResult};
use crate::traits::{KeyedPayload, RecordSink, RecordSource};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

/// Receive-loop lifecycle. Driven by either a completed-count transition or
/// an external cancellation, independent of the polling primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    StopRequested,
    Stopped,
}

/// One poll observation from the transport.
#[derive(Debug)]
pub enum PollEvent {
    /// A message payload arrived.
    Message(Vec<u8>),
    /// Nothing this interval; the loop re-checks the stop flag.
    Idle,
    /// A per-poll error worth logging; the loop continues.
    RecoverableError(ClientError),
    /// A broker-fatal error; the loop stops.
    Fatal(ClientError),
}

/// Progress tracker for the receive loop.
#[derive(Debug)]
pub struct ReceiveProgress {
    target: usize,
    received: usize,
    parsed: usize,
    parse_failures: usize,
    policy: CountPolicy,
    state: LoopState,
}

impl ReceiveProgress {
    pub fn new(target: usize, policy: CountPolicy) -> Self {
        let state = if target == 0 {
            LoopState::StopRequested
        } else {
            LoopState::Running
        };
        Self {
            target,
            received: 0,
            parsed: 0,
            parse_failures: 0,
            policy,
            state,
        }
    }

    /// Record one polled message; `parsed_ok` is the sink's verdict.
    /// Requests a stop once the counted total reaches the target.
    pub fn record_message(&mut self, parsed_ok: bool) {
        self.received += 1;
        if parsed_ok {
            self.parsed += 1;
        } else {
            self.parse_failures += 1;
        }
        if self.counted() >= self.target {
            self.request_stop();
        }
    }

    /// Messages counted toward the target under the configured policy.
    pub fn counted(&self) -> usize {
        match self.policy {
            CountPolicy::Received => self.received,
            CountPolicy::Parsed => self.parsed,
        }
    }

    pub fn request_stop(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::StopRequested;
        }
    }

    fn finish(&mut self) {
        self.state = LoopState::Stopped;
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn received(&self) -> usize {
        self.received
    }

    pub fn parsed(&self) -> usize {
        self.parsed
    }

    pub fn parse_failures(&self) -> usize {
        self.parse_failures
    }
}

/// Outcome of a completed receive loop.
#[derive(Debug)]
pub struct ReceiveReport {
    /// Messages polled off the transport.
    pub received: usize,
    /// Messages the sink accepted.
    pub parsed: usize,
    /// Messages skipped as unparseable.
    pub parse_failures: usize,
    /// Messages counted toward the target under the configured policy.
    pub counted: usize,
    /// Set when a broker-fatal error stopped the loop.
    pub fatal: Option<ClientError>,
}

/// Drive the bounded send loop: pull `count` records from the source and
/// hand each to the non-blocking enqueue. The first enqueue failure aborts
/// immediately; the caller must not flush after an error.
pub fn run_send_loop<S, E>(source: &mut S, mut enqueue: E, count: usize) -> ClientResult<usize>
where
    S: RecordSource + ?Sized,
    E: FnMut(usize, KeyedPayload) -> ClientResult<()>,
{
    for seq in 1..=count {
        let record = source.next_record(seq)?;
        enqueue(seq, record)?;
    }
    Ok(count)
}

/// Drive the cooperative receive loop.
///
/// Stops when the external stop flag is observed, the counted total reaches
/// the target, or a fatal poll event arrives. The poll must resolve within
/// one poll interval (returning `Idle` on timeout) so the stop flag is never
/// starved.
pub async fn run_receive_loop<P, Fut, S>(
    mut poll: P,
    sink: &mut S,
    mut progress: ReceiveProgress,
    shutdown: &AtomicBool,
) -> ReceiveReport
where
    P: FnMut() -> Fut,
    Fut: Future<Output = PollEvent>,
    S: RecordSink + ?Sized,
{
    let mut fatal = None;

    while progress.is_running() {
        if shutdown.load(Ordering::Relaxed) {
            info!("Termination signal observed, stopping");
            progress.request_stop();
            break;
        }

        match poll().await {
            PollEvent::Idle => continue,
            PollEvent::Message(payload) => {
                let seq = progress.received() + 1;
                let parsed_ok = match sink.deliver(seq, &payload).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Skipping record {}: {}", seq, e);
                        false
                    }
                };
                progress.record_message(parsed_ok);
            }
            PollEvent::RecoverableError(e) => {
                error!("ERROR: {}", e);
            }
            PollEvent::Fatal(e) => {
                error!("Fatal broker error: {}", e);
                fatal = Some(e);
                progress.request_stop();
            }
        }
    }

    progress.finish();
    ReceiveReport {
        received: progress.received(),
        parsed: progress.parsed(),
        parse_failures: progress.parse_failures(),
        counted: progress.counted(),
        fatal,
    }
}
