use std::time::{Duration, Instant};

/// Interval between clock ticks while a match is running.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Where tick tasks actually run. The server implements this on the session's actor context.
pub trait TickScheduler {
    type Handle;

    /// Starts a periodic task firing every `TICK_INTERVAL`.
    fn schedule(&mut self) -> Self::Handle;

    fn cancel(&mut self, handle: Self::Handle);
}

/// Owns the handle of the periodic tick task and the instant it last charged time up to.
///
/// `H` is whatever the scheduler hands back (an actix `SpawnHandle` in the server).
#[derive(Debug)]
pub struct Ticker<H> {
    handle: Option<H>,
    last_tick: Option<Instant>,
}

impl<H> Default for Ticker<H> {
    fn default() -> Self {
        Ticker {
            handle: None,
            last_tick: None,
        }
    }
}

impl<H> Ticker<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Returns the handle being replaced, which the caller must cancel.
    pub fn start(&mut self, handle: H, now: Instant) -> Option<H> {
        self.last_tick = Some(now);
        self.handle.replace(handle)
    }

    /// Safe to call repeatedly; only the first call yields the handle.
    pub fn cancel(&mut self) -> Option<H> {
        self.last_tick = None;
        self.handle.take()
    }

    /// Cancels the running task, if any.
    pub fn stop<S>(&mut self, scheduler: &mut S)
    where
        S: TickScheduler<Handle = H>,
    {
        if let Some(handle) = self.cancel() {
            scheduler.cancel(handle);
        }
    }

    /// Keeps exactly one task alive while `running`, none otherwise.
    pub fn sync<S>(&mut self, running: bool, scheduler: &mut S, now: Instant)
    where
        S: TickScheduler<Handle = H>,
    {
        if !running {
            self.stop(scheduler);
            return;
        }
        if self.is_active() {
            return;
        }
        let handle = scheduler.schedule();
        if let Some(stale) = self.start(handle, now) {
            scheduler.cancel(stale);
        }
    }

    /// Whole milliseconds since the previous lap. The sub-millisecond remainder
    /// carries over to the next lap.
    pub fn lap(&mut self, now: Instant) -> u64 {
        let Some(last) = self.last_tick else {
            return 0;
        };
        let elapsed_ms = now.saturating_duration_since(last).as_millis() as u64;
        self.last_tick = Some(last + Duration::from_millis(elapsed_ms));
        elapsed_ms
    }
}
