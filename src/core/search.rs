//! # Debounced Search
//!
//! Owns the home view's `SearchState` and decides when a search may go out
//! and whether a response may be applied.
//!
//! Two counters are kept. The timer generation moves on every keystroke and
//! only decides which timer may fire. The request sequence moves when a
//! request is actually sent (or the input is cleared), and only a response
//! to the latest request is applied.
//!
//! ```text
//! on_input("B")   gen=1  Restart(1)    ─┐ timer restarted on every keystroke
//! on_input("Be")  gen=2  Restart(2)     │
//! on_input("Ber") gen=3  Restart(3)    ─┘
//!          ... 1000ms quiet ...
//! on_timer(3)  → seq=1 "Ber"            (on_timer(1), on_timer(2) → None)
//! on_input("Berl") gen=4                 request 1 is still the latest
//! apply(1, ..) → applied
//!          ... 1000ms quiet ...
//! on_timer(4)  → seq=2 "Berl"
//! apply(1, ..) → dropped                 (request 2 has started)
//! ```
//!
//! The controller itself never sleeps or fetches. It hands out generations
//! and sequence numbers; the runtime owns the timer task and the HTTP call,
//! and reports back.

use std::time::Duration;

use log::debug;

use crate::api::{FetchError, Location};

/// Quiet period before a search goes out.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<Location>,
    /// True while a timer is armed or a request is in flight.
    pub pending: bool,
    pub error: Option<String>,
}

/// What the runtime should do with the debounce timer after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Input is empty. Results were cleared synchronously; drop any timer.
    Cancel,
    /// Drop any running timer and start a new one for this generation.
    Restart { generation: u64, delay: Duration },
}

/// A search that should go out now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub query: String,
}

#[derive(Debug)]
pub struct SearchController {
    state: SearchState,
    generation: u64,
    request_seq: u64,
    timer_armed: bool,
    in_flight: bool,
    delay: Duration,
}

impl SearchController {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: SearchState::default(),
            generation: 0,
            request_seq: 0,
            timer_armed: false,
            in_flight: false,
            delay,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record new text. Every call supersedes the running timer; a request
    /// already in flight stays the latest until the next one is sent.
    pub fn on_input(&mut self, text: &str) -> TimerCommand {
        self.generation += 1;
        self.state.query = text.to_string();

        if text.trim().is_empty() {
            // An answer still in flight must not refill the cleared list.
            self.request_seq += 1;
            self.timer_armed = false;
            self.in_flight = false;
            self.state.results.clear();
            self.state.pending = false;
            self.state.error = None;
            return TimerCommand::Cancel;
        }

        self.timer_armed = true;
        self.state.pending = true;
        TimerCommand::Restart {
            generation: self.generation,
            delay: self.delay,
        }
    }

    /// The timer for `generation` fired. Returns the request to send, or
    /// `None` if newer input arrived in the meantime. The query is sent
    /// exactly as typed.
    pub fn on_timer(&mut self, generation: u64) -> Option<SearchRequest> {
        if generation != self.generation {
            debug!(
                "Ignoring debounce timer for generation {} (current {})",
                generation, self.generation
            );
            return None;
        }
        self.timer_armed = false;
        if self.state.query.trim().is_empty() {
            self.state.pending = self.in_flight;
            return None;
        }

        self.request_seq += 1;
        self.in_flight = true;
        self.state.pending = true;
        Some(SearchRequest {
            seq: self.request_seq,
            query: self.state.query.clone(),
        })
    }

    /// Apply a search response. Returns false (and changes nothing) when a
    /// newer request has started since this one was sent.
    pub fn apply(&mut self, seq: u64, result: Result<Vec<Location>, FetchError>) -> bool {
        if seq != self.request_seq {
            debug!(
                "Dropping stale search response (request {}, latest {})",
                seq, self.request_seq
            );
            return false;
        }

        self.in_flight = false;
        self.state.pending = self.timer_armed;
        match result {
            Ok(results) => {
                self.state.results = results;
                self.state.error = None;
            }
            Err(e) => {
                self.state.results.clear();
                self.state.error = Some(e.to_string());
            }
        }
        true
    }

    /// Forget everything, invalidating any timer or request still out there.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.request_seq += 1;
        self.timer_armed = false;
        self.in_flight = false;
        self.state = SearchState::default();
    }
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
