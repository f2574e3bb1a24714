//! Per-view transient state: `Idle -> Loading -> {Ready, Error}`.
//!
//! Each fetch is tagged with a ticket carrying the view's sequence number.
//! A completion whose ticket is not the latest one issued is dropped, so a
//! slow response to a superseded query never overwrites fresher state.

use serde::Serialize;
use tracing::debug;

use crate::error::{user_message, ApiResult};

pub const HOME_RECOVERY: &str = "home";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready { data: T },
    Error { message: String },
    NotFound { message: String, recovery: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct View<T> {
    what: String,
    seq: u64,
    state: ViewState<T>,
}

impl<T> View<T> {
    /// `what` names the fetched content in user-facing messages ("movie details").
    pub fn new(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            seq: 0,
            state: ViewState::Idle,
        }
    }

    /// Enter `Loading` for a new request, clearing any previous error or data.
    pub fn begin(&mut self) -> Ticket {
        self.seq += 1;
        self.state = ViewState::Loading;
        Ticket(self.seq)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.seq
    }

    /// Apply a finished request. Returns false when the ticket was superseded.
    pub fn complete(&mut self, ticket: Ticket, result: ApiResult<T>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                view = %self.what,
                ticket = ticket.0,
                latest = self.seq,
                "Discarding stale response"
            );
            return false;
        }
        self.state = match result {
            Ok(data) => ViewState::Ready { data },
            Err(err) => {
                err.log(&self.what);
                ViewState::Error {
                    message: user_message(&self.what),
                }
            }
        };
        true
    }

    /// Like [`View::complete`], but a provider 404 is the terminal not-found state.
    pub fn complete_lookup(&mut self, ticket: Ticket, result: ApiResult<T>) -> bool {
        match result {
            Err(err) if err.is_not_found() && self.is_current(ticket) => {
                debug!(view = %self.what, "Record not found: {}", err);
                self.state = ViewState::NotFound {
                    message: format!("We couldn't find those {}.", self.what),
                    recovery: HOME_RECOVERY,
                };
                true
            }
            other => self.complete(ticket, other),
        }
    }

    /// Back to `Idle`; anything still in flight becomes stale.
    pub fn reset(&mut self) {
        self.seq += 1;
        self.state = ViewState::Idle;
    }

    /// Mutate ready data in place (e.g. re-sorting the held list).
    pub fn update<F: FnOnce(&mut T)>(&mut self, f: F) -> bool {
        match &mut self.state {
            ViewState::Ready { data } => {
                f(data);
                true
            }
            _ => false,
        }
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            ViewState::Ready { data } => Some(data),
            _ => None,
        }
    }

    pub fn into_state(self) -> ViewState<T> {
        self.state
    }
}
