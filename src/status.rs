//! The generation status shown to the user.
//!
//! `Idle -> Generating -> {Success, Error}`. Success hides itself after
//! [`SUCCESS_VISIBLE_FOR`]; an error stays up until the form is submitted again.

use crate::error::{ListingError, Result};
use log::debug;
use std::time::{Duration, Instant};

pub const GENERATING_TEXT: &str = "Generating PDF... Please wait.";
pub const SUCCESS_TEXT: &str = "PDF generated successfully! Check your downloads.";
pub const ERROR_TEXT: &str = "Error generating PDF. Please try again.";

pub const SUCCESS_VISIBLE_FOR: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Generating,
    Success,
    Error,
}

impl Status {
    pub fn text(self) -> Option<&'static str> {
        match self {
            Status::Idle => None,
            Status::Generating => Some(GENERATING_TEXT),
            Status::Success => Some(SUCCESS_TEXT),
            Status::Error => Some(ERROR_TEXT),
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Status::Idle => "pdf-status",
            Status::Generating => "pdf-status loading",
            Status::Success => "pdf-status success",
            Status::Error => "pdf-status error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusIndicator {
    status: Status,
    succeeded_at: Option<Instant>,
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self {
            status: Status::Idle,
            succeeded_at: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn text(&self) -> Option<&'static str> {
        self.status.text()
    }

    pub fn is_visible(&self) -> bool {
        self.status != Status::Idle
    }

    pub fn begin(&mut self) -> Result<()> {
        if self.status == Status::Generating {
            return Err(ListingError::AlreadyGenerating);
        }
        self.transition(Status::Generating);
        self.succeeded_at = None;
        Ok(())
    }

    pub fn succeed(&mut self, now: Instant) {
        if self.status == Status::Generating {
            self.transition(Status::Success);
            self.succeeded_at = Some(now);
        }
    }

    pub fn fail(&mut self) {
        if self.status == Status::Generating {
            self.transition(Status::Error);
        }
    }

    /// Hides a success message once it has been visible long enough.
    pub fn tick(&mut self, now: Instant) {
        if let (Status::Success, Some(at)) = (self.status, self.succeeded_at) {
            if now.saturating_duration_since(at) >= SUCCESS_VISIBLE_FOR {
                self.transition(Status::Idle);
                self.succeeded_at = None;
            }
        }
    }

    fn transition(&mut self, next: Status) {
        debug!("Status {:?} -> {:?}", self.status, next);
        self.status = next;
    }
}
