//! Explicit state machine for driving a long-running operation poll loop.
//!
//! The HTTP status endpoint is a single pure read; this machine exists for
//! callers that want the service to drive the loop for them with a deadline
//! and a cancellation signal instead of leaving cadence and give-up policy
//! implicit.

/// State of a poll loop over a long-running operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// The remote job has been started; no poll has been issued yet.
    Started,
    /// At least one poll has been issued without completion.
    Polling { attempts: u32 },
    /// The operation reported done.
    Done,
    /// The caller-supplied deadline passed before completion. The remote
    /// job keeps running; only the loop gives up.
    Expired,
    /// The caller cancelled the loop. The remote job keeps running.
    Cancelled,
}

/// Events fed into the poll state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollEvent {
    /// A poll was issued and the operation is still running.
    Tick,
    /// A poll observed the operation complete.
    Completed,
    DeadlineReached,
    Cancelled,
}

impl PollState {
    pub fn new() -> Self {
        PollState::Started
    }

    /// Advances the machine. Terminal states absorb all further events.
    pub fn advance(self, event: PollEvent) -> Self {
        if self.is_terminal() {
            return self;
        }
        match event {
            PollEvent::Tick => {
                let attempts = match self {
                    PollState::Polling { attempts } => attempts + 1,
                    _ => 1,
                };
                PollState::Polling { attempts }
            }
            PollEvent::Completed => PollState::Done,
            PollEvent::DeadlineReached => PollState::Expired,
            PollEvent::Cancelled => PollState::Cancelled,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PollState::Done | PollState::Expired | PollState::Cancelled)
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollState::Polling { attempts } => *attempts,
            _ => 0,
        }
    }
}

impl Default for PollState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_accumulate_attempts() {
        let state = PollState::new()
            .advance(PollEvent::Tick)
            .advance(PollEvent::Tick)
            .advance(PollEvent::Tick);
        assert_eq!(state, PollState::Polling { attempts: 3 });
        assert!(!state.is_terminal());
    }

    #[test]
    fn completion_is_terminal() {
        let state = PollState::new().advance(PollEvent::Tick).advance(PollEvent::Completed);
        assert_eq!(state, PollState::Done);
        assert!(state.is_terminal());
    }

    #[test]
    fn deadline_expires_the_loop() {
        let state = PollState::new().advance(PollEvent::DeadlineReached);
        assert_eq!(state, PollState::Expired);
    }

    #[test]
    fn cancellation_wins_over_later_events() {
        let state = PollState::new()
            .advance(PollEvent::Cancelled)
            .advance(PollEvent::Completed)
            .advance(PollEvent::Tick);
        assert_eq!(state, PollState::Cancelled);
    }

    #[test]
    fn terminal_states_absorb_all_events() {
        for terminal in [PollState::Done, PollState::Expired, PollState::Cancelled] {
            for event in [
                PollEvent::Tick,
                PollEvent::Completed,
                PollEvent::DeadlineReached,
                PollEvent::Cancelled,
            ] {
                assert_eq!(terminal.advance(event), terminal);
            }
        }
    }
}
