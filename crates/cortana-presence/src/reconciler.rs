//! Status state machine.
//!
//! [`Reconciler::next`] is a pure function of the current record and one
//! input event. It returns the full replacement record plus which external
//! views (topic, presence file) must be rewritten to match it.

use crate::parser::{Keyword, ParsedCommand};
use crate::status::{ClubStatus, StatusRecord};
use crate::store::StatusStore;
use chrono::{NaiveTime, Timelike};
use cortana_core::config::{clock_minutes, ClubroomConfig, StatusKeywordPolicy};
use cortana_core::error::CortanaError;
use tracing::debug;

/// One event fed to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A chat command.
    Command(ParsedCommand),
    /// Periodic read of the presence file. `now` is local wall-clock time.
    PollTick { present: bool, now: NaiveTime },
    /// Status decoded from a topic somebody else set.
    TopicObserved { status: ClubStatus, extra: String },
}

/// Which external views must be rewritten after a transition.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Resync {
    pub topic: bool,
    pub presence: bool,
}

impl Resync {
    pub const NONE: Self = Self {
        topic: false,
        presence: false,
    };
    pub const BOTH: Self = Self {
        topic: true,
        presence: true,
    };
    pub const TOPIC: Self = Self {
        topic: true,
        presence: false,
    };
    pub const PRESENCE: Self = Self {
        topic: false,
        presence: true,
    };

    pub fn any(&self) -> bool {
        self.topic || self.presence
    }
}

/// Outcome of one reconciliation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub record: StatusRecord,
    pub resync: Resync,
    /// The caller should answer with the current announcement
    /// (`status` keyword under [`StatusKeywordPolicy::Report`]).
    pub report: bool,
}

/// The clubroom state machine.
#[derive(Debug, Clone)]
pub struct Reconciler {
    status_policy: StatusKeywordPolicy,
    separator: String,
    /// Stale-note window bounds, minutes since midnight.
    stale_note_start: u32,
    stale_note_end: u32,
}

impl Reconciler {
    /// Window bounds are zero-padded `"HH:MM"`; `"24:00"` may end a window.
    pub fn new(
        status_policy: StatusKeywordPolicy,
        separator: &str,
        stale_note_start: &str,
        stale_note_end: &str,
    ) -> Result<Self, CortanaError> {
        let start = clock_minutes(stale_note_start)
            .filter(|m| *m < 24 * 60)
            .ok_or_else(|| {
                CortanaError::Config(format!("invalid stale note start {stale_note_start:?}"))
            })?;
        let end = clock_minutes(stale_note_end).ok_or_else(|| {
            CortanaError::Config(format!("invalid stale note end {stale_note_end:?}"))
        })?;
        Ok(Self {
            status_policy,
            separator: separator.to_string(),
            stale_note_start: start,
            stale_note_end: end,
        })
    }

    pub fn from_config(cfg: &ClubroomConfig) -> Result<Self, CortanaError> {
        Self::new(
            cfg.status_keyword,
            &cfg.topic_separator,
            &cfg.stale_note_start,
            &cfg.stale_note_end,
        )
    }

    /// Compute the next record for `old` given one input.
    pub fn next(&self, old: &StatusRecord, input: &Input) -> Transition {
        match input {
            Input::Command(cmd) => self.on_command(old, cmd),
            Input::PollTick { present, now } => self.on_poll(old, *present, *now),
            Input::TopicObserved { status, extra } => on_topic(old, *status, extra),
        }
    }

    /// Run one input against a tracked channel and store the result.
    ///
    /// Fails with [`CortanaError::UntrackedChannel`] when `channel` was never
    /// registered; the store is left untouched in that case.
    pub fn apply(
        &self,
        store: &mut StatusStore,
        channel: &str,
        input: &Input,
    ) -> Result<Transition, CortanaError> {
        let old = store.get(channel)?;
        let transition = self.next(old, input);
        if &transition.record != old {
            debug!(
                "{channel}: {} -> {}",
                describe(old),
                describe(&transition.record)
            );
        }
        store.replace(channel, transition.record.clone())?;
        Ok(transition)
    }

    fn on_command(&self, old: &StatusRecord, cmd: &ParsedCommand) -> Transition {
        let status = match cmd.keyword {
            Keyword::Open => ClubStatus::Open,
            Keyword::Closed => ClubStatus::Closed,
            Keyword::Reserved => ClubStatus::Reserved,
            Keyword::Status => match self.status_policy {
                StatusKeywordPolicy::Open => ClubStatus::Open,
                StatusKeywordPolicy::Report => {
                    return Transition {
                        record: old.clone(),
                        resync: Resync::NONE,
                        report: true,
                    };
                }
            },
        };
        let extra = cmd
            .remainder
            .as_deref()
            .map(|r| self.sanitize_extra(r))
            .unwrap_or_default();
        Transition {
            record: StatusRecord::new(status, extra),
            resync: Resync::BOTH,
            report: false,
        }
    }

    fn on_poll(&self, old: &StatusRecord, present: bool, now: NaiveTime) -> Transition {
        match (present, old.presence()) {
            (true, false) => Transition {
                record: StatusRecord::new(ClubStatus::Open, old.extra.clone()),
                resync: Resync::TOPIC,
                report: false,
            },
            (false, true) => {
                let extra = if self.in_stale_note_window(now) {
                    String::new()
                } else {
                    old.extra.clone()
                };
                Transition {
                    record: StatusRecord::new(ClubStatus::Closed, extra),
                    resync: Resync::TOPIC,
                    report: false,
                }
            }
            _ => unchanged(old),
        }
    }

    /// Notes are single-segment text: trim and keep the separator out.
    fn sanitize_extra(&self, raw: &str) -> String {
        raw.replace(self.separator.as_str(), "/").trim().to_string()
    }

    fn in_stale_note_window(&self, now: NaiveTime) -> bool {
        let now = now.hour() * 60 + now.minute();
        let (start, end) = (self.stale_note_start, self.stale_note_end);
        if start <= end {
            now >= start && now < end
        } else {
            // Midnight wrap: e.g. 22:00 to 06:00
            now >= start || now < end
        }
    }
}

fn on_topic(old: &StatusRecord, status: ClubStatus, extra: &str) -> Transition {
    if old.status == status && old.extra == extra {
        return unchanged(old);
    }
    Transition {
        record: StatusRecord::new(status, extra),
        resync: Resync::PRESENCE,
        report: false,
    }
}

fn unchanged(old: &StatusRecord) -> Transition {
    Transition {
        record: old.clone(),
        resync: Resync::NONE,
        report: false,
    }
}

fn describe(rec: &StatusRecord) -> String {
    if rec.extra.is_empty() {
        rec.status.to_string()
    } else {
        format!("{} ({})", rec.status, rec.extra)
    }
}

#[cfg(test)]
mod tests;
