//! Debounced tooltip scheduling
//!
//! Hover-driven show/hide is delayed by [`TOOLTIP_DELAY`] so that sweeping the
//! pointer across neighbouring shapes does not flicker. At most one action is
//! pending: a leave cancels a pending show, a new enter supersedes a pending
//! hide. Time is passed in by the host, which keeps the scheduler free of
//! timers and threads.

use crate::types::SeqPos;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::{Duration, Instant};

pub const TOOLTIP_DELAY: Duration = Duration::from_millis(50);

/// Which pointer interaction opens a tooltip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipTrigger {
    #[default]
    Mouseover,
    Click,
}

impl FromStr for TooltipTrigger {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mouseover" | "hover" => Ok(TooltipTrigger::Mouseover),
            "click" => Ok(TooltipTrigger::Click),
            other => Err(format!("unknown tooltip event '{}'", other)),
        }
    }
}

/// What an external presenter needs to draw a tooltip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipContent {
    pub accession: String,
    pub title: String,
    pub content: Option<String>,
    pub start: SeqPos,
    pub end: SeqPos,
    pub closeable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TooltipAction {
    Show(TooltipContent),
    Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct DelayedTask {
    handle: TaskHandle,
    due: Instant,
    action: TooltipAction,
}

#[derive(Debug, Clone)]
pub struct TooltipScheduler {
    delay: Duration,
    pending: Option<DelayedTask>,
    visible: Option<TooltipContent>,
    next_handle: u64,
}

impl Default for TooltipScheduler {
    fn default() -> Self {
        Self::new(TOOLTIP_DELAY)
    }
}

impl TooltipScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            visible: None,
            next_handle: 0,
        }
    }

    fn schedule(&mut self, now: Instant, action: TooltipAction) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.pending = Some(DelayedTask {
            handle,
            due: now + self.delay,
            action,
        });
        handle
    }

    /// Show after the delay, replacing whatever was pending
    pub fn schedule_show(&mut self, now: Instant, content: TooltipContent) -> TaskHandle {
        self.schedule(now, TooltipAction::Show(content))
    }

    /// Hide after the delay; a pending show is dropped
    pub fn schedule_hide(&mut self, now: Instant) -> TaskHandle {
        self.schedule(now, TooltipAction::Hide)
    }

    /// Cancel a pending task; false if it already fired or was superseded
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match &self.pending {
            Some(task) if task.handle == handle => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Show immediately, dropping anything pending
    pub fn show_now(&mut self, content: TooltipContent) -> TooltipAction {
        self.pending = None;
        self.visible = Some(content.clone());
        TooltipAction::Show(content)
    }

    /// Hide immediately; `None` when nothing was showing
    pub fn hide_now(&mut self) -> Option<TooltipAction> {
        self.pending = None;
        self.visible.take().map(|_| TooltipAction::Hide)
    }

    /// Fire the pending action if it is due
    pub fn poll(&mut self, now: Instant) -> Option<TooltipAction> {
        let due = self.pending.as_ref().map_or(false, |task| task.due <= now);
        if !due {
            return None;
        }
        let task = self.pending.take()?;
        match &task.action {
            TooltipAction::Show(content) => self.visible = Some(content.clone()),
            TooltipAction::Hide => {
                // nothing visible, nothing to hide
                self.visible.as_ref()?;
                self.visible = None;
            }
        }
        Some(task.action)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn visible(&self) -> Option<&TooltipContent> {
        self.visible.as_ref()
    }
}
