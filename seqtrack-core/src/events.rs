//! Typed notifications emitted by a track
//!
//! Listeners are called in subscription order, nearest first. Any listener
//! may cancel a cancelable notification or stop it from reaching the
//! listeners after it.

use crate::tooltip::TooltipContent;
use crate::types::SeqPos;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TrackEvent {
    /// Pointer entered a fragment; carries the fragment's bounds
    RangeHoverStart { start: SeqPos, end: SeqPos },
    /// Pointer left a fragment; both bounds unset
    RangeHoverEnd,
    /// A record was rejected during normalization
    DataError { message: String },
    TooltipShow(TooltipContent),
    TooltipHide,
}

impl TrackEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TrackEvent::RangeHoverStart { .. } => "range-hover-start",
            TrackEvent::RangeHoverEnd => "range-hover-end",
            TrackEvent::DataError { .. } => "data-error",
            TrackEvent::TooltipShow(_) => "tooltip-show",
            TrackEvent::TooltipHide => "tooltip-hide",
        }
    }

    /// Highlight bounds this event implies for other views
    pub fn highlight_bounds(&self) -> Option<(Option<SeqPos>, Option<SeqPos>)> {
        match self {
            TrackEvent::RangeHoverStart { start, end } => Some((Some(*start), Some(*end))),
            TrackEvent::RangeHoverEnd => Some((None, None)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    event: TrackEvent,
    cancelable: bool,
    cancelled: bool,
    stopped: bool,
}

impl Notification {
    pub fn new(event: TrackEvent) -> Self {
        Self {
            event,
            cancelable: true,
            cancelled: false,
            stopped: false,
        }
    }

    pub fn event(&self) -> &TrackEvent {
        &self.event
    }

    pub fn is_cancelable(&self) -> bool {
        self.cancelable
    }

    /// Mark the notification as handled; ignored when it is not cancelable
    pub fn cancel(&mut self) {
        if self.cancelable {
            self.cancelled = true;
        }
    }

    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }
}

/// Result of dispatching one notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub delivered: usize,
    pub cancelled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&mut Notification)>;

#[derive(Default)]
pub struct Notifier {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&mut Notification) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn dispatch(&mut self, event: TrackEvent) -> Dispatch {
        let mut notification = Notification::new(event);
        let mut delivered = 0;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&mut notification);
            delivered += 1;
            if notification.stopped {
                break;
            }
        }
        log::trace!(
            "Dispatched {} to {} listener(s)",
            notification.event.name(),
            delivered
        );
        Dispatch {
            delivered,
            cancelled: notification.cancelled,
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
