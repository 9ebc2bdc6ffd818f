//! Grid-level notifications.
//!
//! Every command handled by a [`Grid`](crate::Grid) produces at most one
//! [`GridEvent`], delivered synchronously to all registered sinks.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::layer::LayerEvent;
use crate::types::{Axis, Selection};

/// Notification emitted by a grid after a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GridEvent {
    /// A layer event from the top of one axis stack, in visible positions.
    Layer { axis: Axis, event: LayerEvent },
    /// Selection moved or was cleared. Coordinates are indexes.
    SelectionChanged { selection: Option<Selection> },
}

impl GridEvent {
    /// True if observers only need to repaint.
    pub fn is_refresh(&self) -> bool {
        matches!(
            self,
            GridEvent::Layer {
                event: LayerEvent::VisualRefresh,
                ..
            }
        )
    }
}

/// Receiver of grid events.
pub trait EventSink {
    fn notify(&mut self, event: &GridEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&GridEvent),
{
    fn notify(&mut self, event: &GridEvent) {
        self(event);
    }
}

/// Sink that records events; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<GridEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<GridEvent> {
        self.events.borrow().clone()
    }

    /// Drain the buffer.
    pub fn take(&self) -> Vec<GridEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventSink for EventLog {
    fn notify(&mut self, event: &GridEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
