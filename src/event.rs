//! Lifecycle events and the dispatcher delivering them.
//!
//! The engine never formats anything itself. It dispatches [`Event`]s and
//! reporters listen for the ones they care about. Handlers run synchronously,
//! in registration order, on the thread executing the tests.

use std::fmt::Debug;

use crate::{
    group::{Group, GroupMeta},
    test::Test,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BeginningDescribe,
    SkippingDescribe,
    SkippingTest,
    FinishedTest,
    FinishedTestRun,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::BeginningDescribe,
        EventKind::SkippingDescribe,
        EventKind::SkippingTest,
        EventKind::FinishedTest,
        EventKind::FinishedTestRun,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::BeginningDescribe => "beginningDescribe",
            EventKind::SkippingDescribe => "skippingDescribe",
            EventKind::SkippingTest => "skippingTest",
            EventKind::FinishedTest => "finishedTest",
            EventKind::FinishedTestRun => "finishedTestRun",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Event<'e> {
    /// A group is about to run. `describe_stack` holds its ancestors, not the group itself.
    BeginningDescribe {
        describe_stack: &'e [GroupMeta],
        group: &'e Group,
    },
    SkippingDescribe {
        describe_stack: &'e [GroupMeta],
        group: &'e Group,
    },
    SkippingTest(&'e Test),
    FinishedTest(&'e Test),
    FinishedTestRun,
}

impl Event<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::BeginningDescribe { .. } => EventKind::BeginningDescribe,
            Event::SkippingDescribe { .. } => EventKind::SkippingDescribe,
            Event::SkippingTest(_) => EventKind::SkippingTest,
            Event::FinishedTest(_) => EventKind::FinishedTest,
            Event::FinishedTestRun => EventKind::FinishedTestRun,
        }
    }
}

type Handler = Box<dyn FnMut(&Event<'_>) + Send>;

#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<(EventKind, Handler)>,
}

impl Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field(
                "handlers",
                &self.handlers.iter().map(|(kind, _)| kind).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of `kind`.
    pub fn listen<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&Event<'_>) + Send + 'static,
    {
        self.handlers.push((kind, Box::new(handler)));
    }

    /// Register one handler for every kind of event.
    pub fn listen_all<F>(&mut self, handler: F)
    where
        F: FnMut(&Event<'_>) + Send + 'static,
    {
        let handler = std::sync::Arc::new(std::sync::Mutex::new(handler));
        for kind in EventKind::ALL {
            let handler = std::sync::Arc::clone(&handler);
            self.listen(kind, move |event| {
                let mut handler = handler
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                (*handler)(event)
            });
        }
    }

    pub fn dispatch(&mut self, event: &Event<'_>) {
        let kind = event.kind();
        self.handlers
            .iter_mut()
            .filter(|(handler_kind, _)| *handler_kind == kind)
            .for_each(|(_, handler)| handler(event));
    }
}
