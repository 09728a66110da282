//! In-process publish/subscribe channel.
//!
//! The game actor posts events; a single dispatch task pulls them off a
//! bounded channel in post order and hands each one to the handler
//! registered for its kind. Handlers run synchronously on the dispatch
//! task, so they must not block: the fan-out handlers only `try_send` into
//! per-player queues.
//!
//! ```text
//! post() ──→ [ bounded mpsc ] ──→ dispatch task ──→ handler[kind](&event)
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::SessionError;

/// An event that can travel over an [`EventBus`].
pub trait BusEvent: Send + 'static {
    /// The routing key handlers are registered under.
    type Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    fn kind(&self) -> Self::Kind;
}

impl BusEvent for domino_engine::GameEvent {
    type Kind = domino_engine::EventKind;

    fn kind(&self) -> Self::Kind {
        domino_engine::GameEvent::kind(self)
    }
}

/// A subscriber callback.
pub type Handler<E> = Box<dyn Fn(&E) + Send + Sync>;

type HandlerMap<E> = HashMap<<E as BusEvent>::Kind, Handler<E>>;

/// A buffered event channel with at most one handler per event kind.
pub struct EventBus<E: BusEvent> {
    sender: mpsc::Sender<E>,
    receiver: Mutex<Option<mpsc::Receiver<E>>>,
    handlers: Arc<RwLock<HandlerMap<E>>>,
    started: AtomicBool,
}

impl<E: BusEvent> EventBus<E> {
    /// Creates a stopped bus that buffers up to `buffer` events.
    pub fn new(buffer: usize) -> Self {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        Self {
            sender,
            receiver: Mutex::new(Some(receiver)),
            handlers: Arc::new(RwLock::new(HashMap::new())),
            started: AtomicBool::new(false),
        }
    }

    /// Registers `handler` for `kind`, replacing any previous one.
    pub fn add_handler<F>(&self, kind: E::Kind, handler: F)
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if handlers.insert(kind, Box::new(handler)).is_some() {
            tracing::debug!(?kind, "event handler replaced");
        }
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Spawns the dispatch task. Only the first call has an effect.
    ///
    /// The task runs until every sender, including the bus itself, is
    /// dropped.
    pub fn start(&self) -> Option<JoinHandle<()>> {
        let mut slot = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(mut receiver) = slot.take() else {
            tracing::debug!("event bus already started");
            return None;
        };
        let handlers = Arc::clone(&self.handlers);
        self.started.store(true, Ordering::Release);

        Some(tokio::spawn(async move {
            tracing::debug!("event bus dispatch started");
            while let Some(event) = receiver.recv().await {
                let kind = event.kind();
                let handlers = handlers.read().unwrap_or_else(PoisonError::into_inner);
                match handlers.get(&kind) {
                    Some(handler) => {
                        tracing::trace!(?kind, "dispatching event");
                        handler(&event);
                    }
                    None => tracing::trace!(?kind, "no handler for event"),
                }
            }
            tracing::debug!("event bus dispatch stopped");
        }))
    }

    /// Queues `event` for dispatch, waiting while the buffer is full.
    ///
    /// Events posted before [`start`](Self::start) are dropped.
    pub async fn post(&self, event: E) -> Result<(), SessionError> {
        if !self.is_started() {
            tracing::debug!(kind = ?event.kind(), "event posted before bus start, dropped");
            return Ok(());
        }
        tracing::trace!(kind = ?event.kind(), "event posted");
        self.sender
            .send(event)
            .await
            .map_err(|_| SessionError::BusClosed)
    }

    /// Posts each event in order.
    pub async fn post_all(
        &self,
        events: impl IntoIterator<Item = E>,
    ) -> Result<(), SessionError> {
        for event in events {
            self.post(event).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Ping {
        A(u32),
        B(u32),
    }

    impl BusEvent for Ping {
        type Kind = char;

        fn kind(&self) -> char {
            match self {
                Ping::A(_) => 'a',
                Ping::B(_) => 'b',
            }
        }
    }

    fn collector() -> (Arc<Mutex<Vec<Ping>>>, impl Fn(&Ping) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |e: &Ping| sink.lock().unwrap().push(e.clone()))
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn test_post_dispatches_in_post_order() {
        let bus: EventBus<Ping> = EventBus::new(4);
        let (seen, handler) = collector();
        bus.add_handler('a', handler);
        let (seen_b, handler_b) = collector();
        bus.add_handler('b', handler_b);
        bus.start();

        for n in 0..20 {
            bus.post(Ping::A(n)).await.unwrap();
        }
        bus.post(Ping::B(99)).await.unwrap();
        settle().await;

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, (0..20).map(Ping::A).collect::<Vec<_>>());
        assert_eq!(*seen_b.lock().unwrap(), vec![Ping::B(99)]);
    }

    #[tokio::test]
    async fn test_post_before_start_is_dropped() {
        let bus: EventBus<Ping> = EventBus::new(4);
        let (seen, handler) = collector();
        bus.add_handler('a', handler);

        bus.post(Ping::A(1)).await.unwrap();
        bus.start();
        bus.post(Ping::A(2)).await.unwrap();
        settle().await;

        assert_eq!(*seen.lock().unwrap(), vec![Ping::A(2)]);
    }

    #[tokio::test]
    async fn test_add_handler_overwrites_previous() {
        let bus: EventBus<Ping> = EventBus::new(4);
        let (first, handler) = collector();
        bus.add_handler('a', handler);
        let (second, handler) = collector();
        bus.add_handler('a', handler);
        bus.start();

        bus.post(Ping::A(7)).await.unwrap();
        settle().await;

        assert!(first.lock().unwrap().is_empty());
        assert_eq!(*second.lock().unwrap(), vec![Ping::A(7)]);
    }

    #[tokio::test]
    async fn test_event_without_handler_is_skipped() {
        let bus: EventBus<Ping> = EventBus::new(4);
        let (seen, handler) = collector();
        bus.add_handler('a', handler);
        bus.start();

        bus.post(Ping::B(1)).await.unwrap();
        bus.post(Ping::A(2)).await.unwrap();
        settle().await;

        assert_eq!(*seen.lock().unwrap(), vec![Ping::A(2)]);
    }

    #[tokio::test]
    async fn test_start_twice_returns_none() {
        let bus: EventBus<Ping> = EventBus::new(1);
        assert!(bus.start().is_some());
        assert!(bus.start().is_none());
        assert!(bus.is_started());
    }
}
