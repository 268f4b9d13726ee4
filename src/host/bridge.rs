use super::message::{HostEvent, HostMessage, MessageKind};
use crate::error::HostError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

enum Sink {
    Once(oneshot::Sender<HostEvent>),
    Recurring(mpsc::UnboundedSender<HostEvent>),
}

struct Subscription {
    kinds: Vec<MessageKind>,
    sink: Sink,
}

#[derive(Default)]
struct Subscriptions {
    entries: Vec<Subscription>,
    closed: bool,
}

type Registry = Arc<Mutex<Subscriptions>>;

fn lock(registry: &Registry) -> MutexGuard<'_, Subscriptions> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The editor core's side of the host channel.
#[derive(Clone)]
pub struct HostBridge {
    outbound: mpsc::UnboundedSender<HostMessage>,
    subscriptions: Registry,
}

/// The embedding process's side of the host channel.
pub struct HostEndpoint {
    inbound: mpsc::UnboundedReceiver<HostMessage>,
    subscriptions: Registry,
}

impl HostBridge {
    pub fn new() -> (HostBridge, HostEndpoint) {
        let (outbound, inbound) = mpsc::unbounded_channel();
        let subscriptions: Registry = Arc::default();
        let bridge = HostBridge {
            outbound,
            subscriptions: subscriptions.clone(),
        };
        (bridge, HostEndpoint { inbound, subscriptions })
    }

    pub fn is_connected(&self) -> bool {
        !self.outbound.is_closed()
    }

    /// Sends a message that expects no answer.
    pub fn send(&self, message: HostMessage) -> Result<(), HostError> {
        debug!(kind = ?message.kind(), "Sending host message");
        self.outbound
            .send(message)
            .map_err(|_| HostError::Disconnected)
    }

    /// Sends `message` and returns a handle to the first event of one of the
    /// `expected` kinds. The subscription is registered before the message
    /// leaves, so an immediate answer cannot be missed.
    pub fn request(
        &self,
        message: HostMessage,
        expected: &[MessageKind],
    ) -> Result<PendingResponse, HostError> {
        let (sender, receiver) = oneshot::channel();
        {
            let mut subscriptions = lock(&self.subscriptions);
            if subscriptions.closed {
                return Err(HostError::Disconnected);
            }
            subscriptions.entries.push(Subscription {
                kinds: expected.to_vec(),
                sink: Sink::Once(sender),
            });
        }
        self.send(message)?;
        Ok(PendingResponse {
            expected: expected.to_vec(),
            receiver,
        })
    }

    /// Receives every event of the given kinds until the stream is dropped.
    pub fn subscribe(&self, kinds: &[MessageKind]) -> EventStream {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut subscriptions = lock(&self.subscriptions);
        if !subscriptions.closed {
            subscriptions.entries.push(Subscription {
                kinds: kinds.to_vec(),
                sink: Sink::Recurring(sender),
            });
        }
        EventStream { receiver }
    }
}

/// The answer to one request, once the host sends it.
pub struct PendingResponse {
    expected: Vec<MessageKind>,
    receiver: oneshot::Receiver<HostEvent>,
}

impl PendingResponse {
    pub fn expected(&self) -> &[MessageKind] {
        &self.expected
    }

    pub async fn wait(self) -> Result<HostEvent, HostError> {
        self.receiver.await.map_err(|_| HostError::Disconnected)
    }

    /// The answer if it already arrived; `None` while still outstanding.
    pub fn try_take(&mut self) -> Option<Result<HostEvent, HostError>> {
        match self.receiver.try_recv() {
            Ok(event) => Some(Ok(event)),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(HostError::Disconnected)),
        }
    }
}

/// A recurring subscription.
pub struct EventStream {
    receiver: mpsc::UnboundedReceiver<HostEvent>,
}

impl EventStream {
    pub async fn next(&mut self) -> Option<HostEvent> {
        self.receiver.recv().await
    }

    pub fn try_next(&mut self) -> Option<HostEvent> {
        self.receiver.try_recv().ok()
    }
}

impl HostEndpoint {
    /// The next message the core sent; `None` once every bridge is gone.
    pub async fn recv(&mut self) -> Option<HostMessage> {
        self.inbound.recv().await
    }

    pub fn try_recv(&mut self) -> Option<HostMessage> {
        self.inbound.try_recv().ok()
    }

    /// Delivers `event` to the oldest one-shot subscriber of its kind and to
    /// every recurring subscriber. Returns how many subscribers received it.
    pub fn dispatch(&self, event: HostEvent) -> usize {
        let kind = event.kind();
        let mut subscriptions = lock(&self.subscriptions);
        let mut delivered = 0;

        let once = subscriptions.entries.iter().position(|subscription| {
            matches!(subscription.sink, Sink::Once(_)) && subscription.kinds.contains(&kind)
        });
        if let Some(index) = once {
            if let Sink::Once(sender) = subscriptions.entries.remove(index).sink {
                if sender.send(event.clone()).is_ok() {
                    delivered += 1;
                } else {
                    warn!(?kind, "Host response arrived after its requester went away");
                }
            }
        }

        subscriptions.entries.retain(|subscription| match &subscription.sink {
            Sink::Recurring(sender) if subscription.kinds.contains(&kind) => {
                let alive = sender.send(event.clone()).is_ok();
                if alive {
                    delivered += 1;
                }
                alive
            }
            Sink::Recurring(sender) => !sender.is_closed(),
            Sink::Once(_) => true,
        });

        if delivered == 0 {
            debug!(?kind, "Host event had no live subscriber");
        }
        delivered
    }

    /// Subscribers still waiting for an event.
    pub fn pending(&self) -> usize {
        lock(&self.subscriptions).entries.len()
    }
}

impl Drop for HostEndpoint {
    fn drop(&mut self) {
        // Dropping the senders wakes every waiter with a disconnect.
        let mut subscriptions = lock(&self.subscriptions);
        subscriptions.closed = true;
        subscriptions.entries.clear();
    }
}
