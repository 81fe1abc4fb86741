use crux_core::capability::{Capability, CapabilityContext, Operation};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Row-level change kinds delivered by the backing store's change feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A change notification. The payload is intentionally opaque: the core
/// reacts to the fact of a change, not to its content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeNotification {
    pub kind: ChangeKind,
    pub schema: String,
    pub table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum RealtimeOperation {
    Subscribe {
        channel: String,
        schema: String,
        table: String,
    },
    Unsubscribe {
        channel: String,
    },
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum RealtimeError {
    #[error("channel error: {message}")]
    Channel { message: String },

    #[error("subscription timed out")]
    Timeout,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum RealtimeOutput {
    Subscribed,
    Change(ChangeNotification),
    Closed { reason: Option<String> },
    Failed(RealtimeError),
}

impl Operation for RealtimeOperation {
    type Output = RealtimeOutput;
}

pub struct Realtime<Ev> {
    context: CapabilityContext<RealtimeOperation, Ev>,
}

impl<Ev> Capability<Ev> for Realtime<Ev> {
    type Operation = RealtimeOperation;
    type MappedSelf<MappedEv> = Realtime<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Realtime::new(self.context.map_event(f))
    }
}

impl<Ev> Realtime<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<RealtimeOperation, Ev>) -> Self {
        Self { context }
    }

    /// Opens a change-feed subscription. Every item the shell pushes on the
    /// stream becomes one app event, until the shell stops resolving it.
    pub fn subscribe<F>(
        &self,
        channel: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
        make_event: F,
    ) where
        F: Fn(RealtimeOutput) -> Ev + Send + Sync + 'static,
    {
        let operation = RealtimeOperation::Subscribe {
            channel: channel.into(),
            schema: schema.into(),
            table: table.into(),
        };

        let context = self.context.clone();
        self.context.spawn(async move {
            let mut stream = context.stream_from_shell(operation);
            while let Some(output) = stream.next().await {
                context.update_app(make_event(output));
            }
        });
    }

    pub fn unsubscribe(&self, channel: impl Into<String>) {
        let operation = RealtimeOperation::Unsubscribe {
            channel: channel.into(),
        };

        let context = self.context.clone();
        self.context.spawn(async move {
            context.notify_shell(operation).await;
        });
    }
}
