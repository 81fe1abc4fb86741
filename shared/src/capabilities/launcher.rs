//! Fire-and-forget hand-offs to the device: the dialer and external map apps.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum LaunchOperation {
    Dial { number: String },
    OpenUrl { url: String },
}

impl Operation for LaunchOperation {
    type Output = ();
}

pub struct Launcher<Ev> {
    context: CapabilityContext<LaunchOperation, Ev>,
}

impl<Ev> Capability<Ev> for Launcher<Ev> {
    type Operation = LaunchOperation;
    type MappedSelf<MappedEv> = Launcher<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Launcher::new(self.context.map_event(f))
    }
}

impl<Ev> Launcher<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<LaunchOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn dial(&self, number: impl Into<String>) {
        self.notify(LaunchOperation::Dial {
            number: number.into(),
        });
    }

    pub fn open_url(&self, url: impl Into<String>) {
        self.notify(LaunchOperation::OpenUrl { url: url.into() });
    }

    fn notify(&self, operation: LaunchOperation) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context.notify_shell(operation).await;
        });
    }
}
