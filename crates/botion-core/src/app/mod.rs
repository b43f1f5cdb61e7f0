//! Use cases that drive the device.

mod gate;
mod input;
mod orchestrator;
mod presenter;
mod provisioning;
mod task_client;

pub use gate::{BootDecision, CredentialGate, GateConfig, JoinError};
pub use input::InputMonitor;
pub use orchestrator::{Orchestrator, OrchestratorConfig, Phase, TickOutcome};
pub use presenter::{COMPLETION_MESSAGE, IDLE_MESSAGE, Presenter, Sweep};
pub use provisioning::{ProvisioningController, SUCCESS_MESSAGE, SubmitError};
pub use task_client::{RemoteError, TaskClient, TaskClientConfig};
