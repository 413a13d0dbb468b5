pub mod spec;
pub mod supervisor;
pub mod task;

pub use spec::{LaunchConfig, LaunchSpecification, MemoryBounds, VersionChannel, VersionSelector};
pub use supervisor::{ChildProcessHandle, LaunchPhase, LaunchSupervisor};
