pub mod client;
pub mod run;

pub use client::ActorClient;
pub use run::{ActorRun, RunStatus};
