//! Deploy coordination: target selection, confirmation, per-network
//! execution and result aggregation.

pub mod aggregate;
pub mod confirm;
pub mod executor;
pub mod report;
pub mod targeting;

pub use aggregate::Aggregator;
pub use confirm::confirm_targets;
pub use executor::{DeployRequest, Deployer, DeploymentOutcome, HttpDeployer};
pub use report::{DeploymentReport, ReportStatus};
pub use targeting::{Selection, TargetSelector};
