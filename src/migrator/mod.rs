pub mod orchestrator;
pub mod report;

pub use orchestrator::{MigrationOrchestrator, find_playlist};
pub use report::{LowConfidenceMatch, MigrationResult, save_migration_results};
