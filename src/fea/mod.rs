//! Editing of OpenType feature (FEA) source

pub mod batch;
pub mod langsys;

pub use batch::{parse_batch_file, parse_batch_line, run_job, sync_files, SyncJob, SyncOutcome, SyncReport};
pub use langsys::{leading_language_systems, LanguageSystemSync, RuleSource};
