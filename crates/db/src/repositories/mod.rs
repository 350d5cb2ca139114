pub mod case_repo;
pub mod status_history_repo;

pub use case_repo::{CaseRepo, CaseScope};
pub use status_history_repo::StatusHistoryRepo;
