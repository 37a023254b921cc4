//! Application layer: stores, view derivation, workspace, and use cases

pub mod query;
pub mod store;
pub mod use_cases;
pub mod workspace;

pub use query::{
    CategoryFilter, MatchLogic, SearchSpec, SortKey, StatusVisibility, ViewState, compute_view,
    status_counts,
};
pub use store::FindingStore;
pub use use_cases::{LoadError, LoadOutcome, OpenChecklistUseCase, SaveChecklistUseCase};
pub use workspace::{DocumentId, OpenDocument, Workspace};
