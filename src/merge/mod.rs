//! Merge engine for labeled pull requests
//!
//! Three layers, outermost first:
//! 1. Pipeline - orders the gates and stops at the first unsatisfied one (effectful, bounded)
//! 2. Gates - decide each stage from already-fetched data (pure, testable)
//! 3. Execute - merge and delete the source branch (effectful)

mod execute;
mod gates;
mod pipeline;
mod progress;

pub use execute::{MergeExecutionResult, execute_merge};
pub use gates::{
    CheckFailure, GateResult, SkipReason, Stage, check_eligibility, evaluate_check_runs,
    evaluate_commit_statuses, evaluate_review_requests,
};
pub use pipeline::{PipelineOptions, PipelineOutcome, merge_when_green};
pub use progress::{NoopProgress, ProgressCallback};
