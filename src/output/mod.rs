mod summary;

pub use summary::{write_outputs, write_step_summary, RunStatus, RunSummary};
