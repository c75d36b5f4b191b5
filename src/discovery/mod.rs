mod changes;
mod paths;

pub use changes::{ChangeSet, ChangeSetResolver};
