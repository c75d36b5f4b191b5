mod client;
mod event;
mod models;

pub use client::{GitHubApi, RestClient};
pub use event::Event;
pub use models::*;
