mod executor;

pub use executor::execute;
