pub mod config;
pub mod error;
pub mod flow;
pub mod retry;
pub mod session;
pub mod token;

mod default;

pub use default::default_client;
pub use error::CheckinError;
