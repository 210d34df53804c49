//! Provider API clients

pub mod henrik;

pub use henrik::{ClientError, HenrikClient};
