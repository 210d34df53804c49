//! HenrikDev Valorant API client
//!
//! Resolves accounts to PUUIDs, lists an account's match IDs and fetches
//! full match details. Every request goes through the shared rate limiter
//! when one is attached.
//!
//! # Example
//!
//! ```rust,ignore
//! use valorant::infrastructure::client::henrik::HenrikClient;
//!
//! let client = HenrikClient::new(api_key, "na", Duration::from_secs(12), 3)?;
//! let ids = client.get_match_ids("Rosarino", "CARC", "competitive").await?;
//! let details = client.get_match(&ids[0]).await?;
//! ```

mod client;
mod types;

pub use client::{parse_retry_after, ClientError, HenrikClient, Result, HENRIK_API_BASE_URL};
pub use types::AccountData;
