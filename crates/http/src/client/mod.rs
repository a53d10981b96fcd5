//! Echo API client

pub mod auth_typed;
pub mod error;
pub mod resources;
pub mod typed;

pub use error::ClientError;
pub use resources::ResourceKind;
pub use typed::{AuthenticatedEchoClient, ClientBuilder, PublicEchoClient};
