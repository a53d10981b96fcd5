//! Echo core types and session state

pub mod error;
pub mod format;
pub mod session;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use session::{
    MemorySessionStore, NoopTerminationHandler, Session, SessionStore, SessionTerminationHandler,
};
pub use types::{CredentialPair, Goal, Initiative, InitiativeStatus, Tenant, User};
