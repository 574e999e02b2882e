//! Domain types shared by the state and presentation layers
//!
//! - Identifier aliases for views, sessions, components and users
//! - Interactions and the responses callbacks produce

pub mod ids;
pub mod interaction;

pub use ids::{ComponentId, SessionId, UserId, ViewId};
pub use interaction::{Interaction, Response};
