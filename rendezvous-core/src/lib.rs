//! The rendezvous engine: shared state that lets two game clients find each
//! other's address and agree to connect directly.

mod clock;
mod config;
mod endpoint;
mod engine;
mod errors;
mod invites;
mod matchmaking;
mod presence;
mod rooms;
mod util;

pub use clock::*;
pub use config::*;
pub use endpoint::*;
pub use engine::*;
pub use errors::*;
pub use invites::*;
pub use matchmaking::*;
pub use presence::*;
pub use rooms::*;
