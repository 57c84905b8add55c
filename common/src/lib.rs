pub mod config;
pub mod identifiers;
pub mod logger;
pub mod render;
pub mod session;
pub mod snake;
pub mod store;
mod session_rng;

pub use identifiers::PlayerName;
pub use session_rng::SessionRng;
