//! API layer - HTTP endpoints

pub mod chat;
pub mod health;
pub mod router;
pub mod sources;
pub mod state;
pub mod types;
pub mod upload;

pub use router::create_router_with_state;
pub use state::AppState;
