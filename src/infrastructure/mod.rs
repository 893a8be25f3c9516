//! Infrastructure layer - Framework implementations
//!
//! Repository implementations (SeaORM) and the shared application state.

pub mod repositories;
pub mod state;

pub use repositories::*;
pub use state::AppState;
