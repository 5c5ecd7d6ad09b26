// In-memory analyze → generate sessions for the UI.
// The core procedures stay stateless; this layer owns the lifecycle.

pub mod handlers;
pub mod state;
pub mod store;
