//! Tailgate relay HTTP server.
//!
//! Sits between a chat client and the backend API: conversation
//! fetches get their payload pruned on the way back, everything else
//! is relayed untouched.

pub mod relay;
pub mod rewrite;
pub mod server;
pub mod targeting;

pub use server::{GatewayState, router, start_server};
