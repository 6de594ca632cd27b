//! Request handlers.

pub mod estimate;
pub mod health;

pub use estimate::*;
pub use health::*;
