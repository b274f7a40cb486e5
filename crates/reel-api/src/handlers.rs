//! API handlers.

pub mod generate;
pub mod health;
pub mod session;
pub mod videos;

pub use generate::*;
pub use health::*;
pub use session::*;
pub use videos::*;
