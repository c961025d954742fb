pub mod client;
pub mod session;

pub use client::*;
pub use session::*;
