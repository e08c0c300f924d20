//! API request handlers

mod compile;
mod health;
mod proxy;

pub use compile::*;
pub use health::*;
pub use proxy::*;
