//! Wire types shared by the proxy and the client view

mod prediction;

pub use prediction::*;
