mod client;
mod conditions;

pub use client::*;
pub use conditions::*;
