//! lbmgrd - load-balancer manager for the Zorp proxy.
//!
//! Translates declarative pool/member/VIP changes into the proxy's
//! configuration artifacts (XML state file, policy script, instances
//! manifest) and restarts the managed instances via `zorpctl`.

pub mod cli;
pub mod commands;
pub mod driver;

pub use commands::*;
pub use driver::{LoadBalancerDriver, PoolStats, ZorpDriver};
