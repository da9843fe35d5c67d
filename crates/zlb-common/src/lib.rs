//! Common infrastructure for the Zorp LBaaS driver crates.
//!
//! This crate provides shared functionality for the driver workspace:
//!
//! - [`shell`]: Shell command execution for the proxy restart
//! - [`error`]: Error types for driver operations
//!
//! # Architecture
//!
//! The driver follows this pattern:
//!
//! 1. Receive a declarative pool/member/VIP change
//! 2. Persist it to the XML state file
//! 3. Regenerate the policy script and instances manifest
//! 4. Restart the proxy's managed instances via `zorpctl`
//!
//! # Example
//!
//! ```ignore
//! use zlb_common::{
//!     shell::{self, SUDO_CMD, ZORPCTL_CMD},
//!     LbResult,
//! };
//!
//! async fn restart_proxy() -> LbResult<()> {
//!     let cmd = format!("{} {} restart", SUDO_CMD, ZORPCTL_CMD);
//!     shell::exec_or_throw(&cmd).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod shell;

// Re-export commonly used items at crate root
pub use error::{LbError, LbResult};
