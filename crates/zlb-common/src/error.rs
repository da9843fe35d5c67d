//! Error types for the Zorp LBaaS driver.
//!
//! All errors implement `std::error::Error` via `thiserror` and are
//! shared across the driver crates.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for driver operations.
pub type LbResult<T> = Result<T, LbError>;

/// Errors that can occur while managing load-balancer state.
#[derive(Debug, Error)]
pub enum LbError {
    /// Failed to execute a shell command (spawn error).
    #[error("Failed to execute shell command '{command}': {source}")]
    ShellExec {
        /// The command that failed to execute.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Shell command returned non-zero exit code.
    #[error("Shell command failed: '{command}' (exit code {exit_code}): {output}")]
    ShellCommandFailed {
        /// The command that failed.
        command: String,
        /// The exit code.
        exit_code: i32,
        /// Combined stdout/stderr output.
        output: String,
    },

    /// State or artifact file I/O failed.
    #[error("File operation failed on {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// XML state file could not be parsed or serialized.
    #[error("XML error in {path}: {message}")]
    Xml {
        /// The state file involved.
        path: PathBuf,
        /// Parser/serializer message.
        message: String,
    },

    /// Pool not found in the state file.
    #[error("Pool '{pool_id}' not found")]
    PoolNotFound {
        /// The pool identifier.
        pool_id: String,
    },

    /// Member not found in its parent pool.
    #[error("Member '{member_id}' not found in pool '{pool_id}'")]
    MemberNotFound {
        /// The parent pool identifier.
        pool_id: String,
        /// The member identifier.
        member_id: String,
    },

    /// VIP not found on its parent pool.
    #[error("VIP '{vip_id}' not found in pool '{pool_id}'")]
    VipNotFound {
        /// The parent pool identifier.
        pool_id: String,
        /// The VIP identifier.
        vip_id: String,
    },

    /// A pool with this identifier already exists.
    #[error("Pool '{pool_id}' already exists")]
    DuplicatePool {
        /// The pool identifier.
        pool_id: String,
    },

    /// A member with this identifier already exists in the pool.
    #[error("Member '{member_id}' already exists in pool '{pool_id}'")]
    DuplicateMember {
        /// The parent pool identifier.
        pool_id: String,
        /// The member identifier.
        member_id: String,
    },

    /// The pool already carries a VIP.
    #[error("Pool '{pool_id}' already has a VIP")]
    VipAlreadySet {
        /// The parent pool identifier.
        pool_id: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },
}

impl LbError {
    /// Creates a file I/O error.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an XML error.
    pub fn xml(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Xml {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a pool not found error.
    pub fn pool_not_found(pool_id: impl Into<String>) -> Self {
        Self::PoolNotFound {
            pool_id: pool_id.into(),
        }
    }

    /// Creates a member not found error.
    pub fn member_not_found(pool_id: impl Into<String>, member_id: impl Into<String>) -> Self {
        Self::MemberNotFound {
            pool_id: pool_id.into(),
            member_id: member_id.into(),
        }
    }

    /// Creates a VIP not found error.
    pub fn vip_not_found(pool_id: impl Into<String>, vip_id: impl Into<String>) -> Self {
        Self::VipNotFound {
            pool_id: pool_id.into(),
            vip_id: vip_id.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }
}
