//! External command builders and artifact path defaults.

use zlb_common::shell;

/// Default path of the XML state file.
pub const DEFAULT_STATE_FILE: &str = "/etc/zorp/policy.xml";

/// Default path of the generated policy script.
pub const DEFAULT_POLICY_FILE: &str = "/etc/zorp/policy.py";

/// Default path of the instances manifest.
pub const DEFAULT_INSTANCES_FILE: &str = "/etc/zorp/instances.conf";

/// Build the proxy restart command.
///
/// `zorpctl restart` re-reads the instances manifest and the policy
/// script for every managed instance.
pub fn build_restart_cmd() -> String {
    format!("{} {} restart", shell::SUDO_CMD, shell::ZORPCTL_CMD)
}
