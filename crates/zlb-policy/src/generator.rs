//! Writes the generated configuration artifacts to disk.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use zlb_common::{LbError, LbResult};

use crate::instances::render_instances;
use crate::model::PolicyState;
use crate::policy::render_policy;

/// Generator for the proxy's configuration artifacts.
///
/// Owns the output paths; rendering is pure, writing rewrites each
/// artifact in full.
#[derive(Debug, Clone)]
pub struct PolicyGenerator {
    policy_path: PathBuf,
    instances_path: PathBuf,
}

impl PolicyGenerator {
    /// Creates a generator writing to the given artifact paths.
    pub fn new(policy_path: impl Into<PathBuf>, instances_path: impl Into<PathBuf>) -> Self {
        Self {
            policy_path: policy_path.into(),
            instances_path: instances_path.into(),
        }
    }

    /// Returns the policy script path.
    pub fn policy_path(&self) -> &Path {
        &self.policy_path
    }

    /// Returns the instances manifest path.
    pub fn instances_path(&self) -> &Path {
        &self.instances_path
    }

    /// Renders the policy script text.
    pub fn render_policy(&self, state: &PolicyState) -> String {
        render_policy(state)
    }

    /// Renders the instances manifest text.
    pub fn render_instances(&self, state: &PolicyState) -> String {
        render_instances(state, &self.policy_path)
    }

    /// Writes the policy script.
    pub fn write_policy(&self, state: &PolicyState) -> LbResult<()> {
        let text = self.render_policy(state);
        fs::write(&self.policy_path, text).map_err(|e| LbError::io(&self.policy_path, e))?;
        debug!(path = %self.policy_path.display(), "Wrote policy script");
        Ok(())
    }

    /// Writes the instances manifest.
    pub fn write_instances(&self, state: &PolicyState) -> LbResult<()> {
        let text = self.render_instances(state);
        fs::write(&self.instances_path, text).map_err(|e| LbError::io(&self.instances_path, e))?;
        debug!(path = %self.instances_path.display(), "Wrote instances manifest");
        Ok(())
    }

    /// Regenerates both artifacts.
    pub fn write_all(&self, state: &PolicyState) -> LbResult<()> {
        self.write_policy(state)?;
        self.write_instances(state)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BalancingMethod, Pool, PoolConfig};
    use tempfile::tempdir;

    #[test]
    fn test_write_all_creates_both_artifacts() {
        let dir = tempdir().unwrap();
        let policy_path = dir.path().join("policy.py");
        let instances_path = dir.path().join("instances.conf");
        let gen = PolicyGenerator::new(&policy_path, &instances_path);

        let mut state = PolicyState::default();
        state.pools.push(Pool::new(PoolConfig {
            pool_id: "pool-1".to_string(),
            name: "web".to_string(),
            subnet: "10.1.0.0/24".to_string(),
            protocol: "TCP".to_string(),
            balancing_method: BalancingMethod::RoundRobin,
            description: String::new(),
        }));

        gen.write_all(&state).unwrap();

        let policy = fs::read_to_string(&policy_path).unwrap();
        assert!(policy.contains("def instance_pool_1():"));

        let instances = fs::read_to_string(&instances_path).unwrap();
        assert!(instances.contains("instance_pool_1 --threads 1000"));
        assert!(instances.contains(&format!("--policy {}", policy_path.display())));
    }
}
