//! Renders the process-manager instances manifest.
//!
//! `zorpctl` reads this manifest to learn which proxy instances to
//! manage; one stanza per pool, each pointing at the generated policy
//! script.

use std::path::Path;

use crate::model::PolicyState;
use crate::policy::instance_name;

/// Renders the full `instances.conf` manifest for the given state.
///
/// `policy_path` is the path of the generated policy script the
/// instances load.
pub fn render_instances(state: &PolicyState, policy_path: &Path) -> String {
    let mut out = String::new();
    for pool in &state.pools {
        out.push_str(&format!(
            "instance_{} --threads 1000 --stack-size 256 --process-mode safe-background \
             --verbose 3 --log-spec '*.accounting:4' --log-tags  --uid zorp --gid zorp \
             --fd-limit-min 256000 --policy {} -- --num-of-processes 1\n\n",
            instance_name(&pool.pool_id),
            policy_path.display(),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BalancingMethod, Pool, PoolConfig};
    use std::path::PathBuf;

    fn pool(id: &str) -> Pool {
        Pool::new(PoolConfig {
            pool_id: id.to_string(),
            name: "web".to_string(),
            subnet: "10.1.0.0/24".to_string(),
            protocol: "TCP".to_string(),
            balancing_method: BalancingMethod::RoundRobin,
            description: String::new(),
        })
    }

    #[test]
    fn test_render_instances_empty_state() {
        let state = PolicyState::default();
        assert_eq!(
            render_instances(&state, &PathBuf::from("/etc/zorp/policy.py")),
            ""
        );
    }

    #[test]
    fn test_render_instances_stanza() {
        let mut state = PolicyState::default();
        state.pools.push(pool("pool-a"));

        let text = render_instances(&state, &PathBuf::from("/etc/zorp/policy.py"));
        assert!(text.starts_with("instance_pool_a --threads 1000"));
        assert!(text.contains("--policy /etc/zorp/policy.py"));
        assert!(text.contains("--uid zorp --gid zorp"));
        assert!(text.ends_with("-- --num-of-processes 1\n\n"));
    }

    #[test]
    fn test_render_instances_one_stanza_per_pool() {
        let mut state = PolicyState::default();
        state.pools.push(pool("pool-a"));
        state.pools.push(pool("pool-b"));

        let text = render_instances(&state, &PathBuf::from("/etc/zorp/policy.py"));
        assert_eq!(text.matches("instance_pool_").count(), 2);
    }
}
