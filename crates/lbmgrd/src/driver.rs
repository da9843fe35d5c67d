//! ZorpDriver - translates load-balancer object changes into proxy
//! configuration.
//!
//! Every mutating call follows the same sequence: persist the change to
//! the XML state store, regenerate the policy script and the instances
//! manifest, and restart the proxy's managed instances. Driver methods
//! take `&mut self`; exclusive access serializes deployments the way
//! the host framework's named deploy mutex did in the original setup.

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use zlb_common::{shell, LbResult};
use zlb_policy::{Member, PolicyGenerator, PoolConfig, Vip, XmlStore};

use crate::commands::build_restart_cmd;

/// Traffic counters for a pool.
///
/// Statistics collection is not wired to the proxy; the record exists
/// so the driver surface matches the orchestration framework's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Bytes received on the front side.
    pub bytes_in: u64,
    /// Bytes sent to the front side.
    pub bytes_out: u64,
    /// Currently open connections.
    pub active_connections: u64,
    /// Connections accepted since start.
    pub total_connections: u64,
}

/// Driver surface for declarative load-balancer changes.
///
/// Mirrors the orchestration framework's per-object CRUD calls. Health
/// monitor operations are accepted but not implemented.
#[async_trait]
pub trait LoadBalancerDriver {
    /// Returns the driver name for logging.
    fn name(&self) -> &str;

    /// Creates a pool.
    async fn create_pool(&mut self, config: PoolConfig) -> LbResult<()>;
    /// Updates a pool's attributes.
    async fn update_pool(&mut self, config: PoolConfig) -> LbResult<()>;
    /// Deletes a pool and its subtree.
    async fn delete_pool(&mut self, pool_id: &str) -> LbResult<()>;

    /// Adds a member to a pool.
    async fn create_member(&mut self, pool_id: &str, member: Member) -> LbResult<()>;
    /// Replaces a member's attributes.
    async fn update_member(&mut self, pool_id: &str, member: Member) -> LbResult<()>;
    /// Removes a member from a pool.
    async fn delete_member(&mut self, pool_id: &str, member_id: &str) -> LbResult<()>;

    /// Attaches a VIP to a pool.
    async fn create_vip(&mut self, pool_id: &str, vip: Vip) -> LbResult<()>;
    /// Replaces a pool's VIP.
    async fn update_vip(&mut self, pool_id: &str, vip: Vip) -> LbResult<()>;
    /// Detaches a VIP from a pool.
    async fn delete_vip(&mut self, pool_id: &str, vip_id: &str) -> LbResult<()>;

    /// Creates a health monitor on a pool. Not implemented.
    async fn create_health_monitor(&mut self, pool_id: &str) -> LbResult<()> {
        debug!(pool_id = %pool_id, "Health monitors not implemented, ignoring create");
        Ok(())
    }

    /// Updates a health monitor on a pool. Not implemented.
    async fn update_health_monitor(&mut self, pool_id: &str) -> LbResult<()> {
        debug!(pool_id = %pool_id, "Health monitors not implemented, ignoring update");
        Ok(())
    }

    /// Deletes a health monitor from a pool. Not implemented.
    async fn delete_health_monitor(&mut self, pool_id: &str) -> LbResult<()> {
        debug!(pool_id = %pool_id, "Health monitors not implemented, ignoring delete");
        Ok(())
    }

    /// Returns traffic statistics for a pool. Not wired to the proxy.
    async fn pool_stats(&mut self, pool_id: &str) -> LbResult<PoolStats> {
        debug!(pool_id = %pool_id, "Statistics not implemented, returning zeros");
        Ok(PoolStats::default())
    }
}

/// Zorp load-balancer driver.
pub struct ZorpDriver {
    /// XML state store.
    store: XmlStore,

    /// Artifact generator (policy script + instances manifest).
    generator: PolicyGenerator,

    /// When false, artifacts are regenerated but the proxy is not
    /// restarted (dry-run / batching support).
    restart_enabled: bool,

    /// Mock mode for testing (don't execute shell commands).
    #[cfg(test)]
    mock_mode: bool,

    /// Captured shell commands in mock mode.
    #[cfg(test)]
    captured_commands: Vec<String>,
}

impl ZorpDriver {
    /// Creates a driver over an opened store and a generator.
    pub fn new(store: XmlStore, generator: PolicyGenerator) -> Self {
        Self {
            store,
            generator,
            restart_enabled: true,
            #[cfg(test)]
            mock_mode: false,
            #[cfg(test)]
            captured_commands: Vec::new(),
        }
    }

    /// Enables or disables the proxy restart after each change.
    pub fn with_restart(mut self, enabled: bool) -> Self {
        self.restart_enabled = enabled;
        self
    }

    /// Enables mock mode for testing.
    #[cfg(test)]
    pub fn with_mock_mode(mut self) -> Self {
        self.mock_mode = true;
        self
    }

    /// Gets captured commands (for testing).
    #[cfg(test)]
    pub fn captured_commands(&self) -> &[String] {
        &self.captured_commands
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &XmlStore {
        &self.store
    }

    /// Execute a shell command (with mock mode support).
    async fn exec(&mut self, cmd: &str) -> LbResult<()> {
        #[cfg(test)]
        if self.mock_mode {
            self.captured_commands.push(cmd.to_string());
            info!("Mock exec: {}", cmd);
            return Ok(());
        }

        shell::exec_or_throw(cmd).await?;
        Ok(())
    }

    /// Restarts the proxy's managed instances.
    pub async fn restart_proxy(&mut self) -> LbResult<()> {
        let cmd = build_restart_cmd();
        self.exec(&cmd).await?;
        info!("Restarted proxy instances");
        Ok(())
    }

    /// Regenerates both artifacts and restarts the proxy.
    ///
    /// Also usable standalone to resync the artifacts with the state
    /// file without a state change.
    pub async fn sync(&mut self) -> LbResult<()> {
        self.generator.write_all(self.store.state())?;
        if self.restart_enabled {
            self.restart_proxy().await?;
        } else {
            warn!("Restart disabled, proxy keeps running the previous configuration");
        }
        Ok(())
    }
}

#[async_trait]
impl LoadBalancerDriver for ZorpDriver {
    fn name(&self) -> &str {
        "zorp"
    }

    #[instrument(skip(self, config), fields(pool_id = %config.pool_id))]
    async fn create_pool(&mut self, config: PoolConfig) -> LbResult<()> {
        self.store.create_pool(config)?;
        self.sync().await
    }

    #[instrument(skip(self, config), fields(pool_id = %config.pool_id))]
    async fn update_pool(&mut self, config: PoolConfig) -> LbResult<()> {
        self.store.update_pool(config)?;
        self.sync().await
    }

    #[instrument(skip(self))]
    async fn delete_pool(&mut self, pool_id: &str) -> LbResult<()> {
        self.store.delete_pool(pool_id)?;
        self.sync().await
    }

    #[instrument(skip(self, member), fields(member_id = %member.id))]
    async fn create_member(&mut self, pool_id: &str, member: Member) -> LbResult<()> {
        self.store.add_member(pool_id, member)?;
        self.sync().await
    }

    #[instrument(skip(self, member), fields(member_id = %member.id))]
    async fn update_member(&mut self, pool_id: &str, member: Member) -> LbResult<()> {
        self.store.update_member(pool_id, member)?;
        self.sync().await
    }

    #[instrument(skip(self))]
    async fn delete_member(&mut self, pool_id: &str, member_id: &str) -> LbResult<()> {
        self.store.remove_member(pool_id, member_id)?;
        self.sync().await
    }

    #[instrument(skip(self, vip), fields(vip_id = %vip.id))]
    async fn create_vip(&mut self, pool_id: &str, vip: Vip) -> LbResult<()> {
        self.store.set_vip(pool_id, vip)?;
        self.sync().await
    }

    #[instrument(skip(self, vip), fields(vip_id = %vip.id))]
    async fn update_vip(&mut self, pool_id: &str, vip: Vip) -> LbResult<()> {
        self.store.update_vip(pool_id, vip)?;
        self.sync().await
    }

    #[instrument(skip(self))]
    async fn delete_vip(&mut self, pool_id: &str, vip_id: &str) -> LbResult<()> {
        self.store.clear_vip(pool_id, vip_id)?;
        self.sync().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};
    use zlb_policy::BalancingMethod;

    fn test_driver() -> (TempDir, ZorpDriver) {
        let dir = tempdir().unwrap();
        let store = XmlStore::create(dir.path().join("policy.xml")).unwrap();
        let generator = PolicyGenerator::new(
            dir.path().join("policy.py"),
            dir.path().join("instances.conf"),
        );
        let driver = ZorpDriver::new(store, generator).with_mock_mode();
        (dir, driver)
    }

    fn pool_config(id: &str) -> PoolConfig {
        PoolConfig {
            pool_id: id.to_string(),
            name: "web".to_string(),
            subnet: "10.1.0.0/24".to_string(),
            protocol: "TCP".to_string(),
            balancing_method: BalancingMethod::RoundRobin,
            description: String::new(),
        }
    }

    fn vip(id: &str) -> Vip {
        Vip {
            id: id.to_string(),
            name: "front".to_string(),
            address: "192.168.0.5".to_string(),
            protocol: "TCP".to_string(),
            protocol_port: 80,
            connection_limit: -1,
            session_persistence: "SOURCE_IP".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_pool_regenerates_and_restarts() {
        let (dir, mut driver) = test_driver();

        driver.create_pool(pool_config("pool-1")).await.unwrap();

        let policy = fs::read_to_string(dir.path().join("policy.py")).unwrap();
        assert!(policy.contains("def instance_pool_1():"));

        let instances = fs::read_to_string(dir.path().join("instances.conf")).unwrap();
        assert!(instances.contains("instance_pool_1 --threads 1000"));

        let cmds = driver.captured_commands();
        assert_eq!(cmds, ["/usr/bin/sudo /usr/sbin/zorpctl restart"]);
    }

    #[tokio::test]
    async fn test_full_pool_renders_service_and_dispatcher() {
        let (dir, mut driver) = test_driver();

        driver.create_pool(pool_config("pool-1")).await.unwrap();
        driver
            .create_member("pool-1", Member::new("m-1", "10.1.0.10", 8080))
            .await
            .unwrap();
        driver.create_vip("pool-1", vip("v-1")).await.unwrap();

        let policy = fs::read_to_string(dir.path().join("policy.py")).unwrap();
        assert!(policy.contains("Service(name='pool-1'"));
        assert!(policy.contains("SockAddrInet('10.1.0.10',8080)"));
        assert!(policy.contains("service='pool-1', transparent=FALSE"));

        // One restart per change
        assert_eq!(driver.captured_commands().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_pool_clears_artifacts() {
        let (dir, mut driver) = test_driver();

        driver.create_pool(pool_config("pool-1")).await.unwrap();
        driver.delete_pool("pool-1").await.unwrap();

        let policy = fs::read_to_string(dir.path().join("policy.py")).unwrap();
        assert!(!policy.contains("def instance_"));

        let instances = fs::read_to_string(dir.path().join("instances.conf")).unwrap();
        assert!(instances.is_empty());
    }

    #[tokio::test]
    async fn test_restart_disabled_skips_shell() {
        let (dir, mut driver) = test_driver();
        driver = driver.with_restart(false);

        driver.create_pool(pool_config("pool-1")).await.unwrap();

        assert!(driver.captured_commands().is_empty());
        // Artifacts are still regenerated.
        assert!(dir.path().join("policy.py").exists());
    }

    #[tokio::test]
    async fn test_failed_store_op_does_not_restart() {
        let (_dir, mut driver) = test_driver();

        let err = driver.delete_pool("missing").await;
        assert!(err.is_err());
        assert!(driver.captured_commands().is_empty());
    }

    #[tokio::test]
    async fn test_health_monitor_stubs_are_noops() {
        let (_dir, mut driver) = test_driver();
        driver.create_pool(pool_config("pool-1")).await.unwrap();

        driver.create_health_monitor("pool-1").await.unwrap();
        driver.update_health_monitor("pool-1").await.unwrap();
        driver.delete_health_monitor("pool-1").await.unwrap();
        assert_eq!(
            driver.pool_stats("pool-1").await.unwrap(),
            PoolStats::default()
        );

        // Only the pool creation restarted the proxy.
        assert_eq!(driver.captured_commands().len(), 1);
    }

    #[test]
    fn test_driver_name() {
        let (_dir, driver) = test_driver();
        assert_eq!(driver.name(), "zorp");
    }
}
