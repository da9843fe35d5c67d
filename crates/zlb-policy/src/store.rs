//! XML state store for load-balancer objects.
//!
//! The store keeps the full pool tree in memory and rewrites the whole
//! state file after every mutation (read XML, mutate, rewrite). This is
//! deliberately simple: the driver is single-threaded and the file is
//! the only source of truth between runs.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use zlb_common::{LbError, LbResult};

use crate::model::{Member, Pool, PolicyState, PoolConfig, Vip};

/// Persistent store over the XML state file.
#[derive(Debug)]
pub struct XmlStore {
    path: PathBuf,
    state: PolicyState,
}

impl XmlStore {
    /// Opens an existing state file.
    pub fn open(path: impl Into<PathBuf>) -> LbResult<Self> {
        let path = path.into();
        let text = fs::read_to_string(&path).map_err(|e| LbError::io(&path, e))?;
        let state: PolicyState =
            quick_xml::de::from_str(&text).map_err(|e| LbError::xml(&path, e.to_string()))?;
        debug!(path = %path.display(), pools = state.pools.len(), "Opened state file");
        Ok(Self { path, state })
    }

    /// Creates a new empty state file, overwriting any existing one.
    pub fn create(path: impl Into<PathBuf>) -> LbResult<Self> {
        let store = Self {
            path: path.into(),
            state: PolicyState::default(),
        };
        store.flush()?;
        info!(path = %store.path.display(), "Created empty state file");
        Ok(store)
    }

    /// Opens the state file, creating an empty one if it does not exist.
    pub fn open_or_create(path: impl Into<PathBuf>) -> LbResult<Self> {
        let path = path.into();
        if path.exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Returns the state file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the in-memory state.
    pub fn state(&self) -> &PolicyState {
        &self.state
    }

    /// Returns all pools.
    pub fn pools(&self) -> &[Pool] {
        &self.state.pools
    }

    /// Looks up a pool by id.
    pub fn pool(&self, pool_id: &str) -> LbResult<&Pool> {
        self.state
            .pool(pool_id)
            .ok_or_else(|| LbError::pool_not_found(pool_id))
    }

    fn pool_mut(&mut self, pool_id: &str) -> LbResult<&mut Pool> {
        self.state
            .pool_mut(pool_id)
            .ok_or_else(|| LbError::pool_not_found(pool_id))
    }

    /// Adds a new pool.
    pub fn create_pool(&mut self, config: PoolConfig) -> LbResult<()> {
        if self.state.pool(&config.pool_id).is_some() {
            return Err(LbError::DuplicatePool {
                pool_id: config.pool_id,
            });
        }
        let pool_id = config.pool_id.clone();
        self.state.pools.push(Pool::new(config));
        self.flush()?;
        info!(pool_id = %pool_id, "Created pool");
        Ok(())
    }

    /// Rewrites a pool's attributes, preserving its members and VIP.
    pub fn update_pool(&mut self, config: PoolConfig) -> LbResult<()> {
        let pool = self.pool_mut(&config.pool_id)?;
        let pool_id = config.pool_id.clone();
        pool.apply(config);
        self.flush()?;
        info!(pool_id = %pool_id, "Updated pool");
        Ok(())
    }

    /// Removes a pool and its whole subtree.
    pub fn delete_pool(&mut self, pool_id: &str) -> LbResult<()> {
        let before = self.state.pools.len();
        self.state.pools.retain(|p| p.pool_id != pool_id);
        if self.state.pools.len() == before {
            return Err(LbError::pool_not_found(pool_id));
        }
        self.flush()?;
        info!(pool_id = %pool_id, "Deleted pool");
        Ok(())
    }

    /// Adds a member to a pool.
    pub fn add_member(&mut self, pool_id: &str, member: Member) -> LbResult<()> {
        let pool = self.pool_mut(pool_id)?;
        if pool.member(&member.id).is_some() {
            return Err(LbError::DuplicateMember {
                pool_id: pool_id.to_string(),
                member_id: member.id,
            });
        }
        let member_id = member.id.clone();
        pool.members.push(member);
        self.flush()?;
        info!(pool_id = %pool_id, member_id = %member_id, "Added member");
        Ok(())
    }

    /// Replaces a member's attributes (remove then re-add).
    pub fn update_member(&mut self, pool_id: &str, member: Member) -> LbResult<()> {
        let pool = self.pool_mut(pool_id)?;
        let before = pool.members.len();
        pool.members.retain(|m| m.id != member.id);
        if pool.members.len() == before {
            return Err(LbError::member_not_found(pool_id, &member.id));
        }
        let member_id = member.id.clone();
        pool.members.push(member);
        self.flush()?;
        info!(pool_id = %pool_id, member_id = %member_id, "Updated member");
        Ok(())
    }

    /// Removes a member from a pool.
    pub fn remove_member(&mut self, pool_id: &str, member_id: &str) -> LbResult<()> {
        let pool = self.pool_mut(pool_id)?;
        let before = pool.members.len();
        pool.members.retain(|m| m.id != member_id);
        if pool.members.len() == before {
            return Err(LbError::member_not_found(pool_id, member_id));
        }
        self.flush()?;
        info!(pool_id = %pool_id, member_id = %member_id, "Removed member");
        Ok(())
    }

    /// Attaches a VIP to a pool.
    pub fn set_vip(&mut self, pool_id: &str, vip: Vip) -> LbResult<()> {
        let pool = self.pool_mut(pool_id)?;
        if pool.vip.is_some() {
            return Err(LbError::VipAlreadySet {
                pool_id: pool_id.to_string(),
            });
        }
        let vip_id = vip.id.clone();
        pool.vip = Some(vip);
        self.flush()?;
        info!(pool_id = %pool_id, vip_id = %vip_id, "Set VIP");
        Ok(())
    }

    /// Replaces a pool's VIP (remove then re-add).
    pub fn update_vip(&mut self, pool_id: &str, vip: Vip) -> LbResult<()> {
        let pool = self.pool_mut(pool_id)?;
        match &pool.vip {
            Some(current) if current.id == vip.id => {}
            _ => return Err(LbError::vip_not_found(pool_id, &vip.id)),
        }
        let vip_id = vip.id.clone();
        pool.vip = Some(vip);
        self.flush()?;
        info!(pool_id = %pool_id, vip_id = %vip_id, "Updated VIP");
        Ok(())
    }

    /// Detaches a VIP from a pool.
    pub fn clear_vip(&mut self, pool_id: &str, vip_id: &str) -> LbResult<()> {
        let pool = self.pool_mut(pool_id)?;
        match &pool.vip {
            Some(current) if current.id == vip_id => pool.vip = None,
            _ => return Err(LbError::vip_not_found(pool_id, vip_id)),
        }
        self.flush()?;
        info!(pool_id = %pool_id, vip_id = %vip_id, "Cleared VIP");
        Ok(())
    }

    /// Serializes the full state and rewrites the file.
    fn flush(&self) -> LbResult<()> {
        let mut out = String::new();
        let mut ser = quick_xml::se::Serializer::new(&mut out);
        ser.indent(' ', 2);
        self.state
            .serialize(ser)
            .map_err(|e| LbError::xml(&self.path, e.to_string()))?;
        out.push('\n');
        fs::write(&self.path, out).map_err(|e| LbError::io(&self.path, e))?;
        Ok(())
    }
}
