//! Data model for the load-balancer state file.
//!
//! Pools, members and VIPs are flat attribute records mirrored 1:1
//! between memory and XML attributes. The root `<policy>` element holds
//! `<pool>` children; each pool holds `<member>` children and at most
//! one `<vip>`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use zlb_common::LbError;

/// Balancing method for a pool, mapped onto a Zorp chainer class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalancingMethod {
    /// Round-robin over the pool members.
    #[serde(rename = "ROUND_ROBIN")]
    RoundRobin,
    /// Stick sessions to members by source IP.
    #[serde(rename = "SOURCE_IP")]
    SourceIp,
    /// Prefer the member with the fewest connections.
    #[serde(rename = "LEAST_CONNECTIONS")]
    LeastConnections,
}

impl BalancingMethod {
    /// Returns the wire string used in the state file.
    pub fn as_str(&self) -> &'static str {
        match self {
            BalancingMethod::RoundRobin => "ROUND_ROBIN",
            BalancingMethod::SourceIp => "SOURCE_IP",
            BalancingMethod::LeastConnections => "LEAST_CONNECTIONS",
        }
    }

    /// Returns the Zorp chainer class implementing this method.
    pub fn chainer(&self) -> &'static str {
        match self {
            BalancingMethod::RoundRobin => "RoundRobinChainer",
            BalancingMethod::SourceIp => "SourceIPBasedChainer",
            BalancingMethod::LeastConnections => "LeastConnectionChainer",
        }
    }
}

impl FromStr for BalancingMethod {
    type Err = LbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROUND_ROBIN" => Ok(BalancingMethod::RoundRobin),
            "SOURCE_IP" => Ok(BalancingMethod::SourceIp),
            "LEAST_CONNECTIONS" => Ok(BalancingMethod::LeastConnections),
            other => Err(LbError::invalid_config(
                "balancing_method",
                format!("unknown method '{}'", other),
            )),
        }
    }
}

impl fmt::Display for BalancingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A backend endpoint behind a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member identifier, unique within the parent pool.
    #[serde(rename = "@id")]
    pub id: String,
    /// Backend IP address.
    #[serde(rename = "@address")]
    pub address: String,
    /// Backend port.
    #[serde(rename = "@protocol_port")]
    pub protocol_port: u16,
}

impl Member {
    /// Creates a new member record.
    pub fn new(id: impl Into<String>, address: impl Into<String>, protocol_port: u16) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            protocol_port,
        }
    }
}

/// A virtual IP fronting a load-balanced pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vip {
    /// VIP identifier.
    #[serde(rename = "@id")]
    pub id: String,
    /// Human-readable name.
    #[serde(rename = "@name")]
    pub name: String,
    /// Address the dispatcher binds to.
    #[serde(rename = "@address")]
    pub address: String,
    /// Front-side protocol (e.g. "TCP", "HTTP").
    #[serde(rename = "@protocol")]
    pub protocol: String,
    /// Front-side port the dispatcher listens on.
    #[serde(rename = "@protocol_port")]
    pub protocol_port: u16,
    /// Maximum connection count (-1 = unlimited).
    #[serde(rename = "@connection_limit")]
    pub connection_limit: i32,
    /// Session persistence type (e.g. "SOURCE_IP").
    #[serde(rename = "@session_persistence")]
    pub session_persistence: String,
}

/// Pool attributes as supplied by a create or update call.
///
/// Members and VIP are managed by their own operations; a pool update
/// rewrites only these attributes and preserves the subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Pool identifier.
    pub pool_id: String,
    /// Human-readable name.
    pub name: String,
    /// Subnet (CIDR) the pool serves.
    pub subnet: String,
    /// Back-side protocol.
    pub protocol: String,
    /// Balancing method.
    pub balancing_method: BalancingMethod,
    /// Free-form description.
    pub description: String,
}

/// A named group of backend members with a balancing method, plus an
/// optional VIP fronting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Pool identifier, unique within the state file.
    #[serde(rename = "@pool_id")]
    pub pool_id: String,
    /// Human-readable name.
    #[serde(rename = "@name")]
    pub name: String,
    /// Subnet (CIDR) the pool serves.
    #[serde(rename = "@subnet")]
    pub subnet: String,
    /// Back-side protocol.
    #[serde(rename = "@protocol")]
    pub protocol: String,
    /// Balancing method.
    #[serde(rename = "@balancing_method")]
    pub balancing_method: BalancingMethod,
    /// Free-form description.
    #[serde(rename = "@description", default)]
    pub description: String,
    /// Backend members.
    #[serde(rename = "member", default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,
    /// Optional VIP fronting the pool. The proxy dispatches only the
    /// first VIP of a pool, so the model holds at most one.
    #[serde(rename = "vip", default, skip_serializing_if = "Option::is_none")]
    pub vip: Option<Vip>,
}

impl Pool {
    /// Creates an empty pool from its attribute record.
    pub fn new(config: PoolConfig) -> Self {
        Self {
            pool_id: config.pool_id,
            name: config.name,
            subnet: config.subnet,
            protocol: config.protocol,
            balancing_method: config.balancing_method,
            description: config.description,
            members: Vec::new(),
            vip: None,
        }
    }

    /// Rewrites the pool attributes in place, preserving members and VIP.
    pub fn apply(&mut self, config: PoolConfig) {
        self.pool_id = config.pool_id;
        self.name = config.name;
        self.subnet = config.subnet;
        self.protocol = config.protocol;
        self.balancing_method = config.balancing_method;
        self.description = config.description;
    }

    /// Looks up a member by id.
    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == member_id)
    }
}

/// The root of the state file: all configured pools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "policy")]
pub struct PolicyState {
    /// Configured pools.
    #[serde(rename = "pool", default, skip_serializing_if = "Vec::is_empty")]
    pub pools: Vec<Pool>,
}

impl PolicyState {
    /// Looks up a pool by id.
    pub fn pool(&self, pool_id: &str) -> Option<&Pool> {
        self.pools.iter().find(|p| p.pool_id == pool_id)
    }

    /// Looks up a pool by id, mutably.
    pub fn pool_mut(&mut self, pool_id: &str) -> Option<&mut Pool> {
        self.pools.iter_mut().find(|p| p.pool_id == pool_id)
    }
}
