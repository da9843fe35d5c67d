//! zlb-policy - state store and config generators for the Zorp LBaaS driver.
//!
//! Persists load-balancer objects (pools, members, VIPs) to an XML
//! state file and renders them into the proxy's configuration
//! artifacts: the `policy.py` script and the `instances.conf` manifest.

pub mod generator;
pub mod instances;
pub mod model;
pub mod policy;
pub mod store;

pub use generator::PolicyGenerator;
pub use model::{BalancingMethod, Member, Pool, PolicyState, PoolConfig, Vip};
pub use store::XmlStore;
