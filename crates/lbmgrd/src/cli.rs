//! Command line interface for lbmgrd.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use zlb_policy::{BalancingMethod, Member, PoolConfig, Vip};

use crate::commands::{DEFAULT_INSTANCES_FILE, DEFAULT_POLICY_FILE, DEFAULT_STATE_FILE};

/// Zorp load-balancer manager
#[derive(Parser, Debug)]
#[command(name = "lbmgrd")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// XML state file path
    #[arg(long, default_value = DEFAULT_STATE_FILE)]
    pub state_file: PathBuf,

    /// Generated policy script path
    #[arg(long, default_value = DEFAULT_POLICY_FILE)]
    pub policy_file: PathBuf,

    /// Generated instances manifest path
    #[arg(long, default_value = DEFAULT_INSTANCES_FILE)]
    pub instances_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    pub log_level: String,

    /// Regenerate artifacts without restarting the proxy
    #[arg(long)]
    pub no_restart: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty state file
    Init,

    /// Pool operations
    #[command(subcommand)]
    Pool(PoolCommand),

    /// Member operations
    #[command(subcommand)]
    Member(MemberCommand),

    /// VIP operations
    #[command(subcommand)]
    Vip(VipCommand),

    /// Regenerate artifacts from the state file and restart the proxy
    Sync,

    /// Print a rendered artifact to stdout
    Render {
        /// Which artifact to render
        #[arg(value_enum)]
        artifact: Artifact,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Artifact {
    /// The policy script
    Policy,
    /// The instances manifest
    Instances,
}

#[derive(Subcommand, Debug)]
pub enum PoolCommand {
    /// Create a pool
    Create(PoolArgs),
    /// Update a pool's attributes (members and VIP are preserved)
    Update(PoolArgs),
    /// Delete a pool and everything in it
    Delete {
        /// Pool identifier
        #[arg(long)]
        id: String,
    },
}

/// Pool attribute arguments shared by create and update.
#[derive(clap::Args, Debug)]
pub struct PoolArgs {
    /// Pool identifier
    #[arg(long)]
    pub id: String,

    /// Human-readable name
    #[arg(long)]
    pub name: String,

    /// Subnet (CIDR) the pool serves
    #[arg(long)]
    pub subnet: String,

    /// Back-side protocol
    #[arg(long, default_value = "TCP")]
    pub protocol: String,

    /// Balancing method: ROUND_ROBIN, SOURCE_IP or LEAST_CONNECTIONS
    #[arg(long, value_parser = parse_method, default_value = "ROUND_ROBIN")]
    pub method: BalancingMethod,

    /// Free-form description
    #[arg(long, default_value = "")]
    pub description: String,
}

impl From<PoolArgs> for PoolConfig {
    fn from(args: PoolArgs) -> Self {
        PoolConfig {
            pool_id: args.id,
            name: args.name,
            subnet: args.subnet,
            protocol: args.protocol,
            balancing_method: args.method,
            description: args.description,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum MemberCommand {
    /// Add a member to a pool
    Add(MemberArgs),
    /// Replace a member's attributes
    Update(MemberArgs),
    /// Remove a member from a pool
    Remove {
        /// Parent pool identifier
        #[arg(long)]
        pool: String,
        /// Member identifier
        #[arg(long)]
        id: String,
    },
}

/// Member attribute arguments shared by add and update.
#[derive(clap::Args, Debug)]
pub struct MemberArgs {
    /// Parent pool identifier
    #[arg(long)]
    pub pool: String,

    /// Member identifier
    #[arg(long)]
    pub id: String,

    /// Backend IP address
    #[arg(long)]
    pub address: String,

    /// Backend port
    #[arg(long)]
    pub port: u16,
}

impl From<&MemberArgs> for Member {
    fn from(args: &MemberArgs) -> Self {
        Member::new(&args.id, &args.address, args.port)
    }
}

#[derive(Subcommand, Debug)]
pub enum VipCommand {
    /// Attach a VIP to a pool
    Set(VipArgs),
    /// Replace a pool's VIP
    Update(VipArgs),
    /// Detach a VIP from a pool
    Clear {
        /// Parent pool identifier
        #[arg(long)]
        pool: String,
        /// VIP identifier
        #[arg(long)]
        id: String,
    },
}

/// VIP attribute arguments shared by set and update.
#[derive(clap::Args, Debug)]
pub struct VipArgs {
    /// Parent pool identifier
    #[arg(long)]
    pub pool: String,

    /// VIP identifier
    #[arg(long)]
    pub id: String,

    /// Human-readable name
    #[arg(long)]
    pub name: String,

    /// Address the dispatcher binds to
    #[arg(long)]
    pub address: String,

    /// Front-side protocol
    #[arg(long, default_value = "TCP")]
    pub protocol: String,

    /// Front-side port
    #[arg(long)]
    pub port: u16,

    /// Maximum connection count (-1 = unlimited)
    #[arg(long, default_value = "-1")]
    pub connection_limit: i32,

    /// Session persistence type
    #[arg(long, default_value = "SOURCE_IP")]
    pub session_persistence: String,
}

impl From<&VipArgs> for Vip {
    fn from(args: &VipArgs) -> Self {
        Vip {
            id: args.id.clone(),
            name: args.name.clone(),
            address: args.address.clone(),
            protocol: args.protocol.clone(),
            protocol_port: args.port,
            connection_limit: args.connection_limit,
            session_persistence: args.session_persistence.clone(),
        }
    }
}

fn parse_method(s: &str) -> Result<BalancingMethod, String> {
    s.parse().map_err(|e: zlb_common::LbError| e.to_string())
}
