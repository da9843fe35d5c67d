//! lbmgrd - Load-Balancer Manager for the Zorp proxy
//!
//! Entry point: parses the CLI, applies the requested change to the
//! XML state file, regenerates the configuration artifacts and
//! restarts the proxy.

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use zlb_lbmgrd::cli::{Args, Artifact, Command, MemberCommand, PoolCommand, VipCommand};
use zlb_lbmgrd::driver::{LoadBalancerDriver, ZorpDriver};
use zlb_policy::{Member, PolicyGenerator, Vip, XmlStore};

/// Initializes tracing/logging subsystem
fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    if let Command::Init = args.command {
        XmlStore::create(&args.state_file)
            .with_context(|| format!("creating state file {}", args.state_file.display()))?;
        info!("Initialized state file {}", args.state_file.display());
        return Ok(());
    }

    let store = XmlStore::open(&args.state_file)
        .with_context(|| format!("opening state file {}", args.state_file.display()))?;
    let generator = PolicyGenerator::new(&args.policy_file, &args.instances_file);

    if let Command::Render { artifact } = args.command {
        let text = match artifact {
            Artifact::Policy => generator.render_policy(store.state()),
            Artifact::Instances => generator.render_instances(store.state()),
        };
        print!("{}", text);
        return Ok(());
    }

    let mut driver = ZorpDriver::new(store, generator).with_restart(!args.no_restart);

    match args.command {
        Command::Init | Command::Render { .. } => unreachable!("handled above"),

        Command::Sync => driver.sync().await?,

        Command::Pool(cmd) => match cmd {
            PoolCommand::Create(pool) => driver.create_pool(pool.into()).await?,
            PoolCommand::Update(pool) => driver.update_pool(pool.into()).await?,
            PoolCommand::Delete { id } => driver.delete_pool(&id).await?,
        },

        Command::Member(cmd) => match cmd {
            MemberCommand::Add(member) => {
                let record = Member::from(&member);
                driver.create_member(&member.pool, record).await?
            }
            MemberCommand::Update(member) => {
                let record = Member::from(&member);
                driver.update_member(&member.pool, record).await?
            }
            MemberCommand::Remove { pool, id } => driver.delete_member(&pool, &id).await?,
        },

        Command::Vip(cmd) => match cmd {
            VipCommand::Set(vip) => {
                let record = Vip::from(&vip);
                driver.create_vip(&vip.pool, record).await?
            }
            VipCommand::Update(vip) => {
                let record = Vip::from(&vip);
                driver.update_vip(&vip.pool, record).await?
            }
            VipCommand::Clear { pool, id } => driver.delete_vip(&pool, &id).await?,
        },
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("lbmgrd failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
