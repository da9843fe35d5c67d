//! Renders the load-balancer state into the Zorp policy script.
//!
//! The output is a Python module the proxy loads: one `instance_*`
//! function per pool, containing a `Service` (when the pool has
//! members) and a `Dispatcher` (when the pool has a VIP). The rendered
//! text is byte-compatible with the policy format the proxy expects.

use crate::model::{Member, Pool, PolicyState, Vip};

/// Fixed import header of every generated policy script.
const POLICY_IMPORTS: &str = "from Zorp.Core import  *
from Zorp.Plug import  *
from Zorp.Proxy import  *

from zones import *";

/// Returns the instance function name for a pool.
///
/// Pool ids are UUID-like and may contain `-`, which is not valid in a
/// Python identifier.
pub fn instance_name(pool_id: &str) -> String {
    pool_id.replace('-', "_")
}

/// Renders the complete policy script for the given state.
pub fn render_policy(state: &PolicyState) -> String {
    let mut out = String::new();
    out.push_str(POLICY_IMPORTS);
    out.push_str("\n\n");

    for pool in &state.pools {
        out.push_str(&format!(
            "\n\ndef instance_{}():\n\n",
            instance_name(&pool.pool_id)
        ));
        match (render_service(pool), render_dispatcher(pool)) {
            (Some(service), Some(dispatcher)) => {
                out.push_str(&format!("   {}\n\n", service));
                out.push_str(&format!("   {}\n\n", dispatcher));
            }
            // Without both a backend and a frontend there is nothing
            // for the instance to do.
            _ => out.push_str("   pass\n\n"),
        }
    }

    out
}

/// Renders the `Service(...)` line for a pool, or `None` when the pool
/// has no members.
pub fn render_service(pool: &Pool) -> Option<String> {
    if pool.members.is_empty() {
        return None;
    }
    Some(format!(
        "Service(name='{}', {}, chainer={}(protocol=ZD_PROTO_AUTO, timeout_connect=30, \
         timeout_state=60), proxy_class=PlugProxy, max_instances=0, max_sessions=0, \
         keepalive=Z_KEEPALIVE_NONE)",
        pool.pool_id,
        render_router(&pool.members),
        pool.balancing_method.chainer(),
    ))
}

/// Renders the `Dispatcher(...)` line for a pool, or `None` when the
/// pool has no VIP.
pub fn render_dispatcher(pool: &Pool) -> Option<String> {
    let vip = pool.vip.as_ref()?;
    Some(format!(
        "Dispatcher({}, service='{}', transparent=FALSE, backlog=255)",
        render_bindto(vip),
        pool.pool_id,
    ))
}

fn render_router(members: &[Member]) -> String {
    let mut ret = String::from("router=DirectedRouter(dest_addr=(");
    for member in members {
        ret.push_str(&format!("{}, ", render_member_sockaddr(member)));
    }
    ret.push_str("))");
    ret
}

fn render_member_sockaddr(member: &Member) -> String {
    format!(
        "SockAddrInet('{}',{})",
        member.address, member.protocol_port
    )
}

fn render_bindto(vip: &Vip) -> String {
    format!(
        "bindto=DBSockAddr(protocol=ZD_PROTO_TCP, sa=SockAddrInet('{}', {}))",
        vip.address, vip.protocol_port
    )
}
