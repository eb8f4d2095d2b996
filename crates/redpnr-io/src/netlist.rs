use std::path::Path;

use redpnr_core::Netlist;
use redpnr_route::Routing;

use crate::error::Result;
use crate::json::read_json;

pub fn load_netlist(path: &Path) -> Result<Netlist> {
    let netlist: Netlist = read_json(path)?;
    log::info!(
        "Netlist {}: {} instances, {} nets",
        path.display(),
        netlist.instance_count(),
        netlist.nets.len()
    );
    Ok(netlist)
}

/// Routing request: net name → segments with pin coordinates and waypoints.
pub fn load_routing(path: &Path) -> Result<Routing> {
    let routing: Routing = read_json(path)?;
    log::info!(
        "Routing {}: {} nets, {} segments",
        path.display(),
        routing.len(),
        routing.values().map(Vec::len).sum::<usize>()
    );
    Ok(routing)
}
