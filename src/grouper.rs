//! Port Grouper: partitions a `Module`'s ports into candidate bus
//! groups by inferred common prefix, routing clock/reset ports to their own
//! single-port groups and leaving unclassifiable ports in a residual set.

use std::collections::BTreeMap;

use crate::model::{Module, Port};
use crate::text::{candidate_prefixes, tokenize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Bus,
    Clock,
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortGroup {
    /// The sanitized, normalized common prefix identifying this group (e.g.
    /// `M_AXI`); for clock/reset groups, the lone port's own name.
    pub name: String,
    pub kind: GroupKind,
    pub ports: Vec<Port>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grouping {
    pub groups: Vec<PortGroup>,
    pub residual: Vec<Port>,
}

pub fn group_ports(module: &Module) -> Grouping {
    let mut groups = Vec::new();
    let mut residual = Vec::new();
    let mut remaining = Vec::new();

    for port in &module.ports {
        // The matcher never considers interface-reference ports; routing
        // them straight to the residual keeps port conservation intact
        // without the grouper needing its own notion of "ignored".
        if port.is_interface_ref {
            residual.push(port.clone());
            continue;
        }
        match classify_single(&port.name) {
            Some(kind @ (GroupKind::Clock | GroupKind::Reset)) => groups.push(PortGroup {
                name: port.name.clone(),
                kind,
                ports: vec![port.clone()],
            }),
            _ => remaining.push(port.clone()),
        }
    }

    let (bus_groups, leftover) = group_by_longest_common_prefix(remaining);
    for (prefix, ports) in bus_groups {
        groups.push(PortGroup {
            name: prefix,
            kind: GroupKind::Bus,
            ports,
        });
    }
    residual.extend(leftover);

    Grouping { groups, residual }
}

fn classify_single(name: &str) -> Option<GroupKind> {
    match name.to_ascii_lowercase().as_str() {
        "clk" | "clock" | "aclk" => Some(GroupKind::Clock),
        "rst" | "rst_n" | "reset" | "aresetn" => Some(GroupKind::Reset),
        _ => None,
    }
}

struct Entry {
    port: Port,
    prefixes: Vec<String>,
}

/// Greedily clusters ports under the longest common prefix shared by at
/// least two of them, repeating at shorter prefix lengths once the longer
/// ones are exhausted. This is what splits `AXI_M`/`AXI_S` into two groups
/// before the shared one-token `AXI` prefix ever gets a chance to merge them
/// (the longest-common-prefix tie-break).
fn group_by_longest_common_prefix(ports: Vec<Port>) -> (Vec<(String, Vec<Port>)>, Vec<Port>) {
    let entries: Vec<Entry> = ports
        .into_iter()
        .map(|port| {
            let tokens = tokenize(&port.name);
            let prefixes = candidate_prefixes(&tokens);
            Entry { port, prefixes }
        })
        .collect();
    let mut active = vec![true; entries.len()];
    let mut groups: Vec<(String, Vec<Port>)> = Vec::new();

    loop {
        let max_len = entries
            .iter()
            .enumerate()
            .filter(|(i, _)| active[*i])
            .map(|(_, e)| e.prefixes.len())
            .max()
            .unwrap_or(0);
        if max_len == 0 {
            break;
        }

        let mut picked: Option<(String, Vec<usize>)> = None;
        for len in (1..=max_len).rev() {
            let mut buckets: BTreeMap<String, Vec<usize>> = BTreeMap::new();
            for (i, e) in entries.iter().enumerate() {
                if !active[i] {
                    continue;
                }
                if let Some(prefix) = e.prefixes.get(len - 1) {
                    buckets.entry(prefix.clone()).or_default().push(i);
                }
            }
            // Longest-common-prefix-first favors a real two-token prefix
            // like `M_AXI` over the bare `M`, while still letting a custom
            // single-token protocol (neither AXI/APB/... nor two tokens
            // wide, e.g. `AMB_*`) group by its own shared root instead of
            // falling through to the residual — `amb_data`/`amb_valid`/
            // `amb_ready` share only `AMB`, which isn't in
            // `WELL_KNOWN_BUS_ROOTS`. See DESIGN.md for the full rationale.
            let mut eligible: Vec<(String, Vec<usize>)> =
                buckets.into_iter().filter(|(_, v)| v.len() >= 2).collect();
            // Among same-length ties, a recognized bus root anchors before
            // an arbitrary shared token; `BTreeMap` iteration order already
            // makes the fallback deterministic.
            eligible.sort_by_key(|(prefix, _)| !crate::text::WELL_KNOWN_BUS_ROOTS.contains(&prefix.as_str()));
            if let Some((prefix, idxs)) = eligible.into_iter().next() {
                picked = Some((prefix, idxs));
                break;
            }
        }

        match picked {
            Some((prefix, idxs)) => {
                for &i in &idxs {
                    active[i] = false;
                }
                let group_ports = idxs.iter().map(|&i| entries[i].port.clone()).collect();
                groups.push((prefix, group_ports));
            }
            None => break,
        }
    }

    let residual = entries
        .into_iter()
        .enumerate()
        .filter(|(i, _)| active[*i])
        .map(|(_, e)| e.port)
        .collect();

    (groups, residual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Direction;
    use std::path::PathBuf;

    fn port(name: &str, dir: Direction) -> Port {
        Port::new(name, dir)
    }

    fn module_with(ports: Vec<Port>) -> Module {
        Module {
            name: "top".into(),
            parameters: vec![],
            ports,
            source_file: PathBuf::from("top.sv"),
        }
    }

    #[test]
    fn groups_common_axi_prefix_and_routes_clock_reset() {
        let m = module_with(vec![
            port("M_AXI_AWADDR", Direction::Out),
            port("M_AXI_AWVALID", Direction::Out),
            port("M_AXI_AWREADY", Direction::In),
            port("clk", Direction::In),
            port("rst_n", Direction::In),
            port("start", Direction::In),
        ]);
        let grouping = group_ports(&m);
        let bus_group = grouping
            .groups
            .iter()
            .find(|g| g.kind == GroupKind::Bus)
            .expect("one bus group");
        assert_eq!(bus_group.name, "M_AXI");
        assert_eq!(bus_group.ports.len(), 3);
        assert!(grouping.groups.iter().any(|g| g.kind == GroupKind::Clock));
        assert!(grouping.groups.iter().any(|g| g.kind == GroupKind::Reset));
        assert_eq!(grouping.residual.len(), 1);
        assert_eq!(grouping.residual[0].name, "start");
    }

    #[test]
    fn splits_disjoint_groups_sharing_a_one_token_prefix() {
        let m = module_with(vec![
            port("AXI_M_AWADDR", Direction::Out),
            port("AXI_M_AWVALID", Direction::Out),
            port("AXI_S_AWADDR", Direction::In),
            port("AXI_S_AWVALID", Direction::In),
        ]);
        let grouping = group_ports(&m);
        let names: Vec<&str> = grouping
            .groups
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert!(names.contains(&"AXI_M"));
        assert!(names.contains(&"AXI_S"));
        assert!(grouping.residual.is_empty());
    }

    #[test]
    fn lone_port_with_no_shared_prefix_is_residual() {
        let m = module_with(vec![port("irq", Direction::Out)]);
        let grouping = group_ports(&m);
        assert!(grouping.groups.is_empty());
        assert_eq!(grouping.residual.len(), 1);
    }
}
