//! Protocol Matcher: scores each port group against every
//! catalog entry as both master and slave, selects the best candidate above
//! threshold, detects near-ties, and emits `BusInterface` assignments plus
//! the leftover unmapped ports. The densest logic in this crate.

use std::collections::HashSet;

use crate::grouper::{GroupKind, PortGroup};
use crate::library::Catalog;
use crate::model::{
    AbstractionDefinition, AddressSpace, BusDefinition, BusInterface, BusParameter, LogicalPort,
    MemoryMap, Module, Port, PortMap, Presence, Role, Side,
};
use crate::report::{Diagnostic, Report};
use crate::text::{candidate_suffixes, tokenize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherConfig {
    pub threshold: f32,
    pub w_required: f32,
    pub w_optional: f32,
    pub w_penalty: f32,
    pub ambiguity_margin: f32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig {
            threshold: 0.6,
            w_required: 1.0,
            w_optional: 0.3,
            w_penalty: 0.5,
            ambiguity_margin: 0.05,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    pub interfaces: Vec<BusInterface>,
    pub unmapped: Vec<Port>,
}

pub fn match_groups(
    groups: &[PortGroup],
    catalog: &Catalog,
    module: &Module,
    config: &MatcherConfig,
    report: &mut Report,
) -> MatchOutcome {
    let mut outcome = MatchOutcome::default();

    for group in groups {
        match group.kind {
            GroupKind::Clock => match_clock_or_reset(group, catalog, true, &mut outcome, report),
            GroupKind::Reset => match_clock_or_reset(group, catalog, false, &mut outcome, report),
            GroupKind::Bus => match_bus_group(group, catalog, module, config, &mut outcome, report),
        }
    }

    outcome
}

fn match_clock_or_reset(
    group: &PortGroup,
    catalog: &Catalog,
    is_clock: bool,
    outcome: &mut MatchOutcome,
    report: &mut Report,
) {
    let port = group
        .ports
        .first()
        .expect("clock/reset groups always carry exactly one port");

    let bus = catalog
        .bus_definitions()
        .find(|b| if is_clock { b.is_clock() } else { b.is_reset() });
    let abs = bus.and_then(|b| {
        catalog
            .abstraction_definitions()
            .find(|a| a.bus_type == b.vlnv)
    });

    match (bus, abs) {
        (Some(bus), Some(abs)) => {
            let mut parameters = Vec::new();
            if is_clock {
                parameters.push(BusParameter {
                    name: "isClock".into(),
                    value: crate::model::Expr::new("true"),
                });
            } else {
                parameters.push(BusParameter {
                    name: "isReset".into(),
                    value: crate::model::Expr::new("true"),
                });
                let polarity = if port.name.to_ascii_lowercase().ends_with('n') {
                    "ACTIVE_LOW"
                } else {
                    "ACTIVE_HIGH"
                };
                parameters.push(BusParameter {
                    name: "POLARITY".into(),
                    value: crate::model::Expr::new(polarity),
                });
            }

            let port_maps = abs
                .logical_ports
                .first()
                .map(|lp| {
                    vec![PortMap {
                        logical_name: lp.name.clone(),
                        physical_name: port.name.clone(),
                        bit_slice: None,
                    }]
                })
                .unwrap_or_default();

            outcome.interfaces.push(BusInterface {
                name: group.name.clone(),
                bus_type: bus.vlnv.clone(),
                abstraction_type: abs.vlnv.clone(),
                role: Role::System,
                port_maps,
                memory_map: None,
                address_space: None,
                parameters,
            });
        }
        _ => {
            report.push(Diagnostic::NoMatch {
                group: group.name.clone(),
            });
            outcome.unmapped.extend(group.ports.clone());
        }
    }
}

struct Alignment {
    port_maps: Vec<PortMap>,
    direction_mismatches: u32,
    width_mismatches: u32,
    required_total: u32,
    optional_total: u32,
    required_matched: u32,
    optional_matched: u32,
}

struct Candidate<'a> {
    abs: &'a AbstractionDefinition,
    bus: &'a BusDefinition,
    side: Side,
    score: f32,
    alignment: Alignment,
}

fn match_bus_group(
    group: &PortGroup,
    catalog: &Catalog,
    module: &Module,
    config: &MatcherConfig,
    outcome: &mut MatchOutcome,
    report: &mut Report,
) {
    let mut best: Option<Candidate> = None;
    let mut second_score: Option<f32> = None;

    for (abs, bus) in catalog.abstractions_with_bus() {
        for side in [Side::Master, Side::Slave] {
            let alignment = align(&group.ports, abs, side);
            let denom =
                config.w_required * alignment.required_total as f32 + config.w_optional * alignment.optional_total as f32;
            if denom <= 0.0 {
                continue;
            }
            let raw = config.w_required * alignment.required_matched as f32
                + config.w_optional * alignment.optional_matched as f32
                - config.w_penalty * (alignment.direction_mismatches + alignment.width_mismatches) as f32;
            let score = (raw / denom).max(0.0);
            let candidate = Candidate { abs, bus, side, score, alignment };

            best = match best {
                None => Some(candidate),
                Some(current) if candidate.score > current.score => {
                    second_score = Some(current.score);
                    Some(candidate)
                }
                Some(current) => {
                    if second_score.map_or(true, |s| candidate.score > s) {
                        second_score = Some(candidate.score);
                    }
                    Some(current)
                }
            };
        }
    }

    match best {
        Some(candidate) if candidate.score >= config.threshold && candidate.alignment.required_matched >= 1 => {
            if let Some(second) = second_score {
                let margin = candidate.score - second;
                if margin <= config.ambiguity_margin {
                    report.push(Diagnostic::AmbiguousMatch {
                        group: group.name.clone(),
                        winner: format!("{} ({:?})", candidate.bus.vlnv, candidate.side),
                        runner_up: format!("score {:.3}", second),
                        margin,
                    });
                }
            }

            let mapped: HashSet<&str> = candidate
                .alignment
                .port_maps
                .iter()
                .map(|pm| pm.physical_name.as_str())
                .collect();
            for port in &group.ports {
                if !mapped.contains(port.name.as_str()) {
                    outcome.unmapped.push(port.clone());
                }
            }

            let role = match candidate.side {
                Side::Master => Role::Master,
                Side::Slave => Role::Slave,
            };
            let parameters = propagate_bus_parameters(candidate.bus, module);
            let (memory_map, address_space) =
                role_attachments(candidate.bus, candidate.side, &group.name, module);

            outcome.interfaces.push(BusInterface {
                name: group.name.clone(),
                bus_type: candidate.bus.vlnv.clone(),
                abstraction_type: candidate.abs.vlnv.clone(),
                role,
                port_maps: candidate.alignment.port_maps,
                memory_map,
                address_space,
                parameters,
            });
        }
        _ => {
            report.push(Diagnostic::NoMatch {
                group: group.name.clone(),
            });
            outcome.unmapped.extend(group.ports.clone());
        }
    }
}

/// Aligns each eligible logical port of `abs` on `side` to an unused physical
/// port in `group`, scoring direction/width compatibility as it goes (spec
/// §4.5). Logical ports with `Illegal` presence, or absent on this side
/// entirely, are skipped rather than counted.
fn align(group: &[Port], abs: &AbstractionDefinition, side: Side) -> Alignment {
    let mut used = vec![false; group.len()];
    let mut port_maps = Vec::new();
    let mut direction_mismatches = 0;
    let mut width_mismatches = 0;
    let mut required_total = 0;
    let mut optional_total = 0;
    let mut required_matched = 0;
    let mut optional_matched = 0;

    for logical in &abs.logical_ports {
        let Some(desc) = eligible_descriptor(logical, side) else {
            continue;
        };
        match desc.presence {
            Presence::Required => required_total += 1,
            Presence::Optional => optional_total += 1,
            Presence::Illegal => unreachable!("filtered by eligible_descriptor"),
        }

        let target = logical.name.to_ascii_uppercase();
        let mut candidates: Vec<(usize, usize, usize)> = Vec::new();
        for (idx, port) in group.iter().enumerate() {
            if used[idx] {
                continue;
            }
            let tokens = tokenize(&port.name);
            for (text, token_len, trailing) in candidate_suffixes(&tokens) {
                if text == target {
                    candidates.push((idx, token_len, trailing));
                }
            }
        }
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        if let Some(&(idx, _, _)) = candidates.first() {
            used[idx] = true;
            let physical = &group[idx];

            if physical.direction != desc.direction {
                direction_mismatches += 1;
            }
            if let (Some(logical_width), Some(physical_width)) =
                (desc.width.as_ref().and_then(|w| w.as_literal_int()), physical.width_literal())
            {
                if logical_width != physical_width as i64 {
                    width_mismatches += 1;
                }
            }

            match desc.presence {
                Presence::Required => required_matched += 1,
                Presence::Optional => optional_matched += 1,
                Presence::Illegal => {}
            }

            port_maps.push(PortMap {
                logical_name: logical.name.clone(),
                physical_name: physical.name.clone(),
                bit_slice: None,
            });
        }
    }

    Alignment {
        port_maps,
        direction_mismatches,
        width_mismatches,
        required_total,
        optional_total,
        required_matched,
        optional_matched,
    }
}

fn eligible_descriptor(logical: &LogicalPort, side: Side) -> Option<&crate::model::SideDescriptor> {
    logical.side(side).filter(|d| d.presence != Presence::Illegal)
}

/// Searches the module's non-localparam parameters for one whose normalized
/// name contains each declared bus-parameter name as a token.
fn propagate_bus_parameters(bus: &BusDefinition, module: &Module) -> Vec<BusParameter> {
    bus.declared_parameters
        .iter()
        .filter_map(|bus_param_name| {
            module
                .find_parameter_containing(bus_param_name)
                .and_then(|p| p.default.clone())
                .map(|value| BusParameter {
                    name: bus_param_name.clone(),
                    value,
                })
        })
        .collect()
}

fn role_attachments(
    bus: &BusDefinition,
    side: Side,
    group_name: &str,
    module: &Module,
) -> (Option<MemoryMap>, Option<AddressSpace>) {
    if !bus.is_addressable {
        return (None, None);
    }
    match side {
        Side::Slave => (
            Some(MemoryMap {
                name: format!("MM_{}", group_name),
                address_block_name: format!("BLK_{}", group_name),
                base_address: 0,
                range: 4096,
                width: module.data_width_default(),
            }),
            None,
        ),
        Side::Master => (
            None,
            Some(AddressSpace {
                name: format!("AS_{}", group_name),
                range: 1u64 << module.addr_width_default().min(63),
                width: module.data_width_default(),
            }),
        ),
    }
}
