//! Abstraction-side types: `BusDefinition`, `AbstractionDefinition`
//! and `LogicalPort`, the catalog's view of a bus protocol as loaded from the
//! IP-XACT library tree.

use std::fmt::Display;

use serde_derive::{Deserialize, Serialize};

use super::port::{Direction, Expr};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Vlnv {
    pub vendor: String,
    pub library: String,
    pub name: String,
    pub version: String,
}

impl Display for Vlnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}:{}", self.vendor, self.library, self.name, self.version)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Master,
    Slave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presence {
    Required,
    Optional,
    Illegal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideDescriptor {
    pub presence: Presence,
    pub direction: Direction,
    pub width: Option<Expr>,
    pub default: Option<Expr>,
}

impl SideDescriptor {
    /// Mirrors a master descriptor into its inferred slave counterpart:
    /// presence copied, direction inverted, width copied.
    pub fn mirror(&self) -> Self {
        SideDescriptor {
            presence: self.presence,
            direction: invert(self.direction),
            width: self.width.clone(),
            default: self.default.clone(),
        }
    }
}

fn invert(d: Direction) -> Direction {
    match d {
        Direction::In => Direction::Out,
        Direction::Out => Direction::In,
        Direction::InOut => Direction::InOut,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalPort {
    pub name: String,
    pub master: Option<SideDescriptor>,
    pub slave: Option<SideDescriptor>,
}

impl LogicalPort {
    pub fn side(&self, side: Side) -> Option<&SideDescriptor> {
        match side {
            Side::Master => self.master.as_ref(),
            Side::Slave => self.slave.as_ref(),
        }
    }

    /// Applies mirror-slave inference in place: if the master
    /// descriptor is present and the slave is absent, synthesize one.
    pub fn apply_mirror_inference(&mut self) {
        if self.slave.is_none() {
            if let Some(master) = &self.master {
                self.slave = Some(master.mirror());
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusDefinition {
    pub vlnv: Vlnv,
    pub is_addressable: bool,
    pub direct_connection: bool,
    /// Declared parameter names (e.g. `DATA_WIDTH`, `ID_WIDTH`) eligible for
    /// propagation to a matched `BusInterface`.
    pub declared_parameters: Vec<String>,
}

impl BusDefinition {
    /// Bus definitions whose name matches (case-insensitive) "clock" or
    /// "reset" get special matcher treatment.
    pub fn is_clock(&self) -> bool {
        self.vlnv.name.eq_ignore_ascii_case("clock")
    }

    pub fn is_reset(&self) -> bool {
        self.vlnv.name.eq_ignore_ascii_case("reset")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractionDefinition {
    pub vlnv: Vlnv,
    pub bus_type: Vlnv,
    pub logical_ports: Vec<LogicalPort>,
}
