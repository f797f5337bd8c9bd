//! Output-side types: `BusInterface` and its role-specific
//! attachments (`MemoryMap`, `AddressSpace`), produced by the matcher and
//! consumed by the serializer.

use serde_derive::{Deserialize, Serialize};

use super::bus::Vlnv;
use super::port::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Master,
    Slave,
    System,
    Monitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitSlice {
    pub left: u32,
    pub right: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortMap {
    pub logical_name: String,
    pub physical_name: String,
    pub bit_slice: Option<BitSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryMap {
    pub name: String,
    pub address_block_name: String,
    pub base_address: u64,
    pub range: u64,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressSpace {
    pub name: String,
    pub range: u64,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusParameter {
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusInterface {
    pub name: String,
    pub bus_type: Vlnv,
    pub abstraction_type: Vlnv,
    pub role: Role,
    pub port_maps: Vec<PortMap>,
    pub memory_map: Option<MemoryMap>,
    pub address_space: Option<AddressSpace>,
    pub parameters: Vec<BusParameter>,
}
