//! `Parameter` and `Module`: the parsed representation of a
//! SystemVerilog top-level module, constructed once by the header parser and
//! never mutated thereafter.

use std::path::PathBuf;

use serde_derive::{Deserialize, Serialize};

use super::port::{Expr, Port};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Captured but not interpreted: `int`, `logic [w:0]`, `real`, `string`,
    /// `type`, or a user identifier.
    pub type_tag: Option<String>,
    pub default: Option<Expr>,
    pub is_localparam: bool,
}

impl Parameter {
    pub fn default_literal_int(&self) -> Option<i64> {
        self.default.as_ref().and_then(Expr::as_literal_int)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub ports: Vec<Port>,
    pub source_file: PathBuf,
}

impl Module {
    /// Finds the first non-localparam parameter whose normalized name
    /// contains `needle` as a token, used both for bus-parameter propagation
    /// and for memoryMap/addressSpace width defaults.
    pub fn find_parameter_containing(&self, needle: &str) -> Option<&Parameter> {
        let needle = normalize(needle);
        self.parameters
            .iter()
            .filter(|p| !p.is_localparam)
            .find(|p| normalize(&p.name).contains(&needle))
    }

    /// The module's `DATA_WIDTH` parameter default, or 32 if absent or not a
    /// literal integer.
    pub fn data_width_default(&self) -> u32 {
        self.find_parameter_containing("DATA_WIDTH")
            .and_then(Parameter::default_literal_int)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(32)
    }

    /// The module's address-width parameter default (searched as `ADDR_WIDTH`
    /// then `AWIDTH`), or 32 if absent; used to size an addressSpace's range
    /// as `2^addr_width`.
    pub fn addr_width_default(&self) -> u32 {
        self.find_parameter_containing("ADDR_WIDTH")
            .or_else(|| self.find_parameter_containing("AWIDTH"))
            .and_then(Parameter::default_literal_int)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(32)
    }
}

fn normalize(s: &str) -> String {
    s.to_uppercase()
}
