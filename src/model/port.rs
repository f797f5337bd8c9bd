//! Port-level types: physical module ports, their direction,
//! signedness, and textual width/dimension expressions.

use std::fmt::Display;

use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    In,
    Out,
    InOut,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
            Direction::InOut => write!(f, "inout"),
        }
    }
}

/// An opaque textual expression (width, default value, ...) carried verbatim
/// into the output document, never evaluated arithmetically, except where a
/// literal integer form is explicitly detected for address/range
/// computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expr(pub String);

impl Expr {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Expr(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `Some` only when the expression is, after trimming, a bare
    /// decimal integer literal.
    pub fn as_literal_int(&self) -> Option<i64> {
        self.0.trim().parse::<i64>().ok()
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endianness {
    /// `[high:low]` with high >= low (the common descending form).
    BigEndian,
    /// `[low:high]` with low <= high, preserved verbatim rather than
    /// normalized to big-endian.
    LittleEndian,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub left: Expr,
    pub right: Expr,
    pub endianness: Endianness,
}

impl Range {
    /// Computes the literal bit width when both bounds are integer literals;
    /// `None` for any parametric range.
    pub fn literal_width(&self) -> Option<u32> {
        let a = self.left.as_literal_int()?;
        let b = self.right.as_literal_int()?;
        Some((a - b).unsigned_abs() as u32 + 1)
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}]", self.left, self.right)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub direction: Direction,
    pub signed: bool,
    pub packed_range: Option<Range>,
    pub unpacked_dims: Vec<Range>,
    /// Opaque token for the port's declared type (e.g. a package-imported
    /// type or an interface name); never interpreted.
    pub type_token: Option<String>,
    /// Set for `my_bus_if.master bus_m` style interface ports; the matcher
    /// and grouper both skip these entirely.
    pub is_interface_ref: bool,
}

impl Port {
    pub fn new(name: impl Into<String>, direction: Direction) -> Self {
        Port {
            name: name.into(),
            direction,
            signed: false,
            packed_range: None,
            unpacked_dims: Vec::new(),
            type_token: None,
            is_interface_ref: false,
        }
    }

    pub fn width_literal(&self) -> Option<u32> {
        self.packed_range.as_ref().and_then(Range::literal_width)
    }
}
