//! The shared data model: physical module types, abstraction-side
//! catalog types, and the matcher's output types.

pub mod bus;
pub mod interface;
pub mod module;
pub mod port;

pub use bus::{AbstractionDefinition, BusDefinition, LogicalPort, Presence, Side, SideDescriptor, Vlnv};
pub use interface::{AddressSpace, BitSlice, BusInterface, BusParameter, MemoryMap, PortMap, Role};
pub use module::{Module, Parameter};
pub use port::{Direction, Endianness, Expr, Port, Range};
