//! sv2ipxact: converts a SystemVerilog top-level module description into an
//! IP-XACT (IEEE 1685) component document, auto-recognizing standard on-chip
//! bus interfaces among the module's ports.
//!
//! The crate is organized leaves-first along the conversion pipeline's
//! dependency order: [`sv`] (preprocessor + header parser) and
//! [`library`] (bus/abstraction catalog) feed [`grouper`] and [`matcher`],
//! whose output [`serializer`] turns into an IP-XACT document. [`pipeline`]
//! wires all of that together for the [`cli`] front end; [`report`] and
//! [`error`] carry non-fatal and fatal diagnostics respectively.

pub mod cli;
pub mod config;
pub mod error;
pub mod grouper;
pub mod library;
pub mod matcher;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod serializer;
pub mod sv;
pub mod text;
