//! Library Index: reading IP-XACT bus/abstraction definitions off disk
//! (`xml`) and assembling/caching them into a queryable `Catalog`
//! (`catalog`).

pub mod catalog;
pub mod xml;

pub use catalog::{load, Catalog};
