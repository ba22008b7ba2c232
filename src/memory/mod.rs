//! In-memory collaborator.
//!
//! A complete implementation of the external graph and object-table
//! interfaces that keeps everything in process memory. Every handle it hands
//! out is counted in a [`HandleLedger`], and every primitive can be made to
//! fail with [`Fault`] / [`TableFault`], which makes it the reference
//! collaborator for exercising the inspector.

mod graph;
mod ledger;
mod object_table;

pub use graph::{Fault, MemoryGraph, MemoryGraphHandle, MemoryNode, MemoryPort, NodeKey, PortKey};
pub use ledger::{HandleKind, HandleLedger, Lease};
pub use object_table::{MemoryObjectTable, TableFault};
