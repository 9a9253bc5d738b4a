//! nanoivf: in-memory exact and IVF-Flat nearest-neighbor vector search.

pub mod config;
pub mod error;
pub mod index;
pub mod startup;
pub mod types;
