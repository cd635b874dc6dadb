mod database;
mod memory;

#[cfg(test)]
mod mock;

pub use database::*;
pub use memory::MemoryStore;
