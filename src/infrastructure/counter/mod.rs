//! Counter store implementations

pub mod in_memory;
pub mod redis;

pub use in_memory::InMemoryCounterStore;
pub use redis::RedisCounterStore;
