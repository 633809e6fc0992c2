//! Waypoint host adapters
//!
//! Bindings that feed the transition engine from one of three history
//! stores: a pure in-memory store, a legacy History-API host with patched
//! mutators, or a first-class platform Navigation API. The in-process fake
//! hosts used by the adapter tests live in [`testing`].

mod history;
mod memory;
mod platform;
pub mod testing;

pub use history::{HistoryHost, HistorySession, HostEvent, HostEventSink};
pub use memory::{memory_engine, InitialMemoryOptions, MemoryAdapter, MemoryOptions};
pub use platform::{
    PlatformEntry, PlatformHost, PlatformNavigateEvent, PlatformSession,
};
