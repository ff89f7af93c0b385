//! Caching decorators for same-as resolution.
//!
//! Exactly one caching layer sits outermost in the decorator chain:
//! [`FileBackedCache`] when a usable cache file is configured,
//! [`InMemoryCache`] otherwise. Both honor the retrieval contract and
//! guarantee that a warm hit never re-invokes the wrapped resolver.

mod file;
mod memory;

pub use file::FileBackedCache;
pub use memory::InMemoryCache;
