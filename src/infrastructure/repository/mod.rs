//! Repository implementations.
//!
//! The use case layer depends on the trait defined in the domain layer,
//! not on these concrete implementations (dependency inversion).

pub mod inmemory;

pub use inmemory::InMemorySessionRepository;
