//! Dependency validation across a service boundary.
//!
//! Before a service commits a write that stores a reference to another
//! service's entity, it asks that service whether the entity exists. The
//! answer is one of three outcomes:
//! 1. `Valid` - the remote service returned a success status
//! 2. `NotFound` - the remote service returned 404
//! 3. `Unreachable` - connect failure, timeout, or any other status
//!
//! Every outcome is terminal for the request that asked. There is no cache,
//! no retry and no circuit breaker.

pub mod config;
pub mod dependency;
pub mod error;
pub mod http;
pub mod memory;
pub mod outcome;
pub mod reachability;

pub use config::ValidatorConfig;
pub use dependency::DependencyValidator;
pub use error::ValidatorError;
pub use http::HttpDependencyValidator;
pub use memory::InMemoryDependencyValidator;
pub use outcome::ValidationOutcome;
pub use reachability::Reachability;
