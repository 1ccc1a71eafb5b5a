//! Types shared by every shop service crate.

pub mod status;
pub mod types;

pub use status::ComponentStatus;
pub use types::{CategoryId, ParseIdError, ProductId, ReviewId};
