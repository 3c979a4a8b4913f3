//! HTTP route handlers.

pub mod getlink;
pub mod health;
pub mod stream;

pub use getlink::{getlink_handler, LinkResponse};
pub use health::health_handler;
pub use stream::stream_handler;
