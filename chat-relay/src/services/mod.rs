//! Relay services: envelope parsing, the outbound client seam, and the
//! handler tying them together.

pub mod envelope;
pub mod mock;
pub mod relay;
pub mod upstream;

pub use relay::{MissingDependency, RelayHandler};
pub use upstream::{ClientError, ReqwestUpstreamClient, UpstreamClient, UpstreamReply};
