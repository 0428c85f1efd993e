//! Provider side of the AnChain AML tool server.
//!
//! Holds the error taxonomy every tool call resolves to, the HTTP request
//! descriptor produced by the request builder, the transport that executes it
//! and the normalizer that turns raw provider responses into results.

pub mod constants;
pub mod error;
pub mod http;
pub mod normalize;
pub mod traits;

pub use error::{ErrorKind, ErrorPayload, ScreeningError, ValidationError};
pub use http::HttpTransport;
pub use normalize::normalize;
pub use traits::{ApiKey, Header, HttpMethod, RawResponse, RequestDescriptor, Transport};
