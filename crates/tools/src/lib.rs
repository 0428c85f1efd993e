pub mod adapter;
pub mod dispatcher;
pub mod protocol;
pub mod registry;
pub mod request;
pub mod request_builder;
pub mod screening_tools;
pub mod traits;

pub use adapter::AmlToolAdapter;
pub use dispatcher::ToolDispatcher;
pub use protocol::Protocol;
pub use registry::ToolRegistry;
pub use request::{
    CryptoScreeningRequest, EntitySchema, IpScreeningRequest, SanctionsQuery,
    SanctionsScreeningRequest, SearchScope,
};
pub use screening_tools::{CryptoScreeningTool, IpScreeningTool, SanctionsScreeningTool};
pub use traits::{Tool, ToolResult};
