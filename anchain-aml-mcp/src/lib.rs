//! AnChain AML screening exposed as MCP tools over stdio.

pub mod config;
pub mod server;

pub use config::{Cli, Config};
pub use server::{McpServer, SERVER_NAME};
