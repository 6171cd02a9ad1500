pub mod jsonrpc;
pub mod server;

pub use server::McpServer;
