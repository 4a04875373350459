/// Transport to the browser tool server
///
/// The agent drives a tool server over newline-delimited JSON-RPC. The only
/// shipped transport spawns the server as a subprocess and talks over
/// stdin/stdout.

pub mod base;
pub mod stdio;

pub use base::Connector;
pub use stdio::StdioConnector;
