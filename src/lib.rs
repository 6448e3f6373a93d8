//! MCP Toolkit
//!
//! A typed, fluent builder layer for declaring remote-callable MCP tools and
//! registering them in bulk with a protocol server.
//!
//! # Architecture
//!
//! - **registry**: the caller-owned [`RpcRegistry`] (context factory,
//!   metadata) and the frozen [`Toolkit`] factory pair
//! - **tool**: the [`ToolBuilder`] chain and the immutable [`Tool`] record
//! - **tree**: nested [`ToolTree`]s and flattening to dotted names
//! - **handler**: the [`Handler`] produced from a tree, the [`ToolServer`]
//!   registration contract, and per-tool callbacks
//! - **router**: the bridge onto rmcp's `ToolRouter`
//!
//! Transport, sessions, and schema validation stay with rmcp and serde;
//! this crate only wires declared tools onto a server's tool table.
//!
//! # Example
//!
//! ```rust,no_run
//! use mcp_toolkit::{RpcRegistry, ToolTree};
//! use rmcp::model::{CallToolResult, Content};
//!
//! let toolkit = RpcRegistry::new().create();
//!
//! let echo = toolkit.tool("Echo the input back").handler(|call| async move {
//!     Ok(CallToolResult::success(vec![Content::text(
//!         call.input.to_string(),
//!     )]))
//! });
//!
//! let handler = toolkit.handler(ToolTree::new().tool("echo", echo));
//! for (name, description) in handler.tools() {
//!     println!("{name}: {description}");
//! }
//! ```

pub mod error;
pub mod handler;
pub mod registry;
pub mod router;
pub mod tool;
pub mod tree;

// Re-export commonly used types for convenience
pub use error::ToolCallError;
pub use handler::{Handler, ToolCallback, ToolRegistration, ToolServer};
pub use registry::{AuthInfo, ContextFactory, Metadata, RequestMeta, RpcRegistry, Toolkit};
pub use tool::{Tool, ToolBuilder, ToolCall};
pub use tree::{ToolNode, ToolTree};
