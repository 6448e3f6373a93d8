//! Handlers: a resolved tool tree plus bulk registration.
//!
//! A [`Handler`] is created from a [`ToolTree`] by
//! [`Toolkit::handler`](crate::registry::Toolkit::handler). The tree is
//! flattened exactly once; [`Handler::register`] can then wire the same
//! flattened list onto any number of servers, each independently.
//!
//! The server side of the contract is the [`ToolServer`] trait: anything
//! that can accept a named tool with a callback. The rmcp bridge in
//! [`crate::router`] covers the common case; implement `ToolServer` for
//! other order-sensitive tool tables.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde_json::Value;
use tracing::debug;

use crate::registry::{Metadata, RequestMeta, ToolkitInner};
use crate::tool::Tool;
use crate::tree::ToolTree;

// ============================================================================
// Server contract
// ============================================================================

/// Type-erased per-tool callback installed on a server.
///
/// Invoked by the server with the raw JSON arguments (if any) and the
/// request metadata it extracted. Builds the context, runs the tool handler,
/// and returns the result; every failure along the way passes through.
pub type ToolCallback = Arc<
    dyn Fn(Option<JsonObject>, RequestMeta) -> BoxFuture<'static, Result<CallToolResult, McpError>>
        + Send
        + Sync,
>;

/// One tool as handed to a server: name, description, schema, callback.
pub struct ToolRegistration {
    pub name: String,
    pub description: String,
    pub input_schema: Option<Arc<JsonObject>>,
    pub callback: ToolCallback,
}

/// The registration contract an external server exposes to this layer.
pub trait ToolServer {
    /// Install one tool in the server's tool table.
    fn register_tool(&mut self, registration: ToolRegistration);
}

// ============================================================================
// Handler
// ============================================================================

/// A resolved tool tree, ready to register against servers.
pub struct Handler<C> {
    tools: Vec<(String, Tool<C>)>,
    registry: Arc<ToolkitInner<C>>,
}

impl<C> Handler<C>
where
    C: Send + 'static,
{
    pub(crate) fn new(tree: ToolTree<C>, registry: Arc<ToolkitInner<C>>) -> Self {
        let tools = tree.flatten();
        debug!(count = tools.len(), "resolved tool tree");
        Self { tools, registry }
    }

    /// Ordered `(dotted name, description)` summary of every tool.
    ///
    /// Suitable for capability advertisement; schemas and handlers are not
    /// exposed here.
    pub fn tools(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tools
            .iter()
            .map(|(name, tool)| (name.as_str(), tool.description()))
    }

    /// The registry metadata this handler was created with.
    pub fn metadata(&self) -> &Metadata {
        &self.registry.metadata
    }

    /// Number of flattened tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub(crate) fn flattened(&self) -> &[(String, Tool<C>)] {
        &self.tools
    }

    /// Register every tool with `server`, in flattening order.
    ///
    /// May be called any number of times with different servers; each
    /// server's tool table is wired independently.
    pub fn register<S>(&self, server: &mut S)
    where
        S: ToolServer + ?Sized,
    {
        for (name, tool) in &self.tools {
            server.register_tool(ToolRegistration {
                name: name.clone(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema().cloned(),
                callback: self.callback_for(name, tool),
            });
            debug!(tool = %name, "registered tool");
        }
    }

    /// Build the erased callback for one flattened tool.
    pub(crate) fn callback_for(&self, name: &str, tool: &Tool<C>) -> ToolCallback {
        let factory = self.registry.context_factory.clone();
        let tool = tool.clone();
        let name = name.to_string();
        Arc::new(move |arguments: Option<JsonObject>, meta: RequestMeta| {
            let factory = factory.clone();
            let tool = tool.clone();
            let name = name.clone();
            async move {
                debug!(tool = %name, "dispatching tool call");
                let context = factory(meta).await?;
                let input = match arguments {
                    Some(map) => Value::Object(map),
                    None => Value::Null,
                };
                tool.invoke(context, input).await
            }
            .boxed()
        })
    }
}
