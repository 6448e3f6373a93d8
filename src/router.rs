//! rmcp bridge: turn a [`Handler`] into a `ToolRouter`.
//!
//! rmcp's `ToolRouter` is the tool table used by its server handler for
//! STDIO/TCP transports. [`Handler::tool_router`] installs one route per
//! flattened tool, and [`Handler::list_tools`] produces the `Tool` models
//! for capability advertisement.
//!
//! rmcp's transports own auth-info extraction, so routes built here invoke
//! the context factory with empty request metadata. Servers that surface
//! auth info go through [`ToolServer`](crate::handler::ToolServer) instead.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::JsonObject,
};
use serde_json::Value;

use crate::handler::Handler;
use crate::registry::RequestMeta;
use crate::tool::Tool;

impl<C> Handler<C>
where
    C: Send + 'static,
{
    /// All flattened tools as rmcp `Tool` models, in flattening order.
    pub fn list_tools(&self) -> Vec<rmcp::model::Tool> {
        self.flattened()
            .iter()
            .map(|(name, tool)| model_tool(name, tool))
            .collect()
    }

    /// Build an rmcp `ToolRouter` wired to every flattened tool.
    ///
    /// Each call builds an independent router; registering the same handler
    /// into several routers does not re-flatten the tree.
    pub fn tool_router<S>(&self) -> ToolRouter<S>
    where
        S: Send + Sync + 'static,
    {
        self.flattened()
            .iter()
            .fold(ToolRouter::new(), |router, (name, tool)| {
                let callback = self.callback_for(name, tool);
                let route =
                    ToolRoute::new_dyn(model_tool(name, tool), move |ctx: ToolCallContext<'_, S>| {
                        let arguments = ctx.arguments.clone();
                        let callback = callback.clone();
                        async move { callback(arguments, RequestMeta::default()).await }.boxed()
                    });
                router.with_route(route)
            })
    }
}

fn model_tool<C>(name: &str, tool: &Tool<C>) -> rmcp::model::Tool {
    rmcp::model::Tool {
        name: name.to_string().into(),
        description: Some(tool.description().to_string().into()),
        input_schema: tool
            .input_schema()
            .cloned()
            .unwrap_or_else(empty_object_schema),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// rmcp's `Tool.input_schema` is required; tools declared without an input
/// type advertise an empty object schema.
fn empty_object_schema() -> Arc<JsonObject> {
    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), Value::String("object".to_string()));
    Arc::new(schema)
}
