//! Tool records and the fluent tool builder.
//!
//! A [`Tool`] pairs a description, an optional input schema, and an async
//! handler. Tools are built with [`ToolBuilder`] in a fixed order:
//! description (at construction) → optional typed input → handler. Attaching
//! the handler finalizes the builder into an immutable `Tool`.
//!
//! The builder tracks two types through the chain: `C`, the context produced
//! by the registry's context factory, and `I`, the tool's input. Declaring
//! an input type with [`ToolBuilder::input`] retypes the builder, so the
//! handler closure receives fully typed arguments without restating them.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, JsonObject},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ToolCallError;

// ============================================================================
// Tool Call
// ============================================================================

/// The argument record delivered to a tool handler.
pub struct ToolCall<C, I> {
    /// Context built by the registry's context factory for this invocation.
    pub context: C,

    /// The tool's input, parsed into its declared type.
    pub input: I,
}

// ============================================================================
// Tool
// ============================================================================

/// Type-erased async handler stored inside a finalized tool.
type ErasedHandler<C> =
    dyn Fn(C, Value) -> BoxFuture<'static, Result<CallToolResult, McpError>> + Send + Sync;

/// A finalized, immutable tool.
///
/// The description and input schema never change after the handler is
/// attached. Cloning is cheap: the handler is shared behind an `Arc`.
pub struct Tool<C> {
    description: String,
    input_schema: Option<Arc<JsonObject>>,
    handler: Arc<ErasedHandler<C>>,
}

impl<C> Tool<C> {
    /// Tool description shown to clients.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// JSON schema of the declared input type, if one was declared.
    pub fn input_schema(&self) -> Option<&Arc<JsonObject>> {
        self.input_schema.as_ref()
    }

    /// Invoke the handler with an already-built context and raw input.
    ///
    /// Input parsing happens inside the erased handler; a parse failure
    /// yields `invalid_params`, any handler failure passes through.
    pub fn invoke(
        &self,
        context: C,
        input: Value,
    ) -> BoxFuture<'static, Result<CallToolResult, McpError>> {
        (self.handler)(context, input)
    }
}

impl<C> Clone for Tool<C> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
            handler: self.handler.clone(),
        }
    }
}

impl<C> fmt::Debug for Tool<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("description", &self.description)
            .field("has_input_schema", &self.input_schema.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tool Builder
// ============================================================================

/// Fluent builder for a [`Tool`].
///
/// Created by [`Toolkit::tool`](crate::registry::Toolkit::tool) with a
/// description. Until an input type is declared the handler receives the raw
/// JSON arguments as a [`serde_json::Value`].
pub struct ToolBuilder<C, I = Value> {
    description: String,
    input_schema: Option<Arc<JsonObject>>,
    _types: PhantomData<fn(C, I)>,
}

impl<C> ToolBuilder<C, Value> {
    pub(crate) fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            input_schema: None,
            _types: PhantomData,
        }
    }

    /// Declare the tool's input type.
    ///
    /// Captures the schemars-derived JSON schema for `T` and retypes the
    /// builder, so the handler attached afterwards receives `T` directly.
    /// The schema itself is not validated here; a raw input that does not
    /// parse into `T` surfaces as `invalid_params` at call time.
    pub fn input<T>(self) -> ToolBuilder<C, T>
    where
        T: DeserializeOwned + JsonSchema + Send + 'static,
    {
        ToolBuilder {
            description: self.description,
            input_schema: Some(cached_schema_for_type::<T>()),
            _types: PhantomData,
        }
    }
}

impl<C, I> ToolBuilder<C, I>
where
    C: Send + 'static,
    I: DeserializeOwned + Send + 'static,
{
    /// Attach the handler, finalizing the builder into a [`Tool`].
    pub fn handler<F, Fut>(self, f: F) -> Tool<C>
    where
        F: Fn(ToolCall<C, I>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallToolResult, McpError>> + Send + 'static,
    {
        let handler = Arc::new(move |context: C, raw: Value| {
            let input: I = match serde_json::from_value(raw) {
                Ok(input) => input,
                Err(e) => {
                    let err = McpError::from(ToolCallError::from(e));
                    return futures::future::ready(Err(err)).boxed();
                }
            };
            f(ToolCall { context, input }).boxed()
        });

        Tool {
            description: self.description,
            input_schema: self.input_schema,
            handler,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
