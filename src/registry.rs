//! The RPC registry: caller-owned configuration for building tools.
//!
//! An [`RpcRegistry`] accumulates an optional context factory and metadata
//! through chained calls, then freezes into a [`Toolkit`]: the pair of
//! factories that create [`ToolBuilder`]s and [`Handler`]s. The registry is
//! an explicit, caller-owned object: construct one at application startup
//! and pass the toolkit wherever tools are declared.
//!
//! The context type is tracked in the registry's type parameter. A fresh
//! registry is `RpcRegistry<()>`: with no factory configured, every handler
//! receives the unit context. Installing a factory with
//! [`RpcRegistry::context`] retypes the registry, so a typed context can
//! never be missing at call time.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::ErrorData as McpError;
use serde_json::Value;

use crate::handler::Handler;
use crate::tool::ToolBuilder;
use crate::tree::ToolTree;

// ============================================================================
// Request metadata
// ============================================================================

/// Authentication info extracted by the external server for one invocation.
///
/// Opaque to this layer; it is handed to the context factory untouched.
#[derive(Debug, Clone, Default)]
pub struct AuthInfo {
    /// Bearer token, if the transport presented one.
    pub token: Option<String>,

    /// OAuth client id, if known.
    pub client_id: Option<String>,

    /// Granted scopes.
    pub scopes: Vec<String>,

    /// Any further claims the server attached.
    pub extra: Value,
}

/// Per-invocation metadata supplied by the external server to a callback.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub auth_info: Option<AuthInfo>,
}

/// Open string-keyed metadata attached to a registry.
pub type Metadata = serde_json::Map<String, Value>;

/// Async factory turning request metadata into a per-invocation context.
pub type ContextFactory<C> =
    Arc<dyn Fn(RequestMeta) -> BoxFuture<'static, Result<C, McpError>> + Send + Sync>;

// ============================================================================
// Registry
// ============================================================================

/// Chainable configuration for tool builders and handlers.
pub struct RpcRegistry<C = ()> {
    context_factory: ContextFactory<C>,
    metadata: Metadata,
}

impl RpcRegistry<()> {
    /// Create a registry with no context factory and empty metadata.
    pub fn new() -> Self {
        Self {
            context_factory: Arc::new(|_meta| {
                futures::future::ready(Ok::<(), McpError>(())).boxed()
            }),
            metadata: Metadata::new(),
        }
    }
}

impl Default for RpcRegistry<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> RpcRegistry<C> {
    /// Install a context factory, retyping the registry to its context type.
    ///
    /// At most one factory is active; installing a new one replaces the
    /// previous factory and its context type. Factory failures propagate to
    /// the server unchanged, before the tool handler runs.
    pub fn context<C2, F, Fut>(self, factory: F) -> RpcRegistry<C2>
    where
        F: Fn(RequestMeta) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<C2, McpError>> + Send + 'static,
    {
        RpcRegistry {
            context_factory: Arc::new(move |meta| factory(meta).boxed()),
            metadata: self.metadata,
        }
    }

    /// Replace the metadata map wholesale.
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Freeze the registry into its factory pair.
    ///
    /// The current context factory and metadata are snapshotted; every
    /// builder and handler produced by the toolkit shares that snapshot.
    pub fn create(self) -> Toolkit<C> {
        Toolkit {
            inner: Arc::new(ToolkitInner {
                context_factory: self.context_factory,
                metadata: self.metadata,
            }),
        }
    }
}

// ============================================================================
// Toolkit
// ============================================================================

pub(crate) struct ToolkitInner<C> {
    pub(crate) context_factory: ContextFactory<C>,
    pub(crate) metadata: Metadata,
}

/// The frozen factory pair produced by [`RpcRegistry::create`].
pub struct Toolkit<C = ()> {
    inner: Arc<ToolkitInner<C>>,
}

impl<C> Toolkit<C>
where
    C: Send + 'static,
{
    /// Start building a tool with the given description.
    pub fn tool(&self, description: impl Into<String>) -> ToolBuilder<C, Value> {
        ToolBuilder::new(description)
    }

    /// Resolve a tool tree into a registrable [`Handler`].
    ///
    /// The tree is flattened once, here; registering the handler against
    /// multiple servers reuses the same flattened list.
    pub fn handler(&self, tree: ToolTree<C>) -> Handler<C> {
        Handler::new(tree, self.inner.clone())
    }

    /// The metadata snapshot taken at [`RpcRegistry::create`].
    pub fn metadata(&self) -> &Metadata {
        &self.inner.metadata
    }
}

impl<C> Clone for Toolkit<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
