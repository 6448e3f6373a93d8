//! End-to-end registration tests against a fake tool server.

use mcp_toolkit::{
    AuthInfo, Metadata, RequestMeta, RpcRegistry, ToolCallError, ToolRegistration, ToolServer,
    ToolTree,
};
use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content, ErrorCode, RawContent};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

/// A server that just records what gets registered, in order.
#[derive(Default)]
struct FakeServer {
    registrations: Vec<ToolRegistration>,
}

impl ToolServer for FakeServer {
    fn register_tool(&mut self, registration: ToolRegistration) {
        self.registrations.push(registration);
    }
}

impl FakeServer {
    fn names(&self) -> Vec<&str> {
        self.registrations
            .iter()
            .map(|r| r.name.as_str())
            .collect()
    }

    fn find(&self, name: &str) -> &ToolRegistration {
        self.registrations
            .iter()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("tool {name} not registered"))
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn result_text(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        RawContent::Text(text) => &text.text,
        _ => panic!("Expected text content"),
    }
}

fn args(value: Value) -> Option<serde_json::Map<String, Value>> {
    value.as_object().cloned()
}

#[test]
fn registration_follows_flattening_order() {
    init_logging();
    let toolkit = RpcRegistry::new().create();
    let ok = |text: &'static str| {
        toolkit.tool(format!("tool {text}")).handler(move |_call| async move {
            Ok(CallToolResult::success(vec![Content::text(text)]))
        })
    };

    let handler = toolkit.handler(
        ToolTree::new().tool("a", ok("a")).tree(
            "b",
            ToolTree::new().tool("c", ok("c")).tool("d", ok("d")),
        ),
    );

    let mut server = FakeServer::default();
    handler.register(&mut server);

    assert_eq!(server.names(), vec!["a", "b.c", "b.d"]);
}

#[test]
fn summary_exposes_names_and_descriptions_only() {
    let toolkit = RpcRegistry::new().create();
    let echo = toolkit.tool("Echo the input").handler(|_call| async move {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    });
    let ping = toolkit.tool("Ping the void").handler(|_call| async move {
        Ok(CallToolResult::success(vec![Content::text("pong")]))
    });

    let handler = toolkit.handler(
        ToolTree::new()
            .tool("echo", echo)
            .tree("net", ToolTree::new().tool("ping", ping)),
    );

    let summary: Vec<_> = handler.tools().collect();
    assert_eq!(
        summary,
        vec![("echo", "Echo the input"), ("net.ping", "Ping the void")]
    );
}

#[tokio::test]
async fn context_reaches_the_handler() {
    init_logging();

    #[derive(Clone)]
    struct UserContext {
        user_id: String,
    }

    let toolkit = RpcRegistry::new()
        .context(|meta: RequestMeta| async move {
            let user_id = meta
                .auth_info
                .and_then(|auth| auth.client_id)
                .unwrap_or_else(|| "123".to_string());
            Ok(UserContext { user_id })
        })
        .create();

    let whoami = toolkit.tool("Report the caller id").handler(|call| async move {
        Ok(CallToolResult::success(vec![Content::text(
            call.context.user_id,
        )]))
    });

    let handler = toolkit.handler(ToolTree::new().tool("whoami", whoami));
    let mut server = FakeServer::default();
    handler.register(&mut server);

    let callback = &server.find("whoami").callback;
    let result = callback(None, RequestMeta::default()).await.unwrap();
    assert_eq!(result_text(&result), "123");

    // Auth info flows into the factory when the server supplies it.
    let meta = RequestMeta {
        auth_info: Some(AuthInfo {
            client_id: Some("client-7".into()),
            ..AuthInfo::default()
        }),
    };
    let result = callback(None, meta).await.unwrap();
    assert_eq!(result_text(&result), "client-7");
}

#[tokio::test]
async fn unit_context_still_invokes_the_handler() {
    let toolkit = RpcRegistry::new().create();
    let tool = toolkit.tool("Runs without a context factory").handler(|call| async move {
        let () = call.context;
        Ok(CallToolResult::success(vec![Content::text("ran")]))
    });

    let handler = toolkit.handler(ToolTree::new().tool("bare", tool));
    let mut server = FakeServer::default();
    handler.register(&mut server);

    let result = (server.find("bare").callback)(None, RequestMeta::default())
        .await
        .unwrap();
    assert_eq!(result_text(&result), "ran");
}

#[tokio::test]
async fn typed_input_is_parsed_by_the_callback() {
    #[derive(Debug, Deserialize, JsonSchema)]
    struct GreetParams {
        name: String,
    }

    let toolkit = RpcRegistry::new().create();
    let greet = toolkit
        .tool("Greet someone by name")
        .input::<GreetParams>()
        .handler(|call| async move {
            Ok(CallToolResult::success(vec![Content::text(format!(
                "Hello, {}!",
                call.input.name
            ))]))
        });

    let handler = toolkit.handler(ToolTree::new().tool("greet", greet));
    let mut server = FakeServer::default();
    handler.register(&mut server);

    let registration = server.find("greet");
    assert!(registration.input_schema.is_some());

    let result = (registration.callback)(args(json!({ "name": "Alice" })), RequestMeta::default())
        .await
        .unwrap();
    assert_eq!(result_text(&result), "Hello, Alice!");

    let err = (registration.callback)(args(json!({ "name": 42 })), RequestMeta::default())
        .await
        .unwrap_err();
    assert!(err.message.contains("invalid tool input"));
}

#[tokio::test]
async fn handler_failure_passes_through() {
    let toolkit = RpcRegistry::new().create();
    let broken = toolkit.tool("Always fails").handler(|_call| async move {
        Err(McpError::internal_error("boom", None))
    });

    let handler = toolkit.handler(ToolTree::new().tool("broken", broken));
    let mut server = FakeServer::default();
    handler.register(&mut server);

    let err = (server.find("broken").callback)(None, RequestMeta::default())
        .await
        .unwrap_err();
    assert_eq!(err.message, "boom");
}

#[tokio::test]
async fn context_factory_failure_skips_the_handler() {
    let toolkit = RpcRegistry::new()
        .context(|_meta| async move {
            Err::<(), _>(McpError::internal_error("no session", None))
        })
        .create();

    let tool = toolkit.tool("Never runs").handler(|_call| async move {
        Ok(CallToolResult::success(vec![Content::text("unreachable")]))
    });

    let handler = toolkit.handler(ToolTree::new().tool("guarded", tool));
    let mut server = FakeServer::default();
    handler.register(&mut server);

    let err = (server.find("guarded").callback)(None, RequestMeta::default())
        .await
        .unwrap_err();
    assert_eq!(err.message, "no session");
}

#[tokio::test]
async fn context_error_maps_to_internal_error() {
    let toolkit = RpcRegistry::new()
        .context(|meta: RequestMeta| async move {
            match meta.auth_info {
                Some(auth) => Ok(auth),
                None => Err(ToolCallError::context("missing auth info").into()),
            }
        })
        .create();

    let tool = toolkit.tool("Needs auth").handler(|_call| async move {
        Ok(CallToolResult::success(vec![Content::text("authorized")]))
    });

    let handler = toolkit.handler(ToolTree::new().tool("secure", tool));
    let mut server = FakeServer::default();
    handler.register(&mut server);

    let err = (server.find("secure").callback)(None, RequestMeta::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    assert!(err.message.contains("context construction failed"));
    assert!(err.message.contains("missing auth info"));

    let meta = RequestMeta {
        auth_info: Some(AuthInfo::default()),
    };
    let result = (server.find("secure").callback)(None, meta).await.unwrap();
    assert_eq!(result_text(&result), "authorized");
}

#[tokio::test]
async fn two_servers_are_wired_independently() {
    let toolkit = RpcRegistry::new().create();
    let echo = toolkit.tool("Echo").handler(|_call| async move {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    });

    let handler = toolkit.handler(ToolTree::new().tool("echo", echo));

    let mut first = FakeServer::default();
    let mut second = FakeServer::default();
    handler.register(&mut first);
    handler.register(&mut second);

    // Wiping one server's table leaves the other fully wired.
    first.registrations.clear();
    assert!(first.registrations.is_empty());
    assert_eq!(second.names(), vec!["echo"]);

    let result = (second.find("echo").callback)(None, RequestMeta::default())
        .await
        .unwrap();
    assert_eq!(result_text(&result), "ok");
}

#[test]
fn metadata_rides_along_on_the_handler() {
    let mut metadata = Metadata::new();
    metadata.insert("server".into(), Value::String("demo".into()));

    let toolkit = RpcRegistry::new().metadata(metadata).create();
    let handler = toolkit.handler(ToolTree::new());

    assert!(handler.is_empty());
    assert_eq!(
        handler.metadata().get("server"),
        Some(&Value::String("demo".into()))
    );
}
