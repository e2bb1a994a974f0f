//! MCP protocol integration tests.
//!
//! These tests spawn the actual `gcmcp` process and communicate via
//! JSON-RPC over stdio, testing the complete MCP protocol flow.
//!
//! The rmcp library uses line-delimited JSON (each message is one line):
//! ```
//! {"jsonrpc":"2.0","id":1,"method":"initialize",...}\n
//! {"jsonrpc":"2.0","id":1,"result":{...}}\n
//! ```
//!
//! No API key is passed to the child, so every generation ends in a
//! "GEMINI_API_KEY is not set" tool error. That error proves input
//! resolution succeeded and the call reached the Gemini client.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: Option<u64>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcError {
    code: i64,
    message: String,
    data: Option<Value>,
}

/// MCP test client that spawns and communicates with the server
struct McpTestClient {
    child: Child,
    request_id: u64,
    reader: BufReader<std::process::ChildStdout>,
    _home: tempfile::TempDir,
}

impl McpTestClient {
    /// Spawn a server with no API key, no clipboard and an empty config dir
    fn spawn() -> Self {
        Self::spawn_with_env(&[])
    }

    fn spawn_with_env(vars: &[(&str, &str)]) -> Self {
        let home = tempfile::tempdir().expect("Failed to create temp dir");

        let mut command = Command::new(env!("CARGO_BIN_EXE_gcmcp"));
        command
            .arg("mcp")
            .env_remove("GEMINI_API_KEY")
            .env_remove("GEMINI_INPUT")
            .env("GEMINI_CODING_CLIPBOARD", "off")
            .env("XDG_CONFIG_HOME", home.path())
            .env("HOME", home.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        for (key, value) in vars {
            command.env(key, value);
        }

        let mut child = command.spawn().expect("Failed to spawn gcmcp mcp");
        let stdout = child.stdout.take().expect("Failed to get stdout");

        Self {
            child,
            request_id: 0,
            reader: BufReader::new(stdout),
            _home: home,
        }
    }

    /// Send a message as line-delimited JSON
    fn send_message(&mut self, content: &str) {
        let stdin = self.child.stdin.as_mut().expect("Failed to get stdin");
        writeln!(stdin, "{}", content).expect("Failed to write message");
        stdin.flush().expect("Failed to flush stdin");
    }

    /// Read a message as line-delimited JSON
    fn read_message(&mut self) -> String {
        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .expect("Failed to read line");
        line.trim().to_string()
    }

    /// Send a JSON-RPC request and get the response
    fn request(&mut self, method: &str, params: Option<Value>) -> JsonRpcResponse {
        self.request_id += 1;
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.request_id,
            method: method.to_string(),
            params,
        };

        let request_json = serde_json::to_string(&request).expect("Failed to serialize request");
        self.send_message(&request_json);

        let response_json = self.read_message();
        serde_json::from_str(&response_json).expect("Failed to parse response")
    }

    /// Send initialize request and initialized notification (required first messages)
    fn initialize(&mut self) -> JsonRpcResponse {
        let response = self.request(
            "initialize",
            Some(json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {
                    "name": "test-client",
                    "version": "1.0.0"
                }
            })),
        );

        let notification = json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        });
        self.send_message(&notification.to_string());

        response
    }

    fn list_tools(&mut self) -> JsonRpcResponse {
        self.request("tools/list", None)
    }

    fn call_tool(&mut self, name: &str, arguments: Value) -> JsonRpcResponse {
        self.request(
            "tools/call",
            Some(json!({
                "name": name,
                "arguments": arguments
            })),
        )
    }
}

impl Drop for McpTestClient {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Text of the first content item of a tool result
fn extract_text_content(response: &JsonRpcResponse) -> String {
    response
        .result
        .as_ref()
        .and_then(|r| r.get("content"))
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|c| c.get("text"))
        .and_then(|t| t.as_str())
        .expect("Expected text content in response")
        .to_string()
}

fn is_tool_error(response: &JsonRpcResponse) -> bool {
    response
        .result
        .as_ref()
        .and_then(|r| r.get("isError"))
        .and_then(|e| e.as_bool())
        .unwrap_or(false)
}

// ============================================================
// Protocol Tests
// ============================================================

mod protocol {
    use super::*;

    #[test]
    fn initialize_returns_server_info() {
        let mut client = McpTestClient::spawn();
        let response = client.initialize();

        assert!(response.error.is_none(), "Expected success, got error");
        let result = response.result.expect("Expected result");

        let server_info = result.get("serverInfo").expect("Expected serverInfo");
        assert_eq!(server_info["name"], "gemini-coding");
        assert!(result.get("capabilities").is_some());
    }

    #[test]
    fn tools_list_returns_all_tools() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.list_tools();
        assert!(response.error.is_none(), "Expected success, got error");

        let result = response.result.expect("Expected result");
        let tools_array = result
            .get("tools")
            .and_then(|t| t.as_array())
            .expect("Tools should be array");

        assert_eq!(
            tools_array.len(),
            16,
            "Expected 16 tools, got {}",
            tools_array.len()
        );

        let tool_names: Vec<&str> = tools_array
            .iter()
            .filter_map(|t| t.get("name").and_then(|n| n.as_str()))
            .collect();

        for name in [
            "gchelp",
            "server_info",
            "gcask",
            "gcspec",
            "gcarch",
            "gcapi",
            "gcreview",
            "gcrefactor",
            "gcperf",
            "gcsecurity",
            "gctest",
            "gcdebug",
            "gcexplain",
            "gcdeps",
            "gccomplete",
            "gcdocs",
        ] {
            assert!(tool_names.contains(&name), "missing tool {}", name);
        }
    }

    #[test]
    fn tools_have_descriptions_and_schemas() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.list_tools();
        let result = response.result.expect("Expected result");
        let tools = result
            .get("tools")
            .expect("Expected tools")
            .as_array()
            .expect("Tools should be array");

        for tool in tools {
            let name = tool.get("name").and_then(|n| n.as_str()).unwrap_or("?");
            assert!(
                tool.get("description").is_some(),
                "Tool {} missing description",
                name
            );
            assert!(
                tool.get("inputSchema").is_some(),
                "Tool {} missing inputSchema",
                name
            );
        }
    }

    #[test]
    fn type_modifier_is_exposed_under_its_wire_name() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.list_tools();
        let result = response.result.expect("Expected result");
        let gcapi = result["tools"]
            .as_array()
            .expect("Tools should be array")
            .iter()
            .find(|t| t["name"] == "gcapi")
            .expect("gcapi listed");

        assert!(gcapi["inputSchema"]["properties"].get("type").is_some());
        assert!(gcapi["inputSchema"]["properties"].get("kind").is_none());
    }
}

// ============================================================
// Tool Call Tests
// ============================================================

mod tool_calls {
    use super::*;

    #[test]
    fn gchelp_lists_commands() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool("gchelp", json!({}));
        assert!(response.error.is_none());
        assert!(!is_tool_error(&response));

        let text = extract_text_content(&response);
        assert!(text.contains("gcask"));
        assert!(text.contains("gcreview"));
        assert!(text.contains("IDE WORKFLOW TIPS"));
    }

    #[test]
    fn gchelp_filters_by_category() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool("gchelp", json!({ "category": "spec" }));
        let text = extract_text_content(&response);
        assert!(text.contains("gcspec"));
        assert!(!text.contains("`gcsecurity`"));
    }

    #[test]
    fn server_info_reports_missing_key() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool("server_info", json!({}));
        let text = extract_text_content(&response);
        let status: Value = serde_json::from_str(&text).expect("status is JSON");

        assert_eq!(status["api_key_configured"], false);
        assert_eq!(status["clipboard"], "disabled");
        assert_eq!(status["tool_count"], 16);
        assert_eq!(status["cache_entries"], 0);
    }

    #[test]
    fn gcask_with_prompt_reaches_gemini_client() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool("gcask", json!({ "prompt": "explain recursion" }));
        assert!(response.error.is_none());
        assert!(is_tool_error(&response));
        assert!(extract_text_content(&response).contains("GEMINI_API_KEY"));
    }

    #[test]
    fn gcreview_reads_file_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "fn main() {{ println!(\"hi\"); }}").expect("write");

        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool(
            "gcreview",
            json!({ "file_path": file.path().display().to_string(), "focus": "style" }),
        );
        assert!(is_tool_error(&response));
        assert!(extract_text_content(&response).contains("GEMINI_API_KEY"));
    }

    #[test]
    fn environment_variable_supplies_input() {
        let mut client = McpTestClient::spawn_with_env(&[("GEMINI_INPUT", "what is a monad?")]);
        client.initialize();

        let response = client.call_tool("gcask", json!({}));
        assert!(is_tool_error(&response));
        assert!(extract_text_content(&response).contains("GEMINI_API_KEY"));
    }
}

// ============================================================
// Error Handling Tests
// ============================================================

mod errors {
    use super::*;

    #[test]
    fn invalid_tool_name_returns_error() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool("nonexistent_tool", json!({}));

        assert!(response.error.is_some(), "Expected error for invalid tool");
    }

    #[test]
    fn no_input_anywhere_is_a_tool_error() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool("gcask", json!({}));

        assert!(response.error.is_none());
        assert!(is_tool_error(&response));
        assert!(extract_text_content(&response).contains("No input provided"));
    }

    #[test]
    fn missing_file_is_a_tool_error() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool(
            "gcexplain",
            json!({ "file_path": "/no/such/dir/missing.rs" }),
        );

        assert!(is_tool_error(&response));
        let text = extract_text_content(&response);
        assert!(text.contains("File not found or unreadable"));
        assert!(text.contains("/no/such/dir/missing.rs"));
    }

    #[test]
    fn missing_required_modifier_is_a_tool_error() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let response = client.call_tool("gcrefactor", json!({ "code": "fn f() {}" }));

        assert!(is_tool_error(&response));
        assert!(extract_text_content(&response).contains("goal"));
    }

    #[test]
    fn failed_call_does_not_break_session() {
        let mut client = McpTestClient::spawn();
        client.initialize();

        let failed = client.call_tool("gcask", json!({}));
        assert!(is_tool_error(&failed));

        let response = client.call_tool("gchelp", json!({ "category": "ide" }));
        assert!(!is_tool_error(&response));
        assert!(extract_text_content(&response).contains("GEMINI_INPUT"));
    }
}
