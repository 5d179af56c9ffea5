use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};

const SERVER_TIMEOUT: Duration = Duration::from_secs(5);

const PLAN_URI: &str = "file:///tmp/plan.md";

const PLAN_WITH_BAD_ID: &str = "# Plan\n\n```taskdown\nversion: \"1.0\"\ntasks:\n  task-1:\n    title: Fix login\n    status: pending\n```\n";

const PLAN_FIXED: &str = "# Plan\n\n```taskdown\nversion: \"1.0\"\ntasks:\n  TASK-1:\n    title: Fix login\n    status: pending\n```\n";

/// A running `taskdown-ls` with framed JSON-RPC over its stdio
struct Session {
    child: Child,
    stdin: ChildStdin,
    incoming: Receiver<Value>,
}

impl Session {
    fn start() -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_taskdown-ls"))
            .arg("--stdio")
            .current_dir(std::env::temp_dir())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn language server");

        let stdin = child.stdin.take().expect("stdin is piped");
        let stdout = child.stdout.take().expect("stdout is piped");

        let (tx, incoming) = mpsc::channel();
        thread::spawn(move || {
            let mut reader = BufReader::new(stdout);
            while let Some(message) = read_message(&mut reader) {
                if tx.send(message).is_err() {
                    break;
                }
            }
        });

        Session {
            child,
            stdin,
            incoming,
        }
    }

    fn send(&mut self, mut message: Value) {
        // JSON-RPC allows omitting `params` but not sending it as null
        if let Some(object) = message.as_object_mut() {
            if object.get("params") == Some(&Value::Null) {
                object.remove("params");
            }
        }
        let body = message.to_string();
        write!(self.stdin, "Content-Length: {}\r\n\r\n{}", body.len(), body)
            .expect("Failed to write message");
        self.stdin.flush().expect("Failed to flush stdin");
    }

    fn request(&mut self, id: i64, method: &str, params: Value) -> Value {
        self.send(json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }));
        self.next_matching(|m| m.get("id").and_then(Value::as_i64) == Some(id))
    }

    fn notify(&mut self, method: &str, params: Value) {
        self.send(json!({ "jsonrpc": "2.0", "method": method, "params": params }));
    }

    fn next_notification(&mut self, method: &str) -> Value {
        self.next_matching(|m| m.get("method").and_then(Value::as_str) == Some(method))
    }

    fn next_matching(&mut self, matches: impl Fn(&Value) -> bool) -> Value {
        loop {
            let message = self
                .incoming
                .recv_timeout(SERVER_TIMEOUT)
                .expect("Timed out waiting for the server");
            if matches(&message) {
                return message;
            }
        }
    }

    fn shutdown(mut self) {
        let response = self.request(99, "shutdown", Value::Null);
        assert!(response.get("error").is_none(), "shutdown failed: {}", response);
        self.notify("exit", Value::Null);

        drop(self.stdin);
        let status = self.child.wait().expect("Failed to wait for server");
        assert!(status.success(), "server exited with {:?}", status);
    }
}

fn read_message(reader: &mut BufReader<std::process::ChildStdout>) -> Option<Value> {
    let mut content_length = None;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 {
            return None;
        }
        if line.trim().is_empty() {
            break;
        }
        if let Some(length) = line.strip_prefix("Content-Length:") {
            content_length = length.trim().parse::<usize>().ok();
        }
    }

    let mut body = vec![0u8; content_length?];
    reader.read_exact(&mut body).ok()?;
    serde_json::from_slice(&body).ok()
}

fn initialize(session: &mut Session) -> Value {
    session.request(
        1,
        "initialize",
        json!({
            "processId": null,
            "rootUri": null,
            "capabilities": {
                "textDocument": { "publishDiagnostics": { "relatedInformation": false } }
            },
            "clientInfo": { "name": "test-client", "version": "1.0" }
        }),
    )
}

#[test]
fn initialize_smoke() {
    let mut session = Session::start();

    let response = initialize(&mut session);
    assert_eq!(response["jsonrpc"], "2.0");

    let result = response.get("result").expect("initialize returns a result");
    assert_eq!(result.pointer("/capabilities/textDocumentSync"), Some(&json!(1)));
    assert_eq!(
        result.pointer("/serverInfo/name").and_then(Value::as_str),
        Some("taskdown-ls")
    );

    session.shutdown();
}

#[test]
fn diagnostics_follow_open_and_change() {
    let mut session = Session::start();
    initialize(&mut session);
    session.notify("initialized", json!({}));

    session.notify(
        "textDocument/didOpen",
        json!({
            "textDocument": {
                "uri": PLAN_URI,
                "languageId": "markdown",
                "version": 1,
                "text": PLAN_WITH_BAD_ID
            }
        }),
    );

    let published = session.next_notification("textDocument/publishDiagnostics");
    let params = &published["params"];
    assert_eq!(params["uri"], PLAN_URI);
    assert_eq!(params["version"], 1);

    let diagnostics = params["diagnostics"].as_array().expect("diagnostics array");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["code"], "INVALID_TASK_ID");
    assert_eq!(diagnostics[0]["source"], "taskdown");
    assert_eq!(diagnostics[0]["severity"], 1);
    // Block content starts on the line after the opening fence
    assert_eq!(diagnostics[0].pointer("/range/start/line"), Some(&json!(3)));

    session.notify(
        "textDocument/didChange",
        json!({
            "textDocument": { "uri": PLAN_URI, "version": 2 },
            "contentChanges": [{ "text": PLAN_FIXED }]
        }),
    );

    let published = session.next_notification("textDocument/publishDiagnostics");
    assert_eq!(published["params"]["version"], 2);
    assert_eq!(published["params"]["diagnostics"], json!([]));

    session.shutdown();
}
