//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves canned responses keyed by request path and records the
//! `User-Agent` of every request. Unknown paths get 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: &'static str,
    pub content_type: Option<String>,
    /// Overrides the `Content-Length` header value (the real body is still sent).
    pub declared_length: Option<String>,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl Route {
    pub fn ok(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status: "200 OK",
            content_type: Some(content_type.to_string()),
            declared_length: None,
            location: None,
            body,
        }
    }

    pub fn status(status: &'static str) -> Self {
        Self {
            status,
            content_type: Some("text/plain".to_string()),
            declared_length: None,
            location: None,
            body: b"error".to_vec(),
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            status: "302 Found",
            content_type: None,
            declared_length: None,
            location: Some(location.to_string()),
            body: Vec::new(),
        }
    }

    pub fn without_content_type(mut self) -> Self {
        self.content_type = None;
        self
    }

    pub fn declaring_length(mut self, len: u64) -> Self {
        self.declared_length = Some(len.to_string());
        self
    }

    /// Sends `value` verbatim as the `Content-Length` header.
    pub fn declaring_raw_length(mut self, value: &str) -> Self {
        self.declared_length = Some(value.to_string());
        self
    }
}

/// Handle to a running server.
pub struct ImageServer {
    pub base: String,
    user_agents: Arc<Mutex<Vec<String>>>,
    hits: Arc<Mutex<Vec<String>>>,
}

impl ImageServer {
    /// Full URL for `path` (which should start with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn user_agents(&self) -> Vec<String> {
        self.user_agents.lock().unwrap().clone()
    }

    /// Request paths in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> ImageServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    );
    let user_agents = Arc::new(Mutex::new(Vec::new()));
    let hits = Arc::new(Mutex::new(Vec::new()));
    {
        let user_agents = Arc::clone(&user_agents);
        let hits = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let user_agents = Arc::clone(&user_agents);
                let hits = Arc::clone(&hits);
                thread::spawn(move || handle(stream, &routes, &user_agents, &hits));
            }
        });
    }
    ImageServer {
        base: format!("http://127.0.0.1:{}", port),
        user_agents,
        hits,
    }
}

/// Starts a server that accepts connections and never answers. Returns its
/// base URL. Accepted sockets stay open until the process exits.
pub fn start_silent() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Route>,
    user_agents: &Mutex<Vec<String>>,
    hits: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (path, user_agent) = parse_request(request);
    hits.lock().unwrap().push(path.to_string());
    if let Some(ua) = user_agent {
        user_agents.lock().unwrap().push(ua.to_string());
    }

    let route = routes
        .get(path)
        .cloned()
        .unwrap_or_else(|| Route::status("404 Not Found"));
    let mut head = format!("HTTP/1.1 {}\r\nConnection: close\r\n", route.status);
    if let Some(ct) = &route.content_type {
        head.push_str(&format!("Content-Type: {}\r\n", ct));
    }
    if let Some(loc) = &route.location {
        head.push_str(&format!("Location: {}\r\n", loc));
    }
    let len = route
        .declared_length
        .unwrap_or_else(|| route.body.len().to_string());
    head.push_str(&format!("Content-Length: {}\r\n\r\n", len));
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
}

/// Returns (path without query, User-Agent header value).
fn parse_request(request: &str) -> (&str, Option<&str>) {
    let mut path = "";
    let mut user_agent = None;
    for (i, line) in request.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if i == 0 {
            let target = line.split_whitespace().nth(1).unwrap_or("/");
            path = target.split('?').next().unwrap_or(target);
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("user-agent") {
                user_agent = Some(value.trim());
            }
        }
    }
    (path, user_agent)
}
