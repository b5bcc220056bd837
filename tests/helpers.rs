// Shared test helpers for database setup, CSV fixtures and a local HTTP stub.
//
// Not every test file uses every helper.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use futures::stream::{self, BoxStream, StreamExt};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use toggl_trello_kpi::record::FieldValue;
use toggl_trello_kpi::storage::{init_database, Dialect, SqlExecutor, TextRow};

/// Creates an in-memory SQLite database with the toggl_time and trello_card
/// tables. A single connection keeps every query on the same database.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    init_database(&pool)
        .await
        .expect("Failed to create tables");
    pool
}

/// Creates an in-memory SQLite database without any tables.
pub async fn create_empty_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool")
}

/// Writes `contents` to `dir/name` and returns the path.
pub fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write CSV fixture");
    path
}

/// One statement seen by a [`RecordingExecutor`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedStatement {
    pub sql: String,
    pub params: Vec<FieldValue>,
}

/// An executor that records statements instead of running them.
///
/// Statements whose parameters contain `fail_on` fail with a database error.
#[derive(Default)]
pub struct RecordingExecutor {
    pub statements: Mutex<Vec<ExecutedStatement>>,
    pub fail_on: Option<FieldValue>,
}

impl RecordingExecutor {
    pub fn failing_on(value: FieldValue) -> Self {
        Self {
            statements: Mutex::new(Vec::new()),
            fail_on: Some(value),
        }
    }

    pub fn statements(&self) -> Vec<ExecutedStatement> {
        self.statements.lock().expect("statements lock").clone()
    }

    fn record(&self, sql: &str, params: &[FieldValue]) -> Result<u64, sqlx::Error> {
        if let Some(fail_on) = &self.fail_on {
            if params.contains(fail_on) {
                return Err(sqlx::Error::Protocol(format!("rejected {fail_on:?}")));
            }
        }
        self.statements
            .lock()
            .expect("statements lock")
            .push(ExecutedStatement {
                sql: sql.to_string(),
                params: params.to_vec(),
            });
        Ok(1)
    }
}

impl SqlExecutor for RecordingExecutor {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn column_names(&self, _sql: &str) -> Result<Vec<String>, sqlx::Error> {
        Ok(Vec::new())
    }

    fn fetch_text_rows<'a>(
        &'a self,
        _sql: &'a str,
        _columns: &'a [String],
    ) -> BoxStream<'a, Result<TextRow, sqlx::Error>> {
        stream::empty().boxed()
    }

    async fn execute(&self, sql: &str, params: &[FieldValue]) -> Result<u64, sqlx::Error> {
        self.record(sql, params)
    }

    async fn execute_in_transaction(
        &self,
        sql: &str,
        params: &[FieldValue],
    ) -> Result<u64, sqlx::Error> {
        self.record(sql, params)
    }
}

/// A request received by the stub server.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub method: String,
    /// Path and query string.
    pub target: String,
    pub headers: Vec<(String, String)>,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }
}

/// A canned response for every request whose path equals `path`.
#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn json(path: &str, body: &str) -> Self {
        Self {
            path: path.to_string(),
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(path: &str, status: u16, body: &str) -> Self {
        Self {
            path: path.to_string(),
            status,
            body: body.to_string(),
        }
    }
}

/// Starts a minimal HTTP/1.1 server on a random local port.
///
/// Unknown paths answer 404. Every connection is closed after one response.
/// Returns the base URL and the log of received requests.
pub async fn spawn_stub_server(routes: Vec<Route>) -> (String, Arc<Mutex<Vec<ReceivedRequest>>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("stub server address");
    let received = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&received);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let routes = routes.clone();
            let log = Arc::clone(&log);
            tokio::spawn(async move {
                let mut buffer = Vec::new();
                let mut chunk = [0u8; 4096];
                while !buffer.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buffer.extend_from_slice(&chunk[..n]),
                    }
                }
                let Some(request) = parse_request(&buffer) else {
                    return;
                };
                let (status, body) = routes
                    .iter()
                    .find(|route| route.path == request.path())
                    .map(|route| (route.status, route.body.clone()))
                    .unwrap_or((404, "{}".to_string()));
                log.lock().expect("request log lock").push(request);

                let response = format!(
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{addr}"), received)
}

fn parse_request(buffer: &[u8]) -> Option<ReceivedRequest> {
    let text = String::from_utf8_lossy(buffer);
    let mut lines = text.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();
    let headers = lines
        .take_while(|line| !line.is_empty())
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect();
    Some(ReceivedRequest {
        method,
        target,
        headers,
    })
}
