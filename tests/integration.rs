use std::io::{Seek, Write};
use std::net::SocketAddr;
use std::sync::Arc;

use config::FileFormat;
use tempfile::{Builder, NamedTempFile};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use rax_secret_service::auth::{Hasher, ValidateResult, ValidatorRegistry};
use rax_secret_service::config::ServerConfig;
use rax_secret_service::protocol::ServiceContext;
use rax_secret_service::server::Server;

// Cheap Argon2 parameters keep the suite fast.
const SERVER: &str = r#"
[server]
bind_address = "127.0.0.1"
port = 0
max_clients = 2
max_request_length = 256

[server.hashing]
memory_kib = 64
iterations = 1
parallelism = 1
"#;

const WIFI: &str = r#"
[[secrets]]
secret = "wifi"
value = "abc123"
"#;

const DOORS: &str = r#"
[[groups]]
group = "doors"
secrets = [
    { secret = "front", value = "111" },
    { secret = "back", value = "222" },
]
"#;

fn registry_from(body: &str) -> ValidatorRegistry {
    let (startup, secrets) = ServerConfig::parse(&format!("{SERVER}{body}"), FileFormat::Toml)
        .unwrap()
        .split();
    let hasher = Hasher::new(&startup.hashing).unwrap();
    ValidatorRegistry::new(hasher, &secrets).unwrap()
}

fn write_config(file: &mut NamedTempFile, body: &str) {
    let handle = file.as_file_mut();
    handle.set_len(0).unwrap();
    handle.rewind().unwrap();
    write!(handle, "{SERVER}{body}").unwrap();
    handle.flush().unwrap();
}

fn config_file() -> NamedTempFile {
    Builder::new().suffix(".toml").tempfile().unwrap()
}

async fn start_server(file: &NamedTempFile) -> SocketAddr {
    let path = file.path().to_str().unwrap().to_string();
    let (startup, secrets) = ServerConfig::load(&path).unwrap().split();
    let hasher = Hasher::new(&startup.hashing).unwrap();
    let registry = ValidatorRegistry::new(hasher, &secrets).unwrap();

    let server = Server::bind(startup, ServiceContext::new(Arc::new(registry), path))
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move { server.start().await });
    addr
}

struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Connection {
    async fn open(addr: SocketAddr) -> Self {
        let (read_half, writer) = TcpStream::connect(addr).await.unwrap().into_split();
        Self {
            reader: BufReader::new(read_half),
            writer,
        }
    }

    async fn send(&mut self, request: &str) -> String {
        self.writer
            .write_all(format!("{request}\n").as_bytes())
            .await
            .unwrap();
        self.read().await
    }

    async fn read(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).await.unwrap();
        line.trim_end().to_string()
    }
}

fn check(name: &str, value: &str, full: bool) -> String {
    format!(
        r#"{{"service":"check_secret","name":"{name}","value":"{value}","full_response":{full}}}"#
    )
}

#[test]
fn wifi_scenario() {
    let registry = registry_from(WIFI);
    assert_eq!(registry.validate("wifi", "abc123"), ValidateResult::Success);
    assert_eq!(registry.validate("wifi", "abc124"), ValidateResult::FailedInvalid);
    assert_eq!(registry.validate("wifi", "abc123x"), ValidateResult::FailedInvalid);
    assert_eq!(registry.validate("printer", "abc123"), ValidateResult::FailedInvalid);
}

#[test]
fn doors_scenario() {
    let registry = registry_from(DOORS);
    assert_eq!(registry.validate("doors", "111"), ValidateResult::Success);
    assert_eq!(registry.validate("doors", "222"), ValidateResult::Success);
    assert_eq!(registry.validate("doors", "333"), ValidateResult::FailedInvalid);
    assert_eq!(registry.validate("doors", "112"), ValidateResult::FailedInvalid);
}

#[test]
fn repeated_checks_are_idempotent() {
    let registry = registry_from(&format!("{WIFI}{DOORS}"));
    for _ in 0..3 {
        assert_eq!(registry.validate("wifi", "abc123"), ValidateResult::Success);
        assert_eq!(registry.validate("doors", "222"), ValidateResult::Success);
        assert_eq!(registry.validate("doors", "abc123"), ValidateResult::FailedInvalid);
    }
}

#[test]
fn group_with_duplicate_values_is_rejected() {
    let (startup, secrets) = ServerConfig::parse(
        &format!(
            "{SERVER}\n[[groups]]\ngroup = \"doors\"\nsecrets = [{{ secret = \"a\", value = \"1\" }}, {{ secret = \"b\", value = \"1\" }}]\n"
        ),
        FileFormat::Toml,
    )
    .unwrap()
    .split();
    let hasher = Hasher::new(&startup.hashing).unwrap();
    assert!(ValidatorRegistry::new(hasher, &secrets).is_err());
}

#[tokio::test]
async fn check_secret_over_tcp() {
    let mut file = config_file();
    write_config(&mut file, &format!("{WIFI}{DOORS}"));
    let addr = start_server(&file).await;
    let mut conn = Connection::open(addr).await;

    assert_eq!(conn.send(&check("wifi", "abc123", false)).await, r#"{"result":true}"#);
    assert_eq!(conn.send(&check("wifi", "abc124", false)).await, r#"{"result":false}"#);
    assert_eq!(conn.send(&check("wifi", "abc123", true)).await, r#"{"result":"success"}"#);
    assert_eq!(
        conn.send(&check("printer", "abc123", true)).await,
        r#"{"result":"failed_invalid"}"#
    );
    assert_eq!(conn.send(&check("doors", "222", false)).await, r#"{"result":true}"#);
    assert_eq!(
        conn.send(r#"{"service":"check_secret","name":"wifi","value":"abc123"}"#)
            .await,
        r#"{"result":true}"#
    );
}

#[tokio::test]
async fn malformed_and_oversized_requests_get_errors() {
    let mut file = config_file();
    write_config(&mut file, WIFI);
    let addr = start_server(&file).await;
    let mut conn = Connection::open(addr).await;

    assert!(conn.send("not json").await.starts_with(r#"{"error":"Malformed request"#));
    assert!(
        conn.send(&"x".repeat(1024))
            .await
            .contains("Request exceeds maximum length of 256 bytes")
    );
    // The connection survives both
    assert_eq!(conn.send(&check("wifi", "abc123", false)).await, r#"{"result":true}"#);
}

#[tokio::test]
async fn reload_swaps_configuration() {
    let mut file = config_file();
    write_config(&mut file, WIFI);
    let addr = start_server(&file).await;
    let mut conn = Connection::open(addr).await;

    assert_eq!(conn.send(&check("wifi", "abc123", false)).await, r#"{"result":true}"#);

    write_config(&mut file, DOORS);
    assert_eq!(conn.send(r#"{"service":"reload"}"#).await, r#"{"reloaded":true}"#);

    assert_eq!(conn.send(&check("wifi", "abc123", false)).await, r#"{"result":false}"#);
    assert_eq!(conn.send(&check("doors", "111", false)).await, r#"{"result":true}"#);
}

#[tokio::test]
async fn failed_reload_keeps_previous_configuration() {
    let mut file = config_file();
    write_config(&mut file, WIFI);
    let addr = start_server(&file).await;
    let mut conn = Connection::open(addr).await;

    // Neither secrets nor groups
    write_config(&mut file, "");
    let response = conn.send(r#"{"service":"reload"}"#).await;
    assert!(response.starts_with(r#"{"error":"A valid config could not be found"#));

    assert_eq!(conn.send(&check("wifi", "abc123", false)).await, r#"{"result":true}"#);
}

#[tokio::test]
async fn connections_beyond_limit_are_refused() {
    let mut file = config_file();
    write_config(&mut file, WIFI);
    let addr = start_server(&file).await;

    let mut first = Connection::open(addr).await;
    let mut second = Connection::open(addr).await;
    // Round trips guarantee both connections hold a slot
    assert_eq!(first.send(&check("wifi", "abc123", false)).await, r#"{"result":true}"#);
    assert_eq!(second.send(&check("wifi", "abc123", false)).await, r#"{"result":true}"#);

    let mut third = Connection::open(addr).await;
    assert_eq!(
        third.read().await,
        r#"{"error":"Too many connections. Try again later."}"#
    );
}
