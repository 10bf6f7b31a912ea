//! A small service wiring its configuration from files.
//!
//! This example demonstrates:
//! - Building a `Config` from a primary file plus a named secrets file
//! - References into the secrets file and back into the primary file
//! - Reading through `of` prefix views
//! - Defaults registered on a view after construction
//! - Decoding a subtree with `unmarshal` and handling the failure
//!
//! Run with: cargo run --example service_config

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use xref_config::prelude::*;

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    url: String,
    password: String,
    max_connections: u32,
}

const SERVICE_YAML: &str = r#"
server:
  port: 8080
  readtimeout: 10s
hosts:
  orders: http://orders.internal
clients:
  orders:
    baseurl: "${this:hosts.orders}"
database:
  url: postgres://db.internal/app
  password: "${secrets:database.password}"
  max_connections: 20
"#;

const SECRETS_TOML: &str = r#"
[database]
password = "hunter2"
"#;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let scratch = TempDir::new()?;
    let service_path = scratch.path().join("service.yaml");
    let secrets_path = scratch.path().join("secrets.toml");
    fs::write(&service_path, SERVICE_YAML)?;
    fs::write(&secrets_path, SECRETS_TOML)?;

    let config = Config::from_paths(
        &service_path,
        HashMap::from([("secrets".to_string(), secrets_path)]),
    )?;
    println!("sources: {:?}", config.source_names());

    let server = config.of("server");
    server.set_default("bodylimit", 4 * 1024 * 1024);
    server.set_default("healthcheck.endpoints.liveness", "/__monitor/live");

    let port = server.get_int("port")?;
    let read_timeout: Duration = server.get_duration("readtimeout")?;
    println!("server listens on :{port} (read timeout {read_timeout:?})");
    println!("server keys: {:?}", server.keys());

    let orders = config.of("clients").of("orders");
    println!("orders client -> {}", orders.get_string("baseurl")?);

    match config.unmarshal::<DatabaseConfig>("database") {
        Ok(database) => println!(
            "database {} ({} connections, password {} chars)",
            database.url,
            database.max_connections,
            database.password.len()
        ),
        Err(err) => eprintln!("database disabled: {err}"),
    }

    Ok(())
}
