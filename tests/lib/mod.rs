#![allow(dead_code)]
#![allow(unused_imports)]

mod limited;
pub use limited::Limited;

pub fn tracing_init() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // From env var: `RUST_LOG`
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

/// Joins parts into a body delimited by `--boundary`.
pub fn body(boundary: &str, parts: &[&str]) -> String {
    let mut body = String::new();
    for part in parts {
        body.push_str("--");
        body.push_str(boundary);
        body.push_str("\r\n");
        body.push_str(part);
        body.push_str("\r\n");
    }
    body.push_str("--");
    body.push_str(boundary);
    body.push_str("--\r\n");
    body
}

pub fn field(name: &str, value: &str) -> String {
    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
}

pub fn file(name: &str, filename: &str, content_type: &str, value: &str) -> String {
    format!(
        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
         Content-Type: {content_type}\r\n\r\n{value}"
    )
}
