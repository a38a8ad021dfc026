#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::io::Cursor;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};
#[cfg(not(target_arch = "wasm32"))]
use tiny_http::{Header, Response, Server, StatusCode};

/// Serves the browser front-end (page, script and wasm bundle) for local play.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
struct Opts {
    /// Address to listen on
    #[arg(default_value = "127.0.0.1:8080")]
    addr: String,
    /// Directory holding index.html and the wasm-pack output
    #[arg(long, default_value = "web")]
    root: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();
    let root = std::env::current_dir()?.join(&opts.root);
    if !root.exists() {
        anyhow::bail!("web directory not found at {}", root.display());
    }

    let server = Server::http(&opts.addr).map_err(|e| anyhow::anyhow!(e))?;
    log::info!("serving {} on http://{}", root.display(), opts.addr);
    for request in server.incoming_requests() {
        let url = request.url().to_string();
        let method = request.method().to_string();
        let status = match sanitize_path(&root, url.split('?').next().unwrap_or("/")) {
            Some(p) => match fs::File::open(&p) {
                Ok(file) => {
                    let mut resp = Response::from_file(file).with_status_code(StatusCode(200));
                    if let Ok(h) = Header::from_bytes("Content-Type", content_type_for(&p).as_bytes()) {
                        resp.add_header(h);
                    }
                    if let Err(e) = request.respond(resp) {
                        log::warn!("{} {}: {}", method, url, e);
                    }
                    200
                }
                Err(_) => {
                    let _ = request.respond(not_found_response());
                    404
                }
            },
            None => {
                let _ = request.respond(not_found_response());
                404
            }
        };
        log::info!("{} {} -> {}", method, url, status);
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn sanitize_path(root: &Path, url: &str) -> Option<PathBuf> {
    if url.split('/').any(|seg| seg == "..") {
        return None;
    }
    let rel = if url == "/" { "index.html" } else { url.trim_start_matches('/') };
    let full = root.join(rel);
    let path = if full.is_dir() {
        full.join("index.html")
    } else {
        full
    };
    if path.exists() && path.starts_with(root) {
        Some(path)
    } else {
        None
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "html" => "text/html; charset=utf-8",
        "js" => "application/javascript",
        "wasm" => "application/wasm",
        "json" => "application/json",
        "css" => "text/css",
        _ => "application/octet-stream",
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn not_found_response() -> Response<Cursor<Vec<u8>>> {
    Response::from_string("Not Found").with_status_code(StatusCode(404))
}
