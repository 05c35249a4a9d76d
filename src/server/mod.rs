use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::AppConfig;

pub mod api;
pub mod request;
pub mod routes;

use request::{read_request, RequestError};
use routes::{error_response, HttpResponse};

pub fn run_server(config: &AppConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(&config.bind_addr)?;
    serve_listener(listener, &PathBuf::from(&config.store_path))
}

/// Accept loop on an already-bound listener.
pub fn serve_listener(listener: TcpListener, store_path: &Path) -> std::io::Result<()> {
    info!(
        bind_addr = %listener.local_addr()?,
        store = %store_path.display(),
        "artian server listening"
    );

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, store_path) {
                    warn!(error = %err, "request error");
                }
            }
            Err(err) => warn!(error = %err, "connection failed"),
        }
    }

    Ok(())
}

fn handle_connection(stream: &mut TcpStream, store_path: &Path) -> std::io::Result<()> {
    let response = match read_request(stream) {
        Ok(Some(request)) => {
            let response =
                routes::route_request(&request.method, &request.path, &request.body, store_path);
            debug!(
                method = %request.method,
                path = %request.path,
                body_bytes = request.body.len(),
                status = response.status_code,
                "handled request"
            );
            response
        }
        Ok(None) => return Ok(()),
        Err(RequestError::Io(err)) => return Err(err),
        Err(err @ RequestError::BodyTooLarge { .. }) => {
            error_response(413, "Payload Too Large", &err.to_string())
        }
        Err(err @ RequestError::HeadersTooLarge(_)) => {
            error_response(431, "Request Header Fields Too Large", &err.to_string())
        }
        Err(err) => error_response(400, "Bad Request", &err.to_string()),
    };
    write_response(stream, &response)
}

fn write_response(stream: &mut TcpStream, response: &HttpResponse) -> std::io::Result<()> {
    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()
}
