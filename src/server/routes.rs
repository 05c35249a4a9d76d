use std::path::Path;

use tracing::warn;

use crate::server::api::{self, ApiError};

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

fn json_ok(payload: String) -> HttpResponse {
    HttpResponse {
        status_code: 200,
        status_text: "OK",
        content_type: "application/json",
        body: payload,
    }
}

fn respond(result: Result<String, ApiError>) -> HttpResponse {
    match result {
        Ok(payload) => json_ok(payload),
        Err(err) => {
            let (status_code, status_text) = err.status();
            if status_code >= 500 {
                warn!(status_code, error = %err, "request failed");
            }
            error_response(status_code, status_text, &err.to_string())
        }
    }
}

/// Split `/api/<collection>/<id>[/<action>]` into id and action.
fn id_and_action<'a>(path: &'a str, prefix: &str) -> Option<(&'a str, Option<&'a str>)> {
    let rest = path.split('?').next()?.strip_prefix(prefix)?;
    let mut parts = rest.split('/').filter(|p| !p.is_empty());
    let id = parts.next()?;
    let action = parts.next();
    if parts.next().is_some() {
        return None;
    }
    Some((id, action))
}

pub fn route_request(method: &str, path: &str, body: &str, store_path: &Path) -> HttpResponse {
    let bare = path.split('?').next().unwrap_or(path);
    match (method, bare) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "text/html; charset=utf-8",
            body: index_html(),
        },
        ("GET", "/api/health") => respond(api::health_payload()),
        ("GET", "/api/modes") => respond(api::modes_payload()),
        ("GET", "/api/tracks") => respond(api::tracks_payload(store_path, path)),
        ("POST", "/api/tracks") => respond(api::add_track_payload(store_path, body)),
        ("GET", "/api/chart") => respond(api::chart_payload(store_path, path)),
        ("POST", "/api/chart") => respond(api::chart_from_snapshot_payload(body)),
        (method, bare) if bare.starts_with("/api/tracks/") => {
            match (method, id_and_action(bare, "/api/tracks/")) {
                ("DELETE", Some((id, None))) => respond(api::delete_track_payload(store_path, id)),
                ("POST", Some((id, Some("results")))) => {
                    respond(api::add_result_payload(store_path, id, body))
                }
                ("POST", Some((id, Some("miss")))) => respond(api::add_miss_payload(store_path, id)),
                _ => not_found(),
            }
        }
        (method, bare) if bare.starts_with("/api/results/") => {
            match (method, id_and_action(bare, "/api/results/")) {
                ("DELETE", Some((id, None))) => respond(api::delete_result_payload(store_path, id)),
                ("PUT", Some((id, None))) => {
                    respond(api::update_outcome_payload(store_path, id, body))
                }
                ("POST", Some((id, Some("toggle")))) => {
                    respond(api::toggle_target_payload(store_path, id))
                }
                _ => not_found(),
            }
        }
        ("DELETE", bare) if bare.starts_with("/api/modes/") => {
            match id_and_action(bare, "/api/modes/") {
                Some((mode, None)) => respond(api::clear_mode_payload(store_path, mode)),
                _ => not_found(),
            }
        }
        _ => not_found(),
    }
}

fn not_found() -> HttpResponse {
    error_response(404, "Not Found", "Route not found")
}

pub fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn index_html() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Artian Chart Console</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 900px; margin: 24px auto; padding: 0 12px; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 12px; margin-bottom: 12px; }
    pre { background: #f6f8fa; padding: 12px; border-radius: 8px; overflow: auto; }
    button { margin-top: 8px; }
  </style>
</head>
<body>
  <h1>Artian Chart Console</h1>

  <div class="card">
    <strong>Chart</strong>
    <label for="mode">Mode</label>
    <select id="mode">
      <option value="normal_restore">Normal Restore</option>
      <option value="gogma_skill">Gogma Skill Reroll</option>
      <option value="gogma_restore">Gogma Restore</option>
    </select>
    <div>
      <button id="tracks-btn">GET /api/tracks</button>
      <button id="chart-btn">GET /api/chart</button>
    </div>
  </div>

  <pre id="output">Ready.</pre>

  <script>
    const output = document.getElementById('output');
    const modeEl = document.getElementById('mode');
    async function request(path) {
      output.textContent = 'Loading…';
      const response = await fetch(path);
      output.textContent = 'HTTP ' + response.status + '\n' + await response.text();
    }
    document.getElementById('tracks-btn').addEventListener('click', () => {
      request('/api/tracks?mode=' + modeEl.value);
    });
    document.getElementById('chart-btn').addEventListener('click', () => {
      request('/api/chart?mode=' + modeEl.value);
    });
  </script>
</body>
</html>
"#
    .to_string()
}
