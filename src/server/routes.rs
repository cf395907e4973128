use crate::data::data_registry::DataRegistry;
use crate::server::api;

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

fn ok_json(body: String) -> HttpResponse {
    HttpResponse {
        status_code: 200,
        status_text: "OK",
        content_type: "application/json",
        body,
    }
}

fn api_error_response(err: api::ApiError) -> HttpResponse {
    match err {
        api::ApiError::Parse(err) => {
            error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
        }
        api::ApiError::Validation(msg) => error_response(400, "Bad Request", &msg),
    }
}

pub fn route_request(method: &str, path: &str, body: &str, registry: &DataRegistry) -> HttpResponse {
    let route = path.split('?').next().unwrap_or(path);
    match (method, route) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "text/html; charset=utf-8",
            body: index_html(),
        },
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => ok_json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/illuvials") => match api::illuvials_payload(registry) {
            Ok(payload) => ok_json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/label") => match api::label_payload(registry, path) {
            Ok(payload) => ok_json(payload),
            Err(err) => api_error_response(err),
        },
        ("GET", "/api/data/version") => match api::data_version_payload(registry) {
            Ok(payload) => ok_json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("POST", "/api/team/add") => match api::team_add_payload(registry, body) {
            Ok(payload) => ok_json(payload),
            Err(err) => api_error_response(err),
        },
        ("POST", "/api/team/remove") => match api::team_remove_payload(registry, body) {
            Ok(payload) => ok_json(payload),
            Err(err) => api_error_response(err),
        },
        ("POST", "/api/breakdown") => match api::breakdown_payload(registry, body) {
            Ok(payload) => ok_json(payload),
            Err(err) => api_error_response(err),
        },
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
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
  <title>Illuvilytics API Console</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 900px; margin: 24px auto; padding: 0 12px; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 14px; margin: 14px 0; }
    label { display:block; margin: 8px 0 4px; font-weight: 600; }
    input { width: 100%; padding: 8px; box-sizing: border-box; }
    button { margin-top: 12px; padding: 8px 14px; }
    pre { background: #111; color: #aef2ae; padding: 12px; overflow: auto; border-radius: 6px; min-height: 180px; }
  </style>
</head>
<body>
  <h1>Illuvilytics Local API</h1>

  <div class="card">
    <button id="catalog-btn">GET /api/illuvials</button>
  </div>

  <div class="card">
    <strong>Team breakdown</strong>
    <label for="team">Illuvial ids (comma separated, up to 10)</label>
    <input id="team" value="" />
    <div><button id="breakdown-btn">POST /api/breakdown</button></div>
  </div>

  <pre id="output">Ready.</pre>

  <script>
    const output = document.getElementById('output');

    async function request(path, options) {
      output.textContent = 'Loading…';
      const response = await fetch(path, options);
      output.textContent = 'HTTP ' + response.status + '\n' + await response.text();
    }

    document.getElementById('catalog-btn').addEventListener('click', () => {
      request('/api/illuvials', { method: 'GET' });
    });

    document.getElementById('breakdown-btn').addEventListener('click', () => {
      const team = document.getElementById('team').value
        .split(',').map(s => s.trim()).filter(Boolean);
      request('/api/breakdown', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ team }),
      });
    });
  </script>
</body>
</html>
"#
    .to_string()
}
