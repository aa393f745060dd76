extern crate pretty_bytes;
extern crate querystring;
extern crate tiny_http;

use crate::result;

struct DebugResponse {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

impl DebugResponse {
    fn ok(content_type: &'static str, body: Vec<u8>) -> DebugResponse {
        return DebugResponse { status: 200, content_type: content_type, body: body };
    }

    fn not_found() -> DebugResponse {
        return DebugResponse {
            status: 404,
            content_type: "text/html",
            body: "<h1>404</h1><p>Not found!<p>".as_bytes().to_vec(),
        };
    }

    fn into_http(self) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
        let response = tiny_http::Response::from_data(self.body)
            .with_status_code(tiny_http::StatusCode(self.status));
        match tiny_http::Header::from_bytes(&b"Content-Type"[..], self.content_type.as_bytes()) {
            Ok(header) => return response.with_header(header),
            Err(_) => return response,
        }
    }
}

/// Serves the current PNG and the log files. Blocks forever.
pub fn run_debug_server(port: u16, local_png: Option<String>) -> result::MetroDashResult<()> {
    let server = tiny_http::Server::http(("0.0.0.0", port)).map_err(
        |err| result::make_error(&format!("Starting debug server on port {}: {}", port, err)))?;

    info!("Running debug HTTP server on port {}", port);

    for request in server.incoming_requests() {
        let response = match request.method() {
            tiny_http::Method::Get => route(request.url(), local_png.as_ref().map(String::as_str)),
            _ => DebugResponse::not_found(),
        };

        if let Err(err) = request.respond(response.into_http()) {
            warn!("Debug server response failed: {}", err);
        }
    }

    return Ok(());
}

fn route(url: &str, local_png: Option<&str>) -> DebugResponse {
    let (path, query) = match url.find('?') {
        Some(i) => (&url[..i], &url[i + 1..]),
        None => (url, ""),
    };

    let response = match path {
        "/" => main_page(local_png.is_some()),
        "/dumplog" => dump_log(query),
        "/current_image" => current_image(local_png),
        _ => None,
    };

    return response.unwrap_or_else(DebugResponse::not_found);
}

fn which_log(query: &str) -> Option<String> {
    for (k, v) in querystring::querify(query) {
        if k == "log" && v.ends_with(".log") && !v.contains('/') && !v.contains('\\') {
            return Some(v.to_string());
        }
    }

    return None;
}

fn current_image(local_png: Option<&str>) -> Option<DebugResponse> {
    let bytes = std::fs::read(local_png?).ok()?;
    return Some(DebugResponse::ok("image/png", bytes));
}

fn dump_log(query: &str) -> Option<DebugResponse> {
    let filename = which_log(query)?;
    let contents = std::fs::read(filename).ok()?;
    return Some(DebugResponse::ok("text/plain; charset=utf-8", contents));
}

fn main_page(has_local_png: bool) -> Option<DebugResponse> {
    let mut body = format!("<html><body><h1>metrodash debug server</h1><div>Version {}</div>",
                           env!("CARGO_PKG_VERSION"));

    if has_local_png {
        body.push_str("<div><h2>Current image</h2><img style='border: 1px solid black; image-rendering: pixelated; width: 384px;' src='/current_image' /></div>");
    }

    body.push_str("<div><h2>Log files</h2><ul>");
    for entry in std::fs::read_dir("./").ok()? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        let filename = entry.file_name().to_string_lossy().to_string();
        if filename.ends_with(".log") {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            body.push_str(&format!("<li><a href='/dumplog?log={}'>{}</a> [{}]</li>",
                                   filename, filename, pretty_bytes::converter::convert(size as f64)));
        }
    }
    body.push_str("</ul></div>");

    body.push_str("</body></html>");

    return Some(DebugResponse::ok("text/html; charset=utf-8", body.into_bytes()));
}

#[cfg(test)]
mod tests {
    #[test]
    fn which_log_only_allows_local_log_files() {
        assert_eq!(Some("metrodash.log".to_string()), super::which_log("log=metrodash.log"));
        assert_eq!(None, super::which_log("log=/etc/passwd"));
        assert_eq!(None, super::which_log("log=../secret.log"));
        assert_eq!(None, super::which_log("file=metrodash.log"));
        assert_eq!(None, super::which_log(""));
    }

    #[test]
    fn routes() {
        assert_eq!(404, super::route("/nope", None).status);
        assert_eq!(404, super::route("/current_image", None).status);
        assert_eq!(404, super::route("/dumplog?log=missing.log", None).status);

        let main = super::route("/", Some("out.png"));
        assert_eq!(200, main.status);
        let html = String::from_utf8(main.body).expect("utf8");
        assert!(html.contains("/current_image"));
    }

    #[test]
    fn serves_image_file() {
        let response = super::route("/current_image", Some("testdata/credentials.json"));
        assert_eq!(200, response.status);
        assert_eq!("image/png", response.content_type);
    }
}
