//! Route definition parser.
//!
//! # Responsibilities
//! - Split a file into definitions on `###` separator lines
//! - Parse the `<method> <url>` request line of each definition
//! - Collect headers up to the first blank line, including the status code
//! - Collect everything after the blank line as the response body
//!
//! # Design Decisions
//! - The whole separator line is consumed, so `### Get user` can title a definition
//! - Malformed header lines are skipped; a malformed request line fails the file
//! - Trailing blank body lines are dropped, interior ones kept verbatim

use regex::Regex;
use std::sync::OnceLock;

use crate::httpfile::error::{FormatError, FormatErrorKind};
use crate::httpfile::route::Route;

/// Marks the boundary between two definitions in one file.
pub const DEFINITION_SEPARATOR: &str = "###";

/// Header carrying the response status, e.g. `Status-Code: HTTP/1.1 404 Not Found`.
pub const STATUS_CODE_HEADER: &str = "Status-Code";

static REQUEST_LINE: OnceLock<Regex> = OnceLock::new();
static HEADER_LINE: OnceLock<Regex> = OnceLock::new();
static STATUS_LINE: OnceLock<Regex> = OnceLock::new();

fn request_line() -> &'static Regex {
    REQUEST_LINE
        .get_or_init(|| Regex::new(r"^(\w+)\s+(\S+)").expect("request line pattern is valid"))
}

fn header_line() -> &'static Regex {
    HEADER_LINE.get_or_init(|| Regex::new(r"^([\w-]+)\s*:(.*)$").expect("header pattern is valid"))
}

fn status_line() -> &'static Regex {
    STATUS_LINE.get_or_init(|| {
        Regex::new(r"^HTTP/\d(?:\.\d)?\s+(\d{3})\b").expect("status line pattern is valid")
    })
}

/// Parse every definition in `content`, in file order.
///
/// `file_name` is recorded on each route and in errors.
pub fn parse_routes(file_name: &str, content: &str) -> Result<Vec<Route>, FormatError> {
    if content.trim().is_empty() {
        return Err(FormatError::new(file_name, 1, FormatErrorKind::Empty));
    }

    let mut routes = Vec::new();
    let mut current: Option<Definition<'_>> = None;

    for (idx, line) in content.lines().enumerate() {
        if is_separator(line) {
            if let Some(definition) = current.take() {
                routes.push(definition.finish());
            }
            continue;
        }

        match current.as_mut() {
            Some(definition) => definition.push_line(line, idx + 1),
            None if is_blank(line) || is_comment(line) => {}
            None => current = Some(Definition::start(file_name, line, idx + 1)?),
        }
    }

    if let Some(definition) = current {
        routes.push(definition.finish());
    }

    tracing::debug!(file = %file_name, routes = routes.len(), "Parsed route definitions");
    Ok(routes)
}

/// A definition being accumulated line by line.
struct Definition<'a> {
    route: Route,
    in_body: bool,
    body: Vec<&'a str>,
}

impl<'a> Definition<'a> {
    fn start(file_name: &str, line: &str, line_no: usize) -> Result<Self, FormatError> {
        let trimmed = line.trim();
        let caps = request_line().captures(trimmed).ok_or_else(|| {
            FormatError::new(
                file_name,
                line_no,
                FormatErrorKind::BadRequestLine(trimmed.to_string()),
            )
        })?;

        let route = Route::new(file_name, &caps[1], &caps[2]);
        if !route.url_valid {
            return Err(FormatError::new(
                file_name,
                line_no,
                FormatErrorKind::InvalidUrl(route.url),
            ));
        }

        Ok(Self {
            route,
            in_body: false,
            body: Vec::new(),
        })
    }

    fn push_line(&mut self, line: &'a str, line_no: usize) {
        if self.in_body {
            self.body.push(line);
            return;
        }

        if is_blank(line) {
            self.in_body = true;
            return;
        }
        if is_comment(line) {
            return;
        }

        let line = line.trim();
        if let Some(status) = parse_status_line(line) {
            self.route.status_code = status;
            return;
        }

        match header_line().captures(line) {
            Some(caps) => {
                let name = &caps[1];
                let value = caps[2].trim();
                if name.eq_ignore_ascii_case(STATUS_CODE_HEADER) {
                    match parse_status(value) {
                        Some(status) => self.route.status_code = status,
                        None => tracing::warn!(
                            file = %self.route.file_name,
                            line = line_no,
                            value = %value,
                            "Unrecognised status code, keeping {}",
                            self.route.status_code
                        ),
                    }
                } else {
                    self.route.headers.insert(name, value);
                }
            }
            None => tracing::debug!(
                file = %self.route.file_name,
                line = line_no,
                "Ignoring malformed header line"
            ),
        }
    }

    fn finish(mut self) -> Route {
        while self.body.last().is_some_and(|l| is_blank(l)) {
            self.body.pop();
        }
        self.route.body = self.body.join("\n");
        self.route
    }
}

fn is_separator(line: &str) -> bool {
    line.trim_start().starts_with(DEFINITION_SEPARATOR)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn parse_status_line(line: &str) -> Option<u16> {
    let caps = status_line().captures(line)?;
    caps[1].parse().ok().filter(|code| (100..=999).contains(code))
}

/// Accepts either a status line or a bare code.
fn parse_status(value: &str) -> Option<u16> {
    parse_status_line(value).or_else(|| {
        value
            .parse::<u16>()
            .ok()
            .filter(|code| (100..=999).contains(code))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_definitions_in_file_order() {
        let content = "GET /test1\n \n{ \"message\":\"OK\" }\n###\nPOST /test2\n \n{ \"message\":\"OK\" }\n";
        let routes = parse_routes("testFile1.http", content).unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].method, "GET");
        assert_eq!(routes[0].url, "/test1");
        assert_eq!(routes[0].body, "{ \"message\":\"OK\" }");
        assert_eq!(routes[1].method, "POST");
        assert_eq!(routes[1].url, "/test2");
        assert!(routes.iter().all(|r| r.file_name == "testFile1.http"));
    }

    #[test]
    fn test_headers_and_status() {
        let content = "\
# leading comment
PUT /test4/4?param={{pv1}}
Content-Type: application/json
# comment between headers
Status-Code: HTTP/1.1 201 Created
not a header line
X-Empty:

{\"message\":\"OK\",\"test\":\"{pv1}\"}
# this stays in the body
";
        let routes = parse_routes("put.http", content).unwrap();
        let route = &routes[0];

        assert_eq!(route.status_code, 201);
        assert_eq!(route.headers.len(), 2);
        assert_eq!(route.headers.get("content-type"), Some("application/json"));
        assert_eq!(route.headers.get("X-Empty"), Some(""));
        assert!(route.headers.get(STATUS_CODE_HEADER).is_none());
        assert_eq!(
            route.body,
            "{\"message\":\"OK\",\"test\":\"{pv1}\"}\n# this stays in the body"
        );
    }

    #[test]
    fn test_status_variants() {
        let content = "GET /a\nStatus-Code: 404\n###\nGET /b\nHTTP/1.1 503 Service Unavailable\n";
        let routes = parse_routes("s.http", content).unwrap();
        assert_eq!(routes[0].status_code, 404);
        assert_eq!(routes[1].status_code, 503);

        let routes = parse_routes("s.http", "GET /c\nStatus-Code: soon\n").unwrap();
        assert_eq!(routes[0].status_code, 200);
    }

    #[test]
    fn test_titled_separator_and_empty_parts() {
        let content = "### List users\nGET /users\n\n[]\n\n\n### \n###\n# only a comment\n### Get one\nGET /users/{{id}}\n";
        let routes = parse_routes("users.http", content).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].body, "[]");
        assert_eq!(routes[1].url_path, "/users/{{id}}");
        assert_eq!(routes[1].body, "");
    }

    #[test]
    fn test_bad_request_line_reports_location() {
        let err = parse_routes("bad.http", "GET /ok\n###\n\n  GARBAGE\n").unwrap_err();
        assert_eq!(err.file, "bad.http");
        assert_eq!(err.line, 4);
        assert_eq!(err.kind, FormatErrorKind::BadRequestLine("GARBAGE".into()));
        assert!(err.to_string().starts_with("bad.http:4:"));
    }

    #[test]
    fn test_invalid_url_fails() {
        let err = parse_routes("bad.http", "GET ftp://x/y\n").unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::InvalidUrl("ftp://x/y".into()));
    }

    #[test]
    fn test_empty_content_fails() {
        let err = parse_routes("empty.http", "  \n\t\n").unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::Empty);
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "GET /a\r\nAccept: */*\r\n\r\nline1\r\nline2\r\n";
        let routes = parse_routes("win.http", content).unwrap();
        assert_eq!(routes[0].headers.get("accept"), Some("*/*"));
        assert_eq!(routes[0].body, "line1\nline2");
    }

    #[test]
    fn test_structural_fields_round_trip() {
        let urls = ["/a/b?x=1&y=2", "/", "http://h.com/p/{{v}}?q={{w}}", "/x?"];
        for url in urls {
            let routes = parse_routes("rt.http", &format!("DELETE {url}\n")).unwrap();
            let route = &routes[0];
            assert_eq!(route.method, "DELETE");
            let rebuilt: Vec<_> = route.path_segments.iter().map(|s| s.text.as_str()).collect();
            assert_eq!(rebuilt.join("/"), route.url_path);
            assert!(url.ends_with(&format!("{}{}", route.url_path, route.query_string)));
        }
    }
}
