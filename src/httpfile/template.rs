//! Response body templating.
//!
//! Replaces `{name}` with the value captured for `name`. Placeholders without
//! a capture are left as written, so JSON braces survive untouched.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

use crate::httpfile::route::BODY_PLACEHOLDER;
use crate::routing::CapturedVariables;

static BODY_VARIABLE: OnceLock<Regex> = OnceLock::new();

fn body_variable() -> &'static Regex {
    BODY_VARIABLE.get_or_init(|| {
        let pattern = format!(
            "{}([A-Za-z0-9_]+){}",
            regex::escape(BODY_PLACEHOLDER.open),
            regex::escape(BODY_PLACEHOLDER.close)
        );
        Regex::new(&pattern).expect("body placeholder pattern is valid")
    })
}

/// Substitute captured variables into `body`.
pub fn render_body<'a>(body: &'a str, variables: &CapturedVariables) -> Cow<'a, str> {
    if variables.is_empty() {
        return Cow::Borrowed(body);
    }

    body_variable().replace_all(body, |caps: &Captures<'_>| match variables.get(&caps[1]) {
        Some(value) => value.clone(),
        None => caps[0].to_string(),
    })
}
