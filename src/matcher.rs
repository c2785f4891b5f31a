//! Segment-wise path matching shared by route matching and router prefix matching.

use crate::types::RouteParams;
use crate::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// The capture name a trailing `*` binds the rest of the path to in [`WildcardMode::Rest`].
pub const WILDCARD_PARAM: &str = "*";

/// One `/` delimited component of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment exactly.
    Literal(String),
    /// `:name`, binds the request segment under `name`.
    Capture(String),
    /// `*`
    Wildcard,
}

/// How a `*` segment behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WildcardMode {
    /// `*` ends the comparison and the whole path matches, whatever follows in the pattern or in
    /// the request. Segment counts are still compared first.
    #[default]
    ShortCircuit,
    /// A trailing `*` consumes zero or more remaining request segments and binds them, joined by
    /// `/`, under [`WILDCARD_PARAM`]. A `*` anywhere else matches exactly one segment.
    Rest,
}

impl FromStr for WildcardMode {
    type Err = String;

    fn from_str(s: &str) -> Result<WildcardMode, String> {
        match s {
            "short-circuit" => Ok(WildcardMode::ShortCircuit),
            "rest" => Ok(WildcardMode::Rest),
            other => Err(format!(
                "unknown wildcard mode {:?}, expected `short-circuit` or `rest`",
                other
            )),
        }
    }
}

impl Display for WildcardMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            WildcardMode::ShortCircuit => write!(f, "short-circuit"),
            WildcardMode::Rest => write!(f, "rest"),
        }
    }
}

/// Whether the request must match the whole pattern or only start with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Route matching: segment counts must agree unless the pattern was registered with a
    /// trailing `/`.
    Exact,
    /// Router prefix matching: the request may have more segments than the pattern.
    Prefix,
}

/// A parsed route pattern such as `/api/users/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl Pattern {
    /// Parses a pattern. Fails on a capture segment without a name.
    pub fn parse<P: Into<String>>(raw: P) -> crate::Result<Pattern> {
        let raw = raw.into();
        let trailing_slash = raw.len() > 1 && raw.ends_with('/');

        let segments = split_segments(&raw)
            .map(|seg| match seg {
                "*" => Ok(Segment::Wildcard),
                _ if seg.starts_with(':') => {
                    let name = &seg[1..];
                    if name.is_empty() {
                        Err(Error::invalid_pattern(raw.as_str(), "capture segment without a name"))
                    } else {
                        Ok(Segment::Capture(name.to_owned()))
                    }
                }
                _ => Ok(Segment::Literal(seg.to_owned())),
            })
            .collect::<crate::Result<Vec<_>>>()?;

        Ok(Pattern {
            raw,
            segments,
            trailing_slash,
        })
    }

    /// Parses the concatenation of a router prefix and a route path, e.g. `/api` + `/users/:id`.
    pub fn join(prefix: &str, path: &str) -> crate::Result<Pattern> {
        Pattern::parse(format!("{}{}", prefix, path))
    }

    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The pattern is `/` or empty.
    pub fn is_root(&self) -> bool {
        matches!(self.segments.as_slice(), [Segment::Literal(lit)] if lit.is_empty())
    }

    /// Matches a request path against this pattern.
    ///
    /// Returns the captured parameters on success and `None` when the path doesn't match. The
    /// result only depends on the arguments.
    pub fn match_path(&self, path: &str, mode: MatchMode, wildcard: WildcardMode) -> Option<RouteParams> {
        let path_segments = split_segments(path).collect::<Vec<_>>();
        let pattern_len = self.segments.len();

        match mode {
            MatchMode::Exact => {
                let rest_tail = wildcard == WildcardMode::Rest && self.segments.last() == Some(&Segment::Wildcard);
                let len_ok = path_segments.len() == pattern_len
                    || self.trailing_slash
                    || (rest_tail && path_segments.len() + 1 >= pattern_len);

                if !len_ok {
                    return None;
                }
            }
            MatchMode::Prefix => {
                if self.is_root() {
                    return Some(RouteParams::new());
                }
                if path_segments.len() < pattern_len {
                    return None;
                }
            }
        }

        let mut params = RouteParams::new();

        for (idx, segment) in self.segments.iter().enumerate() {
            let value = match path_segments.get(idx) {
                Some(value) => *value,
                None => {
                    if wildcard == WildcardMode::Rest && *segment == Segment::Wildcard {
                        params.set(WILDCARD_PARAM, "");
                    }
                    break;
                }
            };

            match segment {
                Segment::Literal(lit) if lit.is_empty() && value.is_empty() => continue,
                Segment::Wildcard => match wildcard {
                    WildcardMode::ShortCircuit => return Some(params),
                    WildcardMode::Rest if idx + 1 == pattern_len => {
                        params.set(WILDCARD_PARAM, path_segments[idx..].join("/"));
                        return Some(params);
                    }
                    WildcardMode::Rest => continue,
                },
                Segment::Capture(name) => params.set(name.as_str(), value),
                Segment::Literal(lit) => {
                    if lit != value {
                        return None;
                    }
                }
            }
        }

        Some(params)
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn split_segments(path: &str) -> std::str::Split<'_, char> {
    path.trim_matches('/').split('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(pattern: &str, path: &str) -> Option<RouteParams> {
        Pattern::parse(pattern)
            .unwrap()
            .match_path(path, MatchMode::Exact, WildcardMode::ShortCircuit)
    }

    fn prefix(pattern: &str, path: &str) -> Option<RouteParams> {
        Pattern::parse(pattern)
            .unwrap()
            .match_path(path, MatchMode::Prefix, WildcardMode::ShortCircuit)
    }

    #[test]
    fn should_capture_params() {
        let params = Pattern::join("/api/go", "/lol/:id")
            .unwrap()
            .match_path("/api/go/lol/42", MatchMode::Exact, WildcardMode::ShortCircuit)
            .unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert_eq!(params.len(), 1);

        let params = exact("/users/:userName/books/:bookName", "/users/alice/books/HarryPotter").unwrap();
        assert_eq!(params.get("userName").map(String::as_str), Some("alice"));
        assert_eq!(params.get("bookName").map(String::as_str), Some("HarryPotter"));
    }

    #[test]
    fn should_keep_the_last_capture_with_a_repeated_name() {
        let params = exact("/:id/:id", "/first/second").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("second"));
    }

    #[test]
    fn should_require_equal_segment_counts() {
        assert!(exact("/users/:id", "/users/1/books").is_none());
        assert!(exact("/users/:id", "/users").is_none());
        assert!(exact("/users", "/users/").is_some());
        assert!(exact("/about", "/contact").is_none());
    }

    #[test]
    fn should_match_the_root() {
        assert!(exact("/", "/").is_some());
        assert!(exact("", "/").is_some());
        assert!(exact("/", "/about").is_none());
    }

    #[test]
    fn should_tolerate_length_mismatch_with_a_trailing_slash() {
        let pattern = Pattern::join("/api/prohibited", "/").unwrap();
        for path in ["/api/prohibited", "/api/prohibited/", "/api/prohibited/deeper/still"] {
            assert!(pattern
                .match_path(path, MatchMode::Exact, WildcardMode::ShortCircuit)
                .is_some());
        }
        assert!(pattern
            .match_path("/api/other/x", MatchMode::Exact, WildcardMode::ShortCircuit)
            .is_none());
    }

    #[test]
    fn should_short_circuit_on_wildcard() {
        assert!(exact("/files/*", "/files/readme").is_some());
        assert!(exact("/files/*/meta", "/files/readme/anything").is_some());
        // counts are compared before the wildcard is reached
        assert!(exact("/files/*", "/files/a/b").is_none());
        assert!(exact("/files/*", "/other/readme").is_none());
    }

    #[test]
    fn should_consume_the_rest_in_rest_mode() {
        let pattern = Pattern::parse("/files/*").unwrap();
        let params = pattern
            .match_path("/files/a/b/c", MatchMode::Exact, WildcardMode::Rest)
            .unwrap();
        assert_eq!(params.get(WILDCARD_PARAM).map(String::as_str), Some("a/b/c"));

        let params = pattern
            .match_path("/files", MatchMode::Exact, WildcardMode::Rest)
            .unwrap();
        assert_eq!(params.get(WILDCARD_PARAM).map(String::as_str), Some(""));

        let inner = Pattern::parse("/files/*/meta").unwrap();
        assert!(inner
            .match_path("/files/readme/meta", MatchMode::Exact, WildcardMode::Rest)
            .is_some());
        assert!(inner
            .match_path("/files/readme/other", MatchMode::Exact, WildcardMode::Rest)
            .is_none());
    }

    #[test]
    fn should_match_prefixes() {
        assert!(prefix("/api/go", "/api/go/lol/42").is_some());
        assert!(prefix("/api/go", "/api/go").is_some());
        assert!(prefix("/api/go", "/api/http/32").is_none());
        assert!(prefix("/api/go", "/api").is_none());
        assert!(prefix("/", "/anything/at/all").is_some());
        assert!(prefix("", "/").is_some());

        let params = prefix("/tenants/:tenant", "/tenants/acme/users").unwrap();
        assert_eq!(params.get("tenant").map(String::as_str), Some("acme"));
    }

    #[test]
    fn should_match_idempotently() {
        let pattern = Pattern::parse("/lol/:id/:the_id_especial").unwrap();
        let first = pattern.match_path("/lol/1/2", MatchMode::Exact, WildcardMode::ShortCircuit);
        let second = pattern.match_path("/lol/1/2", MatchMode::Exact, WildcardMode::ShortCircuit);
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn should_reject_unnamed_captures() {
        assert!(matches!(
            Pattern::parse("/users/:"),
            Err(Error::InvalidPattern { .. })
        ));
    }

    #[test]
    fn should_parse_wildcard_modes() {
        assert_eq!("rest".parse::<WildcardMode>(), Ok(WildcardMode::Rest));
        assert_eq!(
            "short-circuit".parse::<WildcardMode>(),
            Ok(WildcardMode::ShortCircuit)
        );
        assert!("glob".parse::<WildcardMode>().is_err());
        assert_eq!(WildcardMode::Rest.to_string(), "rest");
    }
}
