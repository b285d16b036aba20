//! Request line and body construction for the two remote operations.
//!
//! Everything here is pure and deterministic: the same input always yields
//! the same url and body, byte for byte.

use n2c_logging::n2c_debug;
use serde_json::{Map, Value};

use crate::{ListingRequest, QueryRequest};

/// Remote API revision the client is written against.
pub const API_VERSION: &str = "2022-02-22";

pub fn database_query_url(base: &str, database_id: &str) -> String {
    format!("{base}/v1/databases/{database_id}/query")
}

/// `{base}/v1/blocks/{id}/children`, followed by the cursor and page size
/// that pass validation (cursor first). Invalid values are dropped, never raised.
pub fn block_children_url(base: &str, request: &ListingRequest) -> String {
    let mut url = format!("{base}/v1/blocks/{}/children", request.block_id);
    let mut params = Vec::with_capacity(2);
    match request.start_cursor.as_deref() {
        Some(cursor) if is_valid_cursor(cursor) => params.push(format!("start_cursor={cursor}")),
        Some(cursor) => n2c_debug!("dropping malformed start_cursor {:?}", cursor),
        None => {}
    }
    match request.page_size {
        Some(size) if is_valid_page_size(size) => params.push(format!("page_size={size}")),
        Some(size) => n2c_debug!("dropping non-positive page_size {}", size),
        None => {}
    }
    if !params.is_empty() {
        url.push('?');
        url.push_str(&params.join("&"));
    }
    url
}

/// Loose cursor check: lowercase hex digits and hyphens only, not a full UUID check.
pub fn is_valid_cursor(cursor: &str) -> bool {
    !cursor.is_empty()
        && cursor
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f' | b'-'))
}

pub fn is_valid_page_size(page_size: i64) -> bool {
    page_size > 0
}

/// JSON body of a query: the payload without the database id.
pub fn query_body(request: &QueryRequest) -> Result<String, serde_json::Error> {
    let payload: Map<String, Value> = request
        .payload
        .iter()
        .filter(|(key, _)| key.as_str() != "database_id")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    serde_json::to_string(&payload)
}

/// Headers sent with every request, in this order.
pub fn request_headers(token: &str) -> Vec<(String, String)> {
    vec![
        ("Authorization".to_string(), format!("Bearer {token}")),
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Notion-Version".to_string(), API_VERSION.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://api.notion.com";

    #[test]
    fn query_url_embeds_database_id() {
        assert_eq!(
            database_query_url(BASE, "dummy"),
            "https://api.notion.com/v1/databases/dummy/query"
        );
    }

    #[test]
    fn children_url_without_params_has_no_question_mark() {
        let url = block_children_url(BASE, &ListingRequest::new("dummy"));
        assert_eq!(url, "https://api.notion.com/v1/blocks/dummy/children");
    }

    #[test]
    fn children_url_puts_cursor_before_page_size() {
        let request = ListingRequest::new("dummy")
            .with_cursor("abc-123")
            .with_page_size(123);
        assert_eq!(
            block_children_url(BASE, &request),
            "https://api.notion.com/v1/blocks/dummy/children?start_cursor=abc-123&page_size=123"
        );
    }

    #[test]
    fn invalid_cursor_is_dropped() {
        for cursor in ["", "ABC", "abc 123", "abc&page_size=1", "xyz", "a/b"] {
            let request = ListingRequest::new("dummy").with_cursor(cursor);
            let url = block_children_url(BASE, &request);
            assert!(!url.contains("start_cursor"), "cursor {cursor:?} leaked into {url}");
        }
    }

    #[test]
    fn non_positive_page_size_is_dropped() {
        for size in [0, -1, i64::MIN] {
            let request = ListingRequest::new("dummy").with_page_size(size);
            assert!(!block_children_url(BASE, &request).contains("page_size"));
        }
        let request = ListingRequest::new("dummy")
            .with_cursor("nope!")
            .with_page_size(5);
        assert_eq!(
            block_children_url(BASE, &request),
            "https://api.notion.com/v1/blocks/dummy/children?page_size=5"
        );
    }

    #[test]
    fn uuid_cursor_is_accepted() {
        assert!(is_valid_cursor("59833787-2cf9-4fdf-8782-e53db20768a5"));
        assert!(is_valid_cursor("---"));
    }

    #[test]
    fn body_never_carries_database_id() {
        let mut request = QueryRequest::new("db").with("page_size", json!(10));
        request.payload.insert("database_id".into(), json!("db"));
        let body = query_body(&request).unwrap();
        assert_eq!(body, r#"{"page_size":10}"#);
    }

    #[test]
    fn empty_payload_is_empty_object() {
        assert_eq!(query_body(&QueryRequest::new("db")).unwrap(), "{}");
    }

    #[test]
    fn headers_are_fixed_and_ordered() {
        let headers = request_headers("tok");
        assert_eq!(
            headers,
            vec![
                ("Authorization".to_string(), "Bearer tok".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Notion-Version".to_string(), "2022-02-22".to_string()),
            ]
        );
    }
}
