//! Viewer page handler.
//!
//! Serves the single-page Leaflet viewer compiled into the binary. The page
//! drives the JSON/PNG endpoints; the server carries no other static assets.

use axum::response::Html;

const VIEWER_PAGE: &str = include_str!("../../static/viewer.html");

/// Handle GET / requests
pub async fn viewer_handler() -> Html<&'static str> {
    Html(VIEWER_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_references_api_endpoints() {
        assert!(VIEWER_PAGE.contains("/frame"));
        assert!(VIEWER_PAGE.contains("/legend"));
    }
}
