//! Embedded dashboard assets

use axum::{http::header, response::IntoResponse};

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const DASHBOARD_JS: &str = include_str!("../../assets/dashboard.js");

/// GET / - Dashboard page
pub async fn dashboard_page() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], INDEX_HTML)
}

/// GET /dashboard.js - Dashboard script (kept out of the page for the CSP)
pub async fn dashboard_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        DASHBOARD_JS,
    )
}
