//! Landing page.

use crate::api::health::MISC_TAG;
use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Serve the landing page. Its script polls `/api/profile` to pick the view.
#[utoipa::path(
    get,
    path = "/",
    tag = MISC_TAG,
    operation_id = "Landing Page",
    summary = "Landing page",
    responses(
        (status = 200, description = "Landing page HTML", content_type = "text/html")
    )
)]
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
