use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// GET /
///
/// Static landing page driving the two lookup endpoints.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
