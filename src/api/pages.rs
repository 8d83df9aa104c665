use axum::{extract::State, response::Html, routing::get, Router};

use crate::state::AppState;

const LOGIN_PAGE: &str = include_str!("../../static/login.html");
const CONFERENCE_PAGE: &str = include_str!("../../static/index.html");
const PUBLIC_URL_PLACEHOLDER: &str = "{{PUBLIC_PLATFORM_URL}}";

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(conference_page))
        .route("/login", get(login_page))
}

/// GET /login
async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

/// GET / - Conferencing page with the public platform URL filled in
async fn conference_page(State(state): State<AppState>) -> Html<String> {
    let public_url = state.config.public_url().unwrap_or_default();
    Html(render_conference_page(public_url))
}

fn render_conference_page(public_url: &str) -> String {
    let escaped = serde_json::to_string(public_url).unwrap_or_else(|_| "\"\"".to_string());
    CONFERENCE_PAGE.replace(PUBLIC_URL_PLACEHOLDER, &escaped)
}
