//! Static HTML pages: the submission form, the live feed, and the admin list.
//!
//! The pages are self-contained (inline CSS and JS) and talk to the JSON API
//! from the browser.

use axum::{Router, response::Html, routing::get};

const INDEX_HTML: &str = include_str!("../assets/index.html");
const LIVE_HTML: &str = include_str!("../assets/live.html");
const ADMIN_HTML: &str = include_str!("../assets/admin.html");

pub fn router() -> Router {
  Router::new()
    .route("/", get(index))
    .route("/live", get(live))
    .route("/admin", get(admin))
}

/// `GET /` — submission form.
async fn index() -> Html<&'static str> { Html(INDEX_HTML) }

/// `GET /live` — loads `/frases`, then follows `/live/events`.
async fn live() -> Html<&'static str> { Html(LIVE_HTML) }

/// `GET /admin` — edit and delete.
async fn admin() -> Html<&'static str> { Html(ADMIN_HTML) }
