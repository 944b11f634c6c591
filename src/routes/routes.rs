//! Defines the page and health routes.
//!
//! ## Structure
//! - **Pages**
//!   - `GET  /`            — homepage listing
//!   - `GET  /upload`      — upload form
//!   - `POST /upload`      — multipart submit (`name`, `video`, `image`)
//!   - `GET  /manage`      — management listing with delete controls
//!   - `POST /delete/{id}` — remove files and row
//!   - `GET  /watch/{id}`  — player page
//!
//! - **Health endpoints** (mounted at root)
//!   - `GET /healthz`, `GET /readyz`
//!
//! Everything else falls through to static file serving rooted at the public
//! directory, which is where uploaded media lives (`/videos/...`,
//! `/images/...`).

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        video_handlers::{delete_video, homepage, manage, submit_upload, upload_form, watch},
    },
    services::media_library::MediaLibrary,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::path::Path;
use tower_http::services::ServeDir;

/// Build and return the router for all routes.
///
/// The router carries shared state (`MediaLibrary`) to all handlers; static
/// media under `public_dir` is served by the fallback service.
pub fn routes(public_dir: &Path) -> Router<MediaLibrary> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // page routes
        .route("/", get(homepage))
        .route("/upload", get(upload_form).post(submit_upload))
        .route("/manage", get(manage))
        .route("/delete/{id}", post(delete_video))
        .route("/watch/{id}", get(watch))
        // uploaded media (and anything else placed under the public dir)
        .fallback_service(ServeDir::new(public_dir))
}
