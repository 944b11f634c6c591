//! Core data model for the video sharing service.
//!
//! The single entity maps to the `videos` table via `sqlx::FromRow` and
//! serializes naturally as JSON via `serde`.

pub mod video;
