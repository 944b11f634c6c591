//! Represents one uploaded video entry.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single row in the `videos` table.
///
/// The record stores display metadata and the names of the two files written
/// during upload; the file bytes themselves live under the public directory
/// (`videos/` for the clip, `images/` for the thumbnail).
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct VideoRecord {
    /// Store-generated identifier (SQLite rowid).
    pub id: i64,

    /// Display name entered in the upload form. Not unique.
    pub name: String,

    /// Filename of the stored video under `<public>/videos/`.
    pub video_filename: String,

    /// Filename of the stored thumbnail under `<public>/images/`.
    pub image_filename: String,
}
