//! src/services/media_library.rs
//!
//! MediaLibrary — the upload/list/watch/delete operations backed by SQLite
//! for the `videos` table and local disk for the media payloads. Uploaded
//! clips land under `<public>/videos/` and thumbnails under
//! `<public>/images/`; the row only stores the generated filenames.

use crate::models::video::VideoRecord;
use bytes::Bytes;
use chrono::Utc;
use sqlx::SqlitePool;
use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

pub const VIDEOS_SUBDIR: &str = "videos";
pub const IMAGES_SUBDIR: &str = "images";

/// Destination directory for an uploaded file, derived from its declared
/// content type. Anything that is neither `video/*` nor `image/*` is
/// rejected before a single byte reaches disk or the database.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    pub fn from_content_type(content_type: &str) -> LibraryResult<Self> {
        if content_type.starts_with("video/") {
            Ok(Self::Video)
        } else if content_type.starts_with("image/") {
            Ok(Self::Image)
        } else {
            Err(LibraryError::UnsupportedMediaType(content_type.to_string()))
        }
    }

    pub fn subdir(self) -> &'static str {
        match self {
            Self::Video => VIDEOS_SUBDIR,
            Self::Image => IMAGES_SUBDIR,
        }
    }
}

/// One file part of the upload form, buffered by the handler.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("video `{0}` not found")]
    VideoNotFound(i64),
    #[error("unsupported media type `{0}`")]
    UnsupportedMediaType(String),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type LibraryResult<T> = Result<T, LibraryError>;

/// MediaLibrary provides the four persistence operations plus the two file
/// workflows built on top of them:
/// - Store an upload (writes both files to disk, then inserts the row)
/// - List all entries / fetch one by id
/// - Delete an entry (video file, then image file, then the row — strictly
///   in that order, aborting on the first failure)
///
/// No transactions: a failed insert leaves the already-written files behind,
/// and a failed file delete leaves the row behind. Both states are
/// inspectable rather than silently half-cleaned.
#[derive(Clone)]
pub struct MediaLibrary {
    /// Shared SQLite connection pool for the `videos` table.
    pub db: Arc<SqlitePool>,

    /// Base directory on disk where media payloads are stored and served
    /// from.
    pub public_dir: PathBuf,
}

impl MediaLibrary {
    /// Create a new MediaLibrary backed by the provided SQLite pool and
    /// using `public_dir` as the root directory for media payloads.
    pub fn new(db: Arc<SqlitePool>, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            db,
            public_dir: public_dir.into(),
        }
    }

    /// Create the `videos/` and `images/` subdirectories if missing.
    pub async fn ensure_layout(&self) -> LibraryResult<()> {
        fs::create_dir_all(self.media_dir(MediaKind::Video)).await?;
        fs::create_dir_all(self.media_dir(MediaKind::Image)).await?;
        Ok(())
    }

    fn media_dir(&self, kind: MediaKind) -> PathBuf {
        self.public_dir.join(kind.subdir())
    }

    /// Full on-disk path for a stored filename of the given kind.
    pub fn media_path(&self, kind: MediaKind, filename: &str) -> PathBuf {
        self.media_dir(kind).join(filename)
    }

    /// Generate a stored filename: current unix-millis timestamp plus the
    /// original file's extension. Two uploads of the same kind within the
    /// same millisecond collide; that hazard is accepted.
    fn timestamp_name(original_name: &str) -> String {
        let ext = Path::new(original_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        format!("{}{}", Utc::now().timestamp_millis(), ext)
    }

    /// Fetch every row of the `videos` table.
    ///
    /// No explicit ORDER BY: callers get underlying storage order, which is
    /// not guaranteed stable across calls.
    pub async fn list_all(&self) -> LibraryResult<Vec<VideoRecord>> {
        let rows = sqlx::query_as::<_, VideoRecord>(
            "SELECT id, name, video_filename, image_filename FROM videos",
        )
        .fetch_all(&*self.db)
        .await?;
        Ok(rows)
    }

    /// Fetch one row by id. Returns VideoNotFound if missing.
    pub async fn get_by_id(&self, id: i64) -> LibraryResult<VideoRecord> {
        sqlx::query_as::<_, VideoRecord>(
            "SELECT id, name, video_filename, image_filename FROM videos WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => LibraryError::VideoNotFound(id),
            other => LibraryError::Sqlx(other),
        })
    }

    /// Store a validated upload: write the video file, write the thumbnail,
    /// then insert the row.
    ///
    /// Both destinations are resolved from the declared content types before
    /// any byte is written, so an unsupported type aborts the request with
    /// nothing on disk and no database write. File writes happen before the
    /// insert; a failed insert leaves the files behind (no rollback).
    pub async fn store_upload(
        &self,
        name: &str,
        video: UploadFile,
        image: UploadFile,
    ) -> LibraryResult<VideoRecord> {
        if name.trim().is_empty() {
            return Err(LibraryError::MissingField("name"));
        }

        let video_kind = MediaKind::from_content_type(video.content_type.as_deref().unwrap_or(""))?;
        let image_kind = MediaKind::from_content_type(image.content_type.as_deref().unwrap_or(""))?;

        let video_filename = Self::timestamp_name(&video.original_name);
        let image_filename = Self::timestamp_name(&image.original_name);

        self.write_media(video_kind, &video_filename, &video.data)
            .await?;
        self.write_media(image_kind, &image_filename, &image.data)
            .await?;

        let record = sqlx::query_as::<_, VideoRecord>(
            "INSERT INTO videos (name, video_filename, image_filename) VALUES (?, ?, ?)
             RETURNING id, name, video_filename, image_filename",
        )
        .bind(name)
        .bind(&video_filename)
        .bind(&image_filename)
        .fetch_one(&*self.db)
        .await?;

        Ok(record)
    }

    async fn write_media(
        &self,
        kind: MediaKind,
        filename: &str,
        data: &[u8],
    ) -> LibraryResult<()> {
        let path = self.media_path(kind, filename);
        fs::write(&path, data).await?;
        debug!("wrote {} ({} bytes)", path.display(), data.len());
        Ok(())
    }

    /// Delete an entry: video file, image file, then the row.
    ///
    /// The ordering is strict and sequential. A failed file delete aborts
    /// before the next step, so nothing past the failure point is removed —
    /// in particular a missing video file leaves both the row and the
    /// thumbnail untouched.
    pub async fn delete(&self, id: i64) -> LibraryResult<()> {
        let record = self.get_by_id(id).await?;

        let video_path = self.media_path(MediaKind::Video, &record.video_filename);
        fs::remove_file(&video_path).await?;
        debug!("removed {}", video_path.display());

        let image_path = self.media_path(MediaKind::Image, &record.image_filename);
        fs::remove_file(&image_path).await?;
        debug!("removed {}", image_path.display());

        let result = sqlx::query("DELETE FROM videos WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(LibraryError::VideoNotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use tempfile::tempdir;

    async fn test_library(public_dir: &Path) -> MediaLibrary {
        let db = Arc::new(
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await
                .unwrap(),
        );
        sqlx::query(
            "CREATE TABLE videos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                video_filename TEXT NOT NULL,
                image_filename TEXT NOT NULL
            )",
        )
        .execute(&*db)
        .await
        .unwrap();

        let library = MediaLibrary::new(db, public_dir);
        library.ensure_layout().await.unwrap();
        library
    }

    fn clip(name: &str, content_type: &str) -> UploadFile {
        UploadFile {
            original_name: name.to_string(),
            content_type: Some(content_type.to_string()),
            data: Bytes::from_static(b"payload"),
        }
    }

    #[test]
    fn media_kind_routes_by_content_type() {
        assert_eq!(
            MediaKind::from_content_type("video/mp4").unwrap(),
            MediaKind::Video
        );
        assert_eq!(
            MediaKind::from_content_type("image/jpeg").unwrap(),
            MediaKind::Image
        );
        assert!(matches!(
            MediaKind::from_content_type("text/plain"),
            Err(LibraryError::UnsupportedMediaType(_))
        ));
    }

    #[tokio::test]
    async fn upload_writes_files_and_inserts_row() {
        let dir = tempdir().unwrap();
        let library = test_library(dir.path()).await;

        let record = library
            .store_upload("clip1", clip("a.mp4", "video/mp4"), clip("a.jpg", "image/jpeg"))
            .await
            .unwrap();

        assert_eq!(record.name, "clip1");
        assert!(record.video_filename.ends_with(".mp4"));
        assert!(record.image_filename.ends_with(".jpg"));
        assert!(library
            .media_path(MediaKind::Video, &record.video_filename)
            .is_file());
        assert!(library
            .media_path(MediaKind::Image, &record.image_filename)
            .is_file());

        let listed = library.list_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, record.id);
    }

    #[tokio::test]
    async fn unsupported_type_leaves_no_trace() {
        let dir = tempdir().unwrap();
        let library = test_library(dir.path()).await;

        let err = library
            .store_upload("clip1", clip("a.txt", "text/plain"), clip("a.jpg", "image/jpeg"))
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::UnsupportedMediaType(_)));

        // Nothing written, nothing inserted.
        assert!(library.list_all().await.unwrap().is_empty());
        let mut entries = std::fs::read_dir(library.media_dir(MediaKind::Image)).unwrap();
        assert!(entries.next().is_none());
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let dir = tempdir().unwrap();
        let library = test_library(dir.path()).await;

        let err = library
            .store_upload("  ", clip("a.mp4", "video/mp4"), clip("a.jpg", "image/jpeg"))
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::MissingField("name")));
    }

    #[tokio::test]
    async fn get_by_id_unknown_is_not_found() {
        let dir = tempdir().unwrap();
        let library = test_library(dir.path()).await;

        assert!(matches!(
            library.get_by_id(42).await,
            Err(LibraryError::VideoNotFound(42))
        ));
    }

    #[tokio::test]
    async fn delete_removes_files_then_row() {
        let dir = tempdir().unwrap();
        let library = test_library(dir.path()).await;

        let record = library
            .store_upload("clip1", clip("a.mp4", "video/mp4"), clip("a.jpg", "image/jpeg"))
            .await
            .unwrap();

        library.delete(record.id).await.unwrap();

        assert!(!library
            .media_path(MediaKind::Video, &record.video_filename)
            .exists());
        assert!(!library
            .media_path(MediaKind::Image, &record.image_filename)
            .exists());
        assert!(library.list_all().await.unwrap().is_empty());

        // Second delete of the same id: the row is gone.
        assert!(matches!(
            library.delete(record.id).await,
            Err(LibraryError::VideoNotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_aborts_when_video_file_missing() {
        let dir = tempdir().unwrap();
        let library = test_library(dir.path()).await;

        let record = library
            .store_upload("clip1", clip("a.mp4", "video/mp4"), clip("a.jpg", "image/jpeg"))
            .await
            .unwrap();

        // Simulate the invariant violation: video file vanished from disk.
        std::fs::remove_file(library.media_path(MediaKind::Video, &record.video_filename)).unwrap();

        let err = library.delete(record.id).await.unwrap_err();
        assert!(matches!(err, LibraryError::Io(_)));

        // The failure point is the video file; image and row stay put.
        assert!(library
            .media_path(MediaKind::Image, &record.image_filename)
            .is_file());
        assert_eq!(library.list_all().await.unwrap().len(), 1);
    }

    #[test]
    fn timestamp_name_keeps_extension() {
        let generated = MediaLibrary::timestamp_name("holiday.mp4");
        assert!(generated.ends_with(".mp4"));
        assert!(generated.trim_end_matches(".mp4").parse::<i64>().is_ok());

        // No extension on the original means a bare timestamp.
        let bare = MediaLibrary::timestamp_name("README");
        assert!(bare.parse::<i64>().is_ok());
    }
}
