//! HTTP handlers for the page routes.
//! Buffers multipart upload parts and delegates storage concerns to
//! `MediaLibrary`; pages are rendered server-side by the builders below.

use crate::{
    errors::AppError,
    models::video::VideoRecord,
    services::media_library::{LibraryError, MediaLibrary, UploadFile},
};
use axum::{
    extract::{Multipart, Path, State, multipart::Field},
    response::{Html, Redirect},
};

/// GET `/` — homepage listing every uploaded video.
pub async fn homepage(State(library): State<MediaLibrary>) -> Result<Html<String>, AppError> {
    let videos = library.list_all().await?;
    Ok(Html(render_homepage(&videos)))
}

/// GET `/upload` — the empty upload form.
pub async fn upload_form() -> Html<String> {
    Html(render_upload_form())
}

/// POST `/upload` — multipart form with `name`, `video`, and `image` fields.
///
/// All three must be present or the request fails with 400 before anything
/// is written. On success the files are stored, a row is inserted, and the
/// client is redirected to the homepage.
pub async fn submit_upload(
    State(library): State<MediaLibrary>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut name: Option<String> = None;
    let mut video: Option<UploadFile> = None;
    let mut image: Option<UploadFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(err.to_string()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => {
                name = Some(
                    field
                        .text()
                        .await
                        .map_err(|err| AppError::bad_request(err.to_string()))?,
                );
            }
            "video" => video = Some(read_file_field(field).await?),
            "image" => image = Some(read_file_field(field).await?),
            _ => {}
        }
    }

    let name = name.ok_or(LibraryError::MissingField("name"))?;
    let video = video.ok_or(LibraryError::MissingField("video"))?;
    let image = image.ok_or(LibraryError::MissingField("image"))?;

    library.store_upload(&name, video, image).await?;
    Ok(Redirect::to("/"))
}

/// GET `/manage` — same listing as the homepage but with delete controls.
pub async fn manage(State(library): State<MediaLibrary>) -> Result<Html<String>, AppError> {
    let videos = library.list_all().await?;
    Ok(Html(render_manage(&videos)))
}

/// POST `/delete/{id}` — remove both files and the row, in that order.
pub async fn delete_video(
    State(library): State<MediaLibrary>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    library.delete(id).await?;
    Ok(Redirect::to("/"))
}

/// GET `/watch/{id}` — the player page for one entry.
pub async fn watch(
    State(library): State<MediaLibrary>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let video = library.get_by_id(id).await?;
    Ok(Html(render_watch(&video)))
}

/// Buffer one file part, keeping its original filename and declared type.
async fn read_file_field(field: Field<'_>) -> Result<UploadFile, AppError> {
    let original_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(|ct| ct.to_string());
    let data = field
        .bytes()
        .await
        .map_err(|err| AppError::bad_request(err.to_string()))?;
    Ok(UploadFile {
        original_name,
        content_type,
        data,
    })
}

fn render_homepage(videos: &[VideoRecord]) -> String {
    let mut body = String::from("<h1>Videos</h1>\n");
    if videos.is_empty() {
        body.push_str("<p>No videos yet. <a href=\"/upload\">Upload one</a>.</p>\n");
    } else {
        body.push_str("<ul class=\"video-grid\">\n");
        for video in videos {
            body.push_str(&format!(
                concat!(
                    "<li><a href=\"/watch/{id}\">",
                    "<img src=\"/images/{image}\" alt=\"{name}\">",
                    "<span>{name}</span></a></li>\n"
                ),
                id = video.id,
                image = html_escape(&video.image_filename),
                name = html_escape(&video.name),
            ));
        }
        body.push_str("</ul>\n");
    }
    page("Videos", &body)
}

fn render_upload_form() -> String {
    let body = concat!(
        "<h1>Upload a video</h1>\n",
        "<form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\n",
        "<label>Name <input type=\"text\" name=\"name\" required></label>\n",
        "<label>Video <input type=\"file\" name=\"video\" accept=\"video/*\" required></label>\n",
        "<label>Thumbnail <input type=\"file\" name=\"image\" accept=\"image/*\" required></label>\n",
        "<button type=\"submit\">Upload</button>\n",
        "</form>\n",
    );
    page("Upload", body)
}

fn render_manage(videos: &[VideoRecord]) -> String {
    let mut body = String::from("<h1>Manage videos</h1>\n<table>\n");
    body.push_str("<tr><th>Name</th><th>Video file</th><th>Thumbnail</th><th></th></tr>\n");
    for video in videos {
        body.push_str(&format!(
            concat!(
                "<tr><td>{name}</td><td>{video}</td><td>{image}</td>",
                "<td><form action=\"/delete/{id}\" method=\"post\">",
                "<button type=\"submit\">Delete</button></form></td></tr>\n"
            ),
            name = html_escape(&video.name),
            video = html_escape(&video.video_filename),
            image = html_escape(&video.image_filename),
            id = video.id,
        ));
    }
    body.push_str("</table>\n");
    page("Manage", &body)
}

fn render_watch(video: &VideoRecord) -> String {
    let body = format!(
        concat!(
            "<h1>{name}</h1>\n",
            "<video controls poster=\"/images/{image}\" width=\"640\">\n",
            "<source src=\"/videos/{file}\">\n",
            "Your browser does not support the video tag.\n",
            "</video>\n"
        ),
        name = html_escape(&video.name),
        image = html_escape(&video.image_filename),
        file = html_escape(&video.video_filename),
    );
    page(&video.name, &body)
}

/// Shared page shell with the navigation links every page carries.
fn page(title: &str, body: &str) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    html.push_str("<meta charset=\"utf-8\">\n</head>\n<body>\n");
    html.push_str(concat!(
        "<nav><a href=\"/\">Home</a> | <a href=\"/upload\">Upload</a>",
        " | <a href=\"/manage\">Manage</a></nav>\n"
    ));
    html.push_str(body);
    html.push_str("</body>\n</html>\n");
    html
}

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
