//! HTML pages for the file browser

use std::fmt::Write;

use super::utils::{escape_html, percent_encode};
use crate::cameras::CameraId;
use crate::storage::FileEntry;

/// `GET /files`: one row per camera linking to its listing
pub fn camera_index(cameras: &[(&str, &CameraId)]) -> String {
    let mut rows = String::new();
    for (name, id) in cameras {
        let _ = writeln!(
            rows,
            r#"<tr><td><a href="/files/{}">{}</a></td><td>{}</td></tr>"#,
            percent_encode(name),
            escape_html(name),
            escape_html(id.as_str()),
        );
    }

    page(
        "Cameras",
        &format!("<table>\n<tr><th>Camera</th><th>Id</th></tr>\n{rows}</table>"),
    )
}

/// `GET /files/{camera}`: entries with SI sizes
pub fn file_listing(camera_name: &str, camera_id: &CameraId, entries: &[FileEntry]) -> String {
    let camera_path = percent_encode(camera_name);

    let mut rows = String::new();
    for entry in entries {
        let name = escape_html(&entry.name);
        let cell = if entry.is_directory {
            format!("{name}/")
        } else {
            format!(
                r#"<a href="/files/{}?file={}">{}</a>"#,
                camera_path,
                percent_encode(&entry.name),
                name
            )
        };
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td>{}</td></tr>",
            cell,
            entry.size_display()
        );
    }

    page(
        &format!("{} (camera {})", camera_name, camera_id),
        &format!("<table>\n<tr><th>Name</th><th>Size</th></tr>\n{rows}</table>"),
    )
}

fn page(title: &str, body: &str) -> String {
    let title = escape_html(title);
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n"
    )
}
