//! Writes a rendered [`MapDocument`] to disk.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::ExportError;
use crate::map::MapDocument;

/// Render `document` and write it to `path`, replacing any existing file.
///
/// Rendering happens before the file is opened, so a render failure leaves
/// an existing file untouched.
pub fn export_html(document: &MapDocument, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let html = document.render()?;
    fs::write(path, html.as_bytes()).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = html.len(), "dashboard written");
    Ok(())
}

/// Line printed once the dashboard has been written.
pub fn success_message(path: &Path) -> String {
    format!(
        "✅ Dashboard with heatmap + clickable markers + working filters saved as '{}'",
        path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::LatLon;

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dash.html");
        fs::write(&path, "stale contents").unwrap();

        export_html(&MapDocument::new(LatLon::new(1.0, 2.0), 11), &path).unwrap();

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(!html.contains("stale contents"));
    }

    #[test]
    fn missing_directory_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("dash.html");
        let err = export_html(&MapDocument::new(LatLon::new(0.0, 0.0), 11), &path).unwrap_err();
        match err {
            ExportError::Write { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn success_line_names_the_output() {
        assert_eq!(
            success_message(Path::new("flood_risk_dashboard_clickable.html")),
            "✅ Dashboard with heatmap + clickable markers + working filters saved as \
             'flood_risk_dashboard_clickable.html'"
        );
    }
}
