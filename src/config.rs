use std::path::{Path, PathBuf};

/// Application-level constants
pub const APP_NAME: &str = "MediVault";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Raster formats accepted for prescription uploads.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    "medivault=info".to_string()
}

/// Get the application data directory
/// ~/MediVault/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("MediVault")
}

/// Get the uploads directory (stored prescription images)
pub fn uploads_dir() -> PathBuf {
    app_data_dir().join("uploads")
}

/// Get the database file path
pub fn database_path() -> PathBuf {
    app_data_dir().join("medivault.db")
}

/// Extension allow-list check for uploaded images.
/// Filename sanitization and storage placement belong to the upload handler;
/// the pipeline only refuses formats no backend can read.
pub fn is_allowed_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ALLOWED_IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("MediVault"));
    }

    #[test]
    fn uploads_dir_under_app_data() {
        let uploads = uploads_dir();
        assert!(uploads.starts_with(app_data_dir()));
        assert!(uploads.ends_with("uploads"));
    }

    #[test]
    fn accepts_allowed_raster_formats() {
        for name in ["scan.png", "rx.jpg", "rx.jpeg", "photo.gif", "UPPER.JPG"] {
            assert!(is_allowed_image(Path::new(name)), "{name} should be allowed");
        }
    }

    #[test]
    fn rejects_other_formats() {
        for name in ["report.pdf", "notes.txt", "archive.tar.gz", "noextension"] {
            assert!(!is_allowed_image(Path::new(name)), "{name} should be rejected");
        }
    }
}
