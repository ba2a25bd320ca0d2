use std::path::Path;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// MIME type guessed from the file extension. Unknown files are sent without
/// one and the server stores them as `application/octet-stream`.
pub fn guess_mime_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path).first().map(|m| m.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(
            guess_mime_type(Path::new("report.PDF")).as_deref(),
            Some("application/pdf")
        );
        assert_eq!(
            guess_mime_type(Path::new("/tmp/photo.jpeg")).as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(
            guess_mime_type(Path::new("deck.pptx")).as_deref(),
            Some("application/vnd.openxmlformats-officedocument.presentationml.presentation")
        );
        assert_eq!(guess_mime_type(Path::new("page.html")).as_deref(), Some("text/html"));
        assert_eq!(
            guess_mime_type(Path::new("clip.mov")).as_deref(),
            Some("video/quicktime")
        );
        assert!(guess_mime_type(Path::new("data.xml")).is_some());
        assert!(guess_mime_type(Path::new("sheet.xls")).is_some());
    }

    #[test]
    fn unknown_or_missing_extension() {
        assert_eq!(guess_mime_type(Path::new("archive.zzqx")), None);
        assert_eq!(guess_mime_type(Path::new("Makefile")), None);
    }
}
