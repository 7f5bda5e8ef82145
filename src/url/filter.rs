use url::Url;

/// Extensions that never denote an HTML page.
///
/// Links ending in one of these are still verified, but are never queued for a
/// page visit during a recursive crawl.
pub const EXCLUDED_EXTENSIONS: &[&str] = &[
    // images
    "jpg", "jpeg", "png", "gif", "svg", "webp", "ico", "bmp", "tiff",
    // archives
    "zip", "rar", "7z", "tar", "gz", "bz2", "xz",
    // audio / video
    "mp3", "wav", "ogg", "flac", "m4a", "mp4", "avi", "mov", "wmv", "mkv", "webm",
    // office documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods",
    // feeds and data
    "xml", "rss", "atom", "json", "csv",
];

/// Returns true if the URL path ends in an excluded extension
///
/// The match is a case-insensitive suffix test on the path only; query strings
/// and fragments are ignored. `extra` extends the built-in list.
///
/// ```
/// use url::Url;
/// use linkwalk::url::has_excluded_extension;
///
/// let url = Url::parse("https://site.test/files/Report.PDF?v=2").unwrap();
/// assert!(has_excluded_extension(&url, &[]));
/// ```
pub fn has_excluded_extension(url: &Url, extra: &[String]) -> bool {
    let path = url.path().to_ascii_lowercase();
    let Some((_, ext)) = path.rsplit_once('.') else {
        return false;
    };

    // A dot in a directory name is not an extension
    if ext.contains('/') {
        return false;
    }

    EXCLUDED_EXTENSIONS.contains(&ext) || extra.iter().any(|e| e.eq_ignore_ascii_case(ext))
}
