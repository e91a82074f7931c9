//! Content-Type inference by file extension.

/// Map a file extension to a Content-Type header value.
///
/// Unknown or missing extensions fall back to `application/octet-stream`.
///
/// # Examples
/// ```
/// use distserve::http::mime::from_extension;
/// assert_eq!(from_extension(Some("html")), "text/html; charset=utf-8");
/// assert_eq!(from_extension(Some("wasm")), "application/wasm");
/// assert_eq!(from_extension(None), "application/octet-stream");
/// ```
pub fn from_extension(extension: Option<&str>) -> &'static str {
    match extension {
        // Markup and text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("csv") => "text/csv",

        // Scripts and bundles
        Some("js" | "mjs") => "application/javascript",
        Some("json" | "map") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Audio and video
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogg" | "ogv") => "video/ogg",

        // Archives and documents
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",
        Some("tar") => "application/x-tar",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_types() {
        assert_eq!(from_extension(Some("html")), "text/html; charset=utf-8");
        assert_eq!(from_extension(Some("js")), "application/javascript");
        assert_eq!(from_extension(Some("mjs")), "application/javascript");
        assert_eq!(from_extension(Some("map")), "application/json");
        assert_eq!(from_extension(Some("css")), "text/css");
        assert_eq!(from_extension(Some("svg")), "image/svg+xml");
        assert_eq!(from_extension(Some("woff2")), "font/woff2");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(from_extension(Some("bin")), "application/octet-stream");
        assert_eq!(from_extension(Some("")), "application/octet-stream");
        assert_eq!(from_extension(None), "application/octet-stream");
    }
}
