use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// The provider matching the extension of a file, csv by default.
pub fn guess_provider(path: &str) -> &'static str {
    match Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .as_deref()
    {
        Some("xlsx") | Some("xlsm") => "xlsx",
        _ => "csv",
    }
}

/// Days listed as a line of text, or the "none" marker.
pub fn day_list(days: &[String]) -> String {
    if days.is_empty() {
        "該当なし".to_string()
    } else {
        days.join(" / ")
    }
}
