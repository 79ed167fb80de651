//! Textual extraction of artifacts from model output.
//!
//! Purely marker-based: nothing here parses HTML, CSS or JavaScript, and no
//! syntax validation is attempted.

use serde::de::DeserializeOwned;

use novaforge_types::bundle::Artifact;

/// Return the trimmed text between the first `start` marker and the first
/// `end` marker that follows it.
///
/// `None` when either marker is missing. An `end` marker that only occurs
/// before `start` counts as missing.
pub fn extract_between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let content_start = text.find(start)? + start.len();
    let content_len = text[content_start..].find(end)?;
    Some(text[content_start..content_start + content_len].trim())
}

/// Extract one artifact delimited by its sentinel markers.
///
/// Empty content is treated as absent so callers keep their prior value.
pub fn extract_marked(text: &str, artifact: Artifact) -> Option<String> {
    let (start, end) = artifact.markers();
    extract_between(text, start, end)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Remove Markdown code fences the model likes to wrap documents in.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```html", "").replace("```", "").trim().to_string()
}

/// Inline `<style>` content of a generated page, or empty if there is none.
pub fn inline_style(html: &str) -> String {
    extract_between(html, "<style>", "</style>")
        .unwrap_or_default()
        .to_string()
}

/// Inline `<script>` content of a generated page.
pub fn inline_script(html: &str) -> Option<&str> {
    extract_between(html, "<script>", "</script>")
}

/// Parse a structured (JSON) response, tolerating a surrounding code fence.
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Option<T> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))?
        .trim_end()
        .strip_suffix("```")?;
    serde_json::from_str(unfenced.trim()).ok()
}
