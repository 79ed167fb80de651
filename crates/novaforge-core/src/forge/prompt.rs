//! Prompt builders for the two generation cases.
//!
//! - **Create**: ask for one self-contained HTML document with inline
//!   `<style>` and `<script>` blocks.
//! - **Extend**: hand the model the four current artifacts plus a feature
//!   request and ask for all four back, unchanged where no edit is needed.
//!
//! Both prompts come in two response styles. [`ResponseStyle::Json`] is used
//! when the provider enforces a JSON schema; [`ResponseStyle::Markers`] asks
//! for literal sentinel markers that [`super::extract`] slices apart.

use novaforge_types::bundle::{Artifact, Bundle};

/// How the model is asked to shape its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStyle {
    /// Free text with sentinel markers (or a bare HTML document on create).
    Markers,
    /// A JSON object matching the schema sent with the request.
    Json,
}

/// Runtime data endpoint every generated client script must talk to.
pub const DATA_ENDPOINT: &str = "/api/data";

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Build the prompt for generating a brand-new project page.
pub fn build_create_prompt(
    project_name: &str,
    description: &str,
    project_type: &str,
    style: ResponseStyle,
) -> String {
    let output_rule = match style {
        ResponseStyle::Markers => "Generate ONLY valid HTML. No commentary before or after the document.",
        ResponseStyle::Json => {
            "Return a JSON object whose `html` field holds the complete HTML document."
        }
    };

    format!(
        "{output_rule}\n\
         \n\
         STRICT RULES:\n\
         - NO static/sample data\n\
         - HTML must have empty containers\n\
         - JS must fetch data from {DATA_ENDPOINT}\n\
         - DO NOT use localStorage\n\
         - Use <style> and <script>\n\
         \n\
         Project: {project_name}\n\
         Project type: {project_type}\n\
         Description: {description}\n"
    )
}

// ---------------------------------------------------------------------------
// Extend
// ---------------------------------------------------------------------------

/// Build the prompt for adding a feature to an existing bundle.
///
/// The full current content of every artifact is embedded so the model can
/// return complete replacements rather than diffs.
pub fn build_extend_prompt(feature: &str, current: &Bundle, style: ResponseStyle) -> String {
    let mut sections = Vec::with_capacity(8);

    sections.push(
        "You are modifying an EXISTING project.\n\
         \n\
         RULES:\n\
         - DO NOT remove any existing functionality\n\
         - ONLY ADD the requested feature\n\
         - Keep structure intact\n\
         - Return updated HTML, CSS, JS, Backend separately\n\
         - Return every artifact in full, even if it did not change"
            .to_string(),
    );

    sections.push(output_instructions(style));
    sections.push(format!("<feature_to_add>\n{feature}\n</feature_to_add>"));

    for artifact in Artifact::ALL {
        let tag = format!("current_{}", artifact.key());
        sections.push(format!("<{tag}>\n{}\n</{tag}>", current.get(artifact)));
    }

    sections.join("\n\n")
}

fn output_instructions(style: ResponseStyle) -> String {
    match style {
        ResponseStyle::Json => "OUTPUT FORMAT:\n\
             Return a JSON object with the fields `html`, `css`, `js` and `backend`, \
             each holding the complete updated file."
            .to_string(),
        ResponseStyle::Markers => {
            let mut out = String::from(
                "OUTPUT FORMAT:\nWrap each updated file in its markers, exactly as shown:\n",
            );
            for artifact in Artifact::ALL {
                let (start, end) = artifact.markers();
                out.push_str(&format!("{start}\n...{} content...\n{end}\n", artifact.key()));
            }
            out
        }
    }
}
