//! HTML reporter: inlines report JSON and the renderer script into a template
//!
//! The output is a single self-contained document. Both payloads land inside
//! `<script>` elements, so each is neutralized against closing its element
//! early before it is spliced in.

use super::assets::ReportAssets;
use crate::error::Result;
use serde::Serialize;

/// Template token replaced by the report JSON
pub const JSON_PLACEHOLDER: &str = "%%LIGHTHOUSE_JSON%%";
/// Template token replaced by the renderer script
pub const SCRIPT_PLACEHOLDER: &str = "%%LIGHTHOUSE_JAVASCRIPT%%";

/// Escape every `<` in serialized JSON.
///
/// `<` only occurs inside JSON strings, where `\u003c` decodes to the same
/// character, so the data is unchanged for any JSON or JS reader while no tag
/// can open or close in the surrounding markup.
pub fn sanitize_json(json: &str) -> String {
    json.replace('<', "\\u003c")
}

/// Escape every `</` in script source.
///
/// Only closing sequences are touched: the script is trusted source and a bare
/// `<` there is usually a comparison operator.
pub fn sanitize_script(script: &str) -> String {
    script.replace("</", "\\u003c/")
}

/// Serialize `report` and splice it, with the renderer script, into `template`.
///
/// Only serialization can fail. A template without a placeholder simply
/// keeps its text.
pub fn render_html<T: Serialize + ?Sized>(
    report: &T,
    template: &str,
    renderer: &str,
) -> Result<String> {
    let json = serde_json::to_string(report)?;
    Ok(splice(
        template,
        &sanitize_json(&json),
        &sanitize_script(renderer),
    ))
}

/// Reporter that embeds a report into an HTML template
#[derive(Debug, Clone)]
pub struct HtmlReporter {
    template: String,
    renderer: String,
}

impl HtmlReporter {
    /// Create a reporter over a template and renderer script loaded by the caller
    pub fn new(template: impl Into<String>, renderer: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            renderer: renderer.into(),
        }
    }

    pub fn from_assets(assets: ReportAssets) -> Self {
        Self::new(assets.template, assets.renderer)
    }

    /// Generate the full HTML document for a report
    pub fn report<T: Serialize + ?Sized>(&self, report: &T) -> Result<String> {
        render_html(report, &self.template, &self.renderer)
    }

    /// Placeholder tokens the template does not contain
    pub fn missing_placeholders(&self) -> Vec<&'static str> {
        [JSON_PLACEHOLDER, SCRIPT_PLACEHOLDER]
            .into_iter()
            .filter(|token| !self.template.contains(token))
            .collect()
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::from_assets(ReportAssets::builtin())
    }
}

/// Replace the first occurrence of each placeholder.
///
/// Positions are taken from the template alone, so inserted data is never
/// searched for the script token.
fn splice(template: &str, json: &str, script: &str) -> String {
    let json_at = template.find(JSON_PLACEHOLDER);
    let script_at = match json_at {
        Some(at) => {
            let after = at + JSON_PLACEHOLDER.len();
            template[..at].find(SCRIPT_PLACEHOLDER).or_else(|| {
                template[after..]
                    .find(SCRIPT_PLACEHOLDER)
                    .map(|offset| after + offset)
            })
        }
        None => template.find(SCRIPT_PLACEHOLDER),
    };

    let mut splices: Vec<(usize, &str, &str)> = Vec::with_capacity(2);
    if let Some(at) = json_at {
        splices.push((at, JSON_PLACEHOLDER, json));
    }
    if let Some(at) = script_at {
        splices.push((at, SCRIPT_PLACEHOLDER, script));
    }
    splices.sort_by_key(|(at, _, _)| *at);

    let mut html = String::with_capacity(template.len() + json.len() + script.len());
    let mut cursor = 0;
    for (at, token, replacement) in splices {
        html.push_str(&template[cursor..at]);
        html.push_str(replacement);
        cursor = at + token.len();
    }
    html.push_str(&template[cursor..]);
    html
}
