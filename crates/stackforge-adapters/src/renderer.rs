//! Placeholder substitution renderer.

use stackforge_core::application::ports::TemplateRenderer;
use stackforge_core::domain::RenderContext;

/// Single-pass `{{placeholder}}` substitution.
///
/// Markers whose name is not in the context are emitted verbatim, so a
/// template can carry mustache-style syntax destined for another tool
/// without being mangled. Substituted values are never re-scanned.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl PlaceholderRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for PlaceholderRenderer {
    fn render(&self, input: &str, context: &RenderContext) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find("{{") {
            let (before, marker_on) = rest.split_at(start);
            out.push_str(before);

            match marker_on[2..].find("}}") {
                Some(end) => {
                    let name = marker_on[2..2 + end].trim();
                    match context.get(name) {
                        Some(value) => out.push_str(value),
                        None => out.push_str(&marker_on[..end + 4]),
                    }
                    rest = &marker_on[end + 4..];
                }
                None => {
                    // Unterminated marker, keep the tail as-is.
                    out.push_str(marker_on);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }
}
