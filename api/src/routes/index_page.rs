//! GET / — the consultation page.

use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::core::app_state::AppState;

const TEMPLATE: &str = include_str!("../../assets/index.html");

pub async fn index_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_page(&state))
}

fn render_page(state: &AppState) -> String {
    let credit = state
        .config
        .credit
        .as_deref()
        .map(|c| format!("<div class=\"banner info\">👨‍🔬 {}</div>", escape_html(c)))
        .unwrap_or_default();

    TEMPLATE
        .replace("{{GUIDELINE_DB}}", &escape_html(&state.info.guideline_db))
        .replace("{{RECIPE_DB}}", &escape_html(&state.info.recipe_db))
        .replace("{{SOURCE_NOTE}}", &escape_html(&state.config.source_note))
        .replace("{{CREDIT}}", &credit)
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<b>\"a\" & 'b'</b>"), "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;");
        assert_eq!(escape_html("지침"), "지침");
    }

    #[test]
    fn template_has_every_slot() {
        for slot in ["{{GUIDELINE_DB}}", "{{RECIPE_DB}}", "{{SOURCE_NOTE}}", "{{CREDIT}}"] {
            assert!(TEMPLATE.contains(slot), "missing {slot}");
        }
    }
}
