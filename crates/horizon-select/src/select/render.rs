//! Presentation hooks for options.
//!
//! The widget core does not draw anything. It produces one [`OptionView`]
//! per filtered option: a label plus the semantic flags a renderer or an
//! accessibility layer needs.

use std::sync::Arc;

use serde::Serialize;

use crate::error::SelectResult;
use crate::select::option::display_string;
use crate::select::store::FilterQuery;

/// A host-supplied option renderer.
///
/// Receives the option's display string and the current query.
pub type RenderFn = Arc<dyn Fn(&str, &FilterQuery<'_>) -> String + Send + Sync>;

/// Semantic state of one option in the filtered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    /// Position in the filtered view.
    pub index: usize,
    /// Rendered label.
    pub label: String,
    /// Highlighted for keyboard action.
    pub active: bool,
    /// Part of the current selection.
    pub selected: bool,
}

/// Produce the label for an option.
pub fn render_label<T: Serialize>(
    option: &T,
    query: &str,
    renderer: Option<&RenderFn>,
) -> SelectResult<String> {
    let text = display_string(option)?;
    Ok(match renderer {
        Some(render) => render(&text, &FilterQuery::new(query)),
        None => text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_label() {
        assert_eq!(render_label(&"pear", "", None).unwrap(), "pear");
        assert_eq!(
            render_label(&json!({"b": 1, "a": 2}), "", None).unwrap(),
            r#"{"a":2,"b":1}"#
        );
    }

    #[test]
    fn test_custom_renderer_sees_query() {
        let renderer: RenderFn =
            Arc::new(|text: &str, q: &FilterQuery<'_>| format!("{text} [{}]", q.query));
        assert_eq!(
            render_label(&"pear", "pe", Some(&renderer)).unwrap(),
            "pear [pe]"
        );
    }
}
