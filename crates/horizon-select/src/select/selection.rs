//! Selection manager: single-replace and multi-toggle semantics.

use serde::{Deserialize, Deserializer, Serialize};

use horizon_select_core::logging::targets;

use crate::error::SelectResult;
use crate::select::option::{SelectOption, canonical_json, position_of};

/// Whether the widget picks one option or several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Picking an option replaces the selection and closes the panel.
    #[default]
    Single,
    /// Picking an option toggles its membership; the panel stays open.
    Multiple,
}

/// The chosen option(s).
///
/// Serializes as the bare option (or `null`) in single mode and as a
/// sequence in multiple mode. When deserializing, any sequence is read as
/// [`Selection::Multiple`], even if the option type could itself hold one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Selection<T> {
    /// Zero or one option.
    Single(Option<T>),
    /// An ordered sequence with no structurally-equal duplicates.
    Multiple(Vec<T>),
}

impl<T> Selection<T> {
    /// An empty selection for the given mode.
    pub fn empty(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => Self::Single(None),
            SelectionMode::Multiple => Self::Multiple(Vec::new()),
        }
    }

    /// A single selected option.
    pub fn single(option: T) -> Self {
        Self::Single(Some(option))
    }

    /// A multiple selection.
    pub fn multiple(options: Vec<T>) -> Self {
        Self::Multiple(options)
    }

    /// The selected options as a slice.
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::Single(option) => option.as_slice(),
            Self::Multiple(options) => options,
        }
    }

    /// Number of selected options.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// The mode this selection shape belongs to.
    pub fn mode(&self) -> SelectionMode {
        match self {
            Self::Single(_) => SelectionMode::Single,
            Self::Multiple(_) => SelectionMode::Multiple,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Selection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Sequence first: `Option<serde_json::Value>` would accept an array too.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape<T> {
            Sequence(Vec<T>),
            Scalar(Option<T>),
        }

        Ok(match Shape::<T>::deserialize(deserializer)? {
            Shape::Sequence(options) => Self::Multiple(options),
            Shape::Scalar(option) => Self::Single(option),
        })
    }
}

impl<T: SelectOption> Selection<T> {
    /// Whether `option` is structurally equal to a selected option.
    pub fn contains(&self, option: &T) -> SelectResult<bool> {
        Ok(position_of(self.as_slice(), option)?.is_some())
    }

    /// Structural equality between two selections.
    pub fn deep_eq(&self, other: &Self) -> SelectResult<bool> {
        if self.mode() != other.mode() || self.len() != other.len() {
            return Ok(false);
        }
        for (a, b) in self.as_slice().iter().zip(other.as_slice()) {
            if canonical_json(a)? != canonical_json(b)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Coerce a host-supplied value into the shape `mode` expects.
    ///
    /// A scalar given in multiple mode is wrapped; a sequence given in
    /// single mode keeps its first element. Duplicates are dropped.
    pub fn normalized(self, mode: SelectionMode) -> SelectResult<Self> {
        match (mode, self) {
            (SelectionMode::Single, Self::Single(option)) => Ok(Self::Single(option)),
            (SelectionMode::Single, Self::Multiple(options)) => {
                if options.len() > 1 {
                    tracing::warn!(
                        target: targets::SELECTION,
                        count = options.len(),
                        "sequence value in single mode, keeping the first option"
                    );
                }
                Ok(Self::Single(options.into_iter().next()))
            }
            (SelectionMode::Multiple, Self::Single(option)) => {
                if option.is_some() {
                    tracing::warn!(
                        target: targets::SELECTION,
                        "scalar value in multiple mode, wrapping it in a sequence"
                    );
                }
                Ok(Self::Multiple(option.into_iter().collect()))
            }
            (SelectionMode::Multiple, Self::Multiple(options)) => {
                let mut unique: Vec<T> = Vec::with_capacity(options.len());
                for option in options {
                    if position_of(&unique, &option)?.is_none() {
                        unique.push(option);
                    }
                }
                Ok(Self::Multiple(unique))
            }
        }
    }
}

/// The result of a selection action.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange<T> {
    /// The proposed new selection, handed to the host.
    pub value: Selection<T>,
    /// Whether the panel should close as a consequence.
    pub close_panel: bool,
}

/// Tracks the chosen option(s).
///
/// In uncontrolled mode (the default) every proposal is committed locally.
/// In controlled mode proposals are only reported, and the host feeds the
/// accepted value back with [`set_value`](Self::set_value).
#[derive(Debug, Clone)]
pub struct SelectionManager<T> {
    mode: SelectionMode,
    value: Selection<T>,
    controlled: bool,
}

impl<T: SelectOption> SelectionManager<T> {
    /// Create an empty manager.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            value: Selection::empty(mode),
            controlled: false,
        }
    }

    /// The current mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Switch modes, reshaping the current value.
    pub fn set_mode(&mut self, mode: SelectionMode) -> SelectResult<()> {
        if self.mode != mode {
            self.mode = mode;
            let value = std::mem::replace(&mut self.value, Selection::empty(mode));
            self.value = value.normalized(mode)?;
        }
        Ok(())
    }

    /// Whether proposals wait for the host to accept them.
    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    /// Set whether proposals wait for the host to accept them.
    pub fn set_controlled(&mut self, controlled: bool) {
        self.controlled = controlled;
    }

    /// The current selection.
    pub fn value(&self) -> &Selection<T> {
        &self.value
    }

    /// Replace the selection with a host-supplied value.
    pub fn set_value(&mut self, value: Selection<T>) -> SelectResult<()> {
        self.value = value.normalized(self.mode)?;
        Ok(())
    }

    /// Whether `option` is currently selected.
    pub fn is_selected(&self, option: &T) -> SelectResult<bool> {
        self.value.contains(option)
    }

    /// Single mode: select exactly `option`.
    ///
    /// Re-selecting the current option still replaces it.
    pub fn replace(&mut self, option: T) -> SelectionChange<T> {
        let value = Selection::single(option);
        self.commit(value.clone());
        SelectionChange {
            value,
            close_panel: true,
        }
    }

    /// Multiple mode: remove `option` if selected, otherwise append it.
    pub fn toggle(&mut self, option: T) -> SelectResult<SelectionChange<T>> {
        let mut options = self.value.as_slice().to_vec();
        match position_of(&options, &option)? {
            Some(index) => {
                options.remove(index);
            }
            None => options.push(option),
        }

        let value = Selection::multiple(options);
        self.commit(value.clone());
        Ok(SelectionChange {
            value,
            close_panel: false,
        })
    }

    /// Apply the mode's action to `option`.
    pub fn select(&mut self, option: T) -> SelectResult<SelectionChange<T>> {
        match self.mode {
            SelectionMode::Single => Ok(self.replace(option)),
            SelectionMode::Multiple => self.toggle(option),
        }
    }

    fn commit(&mut self, value: Selection<T>) {
        if self.controlled {
            tracing::debug!(target: targets::SELECTION, "controlled selection, proposal not committed");
        } else {
            self.value = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::option::OptionItem;
    use serde_json::json;

    fn record(value: serde_json::Value) -> OptionItem {
        OptionItem::from_value(value).unwrap()
    }

    #[test]
    fn test_single_replace_closes() {
        let mut manager = SelectionManager::<String>::new(SelectionMode::Single);
        let change = manager.select("apple".to_string()).unwrap();
        assert_eq!(change.value, Selection::single("apple".to_string()));
        assert!(change.close_panel);

        // Reselecting replaces, never deselects.
        let change = manager.select("apple".to_string()).unwrap();
        assert_eq!(change.value, Selection::single("apple".to_string()));
        assert_eq!(manager.value().len(), 1);
    }

    #[test]
    fn test_multiple_toggle_appends_and_removes() {
        let mut manager = SelectionManager::<String>::new(SelectionMode::Multiple);
        manager.select("a".into()).unwrap();
        let change = manager.select("b".into()).unwrap();
        assert!(!change.close_panel);
        assert_eq!(change.value.as_slice(), ["a", "b"]);

        manager.select("a".into()).unwrap();
        assert_eq!(manager.value().as_slice(), ["b"]);
    }

    #[test]
    fn test_toggle_pair_is_identity() {
        let mut manager = SelectionManager::<OptionItem>::new(SelectionMode::Multiple);
        manager
            .set_value(Selection::multiple(vec![record(json!({"id": 1})), "x".into()]))
            .unwrap();
        let before = manager.value().clone();

        manager.toggle(record(json!({"id": 2}))).unwrap();
        manager.toggle(record(json!({"id": 2}))).unwrap();
        assert!(manager.value().deep_eq(&before).unwrap());

        manager.toggle("x".into()).unwrap();
        manager.toggle("x".into()).unwrap();
        // Re-added at the end, so same members but a different order.
        assert_eq!(manager.value().len(), 2);
        assert!(manager.is_selected(&"x".into()).unwrap());
    }

    #[test]
    fn test_toggle_uses_structural_equality() {
        let mut manager = SelectionManager::<OptionItem>::new(SelectionMode::Multiple);
        manager.toggle(record(json!({"a": 1, "b": 2}))).unwrap();
        manager.toggle(record(json!({"b": 2, "a": 1}))).unwrap();
        assert!(manager.value().is_empty());
    }

    #[test]
    fn test_normalize_scalar_into_multiple() {
        let value = Selection::single("kiwi".to_string())
            .normalized(SelectionMode::Multiple)
            .unwrap();
        assert_eq!(value, Selection::multiple(vec!["kiwi".to_string()]));

        let empty = Selection::<String>::Single(None)
            .normalized(SelectionMode::Multiple)
            .unwrap();
        assert_eq!(empty, Selection::multiple(vec![]));
    }

    #[test]
    fn test_normalize_sequence_into_single_and_dedup() {
        let value = Selection::multiple(vec!["a".to_string(), "b".to_string()])
            .normalized(SelectionMode::Single)
            .unwrap();
        assert_eq!(value, Selection::single("a".to_string()));

        let deduped = Selection::multiple(vec!["a".to_string(), "a".to_string()])
            .normalized(SelectionMode::Multiple)
            .unwrap();
        assert_eq!(deduped.as_slice(), ["a"]);
    }

    #[test]
    fn test_controlled_does_not_commit() {
        let mut manager = SelectionManager::<String>::new(SelectionMode::Multiple);
        manager.set_controlled(true);
        let change = manager.toggle("a".into()).unwrap();
        assert_eq!(change.value.as_slice(), ["a"]);
        assert!(manager.value().is_empty());

        manager.set_value(change.value).unwrap();
        assert_eq!(manager.value().as_slice(), ["a"]);
    }

    #[test]
    fn test_set_mode_reshapes_value() {
        let mut manager = SelectionManager::<String>::new(SelectionMode::Single);
        manager.replace("a".into());
        manager.set_mode(SelectionMode::Multiple).unwrap();
        assert_eq!(manager.value(), &Selection::multiple(vec!["a".to_string()]));
    }

    #[test]
    fn test_selection_serde_shape() {
        let single: Selection<String> = serde_json::from_str(r#""a""#).unwrap();
        assert_eq!(single, Selection::single("a".to_string()));
        let multiple: Selection<String> = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(multiple.len(), 2);
        assert_eq!(
            serde_json::to_string(&Selection::<String>::Single(None)).unwrap(),
            "null"
        );
    }

    #[test]
    fn test_json_array_deserializes_as_sequence() {
        let value: Selection<serde_json::Value> = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(value, Selection::multiple(vec![json!("a"), json!("b")]));

        let value = value.normalized(SelectionMode::Multiple).unwrap();
        assert_eq!(value.len(), 2);

        let scalar: Selection<serde_json::Value> = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(scalar, Selection::single(json!({"id": 1})));
        let none: Selection<serde_json::Value> = serde_json::from_str("null").unwrap();
        assert_eq!(none, Selection::Single(None));
    }
}
