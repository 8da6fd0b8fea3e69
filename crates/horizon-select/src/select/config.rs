//! Host configuration for a [`SelectBox`](super::SelectBox).
//!
//! [`SelectConfig`] is the full builder, closures included. The plain-data
//! part can also be loaded from a settings file as [`SelectSettings`] and
//! applied with [`SelectConfig::with_settings`].

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use horizon_select_core::{Clock, SharedTimerManager};

use crate::error::FilterError;
use crate::select::debounce::DEFAULT_DEBOUNCE;
use crate::select::events::EscapeFocus;
use crate::select::option::SelectOption;
use crate::select::placement::{FlipPlacement, PlacementStrategy};
use crate::select::render::RenderFn;
use crate::select::selection::{Selection, SelectionMode};
use crate::select::store::{FilterFn, FilterQuery};

/// Default number of options skipped by PageUp/PageDown.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default height of one option row, used for pointer hit testing.
pub const DEFAULT_ITEM_HEIGHT: f32 = 24.0;

/// Everything a [`SelectBox`](super::SelectBox) is built from.
pub struct SelectConfig<T> {
    pub(crate) options: Vec<T>,
    pub(crate) value: Option<Selection<T>>,
    pub(crate) mode: SelectionMode,
    pub(crate) loading: bool,
    pub(crate) disabled: bool,
    pub(crate) debounce: Duration,
    pub(crate) filter: Option<FilterFn<T>>,
    pub(crate) render: Option<RenderFn>,
    pub(crate) label: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) placeholder: Option<String>,
    pub(crate) escape_focus: EscapeFocus,
    pub(crate) controlled: bool,
    pub(crate) page_size: usize,
    pub(crate) item_height: f32,
    pub(crate) placement: Arc<dyn PlacementStrategy>,
    pub(crate) timers: Option<Arc<SharedTimerManager>>,
}

impl<T: SelectOption> SelectConfig<T> {
    /// Start a configuration from the option set.
    pub fn new(options: Vec<T>) -> Self {
        Self {
            options,
            value: None,
            mode: SelectionMode::Single,
            loading: false,
            disabled: false,
            debounce: DEFAULT_DEBOUNCE,
            filter: None,
            render: None,
            label: None,
            description: None,
            placeholder: None,
            escape_focus: EscapeFocus::default(),
            controlled: false,
            page_size: DEFAULT_PAGE_SIZE,
            item_height: DEFAULT_ITEM_HEIGHT,
            placement: Arc::new(FlipPlacement::default()),
            timers: None,
        }
    }

    /// Set the initial selection.
    pub fn with_value(mut self, value: Selection<T>) -> Self {
        self.value = Some(value);
        self
    }

    /// Enable or disable multiple selection.
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.mode = if multiple {
            SelectionMode::Multiple
        } else {
            SelectionMode::Single
        };
        self
    }

    /// Set the selection mode directly.
    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the initial loading flag.
    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Start disabled.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the debounce delay used while loading.
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    /// Install an infallible filter predicate.
    pub fn with_filter_options<F>(self, filter: F) -> Self
    where
        F: Fn(&[T], &FilterQuery<'_>) -> Vec<T> + Send + Sync + 'static,
    {
        self.with_filter(Arc::new(
            move |options: &[T], query: &FilterQuery<'_>| -> Result<Vec<T>, FilterError> {
                Ok(filter(options, query))
            },
        ))
    }

    /// Install a fallible filter predicate.
    pub fn with_try_filter_options<F>(self, filter: F) -> Self
    where
        F: Fn(&[T], &FilterQuery<'_>) -> Result<Vec<T>, FilterError> + Send + Sync + 'static,
    {
        self.with_filter(Arc::new(filter))
    }

    /// Install a prepared predicate, e.g. one from [`filters`](crate::select::filters).
    pub fn with_filter(mut self, filter: FilterFn<T>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Install an option renderer.
    pub fn with_render_option<F>(mut self, render: F) -> Self
    where
        F: Fn(&str, &FilterQuery<'_>) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Set the visible label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the description text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the input placeholder.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set what Escape does to focus.
    pub fn with_escape_focus(mut self, policy: EscapeFocus) -> Self {
        self.escape_focus = policy;
        self
    }

    /// Only propose selection changes; the host commits them with `set_value`.
    pub fn with_controlled(mut self, controlled: bool) -> Self {
        self.controlled = controlled;
        self
    }

    /// Set how far PageUp/PageDown move.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the option row height used for hit testing.
    pub fn with_item_height(mut self, height: f32) -> Self {
        self.item_height = height;
        self
    }

    /// Replace the panel placement strategy.
    pub fn with_placement(mut self, strategy: impl PlacementStrategy + 'static) -> Self {
        self.placement = Arc::new(strategy);
        self
    }

    /// Run debounce timers on a private queue driven by `clock`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.timers = Some(Arc::new(SharedTimerManager::with_clock(clock)));
        self
    }

    /// Run debounce timers on a queue shared with other widgets.
    pub fn with_timers(mut self, timers: Arc<SharedTimerManager>) -> Self {
        self.timers = Some(timers);
        self
    }

    /// Apply plain-data settings on top of this configuration.
    pub fn with_settings(mut self, settings: &SelectSettings) -> Self {
        self = self
            .with_multiple(settings.multiple)
            .with_loading(settings.loading)
            .with_disabled(settings.disabled)
            .with_debounce(Duration::from_millis(settings.debounce_ms))
            .with_escape_focus(settings.escape_focus)
            .with_controlled(settings.controlled)
            .with_page_size(settings.page_size);
        if let Some(label) = &settings.label {
            self.label = Some(label.clone());
        }
        if let Some(description) = &settings.description {
            self.description = Some(description.clone());
        }
        if let Some(placeholder) = &settings.placeholder {
            self.placeholder = Some(placeholder.clone());
        }
        self
    }

    /// The selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// The debounce delay.
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// The PageUp/PageDown distance.
    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

impl<T> std::fmt::Debug for SelectConfig<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectConfig")
            .field("options", &self.options.len())
            .field("mode", &self.mode)
            .field("loading", &self.loading)
            .field("disabled", &self.disabled)
            .field("debounce", &self.debounce)
            .field("has_filter", &self.filter.is_some())
            .field("has_render", &self.render.is_some())
            .field("label", &self.label)
            .field("escape_focus", &self.escape_focus)
            .field("controlled", &self.controlled)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

/// The plain-data part of a [`SelectConfig`].
///
/// Every field has a default, so a settings file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectSettings {
    pub multiple: bool,
    pub loading: bool,
    pub disabled: bool,
    pub debounce_ms: u64,
    pub label: Option<String>,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub escape_focus: EscapeFocus,
    pub controlled: bool,
    pub page_size: usize,
}

impl Default for SelectSettings {
    fn default() -> Self {
        Self {
            multiple: false,
            loading: false,
            disabled: false,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            label: None,
            description: None,
            placeholder: None,
            escape_focus: EscapeFocus::default(),
            controlled: false,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SelectConfig::new(vec!["a".to_string()]);
        assert_eq!(config.mode(), SelectionMode::Single);
        assert_eq!(config.debounce(), Duration::from_millis(1000));
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
        assert!(config.filter.is_none());
        assert!(config.timers.is_none());
    }

    #[test]
    fn test_settings_from_toml() {
        let settings: SelectSettings = toml::from_str(
            r#"
            multiple = true
            debounce_ms = 250
            label = "Fruit"
            escape_focus = "release"
            "#,
        )
        .unwrap();
        assert!(settings.multiple);
        assert_eq!(settings.debounce_ms, 250);
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(settings.escape_focus, EscapeFocus::Release);

        let config = SelectConfig::new(vec!["a".to_string()]).with_settings(&settings);
        assert_eq!(config.mode(), SelectionMode::Multiple);
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.label.as_deref(), Some("Fruit"));
    }

    #[test]
    fn test_settings_from_json() {
        let settings: SelectSettings =
            serde_json::from_str(r#"{"loading": true, "page_size": 3}"#).unwrap();
        assert!(settings.loading);
        assert_eq!(settings.page_size, 3);
        assert_eq!(settings.debounce_ms, 1000);
        assert_eq!(SelectSettings::default().debounce_ms, 1000);
    }

    #[test]
    fn test_page_size_is_at_least_one() {
        let config = SelectConfig::new(Vec::<String>::new()).with_page_size(0);
        assert_eq!(config.page_size(), 1);
    }
}
