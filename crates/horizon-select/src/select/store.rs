//! The option store: the full option set and its filtered view.

use std::sync::Arc;

use crate::error::{FilterError, SelectResult};
use crate::select::option::{SelectOption, display_string};

/// The query handed to filter predicates and option renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterQuery<'a> {
    /// The current text of the input.
    pub query: &'a str,
}

impl<'a> FilterQuery<'a> {
    /// Wrap a query string.
    pub fn new(query: &'a str) -> Self {
        Self { query }
    }
}

/// A host-supplied filter predicate.
///
/// Receives the full option set and the query, returns the filtered view.
/// The result is used verbatim: the predicate owns ordering and inclusion.
pub type FilterFn<T> =
    Arc<dyn Fn(&[T], &FilterQuery<'_>) -> Result<Vec<T>, FilterError> + Send + Sync>;

/// Compute a filtered view.
///
/// Without a predicate the option set is returned unchanged. Identical
/// inputs always yield identical output as long as the predicate is pure.
pub fn compute_filtered<T: Clone>(
    options: &[T],
    query: &str,
    filter: Option<&FilterFn<T>>,
) -> Result<Vec<T>, FilterError> {
    match filter {
        Some(filter) => filter(options, &FilterQuery::new(query)),
        None => Ok(options.to_vec()),
    }
}

/// Holds the option set and the current filtered view.
pub struct OptionStore<T> {
    options: Vec<T>,
    filtered: Vec<T>,
    filter: Option<FilterFn<T>>,
}

impl<T: SelectOption> OptionStore<T> {
    /// Create a store whose filtered view starts equal to the option set.
    pub fn new(options: Vec<T>) -> Self {
        Self {
            filtered: options.clone(),
            options,
            filter: None,
        }
    }

    /// The full option set.
    pub fn options(&self) -> &[T] {
        &self.options
    }

    /// The current filtered view.
    pub fn filtered(&self) -> &[T] {
        &self.filtered
    }

    /// Replace the option set wholesale.
    ///
    /// The filtered view is left alone until the next [`recompute`](Self::recompute).
    pub fn set_options(&mut self, options: Vec<T>) {
        self.options = options;
    }

    /// Replace the filter predicate.
    pub fn set_filter(&mut self, filter: Option<FilterFn<T>>) {
        self.filter = filter;
    }

    /// Whether a filter predicate is installed.
    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// Recompute the filtered view for `query`.
    ///
    /// Returns the new filtered length so the navigation cursor can
    /// revalidate. On error the previous view is kept.
    #[tracing::instrument(
        name = "horizon_select::recompute",
        skip(self),
        target = "horizon_select::select",
        level = "debug"
    )]
    pub fn recompute(&mut self, query: &str) -> SelectResult<usize> {
        let filtered = compute_filtered(&self.options, query, self.filter.as_ref())?;
        tracing::debug!(
            target: horizon_select_core::logging::targets::SELECT,
            total = self.options.len(),
            filtered = filtered.len(),
            "filtered view recomputed"
        );
        self.filtered = filtered;
        Ok(self.filtered.len())
    }
}

// ============================================================================
// Built-in predicates
// ============================================================================

/// Controls how the built-in predicates handle letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    /// Case-sensitive matching (e.g., "App" won't match "apple").
    CaseSensitive,
    /// Case-insensitive matching (e.g., "App" will match "apple").
    #[default]
    CaseInsensitive,
}

/// Ready-made filter predicates matching on an option's display string.
pub mod filters {
    use super::*;

    fn matching<T, M>(case: CaseSensitivity, matches: M) -> FilterFn<T>
    where
        T: SelectOption,
        M: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        Arc::new(move |options: &[T], query: &FilterQuery<'_>| -> Result<Vec<T>, FilterError> {
            if query.query.is_empty() {
                return Ok(options.to_vec());
            }
            let needle = match case {
                CaseSensitivity::CaseSensitive => query.query.to_string(),
                CaseSensitivity::CaseInsensitive => query.query.to_lowercase(),
            };

            let mut out = Vec::new();
            for option in options {
                let text = display_string(option).map_err(|e| FilterError::new(e.to_string()))?;
                let text = match case {
                    CaseSensitivity::CaseSensitive => text,
                    CaseSensitivity::CaseInsensitive => text.to_lowercase(),
                };
                if matches(&text, &needle) {
                    out.push(option.clone());
                }
            }
            Ok(out)
        })
    }

    /// Keep options whose display string contains the query.
    pub fn contains<T: SelectOption>(case: CaseSensitivity) -> FilterFn<T> {
        matching(case, |text, needle| text.contains(needle))
    }

    /// Keep options whose display string starts with the query.
    pub fn starts_with<T: SelectOption>(case: CaseSensitivity) -> FilterFn<T> {
        matching(case, |text, needle| text.starts_with(needle))
    }
}
