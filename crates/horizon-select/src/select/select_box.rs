//! The interaction state machine.
//!
//! [`SelectBox`] owns the query, the open flag, the filtered view and the
//! active index. It dispatches input events to the navigation cursor and the
//! selection manager, routes recomputes through the debounce scheduler, and
//! reports everything the host cares about through signals.
//!
//! # Example
//!
//! ```
//! use horizon_select::prelude::*;
//!
//! let mut select = SelectBox::new(
//!     SelectConfig::new(vec!["apple", "banana", "orange"]),
//! ).unwrap();
//!
//! select.handle_event(SelectEvent::PointerDownInput).unwrap();
//! select.handle_event(Key::ArrowDown.into()).unwrap();
//! assert_eq!(select.active_option(), Some(&"banana"));
//!
//! select.handle_event(Key::Enter.into()).unwrap();
//! assert!(!select.is_open());
//! assert_eq!(select.value(), &Selection::single("banana"));
//! ```

use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

use horizon_select_core::logging::targets;
use horizon_select_core::{SharedTimerManager, Signal, TimerId};

use crate::error::SelectResult;
use crate::geometry::{Point, Rect};
use crate::select::config::SelectConfig;
use crate::select::cursor::NavigationCursor;
use crate::select::debounce::{DebounceScheduler, Schedule};
use crate::select::events::{EscapeFocus, Key, SelectEvent};
use crate::select::option::SelectOption;
use crate::select::placement::{Placement, PlacementStrategy};
use crate::select::render::{OptionView, RenderFn, render_label};
use crate::select::selection::{Selection, SelectionManager, SelectionMode};
use crate::select::store::{FilterFn, OptionStore};

/// The part of the widget under a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectPart {
    /// Outside the input and the panel.
    #[default]
    None,
    /// The text input.
    Input,
    /// Panel area below the last option.
    Panel,
    /// An option row of the filtered view.
    Option(usize),
}

/// A filterable select box with single or multiple selection.
///
/// The widget is headless: the host forwards input with
/// [`handle_event`](Self::handle_event), delivers fired debounce timers with
/// [`handle_timer`](Self::handle_timer) or [`poll_timers`](Self::poll_timers),
/// and draws from [`option_views`](Self::option_views) and
/// [`panel_placement`](Self::panel_placement).
pub struct SelectBox<T: SelectOption> {
    store: OptionStore<T>,
    debounce: DebounceScheduler,
    selection: SelectionManager<T>,
    cursor: NavigationCursor,

    /// Current input text.
    query: String,
    /// Whether the option panel is visible.
    open: bool,
    /// Whether the input is the active control.
    focused: bool,
    /// Mirrors the scheduler's pending state for change notification.
    busy: bool,
    disabled: bool,

    render: Option<RenderFn>,
    label: Option<String>,
    description: Option<String>,
    placeholder: Option<String>,
    escape_focus: EscapeFocus,
    page_size: usize,
    item_height: f32,
    /// First filtered row shown at the top of the panel.
    scroll_offset: usize,

    placement: Arc<dyn PlacementStrategy>,
    anchor: Rect,
    viewport: Rect,

    // Signals
    /// Emitted with the proposed selection after every selection action.
    pub changed: Signal<Selection<T>>,
    /// Emitted with the new query whenever the user edits the input.
    pub input_changed: Signal<String>,
    /// Emitted when the panel opens or closes.
    pub open_changed: Signal<bool>,
    /// Emitted when a debounced recompute starts or finishes waiting.
    pub loading_changed: Signal<bool>,
    /// Emitted when the input should take keyboard focus.
    pub focus_requested: Signal<()>,
}

impl<T: SelectOption> SelectBox<T> {
    /// Build a select box from its configuration.
    ///
    /// The initial filtered view is computed right away for the empty
    /// query, even when loading, so the first open never shows stale data.
    /// Fails if the filter predicate does.
    pub fn new(config: SelectConfig<T>) -> SelectResult<Self> {
        let SelectConfig {
            options,
            value,
            mode,
            loading,
            disabled,
            debounce,
            filter,
            render,
            label,
            description,
            placeholder,
            escape_focus,
            controlled,
            page_size,
            item_height,
            placement,
            timers,
        } = config;

        let mut store = OptionStore::new(options);
        store.set_filter(filter);
        store.recompute("")?;

        let mut selection = SelectionManager::new(mode);
        selection.set_controlled(controlled);
        if let Some(value) = value {
            selection.set_value(value)?;
        }

        let timers = timers.unwrap_or_else(|| Arc::new(SharedTimerManager::new()));
        let mut scheduler = DebounceScheduler::new(timers, debounce);
        scheduler.set_loading(loading);

        tracing::debug!(
            target: targets::SELECT,
            options = store.options().len(),
            ?mode,
            loading,
            "select box created"
        );

        Ok(Self {
            store,
            debounce: scheduler,
            selection,
            cursor: NavigationCursor::new(),
            query: String::new(),
            open: false,
            focused: false,
            busy: false,
            disabled,
            render,
            label,
            description,
            placeholder,
            escape_focus,
            page_size,
            item_height,
            scroll_offset: 0,
            placement,
            anchor: Rect::ZERO,
            viewport: Rect::ZERO,
            changed: Signal::new(),
            input_changed: Signal::new(),
            open_changed: Signal::new(),
            loading_changed: Signal::new(),
            focus_requested: Signal::new(),
        })
    }

    // =========================================================================
    // Observable State
    // =========================================================================

    /// Whether the option panel is visible.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether a debounced recompute is pending.
    pub fn is_loading(&self) -> bool {
        self.busy
    }

    /// Whether the input is the active control.
    pub fn has_focus(&self) -> bool {
        self.focused
    }

    /// Whether input is suppressed.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The current query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The full option set.
    pub fn options(&self) -> &[T] {
        self.store.options()
    }

    /// The current filtered view.
    pub fn filtered_options(&self) -> &[T] {
        self.store.filtered()
    }

    /// The active index into the filtered view.
    pub fn active_index(&self) -> Option<usize> {
        self.cursor.active()
    }

    /// The active option.
    pub fn active_option(&self) -> Option<&T> {
        self.cursor.active().and_then(|i| self.store.filtered().get(i))
    }

    /// The current selection.
    pub fn value(&self) -> &Selection<T> {
        self.selection.value()
    }

    /// The selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    /// Whether selection proposals wait for the host.
    pub fn is_controlled(&self) -> bool {
        self.selection.is_controlled()
    }

    /// The visible label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The description text.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The input placeholder.
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// First filtered row shown at the top of the panel.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// How many whole rows fit in the panel.
    ///
    /// Until the host reports geometry the whole filtered view counts as
    /// visible.
    pub fn visible_rows(&self) -> usize {
        let max_height = self
            .placement
            .compute_placement(self.anchor, self.viewport)
            .max_height;
        if max_height <= 0.0 || self.item_height <= 0.0 {
            return self.store.filtered().len().max(1);
        }
        ((max_height / self.item_height) as usize).max(1)
    }

    /// Indices of the filtered rows the panel shows, top to bottom.
    pub fn visible_range(&self) -> Range<usize> {
        let len = self.store.filtered().len();
        let start = self.scroll_offset.min(len);
        start..(start + self.visible_rows()).min(len)
    }

    /// Per-option presentation state for the filtered view.
    pub fn option_views(&self) -> SelectResult<Vec<OptionView>> {
        let active = self.cursor.active();
        self.store
            .filtered()
            .iter()
            .enumerate()
            .map(|(index, option)| -> SelectResult<OptionView> {
                Ok(OptionView {
                    index,
                    label: render_label(option, &self.query, self.render.as_ref())?,
                    active: active == Some(index),
                    selected: self.selection.is_selected(option)?,
                })
            })
            .collect()
    }

    // =========================================================================
    // Host Inputs
    // =========================================================================

    /// Replace the option set.
    pub fn set_options(&mut self, options: Vec<T>) -> SelectResult<()> {
        self.store.set_options(options);
        self.refresh()
    }

    /// Replace the filter predicate. `None` restores the identity filter.
    pub fn set_filter(&mut self, filter: Option<FilterFn<T>>) -> SelectResult<()> {
        self.store.set_filter(filter);
        self.refresh()
    }

    /// Replace the selection, e.g. to accept a proposal in controlled mode.
    pub fn set_value(&mut self, value: Selection<T>) -> SelectResult<()> {
        self.selection.set_value(value)
    }

    /// Switch between single and multiple selection.
    pub fn set_multiple(&mut self, multiple: bool) -> SelectResult<()> {
        let mode = if multiple {
            SelectionMode::Multiple
        } else {
            SelectionMode::Single
        };
        self.selection.set_mode(mode)
    }

    /// Update the host loading flag.
    ///
    /// Turning loading off while a recompute is pending runs it now.
    pub fn set_loading(&mut self, loading: bool) -> SelectResult<()> {
        if self.debounce.loading() == loading {
            return Ok(());
        }
        tracing::debug!(target: targets::SELECT, loading, "loading flag changed");

        let flush = self.debounce.set_loading(loading);
        let result = if flush { self.recompute() } else { Ok(()) };
        self.sync_busy();
        result
    }

    /// Enable or disable the widget. Disabling closes the panel.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.set_open(false);
        }
    }

    /// Set the debounce delay used while loading.
    pub fn set_debounce(&mut self, delay: Duration) {
        self.debounce.set_delay(delay);
    }

    /// Install or remove the option renderer.
    pub fn set_render_option(&mut self, render: Option<RenderFn>) {
        self.render = render;
    }

    /// Set the bounds of the input, in viewport coordinates.
    pub fn set_anchor(&mut self, anchor: Rect) {
        self.anchor = anchor;
    }

    /// Set the viewport the panel must fit in.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Where the panel goes, or `None` while closed.
    pub fn panel_placement(&self) -> Option<Placement> {
        self.open
            .then(|| self.placement.compute_placement(self.anchor, self.viewport))
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Deliver a fired timer.
    ///
    /// Returns `true` if the timer was this widget's pending recompute.
    /// Anything else, including ids that were cancelled, is ignored.
    pub fn handle_timer(&mut self, id: TimerId) -> SelectResult<bool> {
        if !self.debounce.fire(id) {
            return Ok(false);
        }
        let result = self.recompute();
        self.sync_busy();
        result.map(|()| true)
    }

    /// Process expired timers on this widget's queue.
    ///
    /// Only suitable when the queue is not shared; with a shared queue the
    /// host drains it once and routes each id to every widget.
    pub fn poll_timers(&mut self) -> SelectResult<usize> {
        let fired = self.debounce.timers().process_expired();
        let mut handled = 0;
        for id in fired {
            if self.handle_timer(id)? {
                handled += 1;
            }
        }
        Ok(handled)
    }

    /// Time until the next timer on this widget's queue fires.
    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.debounce.timers().time_until_next()
    }

    /// The timer queue driving the debounce.
    pub fn timers(&self) -> &Arc<SharedTimerManager> {
        self.debounce.timers()
    }

    /// Cancel pending work and close. Also happens on drop.
    pub fn teardown(&mut self) {
        self.debounce.cancel();
        self.sync_busy();
        self.set_open(false);
        tracing::debug!(target: targets::SELECT, "select box torn down");
    }

    // =========================================================================
    // Event Dispatch
    // =========================================================================

    /// Handle an input event.
    ///
    /// Returns whether the event was consumed. Disabled widgets consume
    /// nothing.
    #[tracing::instrument(
        name = "horizon_select::dispatch",
        skip(self),
        target = "horizon_select::select",
        level = "trace"
    )]
    pub fn handle_event(&mut self, event: SelectEvent) -> SelectResult<bool> {
        if self.disabled {
            return Ok(false);
        }

        match event {
            SelectEvent::PointerDownInput => {
                self.open_panel();
                self.request_focus();
                Ok(true)
            }
            SelectEvent::PointerDown(point) => self.handle_pointer_down(point),
            SelectEvent::InputChanged(text) => self.set_query(text),
            SelectEvent::OptionClicked(index) => {
                if !self.open {
                    return Ok(false);
                }
                self.select_filtered(index)
            }
            SelectEvent::OptionHovered(index) => {
                Ok(self.open && self.cursor.set(index, self.store.filtered().len()))
            }
            SelectEvent::Scroll(rows) => Ok(self.open && self.scroll_by(rows)),
            SelectEvent::KeyPress(key) => self.handle_key(key),
            SelectEvent::ClickOutside => Ok(self.click_outside()),
        }
    }

    /// Which part of the widget is at `point`.
    pub fn hit_test(&self, point: Point) -> SelectPart {
        if let Some(placement) = self.panel_placement() {
            let len = self.store.filtered().len();
            let shown = len.saturating_sub(self.scroll_offset);
            let content = Rect::new(
                placement.x,
                placement.y,
                placement.width,
                (shown as f32 * self.item_height).min(placement.max_height),
            );
            if content.contains(point) {
                let row = ((point.y - content.top()) / self.item_height) as usize
                    + self.scroll_offset;
                return if row < len {
                    SelectPart::Option(row)
                } else {
                    SelectPart::Panel
                };
            }
        }
        if self.anchor.contains(point) {
            SelectPart::Input
        } else {
            SelectPart::None
        }
    }

    fn handle_pointer_down(&mut self, point: Point) -> SelectResult<bool> {
        match self.hit_test(point) {
            SelectPart::Option(index) => self.select_filtered(index),
            SelectPart::Panel => Ok(true),
            SelectPart::Input => self.handle_event(SelectEvent::PointerDownInput),
            SelectPart::None => Ok(self.click_outside()),
        }
    }

    fn handle_key(&mut self, key: Key) -> SelectResult<bool> {
        let len = self.store.filtered().len();

        match key {
            Key::Character(c) => {
                let mut query = self.query.clone();
                query.push(c);
                return self.set_query(query);
            }
            Key::Backspace => {
                let Some((start, _)) = self.query.grapheme_indices(true).next_back() else {
                    return Ok(false);
                };
                let mut query = self.query.clone();
                query.truncate(start);
                return self.set_query(query);
            }
            _ => {}
        }

        if !self.open {
            return Ok(false);
        }

        match key {
            Key::ArrowDown => self.cursor.move_down(len),
            Key::ArrowUp => self.cursor.move_up(len),
            Key::Home => self.cursor.move_first(len),
            Key::End => self.cursor.move_last(len),
            Key::PageDown => self.cursor.page_down(len, self.page_size),
            Key::PageUp => self.cursor.page_up(len, self.page_size),
            Key::Enter => {
                return match self.cursor.active() {
                    Some(index) => self.select_filtered(index),
                    None => Ok(false),
                };
            }
            Key::Escape => {
                self.set_open(false);
                if self.escape_focus == EscapeFocus::Release {
                    self.focused = false;
                }
            }
            Key::Character(_) | Key::Backspace => {}
        }
        self.ensure_active_visible();
        Ok(true)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn set_open(&mut self, open: bool) {
        if self.open == open {
            return;
        }
        self.open = open;
        if !open {
            self.cursor.clear();
            self.scroll_offset = 0;
        }
        tracing::debug!(target: targets::SELECT, open, "panel visibility changed");
        self.open_changed.emit(open);
    }

    fn open_panel(&mut self) {
        self.set_open(true);
        self.cursor.on_open(self.store.filtered().len());
        self.scroll_offset = 0;
    }

    /// Scroll just far enough that the active row is inside the panel.
    fn ensure_active_visible(&mut self) {
        let Some(active) = self.cursor.active() else {
            return;
        };
        let rows = self.visible_rows();
        if active < self.scroll_offset {
            self.scroll_offset = active;
        } else if active >= self.scroll_offset + rows {
            self.scroll_offset = active + 1 - rows;
        }
    }

    fn max_scroll(&self) -> usize {
        self.store
            .filtered()
            .len()
            .saturating_sub(self.visible_rows())
    }

    /// Move the panel window by `rows`, negative scrolling up. Returns
    /// whether the window moved.
    fn scroll_by(&mut self, rows: i32) -> bool {
        let target = if rows < 0 {
            self.scroll_offset.saturating_sub(rows.unsigned_abs() as usize)
        } else {
            self.scroll_offset.saturating_add(rows as usize)
        };
        let offset = target.min(self.max_scroll());
        let moved = offset != self.scroll_offset;
        self.scroll_offset = offset;
        moved
    }

    fn click_outside(&mut self) -> bool {
        let consumed = self.open || self.focused;
        self.set_open(false);
        self.focused = false;
        consumed
    }

    fn request_focus(&mut self) {
        self.focused = true;
        self.focus_requested.emit(());
    }

    fn set_query(&mut self, query: String) -> SelectResult<bool> {
        self.query = query;
        self.input_changed.emit(self.query.clone());
        self.set_open(true);

        let result = self.refresh();
        self.cursor.on_open(self.store.filtered().len());
        self.scroll_offset = 0;
        result.map(|()| true)
    }

    /// Apply the mode's selection action to filtered option `index`.
    fn select_filtered(&mut self, index: usize) -> SelectResult<bool> {
        let len = self.store.filtered().len();
        let Some(option) = self.store.filtered().get(index).cloned() else {
            return Ok(false);
        };
        self.cursor.set(index, len);
        self.ensure_active_visible();

        let change = self.selection.select(option)?;
        tracing::debug!(
            target: targets::SELECT,
            index,
            selected = change.value.len(),
            "selection changed"
        );
        self.changed.emit(change.value);

        if change.close_panel {
            self.set_open(false);
        }
        self.request_focus();
        Ok(true)
    }

    /// Route an input change through the debounce scheduler.
    fn refresh(&mut self) -> SelectResult<()> {
        let result = match self.debounce.request() {
            Schedule::Immediate => self.recompute(),
            Schedule::Deferred(_) => Ok(()),
        };
        self.sync_busy();
        result
    }

    fn recompute(&mut self) -> SelectResult<()> {
        let len = self.store.recompute(&self.query)?;
        self.cursor.on_filtered_view_changed(len);
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
        Ok(())
    }

    fn sync_busy(&mut self) {
        let busy = self.debounce.is_pending();
        if self.busy != busy {
            self.busy = busy;
            self.loading_changed.emit(busy);
        }
    }
}

impl<T: SelectOption> std::fmt::Debug for SelectBox<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectBox")
            .field("query", &self.query)
            .field("open", &self.open)
            .field("focused", &self.focused)
            .field("busy", &self.busy)
            .field("disabled", &self.disabled)
            .field("active", &self.cursor.active())
            .field("scroll_offset", &self.scroll_offset)
            .field("filtered", &self.store.filtered().len())
            .field("mode", &self.selection.mode())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(SelectBox<crate::select::option::OptionItem>: Send, Sync);
