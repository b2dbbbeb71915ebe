//! Synchronous slider core.
//!
//! `SliderEngine` owns the viewport surface, the position tracker and the
//! cycle scheduler for one slider instance and runs every layout, tick and
//! manual-turn handler to completion. It never sleeps; callers supply the
//! current instant and drive the scheduler's deadline themselves.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::{Direction, SliderConfig};
use crate::events::{SliderEvent, SliderEventBus};
use crate::geometry::{Geometry, compute_geometry};
use crate::pagination::{Page, build_pages};
use crate::scheduler::{CycleScheduler, TimerHandle};
use crate::store::StoreSnapshot;
use crate::surface::{ActiveSequence, LayoutPlan, ViewportSurface};
use crate::tracker::{Advance, PositionTracker};

/// Grouping a layout pass was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LayoutKey {
    items_on_display: usize,
    is_singly_cycle: bool,
}

impl From<&SliderConfig> for LayoutKey {
    fn from(config: &SliderConfig) -> Self {
        Self {
            items_on_display: config.items_on_display,
            is_singly_cycle: config.is_singly_cycle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayoutState {
    /// No usable layout yet: never built, or the viewport measured zero.
    Pending,
    Ready(LayoutKey),
    Halted,
}

/// What a layout or resize request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutOutcome {
    /// Full pass: pagination and slots rebuilt, scheduler restarted.
    Rebuilt,
    /// Geometry refreshed in place.
    Resized,
    /// Viewport width unavailable; retried on the next resize.
    Deferred,
    /// Engine has been shut down.
    Halted,
}

/// One slider instance: surface, slot tracker and cycle scheduler driven
/// from a single owner.
///
/// Every handler runs to completion against the instant it is given. After
/// [`shutdown`](Self::shutdown) all handlers are no-ops.
pub struct SliderEngine<S: ViewportSurface> {
    surface: S,
    config: SliderConfig,
    items: Arc<[S::Item]>,
    pages: Vec<Page<S::Item>>,
    tracker: PositionTracker<S::Handle>,
    scheduler: CycleScheduler,
    layout: LayoutState,
    events: SliderEventBus,
}

impl<S> std::fmt::Debug for SliderEngine<S>
where
    S: ViewportSurface + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliderEngine")
            .field("surface", &self.surface)
            .field("config", &self.config)
            .field("item_count", &self.items.len())
            .field("page_count", &self.pages.len())
            .field("tracker", &self.tracker)
            .field("scheduler", &self.scheduler)
            .field("layout", &self.layout)
            .finish()
    }
}

impl<S: ViewportSurface> SliderEngine<S> {
    pub fn new(
        surface: S,
        snapshot: StoreSnapshot<S::Item>,
        events: SliderEventBus,
    ) -> Self {
        Self {
            surface,
            config: snapshot.config,
            items: snapshot.items,
            pages: Vec::new(),
            tracker: PositionTracker::new(),
            scheduler: CycleScheduler::new(),
            layout: LayoutState::Pending,
            events,
        }
    }

    pub fn config(&self) -> &SliderConfig {
        &self.config
    }

    pub fn items(&self) -> &[S::Item] {
        &self.items
    }

    pub fn pages(&self) -> &[Page<S::Item>] {
        &self.pages
    }

    pub fn tracker(&self) -> &PositionTracker<S::Handle> {
        &self.tracker
    }

    pub fn scheduler(&self) -> &CycleScheduler {
        &self.scheduler
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn geometry(&self) -> Option<Geometry> {
        self.tracker.geometry()
    }

    pub fn current_page(&self) -> usize {
        self.tracker.current_page()
    }

    pub fn pages_quantity(&self) -> usize {
        self.tracker.pages_quantity()
    }

    pub fn is_laid_out(&self) -> bool {
        matches!(self.layout, LayoutState::Ready(_))
    }

    pub fn is_halted(&self) -> bool {
        self.layout == LayoutState::Halted
    }

    pub fn is_possible_to_cycle(&self) -> bool {
        self.tracker.is_possible_to_cycle(self.config.items_on_display)
    }

    pub fn next_deadline(&self) -> Option<(TimerHandle, Instant)> {
        self.scheduler.next_deadline()
    }

    /// Adopt the latest store contents. Takes effect on the next layout pass.
    pub fn apply_snapshot(&mut self, snapshot: StoreSnapshot<S::Item>) {
        self.config = snapshot.config;
        self.items = snapshot.items;
    }

    /// Full re-layout: clear offsets, measure, size, paginate, rebuild the
    /// slots and restart the cycle with the configured direction.
    pub fn relayout(&mut self, now: Instant) -> LayoutOutcome {
        if self.is_halted() {
            return LayoutOutcome::Halted;
        }

        self.scheduler.pause();
        self.tracker.clear_position(&mut self.surface);

        let wrapper_width = self.surface.viewport_width();
        if !(wrapper_width.is_finite() && wrapper_width > 0.0) {
            debug!(wrapper_width, "viewport not measurable; deferring layout");
            self.layout = LayoutState::Pending;
            return LayoutOutcome::Deferred;
        }

        let config = self.config;
        let geometry = compute_geometry(
            wrapper_width,
            config.items_on_display,
            config.is_singly_cycle,
        );
        self.pages = build_pages(
            &self.items,
            config.items_on_display,
            config.is_singly_cycle,
        );
        let pages_quantity = self.pages.len();

        let sequence = if config.is_singly_cycle {
            ActiveSequence::Items(&self.items[..])
        } else {
            ActiveSequence::Pages(self.pages.as_slice())
        };
        let expected = sequence.len();
        self.surface.mount(&LayoutPlan { geometry, sequence });

        let elements = self.surface.mounted_elements();
        if elements.len() != expected {
            warn!(
                mounted = elements.len(),
                expected, "mounted element count does not match active sequence"
            );
        }
        self.tracker.reset_and_build(
            &mut self.surface,
            elements,
            geometry,
            pages_quantity,
        );
        self.layout = LayoutState::Ready(LayoutKey::from(&config));

        debug!(
            wrapper_width,
            item_width = geometry.item_width,
            pages_quantity,
            slots = self.tracker.slot_count(),
            singly = config.is_singly_cycle,
            "slider layout rebuilt"
        );

        self.events
            .publish(SliderEvent::PagesQuantityChanged(pages_quantity));
        self.events.publish(SliderEvent::CurrentPageChanged(0));

        let possible = self.is_possible_to_cycle();
        self.scheduler.start(config.direction, &config, possible, now);

        LayoutOutcome::Rebuilt
    }

    /// Viewport size changed. Only geometry is refreshed, and handed to the
    /// surface, unless the grouping changed or no layout exists yet, in which
    /// case a full pass runs.
    pub fn resize(&mut self, now: Instant) -> LayoutOutcome {
        let key = match self.layout {
            LayoutState::Halted => return LayoutOutcome::Halted,
            LayoutState::Pending => return self.relayout(now),
            LayoutState::Ready(key) => key,
        };
        if key != LayoutKey::from(&self.config) {
            return self.relayout(now);
        }

        let wrapper_width = self.surface.viewport_width();
        if !(wrapper_width.is_finite() && wrapper_width > 0.0) {
            debug!(
                wrapper_width,
                "viewport collapsed; keeping previous geometry"
            );
            return LayoutOutcome::Deferred;
        }

        let geometry = compute_geometry(
            wrapper_width,
            self.config.items_on_display,
            self.config.is_singly_cycle,
        );
        self.tracker.set_geometry(geometry);
        self.surface.apply_geometry(&geometry);
        debug!(
            wrapper_width,
            item_width = geometry.item_width,
            "slider geometry refreshed"
        );
        LayoutOutcome::Resized
    }

    /// Scheduled firing. Stale handles and ticks after teardown are ignored.
    pub fn tick(
        &mut self,
        handle: TimerHandle,
        now: Instant,
    ) -> Option<Advance> {
        if !self.is_laid_out() {
            return None;
        }
        let direction = self.scheduler.accept_tick(handle, now)?;
        self.advance(direction)
    }

    /// Advance immediately, then restart the cycle so the next automatic
    /// advance is a full interval away. The restart always uses the
    /// configured direction, not `direction`.
    pub fn manual_turn(
        &mut self,
        direction: Direction,
        now: Instant,
    ) -> Option<Advance> {
        if !self.is_laid_out() {
            debug!(?direction, "ignoring manual turn before layout");
            return None;
        }

        self.scheduler.pause();
        let advance = self.advance(direction);
        let config = self.config;
        let possible = self.is_possible_to_cycle();
        self.scheduler.start(config.direction, &config, possible, now);
        advance
    }

    /// Returns `true` if a running cycle was paused.
    pub fn hover_enter(&mut self) -> bool {
        self.scheduler.hover_enter(&self.config)
    }

    pub fn hover_leave(&mut self, now: Instant) -> bool {
        let possible = self.is_possible_to_cycle();
        self.scheduler.hover_leave(&self.config, possible, now)
    }

    /// Terminal teardown: the timer is cleared and every later call no-ops.
    pub fn shutdown(&mut self) {
        self.scheduler.stop();
        self.layout = LayoutState::Halted;
    }

    fn advance(&mut self, direction: Direction) -> Option<Advance> {
        if !self.is_possible_to_cycle() {
            debug!(
                slots = self.tracker.slot_count(),
                items_on_display = self.config.items_on_display,
                "not enough slots to cycle"
            );
            return None;
        }

        let advance = self.tracker.advance(&mut self.surface, direction)?;
        self.events
            .publish(SliderEvent::CurrentPageChanged(advance.current_page));
        Some(advance)
    }
}
