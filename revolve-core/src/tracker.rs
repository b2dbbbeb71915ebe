//! Circular slot bookkeeping for the carousel track.
//!
//! Every mounted element is a slot with an unbounded logical position. The
//! set of positions is always a contiguous integer range. When an advance
//! would expose an empty edge, the slot at the opposite extreme is moved to
//! the far side of the range and translated by one full track width, which
//! keeps the loop seamless without re-rendering anything.

use tracing::trace;

use crate::config::Direction;
use crate::geometry::Geometry;
use crate::surface::{TransformTarget, ViewportSurface};

/// Tolerance for the viewport boundary check; slot ratios are not always
/// exact in floating point.
const POSITION_EPSILON: f64 = 1e-4;

/// Wrapper translate for a track whose first visible slot is `position`.
/// Always computed from the integer position, never accumulated.
pub fn wrapper_offset(position: i64, geometry: &Geometry) -> f64 {
    -(position as f64) * geometry.step()
}

/// State of one mounted element.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotState<H> {
    pub element: H,
    pub logical_position: i64,
    /// Accumulated translate (percent of one slot) applied to the element.
    pub cumulative_transform: f64,
}

/// Index of the slot holding the smallest logical position.
pub fn min_slot<H>(slots: &[SlotState<H>]) -> Option<usize> {
    slots
        .iter()
        .enumerate()
        .min_by_key(|(_, slot)| slot.logical_position)
        .map(|(index, _)| index)
}

/// Index of the slot holding the largest logical position.
pub fn max_slot<H>(slots: &[SlotState<H>]) -> Option<usize> {
    slots
        .iter()
        .enumerate()
        .max_by_key(|(_, slot)| slot.logical_position)
        .map(|(index, _)| index)
}

pub fn min_position<H>(slots: &[SlotState<H>]) -> Option<i64> {
    min_slot(slots).map(|index| slots[index].logical_position)
}

pub fn max_position<H>(slots: &[SlotState<H>]) -> Option<i64> {
    max_slot(slots).map(|index| slots[index].logical_position)
}

/// Result of a single advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    pub current_page: usize,
    pub wrapper_transform: f64,
    /// Slot moved to the opposite edge during this advance, if any.
    pub recycled: Option<usize>,
}

/// Slot positions, the wrapper offset and the current page of one track.
///
/// Recycled slots carry their accumulated translate; the wrapper offset is
/// derived from `first_item_position` after every advance.
#[derive(Debug, Clone)]
pub struct PositionTracker<H> {
    slots: Vec<SlotState<H>>,
    first_item_position: i64,
    wrapper_transform: f64,
    current_page: usize,
    pages_quantity: usize,
    geometry: Option<Geometry>,
}

impl<H> Default for PositionTracker<H> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            first_item_position: 0,
            wrapper_transform: 0.0,
            current_page: 0,
            pages_quantity: 0,
            geometry: None,
        }
    }
}

impl<H: Clone> PositionTracker<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[SlotState<H>] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn first_item_position(&self) -> i64 {
        self.first_item_position
    }

    pub fn wrapper_transform(&self) -> f64 {
        self.wrapper_transform
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn pages_quantity(&self) -> usize {
        self.pages_quantity
    }

    pub fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    /// Cycling only makes sense when some mounted element is off-screen.
    pub fn is_possible_to_cycle(&self, items_on_display: usize) -> bool {
        self.slots.len() > items_on_display
    }

    /// Zero the wrapper and every currently bound element.
    pub fn clear_position<S>(&mut self, surface: &mut S)
    where
        S: ViewportSurface<Handle = H>,
    {
        for slot in &self.slots {
            surface.apply_transform(TransformTarget::Slot(&slot.element), 0.0);
        }
        surface.apply_transform(TransformTarget::Wrapper, 0.0);
        self.wrapper_transform = 0.0;
    }

    /// Rebuild slot state for freshly mounted elements. Positions restart at
    /// `0..n` and all visual offsets are cleared.
    pub fn reset_and_build<S>(
        &mut self,
        surface: &mut S,
        elements: Vec<H>,
        geometry: Geometry,
        pages_quantity: usize,
    ) where
        S: ViewportSurface<Handle = H>,
    {
        self.first_item_position = 0;
        self.current_page = 0;
        self.pages_quantity = pages_quantity;
        self.geometry = Some(geometry);
        self.slots = elements
            .into_iter()
            .zip(0_i64..)
            .map(|(element, logical_position)| SlotState {
                element,
                logical_position,
                cumulative_transform: 0.0,
            })
            .collect();
        self.clear_position(surface);
    }

    /// Replace geometry after a resize that did not change the grouping.
    /// Transforms are percentages, so no offsets need reapplying.
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = Some(geometry);
    }

    /// Advance the track by one slot. Returns `None` when nothing is mounted
    /// or no geometry is known yet.
    pub fn advance<S>(
        &mut self,
        surface: &mut S,
        direction: Direction,
    ) -> Option<Advance>
    where
        S: ViewportSurface<Handle = H>,
    {
        let geometry = self.geometry?;
        if self.slots.is_empty() || self.pages_quantity == 0 {
            return None;
        }

        let track_span = self.slots.len() as f64 * 100.0;
        let recycled = match direction {
            Direction::Right => {
                self.first_item_position += 1;
                self.current_page =
                    (self.current_page + 1) % self.pages_quantity;

                let max = max_position(&self.slots)?;
                let last_visible = self.first_item_position as f64
                    + geometry.slots_per_viewport()
                    - 1.0;
                if last_visible > max as f64 + POSITION_EPSILON {
                    let index = min_slot(&self.slots)?;
                    let slot = &mut self.slots[index];
                    slot.logical_position = max + 1;
                    slot.cumulative_transform += track_span;
                    surface.apply_transform(
                        TransformTarget::Slot(&slot.element),
                        slot.cumulative_transform,
                    );
                    Some(index)
                } else {
                    None
                }
            }
            Direction::Left => {
                self.first_item_position -= 1;
                self.current_page = (self.pages_quantity + self.current_page
                    - 1)
                    % self.pages_quantity;

                let min = min_position(&self.slots)?;
                if self.first_item_position < min {
                    let index = max_slot(&self.slots)?;
                    let slot = &mut self.slots[index];
                    slot.logical_position = min - 1;
                    slot.cumulative_transform -= track_span;
                    surface.apply_transform(
                        TransformTarget::Slot(&slot.element),
                        slot.cumulative_transform,
                    );
                    Some(index)
                } else {
                    None
                }
            }
        };

        self.wrapper_transform =
            wrapper_offset(self.first_item_position, &geometry);

        if let Some(index) = recycled {
            trace!(
                slot = index,
                position = self.slots[index].logical_position,
                transform = self.slots[index].cumulative_transform,
                ?direction,
                "recycled slot"
            );
        }

        surface
            .apply_transform(TransformTarget::Wrapper, self.wrapper_transform);

        Some(Advance {
            current_page: self.current_page,
            wrapper_transform: self.wrapper_transform,
            recycled,
        })
    }
}
