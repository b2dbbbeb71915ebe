//! Boundary between the engine and the host that owns the rendered viewport.
//!
//! The host measures the wrapper, renders the active element sequence, hands
//! back opaque handles for the mounted elements and applies translate
//! offsets. The engine never reads a transform back; handles are write-only
//! targets.

use std::fmt;

use crate::geometry::Geometry;
use crate::pagination::Page;

/// Elements the host should mount, in slot order.
#[derive(Debug)]
pub enum ActiveSequence<'a, T> {
    /// Singly-cycle mode: one element per item.
    Items(&'a [T]),
    /// Page mode: one element per page.
    Pages(&'a [Page<T>]),
}

impl<T> ActiveSequence<'_, T> {
    pub fn len(&self) -> usize {
        match self {
            ActiveSequence::Items(items) => items.len(),
            ActiveSequence::Pages(pages) => pages.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything the host needs to render one layout pass.
#[derive(Debug)]
pub struct LayoutPlan<'a, T> {
    pub geometry: Geometry,
    pub sequence: ActiveSequence<'a, T>,
}

/// Element receiving a translate offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformTarget<'a, H> {
    /// The wrapper (track) that slides under the viewport.
    Wrapper,
    /// A single mounted slot element.
    Slot(&'a H),
}

/// Viewport geometry provider and transform sink.
pub trait ViewportSurface: Send {
    /// Caller-supplied item payload.
    type Item: Clone + Send + Sync + 'static;
    /// Opaque reference to a mounted element.
    type Handle: Clone + Send + fmt::Debug;

    /// Current wrapper width in pixels. Zero means the viewport is not
    /// measurable yet.
    fn viewport_width(&self) -> f64;

    /// Render the active sequence sized by the plan's geometry.
    fn mount(&mut self, plan: &LayoutPlan<'_, Self::Item>);

    /// Handles for the mounted elements, in the order they were rendered.
    fn mounted_elements(&self) -> Vec<Self::Handle>;

    /// Resize the already mounted elements to `geometry` after a viewport
    /// resize that kept the grouping. Offsets stay valid since they are
    /// percentages.
    fn apply_geometry(&mut self, geometry: &Geometry);

    /// Set the horizontal translate of `target` to `percent`.
    fn apply_transform(
        &mut self,
        target: TransformTarget<'_, Self::Handle>,
        percent: f64,
    );
}
