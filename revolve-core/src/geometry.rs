//! Viewport geometry: item and group widths derived from the wrapper width.

/// Pixel widths for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Width of the wrapper (viewport) in pixels.
    pub wrapper_width: f64,
    /// Width of one slot. In page mode a slot is a full page.
    pub item_width: f64,
    /// Width of a single item inside a page. Only set in page mode.
    pub group_width: Option<f64>,
}

impl Geometry {
    /// Percentage translated per advance.
    #[inline]
    pub fn step(&self) -> f64 {
        self.item_width / self.wrapper_width * 100.0
    }

    /// Number of slots that fit in the viewport.
    #[inline]
    pub fn slots_per_viewport(&self) -> f64 {
        self.wrapper_width / self.item_width
    }
}

/// Derive slot widths for the given wrapper width.
///
/// `items_on_display == 0` is rejected upstream by
/// [`SliderConfig::validate`](crate::config::SliderConfig::validate); if it
/// reaches this function the widths are non-finite.
pub fn compute_geometry(
    wrapper_width: f64,
    items_on_display: usize,
    is_singly_cycle: bool,
) -> Geometry {
    let per_item = wrapper_width / items_on_display as f64;
    if is_singly_cycle {
        Geometry {
            wrapper_width,
            item_width: per_item,
            group_width: None,
        }
    } else {
        Geometry {
            wrapper_width,
            item_width: wrapper_width,
            group_width: Some(per_item),
        }
    }
}
