//! Slider configuration, partial updates, and the structured change message
//! published whenever a merge touches at least one field.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Turning direction for both automatic and manual advances.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Track moves so earlier items come into view.
    Left,
    /// Track moves so later items come into view.
    #[default]
    Right,
}

/// Full slider configuration. Every field carries a default so hosts can
/// start from [`SliderConfig::default`] and apply partial overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Advance automatically on a timer.
    pub is_cycling: bool,
    /// Direction used by the automatic cycle.
    pub direction: Direction,
    /// Milliseconds between automatic advances.
    pub interval_ms: u64,
    /// Suspend automatic cycling while the pointer is over the viewport.
    pub is_pause_by_hover: bool,
    /// Host hint: render the built-in previous/next buttons.
    pub is_default_buttons: bool,
    /// Advance one item at a time. `false` turns a whole page per advance.
    pub is_singly_cycle: bool,
    /// Number of items visible in the viewport at once.
    pub items_on_display: usize,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            is_cycling: true,
            direction: Direction::Right,
            interval_ms: 5_000,
            is_pause_by_hover: true,
            is_default_buttons: true,
            is_singly_cycle: true,
            items_on_display: 3,
        }
    }
}

impl SliderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items_on_display == 0 {
            return Err(ConfigError::ZeroItemsOnDisplay);
        }
        if self.is_cycling && self.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    /// Shallow merge: present keys overwrite, absent keys keep their value.
    /// Returns the merged config and the set of fields whose value changed.
    pub fn merged(
        &self,
        partial: &PartialSliderConfig,
    ) -> (Self, ConfigFields) {
        let mut next = *self;
        let mut changed = ConfigFields::empty();

        macro_rules! merge_field {
            ($field:ident, $flag:expr) => {
                if let Some(value) = partial.$field
                    && value != next.$field
                {
                    next.$field = value;
                    changed |= $flag;
                }
            };
        }

        merge_field!(is_cycling, ConfigFields::IS_CYCLING);
        merge_field!(direction, ConfigFields::DIRECTION);
        merge_field!(interval_ms, ConfigFields::INTERVAL);
        merge_field!(is_pause_by_hover, ConfigFields::PAUSE_BY_HOVER);
        merge_field!(is_default_buttons, ConfigFields::DEFAULT_BUTTONS);
        merge_field!(is_singly_cycle, ConfigFields::SINGLY_CYCLE);
        merge_field!(items_on_display, ConfigFields::ITEMS_ON_DISPLAY);

        (next, changed)
    }
}

/// Partial configuration update. `None` leaves the current value in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialSliderConfig {
    pub is_cycling: Option<bool>,
    pub direction: Option<Direction>,
    pub interval_ms: Option<u64>,
    pub is_pause_by_hover: Option<bool>,
    pub is_default_buttons: Option<bool>,
    pub is_singly_cycle: Option<bool>,
    pub items_on_display: Option<usize>,
}

impl PartialSliderConfig {
    pub fn cycling(mut self, value: bool) -> Self {
        self.is_cycling = Some(value);
        self
    }

    pub fn direction(mut self, value: Direction) -> Self {
        self.direction = Some(value);
        self
    }

    pub fn interval_ms(mut self, value: u64) -> Self {
        self.interval_ms = Some(value);
        self
    }

    pub fn pause_by_hover(mut self, value: bool) -> Self {
        self.is_pause_by_hover = Some(value);
        self
    }

    pub fn default_buttons(mut self, value: bool) -> Self {
        self.is_default_buttons = Some(value);
        self
    }

    pub fn singly_cycle(mut self, value: bool) -> Self {
        self.is_singly_cycle = Some(value);
        self
    }

    pub fn items_on_display(mut self, value: usize) -> Self {
        self.items_on_display = Some(value);
        self
    }
}

bitflags! {
    /// Set of configuration fields touched by a merge.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ConfigFields: u8 {
        const IS_CYCLING = 1 << 0;
        const DIRECTION = 1 << 1;
        const INTERVAL = 1 << 2;
        const PAUSE_BY_HOVER = 1 << 3;
        const DEFAULT_BUTTONS = 1 << 4;
        const SINGLY_CYCLE = 1 << 5;
        const ITEMS_ON_DISPLAY = 1 << 6;

        /// Fields that change how items are grouped and sized.
        const LAYOUT =
            Self::SINGLY_CYCLE.bits() | Self::ITEMS_ON_DISPLAY.bits();
    }
}

/// One structured notification per effective `set_config` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigChange {
    pub config: SliderConfig,
    pub changed: ConfigFields,
}

impl ConfigChange {
    pub fn touches(&self, fields: ConfigFields) -> bool {
        self.changed.intersects(fields)
    }
}
