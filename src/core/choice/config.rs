//=========================================================================
// Presenter Configuration
//=========================================================================
//
// Plain-data configuration for the choice presenter, validated once at
// construction. Anything wrong here is a wiring mistake and aborts setup.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::candidate::{HorizontalZone, Placement, VerticalZone};
use crate::core::error::ConfigurationError;

//=== PlacementLayout =====================================================

/// Maps placement zones to anchor offsets in presentation units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementLayout {
    pub top: f32,
    pub middle: f32,
    pub bottom: f32,
    pub left: f32,
    pub center: f32,
    pub right: f32,
}

impl PlacementLayout {
    /// Resolves a placement to an `(x, y)` anchor.
    pub fn anchor(&self, placement: Placement) -> (f32, f32) {
        let x = match placement.horizontal {
            HorizontalZone::Left => self.left,
            HorizontalZone::Center => self.center,
            HorizontalZone::Right => self.right,
        };
        let y = match placement.vertical {
            VerticalZone::Top => self.top,
            VerticalZone::Middle => self.middle,
            VerticalZone::Bottom => self.bottom,
        };
        (x, y)
    }
}

impl Default for PlacementLayout {
    fn default() -> Self {
        Self {
            top: 85.0,
            middle: 65.0,
            bottom: 55.0,
            left: -25.0,
            center: 0.0,
            right: 45.0,
        }
    }
}

//=== ItemTemplate ========================================================

/// Blueprint every pooled presentation item is created from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ItemTemplate {
    /// Anchor an item holds while pooled or delaying.
    pub rest_anchor: (f32, f32),
    pub layout: PlacementLayout,
}

//=== FadeTiming ==========================================================

/// Fade durations shared by every item of a presenter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeTiming {
    pub fade_in: f32,
    pub fade_out: f32,
}

//=== PresenterConfig =====================================================

/// Presenter settings.
///
/// # Default Values
///
/// - **show_unavailable**: false
/// - **fade_in_seconds**: 0.25
/// - **fade_out_seconds**: 0.1
/// - **item_template**: `Some(ItemTemplate::default())`
/// - **max_slots**: unbounded
#[derive(Debug, Clone, PartialEq)]
pub struct PresenterConfig {
    /// Present candidates whose availability flag is false.
    pub show_unavailable: bool,
    pub fade_in_seconds: f32,
    pub fade_out_seconds: f32,
    pub item_template: Option<ItemTemplate>,
    /// Upper bound on pooled items; extra candidates are dropped with a warning.
    pub max_slots: Option<usize>,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            show_unavailable: false,
            fade_in_seconds: 0.25,
            fade_out_seconds: 0.1,
            item_template: Some(ItemTemplate::default()),
            max_slots: None,
        }
    }
}

impl PresenterConfig {
    /// Checks the configuration for wiring mistakes.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.item_template.is_none() {
            return Err(ConfigurationError::MissingItemTemplate);
        }
        check_duration("fade_in_seconds", self.fade_in_seconds)?;
        check_duration("fade_out_seconds", self.fade_out_seconds)?;
        if self.max_slots == Some(0) {
            return Err(ConfigurationError::ZeroSlotCap);
        }
        Ok(())
    }

    pub(crate) fn fades(&self) -> FadeTiming {
        FadeTiming {
            fade_in: self.fade_in_seconds,
            fade_out: self.fade_out_seconds,
        }
    }
}

fn check_duration(name: &'static str, value: f32) -> Result<(), ConfigurationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidDuration { name, value })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(PresenterConfig::default().validate(), Ok(()));
    }

    #[test]
    fn missing_template_is_rejected() {
        let config = PresenterConfig {
            item_template: None,
            ..PresenterConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigurationError::MissingItemTemplate));
    }

    #[test]
    fn bad_fade_is_rejected() {
        let config = PresenterConfig {
            fade_out_seconds: -0.5,
            ..PresenterConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidDuration { name: "fade_out_seconds", .. })
        ));

        let config = PresenterConfig {
            fade_in_seconds: f32::NAN,
            ..PresenterConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_slot_cap_is_rejected() {
        let config = PresenterConfig {
            max_slots: Some(0),
            ..PresenterConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigurationError::ZeroSlotCap));
    }

    #[test]
    fn layout_maps_zones() {
        let layout = PlacementLayout::default();
        let anchor = layout.anchor(Placement::new(VerticalZone::Top, HorizontalZone::Right));
        assert_eq!(anchor, (45.0, 85.0));
        assert_eq!(layout.anchor(Placement::default()), (0.0, 65.0));
    }
}
