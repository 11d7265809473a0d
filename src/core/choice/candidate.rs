//=========================================================================
// Choice Candidates
//=========================================================================
//
// Immutable input to a choice session, plus recovery-first parsing of the
// `parameter:value` timing/placement hints that script lines carry.
//
// Hint order: delay, duration, vertical zone, horizontal zone.
//
//   "delay:0.5"  "duration:3"  "v:top"  "h:left"
//
// Any malformed hint is logged and replaced by its default; parsing never
// fails the candidate.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::error::MetadataParseError;

//=== Defaults ============================================================

/// Pre-delay used when the delay hint is missing or malformed.
pub const DEFAULT_DELAY_SECONDS: f32 = 0.0;

/// Visible duration used when the duration hint is missing or malformed.
pub const DEFAULT_HOLD_SECONDS: f32 = 3.0;

//=== CandidateId =========================================================

/// Identifier of a candidate within one presentation batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CandidateId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

//=== Placement ===========================================================

/// Vertical screen zone hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalZone {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Horizontal screen zone hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalZone {
    Left,
    #[default]
    Center,
    Right,
}

/// Where an item should be anchored once it appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Placement {
    pub vertical: VerticalZone,
    pub horizontal: HorizontalZone,
}

impl Placement {
    pub const fn new(vertical: VerticalZone, horizontal: HorizontalZone) -> Self {
        Self { vertical, horizontal }
    }
}

impl VerticalZone {
    fn parse(raw: &str) -> Result<Self, MetadataParseError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "middle" | "center" => Ok(Self::Middle),
            "bottom" => Ok(Self::Bottom),
            _ => Err(MetadataParseError::UnknownZone {
                field: "vertical",
                raw: raw.to_string(),
            }),
        }
    }
}

impl HorizontalZone {
    fn parse(raw: &str) -> Result<Self, MetadataParseError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" | "middle" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(MetadataParseError::UnknownZone {
                field: "horizontal",
                raw: raw.to_string(),
            }),
        }
    }
}

//=== ChoiceCandidate =====================================================

/// One selectable choice handed to the presenter by the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceCandidate {
    pub id: CandidateId,
    /// Display payload.
    pub text: String,
    /// Where selecting this candidate leads (script node name).
    pub target: String,
    pub placement: Placement,
    /// Seconds before the item starts fading in.
    pub delay: f32,
    /// Seconds the item stays fully visible and selectable.
    pub hold: f32,
    pub available: bool,
}

impl ChoiceCandidate {
    /// Creates an available candidate with default timing and placement.
    pub fn new(id: impl Into<CandidateId>, text: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            target: target.into(),
            placement: Placement::default(),
            delay: DEFAULT_DELAY_SECONDS,
            hold: DEFAULT_HOLD_SECONDS,
            available: true,
        }
    }

    pub fn with_delay(mut self, seconds: f32) -> Self {
        self.delay = seconds;
        self
    }

    pub fn with_hold(mut self, seconds: f32) -> Self {
        self.hold = seconds;
        self
    }

    pub fn with_placement(mut self, vertical: VerticalZone, horizontal: HorizontalZone) -> Self {
        self.placement = Placement::new(vertical, horizontal);
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    //--- Hint Parsing -----------------------------------------------------

    /// Builds a candidate from script-line hints, recovering every malformed
    /// hint with its default.
    ///
    /// ```
    /// use aetheric_director::core::choice::{ChoiceCandidate, VerticalZone, HorizontalZone};
    ///
    /// let c = ChoiceCandidate::from_hints(
    ///     "ask", "Who are you?", "Ask_Name", true,
    ///     &["delay:0.5", "duration:2", "v:top", "h:left"],
    /// );
    /// assert_eq!(c.delay, 0.5);
    /// assert_eq!(c.hold, 2.0);
    /// assert_eq!(c.placement.vertical, VerticalZone::Top);
    /// assert_eq!(c.placement.horizontal, HorizontalZone::Left);
    /// ```
    pub fn from_hints(
        id: impl Into<CandidateId>,
        text: impl Into<String>,
        target: impl Into<String>,
        available: bool,
        hints: &[&str],
    ) -> Self {
        let mut candidate = Self::new(id, text, target).with_available(available);

        candidate.delay = recover(&candidate.id, DEFAULT_DELAY_SECONDS, || {
            parse_seconds("delay", hints.first().copied())
        });
        candidate.hold = recover(&candidate.id, DEFAULT_HOLD_SECONDS, || {
            parse_seconds("duration", hints.get(1).copied())
        });
        candidate.placement.vertical = recover(&candidate.id, VerticalZone::default(), || {
            let raw = hint_value("vertical", hints.get(2).copied())?;
            VerticalZone::parse(raw)
        });
        candidate.placement.horizontal = recover(&candidate.id, HorizontalZone::default(), || {
            let raw = hint_value("horizontal", hints.get(3).copied())?;
            HorizontalZone::parse(raw)
        });

        candidate
    }
}

//--- Parsing Helpers -----------------------------------------------------

fn recover<T: fmt::Debug>(
    id: &CandidateId,
    default: T,
    parse: impl FnOnce() -> Result<T, MetadataParseError>,
) -> T {
    match parse() {
        Ok(value) => value,
        Err(e) => {
            warn!(target: "choice", "Candidate '{}': {}; using {:?}", id, e, default);
            default
        }
    }
}

/// Returns the trimmed value part of a `parameter:value` hint.
fn hint_value<'a>(field: &'static str, hint: Option<&'a str>) -> Result<&'a str, MetadataParseError> {
    let hint = hint.ok_or(MetadataParseError::Missing(field))?;
    let (_, value) = hint
        .split_once(':')
        .ok_or_else(|| MetadataParseError::MissingSeparator(hint.to_string()))?;
    Ok(value.trim())
}

fn parse_seconds(field: &'static str, hint: Option<&str>) -> Result<f32, MetadataParseError> {
    let raw = hint_value(field, hint)?;
    let value: f32 = raw.parse().map_err(|_| MetadataParseError::InvalidNumber {
        field,
        raw: raw.to_string(),
    })?;

    if !value.is_finite() || value < 0.0 {
        return Err(MetadataParseError::OutOfRange { field, value });
    }
    Ok(value)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let c = ChoiceCandidate::new("a", "Hello", "Node_A");
        assert_eq!(c.id.as_str(), "a");
        assert_eq!(c.delay, DEFAULT_DELAY_SECONDS);
        assert_eq!(c.hold, DEFAULT_HOLD_SECONDS);
        assert_eq!(c.placement, Placement::default());
        assert!(c.available);
    }

    #[test]
    fn hints_parse_case_insensitively_with_whitespace() {
        let c = ChoiceCandidate::from_hints(
            "a",
            "t",
            "n",
            true,
            &["delay: 1.25", "duration:4", "v: BOTTOM", "h:Right "],
        );
        assert_eq!(c.delay, 1.25);
        assert_eq!(c.hold, 4.0);
        assert_eq!(c.placement, Placement::new(VerticalZone::Bottom, HorizontalZone::Right));
    }

    #[test]
    fn malformed_hints_fall_back_to_defaults() {
        let c = ChoiceCandidate::from_hints(
            "a",
            "t",
            "n",
            false,
            &["delay=2", "duration:soon", "v:sideways", "nocolon"],
        );
        assert_eq!(c.delay, DEFAULT_DELAY_SECONDS);
        assert_eq!(c.hold, DEFAULT_HOLD_SECONDS);
        assert_eq!(c.placement.vertical, VerticalZone::Middle);
        assert_eq!(c.placement.horizontal, HorizontalZone::Center);
        assert!(!c.available);
    }

    #[test]
    fn missing_hints_fall_back_to_defaults() {
        let c = ChoiceCandidate::from_hints("a", "t", "n", true, &["delay:0.5"]);
        assert_eq!(c.delay, 0.5);
        assert_eq!(c.hold, DEFAULT_HOLD_SECONDS);
        assert_eq!(c.placement, Placement::default());
    }

    #[test]
    fn negative_and_non_finite_seconds_are_rejected() {
        assert_eq!(
            parse_seconds("delay", Some("delay:-1")),
            Err(MetadataParseError::OutOfRange { field: "delay", value: -1.0 })
        );
        assert!(matches!(
            parse_seconds("delay", Some("delay:inf")),
            Err(MetadataParseError::OutOfRange { .. })
        ));
    }

    #[test]
    fn value_may_contain_colons() {
        assert_eq!(hint_value("x", Some("label:a:b")), Ok("a:b"));
    }
}
