use crate::errors::Result;
use crate::uci_session::{UciOption, UciSession};

/// Skill level applied when an engine offers no rating option.
/// A conservative "weak club player" approximation.
pub const DEFAULT_SKILL_LEVEL: i32 = 5;

/// Clamp a requested rating into an engine's advertised [min, max].
/// Total and idempotent; the range is non-empty so the bound order
/// does not matter.
pub fn clamp_rating(requested: i32, min: i32, max: i32) -> i32 {
    requested.max(min).min(max)
}

/// The slice of a UCI engine the strength configurator needs: option
/// lookup and option application.
pub trait StrengthControl {
    fn option(&self, name: &str) -> Option<&UciOption>;
    fn set_option(&mut self, name: &str, value: &str) -> Result<()>;
}

impl StrengthControl for UciSession {
    fn option(&self, name: &str) -> Option<&UciOption> {
        UciSession::option(self, name)
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        UciSession::set_option(self, name, value)
    }
}

/// Apply the closest supported approximation of the desired rating and
/// report which mode was used. Exactly one mode string is returned:
/// a clamped `UCI_Elo`, a fixed `Skill Level`, or the unmodified default.
pub fn configure_strength(engine: &mut impl StrengthControl, rating: i32) -> Result<String> {
    if engine.option("UCI_LimitStrength").is_some() {
        engine.set_option("UCI_LimitStrength", "true")?;
    }

    if let Some(UciOption::Spin { min, max, .. }) = engine.option("UCI_Elo").cloned() {
        let applied = clamp_rating(rating, min, max);
        engine.set_option("UCI_Elo", &applied.to_string())?;
        return Ok(format!("UCI_Elo={}", applied));
    }

    if let Some(UciOption::Spin { .. }) = engine.option("Skill Level") {
        engine.set_option("Skill Level", &DEFAULT_SKILL_LEVEL.to_string())?;
        return Ok(format!("Skill Level={}", DEFAULT_SKILL_LEVEL));
    }

    Ok("default (no strength options)".to_string())
}
