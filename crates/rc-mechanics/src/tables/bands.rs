//! Qualitative result bands and their message templates.

use serde::{Deserialize, Serialize};

use super::rating::NaturalRollType;

/// Whether a band counts as success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// The check succeeded.
    Success,
    /// The check failed.
    Failure,
}

/// A named outcome tier covering a contiguous range of net results.
///
/// Bands are ordered by ceiling; a net value belongs to the first band whose
/// ceiling is at or above it, so a value sitting exactly on a ceiling belongs
/// to the lower band. The top band has no ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResultBand {
    /// Display name (e.g. "marginal success").
    pub name: String,
    /// Highest net value inside this band, `None` for the top band.
    pub ceiling: Option<i32>,
    /// Success or failure.
    pub polarity: Polarity,
    /// Message template. Placeholders: `{character}`, `{raw}`, `{roll}`,
    /// `{result}`, `{natural}`.
    pub template: String,
}

/// Values substituted into a band template.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Name of whoever is shown as rolling.
    pub character: &'a str,
    /// The raw d100 draw.
    pub raw: u32,
    /// The net result after modifiers and difficulty.
    pub roll: i32,
    /// The natural classification, if any.
    pub natural: Option<&'a NaturalRollType>,
}

impl RollResultBand {
    /// Returns true if the net value falls inside this band, ignoring lower bands.
    pub fn covers(&self, net: i32) -> bool {
        self.ceiling.is_none_or(|ceiling| net <= ceiling)
    }

    /// Returns true for success-polarity bands.
    pub fn is_success(&self) -> bool {
        self.polarity == Polarity::Success
    }

    /// Render this band's template.
    pub fn render(&self, ctx: &RenderContext<'_>) -> String {
        let natural = ctx.natural.map(|n| n.message.as_str()).unwrap_or("");
        self.template
            .replace("{natural}", natural)
            .replace("{character}", ctx.character)
            .replace("{raw}", &ctx.raw.to_string())
            .replace("{roll}", &ctx.roll.to_string())
            .replace("{result}", &self.name)
    }
}

impl std::fmt::Display for RollResultBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
