use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical trade status. Older journals used a two-state Active/Closed
/// scheme and the spelling "Lose"; both are accepted as aliases when
/// deserializing and mapped onto this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TradeStatus {
    #[default]
    #[serde(alias = "Closed")]
    Active,
    Win,
    #[serde(alias = "Lose")]
    Loss,
    #[serde(rename = "BE", alias = "BreakEven", alias = "Break Even")]
    BreakEven,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Active => "Active",
            TradeStatus::Win => "Win",
            TradeStatus::Loss => "Loss",
            TradeStatus::BreakEven => "BE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Active" | "Closed" => Some(TradeStatus::Active),
            "Win" => Some(TradeStatus::Win),
            "Loss" | "Lose" => Some(TradeStatus::Loss),
            "BE" | "BreakEven" | "Break Even" => Some(TradeStatus::BreakEven),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        !matches!(self, TradeStatus::Active)
    }

    /// Status implied by a conclusive realized P&L.
    pub fn for_pnl(pnl: f64) -> Self {
        if pnl > 0.0 {
            TradeStatus::Win
        } else if pnl < 0.0 {
            TradeStatus::Loss
        } else {
            TradeStatus::BreakEven
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TradeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown status '{s}' (Active, Win, Loss, BE)"))
    }
}

/// Streak signal emitted by a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Neutral,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Loss => write!(f, "loss"),
            Outcome::Neutral => write!(f, "neutral"),
        }
    }
}

/// Yes/No answer to the "trade came to me" and "with value" questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confirmation {
    Yes,
    No,
}

impl Confirmation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confirmation::Yes => "Yes",
            Confirmation::No => "No",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Yes" => Some(Confirmation::Yes),
            "No" => Some(Confirmation::No),
            _ => None,
        }
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Confirmation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown answer '{s}' (Yes, No)"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketConditions {
    Trending,
    #[serde(rename = "Balancing/Range")]
    Balancing,
}

impl MarketConditions {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketConditions::Trending => "Trending",
            MarketConditions::Balancing => "Balancing/Range",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Trending" => Some(MarketConditions::Trending),
            "Balancing/Range" | "Balancing" => Some(MarketConditions::Balancing),
            _ => None,
        }
    }
}

impl fmt::Display for MarketConditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MarketConditions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| format!("unknown market conditions '{s}' (Trending, Balancing/Range)"))
    }
}

/// Self-assigned trade grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Score {
    #[serde(rename = "A+")]
    APlus,
    B,
    C,
}

impl Score {
    pub fn as_str(&self) -> &'static str {
        match self {
            Score::APlus => "A+",
            Score::B => "B",
            Score::C => "C",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "A+" => Some(Score::APlus),
            "B" => Some(Score::B),
            "C" => Some(Score::C),
            _ => None,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Score {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown score '{s}' (A+, B, C)"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryQuality {
    #[serde(rename = "Calm / Waited Patiently")]
    CalmPatient,
    #[serde(rename = "Impulsive / FOMO")]
    ImpulsiveFomo,
    #[serde(rename = "Forced / Overtraded")]
    ForcedOvertraded,
    #[serde(rename = "Get back losses")]
    GetBackLosses,
    #[serde(rename = "Hesitant / Missed")]
    HesitantMissed,
}

impl EntryQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryQuality::CalmPatient => "Calm / Waited Patiently",
            EntryQuality::ImpulsiveFomo => "Impulsive / FOMO",
            EntryQuality::ForcedOvertraded => "Forced / Overtraded",
            EntryQuality::GetBackLosses => "Get back losses",
            EntryQuality::HesitantMissed => "Hesitant / Missed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Calm / Waited Patiently" => Some(EntryQuality::CalmPatient),
            "Impulsive / FOMO" => Some(EntryQuality::ImpulsiveFomo),
            "Forced / Overtraded" => Some(EntryQuality::ForcedOvertraded),
            "Get back losses" => Some(EntryQuality::GetBackLosses),
            "Hesitant / Missed" => Some(EntryQuality::HesitantMissed),
            _ => None,
        }
    }
}

impl fmt::Display for EntryQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntryQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown entry quality '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionalState {
    Calm,
    #[serde(rename = "Fear of Loss")]
    FearOfLoss,
    #[serde(rename = "Fear of giving away profit")]
    FearOfGivingProfit,
    Greed,
    Overconfidence,
    #[serde(rename = "Frustration / Impatience")]
    Frustration,
    Distracted,
}

impl EmotionalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionalState::Calm => "Calm",
            EmotionalState::FearOfLoss => "Fear of Loss",
            EmotionalState::FearOfGivingProfit => "Fear of giving away profit",
            EmotionalState::Greed => "Greed",
            EmotionalState::Overconfidence => "Overconfidence",
            EmotionalState::Frustration => "Frustration / Impatience",
            EmotionalState::Distracted => "Distracted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Calm" => Some(EmotionalState::Calm),
            "Fear of Loss" => Some(EmotionalState::FearOfLoss),
            "Fear of giving away profit" => Some(EmotionalState::FearOfGivingProfit),
            "Greed" => Some(EmotionalState::Greed),
            "Overconfidence" => Some(EmotionalState::Overconfidence),
            "Frustration / Impatience" => Some(EmotionalState::Frustration),
            "Distracted" => Some(EmotionalState::Distracted),
            _ => None,
        }
    }
}

impl fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EmotionalState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown emotional state '{s}'"))
    }
}

/// Position-sizing mode relative to the pressing roadmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Sizing {
    #[default]
    Base,
    Press,
    #[serde(alias = "derisk")]
    Derisk,
}

impl Sizing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sizing::Base => "Base",
            Sizing::Press => "Press",
            Sizing::Derisk => "Derisk",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Base" => Some(Sizing::Base),
            "Press" => Some(Sizing::Press),
            "Derisk" | "derisk" => Some(Sizing::Derisk),
            _ => None,
        }
    }
}

impl fmt::Display for Sizing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Sizing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown sizing '{s}' (Base, Press, Derisk)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_for_pnl_sign() {
        assert_eq!(TradeStatus::for_pnl(250.0), TradeStatus::Win);
        assert_eq!(TradeStatus::for_pnl(-75.0), TradeStatus::Loss);
        assert_eq!(TradeStatus::for_pnl(0.0), TradeStatus::BreakEven);
    }

    #[test]
    fn status_legacy_aliases() {
        assert_eq!(TradeStatus::parse("Closed"), Some(TradeStatus::Active));
        assert_eq!(TradeStatus::parse("Lose"), Some(TradeStatus::Loss));
        assert_eq!(TradeStatus::parse("BE"), Some(TradeStatus::BreakEven));
        assert_eq!(TradeStatus::parse("garbage"), None);
    }

    #[test]
    fn status_serde_round_trip() {
        let json = serde_json::to_string(&TradeStatus::BreakEven).unwrap();
        assert_eq!(json, "\"BE\"");
        let back: TradeStatus = serde_json::from_str("\"Closed\"").unwrap();
        assert_eq!(back, TradeStatus::Active);
    }

    #[test]
    fn sizing_accepts_legacy_lowercase() {
        assert_eq!(Sizing::parse("derisk"), Some(Sizing::Derisk));
        let back: Sizing = serde_json::from_str("\"derisk\"").unwrap();
        assert_eq!(back, Sizing::Derisk);
    }
}
