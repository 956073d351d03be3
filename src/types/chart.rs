use super::{PricePoint, TrendColor};
use serde::{Deserialize, Serialize};

/// Trailing period shown by a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodSelector {
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "all")]
    All,
}

impl PeriodSelector {
    /// Every selector, in the order the period buttons are laid out.
    pub const ALL: [PeriodSelector; 5] = [
        PeriodSelector::ThreeMonths,
        PeriodSelector::SixMonths,
        PeriodSelector::OneYear,
        PeriodSelector::FiveYears,
        PeriodSelector::All,
    ];

    /// Get the selector from its wire name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "3m" => Some(PeriodSelector::ThreeMonths),
            "6m" => Some(PeriodSelector::SixMonths),
            "1y" => Some(PeriodSelector::OneYear),
            "5y" => Some(PeriodSelector::FiveYears),
            "all" => Some(PeriodSelector::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodSelector::ThreeMonths => "3m",
            PeriodSelector::SixMonths => "6m",
            PeriodSelector::OneYear => "1y",
            PeriodSelector::FiveYears => "5y",
            PeriodSelector::All => "all",
        }
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            PeriodSelector::ThreeMonths => "3M",
            PeriodSelector::SixMonths => "6M",
            PeriodSelector::OneYear => "1Y",
            PeriodSelector::FiveYears => "5Y",
            PeriodSelector::All => "All",
        }
    }

    /// Calendar months covered, or None for the whole history.
    pub fn months(&self) -> Option<u32> {
        match self {
            PeriodSelector::ThreeMonths => Some(3),
            PeriodSelector::SixMonths => Some(6),
            PeriodSelector::OneYear => Some(12),
            PeriodSelector::FiveYears => Some(60),
            PeriodSelector::All => None,
        }
    }
}

impl Default for PeriodSelector {
    fn default() -> Self {
        PeriodSelector::All
    }
}

/// Maximal run of consecutive days sharing one signal flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub flag: bool,
    pub points: Vec<PricePoint>,
}

impl Segment {
    pub fn color(&self) -> TrendColor {
        TrendColor::from_flag(self.flag)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
