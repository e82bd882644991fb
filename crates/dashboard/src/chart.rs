//! Bar-chart value banding.
//!
//! Bars are colored by a fixed four-tier threshold on the numeric value;
//! missing or non-numeric values render gray.

/// Severity band for a pollutant value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// < 25
    Low,
    /// 25..50
    Moderate,
    /// 50..100
    High,
    /// >= 100
    Severe,
    /// Missing or non-numeric value.
    Unknown,
}

impl Band {
    /// Classifies a stored (text) value.
    pub fn classify(value: Option<&str>) -> Self {
        match value.and_then(|v| v.parse::<f64>().ok()) {
            Some(v) if v < 25.0 => Self::Low,
            Some(v) if v < 50.0 => Self::Moderate,
            Some(v) if v < 100.0 => Self::High,
            Some(_) => Self::Severe,
            None => Self::Unknown,
        }
    }

    /// CSS color for the band.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "#4caf50",
            Self::Moderate => "#ffeb3b",
            Self::High => "#ff9800",
            Self::Severe => "#f44336",
            Self::Unknown => "#cccccc",
        }
    }
}

/// Parses a stored value back to a number for bar sizing.
pub fn numeric_value(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.parse::<f64>().ok())
}
