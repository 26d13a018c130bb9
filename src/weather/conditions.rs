/// Measurement system for the weather API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "metric" | "celsius" => Some(Units::Metric),
            "imperial" | "fahrenheit" => Some(Units::Imperial),
            _ => None,
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse weather condition derived from the API's free-text description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    Clouds,
    Rain,
    Clear,
    Snow,
    Thunderstorm,
    Other,
}

impl ConditionKind {
    /// Classify a description like "scattered clouds" or "light rain"
    /// by case-insensitive substring match.
    pub fn from_description(description: &str) -> Self {
        let desc = description.to_lowercase();
        if desc.contains("thunder") || desc.contains("storm") {
            ConditionKind::Thunderstorm
        } else if desc.contains("cloud") {
            ConditionKind::Clouds
        } else if desc.contains("rain") {
            ConditionKind::Rain
        } else if desc.contains("clear") {
            ConditionKind::Clear
        } else if desc.contains("snow") {
            ConditionKind::Snow
        } else {
            ConditionKind::Other
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ConditionKind::Clouds => "☁️",
            ConditionKind::Rain => "🌧️",
            ConditionKind::Clear => "☀️",
            ConditionKind::Snow => "❄️",
            ConditionKind::Thunderstorm => "⛈️",
            ConditionKind::Other => "🌡️",
        }
    }
}
