//! Story parameters collected from the form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoryError;

/// The viewpoint the story is told from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Perspective {
    #[default]
    Ant,
    Bird,
    Wind,
    Cloud,
    Tree,
    Rock,
    Shadow,
    Raindrop,
    Spider,
    GrainOfSand,
}

impl Perspective {
    pub const ALL: [Perspective; 10] = [
        Perspective::Ant,
        Perspective::Bird,
        Perspective::Wind,
        Perspective::Cloud,
        Perspective::Tree,
        Perspective::Rock,
        Perspective::Shadow,
        Perspective::Raindrop,
        Perspective::Spider,
        Perspective::GrainOfSand,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Perspective::Ant => "Ant",
            Perspective::Bird => "Bird",
            Perspective::Wind => "Wind",
            Perspective::Cloud => "Cloud",
            Perspective::Tree => "Tree",
            Perspective::Rock => "Rock",
            Perspective::Shadow => "Shadow",
            Perspective::Raindrop => "Raindrop",
            Perspective::Spider => "Spider",
            Perspective::GrainOfSand => "Grain of Sand",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeOfDay {
    #[default]
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Windy,
    Stormy,
}

impl Weather {
    pub const ALL: [Weather; 5] = [
        Weather::Sunny,
        Weather::Cloudy,
        Weather::Rainy,
        Weather::Windy,
        Weather::Stormy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Weather::Sunny => "Sunny",
            Weather::Cloudy => "Cloudy",
            Weather::Rainy => "Rainy",
            Weather::Windy => "Windy",
            Weather::Stormy => "Stormy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Environment {
    #[default]
    Forest,
    City,
    Desert,
    Beach,
    Mountain,
}

impl Environment {
    pub const ALL: [Environment; 5] = [
        Environment::Forest,
        Environment::City,
        Environment::Desert,
        Environment::Beach,
        Environment::Mountain,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Environment::Forest => "Forest",
            Environment::City => "City",
            Environment::Desert => "Desert",
            Environment::Beach => "Beach",
            Environment::Mountain => "Mountain",
        }
    }
}

/// Lowercase and drop separators so "grain-of-sand" matches "Grain of Sand".
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn parse_choice<T: Copy>(
    kind: &'static str,
    value: &str,
    all: &[T],
    name: impl Fn(&T) -> &'static str,
) -> Result<T, StoryError> {
    let wanted = normalize(value);
    all.iter()
        .find(|choice| normalize(name(*choice)) == wanted)
        .copied()
        .ok_or_else(|| StoryError::InvalidChoice {
            kind,
            value: value.to_string(),
        })
}

impl FromStr for Perspective {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("perspective", s, &Self::ALL, Self::name)
    }
}

impl FromStr for TimeOfDay {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("time of day", s, &Self::ALL, Self::name)
    }
}

impl FromStr for Weather {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("weather", s, &Self::ALL, Self::name)
    }
}

impl FromStr for Environment {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("environment", s, &Self::ALL, Self::name)
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The six values substituted into the story prompt.
///
/// Fields are plain strings: the prompt builder accepts anything, and the
/// enums above only constrain what the form offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryParameters {
    pub perspective: String,
    pub time_of_day: String,
    pub weather: String,
    pub environment: String,
    pub topic: String,
    pub interaction_target: String,
}

impl StoryParameters {
    /// Build parameters from the closed choices, with empty free text.
    pub fn new(
        perspective: Perspective,
        time_of_day: TimeOfDay,
        weather: Weather,
        environment: Environment,
    ) -> Self {
        Self {
            perspective: perspective.name().to_string(),
            time_of_day: time_of_day.name().to_string(),
            weather: weather.name().to_string(),
            environment: environment.name().to_string(),
            topic: String::new(),
            interaction_target: String::new(),
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn with_interaction(mut self, target: impl Into<String>) -> Self {
        self.interaction_target = target.into();
        self
    }
}

impl Default for StoryParameters {
    fn default() -> Self {
        Self::new(
            Perspective::default(),
            TimeOfDay::default(),
            Weather::default(),
            Environment::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_lenient_about_case_and_separators() {
        assert_eq!("ant".parse::<Perspective>().unwrap(), Perspective::Ant);
        assert_eq!(
            "grain-of-sand".parse::<Perspective>().unwrap(),
            Perspective::GrainOfSand
        );
        assert_eq!(
            "Grain of Sand".parse::<Perspective>().unwrap(),
            Perspective::GrainOfSand
        );
        assert_eq!("NIGHT".parse::<TimeOfDay>().unwrap(), TimeOfDay::Night);
        assert_eq!("stormy".parse::<Weather>().unwrap(), Weather::Stormy);
        assert_eq!("beach".parse::<Environment>().unwrap(), Environment::Beach);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        match "Volcano".parse::<Environment>() {
            Err(StoryError::InvalidChoice { kind, value }) => {
                assert_eq!(kind, "environment");
                assert_eq!(value, "Volcano");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!("".parse::<Weather>().is_err());
    }

    #[test]
    fn test_names_round_trip_through_display() {
        for p in Perspective::ALL {
            assert_eq!(p.to_string().parse::<Perspective>().unwrap(), p);
        }
        for t in TimeOfDay::ALL {
            assert_eq!(t.to_string().parse::<TimeOfDay>().unwrap(), t);
        }
    }

    #[test]
    fn test_default_parameters() {
        let params = StoryParameters::default();
        assert_eq!(params.perspective, "Ant");
        assert_eq!(params.time_of_day, "Morning");
        assert_eq!(params.weather, "Sunny");
        assert_eq!(params.environment, "Forest");
        assert!(params.topic.is_empty());
        assert!(params.interaction_target.is_empty());
    }

    #[test]
    fn test_builder() {
        let params = StoryParameters::new(
            Perspective::Wind,
            TimeOfDay::Night,
            Weather::Rainy,
            Environment::City,
        )
        .with_topic("solitude")
        .with_interaction("a streetlamp");

        assert_eq!(params.perspective, "Wind");
        assert_eq!(params.topic, "solitude");
        assert_eq!(params.interaction_target, "a streetlamp");
    }
}
