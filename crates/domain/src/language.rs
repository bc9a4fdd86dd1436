use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// UI language, sent to reference-data endpoints as `?language=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-hant")]
    ZhHant,
    #[serde(rename = "zh")]
    Zh,
    #[serde(rename = "ja")]
    Ja,
    #[serde(rename = "th")]
    Th,
    #[serde(rename = "vi")]
    Vi,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::En,
        Language::ZhHant,
        Language::Zh,
        Language::Ja,
        Language::Th,
        Language::Vi,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::ZhHant => "zh-hant",
            Self::Zh => "zh",
            Self::Ja => "ja",
            Self::Th => "th",
            Self::Vi => "vi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == normalized)
            .ok_or_else(|| DomainError::unknown_variant("language", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_codes_case_insensitively() {
        assert_eq!("zh-Hant".parse::<Language>().unwrap(), Language::ZhHant);
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
    }

    #[test]
    fn every_language_round_trips_its_code() {
        for language in Language::ALL {
            assert_eq!(language.code().parse::<Language>().unwrap(), language);
            assert_eq!(language.to_string(), language.code());
            assert_eq!(
                serde_json::to_value(language).unwrap(),
                serde_json::Value::String(language.code().to_string())
            );
        }
    }

    #[test]
    fn unknown_code_is_an_error() {
        assert!("xx".parse::<Language>().is_err());
    }

    #[test]
    fn serde_uses_wire_codes() {
        assert_eq!(serde_json::to_string(&Language::ZhHant).unwrap(), "\"zh-hant\"");
    }
}
