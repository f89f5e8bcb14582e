// src/types/locale.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display locale for labels and choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    /// Normalize a locale code or name. Unknown or missing values fall back to English.
    pub fn normalize(lang: Option<&str>) -> Self {
        match lang.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("ar") | Some("arabic") | Some("العربية") => Locale::Ar,
            _ => Locale::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
