use serde::{Deserialize, Serialize};

/// The Bible editions the widget can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Translation {
    #[default]
    Web,
    Kjv,
    Asv,
    Bsb,
}

impl Translation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Translation::Web => "WEB",
            Translation::Kjv => "KJV",
            Translation::Asv => "ASV",
            Translation::Bsb => "BSB",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "WEB" => Some(Translation::Web),
            "KJV" => Some(Translation::Kjv),
            "ASV" => Some(Translation::Asv),
            "BSB" => Some(Translation::Bsb),
            _ => None,
        }
    }

    pub fn all() -> Vec<Translation> {
        vec![
            Translation::Web,
            Translation::Kjv,
            Translation::Asv,
            Translation::Bsb,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Translation::Web => "WEB (World English Bible)",
            Translation::Kjv => "KJV (King James Version)",
            Translation::Asv => "ASV (American Standard Version)",
            Translation::Bsb => "BSB (Berean Standard Bible)",
        }
    }

    /// Bible id API.Bible uses to address this edition.
    pub fn bible_id(&self) -> &'static str {
        match self {
            Translation::Web => "9879dbb7cfe39e4d-04",
            Translation::Kjv => "de4e12af7f28f599-02",
            Translation::Asv => "06125adad2d5898a-01",
            Translation::Bsb => "bba9f40183526463-01",
        }
    }
}

impl std::fmt::Display for Translation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
