#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Technology,
    Business,
    Sports,
    Science,
    Health,
    Entertainment,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Self::General,
        Self::Technology,
        Self::Business,
        Self::Sports,
        Self::Science,
        Self::Health,
        Self::Entertainment,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Technology => "technology",
            Self::Business => "business",
            Self::Sports => "sports",
            Self::Science => "science",
            Self::Health => "health",
            Self::Entertainment => "entertainment",
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "general" => Some(Self::General),
            "technology" => Some(Self::Technology),
            "business" => Some(Self::Business),
            "sports" => Some(Self::Sports),
            "science" => Some(Self::Science),
            "health" => Some(Self::Health),
            "entertainment" => Some(Self::Entertainment),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::General => "Top Stories",
            Self::Technology => "Technology",
            Self::Business => "Business",
            Self::Sports => "Sports",
            Self::Science => "Science",
            Self::Health => "Health",
            Self::Entertainment => "Entertainment",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}
