pub mod cache;
pub mod providers;
pub mod resolver;

pub use cache::{IMAGE_TTL, ImageCache, ImageStore, MemoryStore};
pub use providers::{BackendProvider, FoundImage, ImageProvider, WikipediaProvider};
pub use resolver::{ImageResolver, ResolvedImage};

use crate::model::AgentTheme;

/// What a card shows when no image could be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub gradient: (&'static str, &'static str),
    pub icon: &'static str,
}

pub fn placeholder_for(theme: Option<AgentTheme>) -> Placeholder {
    match theme {
        Some(AgentTheme::Adventure) => Placeholder {
            gradient: ("#f97316", "#dc2626"),
            icon: "⛰",
        },
        Some(AgentTheme::Culture) => Placeholder {
            gradient: ("#8b5cf6", "#6366f1"),
            icon: "🏛",
        },
        Some(AgentTheme::Food) => Placeholder {
            gradient: ("#f59e0b", "#ef4444"),
            icon: "🍴",
        },
        Some(AgentTheme::HiddenGems) => Placeholder {
            gradient: ("#10b981", "#0d9488"),
            icon: "💎",
        },
        Some(AgentTheme::BestOverall) | None => Placeholder {
            gradient: ("#3b82f6", "#1e40af"),
            icon: "📍",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_theme_has_a_placeholder() {
        for theme in AgentTheme::ALL {
            assert!(!placeholder_for(Some(theme)).icon.is_empty());
        }
        assert_eq!(
            placeholder_for(None),
            placeholder_for(Some(AgentTheme::BestOverall))
        );
    }
}
