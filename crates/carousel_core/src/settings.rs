use std::time::Duration;

use serde::{Deserialize, Serialize};

const MIN_ITEMS_TO_SHOW: u8 = 3;
const MAX_ITEMS_TO_SHOW: u8 = 5;
const DEFAULT_INTERVAL_MS: u64 = 5_000;

/// Host-supplied display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselSettings {
    pub title: String,
    /// Advisory display count; independent of the hard item cap.
    pub items_to_show: u8,
    pub show_arrows: bool,
    pub auto_play: bool,
    #[serde(alias = "auto_play_interval")]
    pub auto_play_interval_ms: u64,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            title: String::new(),
            items_to_show: MIN_ITEMS_TO_SHOW,
            show_arrows: true,
            auto_play: false,
            auto_play_interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl CarouselSettings {
    pub fn display_count(&self) -> u8 {
        self.items_to_show.clamp(MIN_ITEMS_TO_SHOW, MAX_ITEMS_TO_SHOW)
    }

    /// Auto-advance period. A zero interval falls back to the default.
    pub fn auto_play_interval(&self) -> Duration {
        let ms = if self.auto_play_interval_ms == 0 {
            DEFAULT_INTERVAL_MS
        } else {
            self.auto_play_interval_ms
        };
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_host_contract() {
        let settings = CarouselSettings::default();
        assert_eq!(settings.display_count(), 3);
        assert!(settings.show_arrows);
        assert!(!settings.auto_play);
        assert_eq!(settings.auto_play_interval(), Duration::from_millis(5_000));
    }

    #[test]
    fn display_count_is_clamped() {
        let mut settings = CarouselSettings {
            items_to_show: 9,
            ..CarouselSettings::default()
        };
        assert_eq!(settings.display_count(), 5);
        settings.items_to_show = 0;
        assert_eq!(settings.display_count(), 3);
    }

    #[test]
    fn zero_interval_uses_default() {
        let settings = CarouselSettings {
            auto_play_interval_ms: 0,
            ..CarouselSettings::default()
        };
        assert_eq!(settings.auto_play_interval(), Duration::from_millis(5_000));
    }
}
