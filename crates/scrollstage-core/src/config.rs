use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Easing curve applied by duration-based smooth scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EasingType {
    /// Jump at the end of the animation
    None,
    Linear,
    /// 1 - (1-t)^2
    Quadratic,
    /// 1 - (1-t)^3
    Cubic,
    /// 1 - (1-t)^4
    #[default]
    Quartic,
    /// 1 - (1-t)^5
    Quintic,
    /// 1 - 2^(-10t)
    EaseOut,
    /// t^2 (3 - 2t)
    Smoothstep,
}

/// Smooth scroll emulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Enable smooth scrolling (virtual offset lags the physical offset)
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Page-level tween duration in milliseconds
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Page-level easing curve
    #[serde(default)]
    pub easing: EasingType,
    /// Per-frame interpolation factor for section-level scrollers
    #[serde(default = "default_section_lerp")]
    pub section_lerp: f64,
    /// Wheel delta multiplier
    #[serde(default = "default_mouse_multiplier")]
    pub mouse_multiplier: f64,
    /// Touch delta multiplier
    #[serde(default = "default_touch_multiplier")]
    pub touch_multiplier: f64,
    /// Smooth touch gestures too (touch input is applied immediately otherwise)
    #[serde(default)]
    pub smooth_touch: bool,
    /// Distance (px) under which a lerp scroller snaps to its target
    #[serde(default = "default_settle_epsilon")]
    pub settle_epsilon: f64,
    /// Frames per second for the frame loop
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Frame gaps longer than this are clamped (0 = never clamp)
    #[serde(default)]
    pub lag_threshold_ms: u64,
    /// Frame gap substituted when the lag threshold is exceeded
    #[serde(default = "default_adjusted_lag")]
    pub adjusted_lag_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            duration_ms: default_duration_ms(),
            easing: EasingType::default(),
            section_lerp: default_section_lerp(),
            mouse_multiplier: default_mouse_multiplier(),
            touch_multiplier: default_touch_multiplier(),
            smooth_touch: false,
            settle_epsilon: default_settle_epsilon(),
            animation_fps: default_animation_fps(),
            lag_threshold_ms: 0,
            adjusted_lag_ms: default_adjusted_lag(),
        }
    }
}

/// Viewport used when no host supplies one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_viewport_width")]
    pub width: f64,
    #[serde(default = "default_viewport_height")]
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Idle poll interval in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Pixels scrolled per wheel notch or key press
    #[serde(default = "default_wheel_step")]
    pub wheel_step: f64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            wheel_step: default_wheel_step(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_duration_ms() -> u64 {
    1200
}

fn default_section_lerp() -> f64 {
    0.05
}

fn default_mouse_multiplier() -> f64 {
    1.0
}

fn default_touch_multiplier() -> f64 {
    2.0
}

fn default_settle_epsilon() -> f64 {
    0.5
}

fn default_animation_fps() -> u32 {
    60
}

fn default_adjusted_lag() -> u64 {
    33
}

fn default_viewport_width() -> f64 {
    1440.0
}

fn default_viewport_height() -> f64 {
    900.0
}

fn default_tick_rate() -> u64 {
    100
}

fn default_wheel_step() -> f64 {
    120.0
}

impl StageConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scrollstage/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scrollstage")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StageConfig::default();
        assert!(config.scroll.smooth_enabled);
        assert_eq!(config.scroll.duration_ms, 1200);
        assert_eq!(config.scroll.easing, EasingType::Quartic);
        assert!((config.scroll.section_lerp - 0.05).abs() < 1e-12);
        assert_eq!(config.scroll.lag_threshold_ms, 0);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = StageConfig::from_toml(
            r#"
            [scroll]
            duration_ms = 800
            easing = "cubic"

            [viewport]
            height = 720.0
            "#,
        )
        .unwrap();
        assert_eq!(config.scroll.duration_ms, 800);
        assert_eq!(config.scroll.easing, EasingType::Cubic);
        assert!((config.scroll.touch_multiplier - 2.0).abs() < 1e-12);
        assert!((config.viewport.height - 720.0).abs() < 1e-12);
        assert!((config.viewport.width - 1440.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = StageConfig::from_toml("[scroll]\neasing = \"bouncy\"").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_toml_roundtrip_keeps_easing() {
        let mut config = StageConfig::default();
        config.scroll.easing = EasingType::Smoothstep;
        let text = config.to_toml().unwrap();
        let parsed = StageConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.scroll.easing, EasingType::Smoothstep);
    }
}
