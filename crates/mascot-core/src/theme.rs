//! Colour resolution.
//!
//! Colours come from explicit config first, then from a [`ThemeProvider`]
//! (the web front end reads computed CSS custom properties), then from
//! built-in defaults.

use crate::ColorOverrides;

pub const PRIMARY_VAR: &str = "--accent-primary";
pub const PRIMARY_RGB_VAR: &str = "--accent-primary-rgb";
pub const SECONDARY_RGB_VAR: &str = "--accent-secondary-rgb";
pub const CORE_VAR: &str = "--core-glow-contrast-color";
pub const AMBIENT_GLOW_RGB_VAR: &str = "--ambient-glow-color-rgb";

pub const DEFAULT_PRIMARY: &str = "#14B8A6";
pub const DEFAULT_PRIMARY_RGB: &str = "20, 184, 166";
pub const DEFAULT_SECONDARY_RGB: &str = "129, 140, 248";
pub const DEFAULT_CORE: &str = "#1E293B";
pub const DEFAULT_AMBIENT_GLOW_RGB: &str = "20, 184, 166";

/// Source of named style values, e.g. CSS custom properties.
pub trait ThemeProvider {
    fn lookup(&self, property: &str) -> Option<String>;
}

/// Provider that never has a value; every colour falls back to its default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTheme;

impl ThemeProvider for NoTheme {
    fn lookup(&self, _property: &str) -> Option<String> {
        None
    }
}

impl<F> ThemeProvider for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, property: &str) -> Option<String> {
        self(property)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeColors {
    pub primary: String,
    /// Comma-separated `r, g, b` triple.
    pub primary_rgb: String,
    pub secondary_rgb: String,
    pub core: String,
    pub ambient_glow_rgb: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY.to_string(),
            primary_rgb: DEFAULT_PRIMARY_RGB.to_string(),
            secondary_rgb: DEFAULT_SECONDARY_RGB.to_string(),
            core: DEFAULT_CORE.to_string(),
            ambient_glow_rgb: DEFAULT_AMBIENT_GLOW_RGB.to_string(),
        }
    }
}

impl ThemeColors {
    pub fn resolve(overrides: Option<&ColorOverrides>, theme: &dyn ThemeProvider) -> Self {
        let pick = |explicit: Option<&String>, property: &str, fallback: &str| -> String {
            explicit
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .or_else(|| {
                    theme
                        .lookup(property)
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty())
                })
                .unwrap_or_else(|| fallback.to_string())
        };
        let o = overrides.cloned().unwrap_or_default();
        Self {
            primary: pick(o.primary.as_ref(), PRIMARY_VAR, DEFAULT_PRIMARY),
            primary_rgb: pick(o.primary_rgb.as_ref(), PRIMARY_RGB_VAR, DEFAULT_PRIMARY_RGB),
            secondary_rgb: pick(
                o.secondary_rgb.as_ref(),
                SECONDARY_RGB_VAR,
                DEFAULT_SECONDARY_RGB,
            ),
            core: pick(o.core.as_ref(), CORE_VAR, DEFAULT_CORE),
            ambient_glow_rgb: pick(
                o.ambient_glow_rgb.as_ref(),
                AMBIENT_GLOW_RGB_VAR,
                DEFAULT_AMBIENT_GLOW_RGB,
            ),
        }
    }

    #[inline]
    pub fn primary_rgba(&self, alpha: f64) -> String {
        rgba(&self.primary_rgb, alpha)
    }

    #[inline]
    pub fn secondary_rgba(&self, alpha: f64) -> String {
        rgba(&self.secondary_rgb, alpha)
    }
}

#[inline]
pub fn rgba(rgb: &str, alpha: f64) -> String {
    format!("rgba({}, {})", rgb, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_config_or_theme() {
        let colors = ThemeColors::resolve(None, &NoTheme);
        assert_eq!(colors, ThemeColors::default());
    }

    #[test]
    fn config_beats_theme_beats_default() {
        let theme = |name: &str| match name {
            PRIMARY_VAR => Some(" #abcdef ".to_string()),
            CORE_VAR => Some("#000000".to_string()),
            SECONDARY_RGB_VAR => Some("   ".to_string()),
            _ => None,
        };
        let overrides = ColorOverrides {
            core: Some("#ffffff".into()),
            primary_rgb: Some(String::new()),
            ..Default::default()
        };
        let colors = ThemeColors::resolve(Some(&overrides), &theme);
        assert_eq!(colors.primary, "#abcdef");
        assert_eq!(colors.core, "#ffffff");
        // blank override and blank theme value both fall through
        assert_eq!(colors.primary_rgb, DEFAULT_PRIMARY_RGB);
        assert_eq!(colors.secondary_rgb, DEFAULT_SECONDARY_RGB);
    }

    #[test]
    fn rgba_formatting() {
        let colors = ThemeColors::default();
        assert_eq!(colors.primary_rgba(0.5), "rgba(20, 184, 166, 0.5)");
        assert_eq!(colors.secondary_rgba(0.9), "rgba(129, 140, 248, 0.9)");
    }
}
