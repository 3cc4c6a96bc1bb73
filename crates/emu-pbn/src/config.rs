//! Canvas configuration and host-supplied settings.

/// Canvas width used when the host supplies none (or an unusable one).
pub const DEFAULT_WIDTH: u16 = 64;
/// Canvas height used when the host supplies none (or an unusable one).
pub const DEFAULT_HEIGHT: u16 = 56;
/// Largest accepted canvas dimension.
pub const MAX_DIMENSION: u16 = 256;

/// Validation pattern the host applies to `width`/`height` before loading.
/// Matches the decimal integers 1 through 256.
pub const DIMENSION_PATTERN: &str = "[1-9]|([1-9]|1[0-9]|2[0-4])[0-9]|25[0-6]";

/// One `(name, value)` pair from a load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub name: String,
    pub value: String,
}

impl Setting {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Paint-by-numbers core configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PbnConfig {
    /// Canvas width in pixels, 1–256.
    pub width: u16,
    /// Canvas height in pixels, 1–256.
    pub height: u16,
    /// Stop a frame's paint loop after this many points. `None` leaves the
    /// loop bounded only by the input driver.
    pub paint_limit: Option<u32>,
}

impl Default for PbnConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            paint_limit: None,
        }
    }
}

impl PbnConfig {
    /// Build a configuration from the host's settings list.
    ///
    /// `width` and `height` are applied when they parse as an integer in
    /// 1–256. Anything else keeps that setting's default. Unknown names are
    /// ignored.
    #[must_use]
    pub fn from_settings(settings: &[Setting]) -> Self {
        let mut config = Self::default();
        for setting in settings {
            match setting.name.as_str() {
                "width" => config.width = dimension_or_default("width", &setting.value, DEFAULT_WIDTH),
                "height" => {
                    config.height = dimension_or_default("height", &setting.value, DEFAULT_HEIGHT);
                }
                other => log::debug!("ignoring unknown setting '{other}'"),
            }
        }
        config
    }
}

fn dimension_or_default(name: &str, value: &str, default: u16) -> u16 {
    parse_dimension(value).unwrap_or_else(|| {
        log::warn!("setting {name}={value:?} is not an integer in 1-{MAX_DIMENSION}; using {default}");
        default
    })
}

/// Parse a canvas dimension the way `DIMENSION_PATTERN` accepts it: plain
/// decimal digits, no sign, no leading zero, value 1–256.
#[must_use]
pub fn parse_dimension(value: &str) -> Option<u16> {
    let bytes = value.as_bytes();
    if bytes.is_empty() || bytes.len() > 3 || bytes[0] == b'0' {
        return None;
    }
    if !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let n: u16 = value.parse().ok()?;
    (1..=MAX_DIMENSION).contains(&n).then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_64_by_56() {
        let config = PbnConfig::default();
        assert_eq!((config.width, config.height), (64, 56));
        assert_eq!(config.paint_limit, None);
    }

    #[test]
    fn settings_override_dimensions() {
        let config =
            PbnConfig::from_settings(&[Setting::new("width", "128"), Setting::new("height", "7")]);
        assert_eq!((config.width, config.height), (128, 7));
    }

    #[test]
    fn missing_settings_keep_defaults() {
        let config = PbnConfig::from_settings(&[Setting::new("height", "200")]);
        assert_eq!((config.width, config.height), (64, 200));
    }

    #[test]
    fn unknown_settings_are_ignored() {
        let config = PbnConfig::from_settings(&[Setting::new("depth", "3")]);
        assert_eq!(config, PbnConfig::default());
    }

    #[test]
    fn malformed_dimension_falls_back_to_default() {
        // A C-style atoi would read these as 0 (or 12); they use the default instead.
        let config =
            PbnConfig::from_settings(&[Setting::new("width", "abc"), Setting::new("height", "12px")]);
        assert_eq!((config.width, config.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
    }

    #[test]
    fn out_of_range_dimension_falls_back_to_default() {
        let config =
            PbnConfig::from_settings(&[Setting::new("width", "0"), Setting::new("height", "257")]);
        assert_eq!((config.width, config.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
    }

    #[test]
    fn parse_dimension_matches_pattern() {
        for ok in ["1", "9", "10", "99", "100", "199", "249", "250", "256"] {
            assert!(parse_dimension(ok).is_some(), "{ok} should parse");
        }
        for bad in ["", "0", "01", "257", "300", "1000", "-5", "+5", " 5", "5 ", "2.5"] {
            assert_eq!(parse_dimension(bad), None, "{bad:?} should be rejected");
        }
    }
}
