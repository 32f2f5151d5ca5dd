use anyhow::{anyhow, Result};
use plotters::style::RGBColor;

/// Color band for a Celsius temperature.
///
/// The same classification backs the current-conditions panel background and
/// the per-hour forecast bar fills, so both stay visually consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempBand {
    MidnightBlue,
    SteelBlue,
    PowderBlue,
    LightCyan,
    Moccasin,
    Burlywood,
    Goldenrod,
    DarkOrange,
    Firebrick,
}

impl TempBand {
    /// Band for a temperature. The boundary table leaves the intervals
    /// (-10,-9), (-5,-4) and (15,16) uncovered; those fall through to the
    /// final band, which doubles as the catch-all.
    pub fn classify(temp_c: f64) -> TempBand {
        if temp_c < -20.0 {
            TempBand::MidnightBlue
        } else if temp_c <= -10.0 {
            TempBand::SteelBlue
        } else if (-9.0..=-5.0).contains(&temp_c) {
            TempBand::PowderBlue
        } else if (-4.0..=0.0).contains(&temp_c) {
            TempBand::LightCyan
        } else if temp_c > 0.0 && temp_c <= 10.0 {
            TempBand::Moccasin
        } else if temp_c > 10.0 && temp_c <= 15.0 {
            TempBand::Burlywood
        } else if (16.0..21.0).contains(&temp_c) {
            TempBand::Goldenrod
        } else if (21.0..26.0).contains(&temp_c) {
            TempBand::DarkOrange
        } else {
            TempBand::Firebrick
        }
    }

    /// Classify a raw text input. Anything that is not a number is rejected
    /// before any boundary is evaluated.
    pub fn from_input(raw: &str) -> Result<TempBand> {
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("temperature must be a number, got '{}'", raw))?;
        Ok(TempBand::classify(value))
    }

    /// CSS color name of this band
    pub fn name(self) -> &'static str {
        match self {
            TempBand::MidnightBlue => "midnightblue",
            TempBand::SteelBlue => "steelblue",
            TempBand::PowderBlue => "powderblue",
            TempBand::LightCyan => "lightcyan",
            TempBand::Moccasin => "moccasin",
            TempBand::Burlywood => "burlywood",
            TempBand::Goldenrod => "goldenrod",
            TempBand::DarkOrange => "darkorange",
            TempBand::Firebrick => "firebrick",
        }
    }

    /// Fill color for chart bars
    pub fn rgb(self) -> RGBColor {
        match self {
            TempBand::MidnightBlue => RGBColor(25, 25, 112),
            TempBand::SteelBlue => RGBColor(70, 130, 180),
            TempBand::PowderBlue => RGBColor(176, 224, 230),
            TempBand::LightCyan => RGBColor(224, 255, 255),
            TempBand::Moccasin => RGBColor(255, 228, 181),
            TempBand::Burlywood => RGBColor(222, 184, 135),
            TempBand::Goldenrod => RGBColor(218, 165, 32),
            TempBand::DarkOrange => RGBColor(255, 140, 0),
            TempBand::Firebrick => RGBColor(178, 34, 34),
        }
    }

    /// Background color for the summary panel
    pub fn slint_color(self) -> slint::Color {
        let RGBColor(r, g, b) = self.rgb();
        slint::Color::from_rgb_u8(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_per_documented_value() {
        assert_eq!(TempBand::classify(-21.0).name(), "midnightblue");
        assert_eq!(TempBand::classify(-15.0).name(), "steelblue");
        assert_eq!(TempBand::classify(-7.0).name(), "powderblue");
        assert_eq!(TempBand::classify(-2.0).name(), "lightcyan");
        assert_eq!(TempBand::classify(5.0).name(), "moccasin");
        assert_eq!(TempBand::classify(12.0).name(), "burlywood");
        assert_eq!(TempBand::classify(18.0).name(), "goldenrod");
        assert_eq!(TempBand::classify(22.0).name(), "darkorange");
        assert_eq!(TempBand::classify(30.0).name(), "firebrick");
    }

    #[test]
    fn test_boundaries_are_inclusive_where_documented() {
        assert_eq!(TempBand::classify(-20.0), TempBand::SteelBlue);
        assert_eq!(TempBand::classify(-10.0), TempBand::SteelBlue);
        assert_eq!(TempBand::classify(-9.0), TempBand::PowderBlue);
        assert_eq!(TempBand::classify(0.0), TempBand::LightCyan);
        assert_eq!(TempBand::classify(10.0), TempBand::Moccasin);
        assert_eq!(TempBand::classify(15.0), TempBand::Burlywood);
        assert_eq!(TempBand::classify(16.0), TempBand::Goldenrod);
        assert_eq!(TempBand::classify(20.0), TempBand::Goldenrod);
        assert_eq!(TempBand::classify(21.0), TempBand::DarkOrange);
        assert_eq!(TempBand::classify(26.0), TempBand::Firebrick);
    }

    #[test]
    fn test_uncovered_gaps_fall_into_the_last_band() {
        assert_eq!(TempBand::classify(-9.5), TempBand::Firebrick);
        assert_eq!(TempBand::classify(-4.5), TempBand::Firebrick);
        assert_eq!(TempBand::classify(15.5), TempBand::Firebrick);
    }

    #[test]
    fn test_non_numeric_input_is_rejected() {
        assert!(TempBand::from_input("a").is_err());
        assert!(TempBand::from_input("").is_err());
        assert!(TempBand::from_input("null").is_err());
        assert_eq!(TempBand::from_input("-21").unwrap(), TempBand::MidnightBlue);
        assert_eq!(TempBand::from_input("22.5").unwrap(), TempBand::DarkOrange);
    }
}
