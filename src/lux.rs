/// Lux calculation for the TSL2561 packages.
///
/// The vendor approximates the sensor response with a piecewise function of the channel ratio
/// `ch1 / ch0`: a power term below the first break point, linear combinations of the two
/// channels above it, and zero once infrared dominates.
///
/// Datasheet: https://cdn-shop.adafruit.com/datasheets/TSL2561.pdf (section "Calculating Lux")
use std::fmt;

/// One segment of the piecewise approximation, covering ratios up to and including `max_ratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Band {
    max_ratio: f64,
    k0: f64,
    k1: f64,
    /// Lowest band: `k0*ch0 - k1*ch0*ratio^1.4` instead of `k0*ch0 - k1*ch1`
    power: bool,
}

impl Band {
    const fn power(max_ratio: f64, k0: f64, k1: f64) -> Self {
        Band {
            max_ratio,
            k0,
            k1,
            power: true,
        }
    }

    const fn linear(max_ratio: f64, k0: f64, k1: f64) -> Self {
        Band {
            max_ratio,
            k0,
            k1,
            power: false,
        }
    }

    fn eval(&self, ch0: f64, ch1: f64, ratio: f64) -> f64 {
        if self.power {
            self.k0 * ch0 - self.k1 * ch0 * ratio.powf(1.4)
        } else {
            self.k0 * ch0 - self.k1 * ch1
        }
    }
}

// Chipscale package
const CS_BANDS: [Band; 4] = [
    Band::power(0.52, 0.0315, 0.0593),
    Band::linear(0.65, 0.0229, 0.0291),
    Band::linear(0.80, 0.0157, 0.0180),
    Band::linear(1.30, 0.00338, 0.00260),
];

// T (TMB-6) package, also used when the package is unknown
const T_BANDS: [Band; 4] = [
    Band::power(0.50, 0.0304, 0.062),
    Band::linear(0.61, 0.0224, 0.031),
    Band::linear(0.80, 0.0128, 0.0153),
    Band::linear(1.30, 0.00146, 0.00112),
];

/// Formula table for a TSL2561 package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LuxFormula {
    Cs,
    T,
}

impl LuxFormula {
    fn bands(self) -> &'static [Band] {
        match self {
            LuxFormula::Cs => &CS_BANDS,
            LuxFormula::T => &T_BANDS,
        }
    }

    /// Calculate lux from the two channels, both already scaled by the time and gain
    /// multipliers.
    ///  - ch0 = broadband
    ///  - ch1 = infrared
    ///
    /// Returns `None` when `ch0` is zero: there is no baseline to compute a ratio against.
    pub fn calculate(self, ch0: f64, ch1: f64) -> Option<f64> {
        if ch0 == 0.0 {
            return None;
        }

        let ratio = ch1 / ch0;
        let lux = self
            .bands()
            .iter()
            .find(|b| ratio <= b.max_ratio)
            .map_or(0.0, |b| b.eval(ch0, ch1, ratio));

        Some(lux)
    }
}

/// A light reading as reported to callers, rounded to one decimal place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub lux: f64,
    /// The latest sample was invalid and `lux` repeats the last good value
    pub stale: bool,
}

impl Measurement {
    pub fn new(lux: f64, stale: bool) -> Self {
        Measurement {
            lux: round_tenth(lux),
            stale,
        }
    }

    /// Quantity kind
    pub const fn kind(&self) -> &'static str {
        "lum"
    }

    pub const fn unit(&self) -> &'static str {
        "lux"
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} {}", self.lux, self.unit())?;
        if self.stale {
            write!(f, " (stale)")?;
        }
        Ok(())
    }
}

fn round_tenth(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(expected: f64, actual: f64) {
        assert!(
            (expected - actual).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn zero_broadband_is_invalid() {
        for formula in [LuxFormula::Cs, LuxFormula::T] {
            assert_eq!(None, formula.calculate(0.0, 0.0));
            assert_eq!(None, formula.calculate(0.0, 1234.0));
        }
    }

    #[test]
    fn no_infrared() {
        approx(0.0315 * 1000.0, LuxFormula::Cs.calculate(1000.0, 0.0).unwrap());
        approx(0.0304 * 1000.0, LuxFormula::T.calculate(1000.0, 0.0).unwrap());
    }

    #[test]
    fn cs_first_band() {
        // scaled values for ch0=0x0B5C, ch1=0x02D7 at 402ms and 1x gain
        let lux = LuxFormula::Cs.calculate(46528.0, 11632.0).unwrap();
        approx(1069.4588027830987, lux);
        assert_eq!(1069.5, Measurement::new(lux, false).lux);

        let lux = LuxFormula::T.calculate(46528.0, 11632.0).unwrap();
        approx(1000.2397627749091, lux);
    }

    #[test]
    fn cs_band_boundary() {
        // ratio exactly 0.52 stays in the lowest band
        let lux = LuxFormula::Cs.calculate(100.0, 52.0).unwrap();
        approx(0.0315 * 100.0 - 0.0593 * 100.0 * 0.52f64.powf(1.4), lux);

        // just above moves to the second band
        let lux = LuxFormula::Cs.calculate(1_000_000.0, 520_001.0).unwrap();
        approx(0.0229 * 1_000_000.0 - 0.0291 * 520_001.0, lux);
    }

    #[test]
    fn cs_upper_bands() {
        approx(5.44, LuxFormula::Cs.calculate(1000.0, 600.0).unwrap());
        approx(3.1, LuxFormula::Cs.calculate(1000.0, 700.0).unwrap());
        approx(0.78, LuxFormula::Cs.calculate(1000.0, 1000.0).unwrap());
        approx(0.0, LuxFormula::Cs.calculate(1000.0, 1301.0).unwrap());
    }

    #[test]
    fn t_upper_bands() {
        approx(0.0224 * 1000.0 - 0.031 * 550.0, LuxFormula::T.calculate(1000.0, 550.0).unwrap());
        approx(0.0128 * 1000.0 - 0.0153 * 700.0, LuxFormula::T.calculate(1000.0, 700.0).unwrap());
        approx(0.00146 * 1000.0 - 0.00112 * 1300.0, LuxFormula::T.calculate(1000.0, 1300.0).unwrap());
        approx(0.0, LuxFormula::T.calculate(1000.0, 5000.0).unwrap());
    }

    #[test]
    fn t_band_boundary() {
        let lux = LuxFormula::T.calculate(100.0, 50.0).unwrap();
        approx(0.0304 * 100.0 - 0.062 * 100.0 * 0.5f64.powf(1.4), lux);

        let lux = LuxFormula::T.calculate(1_000_000.0, 500_001.0).unwrap();
        approx(0.0224 * 1_000_000.0 - 0.031 * 500_001.0, lux);
    }

    #[test]
    fn measurement_formatting() {
        let m = Measurement::new(1069.4588, false);
        assert_eq!("lum", m.kind());
        assert_eq!("lux", m.unit());
        assert_eq!("1069.5 lux", m.to_string());
        assert_eq!("0.0 lux (stale)", Measurement::new(0.0, true).to_string());
    }
}
