/// Known chip models and their defaults.
use crate::codec::Family;
use crate::lux::LuxFormula;

/// How lux is derived from the raw data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaKind {
    /// Two channels combined with the package's ratio formula (TSL2561 family)
    Ratio(LuxFormula),
    /// Single photometric channel scaled by the time multiplier (TSL4531 family)
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub name: &'static str,
    pub address: u8,
    /// Integration time in ms
    pub default_time: u16,
    /// `None` for models without a gain setting
    pub default_gain: Option<u16>,
    pub formula: FormulaKind,
}

impl Variant {
    pub const fn family(&self) -> Family {
        match self.formula {
            FormulaKind::Ratio(_) => Family::Tsl2561,
            FormulaKind::Simple => Family::Tsl4531,
        }
    }
}

const fn tsl2561(name: &'static str, formula: LuxFormula) -> Variant {
    Variant {
        name,
        address: 0x39,
        default_time: 402,
        default_gain: Some(1),
        formula: FormulaKind::Ratio(formula),
    }
}

const fn tsl4531(name: &'static str, address: u8) -> Variant {
    Variant {
        name,
        address,
        default_time: 400,
        default_gain: None,
        formula: FormulaKind::Simple,
    }
}

/// Unknown package, uses the T package formula
pub const TSL2561: Variant = tsl2561("TSL2561", LuxFormula::T);
/// Chipscale package
pub const TSL2561_CS: Variant = tsl2561("TSL2561CS", LuxFormula::Cs);
/// TMB-6 package
pub const TSL2561_T: Variant = tsl2561("TSL2561T", LuxFormula::T);

/// Unknown subtype
pub const TSL4531: Variant = tsl4531("TSL4531", 0x29);
pub const TSL45311: Variant = tsl4531("TSL45311", 0x39);
pub const TSL45313: Variant = tsl4531("TSL45313", 0x39);
pub const TSL45315: Variant = tsl4531("TSL45315", 0x29);
pub const TSL45317: Variant = tsl4531("TSL45317", 0x29);

pub const ALL: [&Variant; 8] = [
    &TSL2561, &TSL2561_CS, &TSL2561_T, &TSL4531, &TSL45311, &TSL45313, &TSL45315, &TSL45317,
];

/// Look up a model by name, ignoring case.
pub fn by_name(name: &str) -> Option<&'static Variant> {
    ALL.iter().copied().find(|v| v.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        assert_eq!(Some(&TSL2561_CS), by_name("TSL2561CS"));
        assert_eq!(Some(&TSL45315), by_name("tsl45315"));
        assert_eq!(None, by_name("TSL2591"));
    }

    #[test]
    fn defaults_are_valid() {
        for v in ALL {
            let family = v.family();
            assert!(
                family.supported_times().contains(&v.default_time),
                "{0} default time {1}",
                v.name,
                v.default_time
            );
            assert_eq!(family.has_gain(), v.default_gain.is_some(), "{}", v.name);
        }
    }

    #[test]
    fn formula_selection() {
        assert_eq!(FormulaKind::Ratio(LuxFormula::T), TSL2561.formula);
        assert_eq!(FormulaKind::Ratio(LuxFormula::Cs), TSL2561_CS.formula);
        assert_eq!(FormulaKind::Ratio(LuxFormula::T), TSL2561_T.formula);
        assert_eq!(Family::Tsl4531, TSL45313.family());
        assert_eq!(0x39, TSL45313.address);
        assert_eq!(0x29, TSL4531.address);
    }
}
