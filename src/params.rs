//! Adjustable farm parameters and the dirty flag that tracks whether the
//! last solve still matches them.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamField {
    Land,
    Labor,
    WheatProfit,
    BarleyProfit,
}

impl ParamField {
    pub const ALL: [ParamField; 4] = [
        ParamField::Land,
        ParamField::Labor,
        ParamField::WheatProfit,
        ParamField::BarleyProfit,
    ];

    /// Label used on the parameter panel.
    pub fn label(self) -> &'static str {
        match self {
            ParamField::Land => "Land (acres)",
            ParamField::Labor => "Labor (hours)",
            ParamField::WheatProfit => "Wheat Profit ($/acre)",
            ParamField::BarleyProfit => "Barley Profit ($/acre)",
        }
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamField::Land => "land",
            ParamField::Labor => "labor",
            ParamField::WheatProfit => "wheat_profit",
            ParamField::BarleyProfit => "barley_profit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: ParamField, value: f64 },
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: ParamField, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub land: f64,
    pub labor: f64,
    pub wheat_profit: f64,
    pub barley_profit: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            land: 14.0,
            labor: 10.0,
            wheat_profit: 3.0,
            barley_profit: 4.0,
        }
    }
}

impl Parameters {
    pub fn new(
        land: f64,
        labor: f64,
        wheat_profit: f64,
        barley_profit: f64,
    ) -> Result<Self, ParamError> {
        let params = Self {
            land,
            labor,
            wheat_profit,
            barley_profit,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        for field in ParamField::ALL {
            let value = self.get(field);
            if !value.is_finite() {
                return Err(ParamError::NotFinite { field, value });
            }
            if value < 0.0 {
                return Err(ParamError::Negative { field, value });
            }
        }
        Ok(())
    }

    pub fn get(&self, field: ParamField) -> f64 {
        match field {
            ParamField::Land => self.land,
            ParamField::Labor => self.labor,
            ParamField::WheatProfit => self.wheat_profit,
            ParamField::BarleyProfit => self.barley_profit,
        }
    }

    fn slot_mut(&mut self, field: ParamField) -> &mut f64 {
        match field {
            ParamField::Land => &mut self.land,
            ParamField::Labor => &mut self.labor,
            ParamField::WheatProfit => &mut self.wheat_profit,
            ParamField::BarleyProfit => &mut self.barley_profit,
        }
    }
}

/// Owns the current [`Parameters`] and remembers whether they changed since
/// the last solve.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    values: Parameters,
    dirty: bool,
}

impl ParameterStore {
    pub fn new(values: Parameters) -> Self {
        Self {
            values,
            dirty: true,
        }
    }

    pub fn values(&self) -> &Parameters {
        &self.values
    }

    pub fn get(&self, field: ParamField) -> f64 {
        self.values.get(field)
    }

    /// Applies `field = max(0, field + delta)` and marks the last solve stale.
    /// Returns the new value.
    pub fn adjust(&mut self, field: ParamField, delta: f64) -> f64 {
        let slot = self.values.slot_mut(field);
        *slot = (*slot + delta).max(0.0);
        self.dirty = true;
        *slot
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_solved(&mut self) {
        self.dirty = false;
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(Parameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_floors_at_zero() {
        let mut store = ParameterStore::new(Parameters::new(1.0, 0.0, 0.0, 2.0).unwrap());
        assert_eq!(store.adjust(ParamField::Land, -1.0), 0.0);
        assert_eq!(store.adjust(ParamField::Land, -1.0), 0.0);
        assert_eq!(store.adjust(ParamField::Labor, -1.0), 0.0);
        assert_eq!(store.get(ParamField::BarleyProfit), 2.0);
    }

    #[test]
    fn adjust_has_no_upper_bound() {
        let mut store = ParameterStore::default();
        for _ in 0..1_000 {
            store.adjust(ParamField::WheatProfit, 1.0);
        }
        assert_eq!(store.get(ParamField::WheatProfit), 1_003.0);
    }

    #[test]
    fn adjust_then_back_restores_values() {
        let mut store = ParameterStore::default();
        let before = *store.values();
        for field in ParamField::ALL {
            store.adjust(field, 1.0);
            store.adjust(field, -1.0);
        }
        assert_eq!(*store.values(), before);
    }

    #[test]
    fn dirty_flag_follows_adjust_and_solve() {
        let mut store = ParameterStore::default();
        assert!(store.is_dirty());
        store.mark_solved();
        assert!(!store.is_dirty());
        store.adjust(ParamField::Labor, 1.0);
        assert!(store.is_dirty());
    }

    #[test]
    fn rejects_negative_and_nan() {
        assert_eq!(
            Parameters::new(-1.0, 0.0, 0.0, 0.0),
            Err(ParamError::Negative {
                field: ParamField::Land,
                value: -1.0
            })
        );
        assert!(matches!(
            Parameters::new(0.0, 0.0, f64::NAN, 0.0),
            Err(ParamError::NotFinite {
                field: ParamField::WheatProfit,
                ..
            })
        ));
    }
}
