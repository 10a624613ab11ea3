use serde::Serialize;
use tracing::warn;

use crate::errors::AppError;
use crate::models::ActivityCategory;

pub const EMISSION_UNIT: &str = "kg CO₂";

/// Emission factor for one activity type, in kg CO₂ per input unit
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EmissionFactor {
    pub value: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub factor: f64,
}

const fn factor(value: &'static str, label: &'static str, unit: &'static str, factor: f64) -> EmissionFactor {
    EmissionFactor { value, label, unit, factor }
}

// Transport factors are per passenger-km.
const TRANSPORT: &[EmissionFactor] = &[
    factor("car_petrol", "Car (Petrol)", "km", 0.192),
    factor("car_diesel", "Car (Diesel)", "km", 0.171),
    factor("car_electric", "Car (Electric)", "km", 0.053),
    factor("car_hybrid", "Car (Hybrid)", "km", 0.109),
    factor("motorcycle", "Motorcycle", "km", 0.113),
    factor("bus", "Bus", "km", 0.089),
    factor("train", "Train", "km", 0.041),
    factor("plane_short", "Flight (Short-haul)", "km", 0.255),
    factor("plane_long", "Flight (Long-haul)", "km", 0.195),
    factor("bicycle", "Bicycle", "km", 0.0),
    factor("walking", "Walking", "km", 0.0),
];

const ENERGY: &[EmissionFactor] = &[
    factor("electricity_grid", "Electricity (Grid)", "kWh", 0.385),
    factor("electricity_coal", "Electricity (Coal)", "kWh", 0.820),
    factor("electricity_gas", "Electricity (Gas)", "kWh", 0.490),
    factor("electricity_renewable", "Electricity (Renewable)", "kWh", 0.0),
    factor("natural_gas", "Natural Gas", "kWh", 0.185),
    factor("heating_oil", "Heating Oil", "L", 0.265),
];

const FOOD: &[EmissionFactor] = &[
    factor("beef", "Beef", "kg", 27.0),
    factor("lamb", "Lamb", "kg", 39.2),
    factor("pork", "Pork", "kg", 12.1),
    factor("chicken", "Chicken", "kg", 6.9),
    factor("fish", "Fish", "kg", 6.1),
    factor("eggs", "Eggs", "kg", 4.8),
    factor("cheese", "Cheese", "kg", 13.5),
    factor("milk", "Milk", "L", 1.9),
    factor("rice", "Rice", "kg", 2.7),
    factor("vegetables", "Vegetables", "kg", 0.4),
    factor("fruits", "Fruits", "kg", 0.5),
];

const WASTE: &[EmissionFactor] = &[
    factor("general_waste", "General Waste", "kg", 0.5),
    factor("recycling", "Recycling", "kg", 0.02),
    factor("compost", "Compost", "kg", 0.01),
];

const OTHER: &[EmissionFactor] = &[
    factor("water", "Water", "L", 0.0003),
    factor("paper", "Paper", "kg", 1.3),
    factor("plastic", "Plastic", "kg", 6.0),
];

const DEFAULT_CUSTOM_FACTOR: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionCalculation {
    pub amount: f64,
    pub factor: f64,
    pub input_unit: String,
    pub unit: &'static str,
    pub calculation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub name: &'static str,
    pub icon: &'static str,
    pub types: &'static [EmissionFactor],
}

/// Converts activity amounts into kg CO₂ using fixed per-unit factors
pub struct CarbonCalculator;

impl CarbonCalculator {
    pub fn factors(category: ActivityCategory) -> &'static [EmissionFactor] {
        match category {
            ActivityCategory::Transport => TRANSPORT,
            ActivityCategory::Energy => ENERGY,
            ActivityCategory::Food => FOOD,
            ActivityCategory::Waste => WASTE,
            ActivityCategory::Other => OTHER,
        }
    }

    pub fn lookup(category: ActivityCategory, activity_type: &str) -> Option<&'static EmissionFactor> {
        Self::factors(category)
            .iter()
            .find(|entry| entry.value == activity_type)
    }

    /// Factor and unit used when the activity type is not in the table
    fn fallback(category: ActivityCategory, custom_factor: Option<f64>) -> (f64, &'static str) {
        match category {
            ActivityCategory::Transport => (0.192, "km"),
            ActivityCategory::Energy => (0.385, "kWh"),
            ActivityCategory::Food => (5.0, "kg"),
            ActivityCategory::Waste => (0.5, "kg"),
            ActivityCategory::Other => (custom_factor.unwrap_or(DEFAULT_CUSTOM_FACTOR), "units"),
        }
    }

    pub fn calculate(
        category: ActivityCategory,
        activity_type: &str,
        value: f64,
        custom_factor: Option<f64>,
    ) -> Result<EmissionCalculation, AppError> {
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::Validation(format!(
                "Activity value must be a non-negative number, got {}",
                value
            )));
        }
        if let Some(custom) = custom_factor {
            if !custom.is_finite() || custom < 0.0 {
                return Err(AppError::Validation(
                    "Emission factor must be a non-negative number".to_string(),
                ));
            }
        }

        let (factor, unit) = match Self::lookup(category, activity_type) {
            Some(entry) => (entry.factor, entry.unit),
            None => {
                if category != ActivityCategory::Other {
                    warn!(
                        "Unknown {} activity type '{}', using category default factor",
                        category.as_str(),
                        activity_type
                    );
                }
                Self::fallback(category, custom_factor)
            }
        };

        let amount = (value * factor * 100.0).round() / 100.0;
        if !amount.is_finite() {
            return Err(AppError::Validation(format!(
                "Emission for {} {} is too large to record",
                value, unit
            )));
        }

        Ok(EmissionCalculation {
            amount,
            factor,
            input_unit: unit.to_string(),
            unit: EMISSION_UNIT,
            calculation: format!("{} {} × {} {}/{}", value, unit, factor, EMISSION_UNIT, unit),
        })
    }

    pub fn categories() -> Vec<(ActivityCategory, CategoryInfo)> {
        ActivityCategory::ALL
            .iter()
            .map(|category| {
                (
                    *category,
                    CategoryInfo {
                        name: category.display_name(),
                        icon: category.icon(),
                        types: Self::factors(*category),
                    },
                )
            })
            .collect()
    }
}
