//! Classifier feature vector.
//!
//! The risk classifier was trained on 14 named columns in a fixed order.
//! [`FeatureName::ALL`] is that contract; [`FeatureVector`] always carries
//! every slot, zero-filled when an input was missing.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One slot of the classifier's input contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureName {
    PatientId,
    HeartRate,
    RespiratoryRate,
    BodyTemperature,
    OxygenSaturation,
    SystolicBloodPressure,
    DiastolicBloodPressure,
    Age,
    WeightKg,
    HeightM,
    DerivedPulsePressure,
    DerivedBmi,
    DerivedMap,
    GenderMale,
}

impl FeatureName {
    /// All slots in trained order.
    pub const ALL: [FeatureName; 14] = [
        Self::PatientId,
        Self::HeartRate,
        Self::RespiratoryRate,
        Self::BodyTemperature,
        Self::OxygenSaturation,
        Self::SystolicBloodPressure,
        Self::DiastolicBloodPressure,
        Self::Age,
        Self::WeightKg,
        Self::HeightM,
        Self::DerivedPulsePressure,
        Self::DerivedBmi,
        Self::DerivedMap,
        Self::GenderMale,
    ];

    /// Column name as the classifier knows it.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PatientId => "Patient ID",
            Self::HeartRate => "Heart Rate",
            Self::RespiratoryRate => "Respiratory Rate",
            Self::BodyTemperature => "Body Temperature",
            Self::OxygenSaturation => "Oxygen Saturation",
            Self::SystolicBloodPressure => "Systolic Blood Pressure",
            Self::DiastolicBloodPressure => "Diastolic Blood Pressure",
            Self::Age => "Age",
            Self::WeightKg => "Weight (kg)",
            Self::HeightM => "Height (m)",
            Self::DerivedPulsePressure => "Derived_Pulse_Pressure",
            Self::DerivedBmi => "Derived_BMI",
            Self::DerivedMap => "Derived_MAP",
            Self::GenderMale => "Gender_Male",
        }
    }

    /// Look up a slot by its classifier column name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.as_str() == name)
    }
}

impl std::fmt::Display for FeatureName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contracted column names in trained order.
pub fn feature_names() -> [&'static str; 14] {
    FeatureName::ALL.map(|slot| slot.as_str())
}

/// A single patient snapshot in classifier form.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureVector {
    pub patient_id: i64,
    pub heart_rate: f64,
    pub respiratory_rate: f64,
    pub body_temperature: f64,
    pub oxygen_saturation: f64,
    pub systolic_bp: f64,
    pub diastolic_bp: f64,
    pub age: f64,
    pub weight_kg: f64,
    pub height_m: f64,
    pub pulse_pressure: f64,
    pub bmi: f64,
    pub map: f64,
    pub gender_male: u8,
}

impl FeatureVector {
    /// Value of one slot.
    pub fn get(&self, name: FeatureName) -> f64 {
        match name {
            FeatureName::PatientId => self.patient_id as f64,
            FeatureName::HeartRate => self.heart_rate,
            FeatureName::RespiratoryRate => self.respiratory_rate,
            FeatureName::BodyTemperature => self.body_temperature,
            FeatureName::OxygenSaturation => self.oxygen_saturation,
            FeatureName::SystolicBloodPressure => self.systolic_bp,
            FeatureName::DiastolicBloodPressure => self.diastolic_bp,
            FeatureName::Age => self.age,
            FeatureName::WeightKg => self.weight_kg,
            FeatureName::HeightM => self.height_m,
            FeatureName::DerivedPulsePressure => self.pulse_pressure,
            FeatureName::DerivedBmi => self.bmi,
            FeatureName::DerivedMap => self.map,
            FeatureName::GenderMale => f64::from(self.gender_male),
        }
    }

    /// All slot values in trained order.
    pub fn values(&self) -> [f64; 14] {
        FeatureName::ALL.map(|slot| self.get(slot))
    }

    /// `(name, value)` pairs in trained order.
    pub fn named_values(&self) -> Vec<(&'static str, f64)> {
        FeatureName::ALL
            .into_iter()
            .map(|slot| (slot.as_str(), self.get(slot)))
            .collect()
    }
}

/// Serializes as a map keyed by classifier column name, in trained order.
impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FeatureName::ALL.len()))?;
        for slot in FeatureName::ALL {
            match slot {
                FeatureName::PatientId => map.serialize_entry(slot.as_str(), &self.patient_id)?,
                FeatureName::GenderMale => map.serialize_entry(slot.as_str(), &self.gender_male)?,
                _ => map.serialize_entry(slot.as_str(), &self.get(slot))?,
            }
        }
        map.end()
    }
}
