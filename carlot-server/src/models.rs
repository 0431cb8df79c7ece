//! Car records and request/response bodies

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A row of the `car` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Car {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i64,
    /// 0 = visible, 1 = soft-deleted
    pub deleted_flag: i8,
}

impl Car {
    pub fn is_deleted(&self) -> bool {
        self.deleted_flag != 0
    }
}

/// POST /car body.
///
/// Fields are passed through to the INSERT as given; an absent field
/// binds NULL and is rejected by the strict session mode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCar {
    pub make: Option<String>,
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub deleted_flag: Option<i8>,
}

/// PUT /car body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCar {
    #[serde(default, deserialize_with = "lenient_int")]
    pub id: Option<i64>,
    pub make: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseInt {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// Integer column input the way MySQL coerces it: numbers (fractions
/// rounded), numeric strings, and booleans as 0/1. `null` stays NULL.
fn lenient_int<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let Some(raw) = Option::<LooseInt>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let value = match raw {
        LooseInt::Int(v) => v,
        LooseInt::Float(f) if f.is_finite() => f.round() as i64,
        LooseInt::Float(f) => return Err(D::Error::custom(format!("invalid number {}", f))),
        LooseInt::Bool(b) => i64::from(b),
        LooseInt::Text(text) => {
            let trimmed = text.trim();
            match trimmed.parse::<i64>() {
                Ok(v) => v,
                Err(_) => trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.round() as i64)
                    .ok_or_else(|| D::Error::custom(format!("expected a number, got {:?}", text)))?,
            }
        }
    };

    T::try_from(value)
        .map(Some)
        .map_err(|_| D::Error::custom(format!("{} is out of range", value)))
}

/// `{ "cars": [...] }` wrapper used by GET and PUT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarsEnvelope {
    pub cars: Vec<Car>,
}

impl From<Vec<Car>> for CarsEnvelope {
    fn from(cars: Vec<Car>) -> Self {
        Self { cars }
    }
}
