//! Numeric coercion for start and target values
//!
//! Values may arrive as numbers or as numeric strings (e.g. read from a
//! config file or a text field). Everything is coerced to a finite `f64`
//! before it reaches the engine.

use crate::error::ValueError;

/// Conversion into a finite animation value
pub trait IntoValue {
    fn into_value(self) -> Result<f64, ValueError>;
}

fn finite(value: f64) -> Result<f64, ValueError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValueError::NonFinite(value))
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Result<f64, ValueError> {
        finite(self)
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Result<f64, ValueError> {
        finite(self as f64)
    }
}

macro_rules! impl_into_value_int {
    ($($ty:ty),*) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Result<f64, ValueError> {
                    Ok(self as f64)
                }
            }
        )*
    };
}

impl_into_value_int!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl IntoValue for &str {
    fn into_value(self) -> Result<f64, ValueError> {
        let trimmed = self.trim();
        let parsed = trimmed
            .parse::<f64>()
            .map_err(|_| ValueError::NotNumeric(self.to_string()))?;
        // "NaN" and "inf" parse fine but are not values we can animate
        finite(parsed)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Result<f64, ValueError> {
        self.as_str().into_value()
    }
}

impl IntoValue for &String {
    fn into_value(self) -> Result<f64, ValueError> {
        self.as_str().into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(42i32.into_value(), Ok(42.0));
        assert_eq!(2.5f64.into_value(), Ok(2.5));
        assert_eq!(7u64.into_value(), Ok(7.0));
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        assert_eq!("12".into_value(), Ok(12.0));
        assert_eq!("  -3.5 ".into_value(), Ok(-3.5));
        assert_eq!(String::from("1e3").into_value(), Ok(1000.0));
    }

    #[test]
    fn test_non_numeric_string_is_rejected() {
        assert_eq!(
            "12abc".into_value(),
            Err(ValueError::NotNumeric("12abc".to_string()))
        );
        assert!(matches!("".into_value(), Err(ValueError::NotNumeric(_))));
    }

    #[test]
    fn test_non_finite_is_rejected() {
        assert!(matches!(f64::NAN.into_value(), Err(ValueError::NonFinite(_))));
        assert!(matches!("inf".into_value(), Err(ValueError::NonFinite(_))));
        assert!(matches!("NaN".into_value(), Err(ValueError::NonFinite(_))));
    }
}
