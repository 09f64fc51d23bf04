//! Typed parameter values.
//!
//! Raw URL segments are converted into [`ParamValue`]s according to the
//! parameter's [`ParamKind`]. Typed access goes through [`FromParamValue`] and
//! [`IntoParamValue`], implemented for the common primitives.

use std::fmt;

use crate::tree::ParamKind;

/// Current value of a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
	/// Value of a `number` parameter. May be `NaN` right after parsing.
	Number(f64),
	/// Value of a `string` parameter.
	Text(String),
}

impl ParamValue {
	/// Kind of this value.
	pub fn kind(&self) -> ParamKind {
		match self {
			Self::Number(_) => ParamKind::Number,
			Self::Text(_) => ParamKind::String,
		}
	}

	/// Whether this is a number that failed to parse.
	pub fn is_nan(&self) -> bool {
		matches!(self, Self::Number(n) if n.is_nan())
	}

	/// Raw string form, as it appears in the URL before percent-encoding.
	///
	/// Numbers use the shortest representation that parses back to the same
	/// value, so `42.0` becomes `"42"`.
	pub fn to_raw(&self) -> String {
		match self {
			Self::Number(n) => n.to_string(),
			Self::Text(s) => s.clone(),
		}
	}
}

impl fmt::Display for ParamValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_raw())
	}
}

/// Converts a raw URL value into a typed value.
///
/// `None` stays `None`. Numbers that fail to parse become `NaN`.
pub fn parse_raw(kind: ParamKind, raw: Option<&str>) -> Option<ParamValue> {
	raw.map(|raw| match kind {
		ParamKind::Number => ParamValue::Number(raw.trim().parse::<f64>().unwrap_or(f64::NAN)),
		ParamKind::String => ParamValue::Text(raw.to_string()),
	})
}

/// Types readable from a [`ParamValue`].
pub trait FromParamValue: Sized {
	/// Returns `None` when the value does not fit `Self`.
	fn from_param_value(value: &ParamValue) -> Option<Self>;
}

/// Types writable as a [`ParamValue`].
pub trait IntoParamValue {
	/// Converts `self`.
	fn into_param_value(self) -> ParamValue;
}

impl FromParamValue for f64 {
	fn from_param_value(value: &ParamValue) -> Option<Self> {
		match value {
			ParamValue::Number(n) => Some(*n),
			ParamValue::Text(_) => None,
		}
	}
}

impl FromParamValue for String {
	fn from_param_value(value: &ParamValue) -> Option<Self> {
		match value {
			ParamValue::Text(s) => Some(s.clone()),
			ParamValue::Number(_) => None,
		}
	}
}

impl FromParamValue for ParamValue {
	fn from_param_value(value: &ParamValue) -> Option<Self> {
		Some(value.clone())
	}
}

// Integers only read numbers with no fractional part that fit the type.
// `MAX as f64` rounds up to a power of two for 64-bit types, so the upper
// bound is exclusive.
macro_rules! impl_integer_param {
	($($ty:ty),* $(,)?) => {
		$(
			impl FromParamValue for $ty {
				fn from_param_value(value: &ParamValue) -> Option<Self> {
					match value {
						ParamValue::Number(n)
							if n.is_finite()
								&& n.fract() == 0.0
								&& *n >= <$ty>::MIN as f64
								&& *n < <$ty>::MAX as f64 + 1.0 =>
						{
							Some(*n as $ty)
						}
						_ => None,
					}
				}
			}

			impl IntoParamValue for $ty {
				fn into_param_value(self) -> ParamValue {
					ParamValue::Number(self as f64)
				}
			}
		)*
	};
}

impl_integer_param!(i32, u32, i64, u64);

impl IntoParamValue for f64 {
	fn into_param_value(self) -> ParamValue {
		ParamValue::Number(self)
	}
}

impl IntoParamValue for String {
	fn into_param_value(self) -> ParamValue {
		ParamValue::Text(self)
	}
}

impl IntoParamValue for &str {
	fn into_param_value(self) -> ParamValue {
		ParamValue::Text(self.to_string())
	}
}

impl IntoParamValue for ParamValue {
	fn into_param_value(self) -> ParamValue {
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("42", 42.0)]
	#[case("-1.5", -1.5)]
	#[case(" 7 ", 7.0)]
	#[case("1e3", 1000.0)]
	fn test_parse_number(#[case] raw: &str, #[case] expected: f64) {
		assert_eq!(
			parse_raw(ParamKind::Number, Some(raw)),
			Some(ParamValue::Number(expected))
		);
	}

	#[rstest]
	#[case("abc")]
	#[case("")]
	#[case("12px")]
	fn test_parse_invalid_number_is_nan(#[case] raw: &str) {
		let value = parse_raw(ParamKind::Number, Some(raw)).unwrap();
		assert!(value.is_nan());
	}

	#[rstest]
	fn test_parse_string_untouched() {
		assert_eq!(
			parse_raw(ParamKind::String, Some("42")),
			Some(ParamValue::Text("42".to_string()))
		);
		assert_eq!(parse_raw(ParamKind::String, None), None);
	}

	#[rstest]
	#[case(ParamValue::Number(42.0), "42")]
	#[case(ParamValue::Number(0.25), "0.25")]
	#[case(ParamValue::Text("a b".to_string()), "a b")]
	fn test_to_raw(#[case] value: ParamValue, #[case] expected: &str) {
		assert_eq!(value.to_raw(), expected);
	}

	#[rstest]
	fn test_integer_access() {
		assert_eq!(i64::from_param_value(&ParamValue::Number(42.0)), Some(42));
		assert_eq!(i64::from_param_value(&ParamValue::Number(4.5)), None);
		assert_eq!(u32::from_param_value(&ParamValue::Number(-1.0)), None);
		assert_eq!(i32::from_param_value(&ParamValue::Text("1".into())), None);
	}

	#[rstest]
	#[case(ParamValue::Number(9_223_372_036_854_775_808.0))]
	#[case(ParamValue::Number(f64::MAX))]
	fn test_i64_rejects_out_of_range(#[case] value: ParamValue) {
		assert_eq!(i64::from_param_value(&value), None);
	}

	#[rstest]
	fn test_64_bit_bounds() {
		assert_eq!(
			i64::from_param_value(&ParamValue::Number(-9_223_372_036_854_775_808.0)),
			Some(i64::MIN)
		);
		assert_eq!(
			i64::from_param_value(&ParamValue::Number(9_223_372_036_854_774_784.0)),
			Some(9_223_372_036_854_774_784)
		);
		assert_eq!(u64::from_param_value(&ParamValue::Number(18_446_744_073_709_551_616.0)), None);
		assert_eq!(i32::from_param_value(&ParamValue::Number(2_147_483_647.0)), Some(i32::MAX));
		assert_eq!(i32::from_param_value(&ParamValue::Number(2_147_483_648.0)), None);
		assert_eq!(u32::from_param_value(&ParamValue::Number(4_294_967_295.0)), Some(u32::MAX));
	}

	#[rstest]
	fn test_into_param_value() {
		assert_eq!(7u32.into_param_value(), ParamValue::Number(7.0));
		assert_eq!("x".into_param_value(), ParamValue::Text("x".to_string()));
		assert_eq!(2.5f64.into_param_value().kind(), ParamKind::Number);
	}
}
