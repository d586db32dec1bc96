use serde::Deserialize;

/// A numeric field as submitted: a JSON number, or text from a form field or
/// a client that quotes its numbers. Parsing is deferred so required-field
/// checks run before type checks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Int(i64),
    Float(f64),
    Text(String),
}

impl NumericInput {
    pub fn is_blank(&self) -> bool {
        matches!(self, NumericInput::Text(s) if s.trim().is_empty())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumericInput::Int(n) => Some(*n as f64),
            NumericInput::Float(f) => Some(*f),
            NumericInput::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Whole numbers only; `4.0` is accepted, `4.5` is not.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NumericInput::Int(n) => Some(*n),
            NumericInput::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            NumericInput::Float(_) => None,
            NumericInput::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.as_i64().and_then(|n| i32::try_from(n).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> NumericInput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn numbers_and_numeric_text_are_accepted() {
        assert_eq!(parse("12"), NumericInput::Int(12));
        assert_eq!(parse("12.5").as_f64(), Some(12.5));
        assert_eq!(parse(r#"" 12 ""#).as_i64(), Some(12));
        assert_eq!(parse(r#""12.5""#).as_f64(), Some(12.5));
        assert_eq!(parse("4.0").as_i32(), Some(4));
    }

    #[test]
    fn non_numeric_or_fractional_values_do_not_parse() {
        assert_eq!(parse(r#""twelve""#).as_f64(), None);
        assert_eq!(parse("4.5").as_i64(), None);
        assert_eq!(parse("4294967296").as_i32(), None);
        assert!(parse(r#""  ""#).is_blank());
        assert!(!parse("0").is_blank());
    }
}
