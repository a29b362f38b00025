use crate::component::{Arg, ParamType};
use crate::error::DispatchError;

/// Collapse a multi-valued parameter into one display string.
///
/// A single value is used as-is; several are joined with `", "` in their
/// received order.
#[must_use]
pub fn collapse_values(values: &[String]) -> String {
    match values {
        [single] => single.clone(),
        many => many.join(", "),
    }
}

/// Convert raw parameter text to the declared parameter type.
///
/// | Declared | Result |
/// |---|---|
/// | `Text` | the text unchanged |
/// | `Int32` | base-10 `i32` |
/// | `Double` | `f64`, surrounding whitespace ignored; `Infinity` and `NaN` are the only accepted words |
/// | anything else | the raw text, unconverted |
///
/// # Errors
///
/// [`DispatchError::Conversion`] when numeric parsing fails.
pub fn convert<'a>(ty: ParamType, raw: String, param: &str) -> Result<Arg<'a>, DispatchError> {
    match ty {
        ParamType::Int32 => match raw.parse::<i32>() {
            Ok(value) => Ok(Arg::Int32(value)),
            Err(e) => Err(conversion_error(param, raw, ty, e.into())),
        },
        ParamType::Double => match parse_double(&raw) {
            Ok(value) => Ok(Arg::Double(value)),
            Err(e) => Err(conversion_error(param, raw, ty, e)),
        },
        ParamType::Text
        | ParamType::Request
        | ParamType::Response
        | ParamType::Other(_) => Ok(Arg::Text(raw)),
    }
}

/// `f64::from_str` also takes `inf`, `infinity` and `nan` in any case. Only the
/// exact spellings `Infinity` and `NaN` (optionally signed) are numbers here.
fn parse_double(raw: &str) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
    let text = raw.trim();
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if unsigned.starts_with(|c: char| c.is_ascii_alphabetic())
        && unsigned != "Infinity"
        && unsigned != "NaN"
    {
        return Err(format!("`{unsigned}` is not a number").into());
    }
    Ok(text.parse::<f64>()?)
}

fn conversion_error(
    param: &str,
    value: String,
    ty: ParamType,
    source: Box<dyn std::error::Error + Send + Sync>,
) -> DispatchError {
    DispatchError::Conversion {
        param: param.to_string(),
        value,
        target: ty.to_string(),
        source,
    }
}
