//! Cell arithmetic with null propagation

use feature_frame::Value;

/// Product of two cells; integers stay integral unless they overflow
pub(crate) fn multiply(a: &Value, b: &Value) -> Value {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        if let Some(product) = x.checked_mul(y) {
            return Value::Int(product);
        }
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => Value::float(x * y),
        _ => Value::Null,
    }
}

/// `numerator / (denominator + 1)`, defined for every non-negative denominator
pub(crate) fn divide_offset(numerator: &Value, denominator: &Value) -> Value {
    match (numerator.as_f64(), denominator.as_f64()) {
        (Some(n), Some(d)) if d + 1.0 != 0.0 => Value::float(n / (d + 1.0)),
        _ => Value::Null,
    }
}

/// `numerator / denominator`, null on a zero denominator
pub(crate) fn divide(numerator: &Value, denominator: &Value) -> Value {
    match (numerator.as_f64(), denominator.as_f64()) {
        (Some(n), Some(d)) if d != 0.0 => Value::float(n / d),
        _ => Value::Null,
    }
}
