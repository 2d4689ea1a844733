use std::cmp::Ordering;

use crate::frame::{AggregateOp, AggregateResult, FrameError, Value};

/// Reduces an integer slice. Returns `None` for an empty slice.
///
/// Sums accumulate in `i128`; a total that does not fit `i64` is returned as `Float`.
pub fn aggregate_i64(values: &[i64], op: AggregateOp) -> Option<AggregateResult> {
    if values.is_empty() {
        return None;
    }

    let result = match op {
        AggregateOp::Sum => {
            let total: i128 = values.iter().map(|&v| v as i128).sum();
            match i64::try_from(total) {
                Ok(v) => AggregateResult::Int(v),
                Err(_) => AggregateResult::Float(total as f64),
            }
        }
        AggregateOp::Mean => {
            let total: i128 = values.iter().map(|&v| v as i128).sum();
            AggregateResult::Float(total as f64 / values.len() as f64)
        }
        AggregateOp::Min => AggregateResult::Int(values.iter().copied().min()?),
        AggregateOp::Max => AggregateResult::Int(values.iter().copied().max()?),
        AggregateOp::Count => AggregateResult::Int(values.len() as i64),
    };
    Some(result)
}

/// Reduces a float slice. Returns `None` for an empty slice.
pub fn aggregate_f64(values: &[f64], op: AggregateOp) -> Option<AggregateResult> {
    if values.is_empty() {
        return None;
    }

    let result = match op {
        AggregateOp::Sum => AggregateResult::Float(values.iter().sum()),
        AggregateOp::Mean => {
            let sum: f64 = values.iter().sum();
            AggregateResult::Float(sum / values.len() as f64)
        }
        AggregateOp::Min => AggregateResult::Float(values.iter().fold(f64::INFINITY, |a, &b| a.min(b))),
        AggregateOp::Max => {
            AggregateResult::Float(values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)))
        }
        AggregateOp::Count => AggregateResult::Int(values.len() as i64),
    };
    Some(result)
}

/// Reduces a sequence of cells belonging to `column`.
///
/// Sum and mean need every value numeric; all-int input stays integral,
/// otherwise the result is a float. Min and max need every value in one
/// comparable family. Count counts non-null values.
pub fn reduce_values(values: &[Value], op: AggregateOp, column: &str) -> Result<Value, FrameError> {
    if values.is_empty() {
        return Err(FrameError::EmptyGroup(column.to_string()));
    }

    let non_numeric = || FrameError::NonNumeric {
        column: column.to_string(),
        op,
    };

    match op {
        AggregateOp::Count => Ok(Value::Int(values.iter().filter(|v| !v.is_null()).count() as i64)),

        AggregateOp::Sum | AggregateOp::Mean => {
            let ints: Option<Vec<i64>> = values
                .iter()
                .map(|v| match v {
                    Value::Int(i) => Some(*i),
                    _ => None,
                })
                .collect();

            let result = match ints {
                Some(ints) => aggregate_i64(&ints, op),
                None => {
                    let floats: Vec<f64> = values
                        .iter()
                        .map(Value::as_f64)
                        .collect::<Option<_>>()
                        .ok_or_else(non_numeric)?;
                    aggregate_f64(&floats, op)
                }
            };
            result.map(Value::from).ok_or_else(|| FrameError::EmptyGroup(column.to_string()))
        }

        AggregateOp::Min | AggregateOp::Max => {
            let wanted = if op == AggregateOp::Min {
                Ordering::Less
            } else {
                Ordering::Greater
            };

            let mut best = &values[0];
            for v in &values[1..] {
                match v.compare(best) {
                    Some(ord) if ord == wanted => best = v,
                    Some(_) => {}
                    None => return Err(non_numeric()),
                }
            }
            // a single value still has to be comparable with itself
            best.compare(best).ok_or_else(non_numeric)?;
            Ok(best.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_i64() {
        let v = [10, 20, 30];
        assert_eq!(aggregate_i64(&v, AggregateOp::Sum), Some(AggregateResult::Int(60)));
        assert_eq!(aggregate_i64(&v, AggregateOp::Mean), Some(AggregateResult::Float(20.0)));
        assert_eq!(aggregate_i64(&v, AggregateOp::Min), Some(AggregateResult::Int(10)));
        assert_eq!(aggregate_i64(&v, AggregateOp::Max), Some(AggregateResult::Int(30)));
        assert_eq!(aggregate_i64(&[], AggregateOp::Sum), None);
    }

    #[test]
    fn test_aggregate_i64_overflow_promotes() {
        let v = [i64::MAX, 1];
        assert_eq!(
            aggregate_i64(&v, AggregateOp::Sum),
            Some(AggregateResult::Float(i64::MAX as f64 + 1.0))
        );
    }

    #[test]
    fn test_aggregate_f64() {
        let v = [1.5, -2.0, 4.5];
        assert_eq!(aggregate_f64(&v, AggregateOp::Sum), Some(AggregateResult::Float(4.0)));
        assert_eq!(aggregate_f64(&v, AggregateOp::Min), Some(AggregateResult::Float(-2.0)));
        assert_eq!(aggregate_f64(&v, AggregateOp::Max), Some(AggregateResult::Float(4.5)));
        assert_eq!(aggregate_f64(&v, AggregateOp::Count), Some(AggregateResult::Int(3)));
    }

    #[test]
    fn test_reduce_values_mixed_numeric_promotes() {
        let v = [Value::Int(1), Value::Float(0.5)];
        assert_eq!(reduce_values(&v, AggregateOp::Sum, "x").unwrap(), Value::Float(1.5));
    }

    #[test]
    fn test_reduce_values_strings() {
        let v = [Value::from("pear"), Value::from("apple")];
        assert_eq!(reduce_values(&v, AggregateOp::Min, "x").unwrap(), Value::from("apple"));
        assert!(matches!(
            reduce_values(&v, AggregateOp::Sum, "x"),
            Err(FrameError::NonNumeric { .. })
        ));
    }

    #[test]
    fn test_reduce_values_rejects_nulls_and_empty() {
        let v = [Value::Int(1), Value::Null];
        assert!(matches!(
            reduce_values(&v, AggregateOp::Max, "x"),
            Err(FrameError::NonNumeric { .. })
        ));
        assert_eq!(reduce_values(&v, AggregateOp::Count, "x").unwrap(), Value::Int(1));
        assert!(matches!(
            reduce_values(&[], AggregateOp::Min, "x"),
            Err(FrameError::EmptyGroup(_))
        ));
    }
}
