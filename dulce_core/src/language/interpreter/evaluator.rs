use std::cmp::Ordering;
use log::trace;
use crate::language::value::Value;
use crate::language::error::Result;
use crate::runtime_error;

pub fn evaluate_binary_op(operator: &str, left: &Value, right: &Value) -> Result<Value> {
    trace!("Operación binaria: '{}' {} '{}'", left, operator, right);

    let result = match operator {
        "+" => left.add(right),
        "-" => Value::Number(left.to_number() - right.to_number()),
        "*" => Value::Number(left.to_number() * right.to_number()),
        "/" => Value::Number(left.to_number() / right.to_number()),
        "<" => Value::Bool(left.compare(right) == Some(Ordering::Less)),
        ">" => Value::Bool(left.compare(right) == Some(Ordering::Greater)),
        "==" => Value::Bool(left.loose_eq(right)),
        _ => return runtime_error!(format!("Operador desconocido: {}", operator)),
    };

    Ok(result)
}
