//! Applying expressions to character state.
//!
//! Every write to a characteristic during execution goes through
//! [`apply_operation`], which clamps numeric results into the class bounds
//! and coerces boolean ones.

use crate::character::{Characteristic, CharacterRegistry};
use crate::error::{StoryError, StoryResult};
use crate::graph::{ActionGraph, ActionId, Expression, Operation};
use crate::schema::SchemaRegistry;
use crate::value::Value;

/// Apply one operation to a characteristic. Returns the stored value.
pub fn apply_operation(
    target: &mut Characteristic,
    operation: Operation,
    operand: Value,
) -> StoryResult<Value> {
    let current = target.value.as_number();
    let rhs = operand.as_number();

    let raw = match operation {
        Operation::Assign => operand,
        Operation::Toggle if target.is_boolean => Value::Bool(!target.value.as_bool()),
        Operation::Toggle => {
            if current == target.min {
                Value::Number(target.max)
            } else {
                Value::Number(target.min)
            }
        }
        Operation::Add => Value::Number(current.saturating_add(rhs)),
        Operation::Subtract => Value::Number(current.saturating_sub(rhs)),
        Operation::Multiply => Value::Number(current.saturating_mul(rhs)),
        Operation::Divide => {
            if rhs == 0 {
                return Err(StoryError::DivisionByZero {
                    class: target.class.clone(),
                    subtype: target.subtype.clone(),
                });
            }
            Value::Number(current.saturating_div(rhs))
        }
    };

    Ok(target.set(raw))
}

/// Apply an expression to its target character, materializing the characteristic if needed.
pub fn apply_expression(
    expression: &Expression,
    characters: &mut CharacterRegistry,
    schema: &SchemaRegistry,
) -> StoryResult<Value> {
    let target = characters
        .get_mut(&expression.character)?
        .characteristics
        .get_or_create(&expression.class, &expression.subtype, schema)?;
    let before = target.value;
    let after = apply_operation(target, expression.operation, expression.value)?;
    tracing::debug!(%expression, %before, %after, "applied expression");
    Ok(after)
}

/// Apply, in order, every expression of every action on `path`.
///
/// All uids are checked before anything is applied. A failure after that
/// point leaves the expressions already applied in place.
pub fn execute_path(
    owner: &str,
    graph: &ActionGraph,
    path: &[ActionId],
    characters: &mut CharacterRegistry,
    schema: &SchemaRegistry,
) -> StoryResult<()> {
    let actions = path
        .iter()
        .map(|&uid| {
            graph.get(uid).ok_or_else(|| StoryError::UnknownUid {
                character: owner.to_string(),
                uid,
            })
        })
        .collect::<StoryResult<Vec<_>>>()?;

    for action in actions {
        for expression in &action.expressions {
            apply_expression(expression, characters, schema)?;
        }
    }
    Ok(())
}
