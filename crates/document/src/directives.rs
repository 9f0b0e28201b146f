//! Conditional inclusion (`@skip` / `@include`)

use crate::ast::{Directive, InputValue, Selection};
use graphcache_core::{Error, Result, Value, Variables};

/// Whether a selection is active for this execution
///
/// A selection is included unless `@skip(if: true)` applies or
/// `@include(if: false)` applies. Other directives are ignored. The `if`
/// argument must be a boolean literal or a variable bound to a boolean.
pub fn should_include(selection: &Selection, variables: &Variables) -> Result<bool> {
    directives_allow(selection.directives(), variables)
}

/// [`should_include`] over a bare directive list
pub fn directives_allow(directives: &[Directive], variables: &Variables) -> Result<bool> {
    let mut included = true;
    for directive in directives {
        let allowed = match directive.name.as_str() {
            "skip" => !condition(directive, variables)?,
            "include" => condition(directive, variables)?,
            _ => continue,
        };
        included &= allowed;
    }
    Ok(included)
}

fn condition(directive: &Directive, variables: &Variables) -> Result<bool> {
    let invalid = || Error::InvalidDirective {
        directive: directive.name.clone(),
    };
    match directive.argument("if").ok_or_else(invalid)? {
        InputValue::Bool(b) => Ok(*b),
        InputValue::Variable(name) => match variables.get(name) {
            Some(Value::Bool(b)) => Ok(*b),
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}
