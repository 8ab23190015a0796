//! Check command implementation.
//!
//! Evaluates a filter condition against `--var` bindings.

use poddl_filter::evaluate_condition;

use super::{parse_vars, CommandContext, Result};

/// Executes the check command.
///
/// Prints `true` or `false`. A malformed condition is returned as an error.
pub fn execute(ctx: &CommandContext, filter: &str, vars: &[String]) -> Result<()> {
    let bindings = parse_vars(vars)?;
    let matched = evaluate_condition(filter, &bindings)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "filter": filter,
            "result": matched,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{matched}");
    }

    Ok(())
}
