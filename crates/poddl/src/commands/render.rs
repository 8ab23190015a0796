//! Render command implementation.
//!
//! Substitutes `{{Name}}` placeholders in a path template.

use poddl_filter::render_template;

use super::{parse_vars, CommandContext, Result};

/// Executes the render command. Unbound placeholders render as empty text.
pub fn execute(ctx: &CommandContext, template: &str, vars: &[String]) -> Result<()> {
    let bindings = parse_vars(vars)?;
    let rendered = render_template(template, &bindings);

    if ctx.json_output {
        let output = serde_json::json!({
            "template": template,
            "rendered": rendered,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{rendered}");
    }

    Ok(())
}
