//! Entry points used by the item-selection pipeline.

use std::collections::HashMap;

use log::debug;

use super::error::FilterResult;
use super::evaluator::FilterEvaluator;
use super::template;

/// Evaluates a filter condition against `bindings`.
///
/// An empty condition means no filter is configured and always passes.
/// A placeholder naming a variable absent from `bindings` is an error.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use poddl_filter::filter::evaluate_condition;
///
/// let bindings = HashMap::from([("ItemTitle".to_string(), "Episode 12: Rust".to_string())]);
/// assert!(evaluate_condition("'Rust' in suffix {{ItemTitle}}", &bindings).unwrap());
/// assert!(evaluate_condition("", &bindings).unwrap());
/// ```
pub fn evaluate_condition(
    filter_text: &str,
    bindings: &HashMap<String, String>,
) -> FilterResult<bool> {
    if filter_text.is_empty() {
        return Ok(true);
    }

    let result = FilterEvaluator::new(filter_text, bindings).evaluate();
    debug!("condition {filter_text:?} evaluated to {result:?}");
    result
}

/// Renders a path template, replacing `{{Name}}` placeholders.
///
/// Never fails: unbound placeholders render as the empty string.
pub fn render_template(template_text: &str, bindings: &HashMap<String, String>) -> String {
    template::substitute(template_text, bindings)
}
