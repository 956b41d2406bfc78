//! Renders prompts back into the template file format.

use crate::escape::escape;
use crate::prompt::Prompt;

/// Renders one record, fences included.
///
/// The `extract` pattern is escaped so that it survives the parser's
/// unescaping unchanged.
///
/// # Examples
///
/// ```
/// use lmp_pm::{Prompt, write_template};
///
/// let text = write_template(&Prompt::new("Greet", "Hello $input").with_model("llama3"));
/// assert_eq!(text, "---\nname: Greet\nmodel: llama3\n---\nHello $input\n");
/// ```
#[must_use]
pub fn write_template(prompt: &Prompt) -> String {
    let mut out = String::from("---\n");
    if !prompt.name.is_empty() {
        out.push_str(&header_line("name", &prompt.name));
    }
    if let Some(model) = &prompt.model {
        out.push_str(&header_line("model", model));
    }
    if let Some(extract) = &prompt.extract {
        out.push_str(&header_line("extract", &escape(extract)));
    }
    if let Some(paste) = prompt.paste {
        out.push_str(&header_line("paste", paste.as_str()));
    }
    for (key, value) in &prompt.model_options {
        out.push_str(&header_line(key, value));
    }
    out.push_str("---\n");
    if !prompt.prompt.is_empty() {
        out.push_str(&prompt.prompt);
        out.push('\n');
    }
    out
}

fn header_line(key: &str, value: &str) -> String {
    format!("{key}: {value}\n")
}

/// Renders several records into one template file.
#[must_use]
pub fn write_templates<'a>(prompts: impl IntoIterator<Item = &'a Prompt>) -> String {
    prompts.into_iter().map(write_template).collect()
}
