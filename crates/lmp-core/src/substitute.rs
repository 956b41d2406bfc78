//! Placeholder substitution.
//!
//! Expands the placeholders of a prompt body in a fixed order:
//!
//! 1. `$select` becomes `$clipboard`, `$input` or `$yanked` after asking
//!    the user which source to use.
//! 2. Every `${input:<label>}` is asked separately with `"<label>: "`.
//! 3. All bare `$input` share a single answer asked with `"Input: "`.
//! 4. `$clipboard` and `$yanked` are rewritten to `$register_+` and
//!    `$register_0`.
//! 5. `$register_<name>` is replaced by the register contents.
//! 6. `$filetype` is replaced by the buffer filetype.
//!
//! Text inserted by any step is never expanded again: its `$` characters
//! are swapped for [`SENTINEL`] on insertion and restored at the very end.
//! Each insertion is also fenced with [`BOUNDARY`] so that its first or
//! last character cannot decide whether an adjacent `$input` or
//! `$filetype` still ends at a word boundary.
//! An empty answer or an explicit cancel at any interactive step aborts the
//! whole run with [`SubstituteError::Cancelled`].

use crate::error::SubstituteError;
use crate::tools::source::{SelectSource, ValueSource};
use regex::{NoExpand, Regex};
use std::ops::Range;
use std::sync::LazyLock;
use tracing::debug;

/// Stand-in for `$` inside substituted values until the final step.
pub const SENTINEL: char = '\u{E000}';

/// Non-word marker around every inserted value; removed in the final step.
pub const BOUNDARY: char = '\u{E001}';

/// Prompt shown when asking for the `$select` source.
pub const SELECT_PROMPT: &str = "Source: ";

/// Prompt shown for bare `$input`.
pub const INPUT_PROMPT: &str = "Input: ";

static SELECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$select\b").expect("invalid select regex"));
static LABELED_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{input:([^}]*)\}").expect("invalid labeled input regex"));
static INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$input\b").expect("invalid input regex"));
static CLIPBOARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$clipboard\b").expect("invalid clipboard regex"));
static YANKED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$yanked\b").expect("invalid yanked regex"));
static REGISTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\$register_([A-Za-z0-9*+:"])"#).expect("invalid register regex")
});
static FILETYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$filetype\b").expect("invalid filetype regex"));

/// Settings for a single substitution run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstituteOptions {
    /// Answer `$select` with this source instead of asking.
    pub reuse_select: Option<SelectSource>,
}

/// A completed substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Fully expanded text.
    pub text: String,
    /// Source used for `$select`, if the body had one.
    pub select: Option<SelectSource>,
}

/// Expands every placeholder in `body`.
///
/// # Errors
///
/// Returns [`SubstituteError::Cancelled`] when the user aborts,
/// [`SubstituteError::EmptyRegister`] when a referenced register is blank,
/// and [`SubstituteError::Source`] when the value source fails.
pub async fn substitute<S>(body: &str, source: &S) -> Result<String, SubstituteError>
where
    S: ValueSource + ?Sized,
{
    substitute_with(body, source, &SubstituteOptions::default())
        .await
        .map(|s| s.text)
}

/// Expands every placeholder in `body` and reports the `$select` choice.
///
/// # Errors
///
/// See [`substitute`].
#[tracing::instrument(skip_all, fields(len = body.len()))]
pub async fn substitute_with<S>(
    body: &str,
    source: &S,
    options: &SubstituteOptions,
) -> Result<Substitution, SubstituteError>
where
    S: ValueSource + ?Sized,
{
    let mut text = body.to_string();

    let mut select = None;
    if SELECT.is_match(&text) {
        let choice = match options.reuse_select {
            Some(choice) => choice,
            None => source
                .choose(SELECT_PROMPT, &SelectSource::ALL)
                .await?
                .ok_or(SubstituteError::Cancelled)?,
        };
        debug!(source = %choice, "resolved $select");
        text = SELECT
            .replace_all(&text, NoExpand(choice.placeholder()))
            .into_owned();
        select = Some(choice);
    }

    text = expand_labeled_inputs(&text, source).await?;

    if INPUT.is_match(&text) {
        let answer = ask(source, INPUT_PROMPT).await?;
        text = INPUT
            .replace_all(&text, NoExpand(&protect(&answer)))
            .into_owned();
    }

    text = CLIPBOARD
        .replace_all(&text, NoExpand("$register_+"))
        .into_owned();
    text = YANKED.replace_all(&text, NoExpand("$register_0")).into_owned();

    text = expand_registers(&text, source).await?;

    if FILETYPE.is_match(&text) {
        let filetype = source.filetype().await?;
        debug!(%filetype, "resolved $filetype");
        text = FILETYPE
            .replace_all(&text, NoExpand(&protect(&filetype)))
            .into_owned();
    }

    Ok(Substitution {
        text: restore(&text),
        select,
    })
}

/// Asks for free text; an empty answer or a cancel aborts.
async fn ask<S>(source: &S, prompt: &str) -> Result<String, SubstituteError>
where
    S: ValueSource + ?Sized,
{
    match source.input(prompt).await? {
        Some(answer) if !answer.is_empty() => Ok(answer),
        _ => Err(SubstituteError::Cancelled),
    }
}

async fn expand_labeled_inputs<S>(text: &str, source: &S) -> Result<String, SubstituteError>
where
    S: ValueSource + ?Sized,
{
    // Collected up front so no regex iterator lives across an await point.
    let found: Vec<(Range<usize>, String)> = LABELED_INPUT
        .captures_iter(text)
        .filter_map(|caps| Some((caps.get(0)?.range(), caps.get(1)?.as_str().to_string())))
        .collect();
    if found.is_empty() {
        return Ok(text.to_string());
    }
    debug!(count = found.len(), "asking labeled inputs");

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (range, label) in found {
        let answer = ask(source, &format!("{label}: ")).await?;
        out.push_str(&text[last..range.start]);
        out.push_str(&protect(&answer));
        last = range.end;
    }
    out.push_str(&text[last..]);
    Ok(out)
}

async fn expand_registers<S>(text: &str, source: &S) -> Result<String, SubstituteError>
where
    S: ValueSource + ?Sized,
{
    let found: Vec<(Range<usize>, char)> = REGISTER
        .captures_iter(text)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().chars().next()?;
            Some((caps.get(0)?.range(), name))
        })
        .collect();
    if found.is_empty() {
        return Ok(text.to_string());
    }

    let mut resolved: Vec<(char, String)> = Vec::new();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (range, name) in found {
        let value = match resolved.iter().find(|(n, _)| *n == name) {
            Some((_, value)) => value.clone(),
            None => {
                let value = source.register(name).await?;
                if value.trim().is_empty() {
                    return Err(SubstituteError::EmptyRegister { register: name });
                }
                debug!(register = %name, len = value.len(), "resolved register");
                resolved.push((name, value.clone()));
                value
            }
        };
        out.push_str(&text[last..range.start]);
        out.push_str(&protect(&value));
        last = range.end;
    }
    out.push_str(&text[last..]);
    Ok(out)
}

fn protect(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2 * BOUNDARY.len_utf8());
    out.push(BOUNDARY);
    out.extend(value.chars().map(|ch| if ch == '$' { SENTINEL } else { ch }));
    out.push(BOUNDARY);
    out
}

fn restore(text: &str) -> String {
    text.chars()
        .filter(|&ch| ch != BOUNDARY)
        .map(|ch| if ch == SENTINEL { '$' } else { ch })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::source_mock::ScriptedSource;

    #[tokio::test]
    async fn test_bare_input() {
        let source = ScriptedSource::answering("World");
        let text = substitute("Hello $input", &source).await.unwrap();
        assert_eq!(text, "Hello World");
        assert_eq!(source.prompts(), vec![INPUT_PROMPT]);
    }

    #[tokio::test]
    async fn test_bare_input_is_asked_once() {
        let source = ScriptedSource::new();
        source.push_answer("x");
        let text = substitute("$input and $input again", &source).await.unwrap();
        assert_eq!(text, "x and x again");
        assert_eq!(source.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_bare_input_cancels() {
        let source = ScriptedSource::answering("");
        let err = substitute("Hello $input", &source).await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_labeled_inputs_are_asked_in_order() {
        let source = ScriptedSource::new();
        source.push_answer("Paris");
        source.push_answer("June");
        let text = substitute("Trip to ${input:City} in ${input:Month}.", &source)
            .await
            .unwrap();
        assert_eq!(text, "Trip to Paris in June.");
        assert_eq!(source.prompts(), vec!["City: ", "Month: "]);
    }

    #[tokio::test]
    async fn test_repeated_label_is_asked_per_occurrence() {
        let source = ScriptedSource::new();
        source.push_answer("a");
        source.push_answer("b");
        let text = substitute("${input:X} ${input:X}", &source).await.unwrap();
        assert_eq!(text, "a b");
    }

    #[tokio::test]
    async fn test_empty_labeled_input_cancels_everything() {
        let source = ScriptedSource::new();
        source.push_answer("");
        source.push_answer("never used");
        let err = substitute("${input:City} ${input:Country} $input", &source)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        // nothing is asked after the cancelling answer
        assert_eq!(source.prompts(), vec!["City: "]);
    }

    #[tokio::test]
    async fn test_labeled_inputs_run_before_bare_input() {
        let source = ScriptedSource::new();
        source.push_answer("labeled");
        source.push_answer("bare");
        let text = substitute("$input / ${input:Name}", &source).await.unwrap();
        assert_eq!(text, "bare / labeled");
        assert_eq!(source.prompts(), vec!["Name: ", INPUT_PROMPT]);
    }

    #[tokio::test]
    async fn test_dollar_in_answer_is_not_expanded() {
        let source = ScriptedSource::answering("$9");
        let text = substitute("price: $5 for $input", &source).await.unwrap();
        assert_eq!(text, "price: $5 for $9");
    }

    #[tokio::test]
    async fn test_placeholder_in_labeled_answer_is_literal() {
        let source = ScriptedSource::new();
        source.push_answer("$input $register_+ $filetype");
        let text = substitute("${input:Q}", &source).await.unwrap();
        assert_eq!(text, "$input $register_+ $filetype");
        assert_eq!(source.prompts(), vec!["Q: "]);
    }

    #[tokio::test]
    async fn test_select_input() {
        let source = ScriptedSource::answering("typed");
        source.set_choice(Some(SelectSource::Input));
        let result = substitute_with("Use $select", &source, &SubstituteOptions::default())
            .await
            .unwrap();
        assert_eq!(result.text, "Use typed");
        assert_eq!(result.select, Some(SelectSource::Input));
        assert_eq!(source.prompts(), vec![SELECT_PROMPT, INPUT_PROMPT]);
    }

    #[tokio::test]
    async fn test_select_clipboard_replaces_all_occurrences() {
        let source = ScriptedSource::new();
        source.set_choice(Some(SelectSource::Clipboard));
        source.set_register('+', "clip");
        let text = substitute("$select|$select", &source).await.unwrap();
        assert_eq!(text, "clip|clip");
        assert_eq!(source.choose_calls(), 1);
    }

    #[tokio::test]
    async fn test_select_cancel() {
        let source = ScriptedSource::answering("unused");
        source.set_choice(None);
        let err = substitute("$select", &source).await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_reused_select_skips_choice() {
        let source = ScriptedSource::new();
        source.set_register('0', "yanked text");
        let options = SubstituteOptions {
            reuse_select: Some(SelectSource::Yanked),
        };
        let result = substitute_with("$select", &source, &options).await.unwrap();
        assert_eq!(result.text, "yanked text");
        assert_eq!(result.select, Some(SelectSource::Yanked));
        assert_eq!(source.choose_calls(), 0);
    }

    #[tokio::test]
    async fn test_no_select_reports_none() {
        let source = ScriptedSource::new();
        let result = substitute_with("plain", &source, &SubstituteOptions::default())
            .await
            .unwrap();
        assert_eq!(result.select, None);
        assert!(source.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_aliases_and_registers() {
        let source = ScriptedSource::new();
        source.set_register('+', "from clipboard");
        source.set_register('0', "from yank");
        source.set_register('"', "unnamed");
        source.set_register('a', "A");
        let text = substitute(
            "$clipboard | $yanked | $register_\" | $register_a | $register_+",
            &source,
        )
        .await
        .unwrap();
        assert_eq!(
            text,
            "from clipboard | from yank | unnamed | A | from clipboard"
        );
    }

    #[tokio::test]
    async fn test_empty_clipboard_is_an_error() {
        let source = ScriptedSource::new();
        source.set_register('+', "");
        let err = substitute("$register_+", &source).await.unwrap_err();
        assert!(matches!(err, SubstituteError::EmptyRegister { register: '+' }));
        assert!(err.to_string().contains("Clipboard"));
    }

    #[tokio::test]
    async fn test_whitespace_register_is_an_error() {
        let source = ScriptedSource::new();
        source.set_register('0', " \n\t");
        let err = substitute("Explain $yanked", &source).await.unwrap_err();
        assert!(matches!(err, SubstituteError::EmptyRegister { register: '0' }));
        assert!(err.to_string().contains("Yanked text"));
    }

    #[tokio::test]
    async fn test_register_contents_are_not_expanded() {
        let source = ScriptedSource::new();
        source.set_register('a', "cost $filetype $register_b");
        source.set_filetype("rust");
        let text = substitute("$register_a in $filetype", &source).await.unwrap();
        assert_eq!(text, "cost $filetype $register_b in rust");
    }

    #[tokio::test]
    async fn test_filetype() {
        let source = ScriptedSource::new();
        source.set_filetype("python");
        let text = substitute("```$filetype\n```", &source).await.unwrap();
        assert_eq!(text, "```python\n```");
    }

    #[tokio::test]
    async fn test_similar_names_are_not_placeholders() {
        let source = ScriptedSource::new();
        let body = "$inputs $selection $filetypes $clipboards $register_ $5";
        let text = substitute(body, &source).await.unwrap();
        assert_eq!(text, body);
        assert!(source.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_inserted_value_does_not_hide_following_filetype() {
        let source = ScriptedSource::new();
        source.set_register('a', "x");
        source.set_filetype("rust");
        let text = substitute("$filetype$register_a", &source).await.unwrap();
        assert_eq!(text, "rustx");
    }

    #[tokio::test]
    async fn test_labeled_answer_does_not_hide_bare_input() {
        let source = ScriptedSource::new();
        source.push_answer("abc");
        source.push_answer("bare");
        let text = substitute("$input${input:X}", &source).await.unwrap();
        assert_eq!(text, "bareabc");
        assert_eq!(source.prompts(), vec!["X: ", INPUT_PROMPT]);
    }

    #[tokio::test]
    async fn test_register_value_next_to_select_alias() {
        let source = ScriptedSource::new();
        source.set_choice(Some(SelectSource::Yanked));
        source.set_register('0', "y");
        source.set_register('b', "b");
        let text = substitute("$select$register_b", &source).await.unwrap();
        assert_eq!(text, "yb");
    }

    #[tokio::test]
    async fn test_cancel_after_select_leaves_no_output() {
        let source = ScriptedSource::new();
        source.set_choice(Some(SelectSource::Input));
        source.push_cancel();
        let err = substitute("$select", &source).await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
