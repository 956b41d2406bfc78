//! Prompt execution session.
//!
//! A [`Session`] owns the current prompt snapshot plus the small amount of
//! state needed to repeat the last run: the dot prompt and the source chosen
//! for `$select`. It turns a prompt into a [`PreparedRequest`], the text and
//! model settings a model client would send.

use crate::error::{LmpError, Result};
use crate::substitute::{SubstituteOptions, substitute_with};
use crate::tools::source::{SelectSource, ValueSource};
use lmp_pm::{DOT_PROMPT_NAME, ModelOptions, Prompt, PromptCollection};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// A fully substituted prompt, ready to hand to a model client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedRequest {
    /// Name of the prompt that produced the request.
    pub prompt_name: String,
    /// Final prompt text.
    pub text: String,
    /// Model to use; falls back to the session default.
    pub model: Option<String>,
    /// Extra model options from the template header.
    pub model_options: ModelOptions,
    /// Response extraction pattern, if any.
    pub extract: Option<String>,
}

/// Runtime state for executing prompts.
///
/// Methods that substitute take `&mut self`, so a session has at most one
/// substitution in flight. Independent sessions share nothing but the
/// read-only snapshot.
///
/// # Examples
///
/// ```
/// use lmp_core::Session;
/// use lmp_core::tools::source_mock::ScriptedSource;
/// use lmp_pm::{Prompt, PromptCollection};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let prompts = PromptCollection::from(vec![Prompt::new("Greet", "Hello $input")]);
/// let mut session = Session::new(prompts).with_default_model(Some("llama3".into()));
///
/// let request = session.prepare("Greet", &ScriptedSource::answering("World")).await.unwrap();
/// assert_eq!(request.text, "Hello World");
/// assert_eq!(request.model.as_deref(), Some("llama3"));
/// assert!(session.dot_prompt().is_some());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct Session {
    /// Published prompt snapshot.
    prompts: Arc<PromptCollection>,

    /// Last executed prompt, renamed to `.`.
    dot: Option<Prompt>,

    /// Source picked for `$select` in the last run that had one.
    last_select: Option<SelectSource>,

    /// Model used when a prompt names none.
    default_model: Option<String>,
}

impl Session {
    /// Creates a session over `prompts`.
    pub fn new(prompts: PromptCollection) -> Self {
        Self {
            prompts: Arc::new(prompts),
            ..Default::default()
        }
    }

    /// Sets the fallback model.
    #[must_use]
    pub fn with_default_model(mut self, model: Option<String>) -> Self {
        self.default_model = model;
        self
    }

    /// The current snapshot; clone the `Arc` to share it.
    pub fn prompts(&self) -> &Arc<PromptCollection> {
        &self.prompts
    }

    /// Replaces the snapshot wholesale, e.g. after reloading files.
    pub fn publish(&mut self, prompts: PromptCollection) {
        self.prompts = Arc::new(prompts);
    }

    /// The last executed prompt.
    pub fn dot_prompt(&self) -> Option<&Prompt> {
        self.dot.as_ref()
    }

    /// The source picked for `$select` most recently.
    pub fn last_select(&self) -> Option<SelectSource> {
        self.last_select
    }

    /// Looks up a prompt; `.` resolves to the dot prompt.
    pub fn find(&self, name: &str) -> Option<&Prompt> {
        if name == DOT_PROMPT_NAME {
            self.dot.as_ref()
        } else {
            self.prompts.get(name)
        }
    }

    /// Substitutes the prompt named `name`.
    ///
    /// # Errors
    ///
    /// Returns `LmpError::PromptNotFound` for unknown names and
    /// `LmpError::Substitute` when substitution is cancelled or fails. On
    /// error the session is left unchanged.
    #[tracing::instrument(skip(self, source))]
    pub async fn prepare<S>(&mut self, name: &str, source: &S) -> Result<PreparedRequest>
    where
        S: ValueSource + ?Sized,
    {
        let prompt = self
            .find(name)
            .cloned()
            .ok_or_else(|| LmpError::PromptNotFound(name.to_string()))?;
        self.run(prompt, source, SubstituteOptions::default()).await
    }

    /// Substitutes an ad-hoc prompt that is not part of the snapshot.
    ///
    /// # Errors
    ///
    /// See [`Session::prepare`].
    pub async fn prepare_prompt<S>(
        &mut self,
        prompt: &Prompt,
        source: &S,
    ) -> Result<PreparedRequest>
    where
        S: ValueSource + ?Sized,
    {
        self.run(prompt.clone(), source, SubstituteOptions::default())
            .await
    }

    /// Runs the dot prompt again, reusing the last `$select` source.
    ///
    /// # Errors
    ///
    /// Returns `LmpError::PromptNotFound(".")` if nothing ran yet, otherwise
    /// see [`Session::prepare`].
    pub async fn repeat<S>(&mut self, source: &S) -> Result<PreparedRequest>
    where
        S: ValueSource + ?Sized,
    {
        let prompt = self
            .dot
            .clone()
            .ok_or_else(|| LmpError::PromptNotFound(DOT_PROMPT_NAME.to_string()))?;
        let options = SubstituteOptions {
            reuse_select: self.last_select,
        };
        self.run(prompt, source, options).await
    }

    async fn run<S>(
        &mut self,
        prompt: Prompt,
        source: &S,
        options: SubstituteOptions,
    ) -> Result<PreparedRequest>
    where
        S: ValueSource + ?Sized,
    {
        let substitution = substitute_with(&prompt.prompt, source, &options).await?;

        let request = PreparedRequest {
            prompt_name: prompt.name.clone(),
            text: substitution.text,
            model: prompt.model.clone().or_else(|| self.default_model.clone()),
            model_options: prompt.model_options.clone(),
            extract: prompt.extract.clone(),
        };
        info!(prompt = %request.prompt_name, model = ?request.model, "prepared request");

        // Only a completed run touches session state.
        if substitution.select.is_some() {
            self.last_select = substitution.select;
        }
        self.dot = Some(Prompt {
            name: DOT_PROMPT_NAME.to_string(),
            source_file: None,
            ..prompt
        });
        Ok(request)
    }
}
