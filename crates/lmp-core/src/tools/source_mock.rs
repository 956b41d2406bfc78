//! Scripted value source for testing.
//!
//! [`ScriptedSource`] answers interactive requests from a pre-filled queue
//! and records every prompt it was shown, so substitution can be exercised
//! without a terminal or editor.

use crate::tools::source::{SelectSource, SourceResult, ValueSource};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Value source driven by scripted answers.
///
/// Queued answers are consumed in order. When the queue is empty the
/// default answer is used; without one, the request is cancelled.
///
/// # Examples
///
/// ```
/// use lmp_core::tools::source_mock::ScriptedSource;
/// use lmp_core::substitute;
///
/// # tokio_test_block(async {
/// let source = ScriptedSource::new();
/// source.push_answer("World");
///
/// let text = substitute("Hello $input", &source).await.unwrap();
/// assert_eq!(text, "Hello World");
/// assert_eq!(source.prompts(), vec!["Input: "]);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    /// Queued answers for `input`; `None` entries cancel.
    answers: Arc<Mutex<VecDeque<Option<String>>>>,
    /// Answer used once the queue is exhausted.
    default_answer: Arc<Mutex<Option<String>>>,
    /// Answer for `choose`; `None` cancels.
    choice: Arc<Mutex<Option<SelectSource>>>,
    /// Register contents by name.
    registers: Arc<Mutex<HashMap<char, String>>>,
    /// Filetype reported for the current buffer.
    filetype: Arc<Mutex<String>>,
    /// Every prompt shown, in order.
    prompts: Arc<Mutex<Vec<String>>>,
    /// Number of `choose` calls.
    choose_calls: Arc<Mutex<usize>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedSource {
    /// Creates a source that cancels every interactive request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source that answers every `input` with `answer`.
    pub fn answering(answer: impl Into<String>) -> Self {
        let source = Self::new();
        source.set_default_answer(answer);
        source
    }

    /// Queues an answer for the next `input` call.
    pub fn push_answer(&self, answer: impl Into<String>) {
        lock(&self.answers).push_back(Some(answer.into()));
    }

    /// Queues a cancellation for the next `input` call.
    pub fn push_cancel(&self) {
        lock(&self.answers).push_back(None);
    }

    /// Sets the answer used when the queue is empty.
    pub fn set_default_answer(&self, answer: impl Into<String>) {
        *lock(&self.default_answer) = Some(answer.into());
    }

    /// Sets the answer for `choose`; `None` cancels.
    pub fn set_choice(&self, choice: Option<SelectSource>) {
        *lock(&self.choice) = choice;
    }

    /// Sets the contents of a register.
    pub fn set_register(&self, name: char, value: impl Into<String>) {
        lock(&self.registers).insert(name, value.into());
    }

    /// Sets the filetype of the current buffer.
    pub fn set_filetype(&self, filetype: impl Into<String>) {
        *lock(&self.filetype) = filetype.into();
    }

    /// Returns every prompt shown so far.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Returns how many times a choice was requested.
    pub fn choose_calls(&self) -> usize {
        *lock(&self.choose_calls)
    }
}

#[async_trait]
impl ValueSource for ScriptedSource {
    async fn input(&self, prompt: &str) -> SourceResult<Option<String>> {
        lock(&self.prompts).push(prompt.to_string());
        let queued = lock(&self.answers).pop_front();
        Ok(match queued {
            Some(answer) => answer,
            None => lock(&self.default_answer).clone(),
        })
    }

    async fn choose(
        &self,
        prompt: &str,
        _choices: &[SelectSource],
    ) -> SourceResult<Option<SelectSource>> {
        lock(&self.prompts).push(prompt.to_string());
        *lock(&self.choose_calls) += 1;
        Ok(*lock(&self.choice))
    }

    async fn register(&self, name: char) -> SourceResult<String> {
        Ok(lock(&self.registers).get(&name).cloned().unwrap_or_default())
    }

    async fn filetype(&self) -> SourceResult<String> {
        Ok(lock(&self.filetype).clone())
    }
}
