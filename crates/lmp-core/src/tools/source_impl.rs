//! Line-oriented console value source.
//!
//! This module provides a [`ValueSource`] that asks questions on a text
//! stream and reads one line per answer. It backs the command-line front
//! end; editor hosts provide their own implementation.

use crate::tools::source::{SelectSource, SourceResult, ValueSource};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stderr, Stdin,
};
use tokio::sync::Mutex;

/// Console value source over any async reader/writer pair.
///
/// An empty line or end of input cancels. Registers are not read from a
/// real clipboard: the caller supplies their contents up front.
///
/// # Examples
///
/// ```
/// use lmp_core::tools::source_impl::ConsoleSource;
/// use lmp_core::substitute;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let console = ConsoleSource::new(&b"Berlin\n"[..], Vec::new());
/// let text = substitute("Weather in ${input:City}", &console).await.unwrap();
/// assert_eq!(text, "Weather in Berlin");
/// # });
/// ```
pub struct ConsoleSource<R, W> {
    reader: Mutex<R>,
    writer: Mutex<W>,
    registers: HashMap<char, String>,
    filetype: String,
}

impl ConsoleSource<BufReader<Stdin>, Stderr> {
    /// Creates a source reading answers from stdin and asking on stderr.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }
}

impl<R, W> ConsoleSource<R, W> {
    /// Creates a source over the given streams.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            registers: HashMap::new(),
            filetype: String::new(),
        }
    }

    /// Sets the contents of a register.
    #[must_use]
    pub fn with_register(mut self, name: char, value: impl Into<String>) -> Self {
        self.registers.insert(name, value.into());
        self
    }

    /// Sets the filetype reported for `$filetype`.
    #[must_use]
    pub fn with_filetype(mut self, filetype: impl Into<String>) -> Self {
        self.filetype = filetype.into();
        self
    }

    /// Consumes the source and returns its streams.
    pub fn into_parts(self) -> (R, W) {
        (self.reader.into_inner(), self.writer.into_inner())
    }
}

impl<R, W> ConsoleSource<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn write(&self, text: &str) -> SourceResult<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(text.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    async fn read_line(&self) -> SourceResult<Option<String>> {
        let mut line = String::new();
        let read = self.reader.lock().await.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[async_trait]
impl<R, W> ValueSource for ConsoleSource<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn input(&self, prompt: &str) -> SourceResult<Option<String>> {
        self.write(prompt).await?;
        self.read_line().await
    }

    async fn choose(
        &self,
        prompt: &str,
        choices: &[SelectSource],
    ) -> SourceResult<Option<SelectSource>> {
        let mut menu = String::new();
        for (idx, choice) in choices.iter().enumerate() {
            menu.push_str(&format!("  {}) {}\n", idx + 1, choice));
        }
        menu.push_str(prompt);
        self.write(&menu).await?;

        let Some(answer) = self.read_line().await? else {
            return Ok(None);
        };
        let answer = answer.trim();
        let picked = match answer.parse::<usize>() {
            Ok(n) if n >= 1 => choices.get(n - 1).copied(),
            Ok(_) => None,
            Err(_) => choices
                .iter()
                .copied()
                .find(|c| c.label().eq_ignore_ascii_case(answer)),
        };
        Ok(picked)
    }

    async fn register(&self, name: char) -> SourceResult<String> {
        Ok(self.registers.get(&name).cloned().unwrap_or_default())
    }

    async fn filetype(&self) -> SourceResult<String> {
        Ok(self.filetype.clone())
    }
}

impl<R, W> std::fmt::Debug for ConsoleSource<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSource")
            .field("registers", &self.registers.keys().collect::<Vec<_>>())
            .field("filetype", &self.filetype)
            .finish()
    }
}
