//! Typed input and printed output, for running without audio hardware

use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::agent::{SpeechCapture, SpeechOutput};
use crate::error::RecognitionError;
use crate::Result;

/// Utterance delivered when input ends, so the session says goodbye
pub const END_OF_INPUT_UTTERANCE: &str = "exit";

/// Reads one utterance per line
///
/// A blank line counts as unintelligible speech.
pub struct ConsoleInput<R = BufReader<Stdin>> {
    lines: Lines<R>,
    exhausted: bool,
}

impl ConsoleInput {
    /// Read utterances from stdin
    #[must_use]
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> ConsoleInput<R> {
    /// Read utterances from any buffered reader
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            exhausted: false,
        }
    }
}

#[async_trait(?Send)]
impl<R: AsyncBufRead + Unpin> SpeechCapture for ConsoleInput<R> {
    async fn listen(&mut self) -> std::result::Result<String, RecognitionError> {
        if self.exhausted {
            return Ok(END_OF_INPUT_UTTERANCE.to_string());
        }

        match self.lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => Err(RecognitionError::Unintelligible),
            Ok(Some(line)) => Ok(line.trim().to_string()),
            Ok(None) => {
                tracing::debug!("input closed");
                self.exhausted = true;
                Ok(END_OF_INPUT_UTTERANCE.to_string())
            }
            Err(e) => Err(RecognitionError::Service(e.to_string())),
        }
    }
}

/// Prints responses instead of speaking them
pub struct ConsoleOutput<W = std::io::Stdout> {
    writer: W,
}

impl ConsoleOutput {
    /// Print to stdout
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleOutput<W> {
    /// Print to any writer
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Take the writer back
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait(?Send)]
impl<W: Write> SpeechOutput for ConsoleOutput<W> {
    async fn speak(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "AI --> {text}")?;
        self.writer.flush()?;
        Ok(())
    }
}
