//! Line-oriented question source (stdin in batch mode)

use answer_quorum_application::{QuestionSource, QuestionSourceError};
use answer_quorum_domain::Question;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

/// Reads one question per line, skipping blank lines and `#` comments
pub struct LineQuestionSource<R> {
    lines: Lines<R>,
}

/// Batch-mode source over the process's stdin
pub type StdinQuestionSource = LineQuestionSource<BufReader<Stdin>>;

impl StdinQuestionSource {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> LineQuestionSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> QuestionSource for LineQuestionSource<R> {
    async fn next_question(&mut self) -> Result<Option<Question>, QuestionSourceError> {
        while let Some(line) = self.lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match Question::new(line) {
                Ok(question) => return Ok(Some(question)),
                Err(e) => debug!("Skipping line: {}", e),
            }
        }
        Ok(None)
    }
}
