use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use super::traits::{InputSource, OutputSink};

/// Stdin line reader with a hard timeout race: whichever of "a line
/// arrived" and "the timer fired" resolves first wins. EOF reads as
/// `None` too, so a closed pipe degrades into the no-response path.
pub struct ConsoleInput {
    lines: Lines<BufReader<Stdin>>,
}

impl ConsoleInput {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputSource for ConsoleInput {
    async fn read_line(&mut self, timeout: Duration) -> Option<String> {
        match tokio::time::timeout(timeout, self.lines.next_line()).await {
            Ok(Ok(Some(line))) => Some(line),
            // EOF or a read error; both mean no input is coming.
            Ok(_) => None,
            // Timer won the race.
            Err(_) => None,
        }
    }
}

/// Plain stdout sink.
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl OutputSink for ConsoleOutput {
    fn line(&mut self, text: &str) {
        println!("{}", text);
    }

    fn prompt(&mut self, text: &str) {
        print!("{}", text);
        let _ = std::io::stdout().flush();
    }
}
