// ===============================
// src/input.rs (token reader, mirip Scanner.nextInt)
// ===============================
use std::collections::VecDeque;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::domain::Quantity;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("line {line}: expected an integer, got {token:?}")]
    NotAnInteger { line: u64, token: String },
    #[error("input ended in the middle of a round (read {read} of {expected} quantities)")]
    Truncated { read: usize, expected: usize },
    #[error("read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Membaca integer yang dipisah whitespace, lintas baris.
pub struct QuantityReader<R> {
    lines: Lines<R>,
    pending: VecDeque<String>,
    line_no: u64,
}

impl<R: AsyncBufRead + Unpin> QuantityReader<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), pending: VecDeque::new(), line_no: 0 }
    }

    /// None = EOF
    pub async fn next_quantity(&mut self) -> Result<Option<Quantity>, InputError> {
        loop {
            if let Some(tok) = self.pending.pop_front() {
                return tok
                    .parse::<Quantity>()
                    .map(Some)
                    .map_err(|_| InputError::NotAnInteger { line: self.line_no, token: tok });
            }
            match self.lines.next_line().await? {
                Some(line) => {
                    self.line_no += 1;
                    self.pending.extend(line.split_whitespace().map(str::to_string));
                }
                None => return Ok(None),
            }
        }
    }

    /// Sisa field setelah lead; EOF di tengah round = Truncated
    pub async fn read_rest(&mut self, lead: Quantity, fields: usize) -> Result<Vec<Quantity>, InputError> {
        let mut round = Vec::with_capacity(fields);
        round.push(lead);
        while round.len() < fields {
            match self.next_quantity().await? {
                Some(q) => round.push(q),
                None => return Err(InputError::Truncated { read: round.len(), expected: fields }),
            }
        }
        Ok(round)
    }
}
