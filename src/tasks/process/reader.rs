use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader},
    sync::mpsc,
    task::JoinHandle,
};

use crate::helper::tracing::MaybeInstrument;

/// Longest chunk delivered as a single line when a tool writes no newline.
pub(crate) const MAX_LINE_BYTES: u64 = 64 * 1024;

/// Message sent from a line reader to its consumer.
///
/// The reader signals end of output by dropping its sender.
#[derive(Debug)]
pub(crate) enum OutputMessage {
    Line(String),
    Failed(std::io::Error),
}

/// Spawns a task that splits `pipe` into lines and forwards them to `tx`.
///
/// Lines are sent in the order they were written. A trailing partial line is
/// flushed when the pipe reaches EOF. The task exits on EOF, on a read error
/// (after reporting it) or when the consumer goes away.
pub(crate) fn spawn_line_reader<R>(pipe: R, tx: mpsc::Sender<OutputMessage>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(
        async move {
            let mut reader = BufReader::new(pipe);
            // Holds the start of a character split by the length cap
            let mut buf = Vec::new();
            loop {
                let limit = MAX_LINE_BYTES - buf.len() as u64;
                let read = (&mut reader)
                    .take(limit)
                    .read_until(b'\n', &mut buf)
                    .await;
                match read {
                    Ok(0) if buf.is_empty() => break,
                    Ok(_) => {
                        let capped = buf.last() != Some(&b'\n') && buf.len() as u64 == MAX_LINE_BYTES;
                        let carry = if capped { split_partial_char(&mut buf) } else { Vec::new() };
                        let line = decode_line(&buf);
                        buf = carry;
                        if tx.send(OutputMessage::Line(line)).await.is_err() {
                            #[cfg(feature = "tracing")]
                            tracing::debug!("Output consumer dropped, stopping line reader");
                            return;
                        }
                    }
                    Err(e) => {
                        #[cfg(feature = "tracing")]
                        tracing::error!(error = %e, "Error reading process output");
                        let _ = tx.send(OutputMessage::Failed(e)).await;
                        return;
                    }
                }
            }
            #[cfg(feature = "tracing")]
            tracing::trace!("Process output reached EOF");
        }
        .maybe_instrument("line_reader"),
    )
}

/// Strips the line terminator and decodes lossily.
///
/// A `\r` is only removed in front of a `\n`.
pub(crate) fn decode_line(buf: &[u8]) -> String {
    let buf = match buf.strip_suffix(b"\n") {
        Some(line) => line.strip_suffix(b"\r").unwrap_or(line),
        None => buf,
    };
    String::from_utf8_lossy(buf).into_owned()
}

/// Splits off a UTF-8 sequence cut short at the end of `buf`.
pub(crate) fn split_partial_char(buf: &mut Vec<u8>) -> Vec<u8> {
    let tail = buf.len().saturating_sub(3);
    for start in (tail..buf.len()).rev() {
        let width = match buf[start] {
            0x80..=0xBF => continue,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        if start + width > buf.len() {
            return buf.split_off(start);
        }
        break;
    }
    Vec::new()
}
