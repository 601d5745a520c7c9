use std::io;

use serde::Serialize;

use crate::constants::LIB_TAG_ELLIPSIS;

/// `io::Write` sink that only counts bytes.
#[derive(Debug, Default)]
struct ByteCounter {
    len: usize,
}

impl io::Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.len += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Length in bytes of the compact UTF-8 JSON form of `value`.
///
/// Streams into a counting writer; nothing is buffered.
pub fn byte_size<T: Serialize + ?Sized>(value: &T) -> Result<usize, serde_json::Error> {
    let mut counter = ByteCounter::default();
    serde_json::to_writer(&mut counter, value)?;
    Ok(counter.len)
}

/// Exact compact JSON size of an array whose elements serialize to `item_sizes`.
///
/// `[` + items joined by `,` + `]`.
pub fn array_byte_size(item_sizes: &[usize]) -> usize {
    2 + item_sizes.iter().sum::<usize>() + item_sizes.len().saturating_sub(1)
}

/// Truncate to at most `max_len` characters, ending in an ellipsis when cut.
pub fn truncate_with_ellipsis(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(LIB_TAG_ELLIPSIS.len());
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(LIB_TAG_ELLIPSIS);
    out
}
