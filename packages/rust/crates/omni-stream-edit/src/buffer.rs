//! Buffer accumulator for one streamed turn.

/// Growing text of the current turn.
///
/// `append` is the only mutator. Parsing always reads the whole buffer,
/// never just the latest chunk, because markers and fences routinely
/// straddle chunk boundaries.
#[derive(Debug, Default, Clone)]
pub struct StreamBuffer {
    text: String,
    chunks: usize,
}

impl StreamBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one delivered chunk.
    pub fn append(&mut self, chunk: &str) {
        self.text.push_str(chunk);
        self.chunks += 1;
    }

    /// Entire accumulated text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Accumulated length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether nothing has been appended since the last clear.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of chunks appended since the last clear.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Drop all text at a turn boundary.
    pub fn clear(&mut self) {
        self.text.clear();
        self.chunks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_accumulates() {
        let mut buffer = StreamBuffer::new();
        buffer.append("Find this ");
        buffer.append("code:\n```");
        assert_eq!(buffer.as_str(), "Find this code:\n```");
        assert_eq!(buffer.chunk_count(), 2);
    }

    #[test]
    fn test_clear() {
        let mut buffer = StreamBuffer::new();
        buffer.append("abc");
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.chunk_count(), 0);
    }
}
