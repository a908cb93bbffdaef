/// Characters per chunk handed to the summarization model
pub const CHUNK_CHARS: usize = 1000;

/// Split text into consecutive windows of `size` characters.
///
/// Windows do not overlap and keep their original order; only the last one may be shorter.
/// Boundaries ignore words and sentences but never split a multi-byte character.
/// Empty input yields no chunks.
pub fn chunk_text(text: &str, size: usize) -> Vec<&str> {
    let size = size.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let end = rest.char_indices().nth(size).map_or(rest.len(), |(i, _)| i);
        let (head, tail) = rest.split_at(end);
        chunks.push(head);
        rest = tail;
    }

    chunks
}
