/// Split study material into paragraph chunks.
///
/// Paragraphs are separated by a blank line; surrounding whitespace is
/// trimmed and empty chunks are dropped.
pub fn chunk_material(content: &str) -> Vec<String> {
    content
        .replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
