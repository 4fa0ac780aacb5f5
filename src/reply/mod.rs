/// Maximum characters per outbound message chunk.
pub const CHUNK_SIZE: usize = 1590;

/// Prefix attached to every model-generated chunk.
pub const REPLY_PREFIX: &str = "AI: ";

/// Split a reply into `CHUNK_SIZE`-character pieces, in order, no overlap.
///
/// Counts characters rather than bytes so multibyte UTF-8 text is never cut
/// mid-character. An empty reply produces no chunks; otherwise the chunk
/// count is `ceil(chars / CHUNK_SIZE)` with only the last chunk short.
pub fn chunk_reply(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(CHUNK_SIZE)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Render message bodies as a TwiML `<Response>` document, one `<Message>`
/// element per body, XML escaped.
pub fn twiml_response(messages: &[String]) -> String {
    let mut doc = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response>");
    for msg in messages {
        doc.push_str("<Message>");
        doc.push_str(&html_escape::encode_text(msg));
        doc.push_str("</Message>");
    }
    doc.push_str("</Response>");
    doc
}
