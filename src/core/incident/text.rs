use html2text::render::text_renderer::TrivialDecorator;

// Wide enough that the renderer never wraps a status line.
const RENDER_WIDTH: usize = 4096;

/// Renders a markup fragment to a single line of plain text.
///
/// Tags are dropped and entities decoded. Any run of whitespace, line breaks
/// included, becomes one space and the result is trimmed. Angle brackets never
/// survive, even when they came from an escaped entity.
pub fn normalize_text(fragment: &str) -> String {
    if fragment.trim().is_empty() {
        return String::new();
    }

    // Raw mode renders table cells as plain blocks, without border glyphs.
    let rendered = html2text::config::with_decorator(TrivialDecorator::new())
        .raw_mode(true)
        .string_from_read(fragment.as_bytes(), RENDER_WIDTH)
        .unwrap_or_else(|error| {
            tracing::debug!(%error, "markup renderer failed, stripping tags directly");
            strip_tags(fragment)
        });

    collapse_whitespace(&rendered)
}

/// Drops everything between `<` and `>`; an unterminated tag runs to the end.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

// Box-drawing glyphs only ever come from the renderer's table borders.
fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ch == '<' || ch == '>' || ('\u{2500}'..='\u{257f}').contains(&ch)
}

fn collapse_whitespace(input: &str) -> String {
    input
        .split(is_separator)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
