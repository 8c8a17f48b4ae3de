/// Display normalization for dataset text. The source data was exported with
/// broken encodings: U+FFFD shows up where "í" belongs (Brasília and
/// friends), and the occasional control character sneaks in. Unrenderable
/// characters degrade to `?` instead of failing the display.
pub fn normalize_display(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{FFFD}' => 'í',
            c if c.is_control() => '?',
            c => c,
        })
        .collect()
}
