//! Dictionary markup to chat markup.
//!
//! Unpaired emphasis tokens are left as they come: if the source truncates a
//! `{it}` pair the reply carries a lone `_`.

use lexi_types::DictionaryEntry;

/// Dictionary emphasis tokens and their chat markers
const EMPHASIS: [(&str, &str); 6] = [
    ("{it}", "_"),
    ("{/it}", "_"),
    ("{phrase}", "*"),
    ("{/phrase}", "*"),
    ("{b}", "*"),
    ("{/b}", "*"),
];

/// Subscript/superscript markers, dropped with their text kept
const NO_OP: [&str; 4] = ["{inf}", "{/inf}", "{sup}", "{/sup}"];

/// Convert one fragment of dictionary markup into chat-safe text
pub fn render(raw: &str) -> String {
    let text = replace_tokens(raw);
    let text = collapse_whitespace(&text);

    text.replace(" :", ":").trim().to_string()
}

/// Token replacement until nothing changes, so nested leftovers like
/// `{in{inf}f}` do not survive a single pass
fn replace_tokens(raw: &str) -> String {
    let mut text = raw.to_string();

    loop {
        let mut next = text.clone();
        for token in NO_OP {
            next = next.replace(token, "");
        }
        for (token, marker) in EMPHASIS {
            next = next.replace(token, marker);
        }

        if next == text {
            return text;
        }
        text = next;
    }
}

/// Runs of two or more whitespace characters become one space
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();

    for c in text.chars() {
        if c.is_whitespace() {
            run.push(c);
            continue;
        }
        flush_run(&mut out, &mut run);
        out.push(c);
    }
    flush_run(&mut out, &mut run);

    out
}

fn flush_run(out: &mut String, run: &mut String) {
    if run.chars().count() > 1 {
        out.push(' ');
    } else {
        out.push_str(run);
    }
    run.clear();
}

/// Full display text of a parsed entry
pub fn render_entry(entry: &DictionaryEntry) -> String {
    let mut sections = Vec::new();

    let mut header = format!("*{}*", render(&entry.headword));
    if let Some(pos) = &entry.part_of_speech {
        header.push_str(&format!("\nPart of Speech: {}", render(pos)));
    }
    sections.push(header);

    if !entry.short_definitions.is_empty() {
        sections.push(bullet_section("Definitions:", &entry.short_definitions));
    }

    let pronunciations: Vec<String> = entry
        .pronunciations
        .iter()
        .map(|p| p.text.clone())
        .filter(|t| !t.trim().is_empty())
        .collect();
    if !pronunciations.is_empty() {
        sections.push(bullet_section("Pronunciations:", &pronunciations));
    }

    if !entry.usage_examples.is_empty() {
        sections.push(bullet_section("Usage Examples:", &entry.usage_examples));
    }

    if let Some(art) = &entry.illustration_id {
        sections.push(format!("Illustration: {}", render(art)));
    }

    sections.join("\n\n")
}

fn bullet_section(title: &str, items: &[String]) -> String {
    let mut section = title.to_string();
    for item in items {
        section.push_str("\n- ");
        section.push_str(&render(item));
    }
    section
}
