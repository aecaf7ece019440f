// README html -> terminal lines
//
// GitHub renders READMEs server side. The terminal can't show HTML, so the
// markup is flattened into lines: headings come out as typed lines, list
// items get a bullet, images collapse to their alt text and everything
// else is stripped.
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Marks the start of a heading while the markup is flattened. NUL never
/// survives into the text: raw NULs are dropped from the input and `&#0;`
/// decodes to U+FFFD.
const HEADING_MARK: char = '\0';

/// One rendered README line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadmeLine {
    Heading { level: u8, text: String },
    Text(String),
}

impl fmt::Display for ReadmeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadmeLine::Heading { level, text } => {
                write!(f, "{} {}", "#".repeat(usize::from(*level)), text)
            }
            ReadmeLine::Text(text) => f.write_str(text),
        }
    }
}

struct Patterns {
    hidden_blocks: Regex,
    line_breaks: Regex,
    headings: Regex,
    list_items: Regex,
    images: Regex,
    block_ends: Regex,
    block_starts: Regex,
    tags: Regex,
    entities: Regex,
    trailing_space: Regex,
    blank_runs: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        hidden_blocks: Regex::new(r"(?is)<(script|style|svg)\b.*?</(script|style|svg)>")
            .expect("static regex"),
        line_breaks: Regex::new(r"(?i)<br\s*/?>").expect("static regex"),
        headings: Regex::new(r"(?i)<h([1-6])\b[^>]*>").expect("static regex"),
        list_items: Regex::new(r"(?i)<li\b[^>]*>").expect("static regex"),
        images: Regex::new(r#"(?i)<img\b[^>]*?\balt="([^"]*)"[^>]*>"#).expect("static regex"),
        block_ends: Regex::new(r"(?i)</(p|div|h[1-6]|ul|ol|li|pre|table|tr|blockquote)>")
            .expect("static regex"),
        block_starts: Regex::new(r"(?i)<(p|div|pre|table|tr|blockquote|ul|ol|hr)\b[^>]*>")
            .expect("static regex"),
        tags: Regex::new(r"<[^>]+>").expect("static regex"),
        entities: Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos|nbsp);")
            .expect("static regex"),
        trailing_space: Regex::new(r"(?m)[ \t]+$").expect("static regex"),
        blank_runs: Regex::new(r"\n{3,}").expect("static regex"),
    })
}

/// Flatten rendered README HTML into typed lines.
///
/// Empty input gives no lines, so "no README" and "blank README" look the
/// same to callers.
pub fn html_to_lines(html: &str) -> Vec<ReadmeLine> {
    flatten(html).lines().filter_map(parse_line).collect()
}

/// Plain-text rendering of [`html_to_lines`], headings as `#` markers
pub fn html_to_text(html: &str) -> String {
    lines_to_text(&html_to_lines(html))
}

pub fn lines_to_text(lines: &[ReadmeLine]) -> String {
    lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn flatten(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let p = patterns();
    let html = html.replace(HEADING_MARK, "");

    let text = p.hidden_blocks.replace_all(&html, "");
    let text = p.line_breaks.replace_all(&text, "\n");
    let text = p.headings.replace_all(&text, |caps: &regex::Captures| {
        format!("\n\n{}{}", HEADING_MARK, &caps[1])
    });
    let text = p.list_items.replace_all(&text, "\n• ");
    let text = p.images.replace_all(&text, |caps: &regex::Captures| {
        let alt = caps[1].trim();
        if alt.is_empty() {
            String::new()
        } else {
            format!("[image: {}]", alt)
        }
    });
    let text = p.block_ends.replace_all(&text, "\n");
    let text = p.block_starts.replace_all(&text, "\n");
    let text = p.tags.replace_all(&text, "");
    let text = decode_entities(&text);
    let text = p.trailing_space.replace_all(&text, "");
    let text = p.blank_runs.replace_all(&text, "\n\n");

    text.trim().to_string()
}

fn parse_line(line: &str) -> Option<ReadmeLine> {
    let Some(rest) = line.strip_prefix(HEADING_MARK) else {
        return Some(ReadmeLine::Text(line.to_string()));
    };

    let mut chars = rest.chars();
    let level = chars
        .next()
        .and_then(|c| c.to_digit(10))
        .map_or(1, |d| d as u8);
    let text = chars.as_str().trim();

    // A heading whose content sat on later lines leaves only the marker
    (!text.is_empty()).then(|| ReadmeLine::Heading {
        level,
        text: text.to_string(),
    })
}

/// Decode entities in a single pass so decoded text is never decoded again
fn decode_entities(text: &str) -> String {
    patterns()
        .entities
        .replace_all(text, |caps: &regex::Captures| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => decode_numeric(&name[1..]),
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_numeric(raw: &str) -> Option<char> {
    let code = match raw.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => raw.parse::<u32>().ok()?,
    };
    match code {
        0 => Some(char::REPLACEMENT_CHARACTER),
        _ => char::from_u32(code),
    }
}
