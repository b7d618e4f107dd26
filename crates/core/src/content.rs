//! Article body markup.
//!
//! Supported: `## `/`### ` headings, `- ` bullets, `1. ` numbered items, `|` tables,
//! blank-line separated paragraphs, `**bold**`, and lines opening with the warning marker.

use html_escape::encode_text;
use serde::Serialize;

pub const WARNING_MARKER: &str = "⚠️";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Strong(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, inlines: Vec<Inline> },
    Paragraph { inlines: Vec<Inline> },
    BulletList { items: Vec<Vec<Inline>> },
    NumberedList { items: Vec<Vec<Inline>> },
    Table { header: Vec<String>, rows: Vec<Vec<String>> },
    Notice { inlines: Vec<Inline> },
}

pub fn parse(content: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut bullets: Vec<Vec<Inline>> = Vec::new();
    let mut numbered: Vec<Vec<Inline>> = Vec::new();
    let mut table: Vec<Vec<String>> = Vec::new();

    for raw in content.lines() {
        let line = raw.trim();

        if !line.starts_with("- ") {
            flush_list(&mut blocks, &mut bullets, false);
        }
        if numbered_item(line).is_none() {
            flush_list(&mut blocks, &mut numbered, true);
        }
        if !line.starts_with('|') {
            flush_table(&mut blocks, &mut table);
        }

        if line.is_empty() {
            flush_paragraph(&mut blocks, &mut paragraph);
            continue;
        }

        if let Some(rest) = line.strip_prefix("### ") {
            flush_paragraph(&mut blocks, &mut paragraph);
            blocks.push(Block::Heading {
                level: 3,
                inlines: parse_inline(rest),
            });
        } else if let Some(rest) = line.strip_prefix("## ") {
            flush_paragraph(&mut blocks, &mut paragraph);
            blocks.push(Block::Heading {
                level: 2,
                inlines: parse_inline(rest),
            });
        } else if let Some(rest) = line.strip_prefix("- ") {
            flush_paragraph(&mut blocks, &mut paragraph);
            bullets.push(parse_inline(rest));
        } else if let Some(rest) = numbered_item(line) {
            flush_paragraph(&mut blocks, &mut paragraph);
            numbered.push(parse_inline(rest));
        } else if line.starts_with('|') {
            flush_paragraph(&mut blocks, &mut paragraph);
            if !is_table_separator(line) {
                table.push(table_cells(line));
            }
        } else if let Some(rest) = line.strip_prefix(WARNING_MARKER) {
            flush_paragraph(&mut blocks, &mut paragraph);
            blocks.push(Block::Notice {
                inlines: parse_inline(rest.trim_start()),
            });
        } else {
            paragraph.push(line);
        }
    }

    flush_paragraph(&mut blocks, &mut paragraph);
    flush_list(&mut blocks, &mut bullets, false);
    flush_list(&mut blocks, &mut numbered, true);
    flush_table(&mut blocks, &mut table);
    blocks
}

fn flush_paragraph(blocks: &mut Vec<Block>, lines: &mut Vec<&str>) {
    if lines.is_empty() {
        return;
    }
    blocks.push(Block::Paragraph {
        inlines: parse_inline(&lines.join(" ")),
    });
    lines.clear();
}

fn flush_list(blocks: &mut Vec<Block>, items: &mut Vec<Vec<Inline>>, numbered: bool) {
    if items.is_empty() {
        return;
    }
    let items = std::mem::take(items);
    blocks.push(if numbered {
        Block::NumberedList { items }
    } else {
        Block::BulletList { items }
    });
}

fn flush_table(blocks: &mut Vec<Block>, rows: &mut Vec<Vec<String>>) {
    if rows.is_empty() {
        return;
    }
    let mut rows = std::mem::take(rows);
    let header = rows.remove(0);
    blocks.push(Block::Table { header, rows });
}

fn numbered_item(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

fn is_table_separator(line: &str) -> bool {
    line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn table_cells(line: &str) -> Vec<String> {
    line.trim_matches('|')
        .split('|')
        .map(|c| c.trim().to_string())
        .collect()
}

pub fn parse_inline(text: &str) -> Vec<Inline> {
    let parts: Vec<&str> = text.split("**").collect();
    // An odd count of parts means every marker is paired.
    let balanced = parts.len() % 2 == 1;
    let mut out = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        let strong = i % 2 == 1;
        if strong && !balanced && i == parts.len() - 1 {
            push_text(&mut out, &format!("**{part}"));
        } else if strong {
            if !part.is_empty() {
                out.push(Inline::Strong(part.to_string()));
            }
        } else {
            push_text(&mut out, part);
        }
    }
    out
}

fn push_text(out: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(prev)) = out.last_mut() {
        prev.push_str(text);
        return;
    }
    out.push(Inline::Text(text.to_string()));
}

pub fn render_html(blocks: &[Block]) -> String {
    let mut html = String::new();
    for block in blocks {
        match block {
            Block::Heading { level, inlines } => {
                html.push_str(&format!("<h{level}>{}</h{level}>", inline_html(inlines)));
            }
            Block::Paragraph { inlines } => {
                html.push_str(&format!("<p>{}</p>", inline_html(inlines)));
            }
            Block::BulletList { items } => list_html(&mut html, "ul", items),
            Block::NumberedList { items } => list_html(&mut html, "ol", items),
            Block::Table { header, rows } => {
                html.push_str("<table><thead><tr>");
                for cell in header {
                    html.push_str(&format!("<th>{}</th>", encode_text(cell)));
                }
                html.push_str("</tr></thead><tbody>");
                for row in rows {
                    html.push_str("<tr>");
                    for cell in row {
                        html.push_str(&format!("<td>{}</td>", encode_text(cell)));
                    }
                    html.push_str("</tr>");
                }
                html.push_str("</tbody></table>");
            }
            Block::Notice { inlines } => {
                html.push_str(&format!(
                    "<aside class=\"notice\"><span class=\"notice-marker\">{WARNING_MARKER}</span> {}</aside>",
                    inline_html(inlines)
                ));
            }
        }
    }
    html
}

fn list_html(html: &mut String, tag: &str, items: &[Vec<Inline>]) {
    html.push_str(&format!("<{tag}>"));
    for item in items {
        html.push_str(&format!("<li>{}</li>", inline_html(item)));
    }
    html.push_str(&format!("</{tag}>"));
}

fn inline_html(inlines: &[Inline]) -> String {
    inlines
        .iter()
        .map(|i| match i {
            Inline::Text(t) => encode_text(t).into_owned(),
            Inline::Strong(t) => format!("<strong>{}</strong>", encode_text(t)),
        })
        .collect()
}
