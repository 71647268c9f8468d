//! Plain-text rendering of messages for `dbchat ask`.

use dbchat_engine::{RenderedBody, RenderedMessage, Table};

/// Width narratives are wrapped to.
const WRAP_WIDTH: usize = 80;

/// Render one message as plain text.
///
/// Sections of a structured reply are separated by a blank line; the query
/// is indented by four spaces.
pub fn render_plain(message: &RenderedMessage<'_>) -> String {
    match &message.body {
        RenderedBody::Text(text) => (*text).to_string(),
        RenderedBody::Error(error) => format!("[x] {error}"),
        RenderedBody::Structured {
            narrative,
            query,
            table,
        } => {
            let mut sections = Vec::new();
            if let Some(narrative) = narrative {
                sections.push(textwrap::fill(narrative, WRAP_WIDTH));
            }
            if let Some(query) = query {
                sections.push(textwrap::indent(query, "    ").trim_end().to_string());
            }
            if let Some(table) = table {
                sections.push(render_table(table));
            }
            sections.join("\n\n")
        }
    }
}

fn render_table(table: &Table<'_>) -> String {
    let layout = table.layout();
    let mut lines = vec![layout.header, layout.separator];
    lines.extend(layout.rows);
    if let Some(summary) = table.ragged_summary() {
        lines.push(format!("[!] {summary}"));
    }
    lines.join("\n")
}
