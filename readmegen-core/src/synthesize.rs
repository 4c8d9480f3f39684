//! Document Synthesizer boundary: the prompt side of README generation.
//!
//! Turning the prompt into text is the job of a [`crate::contract::Synthesizer`];
//! this module only renders the selected items, in order, into the prompt text.

use crate::select::SelectedItem;

pub const DEFAULT_QUESTION: &str = "Generate a professional README.md for this project.";

pub const README_TEMPLATE: &str = r#"You are an expert software documentation writer.

You are given the following project context:

{context}

---

Your task:

{question}

Guidelines:
- Title: Use the project/folder name or the package manifest name.
- Description: Summarize purpose (from context or inferred).
- Features: Bullet-point list of main capabilities.
- Installation: Include the install steps for every toolchain present.
- Usage: Show commands to run the project.
- Environment Variables: List keys only (no secret values).
- Deployment: Mention Docker if a Dockerfile or compose file is present, else skip.
- Architecture: Include a simple Mermaid diagram if services are present.
- Project Structure: Show a tree up to depth 2-3.
- License: Include if a LICENSE is present.
- Keep it clear, professional, and concise.
- Wrap commands, code samples and diagrams in fenced code blocks with a language identifier.
- Never omit closing triple backticks.

Mermaid rules:
1. Start with `flowchart LR` or `flowchart TD`.
2. Node IDs are simple alphanumeric tokens.
3. Every node label and edge label is wrapped in double quotes.

Format the output as a valid Markdown README.md file.
"#;

/// Render one item as a context block.
pub fn format_item(item: &SelectedItem) -> String {
    format!(
        "---\nSource: {}\n\nContent:\n{}\n",
        item.path, item.content
    )
}

/// Render all items, in order, separated by blank lines.
pub fn format_context(items: &[SelectedItem]) -> String {
    items.iter().map(format_item).collect::<Vec<_>>().join("\n\n")
}

/// Fill the README template.
///
/// The question is substituted first so a `{context}` string inside it stays literal
/// while file content containing `{question}` is never rewritten.
pub fn render_prompt(items: &[SelectedItem], question: &str) -> String {
    let (head, tail) = README_TEMPLATE
        .split_once("{context}")
        .unwrap_or((README_TEMPLATE, ""));
    format!(
        "{}{}{}",
        head,
        format_context(items),
        tail.replacen("{question}", question, 1)
    )
}
