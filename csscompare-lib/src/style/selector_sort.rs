/// A run of selector lines sharing one rule block, e.g.
///
/// ```text
///   .foo,
///   .bar {
/// ```
///
/// `start..end` covers the indentation of the first line up to (not
/// including) the ` {` that opens the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorGroup<'a> {
    pub indent: &'a str,
    pub start: usize,
    pub end: usize,
    raw: &'a str,
}

impl<'a> SelectorGroup<'a> {
    /// Selectors of the group, whitespace-collapsed and sorted.
    pub fn sorted_selectors(&self) -> Vec<String> {
        let joined = self.raw.replace('\n', " ");
        let mut selectors: Vec<String> = joined
            .split(',')
            .map(|selector| selector.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect();
        selectors.sort();
        selectors
    }

    /// One selector per line, each carrying the group's indentation.
    pub fn render(&self) -> String {
        let separator = format!(",\n{}", self.indent);
        format!("{}{}", self.indent, self.sorted_selectors().join(&separator))
    }
}

/// Length of the selector-ish prefix a line must start with, if any.
fn selector_start(s: &str) -> Option<usize> {
    if s.starts_with("@-") {
        return Some(2);
    }
    match s.bytes().next()? {
        b'[' | b'.' | b'*' | b':' | b'-' | b'a'..=b'z' => Some(1),
        _ => None,
    }
}

fn next_line_start(text: &str, from: usize) -> usize {
    text[from..].find('\n').map_or(text.len(), |i| from + i + 1)
}

/// Find the selector group starting at the line beginning at `start`.
///
/// Continuation lines need exactly the first line's indentation, and a line
/// only continues the group if it holds no `;` or `/`. The group ends at the
/// last ` {` that can close it, preferring later lines.
pub fn find_group(text: &str, start: usize) -> Option<SelectorGroup<'_>> {
    let indent_len = text[start..].bytes().take_while(|&b| b == b' ').count();
    let indent = &text[start..start + indent_len];

    // (earliest end, latest end) of each candidate line
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut line = start;
    loop {
        let body = line + indent_len;
        let Some(prefix) = selector_start(&text[body..]) else {
            break;
        };
        let stop = text[body..]
            .find(|c: char| matches!(c, '\n' | ';' | '/'))
            .map_or(text.len(), |i| body + i);
        spans.push((body + prefix, stop));

        let next = stop + 1;
        if !text[stop..].starts_with('\n') || !text[next..].starts_with(indent) {
            break;
        }
        line = next;
    }

    spans.iter().rev().find_map(|&(min_end, stop)| {
        let end = min_end + text[min_end..stop].rfind(" {")?;
        Some(SelectorGroup {
            indent,
            start,
            end,
            raw: &text[start..end],
        })
    })
}

/// Sort comma-separated selector lists so selector order stops mattering in
/// a diff. Everything outside a selector group is copied through untouched.
pub fn sort_selectors(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut line = 0;

    while line < text.len() {
        match find_group(text, line) {
            Some(group) => {
                out.push_str(&text[copied..group.start]);
                out.push_str(&group.render());
                copied = group.end;
                line = next_line_start(text, group.end);
            }
            None => line = next_line_start(text, line),
        }
    }

    out.push_str(&text[copied..]);
    out
}
