//! Block-level markdown parsing and rendering.
//!
//! Changelog sections are located purely by block structure, so inline
//! markdown is kept verbatim inside each block and written back unchanged.
//! Heading text can be flattened to plain text with [`plain_text`].

/// A top-level markdown block, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// ATX (`## 1.0.0`) or setext heading. `content` is the raw inline markdown.
    Heading { depth: u8, content: String },
    Paragraph(String),
    /// A whole list, including nested items and loose-list blank lines.
    List(String),
    BlockQuote(String),
    /// Fenced or indented code, fences included.
    Code(String),
    Html(String),
    ThematicBreak,
}

impl Block {
    /// Flattened heading text, or `None` for non-heading blocks.
    pub fn heading_text(&self) -> Option<String> {
        match self {
            Block::Heading { content, .. } => Some(plain_text(content)),
            _ => None,
        }
    }

    /// Heading depth (1-6), or `None` for non-heading blocks.
    pub fn heading_depth(&self) -> Option<u8> {
        match self {
            Block::Heading { depth, .. } => Some(*depth),
            _ => None,
        }
    }

    /// Render this block back to markdown.
    pub fn to_markdown(&self) -> String {
        match self {
            Block::Heading { depth, content } => {
                let hashes = "#".repeat(usize::from(*depth));
                let content = content.replace('\n', " ");
                if content.is_empty() {
                    hashes
                } else {
                    format!("{} {}", hashes, content)
                }
            }
            Block::Paragraph(text)
            | Block::List(text)
            | Block::BlockQuote(text)
            | Block::Code(text)
            | Block::Html(text) => text.clone(),
            Block::ThematicBreak => "***".to_string(),
        }
    }
}

/// Parse markdown source into a flat sequence of top-level blocks.
pub fn parse(source: &str) -> Vec<Block> {
    let lines: Vec<&str> = source.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if is_blank(line) {
            i += 1;
            continue;
        }

        if let Some(fence) = fence_opening(line) {
            let start = i;
            i += 1;
            while i < lines.len() {
                let closed = closes_fence(lines[i], &fence);
                i += 1;
                if closed {
                    break;
                }
            }
            blocks.push(Block::Code(lines[start..i].join("\n")));
            continue;
        }

        if indent_of(line) >= 4 {
            let start = i;
            while i < lines.len() && (is_blank(lines[i]) || indent_of(lines[i]) >= 4) {
                i += 1;
            }
            blocks.push(Block::Code(join_trimmed(&lines[start..i])));
            continue;
        }

        if let Some((depth, content)) = atx_heading(line) {
            blocks.push(Block::Heading { depth, content });
            i += 1;
            continue;
        }

        if is_thematic_break(line) {
            blocks.push(Block::ThematicBreak);
            i += 1;
            continue;
        }

        if is_blockquote(line) {
            let start = i;
            i += 1;
            while i < lines.len()
                && !is_blank(lines[i])
                && (is_blockquote(lines[i]) || !interrupts_paragraph(lines[i]))
            {
                i += 1;
            }
            blocks.push(Block::BlockQuote(join_trimmed(&lines[start..i])));
            continue;
        }

        if is_html_start(line) {
            let start = i;
            i = html_end(&lines, i);
            blocks.push(Block::Html(join_trimmed(&lines[start..i])));
            continue;
        }

        if list_marker(line).is_some() {
            let start = i;
            i = list_end(&lines, i);
            blocks.push(Block::List(join_trimmed(&lines[start..i])));
            continue;
        }

        // Paragraph, possibly turned into a setext heading by its underline.
        let start = i;
        i += 1;
        let mut setext = None;
        while i < lines.len() {
            let next = lines[i];
            if is_blank(next) {
                break;
            }
            if let Some(depth) = setext_underline(next) {
                setext = Some(depth);
                break;
            }
            if interrupts_paragraph(next) {
                break;
            }
            i += 1;
        }

        let text: Vec<&str> = lines[start..i].iter().map(|l| l.trim()).collect();
        match setext {
            Some(depth) => {
                blocks.push(Block::Heading {
                    depth,
                    content: text.join("\n"),
                });
                i += 1;
            }
            None => blocks.push(Block::Paragraph(join_trimmed(&lines[start..i]))),
        }
    }

    blocks
}

/// Render blocks back to markdown, separated by blank lines.
pub fn render(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::to_markdown)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Flatten inline markdown to its text content.
///
/// Emphasis markers and code-span backticks are dropped, links and images
/// collapse to their label, autolinks to their target, and backslash
/// escapes to the escaped character.
pub fn plain_text(inline: &str) -> String {
    let chars: Vec<char> = inline.chars().collect();
    let mut out = String::with_capacity(inline.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' if i + 1 < chars.len() && chars[i + 1].is_ascii_punctuation() => {
                out.push(chars[i + 1]);
                i += 2;
            }
            '`' => {
                let run = run_length(&chars, i, '`');
                match find_closing_backticks(&chars, i + run, run) {
                    Some(close) => {
                        let inner: String = chars[i + run..close].iter().collect();
                        let inner = inner.replace('\n', " ");
                        let inner = if inner.len() > 1
                            && inner.starts_with(' ')
                            && inner.ends_with(' ')
                            && !inner.trim().is_empty()
                        {
                            inner[1..inner.len() - 1].to_string()
                        } else {
                            inner
                        };
                        out.push_str(&inner);
                        i = close + run;
                    }
                    None => {
                        out.extend(std::iter::repeat_n('`', run));
                        i += run;
                    }
                }
            }
            '!' if chars.get(i + 1) == Some(&'[') => match link_at(&chars, i + 1) {
                Some((label, end)) => {
                    out.push_str(&plain_text(&label));
                    i = end;
                }
                None => {
                    out.push('!');
                    i += 1;
                }
            },
            '[' => match link_at(&chars, i) {
                Some((label, end)) => {
                    out.push_str(&plain_text(&label));
                    i = end;
                }
                None => {
                    out.push('[');
                    i += 1;
                }
            },
            '<' => match autolink_at(&chars, i) {
                Some((target, end)) => {
                    out.push_str(&target);
                    i = end;
                }
                None => {
                    out.push('<');
                    i += 1;
                }
            },
            '*' | '_' => {
                let run = run_length(&chars, i, c);
                let before = i.checked_sub(1).map(|p| chars[p]);
                let after = chars.get(i + run).copied();
                let spaced = before.is_none_or(char::is_whitespace)
                    && after.is_none_or(char::is_whitespace);
                let intraword = c == '_'
                    && before.is_some_and(char::is_alphanumeric)
                    && after.is_some_and(char::is_alphanumeric);
                if spaced || intraword {
                    out.extend(std::iter::repeat_n(c, run));
                }
                i += run;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

fn run_length(chars: &[char], start: usize, c: char) -> usize {
    chars[start..].iter().take_while(|&&x| x == c).count()
}

fn find_closing_backticks(chars: &[char], from: usize, run: usize) -> Option<usize> {
    let mut i = from;
    while i < chars.len() {
        if chars[i] == '`' {
            let len = run_length(chars, i, '`');
            if len == run {
                return Some(i);
            }
            i += len;
        } else {
            i += 1;
        }
    }
    None
}

/// Inline link `[label](target)` or full reference `[label][ref]` starting at `start`.
/// Returns the label and the index just past the link.
fn link_at(chars: &[char], start: usize) -> Option<(String, usize)> {
    let close = matching(chars, start, '[', ']')?;
    let label: String = chars[start + 1..close].iter().collect();
    match chars.get(close + 1) {
        Some('(') => {
            let end = matching(chars, close + 1, '(', ')')?;
            Some((label, end + 1))
        }
        Some('[') => {
            let end = matching(chars, close + 1, '[', ']')?;
            Some((label, end + 1))
        }
        _ => None,
    }
}

fn matching(chars: &[char], open_at: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open_at;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            i += 2;
            continue;
        }
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

fn autolink_at(chars: &[char], start: usize) -> Option<(String, usize)> {
    let close = chars[start..].iter().position(|&c| c == '>')? + start;
    let inner: String = chars[start + 1..close].iter().collect();
    let is_autolink = !inner.is_empty()
        && !inner.contains(char::is_whitespace)
        && (inner.contains("://") || inner.contains('@') || inner.starts_with("mailto:"));
    is_autolink.then_some((inner, close + 1))
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn indent_of(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4 - (width % 4),
            _ => break,
        }
    }
    width
}

fn join_trimmed(lines: &[&str]) -> String {
    let mut end = lines.len();
    while end > 0 && is_blank(lines[end - 1]) {
        end -= 1;
    }
    lines[..end]
        .iter()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

fn atx_heading(line: &str) -> Option<(u8, String)> {
    if indent_of(line) > 3 {
        return None;
    }
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = &trimmed[hashes..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let content = rest.trim();
    let without_closing = content.trim_end_matches('#');
    let content = if without_closing.is_empty() {
        ""
    } else if without_closing.ends_with(char::is_whitespace) {
        without_closing.trim_end()
    } else {
        content
    };

    // `hashes` is at most 6 here.
    Some((hashes as u8, content.to_string()))
}

fn setext_underline(line: &str) -> Option<u8> {
    if indent_of(line) > 3 {
        return None;
    }
    let trimmed = line.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c == '=') {
        Some(1)
    } else if !trimmed.is_empty() && trimmed.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}

fn is_thematic_break(line: &str) -> bool {
    if indent_of(line) > 3 {
        return false;
    }
    let marks: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    marks.len() >= 3
        && matches!(marks[0], '-' | '*' | '_')
        && marks.iter().all(|&c| c == marks[0])
}

fn is_blockquote(line: &str) -> bool {
    indent_of(line) <= 3 && line.trim_start().starts_with('>')
}

fn is_html_start(line: &str) -> bool {
    if indent_of(line) > 3 {
        return false;
    }
    let mut chars = line.trim_start().chars();
    chars.next() == Some('<')
        && chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!')
}

/// End of the HTML block starting at `start`.
///
/// A comment runs through the line that closes it, blank lines included.
/// Other HTML blocks end at the first blank line.
fn html_end(lines: &[&str], start: usize) -> usize {
    if let Some(rest) = lines[start].trim_start().strip_prefix("<!--") {
        if rest.contains("-->") {
            return start + 1;
        }
        return lines[start + 1..]
            .iter()
            .position(|line| line.contains("-->"))
            .map_or(lines.len(), |offset| start + 1 + offset + 1);
    }

    let mut i = start;
    while i < lines.len() && !is_blank(lines[i]) {
        i += 1;
    }
    i
}

#[derive(Debug, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

fn fence_opening(line: &str) -> Option<Fence> {
    if indent_of(line) > 3 {
        return None;
    }
    let trimmed = line.trim_start();
    let marker = trimmed.chars().next()?;
    if marker != '`' && marker != '~' {
        return None;
    }
    let len = trimmed.chars().take_while(|&c| c == marker).count();
    if len < 3 {
        return None;
    }
    // A backtick fence's info string may not contain backticks.
    if marker == '`' && trimmed[len..].contains('`') {
        return None;
    }
    Some(Fence { marker, len })
}

fn closes_fence(line: &str, fence: &Fence) -> bool {
    if indent_of(line) > 3 {
        return false;
    }
    let trimmed = line.trim();
    let len = trimmed.chars().take_while(|&c| c == fence.marker).count();
    len >= fence.len && trimmed.chars().count() == len
}

/// Width of the list marker (plus one space) if `line` starts a list item.
fn list_marker(line: &str) -> Option<usize> {
    let indent = indent_of(line);
    let trimmed = line.trim_start();
    let mut chars = trimmed.chars();
    let first = chars.next()?;

    let marker_len = if matches!(first, '-' | '*' | '+') {
        1
    } else {
        let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
        if digits == 0 || digits > 9 {
            return None;
        }
        match trimmed[digits..].chars().next() {
            Some('.') | Some(')') => digits + 1,
            _ => return None,
        }
    };

    match trimmed[marker_len..].chars().next() {
        None => Some(indent + marker_len + 1),
        Some(c) if c.is_whitespace() => Some(indent + marker_len + 1),
        _ => None,
    }
}

/// Lines that end a paragraph or lazy continuation without a blank line.
fn interrupts_paragraph(line: &str) -> bool {
    atx_heading(line).is_some()
        || fence_opening(line).is_some()
        || is_thematic_break(line)
        || is_blockquote(line)
        || (indent_of(line) <= 3 && list_marker(line).is_some())
}

/// Index of the first line after the list starting at `start`.
fn list_end(lines: &[&str], start: usize) -> usize {
    let base_indent = indent_of(lines[start]);
    let mut i = start + 1;

    while i < lines.len() {
        let line = lines[i];

        if is_blank(line) {
            let next = lines[i..].iter().position(|l| !is_blank(l)).map(|p| p + i);
            match next {
                Some(n) if continues_list_after_blank(lines[n], base_indent) => {
                    i = n;
                    continue;
                }
                _ => return i,
            }
        }

        let indent = indent_of(line);
        if indent > base_indent {
            i += 1;
            continue;
        }
        if list_marker(line).is_some() && !is_thematic_break(line) {
            i += 1;
            continue;
        }
        if interrupts_paragraph(line) || is_html_start(line) {
            return i;
        }
        // Lazy paragraph continuation.
        i += 1;
    }

    i
}

fn continues_list_after_blank(line: &str, base_indent: usize) -> bool {
    let indent = indent_of(line);
    if indent >= base_indent + 2 {
        return true;
    }
    indent <= 3 && indent >= base_indent && list_marker(line).is_some() && !is_thematic_break(line)
}
