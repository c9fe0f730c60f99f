//! Best-effort comment extraction.
//!
//! Neither `serde_yaml` nor `toml` keeps comments, so they are recovered by a
//! line scan over the same text the parser saw. A run of consecutive `#`
//! lines belongs to the key on the line right after it; a blank line or any
//! other non-key line in between drops the run. Each stored line is trimmed
//! and keeps its leading `#`.
//!
//! The TOML scan honours quoted key segments (`["a.b"]` is one segment) and
//! skips the body of multi-line strings. The YAML scan skips block scalars.
//! Flow collections spanning several lines are not tracked in either format.

use indexmap::IndexMap;

use crate::types::FileFormat;

/// Comment blocks keyed by dotted field path.
pub type CommentMap = IndexMap<String, Vec<String>>;

pub fn extract(format: FileFormat, text: &str) -> CommentMap {
    match format {
        FileFormat::Yaml => extract_yaml(text),
        FileFormat::Toml => extract_toml(text),
        FileFormat::Json => CommentMap::new(),
    }
}

fn extract_yaml(text: &str) -> CommentMap {
    let mut comments = CommentMap::new();
    let mut tracker = YamlKeyTracker::default();
    let mut pending: Vec<String> = Vec::new();

    for line in text.lines() {
        match tracker.classify(line) {
            YamlLine::Comment => pending.push(line.trim().to_string()),
            YamlLine::Key(Some(path)) if !pending.is_empty() => {
                comments.insert(path, std::mem::take(&mut pending));
            }
            _ => pending.clear(),
        }
    }
    comments
}

fn extract_toml(text: &str) -> CommentMap {
    let mut comments = CommentMap::new();
    let mut pending: Vec<String> = Vec::new();
    // `None` inside an array of tables, whose keys have no stable path.
    let mut section: Option<String> = Some(String::new());
    // Closing delimiter of a multi-line string opened on an earlier line.
    let mut open_string: Option<&str> = None;

    for line in text.lines() {
        if let Some(delim) = open_string {
            if line.contains(delim) {
                open_string = None;
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            pending.push(trimmed.to_string());
            continue;
        }

        if trimmed.starts_with("[[") {
            section = None;
        } else if let Some(header) = trimmed.strip_prefix('[') {
            let name = find_unquoted(header, ']').map_or(header, |end| &header[..end]);
            let path = toml_key_path(name);
            if let Some(path) = &path
                && !pending.is_empty()
            {
                comments.insert(path.clone(), std::mem::take(&mut pending));
            }
            section = path;
        } else if let Some(eq) = find_unquoted(trimmed, '=') {
            open_string = unterminated_multiline(&trimmed[eq + 1..]);
            if let Some(key) = toml_key_path(&trimmed[..eq])
                && let Some(section) = &section
                && !pending.is_empty()
            {
                comments.insert(join_path(section, &key), std::mem::take(&mut pending));
            }
        }
        pending.clear();
    }
    comments
}

/// Byte offset of the first `target` outside a quoted string.
fn find_unquoted(s: &str, target: char) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == target => return Some(i),
            None if c == '"' || c == '\'' => quote = Some(c),
            None => {}
        }
    }
    None
}

/// The closing delimiter when `value` opens a `"""` or `'''` string that
/// does not end on the same line.
fn unterminated_multiline(value: &str) -> Option<&'static str> {
    let value = value.trim_start();
    ["\"\"\"", "'''"].into_iter().find(|delim| {
        value
            .strip_prefix(*delim)
            .is_some_and(|body| !body.contains(*delim))
    })
}

/// Normalise a TOML key or header (`a . "b.c" . d`) to a dotted path.
/// `None` if it is not a key at all, e.g. an inline table inside an array.
fn toml_key_path(raw: &str) -> Option<String> {
    let mut segments = Vec::new();
    let mut rest = raw;
    loop {
        let end = find_unquoted(rest, '.').unwrap_or(rest.len());
        segments.push(toml_key_segment(rest[..end].trim())?);
        if end == rest.len() {
            break;
        }
        rest = &rest[end + 1..];
    }
    Some(segments.join("."))
}

fn toml_key_segment(raw: &str) -> Option<&str> {
    for quote in ['"', '\''] {
        if let Some(inner) = raw.strip_prefix(quote).and_then(|s| s.strip_suffix(quote)) {
            return Some(inner);
        }
    }
    let bare = !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    bare.then_some(raw)
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Render stored comment lines for writing. Lines without a leading `#`
/// get one.
pub(crate) fn render_block(lines: &[String], indent: &str) -> String {
    let mut out = String::new();
    for line in lines {
        let line = line.trim();
        out.push_str(indent);
        if !line.starts_with('#') {
            out.push_str("# ");
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// What a single YAML line is, as far as comments are concerned.
#[derive(Debug, PartialEq)]
pub(crate) enum YamlLine {
    Blank,
    Comment,
    /// A mapping key. `None` when the key sits inside a sequence item and so
    /// has no dotted path.
    Key(Option<String>),
    Other,
}

/// Follows YAML block indentation to know the dotted path of each key line.
#[derive(Debug, Default)]
pub(crate) struct YamlKeyTracker {
    /// Open keys by indentation; `None` marks a sequence item.
    stack: Vec<(usize, Option<String>)>,
    /// Indentation of a key whose value is a `|` or `>` block scalar.
    block_scalar: Option<usize>,
}

impl YamlKeyTracker {
    pub(crate) fn classify(&mut self, line: &str) -> YamlLine {
        let content = line.trim_start();
        if content.trim_end().is_empty() {
            return YamlLine::Blank;
        }
        let indent = line.len() - content.len();

        if let Some(block) = self.block_scalar {
            if indent > block {
                return YamlLine::Other;
            }
            self.block_scalar = None;
        }

        if content.starts_with('#') {
            return YamlLine::Comment;
        }
        if content.starts_with("---") || content.starts_with("...") {
            self.stack.clear();
            return YamlLine::Other;
        }

        while self.stack.last().is_some_and(|(depth, _)| *depth >= indent) {
            self.stack.pop();
        }

        if content == "-" || content.starts_with("- ") {
            self.stack.push((indent, None));
            return YamlLine::Other;
        }

        let Some((key, rest)) = split_yaml_key(content) else {
            return YamlLine::Other;
        };
        let addressable = self.stack.iter().all(|(_, key)| key.is_some());
        let path = addressable.then(|| {
            self.stack
                .iter()
                .filter_map(|(_, key)| key.as_deref())
                .chain(std::iter::once(key.as_str()))
                .collect::<Vec<_>>()
                .join(".")
        });

        let rest = rest.trim_start();
        if rest.starts_with('|') || rest.starts_with('>') {
            self.block_scalar = Some(indent);
        }
        self.stack.push((indent, Some(key)));
        YamlLine::Key(path)
    }
}

/// Split `key: rest` into its unquoted key and the text after the colon.
fn split_yaml_key(content: &str) -> Option<(String, &str)> {
    if let Some(quote) = content.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let body = &content[1..];
        let end = body.find(quote)?;
        let rest = body[end + 1..].strip_prefix(':')?;
        if !(rest.is_empty() || rest.starts_with(' ')) {
            return None;
        }
        return Some((body[..end].to_string(), rest));
    }

    if content.starts_with(['{', '[', '&', '*', '!', '|', '>']) {
        return None;
    }
    let colon = content
        .char_indices()
        .find(|(i, c)| *c == ':' && matches!(content[i + 1..].chars().next(), None | Some(' ')))
        .map(|(i, _)| i)?;
    let key = content[..colon].trim_end();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), &content[colon + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // --- YAML ---

    #[test]
    fn yaml_top_level_comment() {
        let text = "# listen port\n# (tcp)\nport: 8080\nhost: localhost\n";
        let comments = extract(FileFormat::Yaml, text);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments["port"], lines(&["# listen port", "# (tcp)"]));
    }

    #[test]
    fn yaml_nested_paths() {
        let text = "\
database:
  # connection string
  url: pg://
  pool:
    # max connections
    size: 5
";
        let comments = extract(FileFormat::Yaml, text);
        assert_eq!(comments["database.url"], lines(&["# connection string"]));
        assert_eq!(comments["database.pool.size"], lines(&["# max connections"]));
    }

    #[test]
    fn yaml_dedent_returns_to_parent_level() {
        let text = "a:\n  b: 1\n# about c\nc: 2\n";
        let comments = extract(FileFormat::Yaml, text);
        assert_eq!(comments["c"], lines(&["# about c"]));
    }

    #[test]
    fn yaml_blank_line_discards_pending() {
        let text = "# file header\n\nport: 8080\n";
        assert!(extract(FileFormat::Yaml, text).is_empty());
    }

    #[test]
    fn yaml_sequence_items_not_addressable() {
        let text = "servers:\n  # first\n  - name: a\n    # its port\n    port: 1\n# after\nnext: 2\n";
        let comments = extract(FileFormat::Yaml, text);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments["next"], lines(&["# after"]));
    }

    #[test]
    fn yaml_quoted_keys() {
        let text = "# code\n'404': missing\n";
        let comments = extract(FileFormat::Yaml, text);
        assert_eq!(comments["404"], lines(&["# code"]));
    }

    #[test]
    fn yaml_block_scalar_content_is_skipped() {
        let text = "motd: |\n  # not a comment\n  line: two\n# real\nafter: 1\n";
        let comments = extract(FileFormat::Yaml, text);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments["after"], lines(&["# real"]));
    }

    #[test]
    fn yaml_url_value_is_not_a_key_split() {
        let mut tracker = YamlKeyTracker::default();
        assert_eq!(
            tracker.classify("url: http://example.com"),
            YamlLine::Key(Some("url".into()))
        );
    }

    #[test]
    fn tracker_classifies_lines() {
        let mut tracker = YamlKeyTracker::default();
        assert_eq!(tracker.classify("   "), YamlLine::Blank);
        assert_eq!(tracker.classify("  # c"), YamlLine::Comment);
        assert_eq!(tracker.classify("a:"), YamlLine::Key(Some("a".into())));
        assert_eq!(tracker.classify("  b: 1"), YamlLine::Key(Some("a.b".into())));
        assert_eq!(tracker.classify("list:"), YamlLine::Key(Some("list".into())));
        assert_eq!(tracker.classify("- x"), YamlLine::Other);
        assert_eq!(tracker.classify("plain scalar"), YamlLine::Other);
    }

    // --- TOML ---

    #[test]
    fn toml_keys_and_sections() {
        let text = "\
# the port
port = 8080

# database settings
[database]
# connection string
url = \"pg://\"
";
        let comments = extract(FileFormat::Toml, text);
        assert_eq!(comments["port"], lines(&["# the port"]));
        assert_eq!(comments["database"], lines(&["# database settings"]));
        assert_eq!(comments["database.url"], lines(&["# connection string"]));
    }

    #[test]
    fn toml_dotted_headers_and_keys() {
        let text = "[a . \"b\"]\n# deep\nc.d = 1\n";
        let comments = extract(FileFormat::Toml, text);
        assert_eq!(comments["a.b.c.d"], lines(&["# deep"]));
    }

    #[test]
    fn toml_quoted_header_segment_keeps_dots() {
        let text = "# hosts\n[site.\"example.com\"]\n# tls port\nport = 443\n[\"x]y\"]\n# z\n'a.b' = 1\n";
        let comments = extract(FileFormat::Toml, text);
        assert_eq!(comments["site.example.com"], lines(&["# hosts"]));
        assert_eq!(comments["site.example.com.port"], lines(&["# tls port"]));
        assert_eq!(comments["x]y.a.b"], lines(&["# z"]));
    }

    #[test]
    fn toml_multiline_string_content_is_skipped() {
        let text = "\
banner = \"\"\"
# not a comment
key = 1
\"\"\"
# real
after = 2
raw = '''
# also text'''
inline = \"\"\"one line\"\"\"
# kept
last = 3
";
        let comments = extract(FileFormat::Toml, text);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments["after"], lines(&["# real"]));
        assert_eq!(comments["last"], lines(&["# kept"]));
    }

    #[test]
    fn toml_inline_tables_in_arrays_are_not_keys() {
        let text = "servers = [\n  # first\n  { name = \"a\" },\n]\n";
        assert!(extract(FileFormat::Toml, text).is_empty());
    }

    #[test]
    fn toml_array_of_tables_not_addressable() {
        let text = "[[servers]]\n# ignored\nname = \"a\"\n[other]\n# kept\nx = 1\n";
        let comments = extract(FileFormat::Toml, text);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments["other.x"], lines(&["# kept"]));
    }

    #[test]
    fn toml_blank_line_discards_pending() {
        let text = "# header\n\nport = 1\n";
        assert!(extract(FileFormat::Toml, text).is_empty());
    }

    #[test]
    fn json_has_no_comments() {
        assert!(extract(FileFormat::Json, "{\"a\": 1}").is_empty());
    }

    // --- rendering ---

    #[test]
    fn render_block_indents_and_adds_hash() {
        let block = render_block(&lines(&["# one", "two"]), "  ");
        assert_eq!(block, "  # one\n  # two\n");
    }
}
