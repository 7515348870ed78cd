use patch_helper_core::{Hunk, HunkRange, PatchEntry};
use tracing::warn;

use crate::error::ParseError;

const MAX_INPUT_SIZE: usize = 256 * 1024 * 1024;

const NULL_DEVICE: &str = "/dev/null";

// `diff -N` stamps absent files with the epoch, in local time.
const EPOCH_DATES: [&str; 2] = ["1970-01-01", "1969-12-31"];

const GIT_EXTENDED_HEADERS: [&str; 11] = [
    "index ",
    "old mode ",
    "new mode ",
    "new file mode",
    "deleted file mode",
    "similarity index ",
    "dissimilarity index ",
    "rename from ",
    "rename to ",
    "copy from ",
    "copy to ",
];

/// How tree prefixes in section headers are normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    original_prefix: String,
    target_prefix: String,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            original_prefix: String::from("vendor_orig/"),
            target_prefix: String::from("vendor/"),
        }
    }
}

impl ReaderOptions {
    /// Prefix of the "before" tree that is rewritten to the target prefix.
    #[must_use]
    pub fn with_original_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.original_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_target_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.target_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn original_prefix(&self) -> &str {
        &self.original_prefix
    }

    #[must_use]
    pub fn target_prefix(&self) -> &str {
        &self.target_prefix
    }
}

/// A section that could not be turned into an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSection {
    /// 1-based line number where the section starts.
    pub line: usize,
    pub reason: &'static str,
}

#[derive(Debug, Default)]
pub struct ParsedPatch {
    pub entries: Vec<PatchEntry>,
    pub skipped: Vec<SkippedSection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Side {
    Unspecified,
    Absent,
    Path(String),
}

struct Section {
    line: usize,
    git: bool,
    header: Vec<String>,
    diff_paths: Option<(String, String)>,
    old: Side,
    new: Side,
    rename_from: Option<String>,
    rename_to: Option<String>,
    new_file: bool,
    deleted_file: bool,
    // Set once a line other than `diff`, `---`/`+++` or a git extended header
    // (e.g. `Binary files … differ`) belongs to the section.
    has_body: bool,
    hunks: Vec<Hunk>,
    malformed: Option<&'static str>,
}

impl Section {
    fn new(line: usize) -> Self {
        Self {
            line,
            git: false,
            header: Vec::new(),
            diff_paths: None,
            old: Side::Unspecified,
            new: Side::Unspecified,
            rename_from: None,
            rename_to: None,
            new_file: false,
            deleted_file: false,
            has_body: false,
            hunks: Vec::new(),
            malformed: None,
        }
    }

    /// Whether a bare `---`/`+++` header can complete this section.
    fn accepts_file_header(&self, side: &Side) -> bool {
        self.hunks.is_empty() && !self.has_body && *side == Side::Unspecified
    }

    fn into_entry(self, options: &ReaderOptions) -> Result<PatchEntry, &'static str> {
        if let Some(reason) = self.malformed {
            return Err(reason);
        }

        let old = match self.old {
            Side::Path(path) => Some(path),
            Side::Absent => None,
            Side::Unspecified if self.new_file => None,
            Side::Unspecified => match (self.rename_from, &self.diff_paths) {
                (Some(path), _) => Some(path),
                (None, Some((path, _))) => Some(path.clone()),
                (None, None) => return Err("missing original file header"),
            },
        };
        let new = match self.new {
            Side::Path(path) => Some(path),
            Side::Absent => None,
            Side::Unspecified if self.deleted_file => None,
            Side::Unspecified => match (self.rename_to, &self.diff_paths) {
                (Some(path), _) => Some(path),
                (None, Some((_, path))) => Some(path.clone()),
                (None, None) => return Err("missing new file header"),
            },
        };

        let strip_git = self.git
            || (old.as_deref().is_none_or(|p| p.starts_with("a/"))
                && new.as_deref().is_none_or(|p| p.starts_with("b/")));
        let old = old.map(|p| normalize_path(&p, strip_git, options));
        let new = new.map(|p| normalize_path(&p, strip_git, options));

        PatchEntry::new(old, new, self.header, self.hunks)
            .ok_or("both file headers are null placeholders")
    }
}

struct OpenHunk {
    hunk: Hunk,
    old_left: u32,
    new_left: u32,
}

impl OpenHunk {
    fn needs_more(&self) -> bool {
        self.old_left > 0 || self.new_left > 0
    }

    fn push(&mut self, line: &str) -> bool {
        match line.trim_end_matches('\r').as_bytes().first() {
            None | Some(b' ') => {
                self.old_left = self.old_left.saturating_sub(1);
                self.new_left = self.new_left.saturating_sub(1);
            }
            Some(b'-') => self.old_left = self.old_left.saturating_sub(1),
            Some(b'+') => self.new_left = self.new_left.saturating_sub(1),
            Some(b'\\') => {}
            Some(_) => return false,
        }
        self.hunk.lines.push(line.to_string());
        true
    }
}

struct Reader<'o> {
    options: &'o ReaderOptions,
    parsed: ParsedPatch,
    current: Option<Section>,
    hunk: Option<OpenHunk>,
    saw_header: bool,
}

impl<'o> Reader<'o> {
    fn new(options: &'o ReaderOptions) -> Self {
        Self {
            options,
            parsed: ParsedPatch::default(),
            current: None,
            hunk: None,
            saw_header: false,
        }
    }

    /// `line` keeps a trailing `\r`; `next` is the following line, if any.
    fn read_line(&mut self, line_no: usize, line: &str, next: Option<&str>) {
        if let Some(open) = self.hunk.as_mut() {
            if open.needs_more() && opens_file_header(line, next) {
                self.close_hunk();
                if let Some(section) = self.current.as_mut() {
                    section.malformed = Some("hunk ended before its line counts");
                }
            } else if (open.needs_more() || line.starts_with('\\')) && open.push(line) {
                return;
            } else {
                self.close_hunk();
            }
        }
        self.read_header_line(line_no, line);
    }

    fn read_header_line(&mut self, line_no: usize, raw: &str) {
        let line = raw.trim_end_matches('\r');
        if line.starts_with("diff ") {
            let section = self.start_section(line_no);
            section.git = line.starts_with("diff --git ");
            section.diff_paths = parse_diff_line(line);
            section.header.push(raw.to_string());
            return;
        }

        if let Some(rest) = line.strip_prefix("--- ") {
            let reuse = self
                .current
                .as_ref()
                .is_some_and(|s| s.accepts_file_header(&s.old));
            let section = if reuse {
                self.current_section()
            } else {
                self.start_section(line_no)
            };
            section.old = parse_side(rest);
            section.header.push(raw.to_string());
            return;
        }

        if let Some(rest) = line.strip_prefix("+++ ") {
            let reuse = self
                .current
                .as_ref()
                .is_some_and(|s| s.accepts_file_header(&s.new));
            let section = if reuse {
                self.current_section()
            } else {
                self.start_section(line_no)
            };
            section.new = parse_side(rest);
            section.header.push(raw.to_string());
            return;
        }

        if line.starts_with("@@") {
            let Some(section) = self.current.as_mut() else {
                return;
            };
            match parse_hunk_header(line) {
                Some((old, new)) => {
                    self.hunk = Some(OpenHunk {
                        hunk: Hunk {
                            header: raw.to_string(),
                            old,
                            new,
                            lines: Vec::new(),
                        },
                        old_left: old.count,
                        new_left: new.count,
                    });
                }
                None => section.malformed = Some("unparsable hunk header"),
            }
            return;
        }

        if line.starts_with("Only in ") {
            return;
        }

        let Some(section) = self.current.as_mut() else {
            return;
        };
        if !section.hunks.is_empty() {
            return;
        }
        if let Some(path) = line.strip_prefix("rename from ") {
            section.rename_from = Some(path.to_string());
        } else if let Some(path) = line.strip_prefix("rename to ") {
            section.rename_to = Some(path.to_string());
        } else if line.starts_with("new file mode") {
            section.new_file = true;
        } else if line.starts_with("deleted file mode") {
            section.deleted_file = true;
        }
        if !GIT_EXTENDED_HEADERS.iter().any(|prefix| line.starts_with(prefix)) {
            section.has_body = true;
        }
        section.header.push(raw.to_string());
    }

    fn start_section(&mut self, line_no: usize) -> &mut Section {
        self.finish_section();
        self.saw_header = true;
        self.current.insert(Section::new(line_no))
    }

    fn current_section(&mut self) -> &mut Section {
        self.current.get_or_insert_with(|| Section::new(0))
    }

    fn close_hunk(&mut self) {
        if let (Some(open), Some(section)) = (self.hunk.take(), self.current.as_mut()) {
            section.hunks.push(open.hunk);
        }
    }

    fn finish_section(&mut self) {
        self.close_hunk();
        let Some(section) = self.current.take() else {
            return;
        };
        let line = section.line;
        match section.into_entry(self.options) {
            Ok(entry) => self.parsed.entries.push(entry),
            Err(reason) => {
                warn!(line, reason, "skipping malformed patch section");
                self.parsed.skipped.push(SkippedSection { line, reason });
            }
        }
    }
}

/// Parses a unified diff with the default `vendor_orig/` → `vendor/` prefixes.
///
/// # Errors
///
/// Returns [`ParseError::NoDiffHeaders`] when non-blank input contains no
/// section header at all.
pub fn parse_patch(content: &str) -> Result<ParsedPatch, ParseError> {
    parse_patch_with(content, &ReaderOptions::default())
}

/// # Errors
///
/// Returns an error if the input is too large or contains no diff headers.
pub fn parse_patch_with(content: &str, options: &ReaderOptions) -> Result<ParsedPatch, ParseError> {
    if content.len() > MAX_INPUT_SIZE {
        return Err(ParseError::InputTooLarge {
            max_bytes: MAX_INPUT_SIZE,
        });
    }

    let mut reader = Reader::new(options);
    let mut lines = content
        .split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line))
        .enumerate()
        .peekable();
    while let Some((index, line)) = lines.next() {
        let next = lines.peek().map(|&(_, next)| next);
        reader.read_line(index + 1, line, next);
    }
    reader.finish_section();

    if !reader.saw_header && !content.trim().is_empty() {
        return Err(ParseError::NoDiffHeaders);
    }
    Ok(reader.parsed)
}

/// A `--- ` line directly followed by `+++ ` starts a new file section.
fn opens_file_header(line: &str, next: Option<&str>) -> bool {
    line.starts_with("--- ") && next.is_some_and(|next| next.starts_with("+++ "))
}

fn parse_side(rest: &str) -> Side {
    let (path, timestamp) = match rest.split_once('\t') {
        Some((path, timestamp)) => (path, Some(timestamp.trim_start())),
        None => (rest, None),
    };
    let path = path.trim_end();
    let epoch = timestamp.is_some_and(|t| EPOCH_DATES.iter().any(|date| t.starts_with(date)));
    if path == NULL_DEVICE || epoch {
        Side::Absent
    } else if path.is_empty() {
        Side::Unspecified
    } else {
        Side::Path(path.to_string())
    }
}

fn parse_diff_line(line: &str) -> Option<(String, String)> {
    let mut tokens = line.split_whitespace().rev();
    let new = tokens.next()?;
    let old = tokens.next()?;
    if old.starts_with('-') || old == "diff" {
        return None;
    }
    Some((old.to_string(), new.to_string()))
}

fn parse_hunk_header(line: &str) -> Option<(HunkRange, HunkRange)> {
    let mut parts = line.strip_prefix("@@ ")?.split_whitespace();
    let old = parse_range(parts.next()?.strip_prefix('-')?)?;
    let new = parse_range(parts.next()?.strip_prefix('+')?)?;
    parts.next()?.starts_with("@@").then_some((old, new))
}

fn parse_range(range: &str) -> Option<HunkRange> {
    let (start, count) = match range.split_once(',') {
        Some((start, count)) => (start.parse().ok()?, count.parse().ok()?),
        None => (range.parse().ok()?, 1),
    };
    Some(HunkRange { start, count })
}

fn normalize_path(path: &str, strip_git: bool, options: &ReaderOptions) -> String {
    let mut path = path.trim();
    if strip_git {
        path = path
            .strip_prefix("a/")
            .or_else(|| path.strip_prefix("b/"))
            .unwrap_or(path);
    }
    let path = path.strip_prefix("./").unwrap_or(path);
    match path.strip_prefix(options.original_prefix()) {
        Some(rest) if !options.original_prefix().is_empty() => {
            format!("{}{rest}", options.target_prefix())
        }
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patch_helper_core::FileStatus;

    const MODIFIED: &str = "\
diff -urN vendor_orig/magento/module-checkout/Model/Cart.php vendor/magento/module-checkout/Model/Cart.php
--- vendor_orig/magento/module-checkout/Model/Cart.php\t2024-01-01 10:00:00.000000000 +0000
+++ vendor/magento/module-checkout/Model/Cart.php\t2024-02-01 10:00:00.000000000 +0000
@@ -10,3 +10,3 @@ class Cart
     public function save()
     {
-        return 1;
+        return 2;
";

    #[test]
    fn reads_modified_file_with_timestamps() {
        let parsed = parse_patch(MODIFIED).expect("should parse");

        assert_eq!(parsed.entries.len(), 1);
        assert!(parsed.skipped.is_empty());
        let entry = &parsed.entries[0];
        assert_eq!(entry.status(), FileStatus::Modified);
        assert_eq!(entry.path(), "vendor/magento/module-checkout/Model/Cart.php");
        assert_eq!(
            entry.old_path(),
            Some("vendor/magento/module-checkout/Model/Cart.php")
        );
        assert_eq!(entry.hunks().len(), 1);
        assert_eq!(entry.hunks()[0].lines.len(), 4);
        assert_eq!(entry.hunks()[0].heading(), Some("class Cart"));
    }

    #[test]
    fn epoch_timestamp_marks_added_file() {
        let patch = "\
diff -urN vendor_orig/magento/module-a/new.js vendor/magento/module-a/new.js
--- vendor_orig/magento/module-a/new.js\t1970-01-01 00:00:00.000000000 +0000
+++ vendor/magento/module-a/new.js\t2024-02-01 10:00:00.000000000 +0000
@@ -0,0 +1,1 @@
+define([], function () {});
";
        let parsed = parse_patch(patch).expect("should parse");

        assert_eq!(parsed.entries[0].status(), FileStatus::Added);
        assert_eq!(parsed.entries[0].old_path(), None);
        assert_eq!(parsed.entries[0].path(), "vendor/magento/module-a/new.js");
    }

    #[test]
    fn local_time_epoch_marks_removed_file() {
        let patch = "\
--- vendor_orig/magento/module-a/old.js\t2024-02-01 10:00:00.000000000 -0500
+++ vendor/magento/module-a/old.js\t1969-12-31 19:00:00.000000000 -0500
@@ -1,1 +0,0 @@
-define([], function () {});
";
        let parsed = parse_patch(patch).expect("should parse");

        assert_eq!(parsed.entries[0].status(), FileStatus::Removed);
        assert_eq!(parsed.entries[0].new_path(), None);
        assert_eq!(parsed.entries[0].path(), "vendor/magento/module-a/old.js");
    }

    #[test]
    fn git_sections_strip_tree_prefixes() {
        let patch = "\
diff --git a/vendor/magento/module-a/a.php b/vendor/magento/module-a/a.php
index 1111111..2222222 100644
--- a/vendor/magento/module-a/a.php
+++ b/vendor/magento/module-a/a.php
@@ -1 +1 @@
-a
+b
diff --git a/vendor/magento/module-a/gone.php b/vendor/magento/module-a/gone.php
deleted file mode 100644
--- a/vendor/magento/module-a/gone.php
+++ /dev/null
@@ -1 +0,0 @@
-gone
";
        let parsed = parse_patch(patch).expect("should parse");

        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.entries[0].path(), "vendor/magento/module-a/a.php");
        assert_eq!(parsed.entries[0].status(), FileStatus::Modified);
        assert_eq!(parsed.entries[1].status(), FileStatus::Removed);
    }

    #[test]
    fn git_rename_without_content_uses_extended_headers() {
        let patch = "\
diff --git a/vendor/x/Old.php b/vendor/x/New.php
similarity index 100%
rename from vendor/x/Old.php
rename to vendor/x/New.php
";
        let parsed = parse_patch(patch).expect("should parse");

        let entry = &parsed.entries[0];
        assert_eq!(entry.status(), FileStatus::Renamed);
        assert_eq!(entry.old_path(), Some("vendor/x/Old.php"));
        assert_eq!(entry.new_path(), Some("vendor/x/New.php"));
        assert!(entry.hunks().is_empty());
    }

    #[test]
    fn binary_section_falls_back_to_diff_line_paths() {
        let patch = "\
diff -urN vendor_orig/x/logo.png vendor/x/logo.png
Binary files vendor_orig/x/logo.png and vendor/x/logo.png differ
";
        let parsed = parse_patch(patch).expect("should parse");

        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].status(), FileStatus::Modified);
        assert_eq!(parsed.entries[0].path(), "vendor/x/logo.png");
    }

    #[test]
    fn binary_section_is_not_merged_with_following_header_pair() {
        let patch = "\
diff -urN vendor_orig/x/logo.png vendor/x/logo.png
Binary files vendor_orig/x/logo.png and vendor/x/logo.png differ
--- vendor_orig/x/a.txt
+++ vendor/x/a.txt
@@ -1 +1 @@
-a
+b
";
        let parsed = parse_patch(patch).expect("should parse");

        let paths: Vec<_> = parsed.entries.iter().map(PatchEntry::path).collect();
        assert_eq!(paths, vec!["vendor/x/logo.png", "vendor/x/a.txt"]);
        assert!(parsed.entries[0].hunks().is_empty());
        assert_eq!(parsed.entries[1].hunks()[0].lines, vec!["-a", "+b"]);
    }

    #[test]
    fn git_extended_headers_still_precede_file_headers() {
        let patch = "\
diff --git a/vendor/x/a.txt b/vendor/x/a.txt
index 1111111..2222222 100644
--- a/vendor/x/a.txt
+++ b/vendor/x/a.txt
@@ -1 +1 @@
-a
+b
";
        let parsed = parse_patch(patch).expect("should parse");

        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].header().len(), 4);
    }

    #[test]
    fn truncated_hunk_does_not_swallow_next_section() {
        let patch = "\
--- vendor_orig/x/a.txt
+++ vendor/x/a.txt
@@ -1,5 +1,5 @@
-a
+b
--- vendor_orig/x/b.txt
+++ vendor/x/b.txt
@@ -1 +1 @@
-c
+d
";
        let parsed = parse_patch(patch).expect("should parse");

        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].path(), "vendor/x/b.txt");
        assert_eq!(
            parsed.skipped,
            vec![SkippedSection {
                line: 1,
                reason: "hunk ended before its line counts"
            }]
        );
    }

    #[test]
    fn removed_line_resembling_header_stays_in_hunk() {
        let patch = "\
--- vendor_orig/x/README.md
+++ vendor/x/README.md
@@ -1,2 +1,1 @@
 title
--- rule
";
        let parsed = parse_patch(patch).expect("should parse");

        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].hunks()[0].lines, vec![" title", "--- rule"]);
    }

    #[test]
    fn no_newline_marker_stays_with_hunk() {
        let patch = "\
--- vendor_orig/x/a.txt
+++ vendor/x/a.txt
@@ -1 +1 @@
-a
\\ No newline at end of file
+b
\\ No newline at end of file
";
        let parsed = parse_patch(patch).expect("should parse");

        assert_eq!(parsed.entries[0].hunks()[0].lines.len(), 4);
    }

    #[test]
    fn section_with_only_old_header_is_skipped() {
        let patch = "\
--- vendor_orig/x/broken.php
diff -urN vendor_orig/x/ok.php vendor/x/ok.php
--- vendor_orig/x/ok.php
+++ vendor/x/ok.php
@@ -1 +1 @@
-a
+b
";
        let parsed = parse_patch(patch).expect("should parse");

        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].path(), "vendor/x/ok.php");
        assert_eq!(
            parsed.skipped,
            vec![SkippedSection {
                line: 1,
                reason: "missing new file header"
            }]
        );
    }

    #[test]
    fn unparsable_hunk_header_skips_section() {
        let patch = "\
--- vendor_orig/x/a.php
+++ vendor/x/a.php
@@ -x +y @@
-a
+b
";
        let parsed = parse_patch(patch).expect("should parse");

        assert!(parsed.entries.is_empty());
        assert_eq!(parsed.skipped[0].reason, "unparsable hunk header");
    }

    #[test]
    fn both_placeholders_skip_section() {
        let patch = "--- /dev/null\n+++ /dev/null\n";
        let parsed = parse_patch(patch).expect("should parse");

        assert!(parsed.entries.is_empty());
        assert_eq!(parsed.skipped.len(), 1);
    }

    #[test]
    fn empty_input_yields_no_entries() {
        let parsed = parse_patch("").expect("should parse");
        assert!(parsed.entries.is_empty());

        let parsed = parse_patch("  \n\n").expect("should parse");
        assert!(parsed.entries.is_empty());
    }

    #[test]
    fn text_without_headers_is_an_error() {
        let err = parse_patch("just some notes\nnothing to see\n").expect_err("should fail");

        assert!(matches!(err, ParseError::NoDiffHeaders));
    }

    #[test]
    fn only_in_lines_between_sections_are_ignored() {
        let patch = "\
Only in vendor/x: extra.php
--- vendor_orig/x/a.php
+++ vendor/x/a.php
@@ -1 +1 @@
-a
+b
Only in vendor_orig/x: removed.php
";
        let parsed = parse_patch(patch).expect("should parse");

        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].hunks()[0].lines, vec!["-a", "+b"]);
    }

    #[test]
    fn custom_original_prefix_is_rewritten() {
        let patch = "--- old/x/a.php\n+++ vendor/x/a.php\n@@ -1 +1 @@\n-a\n+b\n";
        let options = ReaderOptions::default().with_original_prefix("old/");

        let parsed = parse_patch_with(patch, &options).expect("should parse");

        assert_eq!(parsed.entries[0].status(), FileStatus::Modified);
    }

    #[test]
    fn parses_hunk_ranges_with_and_without_counts() {
        let (old, new) = parse_hunk_header("@@ -3 +4,0 @@").expect("valid header");

        assert_eq!(old, HunkRange { start: 3, count: 1 });
        assert_eq!(new, HunkRange { start: 4, count: 0 });
        assert!(parse_hunk_header("@@ -3 +4").is_none());
    }
}
