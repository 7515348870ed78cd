use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Removed,
    Modified,
    Renamed,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
            Self::Renamed => "renamed",
        };
        write!(f, "{s}")
    }
}

/// Line range of one side of a hunk, as written in `@@ -start,count +start,count @@`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HunkRange {
    pub start: u32,
    pub count: u32,
}

/// One `@@` block of a section: its header line and raw content lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub header: String,
    pub old: HunkRange,
    pub new: HunkRange,
    pub lines: Vec<String>,
}

impl Hunk {
    /// Text following the closing `@@`, which `diff -p` fills with the
    /// enclosing function or element.
    #[must_use]
    pub fn heading(&self) -> Option<&str> {
        let after_open = self.header.strip_prefix("@@")?;
        let close = after_open.find("@@")?;
        let heading = after_open[close + 2..].trim();
        (!heading.is_empty()).then_some(heading)
    }

    pub fn added_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| line.strip_prefix('+'))
    }

    pub fn removed_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| line.strip_prefix('-'))
    }
}

/// A single file's change within a patch.
///
/// At least one of the two paths is always present; `status` is derived from
/// which paths are present and whether they differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchEntry {
    old_path: Option<String>,
    new_path: Option<String>,
    status: FileStatus,
    header: Vec<String>,
    hunks: Vec<Hunk>,
}

impl PatchEntry {
    /// Returns `None` when neither path is present.
    #[must_use]
    pub fn new(
        old_path: Option<String>,
        new_path: Option<String>,
        header: Vec<String>,
        hunks: Vec<Hunk>,
    ) -> Option<Self> {
        let status = match (&old_path, &new_path) {
            (None, None) => return None,
            (None, Some(_)) => FileStatus::Added,
            (Some(_), None) => FileStatus::Removed,
            (Some(old), Some(new)) if old == new => FileStatus::Modified,
            (Some(_), Some(_)) => FileStatus::Renamed,
        };
        Some(Self {
            old_path,
            new_path,
            status,
            header,
            hunks,
        })
    }

    /// The vendor path this entry is about: the new path, or the old path
    /// for removals.
    #[must_use]
    pub fn path(&self) -> &str {
        self.new_path
            .as_deref()
            .or(self.old_path.as_deref())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn old_path(&self) -> Option<&str> {
        self.old_path.as_deref()
    }

    #[must_use]
    pub fn new_path(&self) -> Option<&str> {
        self.new_path.as_deref()
    }

    #[must_use]
    pub fn status(&self) -> FileStatus {
        self.status
    }

    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    #[must_use]
    pub fn hunks(&self) -> &[Hunk] {
        &self.hunks
    }

    #[must_use]
    pub fn was_added(&self) -> bool {
        self.status == FileStatus::Added
    }

    #[must_use]
    pub fn was_removed(&self) -> bool {
        self.status == FileStatus::Removed
    }

    /// Extension of [`Self::path`] without the dot.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        let file_name = self.path().rsplit('/').next()?;
        let (stem, ext) = file_name.rsplit_once('.')?;
        (!stem.is_empty()).then_some(ext)
    }

    /// Rebuilds the section text: header lines followed by every hunk.
    #[must_use]
    pub fn to_patch_text(&self) -> String {
        let mut out = String::new();
        for line in &self.header {
            out.push_str(line);
            out.push('\n');
        }
        for hunk in &self.hunks {
            out.push_str(&hunk.header);
            out.push('\n');
            for line in &hunk.lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hunk(header: &str, lines: &[&str]) -> Hunk {
        Hunk {
            header: header.to_string(),
            old: HunkRange { start: 1, count: 1 },
            new: HunkRange { start: 1, count: 1 },
            lines: lines.iter().map(ToString::to_string).collect(),
        }
    }

    fn entry(old: Option<&str>, new: Option<&str>) -> Option<PatchEntry> {
        PatchEntry::new(
            old.map(String::from),
            new.map(String::from),
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn status_follows_present_paths() {
        let added = entry(None, Some("vendor/a.php")).expect("entry");
        let removed = entry(Some("vendor/a.php"), None).expect("entry");
        let modified = entry(Some("vendor/a.php"), Some("vendor/a.php")).expect("entry");
        let renamed = entry(Some("vendor/a.php"), Some("vendor/b.php")).expect("entry");

        assert_eq!(added.status(), FileStatus::Added);
        assert_eq!(removed.status(), FileStatus::Removed);
        assert_eq!(modified.status(), FileStatus::Modified);
        assert_eq!(renamed.status(), FileStatus::Renamed);
    }

    #[test]
    fn entry_without_paths_is_rejected() {
        assert!(entry(None, None).is_none());
    }

    #[test]
    fn path_prefers_new_path() {
        let renamed = entry(Some("vendor/a.php"), Some("vendor/b.php")).expect("entry");
        let removed = entry(Some("vendor/a.php"), None).expect("entry");

        assert_eq!(renamed.path(), "vendor/b.php");
        assert_eq!(removed.path(), "vendor/a.php");
    }

    #[test]
    fn extension_ignores_dotfiles_and_directories() {
        let js = entry(None, Some("vendor/x/view/web/a.min.js")).expect("entry");
        let dotfile = entry(None, Some("vendor/x/.htaccess")).expect("entry");
        let bare = entry(None, Some("vendor/x.y/LICENSE")).expect("entry");

        assert_eq!(js.extension(), Some("js"));
        assert_eq!(dotfile.extension(), None);
        assert_eq!(bare.extension(), None);
    }

    #[test]
    fn hunk_heading_is_text_after_closing_marker() {
        let with_heading = hunk("@@ -10,3 +10,4 @@ public function place()", &[]);
        let without = hunk("@@ -1 +1 @@", &[]);

        assert_eq!(with_heading.heading(), Some("public function place()"));
        assert_eq!(without.heading(), None);
    }

    #[test]
    fn hunk_splits_added_and_removed_lines() {
        let h = hunk("@@ -1,2 +1,2 @@", &[" keep", "-old", "+new", "\\ No newline at end of file"]);

        assert_eq!(h.added_lines().collect::<Vec<_>>(), vec!["new"]);
        assert_eq!(h.removed_lines().collect::<Vec<_>>(), vec!["old"]);
    }

    #[test]
    fn to_patch_text_joins_header_and_hunks() {
        let e = PatchEntry::new(
            Some("vendor/a.txt".to_string()),
            Some("vendor/a.txt".to_string()),
            vec!["--- vendor_orig/a.txt".to_string(), "+++ vendor/a.txt".to_string()],
            vec![hunk("@@ -1 +1 @@", &["-a", "+b"])],
        )
        .expect("entry");

        assert_eq!(
            e.to_patch_text(),
            "--- vendor_orig/a.txt\n+++ vendor/a.txt\n@@ -1 +1 @@\n-a\n+b\n"
        );
    }
}
