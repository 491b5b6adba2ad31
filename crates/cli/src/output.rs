//! Writing, printing and checking generated sources.

use similar::{ChangeTag, TextDiff};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One generated compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path below the output directory, e.g. `com/acme/OrdersClient.java`.
    pub rel_path: PathBuf,
    /// Formatted Java source.
    pub source: String,
}

/// A generated file compared with what is on disk.
#[derive(Debug)]
struct FileChange<'a> {
    file: &'a GeneratedFile,
    existing: Option<String>,
}

impl<'a> FileChange<'a> {
    fn read(file: &'a GeneratedFile, out_dir: &Path) -> Self {
        Self {
            file,
            existing: fs::read_to_string(out_dir.join(&file.rel_path)).ok(),
        }
    }
}

impl FileChange<'_> {
    fn is_changed(&self) -> bool {
        self.existing.as_deref() != Some(self.file.source.as_str())
    }

    /// Unified diff from the file on disk to the generated source.
    fn diff(&self) -> String {
        let old = self.existing.as_deref().unwrap_or_default();
        let rel = self.file.rel_path.display();
        let diff = TextDiff::from_lines(old, &self.file.source);

        let mut output = String::new();
        if self.existing.is_some() {
            output.push_str(&format!("--- {rel} (current)\n"));
        } else {
            output.push_str(&format!("--- {rel} (missing)\n"));
        }
        output.push_str(&format!("+++ {rel} (generated)\n"));

        for group in diff.grouped_ops(3) {
            let (Some(first), Some(last)) = (group.first(), group.last()) else {
                continue;
            };
            let old_range = first.old_range().start..last.old_range().end;
            let new_range = first.new_range().start..last.new_range().end;
            output.push_str(&format!(
                "@@ -{},{} +{},{} @@\n",
                old_range.start + 1,
                old_range.len(),
                new_range.start + 1,
                new_range.len()
            ));
            for op in &group {
                for change in diff.iter_changes(op) {
                    let sign = match change.tag() {
                        ChangeTag::Delete => '-',
                        ChangeTag::Insert => '+',
                        ChangeTag::Equal => ' ',
                    };
                    output.push(sign);
                    output.push_str(change.value());
                    if change.missing_newline() {
                        output.push('\n');
                    }
                }
            }
        }
        output
    }
}

/// Write every file below `out_dir`, skipping files whose contents match.
/// Returns the number of files written.
pub fn write_all(files: &[GeneratedFile], out_dir: &Path) -> Result<usize, String> {
    let mut written = 0;
    for file in files {
        let change = FileChange::read(file, out_dir);
        let target = out_dir.join(&file.rel_path);
        if !change.is_changed() {
            debug!("{} unchanged, skipping write", target.display());
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| format!("Failed to create {}: {err}", parent.display()))?;
        }
        fs::write(&target, &file.source)
            .map_err(|err| format!("Failed to write {}: {err}", target.display()))?;
        debug!("Wrote {}", target.display());
        written += 1;
    }
    info!("Wrote {written} of {} clients to {}", files.len(), out_dir.display());
    Ok(written)
}

/// Print a diff for every file that differs from `out_dir`. Returns the
/// number of differing files.
pub fn check_all(
    files: &[GeneratedFile],
    out_dir: &Path,
    out: &mut dyn Write,
) -> Result<usize, String> {
    let mut changed = 0;
    for file in files {
        let change = FileChange::read(file, out_dir);
        if change.is_changed() {
            out.write_all(change.diff().as_bytes())
                .map_err(|err| format!("Failed to print diff: {err}"))?;
            changed += 1;
        }
    }
    Ok(changed)
}

/// Print every file, each preceded by a `// path` marker line.
pub fn print_all(files: &[GeneratedFile], out: &mut dyn Write) -> io::Result<()> {
    for file in files {
        writeln!(out, "// {}", file.rel_path.display())?;
        out.write_all(file.source.as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn file(source: &str) -> GeneratedFile {
        GeneratedFile {
            rel_path: PathBuf::from("com/acme/OrdersClient.java"),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_write_skips_unchanged_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![file("class A {}\n")];
        assert_eq!(write_all(&files, dir.path()).unwrap(), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("com/acme/OrdersClient.java")).unwrap(),
            "class A {}\n"
        );
        assert_eq!(write_all(&files, dir.path()).unwrap(), 0);
    }

    #[test]
    fn test_check_reports_hunks() {
        let dir = tempfile::tempdir().unwrap();
        write_all(&[file("a\nb\nc\n")], dir.path()).unwrap();

        let mut out = Vec::new();
        let changed = check_all(&[file("a\nB\nc\n")], dir.path(), &mut out).unwrap();
        assert_eq!(changed, 1);
        let diff = String::from_utf8(out).unwrap();
        assert_eq!(
            diff,
            "--- com/acme/OrdersClient.java (current)\n\
             +++ com/acme/OrdersClient.java (generated)\n\
             @@ -1,3 +1,3 @@\n a\n-b\n+B\n c\n"
        );

        let mut out = Vec::new();
        assert_eq!(check_all(&[file("a\nb\nc\n")], dir.path(), &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_check_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        assert_eq!(check_all(&[file("x\n")], dir.path(), &mut out).unwrap(), 1);
        let diff = String::from_utf8(out).unwrap();
        assert!(diff.starts_with("--- com/acme/OrdersClient.java (missing)\n"));
        assert!(diff.ends_with("+x\n"));
    }

    #[test]
    fn test_print_marks_each_file() {
        let mut out = Vec::new();
        print_all(&[file("class A {}\n")], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "// com/acme/OrdersClient.java\nclass A {}\n"
        );
    }
}
