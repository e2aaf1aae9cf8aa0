//! Offline data directory inventory
//!
//! Lists every file under the data root as an absolute path and writes the
//! list as a one-column CSV. The ingestion process turns that list into
//! alias records.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const CSV_HEADER: &str = "file_path";

/// All regular files below `root`, absolute and sorted.
pub fn collect_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let root = std::fs::canonicalize(root)?;
    let mut files = Vec::new();

    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Write `paths` as CSV with a `file_path` header row.
pub fn write_csv<W: Write>(paths: &[PathBuf], out: W) -> io::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([CSV_HEADER])?;
    for path in paths {
        let field = path.to_string_lossy();
        writer.write_record([field.as_bytes()])?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_collect_files_recursive_absolute() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("data");
        fs::create_dir_all(root.join("YEP6/nested")).unwrap();
        fs::write(root.join("b.png"), b"b").unwrap();
        fs::write(root.join("YEP6/a.png"), b"a").unwrap();
        fs::write(root.join("YEP6/nested/c d.png"), b"c").unwrap();

        let files = collect_files(&root).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|p| p.is_absolute()));

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "c d.png", "b.png"]);
    }

    #[test]
    fn test_collect_files_missing_root() {
        let dir = tempdir().unwrap();
        assert!(collect_files(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_write_csv_quotes_when_needed() {
        let paths = vec![
            PathBuf::from("/srv/data/a.png"),
            PathBuf::from("/srv/data/x,y.png"),
            PathBuf::from("/srv/data/say \"hi\".png"),
        ];
        let mut out = Vec::new();
        write_csv(&paths, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "file_path",
                "/srv/data/a.png",
                "\"/srv/data/x,y.png\"",
                "\"/srv/data/say \"\"hi\"\".png\"",
            ]
        );
    }
}
