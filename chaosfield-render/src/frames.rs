//! Frame file naming and ordering for animation sequences.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tracing::debug;

/// File name of frame `index`, zero-padded so plain sorting also works for
/// sequences under ten thousand frames.
pub fn frame_file_name(prefix: &str, index: usize) -> String {
    format!("{prefix}-{index:04}.png")
}

/// A piece of a file name: either a run of digits or a run of anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameChunk {
    Text(String),
    Number(String),
}

impl Ord for NameChunk {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (NameChunk::Number(a), NameChunk::Number(b)) => {
                let a = a.trim_start_matches('0');
                let b = b.trim_start_matches('0');
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (NameChunk::Text(a), NameChunk::Text(b)) => a.cmp(b),
            (NameChunk::Number(_), NameChunk::Text(_)) => Ordering::Less,
            (NameChunk::Text(_), NameChunk::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for NameChunk {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split a name into alternating text and digit runs, so `frame-10` sorts
/// after `frame-9`.
pub fn natural_sort_key(name: &str) -> Vec<NameChunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;
    for ch in name.chars() {
        let digit = ch.is_ascii_digit();
        if !current.is_empty() && digit != in_digits {
            chunks.push(make_chunk(std::mem::take(&mut current), in_digits));
        }
        in_digits = digit;
        current.push(ch);
    }
    if !current.is_empty() {
        chunks.push(make_chunk(current, in_digits));
    }
    chunks
}

fn make_chunk(s: String, digits: bool) -> NameChunk {
    if digits {
        NameChunk::Number(s)
    } else {
        NameChunk::Text(s)
    }
}

/// Sort names in natural order; ties fall back to plain string order.
pub fn sort_naturally(names: &mut [String]) {
    names.sort_by(|a, b| {
        natural_sort_key(a)
            .cmp(&natural_sort_key(b))
            .then_with(|| a.cmp(b))
    });
}

/// All files in `dir` with extension `ext` (case-insensitive), in natural
/// order of their file names.
pub fn list_frames(dir: &Path, ext: &str) -> crate::Result<Vec<PathBuf>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext))
        })
        .filter_map(|path| path.file_name()?.to_str().map(str::to_owned))
        .collect();
    sort_naturally(&mut names);
    debug!(count = names.len(), dir = %dir.display(), "Listed frames");
    Ok(names.into_iter().map(|n| dir.join(n)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_names_are_padded() {
        assert_eq!(frame_file_name("zoom", 0), "zoom-0000.png");
        assert_eq!(frame_file_name("zoom", 42), "zoom-0042.png");
        assert_eq!(frame_file_name("zoom", 12345), "zoom-12345.png");
    }

    #[test]
    fn numbers_sort_by_value() {
        let mut names: Vec<String> = ["f10.png", "f2.png", "f1.png", "f100.png", "f9.png"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        sort_naturally(&mut names);
        assert_eq!(names, ["f1.png", "f2.png", "f9.png", "f10.png", "f100.png"]);
    }

    #[test]
    fn leading_zeros_do_not_change_order() {
        let mut names: Vec<String> = ["a-0010", "a-9", "a-011"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        sort_naturally(&mut names);
        assert_eq!(names, ["a-9", "a-0010", "a-011"]);
    }

    #[test]
    fn key_splits_runs() {
        assert_eq!(
            natural_sort_key("img12b3"),
            vec![
                NameChunk::Text("img".into()),
                NameChunk::Number("12".into()),
                NameChunk::Text("b".into()),
                NameChunk::Number("3".into()),
            ]
        );
        assert!(natural_sort_key("").is_empty());
    }

    #[test]
    fn list_frames_filters_and_orders() {
        let dir = std::env::temp_dir().join(format!("chaosfield_frames_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["f-10.png", "f-2.PNG", "f-1.png", "notes.txt"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }
        std::fs::create_dir_all(dir.join("sub.png")).unwrap();

        let frames = list_frames(&dir, "png").unwrap();
        let names: Vec<_> = frames
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["f-1.png", "f-2.PNG", "f-10.png"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn list_frames_missing_dir_is_error() {
        let dir = std::env::temp_dir().join("chaosfield_frames_does_not_exist_xyz");
        assert!(list_frames(&dir, "png").is_err());
    }
}
