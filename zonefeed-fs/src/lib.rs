//! Capability-scoped file access for zonefeed inputs and outputs.
//!
//! Every path handled by the pipeline is UTF-8, so the helpers take
//! [`Utf8Path`] and resolve an ambient directory handle with `cap-std`
//! before touching the file itself.
#![forbid(unsafe_code)]

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io::{self, Read};

/// Open an existing file for reading.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read a whole UTF-8 text file into memory.
pub fn read_utf8_to_string(path: &Utf8Path) -> io::Result<String> {
    let mut file = open_utf8_file(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Create or truncate `path` for writing, creating missing parent
/// directories first.
pub fn create_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    ensure_parent_dir(path)?;
    let (dir, name) = parent_dir_and_name(path)?;
    dir.create(name)
}

/// Whether `path` names an existing regular file.
///
/// A missing file or a missing parent directory both report `false`;
/// other I/O failures are returned.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = match parent_dir_and_name(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    match dir.metadata(&name) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Create every missing ancestor directory of `path`.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) else {
        return Ok(());
    };
    let (anchor, relative) = split_anchor(&absolute_utf8(parent)?);
    if relative.as_str().is_empty() {
        return Ok(());
    }
    fs_utf8::Dir::open_ambient_dir(&anchor, ambient_authority())?.create_dir_all(&relative)
}

fn parent_dir_and_name(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name.to_owned()))
}

/// Resolve `path` against the working directory without touching the
/// filesystem. `..` components are kept.
fn absolute_utf8(path: &Utf8Path) -> io::Result<Utf8PathBuf> {
    let resolved = std::path::absolute(path)?;
    Utf8PathBuf::from_path_buf(resolved).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            "working directory is not valid UTF-8",
        )
    })
}

/// Split a directory path into the root or prefix it hangs from and the
/// remaining relative components. Relative paths hang from `.`, which
/// cap-std refuses to leave, so callers pass absolute paths when `..` may
/// appear.
fn split_anchor(dir: &Utf8Path) -> (Utf8PathBuf, Utf8PathBuf) {
    let mut anchor = Utf8PathBuf::new();
    let mut relative = Utf8PathBuf::new();
    for component in dir.components() {
        match component {
            Utf8Component::Prefix(_) | Utf8Component::RootDir => anchor.push(component),
            other => relative.push(other),
        }
    }
    if anchor.as_str().is_empty() {
        anchor.push(".");
    }
    (anchor, relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_path_buf()).expect("temp path is UTF-8")
    }

    #[rstest]
    #[case("/srv/data", "/", "srv/data")]
    #[case("data/out", ".", "data/out")]
    #[case("/", "/", "")]
    fn splits_anchor(#[case] dir: &str, #[case] anchor: &str, #[case] relative: &str) {
        let (found_anchor, found_relative) = split_anchor(Utf8Path::new(dir));
        assert_eq!(found_anchor, Utf8PathBuf::from(anchor));
        assert_eq!(found_relative, Utf8PathBuf::from(relative));
    }

    #[test]
    fn creates_nested_output_and_reads_it_back() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let target = utf8(tmp.path()).join("public/data/zones.geojson");

        let mut file = create_utf8_file(&target).expect("create output");
        file.write_all(b"{}").expect("write output");
        drop(file);

        assert!(file_is_file(&target).expect("stat output"));
        assert_eq!(read_utf8_to_string(&target).expect("read back"), "{}");
    }

    /// Spell `target` relative to the working directory, climbing to the
    /// filesystem root with `..` first.
    fn via_parent_components(target: &Utf8Path) -> Utf8PathBuf {
        let cwd = absolute_utf8(Utf8Path::new(".")).expect("working directory");
        let depth = cwd
            .components()
            .filter(|component| matches!(component, Utf8Component::Normal(_)))
            .count();
        let mut relative = Utf8PathBuf::new();
        for _ in 0..depth {
            relative.push("..");
        }
        for component in target.components() {
            if let Utf8Component::Normal(part) = component {
                relative.push(part);
            }
        }
        relative
    }

    #[test]
    fn creates_output_reached_through_parent_components() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let target = utf8(tmp.path()).join("frontend/public/data/residential_zones.geojson");
        let relative = via_parent_components(&target);
        assert!(relative.starts_with(".."));

        let mut file = create_utf8_file(&relative).expect("create output through ..");
        file.write_all(b"[]").expect("write output");
        drop(file);
        let mut again = create_utf8_file(&relative).expect("existing parents are fine");
        again.write_all(b"{}").expect("rewrite output");
        drop(again);

        assert_eq!(read_utf8_to_string(&target).expect("read back"), "{}");
    }

    #[test]
    fn missing_paths_are_not_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = utf8(tmp.path());

        assert!(!file_is_file(&root.join("absent.shp")).expect("stat file"));
        assert!(!file_is_file(&root.join("absent/dir/zones.shp")).expect("stat nested"));
        assert!(!file_is_file(&root).expect("directories are not files"));
    }
}
