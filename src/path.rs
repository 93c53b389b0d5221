//! String decomposition of file-system path specs.
//!
//! These functions work on the text of a spec and never touch the disk.
//! Both `/` and `\` are accepted as separators regardless of platform, so a
//! spec written for one OS can be taken apart on another.
//!
//! ```rust
//! use fsys::path;
//!
//! let spec = "../foobar/someFile.txt";
//! assert_eq!(path::get_path(spec), "../foobar/");
//! assert_eq!(path::get_name(spec, true), "someFile.txt");
//! assert_eq!(path::get_name(spec, false), "someFile");
//! assert_eq!(path::get_ext(spec), "txt");
//! assert_eq!(path::file_spec("../foobar", "someFile.txt"), spec);
//! ```

use std::path::Component;
use std::path::Path as StdPath;
use std::path::PathBuf;

/// Returns true for both forward and backward slashes.
pub fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Byte offset just past the last separator, or 0 when there is none.
fn name_start(spec: &str) -> usize {
    spec.rfind(is_separator).map(|pos| pos + 1).unwrap_or(0)
}

/// Returns the directory part of `spec`, up to and including the last
/// separator. Empty if `spec` has no separator.
pub fn get_path(spec: &str) -> String {
    spec[..name_start(spec)].to_string()
}

/// Returns the final segment of `spec`.
///
/// When `with_extension` is false the last `.ext` suffix of that segment is
/// stripped.
pub fn get_name(spec: &str, with_extension: bool) -> String {
    let name = &spec[name_start(spec)..];
    if with_extension {
        return name.to_string();
    }
    match name.rfind('.') {
        Some(dot) => name[..dot].to_string(),
        None => name.to_string(),
    }
}

/// Returns the text after the last `.` of the final segment, or an empty
/// string when that segment has none. Dots in parent segments are ignored.
pub fn get_ext(spec: &str) -> String {
    let name = &spec[name_start(spec)..];
    match name.rfind('.') {
        Some(dot) => name[dot + 1..].to_string(),
        None => String::new(),
    }
}

/// Splits `spec` into its non-empty segments.
pub fn split_segments(spec: &str) -> Vec<&str> {
    spec.split(is_separator).filter(|s| !s.is_empty()).collect()
}

/// Joins `path` and `name` with exactly one separator.
///
/// The separator already used by `path` is kept; a backslash is only used
/// when `path` contains backslashes and no forward slashes. Separators
/// elsewhere in either argument are left alone.
pub fn file_spec(path: &str, name: &str) -> String {
    if path.is_empty() {
        return name.to_string();
    }
    let name = name.trim_start_matches(is_separator);
    let mut ret = String::with_capacity(path.len() + name.len() + 1);
    ret.push_str(path);
    if !path.ends_with(is_separator) {
        let sep = if path.contains('\\') && !path.contains('/') {
            '\\'
        } else {
            '/'
        };
        ret.push(sep);
    }
    ret.push_str(name);
    ret
}

/// Resolves `spec` against `cwd` and removes `.` and `..` components.
///
/// Normalization is lexical: symlinks are not followed and the result does
/// not need to exist. An absolute `spec` ignores `cwd`.
pub fn normalize(cwd: &StdPath, spec: &str) -> PathBuf {
    let joined = cwd.join(spec);
    let mut ret = PathBuf::new();
    for comp in joined.components() {
        match comp {
            Component::Prefix(_) | Component::RootDir => ret.push(comp.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root.
                if ret.file_name().is_some() {
                    ret.pop();
                }
            }
            Component::Normal(part) => ret.push(part),
        }
    }
    ret
}

/// Returns the absolute form of `spec` as seen from `cwd`.
///
/// For `"."` the result is exactly `cwd`.
pub fn get_full_file_spec(cwd: &StdPath, spec: &str) -> String {
    normalize(cwd, spec).to_string_lossy().into_owned()
}
