//! Strategy argument extraction
//!
//! A strategy script launches `winws.exe` once, usually spreading the
//! arguments over several `^`-continued lines:
//!
//! ```text
//! start "zapret: general" /min "%BIN%winws.exe" --wf-tcp=80,443 ^
//! --filter-tcp=443 --hostlist="%LISTS%list-general.txt" ^
//! --dpi-desync=fake
//! ```
//!
//! The extractor finds that invocation, flattens it into a single argument
//! string and resolves the path placeholders so the result can be appended to
//! a service binary path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use super::placeholders::Placeholders;
use crate::layout::WINWS_EXE;
use crate::options::GameFilter;

/// Errors raised while extracting a strategy command line
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The strategy script does not exist
    #[error("Strategy script not found: {}", .path.display())]
    ScriptNotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// The install root does not exist or is not a directory
    #[error("Install directory not found: {}", .path.display())]
    InstallRootNotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// The script exists but could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// Script path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Why capturing stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// A `start ...` line
    StartDirective,
    /// A `::` or `rem ` comment line
    Comment,
    /// An empty line
    BlankLine,
    /// The script ended while still capturing
    EndOfScript,
}

/// Scanner state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Searching,
    Capturing,
    Done(Terminator),
}

/// Raw result of scanning a script for the executable invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Argument fragments in script order, continuation carets removed
    pub fragments: Vec<String>,
    /// `None` if the executable name never appeared
    pub terminator: Option<Terminator>,
}

impl Invocation {
    /// Whether the executable invocation line was found at all
    pub fn found(&self) -> bool {
        self.terminator.is_some()
    }
}

/// Fully resolved command line for one strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCommandLine {
    arguments: String,
    executable_found: bool,
}

impl ExtractedCommandLine {
    /// The flattened, substituted argument string
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// False when the script never mentions the executable.
    ///
    /// In that case [`arguments`](Self::arguments) is empty, which is
    /// indistinguishable from a legitimate argument-less invocation by the
    /// string alone.
    pub fn executable_found(&self) -> bool {
        self.executable_found
    }

    /// Empty because nothing was found
    pub fn is_degenerate(&self) -> bool {
        !self.executable_found
    }

    pub fn into_arguments(self) -> String {
        self.arguments
    }
}

/// Scan script text for the `winws.exe` invocation block
pub fn scan_invocation(text: &str) -> Invocation {
    let mut state = ScanState::Searching;
    let mut fragments = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        state = match state {
            ScanState::Searching => match find_ignore_ascii_case(line, WINWS_EXE) {
                Some(idx) => {
                    let rest = line[idx + WINWS_EXE.len()..]
                        .trim_start_matches('"')
                        .trim();
                    push_fragment(&mut fragments, rest);
                    ScanState::Capturing
                }
                None => ScanState::Searching,
            },
            ScanState::Capturing => match terminator_of(line) {
                Some(terminator) => ScanState::Done(terminator),
                None => {
                    push_fragment(&mut fragments, line);
                    ScanState::Capturing
                }
            },
            ScanState::Done(_) => break,
        };
    }

    let terminator = match state {
        ScanState::Searching => None,
        ScanState::Capturing => Some(Terminator::EndOfScript),
        ScanState::Done(terminator) => Some(terminator),
    };

    Invocation {
        fragments,
        terminator,
    }
}

/// Resolve a strategy from its text and placeholder values
pub fn extract_from_text(text: &str, placeholders: &Placeholders) -> ExtractedCommandLine {
    let invocation = scan_invocation(text);
    let joined = invocation.fragments.join(" ");
    let substituted = placeholders.substitute(&joined);
    let arguments = collapse_whitespace(&substituted);

    ExtractedCommandLine {
        arguments,
        executable_found: invocation.found(),
    }
}

/// Extract the service command line for `script_path`.
///
/// `install_root` is the extracted release directory holding `bin/`,
/// `lists/` and `utils/`.
pub fn extract_command_line(
    script_path: &Path,
    install_root: &Path,
) -> Result<ExtractedCommandLine, ExtractError> {
    if !install_root.is_dir() {
        return Err(ExtractError::InstallRootNotFound {
            path: install_root.to_path_buf(),
        });
    }

    let bytes = fs::read(script_path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ExtractError::ScriptNotFound {
            path: script_path.to_path_buf(),
        },
        _ => ExtractError::Read {
            path: script_path.to_path_buf(),
            source,
        },
    })?;
    let text = String::from_utf8_lossy(&bytes);

    let script_dir = script_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let placeholders = Placeholders::from_paths(
        &install_root.join("bin"),
        &install_root.join("lists"),
        script_dir,
        GameFilter::detect(&install_root.join("utils")),
    );

    let extracted = extract_from_text(&text, &placeholders);
    if extracted.is_degenerate() {
        warn!(
            "{} does not mention {}, extracted arguments are empty",
            script_path.display(),
            WINWS_EXE
        );
    } else {
        debug!(
            "Extracted arguments from {}: {}",
            script_path.display(),
            extracted.arguments()
        );
    }

    Ok(extracted)
}

/// Extract the flattened argument string for `script_path`.
///
/// A script that never invokes the executable yields an empty string.
pub fn extract(script_path: &Path, install_root: &Path) -> Result<String, ExtractError> {
    extract_command_line(script_path, install_root).map(ExtractedCommandLine::into_arguments)
}

fn terminator_of(line: &str) -> Option<Terminator> {
    if line.is_empty() {
        return Some(Terminator::BlankLine);
    }
    // keywords are matched as written; `START`/`REM` continue the block
    if line.starts_with("start ") {
        Some(Terminator::StartDirective)
    } else if line.starts_with("::") || line.starts_with("rem ") {
        Some(Terminator::Comment)
    } else {
        None
    }
}

fn push_fragment(fragments: &mut Vec<String>, text: &str) {
    let fragment = text.trim_end_matches('^').trim();
    if !fragment.is_empty() {
        fragments.push(fragment.to_string());
    }
}

// ASCII lowercasing keeps byte offsets aligned with the original line
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::MAIN_SEPARATOR;

    fn plain() -> Placeholders {
        Placeholders::with_dirs(r"C:\x\bin", r"C:\x\lists", r"C:\x", GameFilter::Disabled)
            .with_separator('\\')
    }

    #[test]
    fn test_single_line() {
        let out = extract_from_text("winws.exe --flag1 --flag2", &plain());
        assert_eq!(out.arguments(), "--flag1 --flag2");
        assert!(out.executable_found());
    }

    #[test]
    fn test_continuation_and_start_terminator() {
        let script = "winws.exe --a ^\n--b\nstart svc\n--never";
        let inv = scan_invocation(script);
        assert_eq!(inv.fragments, vec!["--a", "--b"]);
        assert_eq!(inv.terminator, Some(Terminator::StartDirective));

        assert_eq!(extract_from_text(script, &plain()).arguments(), "--a --b");
    }

    #[test]
    fn test_placeholder_substitution() {
        let out = extract_from_text("winws.exe %BIN%app.exe %GameFilter%", &plain());
        assert_eq!(out.arguments(), r"C:\x\bin\app.exe 12");
    }

    #[test]
    fn test_whitespace_collapse() {
        let out = extract_from_text("winws.exe --a   --b\t\t--c ^\n   --d  \t --e", &plain());
        assert_eq!(out.arguments(), "--a --b --c --d --e");
    }

    #[test]
    fn test_missing_executable_is_empty() {
        let out = extract_from_text("@echo off\nrem nothing here\n", &plain());
        assert_eq!(out.arguments(), "");
        assert!(out.is_degenerate());
        assert_eq!(scan_invocation("@echo off").terminator, None);
    }

    #[test]
    fn test_case_insensitive_executable() {
        let out = extract_from_text(r#"start "z" /min "%BIN%WinWS.EXE" --x=1"#, &plain());
        assert_eq!(out.arguments(), "--x=1");
    }

    #[test]
    fn test_quoted_executable_path() {
        let script = "start \"zapret: general\" /min \"%BIN%winws.exe\" --wf-tcp=80,443 ^\n\
                      --filter-tcp=443 --hostlist=\"%LISTS%list-general.txt\" ^\n\
                      --dpi-desync=fake\n";
        let out = extract_from_text(script, &plain());
        assert_eq!(
            out.arguments(),
            r#"--wf-tcp=80,443 --filter-tcp=443 --hostlist="C:\x\lists\list-general.txt" --dpi-desync=fake"#
        );
    }

    #[test]
    fn test_trigger_line_with_only_caret() {
        let inv = scan_invocation("\"%BIN%winws.exe\" ^\n--a ^\n--b\n");
        assert_eq!(inv.fragments, vec!["--a", "--b"]);
        assert_eq!(inv.terminator, Some(Terminator::EndOfScript));
    }

    #[test]
    fn test_terminators() {
        let cases = [
            ("winws.exe --a\n:: comment\n--b", Terminator::Comment),
            ("winws.exe --a\nrem comment\n--b", Terminator::Comment),
            ("winws.exe --a\n\n--b", Terminator::BlankLine),
            ("winws.exe --a\n   \n--b", Terminator::BlankLine),
            ("winws.exe --a\nstart other.exe\n--b", Terminator::StartDirective),
            ("winws.exe --a ^\n--b", Terminator::EndOfScript),
        ];
        for (script, expected) in cases {
            let inv = scan_invocation(script);
            assert_eq!(inv.terminator, Some(expected), "script: {script:?}");
            assert_eq!(inv.fragments[0], "--a");
            if expected != Terminator::EndOfScript {
                assert_eq!(inv.fragments.len(), 1, "script: {script:?}");
            }
        }
    }

    #[test]
    fn test_uppercase_keywords_continue_block() {
        let out = extract_from_text("winws.exe --a ^\nREM x\n--b", &plain());
        assert_eq!(out.arguments(), "--a REM x --b");

        let out = extract_from_text("winws.exe --a ^\nSTART y ^\n--b\n\n--c", &plain());
        assert_eq!(out.arguments(), "--a START y --b");
    }

    #[test]
    fn test_only_first_invocation_block() {
        let script = "winws.exe --first\n\nwinws.exe --second\n";
        assert_eq!(extract_from_text(script, &plain()).arguments(), "--first");
    }

    #[test]
    fn test_crlf_line_endings() {
        let script = "@echo off\r\nwinws.exe --a ^\r\n--b\r\n\r\n";
        assert_eq!(extract_from_text(script, &plain()).arguments(), "--a --b");
    }

    #[test]
    fn test_escaped_bang() {
        let out = extract_from_text("winws.exe --x=^!y", &plain());
        assert_eq!(out.arguments(), "--x=!y");
    }

    #[test]
    fn test_extract_from_files() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("bin")).unwrap();
        fs::create_dir_all(root.join("utils")).unwrap();
        let script = root.join("general.bat");
        fs::write(&script, "\"%BIN%winws.exe\" --ports=%GameFilter% --l=%LISTS%a.txt\n").unwrap();

        let first = extract(&script, root).unwrap();
        let sep = MAIN_SEPARATOR;
        assert!(first.starts_with("--ports=12 --l="));
        assert!(first.ends_with(&format!("lists{sep}a.txt")));

        // idempotent on unchanged inputs
        assert_eq!(extract(&script, root).unwrap(), first);

        fs::write(root.join("utils").join("game_filter.enabled"), "ENABLED").unwrap();
        let widened = extract(&script, root).unwrap();
        assert!(widened.starts_with("--ports=1024-65535 "));
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("broken.bat");
        let mut bytes = b"rem \xff\xfe\n".to_vec();
        bytes.extend_from_slice(b"winws.exe --a \xff ^\n--b\n");
        fs::write(&script, bytes).unwrap();

        let out = extract(&script, tmp.path()).unwrap();
        assert_eq!(out, "--a \u{FFFD} --b");
    }

    #[test]
    fn test_missing_script() {
        let tmp = tempfile::tempdir().unwrap();
        let err = extract(&tmp.path().join("nope.bat"), tmp.path()).unwrap_err();
        assert!(matches!(err, ExtractError::ScriptNotFound { .. }));
    }

    #[test]
    fn test_missing_install_root() {
        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("s.bat");
        fs::write(&script, "winws.exe --a").unwrap();
        let err = extract(&script, &tmp.path().join("absent")).unwrap_err();
        assert!(matches!(err, ExtractError::InstallRootNotFound { .. }));
    }
}
