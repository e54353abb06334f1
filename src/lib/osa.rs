use std::ffi::OsStr;
use std::io::Write;
use std::process::{Command, Stdio};

use log::debug;

// AppleScript's "User canceled." error number.
pub const USER_CANCELED: i32 = -128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsaError {
    pub number: Option<i32>,
    pub message: String,
}

impl OsaError {
    fn from_stderr(stderr: &str) -> OsaError {
        let message = stderr.trim().to_owned();
        OsaError {
            number: parse_error_number(&message),
            message,
        }
    }

    fn other<S: Into<String>>(message: S) -> OsaError {
        OsaError {
            number: None,
            message: message.into(),
        }
    }

    pub fn is_user_canceled(&self) -> bool {
        self.number == Some(USER_CANCELED)
    }
}

// osascript reports script errors as `0:42: execution error: User canceled. (-128)`
pub fn parse_error_number(stderr: &str) -> Option<i32> {
    let line = stderr.trim_end();
    let inner = line.strip_suffix(')')?;
    let start = inner.rfind('(')?;
    inner[start + 1..].trim().parse().ok()
}

pub enum Language {
    AppleScript,
    JavaScript,
}

impl Language {
    fn flag(&self) -> &'static str {
        match self {
            Language::AppleScript => "-lAppleScript",
            Language::JavaScript => "-lJavaScript",
        }
    }
}

// Feeds the script over stdin so nothing needs escaping for the command line.
// Extra args are passed to the script's run handler. Returns stdout.
pub fn run<A, S>(lang: Language, script: &str, args: A) -> Result<String, OsaError>
where
    A: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    debug!("osascript {}: {script}", lang.flag());

    let mut child = Command::new("/usr/bin/osascript")
        .arg(lang.flag())
        .arg("-")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| OsaError::other(format!("Run error: {e}")))?;

    /* scope to close stdin and unblock osascript */
    {
        let mut child_stdin = child
            .stdin
            .take()
            .ok_or_else(|| OsaError::other("Couldn't get child's stdin"))?;
        child_stdin
            .write_all(script.as_bytes())
            .map_err(|e| OsaError::other(format!("Couldn't write to child's stdin: {e}")))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| OsaError::other(format!("Error waiting on child: {e}")))?;
    if !output.status.success() {
        return Err(OsaError::from_stderr(&String::from_utf8_lossy(&output.stderr)));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

// Quote a string as an AppleScript string literal.
pub fn applescript_quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cancel_number() {
        let err = OsaError::from_stderr("0:110: execution error: User canceled. (-128)\n");
        assert_eq!(err.number, Some(USER_CANCELED));
        assert!(err.is_user_canceled());
    }

    #[test]
    fn other_errors_are_not_cancel() {
        let err = OsaError::from_stderr("0:95: execution error: cp: /x: No such file (1)");
        assert_eq!(err.number, Some(1));
        assert!(!err.is_user_canceled());

        assert_eq!(parse_error_number("osascript: couldn't read file"), None);
    }

    #[test]
    fn applescript_quote_escapes() {
        assert_eq!(applescript_quote(r#"say "hi" \ bye"#), r#""say \"hi\" \\ bye""#);
    }
}
