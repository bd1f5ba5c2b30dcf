//! Confirmation before mirroring into the current directory.

use std::io::{self, BufRead, Write};
use std::path::Path;

/// Interprets a reply. Only an explicit `n`/`no` declines; end of input is
/// treated as a refusal because nobody is there to agree.
pub(crate) fn parse_confirmation(reply: Option<&str>) -> bool {
    match reply {
        None => false,
        Some(reply) => !matches!(reply.trim().to_ascii_lowercase().as_str(), "n" | "no"),
    }
}

/// Asks whether `cwd` may be used as the output directory.
pub(crate) fn confirm_use_cwd<R: BufRead, W: Write>(
    cwd: &Path,
    mut input: R,
    mut output: W,
) -> io::Result<bool> {
    writeln!(output, "[!] No output directory given. {} will be used.", cwd.display())?;
    write!(output, "[?] Do you wish to proceed? (y/n) ")?;
    output.flush()?;

    let mut line = String::new();
    let read = input.read_line(&mut line)?;
    let reply = (read > 0).then_some(line.as_str());
    Ok(parse_confirmation(reply))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_parse_confirmation() {
        assert!(parse_confirmation(Some("y\n")));
        assert!(parse_confirmation(Some("yes")));
        assert!(parse_confirmation(Some("\n")));
        assert!(!parse_confirmation(Some("n\n")));
        assert!(!parse_confirmation(Some(" NO ")));
        assert!(!parse_confirmation(None));
    }

    #[test]
    fn test_confirm_use_cwd_prints_prompt_and_reads_reply() {
        let mut out = Vec::new();
        let ok = confirm_use_cwd(Path::new("/srv"), Cursor::new("y\n"), &mut out).unwrap();
        assert!(ok);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("/srv will be used"), "{printed}");
        assert!(printed.contains("(y/n)"), "{printed}");
    }

    #[test]
    fn test_confirm_use_cwd_declines_on_eof() {
        let ok = confirm_use_cwd(Path::new("/srv"), Cursor::new(""), Vec::new()).unwrap();
        assert!(!ok);
    }
}
