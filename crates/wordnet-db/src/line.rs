use crate::content_type::Charset;

/// Read one line starting at `pos`, up to the next `\n`, `\r`, or `\r\n`.
/// Returns the decoded text and the position immediately past the
/// terminator. `None` if `pos` is already at end of file.
pub(crate) fn read_line(buf: &[u8], pos: usize, charset: Charset) -> Option<(String, usize)> {
    if pos >= buf.len() {
        return None;
    }
    let mut end = pos;
    while end < buf.len() && buf[end] != b'\n' && buf[end] != b'\r' {
        end += 1;
    }
    let text = charset.decode(&buf[pos..end]);
    let mut next = end;
    if next < buf.len() {
        if buf[next] == b'\r' && next + 1 < buf.len() && buf[next + 1] == b'\n' {
            next += 2;
        } else {
            next += 1;
        }
    }
    Some((text, next))
}

/// Walk backward from `pos` to the start of the line containing it.
pub(crate) fn rewind_to_line_start(buf: &[u8], pos: usize) -> usize {
    let mut p = pos.min(buf.len());
    if p > 0 && p < buf.len() && buf[p - 1] == b'\r' && buf[p] == b'\n' {
        p -= 1;
    }
    while p > 0 && buf[p - 1] != b'\n' && buf[p - 1] != b'\r' {
        p -= 1;
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_lf_terminated_line() {
        let buf = b"first\nsecond\n";
        let (line, next) = read_line(buf, 0, Charset::Utf8).unwrap();
        assert_eq!(line, "first");
        assert_eq!(next, 6);
    }

    #[test]
    fn reads_crlf_terminated_line() {
        let buf = b"first\r\nsecond\r\n";
        let (line, next) = read_line(buf, 0, Charset::Utf8).unwrap();
        assert_eq!(line, "first");
        assert_eq!(next, 7);
    }

    #[test]
    fn rewind_finds_line_start_from_midline_position() {
        let buf = b"first\nsecond\nthird\n";
        assert_eq!(rewind_to_line_start(buf, 9), 6);
    }

    #[test]
    fn rewind_handles_crlf_split_position() {
        let buf = b"first\r\nsecond\r\n";
        // Position 6 sits exactly on the '\n' half of the first line's CRLF.
        assert_eq!(rewind_to_line_start(buf, 6), 0);
    }

    #[test]
    fn read_line_past_end_is_none() {
        let buf = b"only\n";
        assert!(read_line(buf, 5, Charset::Utf8).is_none());
    }
}
