//! Inline code span detection for line-based pre-processors.

/// Apply `transform` to the parts of `line` outside inline code spans.
///
/// A code span opens with a run of backticks and closes with the next run of
/// the same length. An unmatched run is treated as literal text.
pub(crate) fn map_outside_code_spans<F>(line: &str, mut transform: F) -> String
where
    F: FnMut(&str) -> String,
{
    let bytes = line.as_bytes();
    let mut output = String::with_capacity(line.len());
    let mut text_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'`' {
            pos += 1;
            continue;
        }

        let run = backtick_run(&bytes[pos..]);
        let content_start = pos + run;
        match find_closing_run(&bytes[content_start..], run) {
            Some(offset) => {
                let span_end = content_start + offset + run;
                output.push_str(&transform(&line[text_start..pos]));
                output.push_str(&line[pos..span_end]);
                text_start = span_end;
                pos = span_end;
            }
            None => pos = content_start,
        }
    }

    output.push_str(&transform(&line[text_start..]));
    output
}

fn backtick_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|&&b| b == b'`').count()
}

fn find_closing_run(bytes: &[u8], len: usize) -> Option<usize> {
    let mut pos = 0;
    while pos < bytes.len() {
        if bytes[pos] == b'`' {
            let run = backtick_run(&bytes[pos..]);
            if run == len {
                return Some(pos);
            }
            pos += run;
        } else {
            pos += 1;
        }
    }
    None
}
