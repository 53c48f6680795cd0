//! Minimal HTML scanning for post-processors.
//!
//! Post-processors only need to know where markup is and which regions are
//! off limits, so this is a scanner over `<…>` boundaries rather than a
//! parser.

/// Elements whose contents post-processors must leave alone.
const RAW_ELEMENTS: [&str; 4] = ["pre", "code", "script", "style"];

/// Apply `transform` to every region outside raw elements and comments.
///
/// Regions passed to `transform` may contain tags; raw elements (tags
/// included) and comments are copied through unchanged.
pub(crate) fn map_outside_raw<F>(html: &str, mut transform: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut output = String::with_capacity(html.len());
    let mut chunk_start = 0;
    let mut pos = 0;

    while let Some(offset) = html[pos..].find('<') {
        let tag_start = pos + offset;
        let rest = &html[tag_start..];

        let raw_end = if rest.starts_with("<!--") {
            Some(rest.find("-->").map_or(html.len(), |i| tag_start + i + 3))
        } else {
            raw_element_name(rest).map(|name| closing_tag_end(html, tag_start, name))
        };

        match raw_end {
            Some(end) => {
                output.push_str(&transform(&html[chunk_start..tag_start]));
                output.push_str(&html[tag_start..end]);
                chunk_start = end;
                pos = end;
            }
            None => pos = tag_start + 1,
        }
    }

    output.push_str(&transform(&html[chunk_start..]));
    output
}

/// Apply `transform` to text nodes outside raw elements.
pub(crate) fn map_text_nodes<F>(html: &str, transform: F) -> String
where
    F: FnMut(&str) -> String,
{
    map_text_runs(html, |_| false, transform)
}

/// Apply `transform` to runs of text outside raw elements.
///
/// A run may span tags for which `joins` returns true; those tags are passed
/// to `transform` as part of the run. Every other tag ends the run and is
/// copied through unchanged, so `transform` never sees attribute values.
pub(crate) fn map_text_runs<J, F>(html: &str, joins: J, mut transform: F) -> String
where
    J: Fn(&str) -> bool,
    F: FnMut(&str) -> String,
{
    map_outside_raw(html, |chunk| {
        let mut output = String::with_capacity(chunk.len());
        let mut run_start = 0;
        let mut pos = 0;
        while let Some(offset) = chunk[pos..].find('<') {
            let start = pos + offset;
            let end = chunk[start..].find('>').map_or(chunk.len(), |i| start + i + 1);
            if !joins(&chunk[start..end]) {
                output.push_str(&transform(&chunk[run_start..start]));
                output.push_str(&chunk[start..end]);
                run_start = end;
            }
            pos = end;
        }
        output.push_str(&transform(&chunk[run_start..]));
        output
    })
}

/// Name of the raw element opened by the tag at the start of `tag`, if any.
fn raw_element_name(tag: &str) -> Option<&'static str> {
    let name_part = tag.strip_prefix('<')?;
    let name_len = name_part
        .bytes()
        .take_while(u8::is_ascii_alphanumeric)
        .count();
    let name = &name_part[..name_len];
    let terminated = matches!(
        name_part.as_bytes().get(name_len),
        Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r')
    );
    if !terminated {
        return None;
    }
    RAW_ELEMENTS
        .into_iter()
        .find(|raw| raw.eq_ignore_ascii_case(name))
}

/// Byte offset just past the closing tag of `name`, or the end of input.
///
/// `name` is ASCII, so matching bytes in place keeps slicing on character
/// boundaries.
fn closing_tag_end(html: &str, from: usize, name: &str) -> usize {
    let bytes = html.as_bytes();
    for (offset, _) in html[from..].match_indices("</") {
        let name_start = from + offset + 2;
        let name_end = name_start + name.len();
        let same_name = bytes
            .get(name_start..name_end)
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name.as_bytes()));
        if same_name && !bytes.get(name_end).is_some_and(u8::is_ascii_alphanumeric) {
            return html[name_end..]
                .find('>')
                .map_or(html.len(), |end| name_end + end + 1);
        }
    }
    html.len()
}
