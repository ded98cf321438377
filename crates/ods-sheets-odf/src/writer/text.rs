//! Cell text as `text:p` paragraphs

use ods_sheets_core::tag::Tag;

/// One `text:p` per line of `text`
///
/// Spaces that XML would collapse (leading, trailing and repeated ones)
/// become `text:s`, tabs become `text:tab`.
pub(crate) fn paragraphs(text: &str) -> Vec<Tag> {
    text.split('\n')
        .map(|line| paragraph(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

fn paragraph(line: &str) -> Tag {
    let mut parts: Vec<Tag> = Vec::new();
    let mut buf = String::new();
    let chars: Vec<char> = line.chars().collect();

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            ' ' => {
                let start = i;
                while i < chars.len() && chars[i] == ' ' {
                    i += 1;
                }
                let run = i - start;
                let at_edge = start == 0 || i == chars.len();
                let mut extra = run;
                if !at_edge {
                    buf.push(' ');
                    extra -= 1;
                }
                if extra > 0 {
                    flush(&mut buf, &mut parts);
                    parts.push(spaces(extra));
                }
                continue;
            }
            '\t' => {
                flush(&mut buf, &mut parts);
                parts.push(Tag::new("text:tab"));
            }
            c => buf.push(c),
        }
        i += 1;
    }
    flush(&mut buf, &mut parts);

    let mut p = Tag::new("text:p");
    if parts.len() == 1 && parts[0].is_text_run() {
        let text = parts[0].text().unwrap_or_default().to_string();
        p.set_text(text);
    } else {
        for part in parts {
            p.push_child(part);
        }
    }
    p
}

fn flush(buf: &mut String, parts: &mut Vec<Tag>) {
    if !buf.is_empty() {
        parts.push(Tag::text_run(std::mem::take(buf)));
    }
}

fn spaces(count: usize) -> Tag {
    let mut s = Tag::new("text:s");
    if count > 1 {
        s.set_attr("text:c", count.to_string());
    }
    s
}
