// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2

/// A document of `lists` description lists, each with `pairs` term/value
/// pairs, separated by paragraphs. The cursor ends the last value.
#[allow(dead_code)]
pub fn generate_document(lists: usize, pairs: usize) -> String {
    let mut content = String::new();
    for list in 0..lists {
        content.push_str(&format!("<p>Section {list} introduction.</p>"));
        content.push_str("<dl>");
        for pair in 0..pairs {
            content.push_str(&format!(
                "<dt><b>Term {pair}</b></dt><dd>Definition {pair} with <i>some</i> text.</dd>"
            ));
        }
        content.push_str("</dl>");
    }
    // Cursor at the end of the final value.
    if let Some(index) = content.rfind("</dd>") {
        content.insert_str(index, "[]");
    }
    content
}

/// Same shape as [`generate_document`], with the selection spanning every
/// item of the last list.
#[allow(dead_code)]
pub fn generate_selected_list(pairs: usize) -> String {
    let mut content = String::from("<dl>");
    if pairs == 0 {
        content.push_str("{}</dl>");
        return content;
    }
    for pair in 0..pairs {
        let (open, close) = match (pair, pairs - 1) {
            (0, 0) => ("[", "]"),
            (0, _) => ("[", ""),
            (p, last) if p == last => ("", "]"),
            _ => ("", ""),
        };
        content.push_str(&format!("<dd>{open}value {pair}{close}</dd>"));
    }
    content.push_str("</dl>");
    content
}
