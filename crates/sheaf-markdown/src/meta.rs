//! In-body meta lines.
//!
//! Independently of the file-level frontmatter block, a document body may
//! open with `Key: value` meta lines (with 4-space-indented continuation
//! lines), terminated by the first blank line. These are stripped from the
//! body before conversion and handed back to the caller.

use std::collections::BTreeMap;

use regex::Regex;

/// Extract leading meta lines from a document body.
///
/// Returns the collected key -> values mapping and the body with the meta
/// block (and its terminating blank line) removed. A body whose first line is
/// not a meta line is returned unchanged with an empty mapping.
pub fn extract_meta_lines(body: &str) -> (BTreeMap<String, Vec<String>>, &str) {
    let key_line = Regex::new(r"^[ ]{0,3}([A-Za-z0-9_-]+):\s*(.*)$").expect("valid meta pattern");

    let mut meta: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut current_key: Option<String> = None;
    let mut consumed = 0usize;

    for line in body.split_inclusive('\n') {
        let text = line.trim_end_matches(['\r', '\n']);

        if text.trim().is_empty() {
            if current_key.is_some() {
                // Blank line terminates the block and is consumed with it.
                consumed += line.len();
            }
            break;
        }

        if let Some(caps) = key_line.captures(text) {
            let key = caps[1].to_lowercase();
            let value = caps[2].trim().to_string();
            meta.insert(key.clone(), vec![value]);
            current_key = Some(key);
            consumed += line.len();
        } else if text.starts_with("    ") && current_key.is_some() {
            let key = current_key.as_ref().expect("checked above");
            meta.get_mut(key)
                .expect("key inserted when set as current")
                .push(text.trim().to_string());
            consumed += line.len();
        } else {
            break;
        }
    }

    if meta.is_empty() {
        (meta, body)
    } else {
        (meta, &body[consumed..])
    }
}
