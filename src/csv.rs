//! Header-driven CSV reader for the item dataset.
//!
//! The first line names the fields. Commas split a line only when an even
//! number of double quotes follows them, so a comma inside a quoted field is
//! kept. One leading and one trailing quote is stripped from each value;
//! doubled quotes inside a field are left as they are.

use indexmap::IndexMap;

/// One data row keyed by the header names, in header order.
pub type Record = IndexMap<String, String>;

fn split_fields(line: &str) -> Vec<&str> {
    let total = line.matches('"').count();
    let mut seen = 0;
    let mut start = 0;
    let mut fields = Vec::new();
    for (pos, c) in line.char_indices() {
        match c {
            '"' => seen += 1,
            ',' if (total - seen) % 2 == 0 => {
                fields.push(&line[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    fields.push(&line[start..]);
    fields
}

fn unquote(field: &str) -> &str {
    let field = field.strip_prefix('"').unwrap_or(field);
    field.strip_suffix('"').unwrap_or(field)
}

pub fn split_line(line: &str) -> Vec<&str> {
    split_fields(line).into_iter().map(unquote).collect()
}

pub fn parse(text: &str) -> Vec<Record> {
    let mut lines = text.lines();
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let header = split_line(header);
    lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let values = split_line(line);
            header
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = values.get(i).copied().unwrap_or_default();
                    (name.to_string(), value.to_string())
                })
                .collect()
        })
        .collect()
}
