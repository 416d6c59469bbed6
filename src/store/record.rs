// Tab-delimited text records, one per line. A field holding a tab, a
// double quote or a line break is written between double quotes with its
// inner quotes doubled.

use crate::store::{Record, StoreError};

const DELIMITER: char = '\t';
const QUOTE: char = '"';

pub fn encode_record(fields: &[String]) -> String {
    let mut line = match fields {
        // a lone empty field would otherwise read back as a blank line
        [single] if single.is_empty() => "\"\"".to_string(),
        _ => fields
            .iter()
            .map(|f| encode_field(f))
            .collect::<Vec<_>>()
            .join("\t"),
    };
    line.push('\n');
    line
}

fn encode_field(field: &str) -> String {
    if field.contains([DELIMITER, QUOTE, '\n', '\r']) {
        format!("\"{}\"", field.replace(QUOTE, "\"\""))
    } else {
        field.to_string()
    }
}

/// Decodes every record in `content`. Blank lines are skipped.
pub fn decode_records(content: &str) -> Result<Vec<Record>, StoreError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut line_started = false;
    let mut quoted = false;
    let mut in_quotes = false;

    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c != QUOTE {
                field.push(c);
            } else if chars.next_if_eq(&QUOTE).is_some() {
                field.push(QUOTE);
            } else {
                in_quotes = false;
            }
            continue;
        }

        match c {
            QUOTE if field.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
                line_started = true;
            }
            DELIMITER => {
                record.push(std::mem::take(&mut field));
                quoted = false;
                line_started = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                if line_started {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                quoted = false;
                line_started = false;
            }
            c => {
                field.push(c);
                line_started = true;
            }
        }
    }

    if in_quotes {
        return Err(StoreError::MalformedRecord("unterminated quoted field".to_string()));
    }
    if line_started {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}
