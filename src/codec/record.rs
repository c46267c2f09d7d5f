//! Record line codec.
//!
//! One record travels as one delimited text line:
//!
//! ```text
//! first_name,surname,document_id,birth_date,number\n
//! ```
//!
//! The owner id is carried out of band (explicitly in winner queries,
//! implicitly for batch submission) and never appears on a record line.
//! There is no escaping: fields must not contain the delimiter or a newline,
//! which is the data producer's responsibility.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{DrawlineError, Result};

/// Field delimiter inside a record line and a winners payload.
pub const FIELD_DELIMITER: char = ',';

/// Line terminator for record lines and winners payloads.
pub const LINE_TERMINATOR: char = '\n';

/// One submission record.
///
/// All fields are plain text; the crate performs no numeric parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier of the submitting party.
    pub owner_id: String,
    pub first_name: String,
    pub surname: String,
    pub document_id: String,
    pub birth_date: String,
    pub number: String,
}

impl Record {
    /// Encode as one wire line, terminator included.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{}\n",
            self.first_name, self.surname, self.document_id, self.birth_date, self.number
        )
    }

    /// Decode one wire line, attaching the caller-supplied owner id.
    ///
    /// A single trailing newline is tolerated. Exactly five fields are
    /// required; any other count is a [`DrawlineError::InvalidRecord`], never
    /// an out-of-range fault.
    pub fn from_line(line: &str, owner_id: &str) -> Result<Self> {
        let trimmed = line.strip_suffix(LINE_TERMINATOR).unwrap_or(line);
        let fields: Vec<&str> = trimmed.split(FIELD_DELIMITER).collect();
        if fields.len() != 5 {
            return Err(DrawlineError::InvalidRecord(format!(
                "expected 5 fields, got {}",
                fields.len()
            )));
        }
        Ok(Record {
            owner_id: owner_id.to_string(),
            first_name: fields[0].to_string(),
            surname: fields[1].to_string(),
            document_id: fields[2].to_string(),
            birth_date: fields[3].to_string(),
            number: fields[4].to_string(),
        })
    }
}

/// Concatenate record lines into one `BATCH` payload, preserving input order.
pub fn encode_batch(records: &[Record]) -> Bytes {
    let mut buf = String::new();
    for record in records {
        buf.push_str(&record.to_line());
    }
    Bytes::from(buf.into_bytes())
}

/// Split a `WINNERS` payload into winner identifiers.
///
/// A single trailing newline is tolerated. An empty payload means an empty
/// result, not one empty identifier.
pub fn decode_winners(payload: &str) -> Vec<String> {
    let trimmed = payload.strip_suffix(LINE_TERMINATOR).unwrap_or(payload);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split(FIELD_DELIMITER)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(owner: &str, n: u32) -> Record {
        Record {
            owner_id: owner.to_string(),
            first_name: format!("First{n}"),
            surname: format!("Last{n}"),
            document_id: format!("3000000{n}"),
            birth_date: "1990-05-17".to_string(),
            number: n.to_string(),
        }
    }

    #[test]
    fn test_line_roundtrip_with_owner_supplied() {
        let record = sample("7", 4);
        let decoded = Record::from_line(&record.to_line(), "7").unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_to_line_has_five_fields_and_terminator() {
        let line = sample("1", 9).to_line();
        assert!(line.ends_with('\n'));
        assert_eq!(line.trim_end().split(',').count(), 5);
        assert!(!line.contains("1,First"), "owner id must not be serialized");
    }

    #[test]
    fn test_from_line_without_terminator() {
        let record = Record::from_line("Jane,Doe,30000001,1990-05-17,1234", "3").unwrap();
        assert_eq!(record.owner_id, "3");
        assert_eq!(record.first_name, "Jane");
        assert_eq!(record.number, "1234");
    }

    #[test]
    fn test_from_line_too_few_fields() {
        let err = Record::from_line("Jane,Doe,30000001", "3").unwrap_err();
        assert!(matches!(err, DrawlineError::InvalidRecord(_)));
    }

    #[test]
    fn test_from_line_too_many_fields() {
        let err = Record::from_line("3,Jane,Doe,30000001,1990-05-17,1234", "3").unwrap_err();
        assert!(matches!(err, DrawlineError::InvalidRecord(_)));
    }

    #[test]
    fn test_from_line_empty() {
        assert!(matches!(
            Record::from_line("", "3"),
            Err(DrawlineError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_from_line_preserves_empty_fields() {
        // Empty fields are data, not an error; only the count matters.
        let record = Record::from_line(",,,,", "3").unwrap();
        assert_eq!(record.first_name, "");
        assert_eq!(record.number, "");
    }

    #[test]
    fn test_encode_batch_concatenates_in_order() {
        let records = vec![sample("7", 1), sample("7", 2), sample("7", 3)];
        let payload = encode_batch(&records);
        let expected: String = records.iter().map(Record::to_line).collect();
        assert_eq!(&payload[..], expected.as_bytes());
    }

    #[test]
    fn test_encode_batch_empty() {
        assert!(encode_batch(&[]).is_empty());
    }

    #[test]
    fn test_decode_winners_empty_is_empty() {
        assert_eq!(decode_winners(""), Vec::<String>::new());
        assert_eq!(decode_winners("\n"), Vec::<String>::new());
    }

    #[test]
    fn test_decode_winners_list() {
        assert_eq!(decode_winners("a,b,c\n"), vec!["a", "b", "c"]);
        assert_eq!(decode_winners("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(decode_winners("30000001"), vec!["30000001"]);
    }
}
