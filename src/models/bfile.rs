//! Extended term listings (b-files).

use num_bigint::BigInt;

use super::id::SequenceId;
use crate::sources::SourceError;

/// The `index value` listing published alongside an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BFile {
    id: SequenceId,
    offset: i64,
    terms: Vec<BigInt>,
}

impl BFile {
    /// Parse the text of a b-file
    ///
    /// Blank lines and `#` comments are skipped. Indices must be consecutive.
    pub fn parse(id: SequenceId, text: &str) -> Result<Self, SourceError> {
        let mut offset = None;
        let mut terms = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let (Some(index), Some(value), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(SourceError::Parse(format!(
                    "{} line {}: expected `index value`, got {:?}",
                    id.b_file_name(),
                    line_no + 1,
                    line
                )));
            };

            let index = index.parse::<i64>().map_err(|e| {
                SourceError::Parse(format!(
                    "{} line {}: invalid index {:?}: {}",
                    id.b_file_name(),
                    line_no + 1,
                    index,
                    e
                ))
            })?;
            let value = value.parse::<BigInt>().map_err(|_| {
                SourceError::Parse(format!(
                    "{} line {}: invalid term {:?}",
                    id.b_file_name(),
                    line_no + 1,
                    value
                ))
            })?;

            let first = *offset.get_or_insert(index);
            let expected = first + terms.len() as i64;
            if index != expected {
                return Err(SourceError::Parse(format!(
                    "{} line {}: expected index {}, got {}",
                    id.b_file_name(),
                    line_no + 1,
                    expected,
                    index
                )));
            }
            terms.push(value);
        }

        let offset = offset.ok_or_else(|| {
            SourceError::Parse(format!("{} contains no terms", id.b_file_name()))
        })?;

        Ok(Self { id, offset, terms })
    }

    pub fn id(&self) -> SequenceId {
        self.id
    }

    /// Index of the first listed term
    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn terms(&self) -> &[BigInt] {
        &self.terms
    }

    /// Term at index `index`, if listed
    pub fn term(&self, index: i64) -> Option<&BigInt> {
        let position = usize::try_from(index.checked_sub(self.offset)?).ok()?;
        self.terms.get(position)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
