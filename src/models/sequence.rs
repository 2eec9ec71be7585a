//! Sequence record representing one catalog entry.

use chrono::{DateTime, FixedOffset};
use num_bigint::BigInt;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::id::{find_references, SequenceId};
use crate::sources::SourceError;

/// Fields consumed into dedicated record fields and left out of the metadata map
const CORE_FIELDS: [&str; 3] = ["number", "name", "data"];

/// Indexing information for the terms of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    /// Index of the first term
    pub first_index: i64,
    /// 1-based position of the first term whose absolute value exceeds 1
    pub first_large_term: Option<usize>,
}

impl Offset {
    fn parse(raw: &str) -> Result<Self, SourceError> {
        let mut parts = raw.split(',').map(str::trim);
        let first_index = parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SourceError::Parse(format!("Empty offset: {:?}", raw)))?
            .parse::<i64>()
            .map_err(|e| SourceError::Parse(format!("Invalid offset {:?}: {}", raw, e)))?;

        let first_large_term = match parts.next() {
            Some(s) => Some(
                s.parse::<usize>()
                    .map_err(|e| SourceError::Parse(format!("Invalid offset {:?}: {}", raw, e)))?,
            ),
            None => None,
        };

        if parts.next().is_some() {
            return Err(SourceError::Parse(format!("Invalid offset: {:?}", raw)));
        }

        Ok(Self {
            first_index,
            first_large_term,
        })
    }
}

/// A comment line and the entries it mentions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub references: Vec<SequenceId>,
}

/// A cross-reference line and the entries it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossReference {
    pub text: String,
    pub targets: Vec<SequenceId>,
}

/// One OEIS entry
///
/// Records are only produced by parsing a complete response entry. They have no
/// mutators: a different window of terms needs a new fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceRecord {
    id: SequenceId,
    name: String,
    terms: Vec<BigInt>,
    offset: Offset,
    keywords: Vec<String>,
    author: Option<String>,
    formulas: Vec<String>,
    examples: Vec<String>,
    references: Vec<String>,
    links: Vec<String>,
    comments: Vec<Comment>,
    cross_references: Vec<CrossReference>,
    programs: BTreeMap<String, Vec<String>>,
    created: Option<DateTime<FixedOffset>>,
    modified: Option<DateTime<FixedOffset>>,
    metadata: BTreeMap<String, Value>,
}

impl SequenceRecord {
    /// Build a record from one entry of a search response
    ///
    /// Fails if a required field is missing or any known field has the wrong type.
    pub fn from_json(value: Value) -> Result<Self, SourceError> {
        let Value::Object(map) = value else {
            return Err(SourceError::Parse(
                "Entry is not a JSON object".to_string(),
            ));
        };
        Self::from_map(map)
    }

    fn from_map(mut map: Map<String, Value>) -> Result<Self, SourceError> {
        let raw: RawEntry = serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| SourceError::Parse(format!("Invalid entry: {}", e)))?;

        let terms = parse_terms(&raw.data)
            .map_err(|e| SourceError::Parse(format!("{}: {}", raw.number, e)))?;
        let offset = Offset::parse(&raw.offset)?;
        let created = parse_timestamp("created", raw.created.as_deref())?;
        let modified = parse_timestamp("time", raw.time.as_deref())?;

        let keywords = raw
            .keyword
            .as_deref()
            .map(|k| {
                k.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let comments = raw
            .comment
            .unwrap_or_default()
            .into_iter()
            .map(|line| {
                let text = line.trim().to_string();
                let references = find_references(&text);
                Comment { text, references }
            })
            .collect();

        let cross_references = raw
            .xref
            .unwrap_or_default()
            .into_iter()
            .map(|line| {
                let targets = find_references(&line);
                CrossReference { text: line, targets }
            })
            .collect();

        let mut programs = parse_programs(&raw.program.unwrap_or_default());
        for (language, lines) in [("maple", raw.maple), ("mathematica", raw.mathematica)] {
            if let Some(lines) = lines.filter(|l| !l.is_empty()) {
                programs.insert(language.to_string(), lines);
            }
        }

        for key in CORE_FIELDS {
            map.remove(key);
        }

        Ok(Self {
            id: raw.number,
            name: raw.name,
            terms,
            offset,
            keywords,
            author: raw.author,
            formulas: raw.formula.unwrap_or_default(),
            examples: raw.example.unwrap_or_default(),
            references: raw.reference.unwrap_or_default(),
            links: raw.link.unwrap_or_default(),
            comments,
            cross_references,
            programs,
            created,
            modified,
            metadata: map.into_iter().collect(),
        })
    }

    /// The entry's A-number
    pub fn id(&self) -> SequenceId {
        self.id
    }

    /// One-line description of the sequence
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Known terms, starting at [`Offset::first_index`]
    pub fn terms(&self) -> &[BigInt] {
        &self.terms
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Term at OEIS index `index`, if it falls inside the known window
    pub fn term(&self, index: i64) -> Option<&BigInt> {
        let position = index.checked_sub(self.offset.first_index)?;
        let position = usize::try_from(position).ok()?;
        self.terms.get(position)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether the entry carries the given keyword (e.g. `nonn`, `core`)
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn formulas(&self) -> &[String] {
        &self.formulas
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    /// Bibliographic references
    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn cross_references(&self) -> &[CrossReference] {
        &self.cross_references
    }

    /// Programs keyed by lowercased language name
    pub fn programs(&self) -> &BTreeMap<String, Vec<String>> {
        &self.programs
    }

    pub fn created(&self) -> Option<DateTime<FixedOffset>> {
        self.created
    }

    /// Time of the last revision
    pub fn modified(&self) -> Option<DateTime<FixedOffset>> {
        self.modified
    }

    /// Every field of the entry other than `number`, `name` and `data`, as received
    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }
}

impl TryFrom<Value> for SequenceRecord {
    type Error = SourceError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(value)
    }
}

/// Shape of a response entry, checked before anything is kept
#[derive(Debug, Deserialize)]
struct RawEntry {
    number: SequenceId,
    name: String,
    data: String,
    offset: String,
    keyword: Option<String>,
    author: Option<String>,
    comment: Option<Vec<String>>,
    reference: Option<Vec<String>>,
    link: Option<Vec<String>>,
    formula: Option<Vec<String>>,
    example: Option<Vec<String>>,
    maple: Option<Vec<String>>,
    mathematica: Option<Vec<String>>,
    program: Option<Vec<String>>,
    xref: Option<Vec<String>>,
    time: Option<String>,
    created: Option<String>,
}

fn parse_terms(data: &str) -> Result<Vec<BigInt>, String> {
    if data.trim().is_empty() {
        return Err("no terms in data field".to_string());
    }
    data.split(',')
        .map(str::trim)
        .map(|token| {
            token
                .parse::<BigInt>()
                .map_err(|_| format!("invalid term {:?}", token))
        })
        .collect()
}

fn parse_timestamp(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<DateTime<FixedOffset>>, SourceError> {
    raw.map(|s| {
        DateTime::parse_from_rfc3339(s)
            .map_err(|e| SourceError::Parse(format!("Invalid {} timestamp {:?}: {}", field, s, e)))
    })
    .transpose()
}

fn program_tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^\(([A-Z][A-Za-z0-9 .+#/_-]*)\)(?:\s|$)").expect("valid program tag regex")
    })
}

/// Group program lines by their leading `(Language)` tag
///
/// A tag is a capitalised name in parentheses followed by whitespace or the
/// end of the line, e.g. `(PARI)` or `(Python 3)`; code such as `(fibs !! n)`
/// is not a tag.
///
/// Lines without a tag continue the previous language. Lines before the first
/// tag are filed under `other`.
fn parse_programs(lines: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut programs: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut current = "other".to_string();

    for line in lines {
        let body = match program_tag_regex().captures(line) {
            Some(caps) => {
                current = caps[1].trim().to_lowercase();
                line[caps[0].len()..].trim()
            }
            None => line.trim(),
        };
        let entry = programs.entry(current.clone()).or_default();
        if !body.is_empty() {
            entry.push(body.to_string());
        }
    }

    programs
}
