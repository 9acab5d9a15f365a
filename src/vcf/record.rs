//! Lenient VCF data-line representation
//!
//! Uploaded files are frequently hand-edited or truncated, so records are
//! parsed column-by-column without consulting the header. Nothing here
//! validates field contents beyond splitting; the prioritizer decides what
//! to reject.

use std::collections::HashMap;

/// Number of fixed columns every data line must carry (CHROM..INFO)
pub const REQUIRED_COLUMNS: usize = 8;

/// Placeholder used by VCF for missing values
pub const MISSING: &str = ".";

/// One tab-separated data line, borrowing from the input text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    /// Chromosome name (e.g., "chr1", "1", "X")
    pub chrom: &'a str,
    /// Position, kept as text
    pub pos: &'a str,
    /// Variant identifier (e.g., rsID) or "."
    pub id: &'a str,
    /// Reference allele
    pub reference: &'a str,
    /// Alternate allele(s), comma-joined when multi-allelic
    pub alternate: &'a str,
    /// Quality score, unparsed
    pub quality: &'a str,
    /// Filter status (PASS, "." or filter names)
    pub filter: &'a str,
    /// Raw INFO column
    pub info: &'a str,
}

impl<'a> RawRecord<'a> {
    /// Split a data line into its fixed columns.
    ///
    /// Returns `None` when the line has fewer than [`REQUIRED_COLUMNS`]
    /// columns. FORMAT and sample columns are ignored.
    pub fn parse(line: &'a str) -> Option<Self> {
        let cols: [&'a str; REQUIRED_COLUMNS] = line
            .splitn(REQUIRED_COLUMNS + 1, '\t')
            .take(REQUIRED_COLUMNS)
            .collect::<Vec<_>>()
            .try_into()
            .ok()?;
        let [chrom, pos, id, reference, alternate, quality, filter, info] = cols;

        Some(RawRecord {
            chrom,
            pos,
            id,
            reference,
            alternate,
            quality,
            filter,
            info,
        })
    }

    /// Check CHROM, POS, REF and ALT are usable.
    ///
    /// Missing alleles, spanning deletions (`*`) and symbolic alleles
    /// (`<DEL>`, `<DUP>`, ...) are not supported.
    pub fn has_valid_core_fields(&self) -> bool {
        !self.chrom.is_empty()
            && !self.pos.is_empty()
            && !self.reference.is_empty()
            && !self.alternate.is_empty()
            && self.reference != MISSING
            && self.alternate != MISSING
            && self.alternate != "*"
            && !self.alternate.contains('<')
    }

    /// Identifier if one is set, otherwise `chrom:pos`
    pub fn locus_label(&self) -> String {
        if !self.id.is_empty() && self.id != MISSING {
            self.id.to_string()
        } else {
            format!("{}:{}", self.chrom, self.pos)
        }
    }

    /// Display form used in summaries, e.g. "rs123 A>G" or "chr1:100 A>G"
    pub fn representation(&self) -> String {
        format!("{} {}>{}", self.locus_label(), self.reference, self.alternate)
    }

    /// Parse QUAL as a finite float; `None` for ".", NaN, infinities or
    /// anything unparseable
    pub fn quality_score(&self) -> Option<f64> {
        self.quality
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|q| q.is_finite())
    }

    /// Check the FILTER column is PASS (any case) or missing
    pub fn passes_filters(&self) -> bool {
        self.filter.eq_ignore_ascii_case("PASS") || self.filter == MISSING
    }

    /// Decode the INFO column
    pub fn info_map(&self) -> InfoMap<'a> {
        InfoMap::parse(self.info)
    }
}

/// A single INFO entry value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoValue<'a> {
    /// Key present without `=value` (or with an empty value)
    Flag,
    /// Raw value text; multiple values stay comma-joined
    Value(&'a str),
}

impl<'a> InfoValue<'a> {
    /// The value text, `None` for flags
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            InfoValue::Flag => None,
            InfoValue::Value(v) => Some(v),
        }
    }
}

/// INFO key-value pairs for one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoMap<'a> {
    entries: HashMap<&'a str, InfoValue<'a>>,
}

impl<'a> InfoMap<'a> {
    /// Parse an INFO column (`KEY=VALUE;FLAG;KEY2=V1,V2`).
    ///
    /// Each entry is split on its first `=`. Later duplicates overwrite
    /// earlier ones.
    pub fn parse(info: &'a str) -> Self {
        let entries = info
            .split(';')
            .map(|field| match field.split_once('=') {
                Some((key, value)) if !value.is_empty() => (key, InfoValue::Value(value)),
                Some((key, _)) => (key, InfoValue::Flag),
                None => (field, InfoValue::Flag),
            })
            .collect();
        Self { entries }
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<InfoValue<'a>> {
        self.entries.get(key).copied()
    }

    /// Value text for a key; `None` if absent or a flag
    pub fn value(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(|v| v.as_str())
    }

    /// Value of the first key in `keys` that carries one
    pub fn first_value(&self, keys: &[&str]) -> Option<&'a str> {
        keys.iter().find_map(|key| self.value(key))
    }

    /// Check whether a key is present (flag or value)
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map has no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
