use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use regex::Regex;
use tracing::{debug, warn};

use crate::record::Confidence;

use super::labels;

static CONFIDENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*(?:/\s*(\d+))?").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BlockKey {
    label: String,
    stops: Vec<String>,
}

/// Compiled matchers for one `(label, stop-set)` pair.
#[derive(Debug)]
pub struct BlockMatcher {
    start: Regex,
    inline: Regex,
    stop: Option<Regex>,
}

impl BlockMatcher {
    fn compile(label: &str, stops: &[String]) -> Result<Self, regex::Error> {
        let escaped = regex::escape(label);
        let start = Regex::new(&format!(r"(?im)^[ \t]*{escaped}:[ \t\r]*$"))?;
        let inline = Regex::new(&format!(r"(?im)^[ \t]*{escaped}[ \t]*:[ \t]*(.*?)[ \t\r]*$"))?;
        let stop = if stops.is_empty() {
            None
        } else {
            let alternation = stops
                .iter()
                .map(|s| regex::escape(s))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"(?im)^[ \t]*(?:{alternation})[ \t]*:"))?)
        };
        Ok(BlockMatcher { start, inline, stop })
    }

    /// Block-start form first; falls back to the first non-empty inline value.
    pub fn extract(&self, text: &str) -> Option<String> {
        if let Some(m) = self.start.find(text) {
            let body_start = match text[m.end()..].find('\n') {
                Some(nl) => m.end() + nl + 1,
                None => text.len(),
            };
            let rest = &text[body_start..];
            let body_end = self
                .stop
                .as_ref()
                .and_then(|re| re.find(rest))
                .map(|s| s.start())
                .unwrap_or(rest.len());
            return Some(rest[..body_end].trim().to_string());
        }

        self.inline
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    }
}

/// Memoized label patterns, keyed by upper-cased label (and stop set).
/// Safe to share across threads; a racing insert keeps the first value.
#[derive(Debug, Default)]
pub struct PatternCache {
    blocks: RwLock<HashMap<BlockKey, Arc<BlockMatcher>>>,
    fields: RwLock<HashMap<String, Arc<Regex>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_entries(&self) -> usize {
        self.blocks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn field_entries(&self) -> usize {
        self.fields.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn block(&self, label: &str, stops: &[&str]) -> Result<Arc<BlockMatcher>, regex::Error> {
        let key = BlockKey {
            label: label.to_uppercase(),
            stops: stops.iter().map(|s| s.to_uppercase()).collect(),
        };
        if let Some(hit) = self
            .blocks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(hit));
        }

        debug!(label = %key.label, stops = ?key.stops, "compiling block matcher");
        let compiled = Arc::new(BlockMatcher::compile(&key.label, &key.stops)?);
        let mut map = self.blocks.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(map.entry(key).or_insert(compiled)))
    }

    fn field(&self, key: &str) -> Result<Arc<Regex>, regex::Error> {
        let key = key.to_uppercase();
        if let Some(hit) = self
            .fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(hit));
        }

        debug!(key = %key, "compiling field matcher");
        let escaped = regex::escape(&key);
        let compiled = Arc::new(Regex::new(&format!(
            r"(?im)^[ \t]*{escaped}[ \t]*:[ \t]*(.*?)[ \t\r]*$"
        ))?);
        let mut map = self.fields.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(map.entry(key).or_insert(compiled)))
    }
}

/// Pulls `KEY: value` fields and label-bounded blocks out of model output.
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    cache: Arc<PatternCache>,
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: Arc<PatternCache>) -> Self {
        FieldExtractor { cache }
    }

    pub fn cache(&self) -> &Arc<PatternCache> {
        &self.cache
    }

    /// First line starting with `key:` (case-insensitive). Blank values count
    /// as absent, and later duplicates are never consulted.
    pub fn field(&self, text: &str, key: &str) -> Option<String> {
        let re = match self.cache.field(key) {
            Ok(re) => re,
            Err(e) => {
                warn!(key, error = %e, "field pattern failed to compile");
                return None;
            }
        };
        let value = re.captures(text)?[1].trim().to_string();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    pub fn field_or(&self, text: &str, key: &str, default: &str) -> String {
        self.field(text, key).unwrap_or_else(|| default.to_string())
    }

    /// Text after a `label:` line up to the first line opening with one of
    /// `stops`. Without a bare `label:` line, the inline `label: value` wins.
    pub fn block(&self, text: &str, label: &str, stops: &[&str]) -> Option<String> {
        self.matcher(label, stops).and_then(|m| m.extract(text))
    }

    pub fn matcher(&self, label: &str, stops: &[&str]) -> Option<Arc<BlockMatcher>> {
        match self.cache.block(label, stops) {
            Ok(m) => Some(m),
            Err(e) => {
                warn!(label, error = %e, "block pattern failed to compile");
                None
            }
        }
    }

    /// `Confidence: 8/10` → score 8, scale 10. A bare number assumes `/10`.
    pub fn confidence(&self, text: &str) -> Option<Confidence> {
        let value = self.field(text, labels::CONFIDENCE)?;
        let caps = CONFIDENCE_RE.captures(&value)?;
        let score = caps[1].parse().ok()?;
        let scale = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 10,
        };
        Some(Confidence {
            score,
            scale,
            raw: value,
        })
    }
}
