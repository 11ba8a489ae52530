//! LRU+TTL result cache (§4.I), grounded on `composer-ai`'s
//! `analysis_cache: Arc<DashMap<String, DifficultyAssessment>>`
//! check/compute/insert pattern, extended with a `parking_lot`-guarded
//! recency queue so overflow evicts the least-recently-used entry
//! instead of growing unbounded.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;
use tonality_config::CacheDefaults;

use crate::interpretation::MultipleInterpretationResult;

/// A normalized fingerprint of a request (§4.I): "uppercase root,
/// flat-preferred accidentals, trimmed whitespace" for the chord
/// sequence, plus the remaining option fields verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Fingerprint(String);

impl Fingerprint {
    fn new(
        chords: &[String],
        parent_key: Option<&str>,
        pedagogical_level: tonality_config::PedagogicalLevel,
        confidence_threshold: f64,
        max_alternatives: usize,
    ) -> Self {
        let normalized_chords: Vec<String> = chords
            .iter()
            .map(|c| normalize_chord_symbol(c))
            .collect();
        let normalized_key = parent_key.map(|k| k.trim().to_uppercase()).unwrap_or_default();
        Self(format!(
            "[{}]|{}|{:?}|{:.4}|{}",
            normalized_chords.join(","),
            normalized_key,
            pedagogical_level,
            confidence_threshold,
            max_alternatives
        ))
    }
}

/// Uppercase the root letter, flatten sharps, trim whitespace — a
/// cache-only normalization, independent of (and cruder than)
/// `tonality_core::parser::normalize_chord_symbol`.
fn normalize_chord_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase().replace('#', "b")
}

struct Entry {
    value: MultipleInterpretationResult,
    inserted_at: Instant,
}

/// The interpretation service's result cache (§4.I). No background
/// eviction thread: expired entries are reaped lazily, on the next
/// `get` or `insert` that touches them.
pub struct Cache {
    capacity: usize,
    ttl: Duration,
    entries: DashMap<Fingerprint, Entry>,
    recency: Mutex<VecDeque<Fingerprint>>,
}

impl Cache {
    #[must_use]
    pub fn new(defaults: &CacheDefaults) -> Self {
        Self {
            capacity: defaults.capacity,
            ttl: Duration::from_secs(defaults.ttl_seconds),
            entries: DashMap::new(),
            recency: Mutex::new(VecDeque::new()),
        }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(&tonality_config::CACHE_DEFAULTS)
    }

    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn get(
        &self,
        chords: &[String],
        parent_key: Option<&str>,
        pedagogical_level: tonality_config::PedagogicalLevel,
        confidence_threshold: f64,
        max_alternatives: usize,
    ) -> Option<MultipleInterpretationResult> {
        let fingerprint = Fingerprint::new(
            chords,
            parent_key,
            pedagogical_level,
            confidence_threshold,
            max_alternatives,
        );
        let entry = self.entries.get(&fingerprint)?;
        if entry.inserted_at.elapsed() > self.ttl {
            drop(entry);
            self.entries.remove(&fingerprint);
            return None;
        }
        let value = entry.value.clone();
        drop(entry);
        self.touch(&fingerprint);
        Some(value)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn insert(
        &self,
        chords: &[String],
        parent_key: Option<&str>,
        pedagogical_level: tonality_config::PedagogicalLevel,
        confidence_threshold: f64,
        max_alternatives: usize,
        value: MultipleInterpretationResult,
    ) {
        let fingerprint = Fingerprint::new(
            chords,
            parent_key,
            pedagogical_level,
            confidence_threshold,
            max_alternatives,
        );
        self.entries.insert(
            fingerprint.clone(),
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
        self.touch(&fingerprint);
        self.evict_if_over_capacity();
    }

    /// Move `fingerprint` to the back of the recency queue (most
    /// recently used), appending it if this is its first appearance.
    fn touch(&self, fingerprint: &Fingerprint) {
        let mut queue = self.recency.lock();
        queue.retain(|f| f != fingerprint);
        queue.push_back(fingerprint.clone());
    }

    fn evict_if_over_capacity(&self) {
        while self.entries.len() > self.capacity {
            let oldest = {
                let mut queue = self.recency.lock();
                queue.pop_front()
            };
            match oldest {
                Some(fingerprint) => {
                    self.entries.remove(&fingerprint);
                }
                None => break,
            }
        }
    }

    /// Number of live entries. Exposed for tests and diagnostics, mirroring
    /// the source stack's `cache_stats()` convention.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.recency.lock().clear();
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpretation::{AnalysisInput, AnalysisMetadata, ConfidenceBreakdown, Interpretation};
    use crate::common::{Classification, InterpretationType, ParentKeyRelationship};
    use tonality_config::PedagogicalLevel;
    use tonality_core::key::Key;
    use tonality_core::pitch::{Accidental, Note};

    fn sample_result() -> MultipleInterpretationResult {
        let key = Key::major(Note::new('C', Accidental::Natural).unwrap());
        let primary = Interpretation {
            interpretation_type: InterpretationType::Functional,
            confidence: 0.9,
            summary: "functional analysis in C major".to_string(),
            roman_numerals: vec![],
            key,
            mode: None,
            cadences: vec![],
            evidence: vec![],
            chord_functions: vec![],
            modal_characteristics: vec![],
            secondary_dominants: vec![],
            borrowed_chords: vec![],
            chromatic_mediants: vec![],
            contextual_classification: Classification::Diatonic,
            parent_key_relationship: ParentKeyRelationship::None,
            breakdown: ConfidenceBreakdown {
                functional: 0.9,
                modal: 0.2,
                chromatic: 0.2,
            },
        };
        MultipleInterpretationResult {
            input: AnalysisInput {
                chords: vec!["C".to_string()],
                parent_key: None,
                pedagogical_level: PedagogicalLevel::Intermediate,
                confidence_threshold: 0.5,
                max_alternatives: 2,
            },
            primary,
            alternatives: vec![],
            suggestions: None,
            metadata: AnalysisMetadata {
                duration_ms: 1.0,
                interpretations_considered: 3,
                confidence_threshold_used: 0.5,
                pedagogical_level: PedagogicalLevel::Intermediate,
            },
        }
    }

    #[test]
    fn miss_then_hit_after_insert() {
        let cache = Cache::with_defaults();
        let chords = vec!["C".to_string(), "F".to_string(), "G".to_string()];
        assert!(cache
            .get(&chords, None, PedagogicalLevel::Intermediate, 0.5, 2)
            .is_none());
        cache.insert(&chords, None, PedagogicalLevel::Intermediate, 0.5, 2, sample_result());
        assert!(cache
            .get(&chords, None, PedagogicalLevel::Intermediate, 0.5, 2)
            .is_some());
    }

    #[test]
    fn overflow_evicts_least_recently_used() {
        let cache = Cache::new(&CacheDefaults {
            capacity: 2,
            ttl_seconds: 600,
        });
        for root in ["C", "D", "E"] {
            let chords = vec![root.to_string()];
            cache.insert(&chords, None, PedagogicalLevel::Intermediate, 0.5, 2, sample_result());
        }
        assert_eq!(cache.len(), 2);
        assert!(cache
            .get(&["C".to_string()], None, PedagogicalLevel::Intermediate, 0.5, 2)
            .is_none());
    }

    #[test]
    fn expired_entry_is_treated_as_a_miss() {
        let cache = Cache::new(&CacheDefaults {
            capacity: 10,
            ttl_seconds: 0,
        });
        let chords = vec!["C".to_string()];
        cache.insert(&chords, None, PedagogicalLevel::Intermediate, 0.5, 2, sample_result());
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache
            .get(&chords, None, PedagogicalLevel::Intermediate, 0.5, 2)
            .is_none());
    }

    #[test]
    fn normalized_fingerprint_is_case_and_whitespace_insensitive() {
        let a = Fingerprint::new(
            &["  c ".to_string()],
            Some(" c major "),
            PedagogicalLevel::Intermediate,
            0.5,
            2,
        );
        let b = Fingerprint::new(
            &["C".to_string()],
            Some("C MAJOR"),
            PedagogicalLevel::Intermediate,
            0.5,
            2,
        );
        assert_eq!(a, b);
    }
}
