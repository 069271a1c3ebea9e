//! Canonical artifacts: content-hashed, insertion-ordered section state

use crate::section::Section;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Blake3 hash of an artifact's canonical bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash a byte slice
    #[inline]
    #[must_use]
    pub fn compute(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    /// Raw digest bytes
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// A canonical, versioned section document
///
/// Assembled only by applying an ordered delta list; applying the same
/// ordered list twice yields a bit-identical artifact, and the content
/// hash is the equality proxy used by replay tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    section: Section,
    /// Number of deltas applied so far
    version: u64,
    /// Keyed entries in first-insertion order
    entries: IndexMap<String, serde_json::Value>,
    hash: ContentHash,
}

impl Artifact {
    /// Empty artifact for a section
    #[must_use]
    pub fn empty(section: Section) -> Self {
        let mut artifact = Self {
            section,
            version: 0,
            entries: IndexMap::new(),
            hash: ContentHash::compute(&[]),
        };
        artifact.rehash();
        artifact
    }

    /// Section this artifact canonicalizes
    #[inline]
    #[must_use]
    pub fn section(&self) -> Section {
        self.section
    }

    /// Number of deltas applied
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Entries in first-insertion order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &IndexMap<String, serde_json::Value> {
        &self.entries
    }

    /// Look up one entry by key
    #[inline]
    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.get(key)
    }

    /// Content hash over the canonical bytes
    #[inline]
    #[must_use]
    pub fn hash(&self) -> ContentHash {
        self.hash
    }

    /// Whether the stored hash matches a recomputation
    ///
    /// Useful after deserialization.
    #[must_use]
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn insert(&mut self, key: String, payload: serde_json::Value) {
        self.entries.insert(key, payload);
        self.version += 1;
        self.rehash();
    }

    pub(crate) fn remove(&mut self, key: &str) {
        // shift_remove keeps the remaining insertion order stable, which
        // the canonical byte form depends on.
        self.entries.shift_remove(key);
        self.version += 1;
        self.rehash();
    }

    pub(crate) fn bump_noop(&mut self) {
        self.version += 1;
        self.rehash();
    }

    fn compute_hash(&self) -> ContentHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.section.wire_name().as_bytes());
        hasher.update(&self.version.to_le_bytes());
        for (key, value) in &self.entries {
            hasher.update(&(key.len() as u64).to_le_bytes());
            hasher.update(key.as_bytes());
            // serde_json renders Value maps in sorted key order, so equal
            // values yield equal bytes.
            let rendered = value.to_string();
            hasher.update(&(rendered.len() as u64).to_le_bytes());
            hasher.update(rendered.as_bytes());
        }
        ContentHash(*hasher.finalize().as_bytes())
    }

    fn rehash(&mut self) {
        self.hash = self.compute_hash();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_artifacts_of_same_section_agree() {
        let a = Artifact::empty(Section::AnomalyRegister);
        let b = Artifact::empty(Section::AnomalyRegister);
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn sections_hash_apart() {
        let a = Artifact::empty(Section::AnomalyRegister);
        let b = Artifact::empty(Section::AssumptionLedger);
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn insert_changes_hash_and_version() {
        let mut artifact = Artifact::empty(Section::AssumptionLedger);
        let before = artifact.hash();
        artifact.insert("A1".into(), json!({ "id": "A1", "assumption": "x" }));
        assert_ne!(artifact.hash(), before);
        assert_eq!(artifact.version(), 1);
        assert!(artifact.contains("A1"));
    }

    #[test]
    fn verify_detects_tampering() {
        let mut artifact = Artifact::empty(Section::AssumptionLedger);
        artifact.insert("A1".into(), json!({ "id": "A1" }));
        assert!(artifact.verify());

        let mut wire: serde_json::Value = serde_json::to_value(&artifact).unwrap();
        wire["entries"]["A1"]["id"] = json!("A2");
        let tampered: Artifact = serde_json::from_value(wire).unwrap();
        assert!(!tampered.verify());
    }
}
