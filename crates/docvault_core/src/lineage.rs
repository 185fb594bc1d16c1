//! crates/docvault_core/src/lineage.rs
//!
//! Reconstructs a document's version lineage from `parent_version`
//! back-references.

use std::collections::{HashMap, HashSet};

use crate::domain::{Document, DocumentId};

/// The chain ending at `id`, oldest version first.
///
/// Walks `parent_version` links through `documents`. The walk stops at a
/// parent that is not in the collection or at a link that would revisit a
/// document. Returns an empty chain when `id` itself is unknown.
pub fn version_chain(documents: &[Document], id: DocumentId) -> Vec<&Document> {
    let by_id: HashMap<DocumentId, &Document> = documents.iter().map(|d| (d.id, d)).collect();

    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor = by_id.get(&id).copied();

    while let Some(doc) = cursor {
        if !seen.insert(doc.id) {
            break;
        }
        chain.push(doc);
        cursor = doc.parent_version.and_then(|parent| by_id.get(&parent).copied());
    }

    chain.reverse();
    chain
}

/// The newest document of every lineage in the collection: documents that no
/// other document names as its parent.
pub fn latest_versions(documents: &[Document]) -> Vec<&Document> {
    let parents: HashSet<DocumentId> = documents.iter().filter_map(|d| d.parent_version).collect();
    documents.iter().filter(|d| !parents.contains(&d.id)).collect()
}
