// 🏷️ Category Store - categories as data
// Ordered category → keyword mapping, mirrored to a single persisted document.
// Iteration order is the insertion order of the serialized representation, so
// classification behavior is reproducible across runs.

use serde::{Deserialize, Serialize};

use crate::db::{DocStore, CATEGORIES_DOC_ID};
use crate::error::{Error, Result};

/// Reserved category every book carries. It never gains keywords through the
/// normal add-keyword path and the classifier skips it.
pub const UNCATEGORIZED: &str = "Uncategorized";

// ============================================================================
// CATEGORY BOOK
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// Category name (unique, case-sensitive)
    pub name: String,

    /// Keywords compared case-insensitively against transaction Details
    pub keywords: Vec<String>,
}

/// The full category → keyword mapping, in insertion order.
///
/// Serialized as an array of entries rather than a JSON object so the order
/// that drives last-match-wins classification is an explicit property of the
/// document, not an accident of a map type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBook {
    pub categories: Vec<CategoryEntry>,
}

impl CategoryBook {
    /// Book containing only the reserved category.
    pub fn default_book() -> Self {
        CategoryBook {
            categories: vec![CategoryEntry {
                name: UNCATEGORIZED.to_string(),
                keywords: Vec::new(),
            }],
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    /// Position of a category in insertion order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&CategoryEntry> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Category names in insertion order (for selection controls).
    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryEntry> {
        self.categories.iter()
    }

    fn push_category(&mut self, name: &str) -> usize {
        self.categories.push(CategoryEntry {
            name: name.to_string(),
            keywords: Vec::new(),
        });
        self.categories.len() - 1
    }
}

// ============================================================================
// CATEGORY STORE
// ============================================================================

/// The category book plus its backing document store.
///
/// All persistence is fail-soft: a backing failure degrades the operation to
/// in-memory behavior with a warning, and the session continues. Concurrent
/// writers are tolerated only as last-write-wins upserts.
pub struct CategoryStore {
    book: CategoryBook,
    backend: Option<DocStore>,
}

impl CategoryStore {
    /// In-memory-only store (no connection string configured).
    pub fn in_memory() -> Self {
        CategoryStore {
            book: CategoryBook::default_book(),
            backend: None,
        }
    }

    /// Load the persisted book through the given backend.
    ///
    /// A missing document initializes and persists the default book. Any
    /// backing error falls back to the default book with a warning; the
    /// session never aborts over a store failure.
    pub fn load(mut backend: DocStore) -> Self {
        let book = match Self::load_book(&mut backend) {
            Ok(book) => book,
            Err(e) => {
                log::warn!("could not load categories, using defaults: {}", e);
                backend.reset();
                CategoryBook::default_book()
            }
        };

        CategoryStore {
            book,
            backend: Some(backend),
        }
    }

    fn load_book(backend: &mut DocStore) -> Result<CategoryBook> {
        match backend.fetch(CATEGORIES_DOC_ID)? {
            Some(body) => {
                let mut book: CategoryBook = serde_json::from_str(&body)
                    .map_err(|e| Error::Validation(format!("corrupt category document: {}", e)))?;
                // The reserved category must survive external edits.
                if !book.contains(UNCATEGORIZED) {
                    book.categories.insert(
                        0,
                        CategoryEntry {
                            name: UNCATEGORIZED.to_string(),
                            keywords: Vec::new(),
                        },
                    );
                }
                Ok(book)
            }
            None => {
                let book = CategoryBook::default_book();
                let body = serde_json::to_string(&book)
                    .map_err(|e| Error::Validation(e.to_string()))?;
                backend.upsert(CATEGORIES_DOC_ID, &body)?;
                Ok(book)
            }
        }
    }

    pub fn book(&self) -> &CategoryBook {
        &self.book
    }

    /// Add a keyword to a category.
    ///
    /// Returns false without mutation for empty keywords, the reserved
    /// category, and case-insensitive duplicates. A missing category is
    /// created with an empty keyword set first.
    ///
    /// Persistence order: targeted array-append at the category's entry in
    /// the stored document (addressed by name); on failure, whole-book
    /// upsert; if that also fails the in-memory mutation stands (known
    /// eventual-consistency gap, not an abort).
    pub fn add_keyword(&mut self, category: &str, keyword: &str) -> bool {
        let keyword = keyword.trim();
        if keyword.is_empty() || category == UNCATEGORIZED {
            return false;
        }

        let (slot, created) = match self.book.position(category) {
            Some(slot) => (slot, false),
            None => (self.book.push_category(category), true),
        };

        let lowered = keyword.to_lowercase();
        let entry = &mut self.book.categories[slot];
        if entry.keywords.iter().any(|k| k.to_lowercase() == lowered) {
            return false;
        }
        entry.keywords.push(keyword.to_string());

        if created {
            // The document has no entry for a brand-new category, so the
            // targeted append cannot land; write the whole book once.
            self.persist_book();
        } else {
            self.persist_keyword(category, keyword);
        }
        true
    }

    /// Create an empty category. False when the name is already taken.
    pub fn create_category(&mut self, name: &str) -> bool {
        if self.book.contains(name) {
            return false;
        }

        self.book.push_category(name);
        self.persist_book();
        true
    }

    /// Whole-book upsert under the fixed document id. Best-effort: a failure
    /// is logged and the in-memory book keeps the change.
    pub fn persist(&mut self) {
        self.persist_book();
    }

    fn persist_keyword(&mut self, category: &str, keyword: &str) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        match backend.append_keyword(CATEGORIES_DOC_ID, category, keyword) {
            Ok(true) => {}
            Ok(false) => {
                // Document or named entry missing: fall back to the full book.
                self.persist_book();
            }
            Err(e) => {
                log::warn!("keyword append failed, persisting full book: {}", e);
                self.persist_book();
            }
        }
    }

    fn persist_book(&mut self) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        let body = match serde_json::to_string(&self.book) {
            Ok(body) => body,
            Err(e) => {
                log::warn!("could not serialize category book: {}", e);
                return;
            }
        };

        if let Err(e) = backend.upsert(CATEGORIES_DOC_ID, &body) {
            log::warn!("could not persist categories (keeping in-memory state): {}", e);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
