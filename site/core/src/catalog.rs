//! Document Catalog
//!
//! The fixed, insertion-ordered list of code samples played by the typing
//! demo. A catalog is built once at startup (from the built-in table or from
//! configuration) and never mutated afterwards. Cloning is cheap: documents
//! live behind an `Arc`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::markup;

/// Errors raised while assembling a catalog
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog must hold at least one document
    #[error("catalog must contain at least one document")]
    Empty,

    /// Every document needs a tab label to show in the editor tab
    #[error("document `{id}` has an empty tab label")]
    MissingTabLabel {
        /// Identifier of the offending document
        id: String,
    },
}

/// A code sample shown in the pseudo-editor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Language identifier (e.g. "python")
    pub id: String,

    /// Name shown in the editor tab (e.g. "main.py")
    pub tab_label: String,

    /// Highlighted source, `\n`-separated, with `<span class="…">` annotations
    pub markup: String,
}

impl Document {
    /// Create a new document
    pub fn new(
        id: impl Into<String>,
        tab_label: impl Into<String>,
        markup: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            tab_label: tab_label.into(),
            markup: markup.into(),
        }
    }

    /// Raw markup of each line, in order
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        markup::split_lines(&self.markup)
    }

    /// Number of lines the gutter should show
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines().len()
    }
}

/// Immutable, cyclic sequence of documents
#[derive(Clone, Debug)]
pub struct Catalog {
    documents: Arc<[Document]>,
}

impl Catalog {
    /// Build a catalog, rejecting empty input and unlabeled documents
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Empty`] for an empty list and
    /// [`CatalogError::MissingTabLabel`] when a document has a blank label.
    pub fn new(documents: Vec<Document>) -> Result<Self, CatalogError> {
        if documents.is_empty() {
            return Err(CatalogError::Empty);
        }
        if let Some(doc) = documents.iter().find(|d| d.tab_label.trim().is_empty()) {
            return Err(CatalogError::MissingTabLabel { id: doc.id.clone() });
        }

        Ok(Self {
            documents: documents.into(),
        })
    }

    /// The catalog shipped with the showcase page
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            documents: builtin_documents().into(),
        }
    }

    /// Number of documents (never zero)
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Always false; kept for API symmetry with collections
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Document at `index`, wrapping around the end of the catalog
    #[must_use]
    pub fn get(&self, index: usize) -> &Document {
        &self.documents[index % self.documents.len()]
    }

    /// Index that follows `index` in playback order
    #[must_use]
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.documents.len()
    }

    /// Iterate over documents in playback order
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Built-in language samples, in playback order
fn builtin_documents() -> Vec<Document> {
    vec![
        Document::new(
            "python",
            "main.py",
            concat!(
                "<span class=\"comment\"># Automatiza tu negocio con EusaSpark</span>\n",
                "<span class=\"keyword\">from</span> eusaspark <span class=\"keyword\">import</span> Spark\n",
                "\n",
                "<span class=\"keyword\">def</span> <span class=\"function\">launch</span>(project):\n",
                "    spark = Spark(project, workers=<span class=\"number\">4</span>)\n",
                "    spark.optimize(<span class=\"string\">\"performance\"</span>)\n",
                "    <span class=\"keyword\">return</span> spark.deploy(<span class=\"string\">\"production\"</span>)",
            ),
        ),
        Document::new(
            "javascript",
            "app.js",
            concat!(
                "<span class=\"comment\">// Interfaces que enamoran</span>\n",
                "<span class=\"keyword\">const</span> app = <span class=\"function\">createApp</span>({\n",
                "  name: <span class=\"string\">'EusaSpark'</span>,\n",
                "  theme: <span class=\"string\">'spark'</span>,\n",
                "  speed: <span class=\"number\">100</span>,\n",
                "});\n",
                "\n",
                "app.<span class=\"function\">mount</span>(<span class=\"string\">'#root'</span>);",
            ),
        ),
        Document::new(
            "rust",
            "main.rs",
            concat!(
                "<span class=\"comment\">// Rendimiento sin compromisos</span>\n",
                "<span class=\"keyword\">use</span> eusaspark::<span class=\"type\">Engine</span>;\n",
                "\n",
                "<span class=\"keyword\">fn</span> <span class=\"function\">main</span>() {\n",
                "    <span class=\"keyword\">let</span> engine = <span class=\"type\">Engine</span>::<span class=\"function\">new</span>(<span class=\"number\">8</span>);\n",
                "    engine.<span class=\"function\">ignite</span>(<span class=\"string\">\"cloud\"</span>);\n",
                "}",
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let builtin = Catalog::builtin();
        let rebuilt = Catalog::new(builtin.iter().cloned().collect()).unwrap();

        assert_eq!(rebuilt.len(), 3);
        assert_eq!(builtin.get(0).tab_label, "main.py");
        assert_eq!(builtin.get(1).tab_label, "app.js");
        assert_eq!(builtin.get(2).tab_label, "main.rs");
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert_eq!(Catalog::new(Vec::new()).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn test_blank_tab_label_rejected() {
        let err = Catalog::new(vec![Document::new("go", "  ", "package main")]).unwrap_err();
        assert_eq!(err, CatalogError::MissingTabLabel { id: "go".into() });
    }

    #[test]
    fn test_index_wraps() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.next_index(0), 1);
        assert_eq!(catalog.next_index(2), 0);
        assert_eq!(catalog.get(3).id, catalog.get(0).id);
    }

    #[test]
    fn test_split_join_round_trip_for_builtins() {
        for doc in Catalog::builtin().iter() {
            assert_eq!(doc.lines().join("\n"), doc.markup, "{}", doc.id);
        }
    }

    #[test]
    fn test_builtin_lines_have_no_dangling_tags() {
        for doc in Catalog::builtin().iter() {
            for line in doc.lines() {
                assert_eq!(
                    line.matches('<').count(),
                    line.matches('>').count(),
                    "unbalanced delimiters in {}: {line}",
                    doc.id
                );
            }
        }
    }

    #[test]
    fn test_line_count_matches_split() {
        let doc = Document::new("t", "t.txt", "a\n\nb");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.lines(), vec!["a", "", "b"]);
    }
}
