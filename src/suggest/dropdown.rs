//! Dropdown model for suggestion results
//!
//! A [`Dropdown`] is built from one suggestion response and owns everything
//! the widget renders: the ordered rows (section headers interleaved with
//! selectable items) and the active-item cursor driven by arrow keys.
//!
//! Row order is fixed: the full-text-search entry first, then matched titles
//! under a "Titles" header, then matched topics under a "Topics" header.
//! Headers are never selectable. The cursor starts with no selection and
//! wraps circularly in both directions.

use crate::server::{CatalogClient, SuggestionResponse};

/// Section header shown above the title items
const TITLES_HEADER: &str = "Titles";

/// Section header shown above the topic items
const TOPICS_HEADER: &str = "Topics";

/// Catalog destination a dropdown item resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Full-text search over the whole catalog
    FullTextSearch { query: String },

    /// A single kata page
    Kata { id: String },

    /// The catalog filtered to one topic
    Topic { name: String },
}

impl Target {
    /// Resolve the target to a catalog URL
    ///
    /// # Arguments
    /// * `client` - Catalog client providing the base URL
    ///
    /// # Returns
    /// * `String` - Absolute URL for this target
    pub fn url(&self, client: &CatalogClient) -> String {
        match self {
            Target::FullTextSearch { query } => client.search_url(query),
            Target::Kata { id } => client.kata_url(id),
            Target::Topic { name } => client.topic_url(name),
        }
    }
}

/// One rendered dropdown row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Non-selectable section header
    Header(String),

    /// Selectable item; `index` addresses the item's target and the
    /// active-cursor position space
    Item { label: String, index: usize },
}

/// Dropdown of suggestion items with keyboard cursor state
#[derive(Debug, Clone)]
pub struct Dropdown {
    /// Query the dropdown was built from
    query: String,

    /// Rows in render order, headers interleaved with items
    rows: Vec<Row>,

    /// Navigation target per selectable item, indexed by item index
    targets: Vec<Target>,

    /// Active item index; `None` means no selection
    active: Option<usize>,
}

impl Dropdown {
    /// Build a dropdown from a suggestion response
    ///
    /// # Arguments
    /// * `query` - Query the response answers
    /// * `response` - Suggestion response from the server
    ///
    /// # Returns
    /// * `Option<Dropdown>` - New dropdown, or None when the response is empty
    pub fn from_response(query: &str, response: &SuggestionResponse) -> Option<Self> {
        if response.is_empty() {
            return None;
        }

        let mut rows = Vec::new();
        let mut targets = Vec::new();

        let push_item = |rows: &mut Vec<Row>, targets: &mut Vec<Target>, label, target| {
            let index = targets.len();
            rows.push(Row::Item { label, index });
            targets.push(target);
        };

        push_item(
            &mut rows,
            &mut targets,
            format!("Search everything for '{query}'"),
            Target::FullTextSearch {
                query: query.to_string(),
            },
        );

        if !response.titles.is_empty() {
            rows.push(Row::Header(TITLES_HEADER.to_string()));
            for hit in &response.titles {
                push_item(
                    &mut rows,
                    &mut targets,
                    hit.title.clone(),
                    Target::Kata { id: hit.id.clone() },
                );
            }
        }

        if !response.topics.is_empty() {
            rows.push(Row::Header(TOPICS_HEADER.to_string()));
            for topic in &response.topics {
                push_item(
                    &mut rows,
                    &mut targets,
                    topic.clone(),
                    Target::Topic {
                        name: topic.clone(),
                    },
                );
            }
        }

        Some(Self {
            query: query.to_string(),
            rows,
            targets,
            active: None,
        })
    }

    /// Get the query the dropdown was built from
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Get the rows in render order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get the number of selectable items
    pub fn item_count(&self) -> usize {
        self.targets.len()
    }

    /// Get the active item index, if any
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Move the cursor to the next item, wrapping to the first after the last
    ///
    /// With no selection the cursor moves to the first item.
    pub fn select_next(&mut self) {
        if self.targets.is_empty() {
            return;
        }
        self.active = Some(match self.active {
            None => 0,
            Some(i) => (i + 1) % self.targets.len(),
        });
    }

    /// Move the cursor to the previous item, wrapping to the last before the first
    ///
    /// With no selection the cursor moves to the last item.
    pub fn select_prev(&mut self) {
        if self.targets.is_empty() {
            return;
        }
        let last = self.targets.len() - 1;
        self.active = Some(match self.active {
            None | Some(0) => last,
            Some(i) => i - 1,
        });
    }

    /// Set the active item explicitly
    ///
    /// Out-of-range indexes clear the selection so the cursor invariant
    /// (valid index or no selection) always holds.
    ///
    /// # Arguments
    /// * `index` - Item index to activate, or None to clear
    pub fn set_active(&mut self, index: Option<usize>) {
        self.active = index.filter(|i| *i < self.targets.len());
    }

    /// Get the target of the active item, if any
    ///
    /// # Returns
    /// * `Option<&Target>` - Target to navigate to; None when nothing is selected
    pub fn activate(&self) -> Option<&Target> {
        self.active.and_then(|i| self.targets.get(i))
    }

    /// Get the target of a specific item
    ///
    /// # Arguments
    /// * `index` - Item index
    ///
    /// # Returns
    /// * `Option<&Target>` - The item's target, if the index is valid
    pub fn target(&self, index: usize) -> Option<&Target> {
        self.targets.get(index)
    }

    /// Map a row position to the selectable item at that row
    ///
    /// # Arguments
    /// * `row_index` - Zero-based row position within the rendered dropdown
    ///
    /// # Returns
    /// * `Option<usize>` - Item index, or None for headers and out-of-range rows
    pub fn item_at_row(&self, row_index: usize) -> Option<usize> {
        match self.rows.get(row_index) {
            Some(Row::Item { index, .. }) => Some(*index),
            _ => None,
        }
    }
}
