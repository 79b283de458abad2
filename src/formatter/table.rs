//! Table formatting for suggestion results using tabled
//!
//! Renders the suggestions of one query as a table with kind, label and
//! link columns:
//! - Builder pattern so the row set stays dynamic
//! - Configurable styles and column width limits
//! - Optional header colorization

use tabled::{
    builder::Builder,
    settings::{Alignment, Color, Modify, Style, object::Columns, object::Rows, width::Width},
};

use crate::error::Result;
use crate::server::{CatalogClient, SuggestionResponse};

/// Maximum width for the label column (characters)
const DEFAULT_MAX_LABEL_WIDTH: usize = 40;

/// Table formatter for suggestion results
pub struct TableFormatter {
    /// Maximum label column width
    max_label_width: usize,

    /// Table style
    style: TableStyle,

    /// Enable colored output
    use_colors: bool,
}

/// Available table styles
#[derive(Debug, Clone, Copy)]
pub enum TableStyle {
    /// Modern style with sharp corners
    Modern,
    /// ASCII style with basic characters
    Ascii,
    /// Rounded style
    Rounded,
    /// Markdown style
    Markdown,
    /// Psql style
    Psql,
}

impl TableFormatter {
    /// Create a new table formatter with default settings
    ///
    /// # Returns
    /// * `Self` - New table formatter
    pub fn new() -> Self {
        Self {
            max_label_width: DEFAULT_MAX_LABEL_WIDTH,
            style: TableStyle::Rounded,
            use_colors: false,
        }
    }

    /// Create a new table formatter with color support
    ///
    /// # Arguments
    /// * `use_colors` - Enable colored output
    ///
    /// # Returns
    /// * `Self` - New table formatter
    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    /// Set the table style
    ///
    /// # Arguments
    /// * `style` - Style to use
    ///
    /// # Returns
    /// * `Self` - Modified formatter
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    /// Set maximum label column width
    ///
    /// # Arguments
    /// * `width` - Maximum label column width
    ///
    /// # Returns
    /// * `Self` - Modified formatter
    pub fn with_max_label_width(mut self, width: usize) -> Self {
        self.max_label_width = width;
        self
    }

    /// Format a suggestion response as a table
    ///
    /// # Arguments
    /// * `query` - Query the response answers
    /// * `response` - Suggestion response from the server
    /// * `client` - Catalog client for resolving target URLs
    ///
    /// # Returns
    /// * `Result<String>` - Table string or error
    pub fn format(
        &self,
        query: &str,
        response: &SuggestionResponse,
        client: &CatalogClient,
    ) -> Result<String> {
        if response.is_empty() {
            return Ok("(no suggestions)".to_string());
        }

        let mut builder = Builder::default();
        builder.push_record(["Kind", "Label", "Link"]);

        builder.push_record([
            "search".to_string(),
            format!("Search everything for '{query}'"),
            client.search_url(query),
        ]);
        for hit in &response.titles {
            builder.push_record([
                "title".to_string(),
                hit.title.clone(),
                client.kata_url(&hit.id),
            ]);
        }
        for topic in &response.topics {
            builder.push_record([
                "topic".to_string(),
                topic.clone(),
                client.topic_url(topic),
            ]);
        }

        let mut table = builder.build();
        self.apply_style(&mut table);

        // Wrap long labels instead of letting them blow up the table
        table.with(Modify::new(Columns::new(1..=1)).with(Width::wrap(self.max_label_width)));
        table.with(Modify::new(Rows::first()).with(Alignment::center()));

        if self.use_colors {
            table.modify(Rows::first(), Color::FG_CYAN | Color::BOLD);
        }

        Ok(table.to_string())
    }

    /// Apply the configured style to a table
    fn apply_style(&self, table: &mut tabled::Table) {
        match self.style {
            TableStyle::Modern => {
                table.with(Style::modern());
            }
            TableStyle::Ascii => {
                table.with(Style::ascii());
            }
            TableStyle::Rounded => {
                table.with(Style::rounded());
            }
            TableStyle::Markdown => {
                table.with(Style::markdown());
            }
            TableStyle::Psql => {
                table.with(Style::psql());
            }
        }
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::server::TitleHit;

    fn test_client() -> CatalogClient {
        CatalogClient::new(&ServerConfig {
            base_url: "http://localhost:5000".to_string(),
            ..ServerConfig::default()
        })
        .expect("valid config")
    }

    fn sample_response() -> SuggestionResponse {
        SuggestionResponse {
            titles: vec![TitleHit {
                id: "1".to_string(),
                title: "Foo".to_string(),
            }],
            topics: vec!["Bar".to_string()],
        }
    }

    #[test]
    fn test_table_contains_all_rows() {
        let formatter = TableFormatter::new();
        let output = formatter
            .format("fo", &sample_response(), &test_client())
            .expect("format");

        assert!(output.contains("Kind"));
        assert!(output.contains("search"));
        assert!(output.contains("title"));
        assert!(output.contains("Foo"));
        assert!(output.contains("topic"));
        assert!(output.contains("Bar"));
        assert!(output.contains("http://localhost:5000/kata/1"));
    }

    #[test]
    fn test_empty_response() {
        let formatter = TableFormatter::new();
        let output = formatter
            .format("zz", &SuggestionResponse::default(), &test_client())
            .expect("format");

        assert_eq!(output, "(no suggestions)");
    }

    #[test]
    fn test_markdown_style() {
        let formatter = TableFormatter::new().with_style(TableStyle::Markdown);
        let output = formatter
            .format("fo", &sample_response(), &test_client())
            .expect("format");

        assert!(output.contains('|'));
    }
}
