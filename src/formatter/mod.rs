//! Output formatting for one-shot queries
//!
//! This module renders a suggestion response for the `query` subcommand:
//! - Plain styled sections (default)
//! - JSON formatting (compact and pretty-printed, colorized when enabled)
//! - Table formatting with kind / label / link columns
//!
//! Each suggestion is printed together with the catalog URL it resolves to,
//! so the output can be piped straight into other tools.

pub mod table;

use colored_json::prelude::*;
use nu_ansi_term::Color;
use serde_json::json;

use crate::config::{DisplayConfig, OutputFormat};
use crate::error::Result;
use crate::server::{CatalogClient, SuggestionResponse};
use table::TableFormatter;

/// Main formatter for suggestion results
pub struct Formatter {
    /// Output format type
    format_type: OutputFormat,

    /// Enable colored output
    use_colors: bool,
}

impl Formatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `format_type` - Output format type
    /// * `use_colors` - Enable colored output
    ///
    /// # Returns
    /// * `Self` - New formatter instance
    pub fn new(format_type: OutputFormat, use_colors: bool) -> Self {
        Self {
            format_type,
            use_colors,
        }
    }

    /// Create a formatter from display configuration
    ///
    /// # Arguments
    /// * `config` - Display configuration
    ///
    /// # Returns
    /// * `Self` - New formatter instance
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.format, config.color_output)
    }

    /// Format a suggestion response
    ///
    /// # Arguments
    /// * `query` - Query the response answers
    /// * `response` - Suggestion response from the server
    /// * `client` - Catalog client for resolving target URLs
    ///
    /// # Returns
    /// * `Result<String>` - Formatted output or error
    pub fn format(
        &self,
        query: &str,
        response: &SuggestionResponse,
        client: &CatalogClient,
    ) -> Result<String> {
        match self.format_type {
            OutputFormat::Plain => self.format_plain(query, response, client),
            OutputFormat::Json => self.format_json(query, response, client, false),
            OutputFormat::JsonPretty => self.format_json(query, response, client, true),
            OutputFormat::Table => {
                TableFormatter::with_colors(self.use_colors).format(query, response, client)
            }
        }
    }

    /// Format as styled section layout
    fn format_plain(
        &self,
        query: &str,
        response: &SuggestionResponse,
        client: &CatalogClient,
    ) -> Result<String> {
        if response.is_empty() {
            return Ok(format!("No suggestions for '{query}'."));
        }

        let mut lines = Vec::new();
        lines.push(format!(
            "{}  {}",
            self.paint_label(&format!("Search everything for '{query}'")),
            client.search_url(query)
        ));

        if !response.titles.is_empty() {
            lines.push(self.paint_header("Titles"));
            for hit in &response.titles {
                lines.push(format!(
                    "  {}  {}",
                    self.paint_label(&hit.title),
                    client.kata_url(&hit.id)
                ));
            }
        }

        if !response.topics.is_empty() {
            lines.push(self.paint_header("Topics"));
            for topic in &response.topics {
                lines.push(format!(
                    "  {}  {}",
                    self.paint_label(topic),
                    client.topic_url(topic)
                ));
            }
        }

        Ok(lines.join("\n"))
    }

    /// Format as JSON
    fn format_json(
        &self,
        query: &str,
        response: &SuggestionResponse,
        client: &CatalogClient,
        pretty: bool,
    ) -> Result<String> {
        let value = json!({
            "query": query,
            "search_url": client.search_url(query),
            "titles": response
                .titles
                .iter()
                .map(|hit| json!({
                    "id": hit.id,
                    "title": hit.title,
                    "url": client.kata_url(&hit.id),
                }))
                .collect::<Vec<_>>(),
            "topics": response
                .topics
                .iter()
                .map(|topic| json!({
                    "name": topic,
                    "url": client.topic_url(topic),
                }))
                .collect::<Vec<_>>(),
        });

        let json_str = if pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };

        // Only apply colors for pretty-printed JSON
        // Compact JSON should remain as-is for piping/logging
        if self.use_colors && pretty {
            Ok(json_str.to_colored_json_auto().unwrap_or(json_str))
        } else {
            Ok(json_str)
        }
    }

    /// Style a section header
    fn paint_header(&self, text: &str) -> String {
        if self.use_colors {
            Color::Cyan.bold().paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Style an item label
    fn paint_label(&self, text: &str) -> String {
        if self.use_colors {
            Color::Default.bold().paint(text).to_string()
        } else {
            text.to_string()
        }
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
    fn test_plain_lists_all_sections() {
        let formatter = Formatter::new(OutputFormat::Plain, false);
        let output = formatter
            .format("fo", &sample_response(), &test_client())
            .expect("format");

        assert!(output.contains("Search everything for 'fo'"));
        assert!(output.contains("http://localhost:5000/?search=fo"));
        assert!(output.contains("Titles"));
        assert!(output.contains("Foo"));
        assert!(output.contains("http://localhost:5000/kata/1"));
        assert!(output.contains("Topics"));
        assert!(output.contains("http://localhost:5000/?topic=Bar"));
    }

    #[test]
    fn test_plain_empty_response() {
        let formatter = Formatter::new(OutputFormat::Plain, false);
        let output = formatter
            .format("zz", &SuggestionResponse::default(), &test_client())
            .expect("format");

        assert_eq!(output, "No suggestions for 'zz'.");
    }

    #[test]
    fn test_plain_omits_empty_sections() {
        let formatter = Formatter::new(OutputFormat::Plain, false);
        let response = SuggestionResponse {
            titles: Vec::new(),
            topics: vec!["Bar".to_string()],
        };
        let output = formatter
            .format("ba", &response, &test_client())
            .expect("format");

        assert!(!output.contains("Titles"));
        assert!(output.contains("Topics"));
    }

    #[test]
    fn test_compact_json_is_parseable() {
        let formatter = Formatter::new(OutputFormat::Json, true);
        let output = formatter
            .format("fo", &sample_response(), &test_client())
            .expect("format");

        // Compact output carries no color codes even with colors enabled
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
        assert_eq!(value["query"], "fo");
        assert_eq!(value["titles"][0]["id"], "1");
        assert_eq!(value["titles"][0]["url"], "http://localhost:5000/kata/1");
        assert_eq!(value["topics"][0]["name"], "Bar");
    }

    #[test]
    fn test_pretty_json_without_colors_is_parseable() {
        let formatter = Formatter::new(OutputFormat::JsonPretty, false);
        let output = formatter
            .format("fo", &sample_response(), &test_client())
            .expect("format");

        let value: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
        assert_eq!(value["search_url"], "http://localhost:5000/?search=fo");
    }

    #[test]
    fn test_query_is_encoded_in_urls_not_in_labels() {
        let formatter = Formatter::new(OutputFormat::Plain, false);
        let output = formatter
            .format("a&b", &sample_response(), &test_client())
            .expect("format");

        // The label shows the raw query, the URL the encoded one
        assert!(output.contains("Search everything for 'a&b'"));
        assert!(output.contains("?search=a%26b"));
    }
}
