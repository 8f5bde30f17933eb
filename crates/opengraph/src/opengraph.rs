// ABOUTME: Open Graph extractor that reads the fixed og:* meta properties from an HTML document.
// ABOUTME: Defines the Property enum, the OpenGraphData result and the lenient scraper-based lookup.

use std::fmt;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// The Open Graph properties this crate extracts, in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Title,
    Type,
    Image,
    Url,
    Description,
}

impl Property {
    pub const ALL: [Property; 5] = [
        Property::Title,
        Property::Type,
        Property::Image,
        Property::Url,
        Property::Description,
    ];

    /// The bare property name, e.g. `title`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Property::Title => "title",
            Property::Type => "type",
            Property::Image => "image",
            Property::Url => "url",
            Property::Description => "description",
        }
    }

    /// The value of the meta tag's `property` attribute, e.g. `og:title`.
    pub fn meta_property(&self) -> &'static str {
        match self {
            Property::Title => "og:title",
            Property::Type => "og:type",
            Property::Image => "og:image",
            Property::Url => "og:url",
            Property::Description => "og:description",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Open Graph values found in a document. Absent properties are `None`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OpenGraphData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub og_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OpenGraphData {
    pub fn get(&self, property: Property) -> Option<&str> {
        self.slot(property).as_deref()
    }

    fn slot(&self, property: Property) -> &Option<String> {
        match property {
            Property::Title => &self.title,
            Property::Type => &self.og_type,
            Property::Image => &self.image,
            Property::Url => &self.url,
            Property::Description => &self.description,
        }
    }

    fn slot_mut(&mut self, property: Property) -> &mut Option<String> {
        match property {
            Property::Title => &mut self.title,
            Property::Type => &mut self.og_type,
            Property::Image => &mut self.image,
            Property::Url => &mut self.url,
            Property::Description => &mut self.description,
        }
    }

    /// Present properties in the fixed property order.
    pub fn iter(&self) -> impl Iterator<Item = (Property, &str)> + '_ {
        Property::ALL
            .into_iter()
            .filter_map(move |p| self.get(p).map(|v| (p, v)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static SELECTORS: Lazy<Vec<(Property, Selector)>> = Lazy::new(|| {
    Property::ALL
        .into_iter()
        .map(|p| {
            let sel = format!("meta[property=\"{}\"]", p.meta_property());
            (p, Selector::parse(&sel).unwrap())
        })
        .collect()
});

/// Extract the Open Graph properties from an HTML document.
///
/// Parsing is lenient, so malformed markup yields whatever the parser
/// recovers. For each property only the first matching meta tag counts, and a
/// missing or empty `content` attribute leaves the property absent.
pub fn extract(html: &str) -> OpenGraphData {
    let document = Html::parse_document(html);
    let mut data = OpenGraphData::default();

    for (property, selector) in SELECTORS.iter() {
        let content = document
            .select(selector)
            .next()
            .and_then(|elem| elem.value().attr("content"))
            .filter(|content| !content.is_empty());
        if let Some(content) = content {
            *data.slot_mut(*property) = Some(content.to_string());
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FULL: &str = r#"
        <html>
          <head>
            <meta property="og:title" content="Example Title">
            <meta property="og:type" content="website">
            <meta property="og:image" content="https://example.com/image.jpg">
            <meta property="og:url" content="https://example.com/example-page">
            <meta property="og:description" content="Example description">
          </head>
        </html>
    "#;

    #[test]
    fn extracts_all_five_properties() {
        let data = extract(FULL);
        assert_eq!(
            data,
            OpenGraphData {
                title: Some("Example Title".to_string()),
                og_type: Some("website".to_string()),
                image: Some("https://example.com/image.jpg".to_string()),
                url: Some("https://example.com/example-page".to_string()),
                description: Some("Example description".to_string()),
            }
        );
        assert_eq!(data.len(), 5);
    }

    #[test]
    fn omits_missing_properties() {
        let html = r#"<html><head>
            <meta property="og:title" content="Only Title">
            <meta property="og:url" content="https://example.com/">
        </head></html>"#;
        let data = extract(html);
        assert_eq!(data.get(Property::Title), Some("Only Title"));
        assert_eq!(data.get(Property::Url), Some("https://example.com/"));
        assert_eq!(data.get(Property::Type), None);
        assert_eq!(data.get(Property::Image), None);
        assert_eq!(data.get(Property::Description), None);
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn tag_without_content_is_absent() {
        let data = extract(r#"<meta property="og:title"><meta property="og:type" content="">"#);
        assert!(data.is_empty());
        assert_eq!(data, OpenGraphData::default());
    }

    #[test]
    fn first_matching_tag_wins() {
        let html = r#"<head>
            <meta property="og:title" content="First">
            <meta property="og:title" content="Second">
        </head>"#;
        assert_eq!(extract(html).get(Property::Title), Some("First"));
    }

    #[test]
    fn first_tag_without_content_does_not_fall_through() {
        let html = r#"<head>
            <meta property="og:title">
            <meta property="og:title" content="Second">
        </head>"#;
        assert_eq!(extract(html).get(Property::Title), None);
    }

    #[test]
    fn ignores_name_attribute_and_other_properties() {
        let html = r#"<head>
            <meta name="og:title" content="By name">
            <meta property="og:image:alt" content="Alt text">
            <meta property="og:site_name" content="Site">
            <meta property="twitter:title" content="Tweet">
        </head>"#;
        assert!(extract(html).is_empty());
    }

    #[test]
    fn tolerates_malformed_markup() {
        let html = r#"<html><head><meta property=og:type content=article>
            <body><div><p>Text</span><meta property="og:title" content="In body"></div>"#;
        let data = extract(html);
        assert_eq!(data.get(Property::Type), Some("article"));
        assert_eq!(data.get(Property::Title), Some("In body"));
    }

    #[test]
    fn keeps_values_verbatim() {
        let html = r#"<meta property="og:description" content="  spaced &amp; escaped  ">"#;
        assert_eq!(
            extract(html).get(Property::Description),
            Some("  spaced & escaped  ")
        );
    }

    #[test]
    fn empty_input_yields_empty_data() {
        assert!(extract("").is_empty());
        assert!(extract("not html at all").is_empty());
    }

    #[test]
    fn extraction_is_repeatable() {
        assert_eq!(extract(FULL), extract(FULL));
    }

    #[test]
    fn iter_follows_fixed_order() {
        let html = r#"<head>
            <meta property="og:description" content="D">
            <meta property="og:title" content="T">
            <meta property="og:image" content="I">
        </head>"#;
        let order: Vec<&str> = extract(html).iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(order, vec!["title", "image", "description"]);
    }

    #[test]
    fn serializes_with_property_names() {
        let json = serde_json::to_string(&extract(FULL)).unwrap();
        assert_eq!(
            json,
            "{\"title\":\"Example Title\",\"type\":\"website\",\
             \"image\":\"https://example.com/image.jpg\",\
             \"url\":\"https://example.com/example-page\",\
             \"description\":\"Example description\"}"
        );

        let partial = OpenGraphData {
            title: Some("T".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&partial).unwrap(), "{\"title\":\"T\"}");
    }
}
