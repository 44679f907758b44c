//! Stored documents and categories.

use serde::{Deserialize, Serialize};

/// Whether a document is publicly readable. Stored as 0/1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Accessibility {
    #[default]
    Private,
    Public,
}

impl TryFrom<u8> for Accessibility {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Private),
            1 => Ok(Self::Public),
            other => Err(format!("accessibility must be 0 or 1, got {other}")),
        }
    }
}

impl From<Accessibility> for u8 {
    fn from(value: Accessibility) -> Self {
        match value {
            Accessibility::Private => 0,
            Accessibility::Public => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub accessibility: Accessibility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_html: Option<String>,
    pub author_id: String,
    pub created_timestamp: String,
    pub updated_timestamp: String,
    /// Listing returned without content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Entry in a document tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DocumentNode {
    Document(Document),
    Category(Category),
}

impl DocumentNode {
    pub fn id(&self) -> &str {
        match self {
            Self::Document(d) => &d.id,
            Self::Category(c) => &c.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Document(d) => &d.name,
            Self::Category(c) => &c.name,
        }
    }

    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Self::Document(d) => d.parent_id.as_deref(),
            Self::Category(c) => c.parent_id.as_deref(),
        }
    }

    /// Sort key: categories by `order` then name, documents after them by name.
    fn sort_key(&self) -> (u8, i64, &str) {
        match self {
            Self::Category(c) => (0, c.order.unwrap_or(i64::MAX), &c.name),
            Self::Document(d) => (1, 0, &d.name),
        }
    }
}

/// Direct children of `parent` (None for the root), categories first.
pub fn children_of<'a>(nodes: &'a [DocumentNode], parent: Option<&str>) -> Vec<&'a DocumentNode> {
    let mut children: Vec<_> = nodes.iter().filter(|n| n.parent_id() == parent).collect();
    children.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    children
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, name: &str, parent: Option<&str>) -> DocumentNode {
        DocumentNode::Document(Document {
            id: id.into(),
            name: name.into(),
            path: None,
            description: None,
            tags: None,
            category: None,
            parent_id: parent.map(Into::into),
            accessibility: Accessibility::Public,
            content_markdown: None,
            content_html: None,
            author_id: "u1".into(),
            created_timestamp: "2024-01-01T00:00:00Z".into(),
            updated_timestamp: "2024-01-01T00:00:00Z".into(),
            partial: Some(true),
        })
    }

    fn cat(id: &str, name: &str, order: Option<i64>, parent: Option<&str>) -> DocumentNode {
        DocumentNode::Category(Category {
            id: id.into(),
            name: name.into(),
            icon: None,
            order,
            parent_id: parent.map(Into::into),
        })
    }

    #[test]
    fn test_accessibility_is_numeric() {
        assert_eq!(serde_json::to_string(&Accessibility::Public).unwrap(), "1");
        assert_eq!(
            serde_json::from_str::<Accessibility>("0").unwrap(),
            Accessibility::Private
        );
        assert!(serde_json::from_str::<Accessibility>("2").is_err());
    }

    #[test]
    fn test_node_tagging() {
        let json = serde_json::to_value(cat("c1", "Lore", Some(2), None)).unwrap();
        assert_eq!(json["type"], "category");
        assert_eq!(json["order"], 2);

        let parsed: DocumentNode = serde_json::from_str(
            r#"{"type":"document","id":"d1","name":"Dragons","accessibility":1,
                "author_id":"u1","created_timestamp":"t0","updated_timestamp":"t1",
                "parent_id":null}"#,
        )
        .unwrap();
        assert_eq!(parsed.name(), "Dragons");
        assert_eq!(parsed.parent_id(), None);
    }

    #[test]
    fn test_children_of_orders_categories_first() {
        let nodes = vec![
            doc("d1", "Zebra", None),
            cat("c2", "Places", Some(2), None),
            doc("d2", "Apple", None),
            cat("c1", "People", Some(1), None),
            doc("d3", "Nested", Some("c1")),
        ];
        let root: Vec<_> = children_of(&nodes, None).into_iter().map(|n| n.id()).collect();
        assert_eq!(root, vec!["c1", "c2", "d2", "d1"]);
        let nested: Vec<_> = children_of(&nodes, Some("c1")).into_iter().map(|n| n.id()).collect();
        assert_eq!(nested, vec!["d3"]);
    }
}
