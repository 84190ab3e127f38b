//! Node entity
//!
//! A node is an atomic note known to the org-roam database. It is uniquely
//! determined by its ID; the title is a human label and may repeat.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Org-mode link that does not point at another node
///
/// # Examples
///
/// ```rust
/// use roamgraph::domain::OrgLink;
///
/// let link = OrgLink::new("https", "//orgmode.org");
/// assert_eq!(link.link_type, "https");
/// assert!(link.description.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrgLink {
    /// Link type (`https`, `file`, `attachment`, ...)
    pub link_type: String,
    /// Link target without the type prefix
    pub content: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OrgLink {
    pub fn new(link_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            link_type: link_type.into(),
            content: content.into(),
            description: None,
        }
    }
}

/// One org-roam node
///
/// Ordering and equality compare titles only, which is what listings sort by.
/// Titles are not unique, so use [`RoamNode::same_node`] for identity.
///
/// # Examples
///
/// ```rust
/// use roamgraph::domain::RoamNode;
///
/// let node = RoamNode::new("id-1", "Monoidal category", "/notes/monoidal.org")
///     .with_tags(["math", "category-theory"])
///     .with_links(["id-2"]);
///
/// assert!(node.links("id-2"));
/// assert!(node.has_tag(&["math"]));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoamNode {
    /// org-roam ID
    pub id: String,
    /// Title (not unique)
    pub title: String,
    /// File containing the node
    pub file: String,
    /// Tags of the node
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// IDs of nodes referenced in the body
    #[serde(default)]
    pub links_to: BTreeSet<String>,
    /// Links in the body that are not node references
    #[serde(default)]
    pub misc_links: Vec<OrgLink>,
}

impl RoamNode {
    pub fn new(id: impl Into<String>, title: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            file: file.into(),
            tags: BTreeSet::new(),
            links_to: BTreeSet::new(),
            misc_links: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.links_to.extend(links.into_iter().map(Into::into));
        self
    }

    pub fn with_misc_links(mut self, links: Vec<OrgLink>) -> Self {
        self.misc_links = links;
        self
    }

    /// Does this node reference `other_id` in its body
    pub fn links(&self, other_id: &str) -> bool {
        self.links_to.contains(other_id)
    }

    /// Link check against another node
    ///
    /// With `directed == false` a reference in either direction counts.
    pub fn links_to(&self, other: &RoamNode, directed: bool) -> bool {
        if directed {
            self.links(&other.id)
        } else {
            self.links(&other.id) || other.links(&self.id)
        }
    }

    /// True if any tag of the node is in `tags_checked`
    pub fn has_tag<S: AsRef<str>>(&self, tags_checked: &[S]) -> bool {
        tags_checked
            .iter()
            .any(|tag| self.tags.contains(tag.as_ref()))
    }

    /// True if any tag of the node matches any of the patterns
    pub fn has_regex_tag(&self, patterns: &[Regex]) -> bool {
        self.tags
            .iter()
            .any(|tag| patterns.iter().any(|rx| rx.is_match(tag)))
    }

    /// Outbound links other than a self-reference
    pub fn outbound(&self) -> impl Iterator<Item = &String> {
        self.links_to.iter().filter(move |dest| **dest != self.id)
    }

    /// Identity comparison by ID
    pub fn same_node(&self, other: &RoamNode) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for RoamNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.title, self.id)
    }
}

impl PartialEq for RoamNode {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
    }
}

impl Eq for RoamNode {}

impl PartialOrd for RoamNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RoamNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.title.cmp(&other.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(tags: &[&str]) -> RoamNode {
        RoamNode::new("n1", "Tagged", "/tmp/tagged.org").with_tags(tags.iter().copied())
    }

    #[test]
    fn test_links_membership() {
        let node = RoamNode::new("1", "Foo", "foo.org").with_links(["2"]);
        assert!(node.links("2"));
        assert!(!node.links("3"));
    }

    #[test]
    fn test_links_to_directed_and_undirected() {
        let a = RoamNode::new("1", "Foo", "foo.org").with_links(["2"]);
        let b = RoamNode::new("2", "Bar", "bar.org");

        assert!(a.links_to(&b, true));
        assert!(!b.links_to(&a, true));
        assert!(b.links_to(&a, false));
        assert!(a.links_to(&b, false));
    }

    #[test]
    fn test_links_to_unrelated() {
        let a = RoamNode::new("1", "Foo", "foo.org");
        let c = RoamNode::new("3", "Baz", "baz.org");
        assert!(!a.links_to(&c, false));
    }

    #[test]
    fn test_has_tag_exact() {
        let node = tagged(&["proj", "draft"]);
        assert!(node.has_tag(&["draft"]));
        assert!(!node.has_tag(&["final"]));
        assert!(!node.has_tag::<&str>(&[]));
    }

    #[test]
    fn test_has_regex_tag() {
        let node = tagged(&["category-theory", "lecture"]);
        let category = Regex::new("^category-").unwrap();
        let algebra = Regex::new("^algebra").unwrap();

        assert!(node.has_regex_tag(&[category.clone()]));
        assert!(node.has_regex_tag(&[algebra.clone(), category]));
        assert!(!node.has_regex_tag(&[algebra]));
        assert!(!node.has_regex_tag(&[]));
    }

    #[test]
    fn test_outbound_skips_self_reference() {
        let node = RoamNode::new("1", "Foo", "foo.org").with_links(["1", "2"]);
        let outbound: Vec<_> = node.outbound().collect();
        assert_eq!(outbound, vec!["2"]);
    }

    #[test]
    fn test_ordering_by_title() {
        let mut nodes = vec![
            RoamNode::new("1", "Zeta", "z.org"),
            RoamNode::new("2", "Alpha", "a.org"),
            RoamNode::new("3", "Mu", "m.org"),
        ];
        nodes.sort();
        let titles: Vec<_> = nodes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Mu", "Zeta"]);
    }

    #[test]
    fn test_equal_titles_are_not_same_node() {
        let x1 = RoamNode::new("x1", "Dup", "x1.org");
        let x2 = RoamNode::new("x2", "Dup", "x2.org");
        assert_eq!(x1, x2);
        assert!(!x1.same_node(&x2));
        assert!(x1.same_node(&x1.clone()));
    }

    #[test]
    fn test_display() {
        let node = RoamNode::new("abc", "Foo", "foo.org");
        assert_eq!(node.to_string(), "(Foo, abc)");
    }

    #[test]
    fn test_node_serde() {
        let node = RoamNode::new("1", "Foo", "foo.org")
            .with_tags(["proj"])
            .with_links(["2"])
            .with_misc_links(vec![OrgLink::new("https", "//example.org")]);

        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"links_to\":[\"2\"]"));

        let back: RoamNode = serde_json::from_str(&json).unwrap();
        assert!(back.same_node(&node));
        assert_eq!(back.tags, node.tags);
        assert_eq!(back.misc_links, node.misc_links);
    }
}
