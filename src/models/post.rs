//! Post data structure.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Ids of the posts seen in the most recent successful cycle.
pub type SeenSet = HashSet<String>;

/// Label used when a post has no discussion link.
pub const NO_COMMENTS: &str = "0 comments";

/// A post listed on the source page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// De-duplication key, always equal to `link`
    pub id: String,

    /// Post title
    pub title: String,

    /// Absolute URL of the linked story
    pub link: String,

    /// Vote count as listed
    pub points: String,

    /// Relative age (e.g. "5 hours ago")
    pub time: String,

    /// Comment label (e.g. "12 comments")
    pub comments: String,

    /// Absolute URL of the discussion thread
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussion_link: Option<String>,
}

impl Post {
    /// Create a post with no metadata; the id is derived from the link.
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        let link = link.into();
        Self {
            id: link.clone(),
            title: title.into(),
            link,
            points: "0".to_string(),
            time: String::new(),
            comments: NO_COMMENTS.to_string(),
            discussion_link: None,
        }
    }

    /// Attach a discussion link and its label.
    pub fn with_discussion(mut self, comments: impl Into<String>, link: impl Into<String>) -> Self {
        self.comments = comments.into();
        self.discussion_link = Some(link.into());
        self
    }

    /// Collect the ids of a batch of posts.
    pub fn id_set(posts: &[Post]) -> SeenSet {
        posts.iter().map(|p| p.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_follows_link() {
        let post = Post::new("Title", "https://example.com/a");
        assert_eq!(post.id, post.link);
        assert_eq!(post, Post::new("Title", "https://example.com/a"));
    }

    #[test]
    fn test_defaults_without_discussion() {
        let post = Post::new("Title", "https://example.com/a");
        assert_eq!(post.comments, NO_COMMENTS);
        assert!(post.discussion_link.is_none());
    }

    #[test]
    fn test_id_set() {
        let posts = vec![
            Post::new("A", "https://example.com/a"),
            Post::new("B", "https://example.com/b"),
            Post::new("A again", "https://example.com/a"),
        ];
        let ids = Post::id_set(&posts);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("https://example.com/b"));
    }
}
