//! Change detection between two cycles.
//!
//! Compares the posts of the current fetch with the ids seen in the previous
//! one. Only additions matter: posts that drop off the page are forgotten,
//! never reported.

use std::collections::HashSet;

use crate::models::{Post, SeenSet};

/// How a detection pass treated its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectOutcome {
    /// Current fetch was empty; previous state kept
    NoSignal,
    /// No previous state; seeded without reporting anything
    Bootstrap,
    /// Compared against previous state
    Compared,
}

/// Result of a detection pass.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Posts not seen in the previous cycle, in page order
    pub new_posts: Vec<Post>,
    /// Seen-set to carry into the next cycle
    pub seen: SeenSet,
    pub outcome: DetectOutcome,
}

impl Detection {
    /// Check if any new posts were found.
    pub fn has_changes(&self) -> bool {
        !self.new_posts.is_empty()
    }

    /// Split into the new posts and the updated seen-set.
    pub fn into_parts(self) -> (Vec<Post>, SeenSet) {
        (self.new_posts, self.seen)
    }
}

/// Diff `current` against the ids seen last cycle.
pub fn detect(current: &[Post], previous: &SeenSet) -> Detection {
    if current.is_empty() {
        return Detection {
            new_posts: Vec::new(),
            seen: previous.clone(),
            outcome: DetectOutcome::NoSignal,
        };
    }

    let seen = Post::id_set(current);

    if previous.is_empty() {
        return Detection {
            new_posts: Vec::new(),
            seen,
            outcome: DetectOutcome::Bootstrap,
        };
    }

    // Added: in current but not in previous, first occurrence only
    let mut reported: HashSet<&str> = HashSet::new();
    let new_posts = current
        .iter()
        .filter(|p| !previous.contains(&p.id) && reported.insert(p.id.as_str()))
        .cloned()
        .collect();

    Detection {
        new_posts,
        seen,
        outcome: DetectOutcome::Compared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_post(id: &str) -> Post {
        Post::new(format!("Title {id}"), format!("https://example.com/{id}"))
    }

    fn posts(ids: &[&str]) -> Vec<Post> {
        ids.iter().map(|id| make_post(id)).collect()
    }

    fn ids(detection: &Detection) -> Vec<String> {
        detection.new_posts.iter().map(|p| p.id.clone()).collect()
    }

    fn url(id: &str) -> String {
        format!("https://example.com/{id}")
    }

    #[test]
    fn test_bootstrap_seeds_without_reporting() {
        let current = posts(&["a", "b", "c"]);
        let result = detect(&current, &SeenSet::new());

        assert_eq!(result.outcome, DetectOutcome::Bootstrap);
        assert!(!result.has_changes());
        assert_eq!(result.seen, Post::id_set(&current));
    }

    #[test]
    fn test_same_input_twice_reports_nothing() {
        let current = posts(&["a", "b"]);
        let first = detect(&current, &SeenSet::new());
        let second = detect(&current, &first.seen);

        assert_eq!(second.outcome, DetectOutcome::Compared);
        assert!(second.new_posts.is_empty());
        assert_eq!(second.seen, first.seen);
    }

    #[test]
    fn test_additions_keep_page_order() {
        let previous = Post::id_set(&posts(&["b", "d"]));
        let current = posts(&["e", "b", "a", "d", "c"]);

        let result = detect(&current, &previous);
        assert_eq!(ids(&result), vec![url("e"), url("a"), url("c")]);
    }

    #[test]
    fn test_set_difference_is_exact() {
        let previous = Post::id_set(&posts(&["a", "b", "c", "x"]));
        let current = posts(&["c", "d", "a", "e"]);

        let result = detect(&current, &previous);
        let found: SeenSet = ids(&result).into_iter().collect();
        let expected: SeenSet = Post::id_set(&current)
            .difference(&previous)
            .cloned()
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_dropped_posts_are_forgotten() {
        let previous = Post::id_set(&posts(&["a", "b", "c"]));
        let current = posts(&["b", "c"]);

        let result = detect(&current, &previous);
        assert!(result.new_posts.is_empty());
        assert!(!result.seen.contains(&url("a")));
        assert_eq!(result.seen.len(), 2);
    }

    #[test]
    fn test_empty_current_keeps_previous() {
        let previous = Post::id_set(&posts(&["a", "b"]));
        let result = detect(&[], &previous);

        assert_eq!(result.outcome, DetectOutcome::NoSignal);
        assert!(result.new_posts.is_empty());
        assert_eq!(result.seen, previous);
    }

    #[test]
    fn test_empty_current_on_empty_state() {
        let result = detect(&[], &SeenSet::new());
        assert_eq!(result.outcome, DetectOutcome::NoSignal);
        assert!(result.seen.is_empty());
    }

    #[test]
    fn test_duplicate_links_reported_once() {
        let previous = Post::id_set(&posts(&["a"]));
        let mut current = posts(&["a", "b"]);
        current.push(Post::new("Syndicated copy", url("b")));

        let (new_posts, seen) = detect(&current, &previous).into_parts();
        assert_eq!(new_posts.len(), 1);
        assert_eq!(new_posts[0].title, "Title b");
        assert_eq!(seen.len(), 2);
    }
}
