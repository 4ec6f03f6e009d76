// src/services/extractor.rs

//! Post extraction from the source page.
//!
//! The page has no stable ids, so extraction hangs off a text anchor: the
//! first element matching `anchor_selector` whose text contains
//! `anchor_text`. Every card after it in document order is a post.
//!
//! Metadata fields are looked up by pattern first ("120 points",
//! "5 hours ago") and only fall back to their position inside the metadata
//! block when the pattern is missing.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ExtractorConfig, Post};
use crate::utils::{normalize_whitespace, resolve_url};

static POINTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)\s*points?\b").expect("points pattern"));

static AGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:\d+|an?|one)\s+(?:second|minute|hour|day|week|month|year)s?\s+ago\b")
        .expect("age pattern")
});

/// Positions of fields inside the metadata block, used as fallback.
const POINTS_FRAGMENT: usize = 0;
const AGE_FRAGMENT: usize = 2;

/// Extracts posts from the source page markup.
pub struct PostExtractor {
    anchor: Selector,
    anchor_text: String,
    card: Selector,
    title: Selector,
    meta: Selector,
    comments: Selector,
    base_url: Url,
}

impl PostExtractor {
    /// Compile the configured selectors. `base_url` resolves relative links.
    pub fn new(config: &ExtractorConfig, base_url: &str) -> Result<Self> {
        Ok(Self {
            anchor: Self::parse_selector(&config.anchor_selector)?,
            anchor_text: config.anchor_text.clone(),
            card: Self::parse_selector(&config.card_selector)?,
            title: Self::parse_selector(&config.title_selector)?,
            meta: Self::parse_selector(&config.meta_selector)?,
            comments: Self::parse_selector(&config.comments_selector)?,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Extract posts in page order.
    ///
    /// A page without the anchor yields no posts.
    pub fn extract(&self, html: &str) -> Vec<Post> {
        match self.try_extract(html) {
            Ok(posts) => posts,
            Err(e) => {
                log::warn!("{e}. Check if the page structure has changed.");
                Vec::new()
            }
        }
    }

    /// Extract posts, reporting a missing anchor as `AppError::Structure`.
    pub fn try_extract(&self, html: &str) -> Result<Vec<Post>> {
        let document = Html::parse_document(html);

        let mut past_anchor = false;
        let mut posts = Vec::new();
        let mut skipped = 0usize;

        for element in document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
        {
            if !past_anchor {
                past_anchor = self.is_anchor(&element);
                continue;
            }
            if !self.card.matches(&element) {
                continue;
            }
            match self.parse_card(&element) {
                Some(post) => posts.push(post),
                None => skipped += 1,
            }
        }

        if !past_anchor {
            return Err(AppError::structure(format!(
                "anchor containing '{}' not found",
                self.anchor_text
            )));
        }
        if skipped > 0 {
            log::debug!("Skipped {skipped} card(s) without a title link");
        }
        log::debug!("Extracted {} post(s)", posts.len());
        Ok(posts)
    }

    fn is_anchor(&self, element: &ElementRef) -> bool {
        self.anchor.matches(element)
            && element
                .text()
                .collect::<String>()
                .contains(&self.anchor_text)
    }

    fn parse_card(&self, card: &ElementRef) -> Option<Post> {
        let title_elem = card.select(&self.title).next()?;
        let title = normalize_whitespace(&title_elem.text().collect::<String>());
        let href = title_elem
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|h| !h.is_empty())?;
        if title.is_empty() {
            return None;
        }

        let mut post = Post::new(title, resolve_url(&self.base_url, href));

        if let Some(meta) = card.select(&self.meta).next() {
            let fragments = Self::fragments(&meta);
            let meta_text = normalize_whitespace(&meta.text().collect::<String>());

            if let Some(points) = Self::points(&meta_text, &fragments) {
                post.points = points;
            }
            post.time = Self::age(&meta_text, &fragments).unwrap_or_default();

            if let Some(link_elem) = meta.select(&self.comments).next() {
                let label = normalize_whitespace(&link_elem.text().collect::<String>());
                if !label.is_empty() {
                    post.comments = label;
                }
                post.discussion_link = link_elem
                    .value()
                    .attr("href")
                    .map(str::trim)
                    .filter(|h| !h.is_empty())
                    .map(|h| resolve_url(&self.base_url, h));
            }
        }

        Some(post)
    }

    /// Text of each direct child of the metadata block.
    fn fragments(meta: &ElementRef) -> Vec<String> {
        meta.children()
            .filter_map(|child| match child.value() {
                Node::Text(text) => Some(String::from(&**text)),
                Node::Element(_) => ElementRef::wrap(child).map(|e| e.text().collect()),
                _ => None,
            })
            .collect()
    }

    fn points(meta_text: &str, fragments: &[String]) -> Option<String> {
        if let Some(caps) = POINTS_RE.captures(meta_text) {
            return Some(caps[1].to_string());
        }
        fragments
            .get(POINTS_FRAGMENT)
            .and_then(|f| f.split_whitespace().next())
            .map(str::to_string)
    }

    fn age(meta_text: &str, fragments: &[String]) -> Option<String> {
        if let Some(m) = AGE_RE.find(meta_text) {
            return Some(m.as_str().to_string());
        }
        fragments
            .get(AGE_FRAGMENT)
            .map(|f| normalize_whitespace(f))
            .filter(|f| !f.is_empty())
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}
