//! Job page scraping — pulls the job description out of fetched HTML.
//!
//! Strategies are tried in order and the first one that yields non-empty text
//! wins. The last strategy is the whole page's visible text, which counts as a
//! degraded result.

use scraper::{ElementRef, Html, Node, Selector};

/// Container names probed as `#name, .name`, most specific first.
const CONTAINER_NAMES: &[&str] = &[
    "job-description",
    "jobDescriptionText",
    "description",
    "job-summary",
    "job-details",
];

/// schema.org JobPosting markup.
const MICRODATA_SELECTOR: &str = "[itemprop='description']";

const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "header", "footer", "aside", "ul", "ol", "li",
    "br", "h1", "h2", "h3", "h4", "h5", "h6", "table", "tr", "td", "th", "dd", "dt", "pre",
    "blockquote",
];

#[derive(Debug, Clone)]
pub enum ContentStrategy {
    /// First element matching `selector` whose visible text is non-empty.
    Container { css: String, selector: Selector },
    /// Visible text of the page body.
    WholePage,
}

impl ContentStrategy {
    pub fn container(css: &str) -> Option<Self> {
        let selector = Selector::parse(css).ok()?;
        Some(ContentStrategy::Container {
            css: css.to_string(),
            selector,
        })
    }

    pub fn label(&self) -> &str {
        match self {
            ContentStrategy::Container { css, .. } => css,
            ContentStrategy::WholePage => "whole page",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ContentStrategy::WholePage)
    }

    fn apply(&self, doc: &Html) -> Option<String> {
        let text = match self {
            ContentStrategy::Container { selector, .. } => doc
                .select(selector)
                .map(visible_text)
                .find(|t| !t.is_empty())?,
            ContentStrategy::WholePage => {
                let body = Selector::parse("body")
                    .ok()
                    .and_then(|sel| doc.select(&sel).next())
                    .unwrap_or_else(|| doc.root_element());
                visible_text(body)
            }
        };
        (!text.is_empty()).then_some(text)
    }
}

/// The default probing order: named containers, microdata, then the whole page.
pub fn default_strategies() -> Vec<ContentStrategy> {
    CONTAINER_NAMES
        .iter()
        .filter_map(|name| ContentStrategy::container(&format!("#{name}, .{name}")))
        .chain(ContentStrategy::container(MICRODATA_SELECTOR))
        .chain(std::iter::once(ContentStrategy::WholePage))
        .collect()
}

/// Text pulled from a page, and the strategy that produced it (`None` if nothing did).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub text: String,
    pub strategy: Option<String>,
    pub degraded: bool,
}

pub fn extract_page_text(html: &str, strategies: &[ContentStrategy]) -> PageText {
    let doc = Html::parse_document(html);

    strategies
        .iter()
        .find_map(|strategy| {
            strategy.apply(&doc).map(|text| PageText {
                text,
                strategy: Some(strategy.label().to_string()),
                degraded: strategy.is_fallback(),
            })
        })
        .unwrap_or(PageText {
            text: String::new(),
            strategy: None,
            degraded: true,
        })
}

/// Visible text under `element`: block elements start new lines, whitespace is
/// collapsed within each line and empty lines are dropped.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_visible_text(element, &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                let block = BLOCK_TAGS.contains(&name);
                if block {
                    out.push('\n');
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    push_visible_text(child_element, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> PageText {
        extract_page_text(html, &default_strategies())
    }

    #[test]
    fn test_named_container_wins() {
        let html = r#"<html><body>
            <nav>Home | Jobs</nav>
            <div class="job-description"><h2>About the role</h2><p>5 years of Python.</p></div>
            <footer>Copyright</footer>
        </body></html>"#;
        let page = extract(html);
        assert_eq!(page.text, "About the role\n5 years of Python.");
        assert_eq!(page.strategy.as_deref(), Some("#job-description, .job-description"));
        assert!(!page.degraded);
    }

    #[test]
    fn test_earlier_container_name_takes_precedence() {
        let html = r#"<body>
            <div id="description">Company blurb</div>
            <section id="job-description">Build APIs in Java</section>
        </body>"#;
        let page = extract(html);
        assert_eq!(page.text, "Build APIs in Java");
    }

    #[test]
    fn test_empty_container_falls_through_to_next_strategy() {
        let html = r#"<body>
            <div class="job-description">   </div>
            <div class="job-details">SQL and teamwork</div>
        </body>"#;
        let page = extract(html);
        assert_eq!(page.text, "SQL and teamwork");
        assert!(!page.degraded);
    }

    #[test]
    fn test_microdata_description_is_used() {
        let html = r#"<body><span itemprop="description">Deep learning research</span></body>"#;
        let page = extract(html);
        assert_eq!(page.text, "Deep learning research");
        assert_eq!(page.strategy.as_deref(), Some(MICRODATA_SELECTOR));
    }

    #[test]
    fn test_no_container_falls_back_to_body_text() {
        let html = r#"<html><head><title>Careers</title><style>p { color: red }</style></head>
            <body><p>We want a JavaScript engineer.</p>
            <script>var tracking = true;</script>
            <p>3 yrs required.</p></body></html>"#;
        let page = extract(html);
        assert_eq!(page.text, "We want a JavaScript engineer.\n3 yrs required.");
        assert_eq!(page.strategy.as_deref(), Some("whole page"));
        assert!(page.degraded);
    }

    #[test]
    fn test_page_without_visible_text_is_empty_and_degraded() {
        let page = extract("<html><body><script>1</script></body></html>");
        assert!(page.text.is_empty());
        assert!(page.strategy.is_none());
        assert!(page.degraded);
    }

    #[test]
    fn test_inline_elements_do_not_break_lines() {
        let html = r#"<div class="description">Senior <b>Rust</b>&nbsp;engineer, <a href="/x">apply</a></div>"#;
        let page = extract(html);
        assert_eq!(page.text, "Senior Rust engineer, apply");
    }

    #[test]
    fn test_default_strategies_end_with_whole_page() {
        let strategies = default_strategies();
        assert_eq!(strategies.len(), CONTAINER_NAMES.len() + 2);
        assert!(strategies.last().unwrap().is_fallback());
        assert!(strategies[..strategies.len() - 1]
            .iter()
            .all(|s| !s.is_fallback()));
    }
}
