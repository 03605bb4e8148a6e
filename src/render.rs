//! HTML fragments for article and debate cards.
//!
//! Every model-sourced string goes through [`Escaped`] before it reaches the
//! markup, so a headline containing `<script>` renders as text. Link targets
//! are only emitted for absolute `http`/`https` URLs.
//!
//! Both front ends use these functions: the interactive session renders the
//! filtered subset on demand, the static page renders every card once and
//! relies on `data-category` for client-side filtering.

use crate::models::{Article, Debate, Filter, TagColor};
use std::fmt::{self, Write};
use url::Url;

/// Shown in place of the grid when a filter matches nothing.
pub const EMPTY_FILTER_MESSAGE: &str = "No articles for this filter yet. Try refreshing.";

/// Display wrapper that HTML-escapes its contents.
pub struct Escaped<'a>(pub &'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.0.chars() {
            match ch {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#x27;")?,
                _ => f.write_char(ch)?,
            }
        }
        Ok(())
    }
}

/// Accent for the debate at zero-based `index`; `None` keeps the stylesheet default.
pub fn debate_accent(index: usize) -> Option<&'static str> {
    match index {
        1 => Some("var(--navy)"),
        2 => Some("var(--green)"),
        3 => Some("#c0392b"),
        _ => None,
    }
}

/// Articles passing `filter`, in their original order.
pub fn filter_articles(articles: &[Article], filter: Filter) -> Vec<&Article> {
    articles.iter().filter(|a| filter.matches(a)).collect()
}

fn safe_link(raw: &str) -> Option<Url> {
    Url::parse(raw)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
}

/// One article card.
pub fn article_card(article: &Article) -> String {
    let color = TagColor::from_token(&article.tag_color);
    let link = article
        .source_url()
        .and_then(safe_link)
        .map(|url| {
            format!(
                r#"<a href="{}" target="_blank" rel="noopener" class="read-more">{} →</a>"#,
                Escaped(url.as_str()),
                Escaped(article.source_label())
            )
        })
        .unwrap_or_default();

    format!(
        r#"
        <div class="news-card" data-category="{category}">
          <div class="news-card-header">
            <span class="news-tag {class}">{tag}</span>
            <h3>{headline}</h3>
          </div>
          <p>{summary}</p>
          <div class="news-card-footer">
            <span>{date}</span>
            {link}
          </div>
        </div>"#,
        category = Escaped(&article.category),
        class = color.css_class(),
        tag = Escaped(&article.tag),
        headline = Escaped(&article.headline),
        summary = Escaped(&article.summary),
        date = Escaped(&article.date),
    )
}

/// The grid body for `filter`, or the placeholder when nothing matches.
pub fn articles_grid(articles: &[Article], filter: Filter) -> String {
    let visible = filter_articles(articles, filter);
    if visible.is_empty() {
        return format!(
            r#"<div class="news-empty" style="grid-column:1/-1; text-align:center; padding:40px; font-family:'Poppins',sans-serif; color:#999;">{EMPTY_FILTER_MESSAGE}</div>"#
        );
    }
    visible.into_iter().map(article_card).collect::<Vec<_>>().join("\n")
}

/// One debate entry at zero-based `index`.
pub fn debate_card(index: usize, debate: &Debate) -> String {
    let style = debate_accent(index)
        .map(|c| format!(r#" style="border-left-color:{c}""#))
        .unwrap_or_default();
    format!(
        r#"
          <div class="hot-topic"{style}>
            <div class="ht-num">{num}</div>
            <div class="ht-content">
              <h4>{title}</h4>
              <p>{summary}</p>
            </div>
          </div>"#,
        num = Escaped(&debate.num),
        title = Escaped(&debate.title),
        summary = Escaped(&debate.summary),
    )
}

/// All debate entries, or `None` when there are none to show.
pub fn debates_list(debates: &[Debate]) -> Option<String> {
    if debates.is_empty() {
        return None;
    }
    Some(
        debates
            .iter()
            .enumerate()
            .map(|(i, d)| debate_card(i, d))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

/// The "live" badge with an update time, e.g. `Updated 03:15 PM`.
pub fn updated_badge(label: &str) -> String {
    format!(
        r#"<span class="live-badge"><span class="live-dot"></span>Live</span> Updated {}"#,
        Escaped(label)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn article(category: &str, headline: &str) -> Article {
        Article {
            category: category.to_string(),
            tag: "Tag".to_string(),
            tag_color: "green".to_string(),
            headline: headline.to_string(),
            summary: "Summary.".to_string(),
            date: "This week".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_escaped_covers_markup_characters() {
        assert_eq!(
            Escaped(r#"<b a="1">Tom & 'Jerry'</b>"#).to_string(),
            "&lt;b a=&quot;1&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_model_text_is_escaped_in_cards() {
        let a = article("minors", "<script>alert(1)</script>");
        let html = article_card(&a);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));

        let d = Debate {
            title: "<img src=x>".to_string(),
            ..Default::default()
        };
        assert!(debate_card(0, &d).contains("&lt;img src=x&gt;"));
    }

    #[test]
    fn test_unknown_tag_color_falls_back_to_purple() {
        for token in ["orange", "", "Navy", "var(--red)"] {
            let mut a = article("minors", "h");
            a.tag_color = token.to_string();
            assert!(article_card(&a).contains(r#"class="news-tag purple""#));
        }
        let mut a = article("minors", "h");
        a.tag_color = "red".to_string();
        assert!(article_card(&a).contains(r#"class="news-tag red""#));
    }

    #[test]
    fn test_card_without_source_has_no_link() {
        let html = article_card(&article("minors", "h"));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_card_with_source_has_one_link() {
        let mut a = article("minors", "h");
        a.source_url = Some("https://cppa.ca.gov/news".to_string());
        let html = article_card(&a);
        assert_eq!(html.matches("<a ").count(), 1);
        assert!(html.contains(r#"href="https://cppa.ca.gov/news""#));
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains("Source →"));

        a.source_label = Some("CPPA".to_string());
        let html = article_card(&a);
        assert_eq!(html.matches("<a ").count(), 1);
        assert!(html.contains("CPPA →"));
    }

    #[test]
    fn test_non_http_source_is_not_linked() {
        let mut a = article("minors", "h");
        a.source_url = Some("javascript:alert(1)".to_string());
        assert!(!article_card(&a).contains("<a "));
        a.source_url = Some("cppa.ca.gov/news".to_string());
        assert!(!article_card(&a).contains("<a "));
    }

    #[test]
    fn test_filter_all_preserves_order() {
        let list = vec![
            article("bigtech", "1"),
            article("minors", "2"),
            article("bigtech", "3"),
        ];
        let all = filter_articles(&list, Filter::All);
        let heads: Vec<_> = all.iter().map(|a| a.headline.as_str()).collect();
        assert_eq!(heads, ["1", "2", "3"]);

        let big = filter_articles(&list, Filter::Only(Category::BigTech));
        let heads: Vec<_> = big.iter().map(|a| a.headline.as_str()).collect();
        assert_eq!(heads, ["1", "3"]);
    }

    #[test]
    fn test_empty_filter_renders_placeholder() {
        let list = vec![article("minors", "only")];
        let html = articles_grid(&list, Filter::Only(Category::Breaches));
        assert!(html.contains(EMPTY_FILTER_MESSAGE));
        assert!(!html.contains(r#"class="news-card""#));

        let html = articles_grid(&[], Filter::All);
        assert!(html.contains(EMPTY_FILTER_MESSAGE));
    }

    #[test]
    fn test_debate_accent_by_position() {
        assert_eq!(debate_accent(0), None);
        assert_eq!(debate_accent(1), Some("var(--navy)"));
        assert_eq!(debate_accent(2), Some("var(--green)"));
        assert_eq!(debate_accent(3), Some("#c0392b"));
        assert_eq!(debate_accent(4), None);

        let d = Debate {
            border_color: Some("red; background:url(x)".to_string()),
            ..Default::default()
        };
        let first = debate_card(0, &d);
        assert!(!first.contains("style="));
        assert!(!first.contains("background"));
        assert!(debate_card(2, &d).contains("border-left-color:var(--green)"));
    }

    #[test]
    fn test_debates_list_empty_is_none() {
        assert!(debates_list(&[]).is_none());
        let list = vec![Debate::default(), Debate::default()];
        let html = debates_list(&list).unwrap();
        assert_eq!(html.matches(r#"class="hot-topic""#).count(), 2);
    }
}
