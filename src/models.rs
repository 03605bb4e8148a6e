//! Data models for generated news content.
//!
//! This module defines the structures the model is asked to produce and the
//! fixed vocabularies used to request and display them:
//! - [`NewsPayload`]: the whole reply, `articles` plus `debates`
//! - [`Article`] and [`Debate`]: one card each
//! - [`Category`], [`Filter`], [`TagColor`]: fixed lookup tables
//! - [`Variant`]: which front end a prompt or page is built for
//!
//! Field names use camelCase on the wire to match the JSON shape spelled out
//! in the prompt. Model-provided values are kept as plain strings and are not
//! checked against the enumerations here; lookups happen at render time.
//!
//! Card fields accept any JSON value: `null` reads as absent, numbers and
//! booleans as their JSON text. Only the `articles`/`debates` collections
//! themselves can make a reply fail to decode.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Everything produced by one generation request.
///
/// Missing or `null` `articles`/`debates` keys deserialize as empty lists
/// rather than failing the whole reply.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NewsPayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub articles: Vec<Article>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub debates: Vec<Debate>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(scalar_text)
}

/// One news item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Ordinal requested by the interactive prompt only.
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Category token, expected to be one of [`Category::ALL`].
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    /// Human-readable label shown on the card.
    #[serde(default, deserialize_with = "lenient_string")]
    pub tag: String,
    /// Style token, expected to be one of the [`TagColor`] names.
    #[serde(default, deserialize_with = "lenient_string")]
    pub tag_color: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub headline: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: String,
    /// Free-form date or timeframe, never parsed.
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_label: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_url: Option<String>,
}

impl Article {
    /// The link target, treating an empty string the same as an absent one.
    pub fn source_url(&self) -> Option<&str> {
        self.source_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// The link label, defaulting to `"Source"`.
    pub fn source_label(&self) -> &str {
        self.source_label
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or("Source")
    }
}

/// One ongoing policy debate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Debate {
    /// Display ordinal such as `"01"`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub num: String,
    /// Accent requested by the batch prompt. Accepted but not used for styling.
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub border_color: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: String,
}

/// The four topical classifications articles are filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    California,
    Minors,
    Breaches,
    BigTech,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::California,
        Category::Minors,
        Category::Breaches,
        Category::BigTech,
    ];

    /// Wire token used in JSON and filter controls.
    pub fn token(self) -> &'static str {
        match self {
            Category::California => "california",
            Category::Minors => "minors",
            Category::Breaches => "breaches",
            Category::BigTech => "bigtech",
        }
    }

    /// Tag label requested from the model and shown on filter buttons.
    pub fn label(self) -> &'static str {
        match self {
            Category::California => "California Laws",
            Category::Minors => "Teen & Minors",
            Category::Breaches => "Data Breaches",
            Category::BigTech => "Big Tech",
        }
    }

    /// Tag color requested from the model for this category.
    pub fn tag_color(self) -> TagColor {
        match self {
            Category::California => TagColor::Purple,
            Category::Minors => TagColor::Green,
            Category::Breaches => TagColor::Navy,
            Category::BigTech => TagColor::Red,
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.token() == s)
            .ok_or_else(|| format!("unknown category `{s}`"))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Which articles are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Only(Category),
}

impl Filter {
    /// `all` followed by the four categories, in control-bar order.
    pub fn choices() -> impl Iterator<Item = Filter> {
        std::iter::once(Filter::All).chain(Category::ALL.into_iter().map(Filter::Only))
    }

    pub fn token(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Only(c) => c.token(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All Topics",
            Filter::Only(c) => c.label(),
        }
    }

    /// Whether an article's raw category token passes this filter.
    pub fn matches(self, article: &Article) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(c) => article.category == c.token(),
        }
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(Filter::All)
        } else {
            s.parse().map(Filter::Only)
        }
    }
}

/// Visual style of an article tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagColor {
    Purple,
    Navy,
    Green,
    Red,
}

impl TagColor {
    /// Look up a model-provided token. Anything unrecognized is purple.
    pub fn from_token(token: &str) -> TagColor {
        match token {
            "navy" => TagColor::Navy,
            "green" => TagColor::Green,
            "red" => TagColor::Red,
            _ => TagColor::Purple,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            TagColor::Purple => "purple",
            TagColor::Navy => "navy",
            TagColor::Green => "green",
            TagColor::Red => "red",
        }
    }
}

/// The two front ends. They differ slightly in what the prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Interactive flow: articles carry an `id`, debates have no accent.
    Interactive,
    /// Batch page generation: debates carry a `borderColor`.
    Static,
}
