//! Prompt construction.
//!
//! Both front ends send the same instruction: who the audience is, the exact
//! JSON shape to return (six article slots, four debate slots) and a demand
//! for raw JSON without fences. The slot values come from the fixed
//! [`Category`] table so the prompt and the renderer never disagree about
//! tokens. The only differences between [`Variant`]s are the `id` field on
//! interactive articles and the `borderColor` field on static debates.

use crate::models::{Category, Variant};

/// Category of each requested article, in order.
pub const ARTICLE_SLOTS: [Category; 6] = [
    Category::California,
    Category::Minors,
    Category::Breaches,
    Category::BigTech,
    Category::California,
    Category::Minors,
];

/// Ordinal and border accent of each requested debate, in order.
pub const DEBATE_SLOTS: [(&str, &str); 4] = [
    ("01", "var(--purple)"),
    ("02", "var(--navy)"),
    ("03", "var(--green)"),
    ("04", "#c0392b"),
];

/// Build the instruction for `date`, a long-form date such as `April 5, 2025`.
pub fn build_prompt(date: &str, variant: Variant) -> String {
    let fence_rule = match variant {
        Variant::Interactive => "no markdown, no explanation, just raw JSON",
        Variant::Static => "no markdown, no code fences, no explanation, just raw JSON",
    };

    let mut out = format!(
        "Today is {date}. You are a news summarizer for a youth data privacy education \
         website aimed at California teenagers.\n\n\
         Generate a JSON object with exactly this structure — {fence_rule}:\n\n\
         {{\n  \"articles\": [\n"
    );

    let articles: Vec<String> = ARTICLE_SLOTS
        .iter()
        .enumerate()
        .map(|(i, cat)| article_slot(i, *cat, date, variant))
        .collect();
    out.push_str(&articles.join(",\n"));
    out.push_str("\n  ],\n  \"debates\": [\n");

    let debates: Vec<String> = DEBATE_SLOTS
        .iter()
        .enumerate()
        .map(|(i, (num, border))| debate_slot(i, num, border, date, variant))
        .collect();
    out.push_str(&debates.join(",\n"));
    out.push_str("\n  ]\n}\n\n");

    out.push_str(&format!(
        "Make every article and debate feel fresh, current, and specific to what's actually \
         happening in data privacy as of {date}. Vary the topics. Use real organizations, \
         laws, and company names where appropriate."
    ));
    out
}

fn article_slot(index: usize, category: Category, date: &str, variant: Variant) -> String {
    let summary = if index == 0 {
        match variant {
            Variant::Interactive => "2-3 sentence plain-English summary of a real or highly \
                plausible recent development in California data privacy law (CCPA, CPRA, CPPA \
                enforcement, Age-Appropriate Design Code, etc.). Write for a 16-year-old. Be \
                specific and current."
                .to_string(),
            Variant::Static => format!(
                "2-3 sentence plain-English summary. Write for a 16-year-old. Be specific and \
                 current to {date}."
            ),
        }
    } else {
        "...".to_string()
    };
    let (date_hint, label_hint) = if index == 0 {
        ("approximate date or timeframe", "source name")
    } else {
        ("...", "...")
    };

    let mut slot = String::from("    {\n");
    if variant == Variant::Interactive {
        slot.push_str(&format!("      \"id\": {},\n", index + 1));
    }
    slot.push_str(&format!(
        "      \"category\": \"{}\",\n\
         \x20     \"tag\": \"{}\",\n\
         \x20     \"tagColor\": \"{}\",\n\
         \x20     \"headline\": \"...\",\n\
         \x20     \"summary\": \"{summary}\",\n\
         \x20     \"date\": \"{date_hint}\",\n\
         \x20     \"sourceLabel\": \"{label_hint}\",\n\
         \x20     \"sourceUrl\": \"https://...\"\n    }}",
        category.token(),
        category.label(),
        category.tag_color().css_class(),
    ));
    slot
}

fn debate_slot(index: usize, num: &str, border: &str, date: &str, variant: Variant) -> String {
    let summary = if index == 0 {
        match variant {
            Variant::Interactive => format!(
                "2-3 sentence summary of the biggest current ongoing debate in data privacy or \
                 online safety that affects young people. Be specific and current to {date}."
            ),
            Variant::Static => format!(
                "2-3 sentences on a major ongoing privacy debate affecting young people. Be \
                 specific to {date}."
            ),
        }
    } else {
        "...".to_string()
    };

    let mut slot = format!("    {{\n      \"num\": \"{num}\",\n");
    if variant == Variant::Static {
        slot.push_str(&format!("      \"borderColor\": \"{border}\",\n"));
    }
    slot.push_str(&format!(
        "      \"title\": \"...\",\n      \"summary\": \"{summary}\"\n    }}"
    ));
    slot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_date() {
        let p = build_prompt("April 5, 2025", Variant::Static);
        assert!(p.starts_with("Today is April 5, 2025."));
        assert!(p.contains("as of April 5, 2025"));
    }

    #[test]
    fn test_prompt_requests_six_articles_and_four_debates() {
        for variant in [Variant::Interactive, Variant::Static] {
            let p = build_prompt("May 1, 2025", variant);
            assert_eq!(p.matches("\"category\":").count(), 6);
            assert_eq!(p.matches("\"num\":").count(), 4);
            assert!(p.contains("\"category\": \"bigtech\""));
            assert!(p.contains("\"tag\": \"Teen & Minors\""));
        }
    }

    #[test]
    fn test_interactive_prompt_numbers_articles() {
        let p = build_prompt("May 1, 2025", Variant::Interactive);
        assert!(p.contains("\"id\": 1,"));
        assert!(p.contains("\"id\": 6,"));
        assert!(!p.contains("borderColor"));
    }

    #[test]
    fn test_static_prompt_requests_border_colors() {
        let p = build_prompt("May 1, 2025", Variant::Static);
        assert!(!p.contains("\"id\":"));
        assert_eq!(p.matches("\"borderColor\":").count(), 4);
        assert!(p.contains("\"borderColor\": \"#c0392b\""));
        assert!(p.contains("no code fences"));
    }

    #[test]
    fn test_slot_tags_match_category_table() {
        let p = build_prompt("May 1, 2025", Variant::Static);
        assert!(p.contains(
            "\"category\": \"breaches\",\n      \"tag\": \"Data Breaches\",\n      \"tagColor\": \"navy\""
        ));
    }
}
