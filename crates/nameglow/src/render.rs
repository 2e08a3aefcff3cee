//! Presentation of [`DailyContent`]: HTML card, plain text, and JSON.
//!
//! All renderers are pure functions of their input.

use std::fmt::Write;

use crate::composer::{DailyContent, VirtueAssignment};
use crate::error::Result;
use crate::name::capitalize;

const CARD_STYLE: &str = "font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; \
     padding: 20px; border-radius: 10px; \
     background: linear-gradient(135deg, #f5f7fa 0%, #c3cfe2 100%);";
const SECTION_STYLE: &str = "background-color: white; border-radius: 8px; padding: 15px; \
     margin: 15px 0; box-shadow: 0 2px 10px rgba(0,0,0,0.05);";
const HEADING_STYLE: &str = "color: #4a6fa5; margin-top: 0;";

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A self-contained, inline-styled HTML card.
pub fn render_html(content: &DailyContent) -> String {
    let mut nicknames = String::new();
    for nickname in &content.nicknames {
        let _ = write!(
            nicknames,
            r#"
      <li style="margin-bottom: 10px;">
        <div style="display: flex; justify-content: space-between; align-items: center;">
          <span style="font-size: 20px; color: #2c3e50;"><strong>{}</strong></span>
          <span style="color: #7f8c8d; font-style: italic; font-size: 14px;">{}</span>
        </div>
      </li>"#,
            escape_html(&nickname.nickname),
            escape_html(&nickname.meaning),
        );
    }

    format!(
        r#"<div style="{CARD_STYLE}">
  <h2 style="text-align: center; color: #4a6fa5;">NameGlow Daily Insight</h2>
  <p style="text-align: center; color: #666;">For {name} on {date}</p>
  <div style="{SECTION_STYLE}">
    <h3 style="{HEADING_STYLE}">Your Anagram of the Day</h3>
    <p style="font-size: 28px; text-align: center; margin: 10px 0; color: #2c3e50;">{anagram}</p>
    <p style="text-align: center; font-style: italic; color: #7f8c8d;">Embodying the virtue of <strong>{virtue}</strong></p>
  </div>
  <div style="{SECTION_STYLE}">
    <h3 style="{HEADING_STYLE}">Your Suggested Nicknames</h3>
    <ul style="list-style-type: none; padding: 0;">{nicknames}
    </ul>
  </div>
  <div style="{SECTION_STYLE}">
    <h3 style="{HEADING_STYLE}">Today's Reflection</h3>
    <p style="color: #34495e; font-style: italic; text-align: center;">{reflection}</p>
  </div>
</div>
"#,
        name = escape_html(&content.name),
        date = content.date.format("%Y-%m-%d"),
        anagram = escape_html(&capitalize(&content.anagram)),
        virtue = escape_html(&content.virtue),
        reflection = escape_html(&content.reflection_prompt),
    )
}

/// Plain multi-line summary for terminals and logs.
pub fn render_text(content: &DailyContent) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "NameGlow Daily Insight for {} on {}",
        content.name,
        content.date.format("%Y-%m-%d")
    );
    let _ = writeln!(
        out,
        "Anagram: {} → Virtue: {}",
        capitalize(&content.anagram),
        content.virtue
    );
    let _ = writeln!(out, "Nicknames:");
    for nickname in &content.nicknames {
        let _ = writeln!(out, "  • {}: {}", nickname.nickname, nickname.meaning);
    }
    let _ = writeln!(out, "Reflection prompt: {}", content.reflection_prompt);
    if !content.alternative_anagrams.is_empty() {
        let alternatives: Vec<String> = content
            .alternative_anagrams
            .iter()
            .map(String::as_str)
            .map(capitalize)
            .collect();
        let _ = writeln!(out, "Alternatives: {}", alternatives.join(", "));
    }
    out
}

/// Pretty-printed JSON of the full record.
pub fn render_json(content: &DailyContent) -> Result<String> {
    Ok(serde_json::to_string_pretty(content)?)
}

/// Numbered "Variant - Virtue" lines.
pub fn render_alternatives(assignments: &[VirtueAssignment]) -> String {
    let mut out = String::new();
    for (idx, assignment) in assignments.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} - {}",
            idx + 1,
            capitalize(&assignment.variant),
            assignment.virtue
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nickname::Nickname;
    use chrono::NaiveDate;

    fn sample() -> DailyContent {
        DailyContent {
            date: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
            name: "Al <Bo>".into(),
            anagram: "xelaa".into(),
            virtue: "Joy".into(),
            nicknames: vec![
                Nickname::new("Aie", "Represents the essence of Al's spirit"),
                Nickname::new("Ay", "Represents the essence of Al's spirit"),
            ],
            reflection_prompt: "What part of you does this virtue illuminate today?".into(),
            alternative_anagrams: vec!["laxea".into()],
        }
    }

    #[test]
    fn html_contains_every_section() {
        let html = render_html(&sample());
        assert!(html.contains("NameGlow Daily Insight"));
        assert!(html.contains("For Al &lt;Bo&gt; on 2024-03-14"));
        assert!(html.contains(">Xelaa</p>"));
        assert!(html.contains("<strong>Joy</strong>"));
        assert!(html.contains("<strong>Aie</strong>"));
        assert!(html.contains("Al&#39;s spirit"));
        assert!(html.contains("Today's Reflection"));
        assert!(html.contains("illuminate today?"));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn text_summary() {
        let text = render_text(&sample());
        assert!(text.contains("Anagram: Xelaa → Virtue: Joy"));
        assert!(text.contains("  • Aie: Represents the essence of Al's spirit"));
        assert!(text.contains("Reflection prompt: What part of you"));
        assert!(text.contains("Alternatives: Laxea"));
    }

    #[test]
    fn json_is_pretty() {
        let json = render_json(&sample()).unwrap();
        assert!(json.contains("\n  \"anagram\": \"xelaa\""));
    }

    #[test]
    fn alternatives_are_numbered() {
        let lines = render_alternatives(&[
            VirtueAssignment {
                variant: "bac".into(),
                virtue: "Wonder".into(),
            },
            VirtueAssignment {
                variant: "bca".into(),
                virtue: "Generosity".into(),
            },
        ]);
        assert_eq!(lines, "1. Bac - Wonder\n2. Bca - Generosity\n");
    }
}
