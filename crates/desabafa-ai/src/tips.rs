//! Well-being tip articles generated on demand.

use tracing::debug;

use crate::language::{base_subtag, language_name, system_instruction};
use crate::{AiError, CompletionClient, Message};

/// A topic the user can ask an article about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipTopic {
    pub id: &'static str,
    pub emoji: &'static str,
    /// `(primary subtag, title)`; English first.
    titles: &'static [(&'static str, &'static str)],
}

impl TipTopic {
    /// Title in the language of `code`, English when not translated.
    pub fn title(&self, code: &str) -> &'static str {
        let base = base_subtag(code).to_ascii_lowercase();
        self.titles
            .iter()
            .find(|(lang, _)| *lang == base)
            .or_else(|| self.titles.first())
            .map(|(_, title)| *title)
            .unwrap_or(self.id)
    }
}

pub const TIP_TOPICS: &[TipTopic] = &[
    TipTopic {
        id: "anxiety",
        emoji: "🌬️",
        titles: &[
            ("en", "Coping with anxiety"),
            ("pt", "Lidar com a ansiedade"),
            ("es", "Afrontar la ansiedad"),
        ],
    },
    TipTopic {
        id: "sleep",
        emoji: "🌙",
        titles: &[
            ("en", "Sleeping better"),
            ("pt", "Dormir melhor"),
            ("es", "Dormir mejor"),
        ],
    },
    TipTopic {
        id: "stress",
        emoji: "🌿",
        titles: &[
            ("en", "Managing stress"),
            ("pt", "Gerir o stress"),
            ("es", "Manejar el estrés"),
        ],
    },
    TipTopic {
        id: "loneliness",
        emoji: "🤝",
        titles: &[
            ("en", "Feeling less alone"),
            ("pt", "Sentir-se menos só"),
            ("es", "Sentirse menos solo"),
        ],
    },
];

pub fn find_topic(id: &str) -> Option<&'static TipTopic> {
    TIP_TOPICS
        .iter()
        .find(|topic| topic.id.eq_ignore_ascii_case(id.trim()))
}

fn article_prompt(topic_title: &str, language_name: &str) -> String {
    format!(
        "Write a short, warm article (about 300 words) with practical, evidence-based tips on \
         \"{topic_title}\". Write it in {language_name}, use simple language and a few \
         markdown headings, and end by reminding the reader that professional help is \
         always an option."
    )
}

/// Ask the model for an article on `topic`, written in `language`.
pub async fn generate_tip_article(
    client: &dyn CompletionClient,
    topic: &TipTopic,
    language: &str,
) -> Result<String, AiError> {
    let name = language_name(language);
    let prompt = article_prompt(topic.title(language), name);
    debug!(topic = topic.id, language, "Requesting tip article");

    let article = client
        .complete(&[Message::user(prompt)], &system_instruction(name))
        .await?;

    let article = article.trim();
    if article.is_empty() {
        return Err(AiError::ParseError("empty article".into()));
    }
    Ok(article.to_string())
}
