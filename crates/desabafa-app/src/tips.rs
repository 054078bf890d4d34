//! `/tip` and `desabafa tip`: well-being articles.

use std::io::{self, Write};

use desabafa_ai::language::t;
use desabafa_ai::session::UNAVAILABLE_NOTICE;
use desabafa_ai::tips::{find_topic, generate_tip_article, TIP_TOPICS};
use desabafa_ai::CompletionClient;

/// Print the article for `topic`, or the topic list when no known topic
/// was named.
pub async fn print_tip<W: Write>(
    out: &mut W,
    client: Option<&dyn CompletionClient>,
    topic: Option<&str>,
    language: &str,
) -> io::Result<()> {
    let Some(topic) = topic.and_then(find_topic) else {
        if let Some(name) = topic {
            tracing::debug!(topic = name, "Unknown tip topic");
        }
        return print_topics(out, language);
    };

    let Some(client) = client else {
        return writeln!(out, "{UNAVAILABLE_NOTICE}");
    };

    match generate_tip_article(client, topic, language).await {
        Ok(article) => writeln!(
            out,
            "{} {}\n\n{article}\n",
            topic.emoji,
            topic.title(language)
        ),
        Err(e) => {
            tracing::warn!(topic = topic.id, "Tip article failed: {e}");
            writeln!(out, "{}", t("error_fetching_article", language))
        }
    }
}

fn print_topics<W: Write>(out: &mut W, language: &str) -> io::Result<()> {
    writeln!(out, "{}", t("tips_title", language))?;
    for topic in TIP_TOPICS {
        writeln!(
            out,
            "  {} {:<12} {}",
            topic.emoji,
            topic.id,
            topic.title(language)
        )?;
    }
    Ok(())
}
