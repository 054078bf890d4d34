//! Interactive chat loop: reads lines, applies reply events as they come.

use std::io::{self, Write};
use std::sync::Arc;

use desabafa_ai::language::{resolve_language, t, LANGUAGES};
use desabafa_ai::{ChatSession, CompletionClient};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::console::Console;
use crate::tips;

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Blank,
    Message(&'a str),
    /// `/lang [CODE]`
    Language(Option<&'a str>),
    /// `/tip [TOPIC]`
    Tip(Option<&'a str>),
    Quit,
    Unknown(&'a str),
}

pub fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Blank;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return Input::Message(line);
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|arg| !arg.is_empty())),
        None => (command, None),
    };
    match name.to_ascii_lowercase().as_str() {
        "lang" | "language" => Input::Language(arg),
        "tip" | "tips" => Input::Tip(arg),
        "quit" | "exit" | "q" => Input::Quit,
        _ => Input::Unknown(name),
    }
}

pub fn print_banner<W: Write>(out: &mut W, language: &str) -> io::Result<()> {
    writeln!(
        out,
        "{} | {}",
        t("app_name", language),
        t("app_short_description", language)
    )?;
    writeln!(out, "{}", t("disclaimer", language))?;
    writeln!(out, "({})\n", t("input_placeholder", language))
}

pub fn print_languages<W: Write>(out: &mut W, current: &str) -> io::Result<()> {
    for lang in LANGUAGES {
        let marker = if lang.code == current { '*' } else { ' ' };
        writeln!(out, "{marker} {} {:<6} {}", lang.flag, lang.code, lang.name)?;
    }
    Ok(())
}

/// Run until `/quit` or end of input.
///
/// At end of input a reply still streaming is waited for, so piped input
/// gets its answer. Articles are generated in the background; reply
/// fragments keep arriving meanwhile.
pub async fn run<R, W>(
    mut session: ChatSession,
    client: Option<Arc<dyn CompletionClient>>,
    input: R,
    console: Console<W>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let (tips_tx, mut tips_rx) = mpsc::unbounded_channel();
    let mut pending_tips = 0usize;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Input::Blank => {}
                    Input::Message(text) => {
                        session.submit(text);
                    }
                    Input::Language(None) => {
                        console.say_with(|out| print_languages(out, session.language()))?;
                    }
                    Input::Language(Some(code)) => {
                        let language = resolve_language(code);
                        console.say(t("language_changed", language.code))?;
                        session = session.reset(language.code);
                    }
                    Input::Tip(topic) => {
                        spawn_tip(
                            client.clone(),
                            topic.map(str::to_string),
                            session.language().to_string(),
                            tips_tx.clone(),
                        );
                        pending_tips += 1;
                    }
                    Input::Quit => return Ok(()),
                    Input::Unknown(name) => {
                        debug!(command = name, "Unknown command");
                        console.say(t("unknown_command", session.language()))?;
                    }
                }
            }
            Some(article) = tips_rx.recv() => {
                pending_tips -= 1;
                console.say(&article)?;
            }
            _ = session.next_event() => {}
        }
    }

    session.wait_idle().await;
    while pending_tips > 0 {
        let Some(article) = tips_rx.recv().await else { break };
        pending_tips -= 1;
        console.say(&article)?;
    }
    Ok(())
}

fn spawn_tip(
    client: Option<Arc<dyn CompletionClient>>,
    topic: Option<String>,
    language: String,
    done: mpsc::UnboundedSender<String>,
) {
    tokio::spawn(async move {
        let mut article = Vec::new();
        if let Err(e) =
            tips::print_tip(&mut article, client.as_deref(), topic.as_deref(), &language).await
        {
            debug!("Tip output failed: {e}");
        }
        let _ = done.send(String::from_utf8_lossy(&article).into_owned());
    });
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use desabafa_ai::session::UNAVAILABLE_NOTICE;
    use desabafa_ai::{AiError, FragmentStream, Message};
    use futures_util::{stream, StreamExt};

    use super::*;
    use crate::presenter::TerminalPresenter;
    use crate::test_support::SharedBuf;

    /// Streams the same reply to every request.
    struct EchoClient(&'static [&'static str]);

    #[async_trait]
    impl CompletionClient for EchoClient {
        async fn create_stream(&self, _: &[Message], _: &str) -> Result<FragmentStream, AiError> {
            let fragments: Vec<Result<String, AiError>> =
                self.0.iter().map(|f| Ok(f.to_string())).collect();
            Ok(Box::pin(stream::iter(fragments)))
        }

        async fn complete(&self, _: &[Message], _: &str) -> Result<String, AiError> {
            Ok(self.0.concat())
        }
    }

    async fn run_script(client: Option<Arc<dyn CompletionClient>>, script: &'static str) -> String {
        let buf = SharedBuf::default();
        let console = Console::new(buf.clone());
        let session = ChatSession::new("en-US", client.clone())
            .with_presenter(Box::new(TerminalPresenter::new(console.clone())));
        run(session, client, script.as_bytes(), console)
            .await
            .unwrap();
        buf.text()
    }

    fn echo() -> Option<Arc<dyn CompletionClient>> {
        Some(Arc::new(EchoClient(&["Hello", " there"])))
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_input("   "), Input::Blank);
        assert_eq!(parse_input(" hi  "), Input::Message(" hi  "));
        assert_eq!(parse_input("/lang pt-PT"), Input::Language(Some("pt-PT")));
        assert_eq!(parse_input("/LANG"), Input::Language(None));
        assert_eq!(parse_input("/tip  sleep "), Input::Tip(Some("sleep")));
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert_eq!(parse_input("/dance now"), Input::Unknown("dance"));
    }

    #[tokio::test]
    async fn reply_is_printed_before_exit() {
        let text = run_script(echo(), "hi\n").await;
        assert!(text.ends_with("desabafa> Hello there\n"));
    }

    #[tokio::test]
    async fn quit_stops_reading() {
        let text = run_script(echo(), "/quit\nhi\n").await;
        assert!(!text.contains("Hello there"));
    }

    #[tokio::test]
    async fn language_command_starts_new_conversation() {
        let text = run_script(echo(), "/lang pt\n").await;
        assert!(text.contains("Idioma alterado. Começou uma nova conversa.\n"));
        assert!(text.contains("desabafa> Olá! Eu sou o Desabafa"));
    }

    #[tokio::test]
    async fn unknown_command_is_reported() {
        let text = run_script(echo(), "/dance\n").await;
        assert!(text.ends_with("Unknown command. Try /lang, /tip or /quit.\n"));
    }

    #[tokio::test]
    async fn unavailable_chat_ignores_messages() {
        let text = run_script(None, "hi\n").await;
        assert_eq!(text, format!("desabafa> {UNAVAILABLE_NOTICE}\n"));
    }

    #[tokio::test]
    async fn language_list_marks_current() {
        let text = run_script(None, "/lang\n").await;
        assert!(text.contains("* 🇺🇸 en-US  English (US)\n"));
    }

    /// Sends one fragment, then never finishes.
    struct StallingClient;

    #[async_trait]
    impl CompletionClient for StallingClient {
        async fn create_stream(&self, _: &[Message], _: &str) -> Result<FragmentStream, AiError> {
            let first = stream::iter(vec![Ok("Par".to_string())]);
            Ok(Box::pin(first.chain(stream::pending())))
        }

        async fn complete(&self, _: &[Message], _: &str) -> Result<String, AiError> {
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn command_output_never_lands_inside_a_reply_line() {
        let text = run_script(Some(Arc::new(StallingClient)), "hi\n/lang pt\n").await;
        assert!(text.contains(
            "\nIdioma alterado. Começou uma nova conversa.\n\ndesabafa> Olá! Eu sou o Desabafa"
        ));
        assert!(!text.contains("ParIdioma"));
    }

    #[tokio::test]
    async fn tip_article_is_printed() {
        let text = run_script(echo(), "/tip sleep\n").await;
        assert!(text.ends_with("🌙 Sleeping better\n\nHello there\n\n"));
    }
}
