//! Supported languages, UI translations, and the support persona prompt.

/// A selectable interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

pub const DEFAULT_LANGUAGE: &str = "en-US";

pub const LANGUAGES: &[Language] = &[
    Language {
        code: "pt-PT",
        name: "Português (Portugal)",
        flag: "🇵🇹",
    },
    Language {
        code: "pt-BR",
        name: "Português (Brasil)",
        flag: "🇧🇷",
    },
    Language {
        code: "en-US",
        name: "English (US)",
        flag: "🇺🇸",
    },
    Language {
        code: "en-GB",
        name: "English (UK)",
        flag: "🇬🇧",
    },
    Language {
        code: "es-ES",
        name: "Español",
        flag: "🇪🇸",
    },
];

/// Primary subtag of a locale tag: `"pt-PT"` -> `"pt"`.
pub fn base_subtag(code: &str) -> &str {
    code.split('-').next().unwrap_or(code)
}

/// Pick the supported language closest to `requested`.
///
/// Exact tag match first, then the first entry sharing the primary
/// subtag, then `en-US`.
pub fn resolve_language(requested: &str) -> &'static Language {
    let requested = requested.trim();
    let base = base_subtag(requested);

    LANGUAGES
        .iter()
        .find(|lang| lang.code.eq_ignore_ascii_case(requested))
        .or_else(|| {
            LANGUAGES
                .iter()
                .find(|lang| base_subtag(lang.code).eq_ignore_ascii_case(base))
        })
        .or_else(|| LANGUAGES.iter().find(|lang| lang.code == DEFAULT_LANGUAGE))
        .unwrap_or(&LANGUAGES[0])
}

/// Name of the language in itself, as handed to the model.
pub fn language_name(code: &str) -> &'static str {
    match base_subtag(code).to_ascii_lowercase().as_str() {
        "pt" => "português",
        "es" => "español",
        _ => "English",
    }
}

/// Persona prompt sent with every completion request.
pub fn system_instruction(language_name: &str) -> String {
    format!(
        "You are Desabafa, an empathetic, respectful, and positive AI chatbot. \
         Your purpose is to listen without judgment in a completely anonymous and safe space. \
         Your conversations are not saved. \
         You are not a substitute for mental health professionals, but you are here to offer a supportive ear. \
         Respond in {language_name}. Keep your answers helpful but concise."
    )
}

/// Look up a UI string. Falls back to English, then to the key itself.
pub fn t<'a>(key: &'a str, code: &str) -> &'a str {
    let base = base_subtag(code).to_ascii_lowercase();
    lookup(table_for(&base), key)
        .or_else(|| lookup(EN, key))
        .unwrap_or(key)
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, value)| *value)
}

fn table_for(base: &str) -> &'static [(&'static str, &'static str)] {
    match base {
        "pt" => PT,
        "es" => ES,
        _ => EN,
    }
}

const EN: &[(&str, &str)] = &[
    ("app_name", "Desabafa"),
    ("app_short_description", "Speak without filters. Here you are heard."),
    (
        "welcome_message",
        "Hello! I am Desabafa, your support AI. You can talk about anything you want, \
         with complete anonymity. Nothing you say will be saved. I am here to listen.",
    ),
    ("input_placeholder", "Write your message..."),
    (
        "disclaimer",
        "I am not a substitute for a mental health professional. \
         Conversations disappear when you leave the app.",
    ),
    (
        "error_fetching_article",
        "Sorry, we couldn't load this article right now. Please try again later.",
    ),
    ("unknown_command", "Unknown command. Try /lang, /tip or /quit."),
    ("language_changed", "Language changed. A new conversation has started."),
    ("tips_title", "Tips for your well-being"),
];

const PT: &[(&str, &str)] = &[
    ("app_name", "Desabafa"),
    ("app_short_description", "Fala sem filtros. Aqui és ouvido(a)."),
    (
        "welcome_message",
        "Olá! Eu sou o Desabafa, a tua IA de apoio. Podes falar sobre o que quiseres, \
         com total anonimato. Nada do que disseres será guardado. Estou aqui para te ouvir.",
    ),
    ("input_placeholder", "Escreve a tua mensagem..."),
    (
        "disclaimer",
        "Não sou um substituto para um profissional de saúde mental. \
         As conversas desaparecem quando sais da aplicação.",
    ),
    (
        "error_fetching_article",
        "Desculpa, não foi possível carregar este artigo agora. Tenta novamente mais tarde.",
    ),
    ("unknown_command", "Comando desconhecido. Experimenta /lang, /tip ou /quit."),
    ("language_changed", "Idioma alterado. Começou uma nova conversa."),
    ("tips_title", "Dicas para o teu bem-estar"),
];

const ES: &[(&str, &str)] = &[
    ("app_name", "Desabafa"),
    ("app_short_description", "Habla sin filtros. Aquí se te escucha."),
    (
        "welcome_message",
        "¡Hola! Soy Desabafa, tu IA de apoyo. Puedes hablar de lo que quieras, \
         con total anonimato. Nada de lo que digas se guardará. Estoy aquí para escucharte.",
    ),
    ("input_placeholder", "Escribe tu mensaje..."),
    (
        "disclaimer",
        "No soy un sustituto de un profesional de salud mental. \
         Las conversaciones desaparecen cuando sales de la aplicación.",
    ),
    (
        "error_fetching_article",
        "Lo sentimos, no pudimos cargar este artículo ahora. Inténtalo más tarde.",
    ),
    ("unknown_command", "Comando desconocido. Prueba /lang, /tip o /quit."),
    ("language_changed", "Idioma cambiado. Ha comenzado una nueva conversación."),
    ("tips_title", "Consejos para tu bienestar"),
];
