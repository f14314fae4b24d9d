use scraper::Html;

/// Challenge phrases served by verification interstitials instead of results.
pub const DEFAULT_CHALLENGE_PHRASES: &[&str] = &[
    "não é um robô",
    "nao e um robo",
    "are you a human",
    "not a robot",
    "digite os caracteres que você vê abaixo",
    "enter the characters you see below",
];

/// Classifies a fetched page as real content or an automated-verification page.
#[derive(Debug, Clone)]
pub struct BotWallDetector {
    phrases: Vec<String>,
}

impl BotWallDetector {
    pub fn new() -> Self {
        Self::with_extra_phrases(std::iter::empty::<String>())
    }

    pub fn with_extra_phrases<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut phrases: Vec<String> = DEFAULT_CHALLENGE_PHRASES
            .iter()
            .map(|p| p.to_string())
            .collect();

        for phrase in extra {
            let phrase = phrase.as_ref().trim().to_lowercase();
            if !phrase.is_empty() && !phrases.contains(&phrase) {
                phrases.push(phrase);
            }
        }

        Self { phrases }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Case-insensitive substring match against the challenge phrases.
    pub fn is_bot_wall(&self, page_text: &str) -> bool {
        let lowered = page_text.to_lowercase();
        self.phrases.iter().any(|phrase| lowered.contains(phrase.as_str()))
    }

    /// Classifies a fetched HTML body by its visible text.
    pub fn is_bot_wall_page(&self, page_body: &str) -> bool {
        self.is_bot_wall(&visible_text(page_body))
    }
}

/// Decoded text a browser would render: entities resolved, script and style
/// contents and attributes left out, whitespace collapsed.
pub fn visible_text(page_body: &str) -> String {
    let document = Html::parse_document(page_body);

    let pieces: Vec<&str> = document
        .tree
        .root()
        .descendants()
        .filter(|node| {
            !node
                .parent()
                .and_then(|parent| parent.value().as_element())
                .is_some_and(|element| {
                    matches!(element.name(), "script" | "style" | "noscript" | "template")
                })
        })
        .filter_map(|node| node.value().as_text())
        .flat_map(|text| text.split_whitespace())
        .collect();

    pieces.join(" ")
}

impl Default for BotWallDetector {
    fn default() -> Self {
        Self::new()
    }
}
