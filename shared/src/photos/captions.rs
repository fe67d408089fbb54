use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Locales with their own caption pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
}

impl Locale {
    /// `"de"`, `"de-AT"` and `"de_CH"` are German; anything unknown is English.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag.trim().split(['-', '_']).next().unwrap_or_default();
        match language.to_ascii_lowercase().as_str() {
            "de" => Locale::De,
            _ => Locale::En,
        }
    }
}

const EN: &[&str] = &[
    "🎯 Found it! Mission accomplished!",
    "🎄 Treasure located! Christmas magic activated!",
    "✅ Quest complete! I am the champion!",
    "🎁 Found the spot! Santa would be proud!",
    "🔍 Mystery solved! Location discovered!",
    "🎅 I found it! The elves would be jealous!",
    "✨ Mission success! Christmas quest complete!",
    "🏆 Victory! I found the hidden treasure!",
    "🎪 Found it! The hunt is over!",
    "🎨 Location unlocked! Achievement unlocked!",
    "🎭 Mystery location found! Case closed!",
    "🎬 Scene found! Action!",
    "🎸 Rock star location discovered!",
    "🎯 Bullseye! Found the target!",
    "🎲 Lucky find! The dice were in my favor!",
];

const DE: &[&str] = &[
    "🎯 Gefunden! Mission erfüllt!",
    "🎄 Schatz gefunden! Weihnachtsmagie aktiviert!",
    "✅ Quest abgeschlossen! Ich bin der Champion!",
    "🎁 Der Ort gefunden! Der Weihnachtsmann wäre stolz!",
    "🔍 Rätsel gelöst! Location entdeckt!",
    "🎅 Ich hab's gefunden! Die Elfen wären neidisch!",
    "✨ Mission erfolgreich! Weihnachtsquest abgeschlossen!",
    "🏆 Sieg! Ich habe den versteckten Schatz gefunden!",
    "🎪 Gefunden! Die Jagd ist vorbei!",
    "🎨 Location freigeschaltet! Erfolg freigeschaltet!",
    "🎭 Geheimnisvoller Ort gefunden! Fall abgeschlossen!",
    "🎬 Szene gefunden! Action!",
    "🎸 Rockstar-Location entdeckt!",
    "🎯 Volltreffer! Das Ziel gefunden!",
    "🎲 Glücksfund! Die Würfel waren auf meiner Seite!",
];

pub fn caption_pool(locale: Locale) -> &'static [&'static str] {
    match locale {
        Locale::En => EN,
        Locale::De => DE,
    }
}

/// Uniform pick from the locale's pool.
pub fn random_caption<R: Rng + ?Sized>(locale: Locale, rng: &mut R) -> &'static str {
    let pool = caption_pool(locale);
    pool.choose(rng).copied().unwrap_or(EN[0])
}

/// The caller's own text when it has any, otherwise a random phrase.
pub fn resolve_caption<R: Rng + ?Sized>(custom: Option<&str>, locale: Locale, rng: &mut R) -> String {
    match custom.map(str::trim).filter(|c| !c.is_empty()) {
        Some(caption) => caption.to_string(),
        None => random_caption(locale, rng).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn locale_tags() {
        assert_eq!(Locale::from_tag("de"), Locale::De);
        assert_eq!(Locale::from_tag("de-AT"), Locale::De);
        assert_eq!(Locale::from_tag("DE_ch"), Locale::De);
        assert_eq!(Locale::from_tag("en-US"), Locale::En);
        assert_eq!(Locale::from_tag("fr"), Locale::En);
        assert_eq!(Locale::from_tag(""), Locale::En);
    }

    #[test]
    fn pools_have_fifteen_phrases() {
        assert_eq!(caption_pool(Locale::En).len(), 15);
        assert_eq!(caption_pool(Locale::De).len(), 15);
    }

    #[test]
    fn custom_caption_wins_when_not_blank() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(resolve_caption(Some("  Found it! "), Locale::En, &mut rng), "Found it!");

        let picked = resolve_caption(Some("   "), Locale::De, &mut rng);
        assert!(caption_pool(Locale::De).contains(&picked.as_str()));

        let picked = resolve_caption(None, Locale::En, &mut rng);
        assert!(caption_pool(Locale::En).contains(&picked.as_str()));
    }

    #[test]
    fn same_seed_same_caption() {
        let a: Vec<&str> = {
            let mut rng = StdRng::seed_from_u64(2024);
            (0..10).map(|_| random_caption(Locale::En, &mut rng)).collect()
        };
        let b: Vec<&str> = {
            let mut rng = StdRng::seed_from_u64(2024);
            (0..10).map(|_| random_caption(Locale::En, &mut rng)).collect()
        };
        assert_eq!(a, b);
    }
}
