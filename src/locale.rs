use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Language of the embedded base vocabulary
pub const BASE_LANG: &str = "en_US";

const BASE_VOCABULARY: &str = include_str!("../langs/en_US.json");

const BUILTIN_TRANSLATIONS: &[(&str, &str)] = &[
    ("de_DE", include_str!("../langs/de_DE.json")),
    ("pl_PL", include_str!("../langs/pl_PL.json")),
];

/// Keys the UI looks up; the base vocabulary must define all of them
pub const REQUIRED_KEYS: &[&str] = &[
    "clear",
    "close",
    "copy",
    "delete",
    "move",
    "search",
    "clipboard-history",
    "items",
    "empty-history",
    "no-match",
    "no-selection",
    "preview-unavailable",
    "preview-truncated",
    "wipe-confirm",
    "wipe-warning",
    "yes",
    "no",
];

#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    #[error("Failed to parse base vocabulary: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Base vocabulary is missing key `{0}`")]
    MissingKey(&'static str),
}

/// UI strings for one language, always backed by the complete base set
#[derive(Debug, Clone)]
pub struct Vocabulary {
    lang: String,
    words: HashMap<String, String>,
}

impl Vocabulary {
    /// Parse and validate a base vocabulary
    pub fn from_base(json: &str) -> Result<Self, LocaleError> {
        let words: HashMap<String, String> = serde_json::from_str(json)?;
        if let Some(missing) = REQUIRED_KEYS.iter().find(|k| !words.contains_key(**k)) {
            return Err(LocaleError::MissingKey(*missing));
        }

        Ok(Vocabulary {
            lang: BASE_LANG.to_string(),
            words,
        })
    }

    /// The vocabulary compiled into the binary
    pub fn base() -> Result<Self, LocaleError> {
        Self::from_base(BASE_VOCABULARY)
    }

    /// Base vocabulary with the translation for `tag` applied, if one exists
    ///
    /// `user_dir` is searched for `<tag>.json` before the built-in translations.
    pub fn load(tag: &str, user_dir: Option<&Path>) -> Result<Self, LocaleError> {
        let mut voc = Self::base()?;
        if tag == BASE_LANG {
            return Ok(voc);
        }

        let Some((source, json)) = find_translation(tag, user_dir) else {
            log::info!("No translation for '{}', using {}", tag, BASE_LANG);
            return Ok(voc);
        };

        match voc.apply(tag, &json) {
            Ok(count) => log::debug!("Applied {} strings for '{}' from {}", count, tag, source),
            Err(e) => log::warn!("Failed loading translation into '{}' from {}: {}", tag, source, e),
        }
        Ok(voc)
    }

    /// Overlay a translation; keys unknown to the base set are ignored
    /// Returns the number of strings replaced
    pub fn apply(&mut self, lang: &str, json: &str) -> Result<usize, serde_json::Error> {
        let translated: HashMap<String, String> = serde_json::from_str(json)?;
        let mut count = 0;
        for (key, value) in translated {
            if let Some(slot) = self.words.get_mut(&key) {
                *slot = value;
                count += 1;
            }
        }
        self.lang = lang.to_string();
        Ok(count)
    }

    /// Look up a UI string. Unknown keys render as themselves
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.words.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }
}

fn find_translation(tag: &str, user_dir: Option<&Path>) -> Option<(String, String)> {
    if let Some(dir) = user_dir {
        let path = dir.join(format!("{}.json", tag));
        if path.is_file() {
            match fs::read_to_string(&path) {
                Ok(json) => return Some((path.display().to_string(), json)),
                Err(e) => log::warn!("Failed to read {:?}: {}", path, e),
            }
        }
    }

    BUILTIN_TRANSLATIONS
        .iter()
        .find(|(lang, _)| *lang == tag)
        .map(|(lang, json)| (format!("built-in {}", lang), json.to_string()))
}

/// Pick the locale tag: forced config value, then the shell's forced locale, then $LANG
pub fn resolve_tag(forced: Option<&str>, shell_forced: Option<&str>, lang_env: Option<&str>) -> String {
    if let Some(tag) = non_empty(forced).or(non_empty(shell_forced)) {
        return tag.to_string();
    }

    non_empty(lang_env)
        .and_then(|lang| lang.split('.').next())
        .filter(|tag| !tag.is_empty())
        .unwrap_or(BASE_LANG)
        .to_string()
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// `interface-locale` from the nwg-shell data file, if set
pub fn shell_interface_locale(path: &Path) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    let data: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("Ignoring unparseable shell data file {:?}: {}", path, e);
            return None;
        }
    };

    data.get("interface-locale")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
