//! Plural form selection for numerus messages
//!
//! A numerus translation stores one string per plural form of the target
//! language. The rule maps a count to the index of the form to display.

/// Plural rule of a target language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PluralRule {
    /// 1 = singular, everything else = plural (English, German, Spanish)
    #[default]
    OneOther,
    /// 0 and 1 = singular, everything else = plural (French, Brazilian Portuguese)
    ZeroOneOther,
    /// A single form for every count (Chinese, Japanese, Korean)
    Invariant,
}

impl PluralRule {
    /// Rule for a language code such as `fr`, `fr_FR` or `pt-BR`
    pub fn for_language(code: &str) -> Self {
        let normalized = code.replace('_', "-").to_ascii_lowercase();
        let language = normalized.split('-').next().unwrap_or_default();

        match language {
            "fr" => Self::ZeroOneOther,
            "pt" if normalized.starts_with("pt-br") => Self::ZeroOneOther,
            "zh" | "ja" | "ko" | "vi" | "th" | "id" => Self::Invariant,
            _ => Self::OneOther,
        }
    }

    /// Index of the plural form to use for `count`
    pub const fn form_index(self, count: i64) -> usize {
        let n = count.unsigned_abs();
        match self {
            Self::OneOther => {
                if n == 1 {
                    0
                } else {
                    1
                }
            }
            Self::ZeroOneOther => {
                if n <= 1 {
                    0
                } else {
                    1
                }
            }
            Self::Invariant => 0,
        }
    }

    /// Number of plural forms the language distinguishes
    pub const fn form_count(self) -> usize {
        match self {
            Self::OneOther | Self::ZeroOneOther => 2,
            Self::Invariant => 1,
        }
    }
}

/// Pick the form for `count` from `forms`, clamping to the last form.
///
/// Returns `None` when there are no forms or the chosen one is empty.
pub fn select_form(forms: &[String], rule: PluralRule, count: i64) -> Option<&str> {
    let last = forms.len().checked_sub(1)?;
    let form = &forms[rule.form_index(count).min(last)];
    (!form.is_empty()).then_some(form.as_str())
}

/// Replace the `%n` and `%Ln` placeholders with `count`
pub fn substitute_count(text: &str, count: i64) -> String {
    let count = count.to_string();
    text.replace("%Ln", &count).replace("%n", &count)
}
