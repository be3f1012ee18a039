//! Job title normalization

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static DEFAULT_NORMALIZER: LazyLock<TitleNormalizer> = LazyLock::new(TitleNormalizer::new);

/// Strips decorative annotations from job titles.
///
/// Bracket patterns are greedy and non-nested: a title with two `(...)`
/// groups loses everything from the first `(` to the last `)`.
pub struct TitleNormalizer {
    bracket_regexes: Vec<Regex>,
    marker_regex: Regex,
}

impl Default for TitleNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleNormalizer {
    pub fn new() -> Self {
        let bracket_regexes = [r"【.*】", r"\[.*\]", r"「.*」", r"\(.*\)", r"<.*>"]
            .iter()
            .map(|pattern| Regex::new(pattern).expect("Invalid bracket regex"))
            .collect();

        let marker_regex = Regex::new(r"(?s)[※@◎].*$").expect("Invalid marker regex");

        Self {
            bracket_regexes,
            marker_regex,
        }
    }

    /// NFKC-normalize, drop bracketed spans and trailing annotations, then lowercase
    pub fn normalize(&self, raw: &str) -> String {
        let mut title: String = raw.nfkc().collect();

        for regex in &self.bracket_regexes {
            title = regex.replace_all(&title, "").into_owned();
        }

        title = self.marker_regex.replace(&title, "").into_owned();

        title.to_lowercase()
    }
}

/// Normalize a title with the shared default normalizer
pub fn normalize_title(raw: &str) -> String {
    DEFAULT_NORMALIZER.normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_bracket_style_removed() {
        for title in [
            "Senior 【Engineer】 Role",
            "Senior [Engineer] Role",
            "Senior 「Engineer」 Role",
            "Senior (Engineer) Role",
            "Senior <Engineer> Role",
        ] {
            assert_eq!(normalize_title(title), "senior  role", "title: {}", title);
        }
    }

    #[test]
    fn test_marker_truncates_rest_of_title() {
        assert_eq!(normalize_title("Manager @ apply-now.example.com"), "manager ");
        assert_eq!(normalize_title("エンジニア※未経験歓迎"), "エンジニア");
        assert_eq!(normalize_title("営業◎土日休み@東京"), "営業");
    }

    #[test]
    fn test_marker_truncation_crosses_newlines() {
        assert_eq!(normalize_title("Designer ※ note\nmore notes"), "designer ");
    }

    #[test]
    fn test_full_width_characters_folded_before_matching() {
        // Full-width parentheses and at-sign only match after NFKC
        assert_eq!(normalize_title("ＰＭ（急募）リーダー"), "pmリーダー");
        assert_eq!(normalize_title("Ｗｅｂエンジニア＠渋谷"), "webエンジニア");
        assert_eq!(normalize_title("ｴﾝｼﾞﾆｱ"), "エンジニア");
    }

    #[test]
    fn test_repeated_brackets_removed_greedily() {
        assert_eq!(normalize_title("A (x) B (y) C"), "a  c");
        assert_eq!(normalize_title("【急募】Rust【リモート可】エンジニア"), "エンジニア");
    }

    #[test]
    fn test_unbalanced_brackets_left_alone() {
        assert_eq!(normalize_title("Backend (Go"), "backend (go");
        assert_eq!(normalize_title("Backend ] Go ["), "backend ] go [");
    }

    #[test]
    fn test_empty_and_fully_decorative_titles() {
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title("【急募】"), "");
        assert_eq!(normalize_title("@everything"), "");
    }

    #[test]
    fn test_idempotent_without_brackets() {
        for title in ["Senior Role", "ＳＥ募集", "データ サイエンティスト", "MANAGER"] {
            let once = normalize_title(title);
            assert_eq!(normalize_title(&once), once);
        }
    }
}
