//! Job posting to training document conversion

use crate::error::Result;
use crate::processing::document::{JobPosting, TrainingDocument};
use crate::processing::extractor::NounExtractor;
use crate::processing::normalizer::TitleNormalizer;
use crate::processing::tagger::Tagger;

pub struct DocumentConverter<T> {
    normalizer: TitleNormalizer,
    extractor: NounExtractor<T>,
}

impl<T: Tagger> DocumentConverter<T> {
    pub fn new(extractor: NounExtractor<T>) -> Self {
        Self {
            normalizer: TitleNormalizer::new(),
            extractor,
        }
    }

    pub fn extractor(&self) -> &NounExtractor<T> {
        &self.extractor
    }

    /// The normalized title is a single token even when it contains spaces or is empty
    pub fn convert(&self, job: &JobPosting) -> Result<TrainingDocument> {
        let mut title_and_requirements = vec![self.normalizer.normalize(&job.job_title)];
        title_and_requirements.extend(self.extractor.extract_nouns(&job.requirements)?);

        let summary = self.extractor.extract_nouns(&job.summary)?;

        Ok(TrainingDocument {
            title_and_requirements,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaggerConfig;

    /// Treats each whitespace-separated `pos/word` pair as one record
    struct SlashTagger;

    impl Tagger for SlashTagger {
        fn tag(&self, text: &str) -> Result<String> {
            let mut out = String::new();
            for pair in text.split_whitespace() {
                let (pos, word) = pair.split_once('/').unwrap_or(("unknown", pair));
                out.push_str(&format!("{},{}\t", pos, word));
            }
            out.push_str("EOS\n");
            Ok(out)
        }
    }

    fn converter() -> DocumentConverter<SlashTagger> {
        DocumentConverter::new(NounExtractor::new(SlashTagger, &TaggerConfig::default()).with_noun_tag("noun"))
    }

    #[test]
    fn test_convert_builds_two_lists() {
        let job = JobPosting::new(
            "【急募】Backend Engineer",
            "noun/Rust particle/and noun/PostgreSQL",
            "verb/build noun/API noun/API",
        );

        let document = converter().convert(&job).unwrap();

        assert_eq!(document.title_and_requirements, vec!["backend engineer", "rust", "postgresql"]);
        assert_eq!(document.summary, vec!["api", "api"]);
        assert_eq!(document.token_count(), 5);
    }

    #[test]
    fn test_title_is_always_first_token() {
        let converter = converter();
        let job = JobPosting::new("(全部装飾)", "noun/Go noun/Docker verb/run", "");

        let document = converter.convert(&job).unwrap();
        let requirement_nouns = converter.extractor().extract_nouns(&job.requirements).unwrap();

        assert_eq!(document.title_and_requirements.len(), 1 + requirement_nouns.len());
        assert_eq!(document.title_and_requirements[0], "");
        assert_eq!(document.summary, converter.extractor().extract_nouns(&job.summary).unwrap());
    }

    #[test]
    fn test_empty_posting() {
        let document = converter().convert(&JobPosting::default()).unwrap();
        let [first, second] = document.into_sentences();

        assert_eq!(first, vec![String::new()]);
        assert!(second.is_empty());
    }
}
