/// Number of whitespace-separated words in `text`.
///
/// Leading and trailing whitespace is ignored, so empty or blank text counts
/// as zero words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::word_count;

    #[test]
    fn blank_text_has_no_words() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  \n\t "), 0);
    }

    #[test]
    fn runs_of_whitespace_separate_single_words() {
        assert_eq!(word_count("  one\ttwo \n\n three  "), 3);
    }
}
