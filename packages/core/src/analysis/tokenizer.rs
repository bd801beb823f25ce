//! Title tokenizer for the word cloud

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// English stopwords removed before counting
pub const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few",
    "for", "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't",
    "having", "he", "he'd", "he'll", "he's", "hence", "her", "here", "here's", "hers", "herself",
    "him", "himself", "his", "how", "how's", "however", "http", "i", "i'd", "i'll", "i'm",
    "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "k",
    "let's", "like", "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of",
    "off", "on", "once", "only", "or", "other", "otherwise", "ought", "our", "ours",
    "ourselves", "out", "over", "own", "r", "same", "shall", "shan't", "she", "she'd",
    "she'll", "she's", "should", "shouldn't", "since", "so", "some", "such", "than", "that",
    "that's", "the", "their", "theirs", "them", "themselves", "then", "there", "there's",
    "therefore", "these", "they", "they'd", "they'll", "they're", "they've", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "wasn't", "we", "we'd",
    "we'll", "we're", "we've", "were", "weren't", "what", "what's", "when", "when's", "where",
    "where's", "which", "while", "who", "who's", "whom", "why", "why's", "with", "won't",
    "would", "wouldn't", "www", "you", "you'd", "you'll", "you're", "you've", "your", "yours",
    "yourself", "yourselves",
];

fn default_stopwords() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORDS.iter().copied().collect())
}

/// Tokenize titles with the default stopword set
pub fn tokenize<S: AsRef<str>>(titles: &[S]) -> Vec<String> {
    tokenize_with(titles, default_stopwords())
}

/// Lower-case and split all titles on whitespace, drop stopwords and words
/// of two characters or fewer, then strip every non-ASCII-letter.
///
/// Stripping runs after filtering, so a token such as `"!!!"` survives as an
/// empty string.
pub fn tokenize_with<S: AsRef<str>>(titles: &[S], stopwords: &HashSet<&str>) -> Vec<String> {
    let joined = titles
        .iter()
        .map(|title| title.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    joined
        .split_whitespace()
        .filter(|word| !stopwords.contains(word) && word.chars().count() > 2)
        .map(|word| word.chars().filter(char::is_ascii_alphabetic).collect())
        .collect()
}

/// Count occurrences of each token, verbatim
pub fn word_frequencies(words: &[String]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for word in words {
        *counts.entry(word.clone()).or_insert(0) += 1;
    }
    counts
}

/// The `n` most frequent non-empty words, most frequent first, ties alphabetical
pub fn top_words(frequencies: &HashMap<String, usize>, n: usize) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = frequencies
        .iter()
        .filter(|(word, _)| !word.is_empty())
        .map(|(word, count)| (word.clone(), *count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(n);
    entries
}
