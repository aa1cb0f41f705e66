//! File reference extraction from the substituted command line.
//!
//! The command line is re-split into whitespace separated words, each word is
//! classified into a tagged shape, and every candidate path that names an
//! existing regular file becomes a File Reference. Order is preserved and
//! duplicates are kept so each occurrence is templated.

use std::path::{Path, PathBuf};

use log::debug;

/// One whitespace-separated word of the command line.
#[derive(Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// An option-style word starting with `-`; paths may hide after `=`.
    Flag(&'a str),
    /// Any other word; the word itself is the candidate path.
    Bare(&'a str),
}

impl<'a> Token<'a> {
    fn classify(word: &'a str) -> Self {
        if word.starts_with('-') {
            Token::Flag(word)
        } else {
            Token::Bare(word)
        }
    }

    /// Candidate paths carried by this word.
    ///
    /// A flag word yields the suffix after each `=` (so `--opt=a=b` yields
    /// `a=b` and `b`); a bare word yields itself.
    pub fn candidate_paths(&self) -> Vec<&'a str> {
        match self {
            Token::Bare(word) => vec![word],
            Token::Flag(word) => word
                .char_indices()
                .filter(|(_, c)| *c == '=')
                .map(|(i, _)| &word[i + 1..])
                .collect(),
        }
    }
}

/// Splits the substituted command line into classified words.
pub fn tokenize(command_line: &str) -> Vec<Token<'_>> {
    command_line.split_whitespace().map(Token::classify).collect()
}

/// Extracts the ordered File Reference list from the command line.
///
/// A candidate is kept only when it names an existing regular file at
/// extraction time.
pub fn extract_file_references(command_line: &str) -> Vec<PathBuf> {
    let mut references = Vec::new();

    for token in tokenize(command_line) {
        for candidate in token.candidate_paths() {
            let path = Path::new(candidate);
            if path.is_file() {
                debug!("Found file reference `{candidate}`");
                references.push(path.to_path_buf());
            }
        }
    }

    references
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_tokenize_classification() {
        let tokens = tokenize("kubectl apply -f=spec.yml --dry-run");
        assert_eq!(
            tokens,
            vec![
                Token::Bare("kubectl"),
                Token::Bare("apply"),
                Token::Flag("-f=spec.yml"),
                Token::Flag("--dry-run"),
            ]
        );
    }

    #[test]
    fn test_flag_candidates_one_per_equals() {
        let token = Token::Flag("--opt=a=b");
        assert_eq!(token.candidate_paths(), vec!["a=b", "b"]);
    }

    #[test]
    fn test_flag_without_equals_has_no_candidates() {
        let token = Token::Flag("--verbose");
        assert!(token.candidate_paths().is_empty());
    }

    #[test]
    fn test_bare_word_is_its_own_candidate() {
        let token = Token::Bare("config.yml");
        assert_eq!(token.candidate_paths(), vec!["config.yml"]);
    }

    #[test]
    fn test_extract_existing_bare_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "content").unwrap();
        let path = file.path().to_str().unwrap();

        let references = extract_file_references(&format!("cat {path} missing.txt"));
        assert_eq!(references, vec![file.path().to_path_buf()]);
    }

    #[test]
    fn test_extract_flag_value_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "content").unwrap();
        let path = file.path().to_str().unwrap();

        let references = extract_file_references(&format!("deploy --manifest={path}"));
        assert_eq!(references, vec![file.path().to_path_buf()]);
    }

    #[test]
    fn test_extract_keeps_duplicates_in_order() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "content").unwrap();
        let path = file.path().to_str().unwrap();

        let references = extract_file_references(&format!("diff {path} {path}"));
        assert_eq!(references.len(), 2);
    }

    #[test]
    fn test_extract_skips_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().to_str().unwrap();

        let references = extract_file_references(&format!("ls {path}"));
        assert!(references.is_empty());
    }
}
