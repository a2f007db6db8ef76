// ============================================================
// Layer 4 — Caption Tokenizer
// ============================================================
// Breaks a caption into lower-case words and punctuation.
// Downstream models were trained on exactly these tokens, so
// the rules below are a compatibility contract:
//
//   1. Trim the caption.
//   2. Split into maximal runs of word characters (Unicode
//      letters and digits, '_') and maximal runs of everything
//      else. Whitespace belongs to the second class, so it
//      only separates runs at their edges: each run is trimmed
//      and dropped if nothing is left. Lower-case every run.
//   3. A run made only of ASCII punctuation is exploded into
//      one token per character ("!?" → "!", "?"), unless it
//      is made only of '.' ("..", "..." stay whole). A run
//      with inner whitespace ("! ?") is kept as one token.
//   4. A final "." token is dropped once. The sentence end is
//      supplied by the data loader of the training system.
//
// Examples:
//   "A dog runs!"  → a dog runs !
//   "Hello, world." → hello , world
//   "a dog. ."     → a dog ". ."
//   "dog! ?"       → dog "! ?"
//   "Wait..."      → wait ...

/// Tokenize one caption. Returns an empty Vec for captions
/// without words (the encoder rejects those).
pub fn split_sentence(sentence: &str) -> Vec<String> {
    let mut tokens = Vec::new();

    for fragment in fragments(sentence.trim()) {
        let fragment = fragment.to_lowercase();

        if is_explodable_punctuation(&fragment) {
            tokens.extend(fragment.chars().map(String::from));
        } else {
            tokens.push(fragment);
        }
    }

    if tokens.last().map(String::as_str) == Some(".") {
        tokens.pop();
    }

    tokens
}

/// Word characters of the Unicode `\w` regex class.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Maximal runs of word / non-word characters, trimmed, empty
/// ones left out.
fn fragments(text: &str) -> Vec<&str> {
    let mut out   = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        let word = is_word_char(c);
        let boundary = match chars.peek() {
            Some(&(_, next)) => is_word_char(next) != word,
            None             => true,
        };
        if boundary {
            let end = chars.peek().map_or(text.len(), |&(i, _)| i);
            let fragment = text[start..end].trim();
            if !fragment.is_empty() {
                out.push(fragment);
            }
            start = end;
        }
    }

    out
}

/// Punctuation-only fragment that is not a run of full stops.
fn is_explodable_punctuation(fragment: &str) -> bool {
    !fragment.is_empty()
        && fragment.chars().all(|c| c.is_ascii_punctuation())
        && !fragment.chars().all(|c| c == '.')
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        split_sentence(s)
    }

    #[test]
    fn test_basic_caption() {
        assert_eq!(toks("A dog runs!"), vec!["a", "dog", "runs", "!"]);
    }

    #[test]
    fn test_trailing_full_stop_dropped() {
        assert_eq!(toks("  A man riding a moped. "), vec!["a", "man", "riding", "a", "moped"]);
    }

    #[test]
    fn test_inner_punctuation_kept() {
        assert_eq!(toks("Hello, world."), vec!["hello", ",", "world"]);
        assert_eq!(toks("x (y) z"), vec!["x", "(", "y", ")", "z"]);
    }

    #[test]
    fn test_punctuation_run_explodes() {
        assert_eq!(toks("what?!"), vec!["what", "?", "!"]);
        assert_eq!(toks("a -- b"), vec!["a", "-", "-", "b"]);
        assert_eq!(toks("1st-place"), vec!["1st", "-", "place"]);
    }

    #[test]
    fn test_spaced_punctuation_run_stays_whole() {
        assert_eq!(toks("dog! ?"), vec!["dog", "! ?"]);
        assert_eq!(toks("a , . b"), vec!["a", ", .", "b"]);
    }

    #[test]
    fn test_dot_runs_stay_whole() {
        assert_eq!(toks("Wait..."), vec!["wait", "..."]);
        assert_eq!(toks("a .. b"), vec!["a", "..", "b"]);
        assert_eq!(toks("a dog..."), vec!["a", "dog", "..."]);
    }

    #[test]
    fn test_only_one_trailing_dot_removed() {
        assert_eq!(toks("a dog. ."), vec!["a", "dog", ". ."]);
    }

    #[test]
    fn test_mixed_dot_run_explodes_then_last_dot_dropped() {
        // ".!." is not only dots → ".", "!", "." → final "." dropped
        assert_eq!(toks("odd.!."), vec!["odd", ".", "!"]);
    }

    #[test]
    fn test_underscore_and_digits_are_word_chars() {
        assert_eq!(toks("snake_case 42nd"), vec!["snake_case", "42nd"]);
    }

    #[test]
    fn test_apostrophe_splits_word() {
        assert_eq!(toks("Don't"), vec!["don", "'", "t"]);
    }

    #[test]
    fn test_unicode_letters_are_word_chars() {
        assert_eq!(toks("café!"), vec!["café", "!"]);
        assert_eq!(toks("café !"), vec!["café", "!"]);
        assert_eq!(toks("CAFÉ"), vec!["café"]);
    }

    #[test]
    fn test_empty_and_dot_only_captions() {
        assert!(toks("").is_empty());
        assert!(toks("   ").is_empty());
        assert!(toks(".").is_empty());
    }

    #[test]
    fn test_deterministic_and_idempotent() {
        // Re-joining with spaces merges adjacent punctuation tokens,
        // so only captions without such neighbours round-trip.
        let captions = [
            "A dog runs!",
            "Two people, one umbrella",
            "Wait... what - is THIS",
            "snake_case & café",
            "a dog. .",
            "dog! ?",
        ];
        for caption in captions {
            let first = toks(caption);
            assert_eq!(first, toks(caption));
            assert_eq!(toks(&first.join(" ")), first, "caption: {caption}");
        }
    }

    #[test]
    fn test_exploded_neighbours_merge_when_rejoined() {
        let first = toks("what?!");
        assert_eq!(toks(&first.join(" ")), vec!["what", "? !"]);
    }
}
