/// Trailing words that end with a period without ending a sentence.
/// Compared lowercase, final period stripped.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "inc", "corp", "ltd", "co", "jr", "sr", "st", "vs",
    "e.g", "i.e", "u.s", "u.k", "approx", "etc",
];

/// Split a paragraph into sentences.
///
/// A boundary is a `.`, `!` or `?` (plus any closing quotes or brackets)
/// followed by whitespace or end of text. A period does not close a
/// sentence after a known abbreviation or a single-letter initial, so
/// "Mr. Smith" and "J. Doe" stay intact. Decimal numbers never split
/// because the period is not followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        if c == '.' || c == '!' || c == '?' {
            // Absorb closing quotes/brackets into the sentence
            let mut end = i + 1;
            while end < chars.len() && matches!(chars[end], '"' | '\'' | '”' | '’' | ')' | ']') {
                end += 1;
            }

            let at_text_end = end >= chars.len();
            let before_whitespace = !at_text_end && chars[end].is_whitespace();

            if (at_text_end || before_whitespace) && !(c == '.' && is_abbreviation(&chars[..i])) {
                let sentence: String = chars[start..end].iter().collect();
                let sentence = sentence.trim();
                if !sentence.is_empty() {
                    sentences.push(sentence.to_string());
                }
                start = end;
            }
            i = end;
        } else {
            i += 1;
        }
    }

    let tail: String = chars[start.min(chars.len())..].iter().collect();
    let tail = tail.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

/// Whether the word ending right before a period is an abbreviation or a
/// single-letter initial
fn is_abbreviation(before: &[char]) -> bool {
    let mut word: Vec<char> = Vec::new();
    for &c in before.iter().rev() {
        if c.is_alphabetic() || c == '.' {
            word.push(c);
        } else {
            break;
        }
    }
    if word.is_empty() {
        return false;
    }
    word.reverse();
    let word: String = word.iter().collect();
    let word = word.trim_end_matches('.').to_lowercase();

    if word.chars().count() == 1 {
        return true;
    }
    ABBREVIATIONS.contains(&word.as_str())
}
