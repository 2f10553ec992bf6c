//! Tokenizer: a lazy stream of lowercased, stemmed tokens pulled from a
//! byte source, skipping `<...>` markup spans.
//!
//! A token begins at the next ASCII alphanumeric byte and runs until the
//! next non-alphanumeric byte or EOF. An angle-bracket span is skipped
//! wholesale the moment `<` is seen while searching for a token start; a
//! second `<` encountered before the matching `>` is not treated specially
//! (no nesting), matching the original tag-skipping behavior exactly.

use std::io::{Bytes, Read};

use rust_stemmers::{Algorithm, Stemmer};

/// Iterator adaptor over `Read` yielding stemmed, lowercased tokens. Ends
/// (`None`) once the underlying stream is exhausted — the idiomatic
/// translation of the "empty string at EOF" sentinel from the original
/// tokenizer contract.
pub struct TokenStream<R: Read> {
    bytes: Bytes<R>,
    stemmer: Stemmer,
}

impl<R: Read> TokenStream<R> {
    pub fn new(inner: R) -> Self {
        Self {
            bytes: inner.bytes(),
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    fn next_byte(&mut self) -> Option<u8> {
        self.bytes.next().and_then(|r| r.ok())
    }

    fn skip_tag(&mut self) {
        while let Some(b) = self.next_byte() {
            if b == b'>' {
                break;
            }
        }
    }
}

impl<R: Read> Iterator for TokenStream<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut token = Vec::new();

        // Find the start of the next token, skipping tags and other
        // non-alphanumeric bytes along the way.
        loop {
            match self.next_byte() {
                None => return None,
                Some(b'<') => self.skip_tag(),
                Some(b) if b.is_ascii_alphanumeric() => {
                    token.push(b);
                    break;
                }
                Some(_) => continue,
            }
        }

        while let Some(b) = self.next_byte() {
            if b.is_ascii_alphanumeric() {
                token.push(b);
            } else {
                break;
            }
        }

        for b in token.iter_mut() {
            *b = b.to_ascii_lowercase();
        }
        // Every byte came from is_ascii_alphanumeric, so this is always
        // valid UTF-8.
        let word = String::from_utf8(token).expect("ascii alphanumeric bytes are valid utf-8");
        Some(self.stemmer.stem(&word).into_owned())
    }
}
