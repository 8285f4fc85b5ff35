//! Text encoding resolution for raw source files.
//!
//! One detection pass over a fixed-size prefix produces a guess; the
//! guess is discarded unless it lands in a small whitelist. Decoding then
//! tries `[guess] + [utf-8, latin-1, iso-8859-1]` (deduplicated) in order
//! and keeps the first encoding under which the whole file decodes
//! without malformed sequences.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

use crate::error::{IngestError, Result};

/// Prefix size sampled by the detection pass.
pub const SNIFF_LEN: usize = 50_000;

/// Fallback candidates, tried after the detection guess.
const FALLBACK_LABELS: [&str; 3] = ["utf-8", "latin1", "iso-8859-1"];

fn open_for_read(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Guess the file's encoding from its first [`SNIFF_LEN`] bytes.
///
/// Returns `None` when the detection result is not in the whitelist
/// (for example a UTF-16 BOM); the caller then falls back to the fixed
/// candidate list alone.
pub fn detect_encoding(path: &Path) -> Result<Option<&'static Encoding>> {
    let mut file = open_for_read(path)?;
    let mut buffer = vec![0u8; SNIFF_LEN];
    let mut filled = 0usize;
    loop {
        let n = file
            .read(&mut buffer[filled..])
            .map_err(|e| IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        if n == 0 {
            break;
        }
        filled += n;
        if filled == buffer.len() {
            break;
        }
    }
    Ok(sniff(&buffer[..filled]))
}

fn sniff(prefix: &[u8]) -> Option<&'static Encoding> {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(prefix) {
        // UTF-16 BOMs fall outside the whitelist and are discarded.
        if encoding == UTF_8 {
            return Some(UTF_8);
        }
        return None;
    }
    if is_prefix_utf8(prefix) {
        Some(UTF_8)
    } else {
        Encoding::for_label(b"latin1")
    }
}

/// Valid UTF-8, allowing one multi-byte sequence truncated by the sample
/// boundary.
fn is_prefix_utf8(prefix: &[u8]) -> bool {
    match std::str::from_utf8(prefix) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none() && e.valid_up_to() + 4 > prefix.len(),
    }
}

/// Candidate ordering: valid guess first, then the fallback list,
/// deduplicated by resolved encoding.
pub fn candidate_encodings(guess: Option<&'static Encoding>) -> Vec<&'static Encoding> {
    let mut candidates: Vec<&'static Encoding> = Vec::new();
    if let Some(encoding) = guess {
        candidates.push(encoding);
    }
    for label in FALLBACK_LABELS {
        if let Some(encoding) = Encoding::for_label(label.as_bytes())
            && !candidates.contains(&encoding)
        {
            candidates.push(encoding);
        }
    }
    candidates
}

/// Decode the whole file, trying candidates in order.
///
/// A candidate fails when the decoder reports any malformed sequence;
/// failed attempts are logged and the next candidate is tried. When no
/// candidate succeeds the ingest fails with [`IngestError::Undecodable`].
pub fn decode_file(path: &Path) -> Result<(String, &'static Encoding)> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let guess = detect_encoding(path)?;
    let candidates = candidate_encodings(guess);
    for &encoding in &candidates {
        // Pins the candidate: a BOM may be stripped but never switches
        // the decode to an encoding outside the candidate list.
        let (text, had_errors) = encoding.decode_with_bom_removal(&bytes);
        if had_errors {
            tracing::debug!(
                path = %path.display(),
                encoding = encoding.name(),
                "decode attempt produced malformed sequences, trying next candidate"
            );
            continue;
        }
        tracing::info!(path = %path.display(), encoding = encoding.name(), "resolved file encoding");
        return Ok((text.into_owned(), encoding));
    }
    let tried = candidates
        .iter()
        .map(|e| e.name())
        .collect::<Vec<_>>()
        .join(", ");
    Err(IngestError::Undecodable {
        path: path.to_path_buf(),
        tried,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniff_prefers_utf8_for_ascii() {
        assert_eq!(sniff(b"id;name\n1;alpha\n"), Some(UTF_8));
    }

    #[test]
    fn sniff_falls_back_to_latin1_for_high_bytes() {
        // 0xE7 0xE3 is "çã" in Latin-1 but invalid UTF-8.
        let guess = sniff(b"regi\xE3o;valor\n");
        assert_eq!(guess, Encoding::for_label(b"latin1"));
    }

    #[test]
    fn sniff_discards_utf16_bom() {
        assert_eq!(sniff(b"\xFF\xFEa\x00b\x00"), None);
    }

    #[test]
    fn every_fallback_label_resolves_to_an_encoding() {
        for label in FALLBACK_LABELS {
            assert!(
                Encoding::for_label(label.as_bytes()).is_some(),
                "{label} is not a recognized encoding label"
            );
        }
    }

    #[test]
    fn candidates_are_deduplicated_guess_first() {
        let latin1 = Encoding::for_label(b"latin1").unwrap();
        let candidates = candidate_encodings(Some(latin1));
        // latin1 and iso-8859-1 resolve to the same encoding.
        assert_eq!(candidates, vec![latin1, UTF_8]);

        let candidates = candidate_encodings(None);
        assert_eq!(candidates, vec![UTF_8, latin1]);
    }
}
