//! Canonical forms for DOI, arXiv, ISBN, and URL strings

use chrono::Datelike;
use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::validators::{validate_isbn10, validate_isbn13};

lazy_static! {
    static ref DOI_SHAPE: Regex = Regex::new(r"^10\.\d{4,}/\S+$").unwrap();

    // YYMM.NNNNN with optional version, from bare ids, arxiv: prefixes,
    // or arxiv.org/abs|pdf/ URLs
    static ref ARXIV_ID: Regex = Regex::new(
        r"(?i)(?:arxiv[:\s]*)?(?:https?://(?:www\.)?arxiv\.org/(?:abs|pdf)/)?(?P<yy>\d{2})(?P<mm>\d{2})\.(?P<num>\d{4,5})(?P<version>v\d+)?"
    )
    .unwrap();

    static ref AMAZON_ASIN: Regex =
        Regex::new(r"(?:/dp/|/gp/product/)(?P<asin>[a-z0-9]{10})").unwrap();

    // Pre-2007 archive/NNNNNNN ids, e.g. cond-mat/9901001
    static ref ARXIV_OLD_ID: Regex = Regex::new(
        r"(?i)(?:arxiv[:\s]*)?(?:https?://(?:www\.)?arxiv\.org/(?:abs|pdf)/)?(?P<id>[a-z-]+(?:\.[a-z-]+)?/\d{7})(?:v\d+)?"
    )
    .unwrap();
}

/// Normalize a DOI into its canonical lowercase `10.xxxx/suffix` form.
///
/// Strips resolver prefixes, query/fragment, and trailing punctuation left
/// over from text extraction. Returns `None` when the registrant digit run
/// is shorter than 4 digits or parentheses are unbalanced (a malformed
/// extraction, not a real DOI).
pub fn normalize_doi(input: &str) -> Option<String> {
    let mut doi = input.trim().to_string();

    let prefixes = [
        "https://doi.org/",
        "http://doi.org/",
        "https://dx.doi.org/",
        "http://dx.doi.org/",
        "doi.org/",
        "dx.doi.org/",
        "doi:",
    ];
    let lowered = doi.to_lowercase();
    for prefix in prefixes {
        if lowered.starts_with(prefix) {
            doi = doi[prefix.len()..].to_string();
            break;
        }
    }

    // Query and fragment are resolver artifacts
    if let Some(pos) = doi.find(['?', '#']) {
        doi.truncate(pos);
    }

    // Trailing punctuation captured from surrounding prose; closing
    // parens/brackets are stripped only while they are unbalanced
    loop {
        match doi.chars().last() {
            Some('.') | Some(',') | Some(';') | Some(':') => {
                doi.pop();
            }
            Some(')') if paren_excess(&doi, '(', ')') > 0 => {
                doi.pop();
            }
            Some(']') if paren_excess(&doi, '[', ']') > 0 => {
                doi.pop();
            }
            _ => break,
        }
    }

    let doi = doi.to_lowercase();

    if !DOI_SHAPE.is_match(&doi) {
        return None;
    }
    if paren_excess(&doi, '(', ')') != 0 || paren_excess(&doi, '[', ']') != 0 {
        return None;
    }

    Some(doi)
}

/// Count of closers minus openers
fn paren_excess(s: &str, open: char, close: char) -> i32 {
    let mut excess = 0i32;
    for c in s.chars() {
        if c == close {
            excess += 1;
        } else if c == open {
            excess -= 1;
        }
    }
    excess
}

/// Normalize a new-format arXiv id (`YYMM.NNNNN`) from a bare id, an
/// `arxiv:` prefix, or an `arxiv.org/abs|pdf/` URL.
///
/// The version suffix is stripped so that `1706.03762v5` and `1706.03762`
/// compare equal. Ids whose year/month component falls outside the valid
/// window (2007-04 through next calendar year) are rejected as false
/// extractions.
pub fn normalize_arxiv_id(input: &str) -> Option<String> {
    let caps = ARXIV_ID.captures(input.trim())?;
    let yy: u32 = caps.name("yy")?.as_str().parse().ok()?;
    let mm: u32 = caps.name("mm")?.as_str().parse().ok()?;
    let num = caps.name("num")?.as_str();

    if !(1..=12).contains(&mm) {
        return None;
    }
    let year = 2000 + yy as i32;
    let max_year = chrono::Utc::now().year() + 1;
    if year < 2007 || year > max_year {
        return None;
    }
    if year == 2007 && mm < 4 {
        return None;
    }

    Some(format!("{:02}{:02}.{}", yy, mm, num))
}

/// Canonical lookup key for any arXiv id.
///
/// New-format ids go through `normalize_arxiv_id`; old-style
/// `archive/NNNNNNN` ids are lower-cased with the version suffix stripped.
/// Index insertion and lookup both use this so the two sides agree.
pub fn canonical_arxiv_id(input: &str) -> Option<String> {
    if let Some(id) = normalize_arxiv_id(input) {
        return Some(id);
    }
    let caps = ARXIV_OLD_ID.captures(input.trim())?;
    Some(caps["id"].to_lowercase())
}

/// Normalize an ISBN by stripping separators; accepts 10- and 13-digit
/// forms with a valid checksum.
pub fn normalize_isbn(input: &str) -> Option<String> {
    let isbn: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .collect::<String>()
        .to_uppercase();

    match isbn.len() {
        10 if validate_isbn10(&isbn) => Some(isbn),
        13 if validate_isbn13(&isbn) => Some(isbn),
        _ => None,
    }
}

/// Normalize a URL for exact-match indexing.
///
/// Removes scheme and `www.`, strips query/fragment and trailing slash,
/// lower-cases host and path. Amazon product URLs collapse to
/// `amazon.com/dp/<asin>` and arXiv URLs collapse to `arxiv.org/abs/<id>`
/// so that storefront/mirror variants of the same resource compare equal.
pub fn normalize_url(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&with_scheme).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    let path = parsed.path().to_lowercase();
    let path = path.trim_end_matches('/');

    if host.ends_with("arxiv.org") {
        if let Some(id) = normalize_arxiv_id(trimmed) {
            return Some(format!("arxiv.org/abs/{}", id));
        }
    }

    if host == "amazon.com" || host.starts_with("amazon.") || host.contains(".amazon.") {
        if let Some(caps) = AMAZON_ASIN.captures(path) {
            return Some(format!("amazon.com/dp/{}", &caps["asin"]));
        }
    }

    if path.is_empty() {
        Some(host)
    } else {
        Some(format!("{}{}", host, path))
    }
}
