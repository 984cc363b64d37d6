use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Lowercased tokens that never contribute to a title.
pub const IGNORED_TOKENS: &[&str] = &[
    "webrip", "x264", "bluray", "720p", "1080p", "yify", "brrip",
];

/// Titles the token scan is known to mangle, paired with what they should read.
pub const TITLE_CORRECTIONS: &[(&str, &str)] = &[
    ("7 5 0 0", "7500"),
    ("2 0 1 2", "2012"),
    ("Wonder Woman 1_9_8_4", "Wonder Woman 1984"),
    ("G I  Joe Retaliation", "G.I. Joe: Retaliation"),
    ("G I  Joe Rise of Cobra", "G.I. Joe: The Rise of Cobra"),
];

lazy_static::lazy_static! {
    static ref DOTTED_PARENTHETICAL: Regex = Regex::new(r"\.\([^)]*\)\.").unwrap();
    static ref PARENTHETICAL: Regex = Regex::new(r"\([^)]*\)").unwrap();
    static ref YEAR: Regex = Regex::new(r"19[0-9]{2}|20[0-9]{2}").unwrap();
    static ref RESOLUTION: Regex = Regex::new(r"[0-9]{3,4}p").unwrap();
    static ref CODEC: Regex = Regex::new(r"x264|x265|XviD|DivX").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    X264,
    X265,
    XviD,
    DivX,
}

impl Codec {
    pub fn as_str(&self) -> &'static str {
        match self {
            Codec::X264 => "x264",
            Codec::X265 => "x265",
            Codec::XviD => "XviD",
            Codec::DivX => "DivX",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Codec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x264" => Ok(Codec::X264),
            "x265" => Ok(Codec::X265),
            "XviD" => Ok(Codec::XviD),
            "DivX" => Ok(Codec::DivX),
            other => Err(format!("unknown codec '{}'", other)),
        }
    }
}

/// Metadata recovered from a release-style filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    pub title: String,
    pub year: Option<u16>,
    pub resolution: Option<String>,
    pub codec: Option<Codec>,
}

/// Parse a filename such as `Duck.Duck.Goose.2018.720p.BluRay.x264-[YTS.AM].mp4`.
///
/// Title extraction works on the parenthesis-stripped tokens; year, resolution
/// and codec are searched independently in the dot-joined stem. Never fails:
/// anything that cannot be found comes back as `None`.
pub fn parse(filename: &str) -> ParsedFilename {
    let stem = strip_extension(filename);
    let search_text = dot_joined(stem);

    ParsedFilename {
        title: title_from_stem(stem),
        year: extract_year(&search_text),
        resolution: extract_resolution(&search_text),
        codec: extract_codec(&search_text),
    }
}

/// Title only, as stored alongside each discovered file path.
pub fn title(filename: &str) -> String {
    title_from_stem(strip_extension(filename))
}

/// Replace a raw title with its known correction, if one exists.
pub fn correct_title(raw: &str) -> Option<&'static str> {
    TITLE_CORRECTIONS
        .iter()
        .find(|(bad, _)| *bad == raw)
        .map(|(_, fixed)| *fixed)
}

pub fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => filename,
    }
}

pub fn remove_parentheticals(stem: &str) -> String {
    let collapsed = DOTTED_PARENTHETICAL.replace_all(stem, ".");
    PARENTHETICAL.replace_all(&collapsed, "").into_owned()
}

pub fn tokenize(stem: &str) -> Vec<&str> {
    stem.split(|c: char| c == '.' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect()
}

fn title_from_stem(stem: &str) -> String {
    let cleaned = remove_parentheticals(stem);

    let mut words: Vec<&str> = Vec::new();
    for token in tokenize(&cleaned) {
        if is_year_marker(token) {
            break;
        }
        if IGNORED_TOKENS.contains(&token.to_lowercase().as_str()) {
            continue;
        }
        words.push(token);
    }

    let raw = words.join(" ");
    match correct_title(&raw) {
        Some(fixed) => fixed.to_string(),
        None => raw,
    }
}

fn is_year_marker(token: &str) -> bool {
    token.chars().count() == 4 && token.chars().all(char::is_numeric)
}

fn dot_joined(stem: &str) -> String {
    tokenize(stem).join(".")
}

fn extract_year(text: &str) -> Option<u16> {
    YEAR.find(text).and_then(|m| m.as_str().parse().ok())
}

fn extract_resolution(text: &str) -> Option<String> {
    RESOLUTION.find(text).map(|m| m.as_str().to_string())
}

fn extract_codec(text: &str) -> Option<Codec> {
    CODEC.find(text).and_then(|m| m.as_str().parse().ok())
}
