//! Free-text extraction of project details.
//!
//! [`InformationExtractor`] turns one user message into a
//! [`ProjectDetailsDelta`] holding only the fields it newly determined.
//! Type, material and location are looked for only while unknown;
//! dimensions are re-parsed on every message and merged key by key.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::domain::project::{
    find_word, Dimension, Dimensions, Location, ProjectDetails, ProjectDetailsDelta, ProjectType,
    Slot,
};

use super::message::Message;
use super::vocabulary::{is_state_code, number_word_value, MATERIAL_SYNONYMS, US_STATES};

const NUMBER: &str = r"\d+(?:[.,]\d+)?";
const LINEAR_UNIT: &str = r"pies|pie|feet|foot|ft|pulgadas|pulgada|inches|inch|in";
const SUFFIX_DIMENSION_WORD: &str = "longitud|largo|length|long|altura|alto|height|high|tall|\
     anchura|ancho|width|wide|grosor|espesor|profundidad|depth|thick|deep";
const PREFIX_DIMENSION_WORD: &str =
    "longitud|largo|length|altura|alto|height|anchura|ancho|width|grosor|espesor|profundidad|depth";
const SPELLED_DIMENSION_WORD: &str = "longitud|largo|length|long|altura|alto|height|high|tall";

/// "100 pies de largo", "6 ft tall".
static SUFFIX_DIMENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?P<num>{NUMBER})\s*(?:(?P<unit>{LINEAR_UNIT})\b\.?)?\s*(?:de\s+)?\b(?P<dim>{SUFFIX_DIMENSION_WORD})\b"
    ))
    .expect("suffix dimension pattern is valid")
});

/// "largo de 10 pies", "height: 6 ft".
static PREFIX_DIMENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?P<dim>{PREFIX_DIMENSION_WORD})\b\s*(?:de|of|es|is|:|=)?\s*(?P<num>{NUMBER})\s*(?:(?P<unit>{LINEAR_UNIT})\b)?"
    ))
    .expect("prefix dimension pattern is valid")
});

/// "seis pies de alto", "twenty feet long".
static SPELLED_SUFFIX_DIMENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?P<word>[a-záéíóúñ]+)\s+(?:(?P<unit>{LINEAR_UNIT})\s+)?(?:de\s+)?(?P<dim>{SPELLED_DIMENSION_WORD})\b"
    ))
    .expect("spelled suffix pattern is valid")
});

/// "largo de cien pies".
static SPELLED_PREFIX_DIMENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?P<dim>{SPELLED_DIMENSION_WORD})\s+(?:de\s+|of\s+|es\s+|is\s+)?(?P<word>[a-záéíóúñ]+)(?:\s+(?P<unit>{LINEAR_UNIT})\b)?"
    ))
    .expect("spelled prefix pattern is valid")
});

/// "200 pies cuadrados", "350 sq ft".
static AREA_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?P<num>{NUMBER})\s*(?:pies\s+cuadrados|pie\s+cuadrado|square\s+feet|square\s+foot|sq\.?\s*ft|sqft|ft2|ft²|pies2|pies²)"
    ))
    .expect("area suffix pattern is valid")
});

/// "área de 1500".
static AREA_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?:área|area)\s*(?:de|of|es|is|:|=)?\s*(?P<num>{NUMBER})"
    ))
    .expect("area prefix pattern is valid")
});

/// "20x30", "12 por 16 pies", "10 ft by 12 ft".
static RECTANGLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?P<a>{NUMBER})\s*(?P<unit_a>pies|ft|feet|')?\s*(?:x|×|por|by)\s*(?P<b>{NUMBER})\s*(?P<unit_b>pies|pie|feet|foot|ft|')?"
    ))
    .expect("rectangle pattern is valid")
});

/// Unitless pairs with both sides at or under this are lumber sizes
/// ("postes de 4x4", "vigas de 2x6"), not project dimensions.
const MAX_NOMINAL_LUMBER_SIZE: f64 = 12.0;

/// First number in a message, with an optional unit.
static BARE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?P<num>{NUMBER})\s*(?:(?P<unit>{LINEAR_UNIT})\b)?"
    ))
    .expect("bare number pattern is valid")
});

/// "Austin, TX".
static CITY_STATE_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<city>\p{Lu}\p{L}*(?:\s+\p{Lu}\p{L}*)*)\s*,\s*(?P<state>[A-Z]{2})\b")
        .expect("city/state pattern is valid")
});

/// A standalone two-letter state code.
static STATE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?P<state>[A-Z]{2})\b").expect("state code pattern is valid"));

/// City directly before a comma at the end of the text: "Austin, ".
static CITY_BEFORE_COMMA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<city>\p{Lu}\p{L}*(?:\s+\p{Lu}\p{L}*)*)\s*,\s*$")
        .expect("city before comma pattern is valid")
});

/// City after "en"/"in" at the end of the text: "en San Antonio ".
static CITY_AFTER_PREPOSITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:en|in|En|In)\s+(?P<city>\p{Lu}\p{L}*(?:\s+\p{Lu}\p{L}*)*)\s*$")
        .expect("city after preposition pattern is valid")
});

/// Codes that are also common words; only accepted in "City, ST" form.
const AMBIGUOUS_STATE_CODES: &[&str] = &["IN", "OR", "ME", "OK", "HI", "OH", "DE", "LA", "AL"];

/// Replies that look like a "City, ST" pair but are not: "Perfecto, OK".
const INTERJECTIONS: &[&str] = &[
    "perfecto", "gracias", "bueno", "vale", "claro", "listo", "bien", "muy", "sí", "si", "ok",
    "okay", "excelente", "genial", "hola", "entendido", "dale", "thanks", "thank", "great",
    "sure", "fine", "good", "perfect", "yes", "alright", "cool", "hello",
];

/// Words dropped from a loose material answer.
const FILLER_WORDS: &[&str] = &[
    "de", "la", "el", "en", "con", "of", "the", "with", "quiero", "prefiero",
];

/// Parses free-text chat messages into project-detail deltas.
#[derive(Debug, Clone, Default)]
pub struct InformationExtractor;

impl InformationExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts the fields `message` newly determines.
    ///
    /// # Steps
    /// 1. Keyword scan for project type and material (only while unknown)
    /// 2. Dimension parsing, always
    /// 3. Location parsing (only for the parts still unknown)
    /// 4. Contextual override from the last assistant question
    /// 5. Derived area for types measured by length and height
    pub fn extract(
        &self,
        message: &str,
        existing: &ProjectDetails,
        prior_messages: &[Message],
    ) -> ProjectDetailsDelta {
        let lower = message.to_lowercase();
        let pending = pending_slot(prior_messages);
        let mut delta = ProjectDetailsDelta::default();

        if existing.project_type.is_none() {
            delta.project_type = detect_project_type(&lower);
        }
        if existing.material.is_none() {
            delta.material = detect_material(&lower);
        }

        delta.dimensions = parse_dimensions(&lower);

        let known_location = existing.location.clone().unwrap_or_default();
        if known_location.city.is_none() || known_location.state.is_none() {
            delta.location = detect_location(message)
                .map(|found| only_unknown_parts(found, &known_location))
                .filter(|l| !l.is_empty());
        }

        if let Some(slot) = pending {
            apply_pending_answer(slot, message, &lower, existing, &mut delta);
        }

        let project_type = delta.project_type.or(existing.project_type);
        derive_area(project_type, existing, &mut delta);

        delta
    }
}

/// Marker the dialogue uses when naming the next missing field.
const NEXT_FIELD_MARKER: &str = "necesito saber ";

/// The slot asked about by the most recent assistant message, if any.
///
/// Question sentences are checked first: the text between an opening `¿`
/// (or sentence break) and a closing `?`. The first such sentence
/// mentioning a slot's topic wins. Without one, a "necesito saber <field>"
/// request names the slot.
pub fn pending_slot(prior_messages: &[Message]) -> Option<Slot> {
    let last = prior_messages.iter().rev().find(|m| m.is_assistant())?;
    let content = last.content();
    question_sentences(content)
        .into_iter()
        .find_map(|question| {
            let lower = question.to_lowercase();
            Slot::ALL.into_iter().find(|slot| slot.mentioned_in(&lower))
        })
        .or_else(|| {
            let lower = content.to_lowercase();
            let (_, rest) = lower.split_once(NEXT_FIELD_MARKER)?;
            Slot::ALL.into_iter().find(|slot| rest.starts_with(slot.label()))
        })
}

fn question_sentences(text: &str) -> Vec<&str> {
    let pieces: Vec<&str> = text.split('?').collect();
    // The piece after the last '?' is not a question.
    pieces[..pieces.len().saturating_sub(1)]
        .iter()
        .map(|piece| {
            let start = piece
                .rfind(['¿', '.', '!', '\n'])
                .map(|i| i + piece[i..].chars().next().map_or(1, char::len_utf8))
                .unwrap_or(0);
            piece[start..].trim()
        })
        .filter(|q| !q.is_empty())
        .collect()
}

/// Earliest synonym in the text wins; ties go to table order.
fn detect_project_type(lower: &str) -> Option<ProjectType> {
    let mut best: Option<(usize, ProjectType)> = None;
    for profile in ProjectType::profiles() {
        for synonym in profile.synonyms {
            if let Some(pos) = find_word(lower, synonym) {
                if best.map_or(true, |(best_pos, _)| pos < best_pos) {
                    best = Some((pos, profile.project_type));
                }
            }
        }
    }
    best.map(|(_, t)| t)
}

fn detect_material(lower: &str) -> Option<String> {
    let mut best: Option<(usize, &str)> = None;
    for (material, words) in MATERIAL_SYNONYMS {
        for word in *words {
            if let Some(pos) = find_word(lower, word) {
                if best.map_or(true, |(best_pos, _)| pos < best_pos) {
                    best = Some((pos, *material));
                }
            }
        }
    }
    best.map(|(_, m)| m.to_string())
}

/// Parses "1,5" as 1.5 and "1,200" as 1200.
fn parse_number(raw: &str) -> Option<f64> {
    let normalized = match raw.split_once(',') {
        Some((whole, frac)) if frac.len() == 3 && whole.len() <= 3 => format!("{whole}{frac}"),
        Some((whole, frac)) => format!("{whole}.{frac}"),
        None => raw.to_string(),
    };
    normalized.parse::<f64>().ok()
}

fn dimension_for_word(word: &str) -> Option<Dimension> {
    match word {
        "longitud" | "largo" | "length" | "long" => Some(Dimension::Length),
        "altura" | "alto" | "height" | "high" | "tall" => Some(Dimension::Height),
        "anchura" | "ancho" | "width" | "wide" => Some(Dimension::Width),
        "grosor" | "espesor" | "profundidad" | "depth" | "thick" | "deep" => Some(Dimension::Depth),
        _ => None,
    }
}

fn is_inches(unit: Option<&str>) -> bool {
    matches!(unit, Some("pulgadas" | "pulgada" | "inches" | "inch" | "in"))
}

fn is_feet(unit: Option<&str>) -> bool {
    matches!(unit, Some("pies" | "pie" | "feet" | "foot" | "ft"))
}

/// Converts to the stored unit: feet for linear dimensions, inches for depth.
fn to_stored_unit(dimension: Dimension, value: f64, unit: Option<&str>) -> f64 {
    match dimension {
        Dimension::Depth if is_feet(unit) => value * 12.0,
        Dimension::Depth | Dimension::SquareFeet => value,
        _ if is_inches(unit) => value / 12.0,
        _ => value,
    }
}

fn insert_if_absent(dims: &mut Dimensions, dimension: Dimension, value: f64) {
    if !dims.contains(dimension) {
        dims.insert(dimension, value);
    }
}

fn numeric_capture(caps: &Captures<'_>) -> Option<(Dimension, f64)> {
    let dimension = dimension_for_word(caps.name("dim")?.as_str())?;
    let value = parse_number(caps.name("num")?.as_str())?;
    let unit = caps.name("unit").map(|m| m.as_str());
    Some((dimension, to_stored_unit(dimension, value, unit)))
}

fn spelled_capture(caps: &Captures<'_>) -> Option<(Dimension, f64)> {
    let dimension = dimension_for_word(caps.name("dim")?.as_str())?;
    let value = number_word_value(caps.name("word")?.as_str())?;
    let unit = caps.name("unit").map(|m| m.as_str());
    Some((dimension, to_stored_unit(dimension, value, unit)))
}

fn parse_dimensions(lower: &str) -> Dimensions {
    let mut dims = Dimensions::new();

    for caps in AREA_SUFFIX.captures_iter(lower).chain(AREA_PREFIX.captures_iter(lower)) {
        if let Some(value) = caps.name("num").and_then(|m| parse_number(m.as_str())) {
            insert_if_absent(&mut dims, Dimension::SquareFeet, value);
        }
    }

    let numeric = SUFFIX_DIMENSION
        .captures_iter(lower)
        .chain(PREFIX_DIMENSION.captures_iter(lower))
        .filter_map(|caps| numeric_capture(&caps));
    for (dimension, value) in numeric {
        insert_if_absent(&mut dims, dimension, value);
    }

    let spelled = SPELLED_SUFFIX_DIMENSION
        .captures_iter(lower)
        .chain(SPELLED_PREFIX_DIMENSION.captures_iter(lower))
        .filter_map(|caps| spelled_capture(&caps));
    for (dimension, value) in spelled {
        insert_if_absent(&mut dims, dimension, value);
    }

    if !dims.contains(Dimension::Length) && !dims.contains(Dimension::Width) {
        if let Some((a, b)) = RECTANGLE.captures_iter(lower).find_map(|caps| rectangle(&caps)) {
            dims.insert(Dimension::Length, a);
            dims.insert(Dimension::Width, b);
        }
    }

    dims
}

fn rectangle(caps: &Captures<'_>) -> Option<(f64, f64)> {
    let a = parse_number(caps.name("a")?.as_str())?;
    let b = parse_number(caps.name("b")?.as_str())?;
    let has_unit = caps.name("unit_a").is_some() || caps.name("unit_b").is_some();
    if !has_unit && a <= MAX_NOMINAL_LUMBER_SIZE && b <= MAX_NOMINAL_LUMBER_SIZE {
        return None;
    }
    Some((a, b))
}

fn detect_location(message: &str) -> Option<Location> {
    if let Some(caps) = CITY_STATE_CODE
        .captures_iter(message)
        .find(|c| is_city_state_pair(message, c))
    {
        let city = caps.name("city").map(|m| strip_preposition(m.as_str()));
        let state = caps.name("state").map(|m| m.as_str().to_string());
        return Some(Location::new(city.filter(|c| !c.is_empty()), state));
    }

    let (state, position) = detect_state_name(message).or_else(|| detect_state_code(message))?;
    let prefix = &message[..position];
    let city = CITY_BEFORE_COMMA
        .captures(prefix)
        .or_else(|| CITY_AFTER_PREPOSITION.captures(prefix))
        .and_then(|caps| caps.name("city").map(|m| strip_preposition(m.as_str())))
        .filter(|c| !c.is_empty());
    Some(Location::new(city, Some(state)))
}

/// Ambiguous codes count only after "en"/"in", or when the pair closes a
/// clause and the "city" is not an interjection.
fn is_city_state_pair(message: &str, caps: &Captures<'_>) -> bool {
    let (Some(whole), Some(city), Some(state)) =
        (caps.get(0), caps.name("city"), caps.name("state"))
    else {
        return false;
    };
    let state = state.as_str();
    if !is_state_code(state) {
        return false;
    }
    if !AMBIGUOUS_STATE_CODES.contains(&state) {
        return true;
    }

    let city = city.as_str();
    let after_preposition = city.starts_with("En ")
        || city.starts_with("In ")
        || message[..whole.start()]
            .split_whitespace()
            .next_back()
            .is_some_and(|w| matches!(w.to_lowercase().as_str(), "en" | "in"));
    if after_preposition {
        return true;
    }

    let closes_clause = message[whole.end()..]
        .trim_start()
        .chars()
        .next()
        .map_or(true, |c| matches!(c, '.' | ',' | ';' | '!' | '?'));
    let interjection = city
        .split_whitespace()
        .any(|w| INTERJECTIONS.contains(&w.to_lowercase().as_str()));
    closes_clause && !interjection
}

/// Earliest (then longest) state name; returns the code and the byte
/// offset of the match in `message`.
fn detect_state_name(message: &str) -> Option<(String, usize)> {
    let lower = message.to_lowercase();
    let mut best: Option<(usize, usize, &str)> = None;
    for (name, code) in US_STATES {
        if let Some(pos) = find_word(&lower, name) {
            let better = match best {
                None => true,
                Some((best_pos, best_len, _)) => {
                    pos < best_pos || (pos == best_pos && name.len() > best_len)
                }
            };
            if better {
                best = Some((pos, name.len(), *code));
            }
        }
    }
    let (pos, _, code) = best?;
    // Map the offset in the lower-cased copy back onto the original text.
    let char_index = lower[..pos].chars().count();
    let offset = message
        .char_indices()
        .nth(char_index)
        .map_or(message.len(), |(i, _)| i);
    Some((code.to_string(), offset))
}

fn detect_state_code(message: &str) -> Option<(String, usize)> {
    STATE_CODE
        .captures_iter(message)
        .filter_map(|caps| caps.name("state"))
        .find(|m| is_state_code(m.as_str()) && !AMBIGUOUS_STATE_CODES.contains(&m.as_str()))
        .map(|m| (m.as_str().to_string(), m.start()))
}

fn strip_preposition(city: &str) -> String {
    let trimmed = city.trim();
    for prefix in ["En ", "In "] {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            return rest.trim().to_string();
        }
    }
    trimmed.to_string()
}

fn only_unknown_parts(found: Location, known: &Location) -> Location {
    Location::new(
        found.city.filter(|_| known.city.is_none()),
        found.state.filter(|_| known.state.is_none()),
    )
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Accepts looser answers to the question the assistant just asked.
fn apply_pending_answer(
    slot: Slot,
    message: &str,
    lower: &str,
    existing: &ProjectDetails,
    delta: &mut ProjectDetailsDelta,
) {
    match slot {
        Slot::Type if existing.project_type.is_none() && delta.project_type.is_none() => {
            delta.project_type = loose_project_type(lower);
        }
        Slot::Material if existing.material.is_none() && delta.material.is_none() => {
            delta.material = loose_material(lower);
        }
        Slot::Length | Slot::Height | Slot::Area if delta.dimensions.is_empty() => {
            if let Some(dimension) = slot.dimension() {
                if let Some(value) = bare_number(lower, dimension) {
                    delta.dimensions.insert(dimension, value);
                }
            }
        }
        Slot::Location if delta.location.is_none() => {
            let known_city = existing.location.as_ref().and_then(|l| l.city.as_ref());
            let has_digit = message.chars().any(|c| c.is_ascii_digit());
            let cleaned = message.trim().trim_end_matches(['.', '!', '?']).trim();
            if known_city.is_none()
                && !has_digit
                && !cleaned.is_empty()
                && word_count(cleaned) <= 4
            {
                delta.location = Some(Location::new(Some(cleaned.to_string()), None));
            }
        }
        _ => {}
    }
}

/// Any word sharing its first four letters with a type synonym.
fn loose_project_type(lower: &str) -> Option<ProjectType> {
    let prefix4 = |s: &str| s.chars().take(4).collect::<String>();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 4)
        .find_map(|token| {
            let token_prefix = prefix4(token);
            ProjectType::profiles()
                .iter()
                .find(|p| p.synonyms.iter().any(|s| prefix4(s) == token_prefix))
                .map(|p| p.project_type)
        })
}

/// A short answer taken verbatim (minus filler words) as the material.
fn loose_material(lower: &str) -> Option<String> {
    if word_count(lower) > 3 || lower.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty() && !FILLER_WORDS.contains(w))
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn bare_number(lower: &str, dimension: Dimension) -> Option<f64> {
    if let Some(caps) = BARE_NUMBER.captures(lower) {
        let value = parse_number(caps.name("num")?.as_str())?;
        let unit = caps.name("unit").map(|m| m.as_str());
        return Some(to_stored_unit(dimension, value, unit));
    }
    if matches!(dimension, Dimension::Length | Dimension::Height) {
        return lower
            .split(|c: char| !c.is_alphanumeric())
            .find_map(number_word_value);
    }
    None
}

/// Fills in square feet from length and height (vertical surfaces) or
/// length and width (flat surfaces) when one of the pair is new.
fn derive_area(
    project_type: Option<ProjectType>,
    existing: &ProjectDetails,
    delta: &mut ProjectDetailsDelta,
) {
    let Some(project_type) = project_type else {
        return;
    };
    if existing.dimensions.contains(Dimension::SquareFeet)
        || delta.dimensions.contains(Dimension::SquareFeet)
    {
        return;
    }

    let second = if project_type.profile().area_from_length_and_height {
        Dimension::Height
    } else {
        Dimension::Width
    };
    let newly_known =
        delta.dimensions.contains(Dimension::Length) || delta.dimensions.contains(second);
    let value = |d: Dimension| delta.dimensions.get(d).or_else(|| existing.dimensions.get(d));

    if let (true, Some(length), Some(other)) =
        (newly_known, value(Dimension::Length), value(second))
    {
        delta.dimensions.insert(Dimension::SquareFeet, length * other);
    }
}
