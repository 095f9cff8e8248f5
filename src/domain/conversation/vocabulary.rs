//! Fixed English/Spanish word tables used by the extractor and dialogue.

/// Canonical material name and the lower-case words that name it.
///
/// Order matters: earlier entries win when several appear at the same
/// position.
pub const MATERIAL_SYNONYMS: &[(&str, &[&str])] = &[
    ("chain_link", &["chain link", "chain-link", "ciclón", "ciclon", "malla"]),
    ("wood", &["madera", "wood", "cedro", "cedar", "pino", "pine", "treated lumber"]),
    ("vinyl", &["vinilo", "vinyl", "pvc"]),
    ("composite", &["composite", "compuesto", "trex"]),
    ("aluminum", &["aluminio", "aluminum"]),
    ("metal", &["metal", "hierro", "iron", "acero", "steel", "forjado"]),
    ("asphalt_shingle", &["shingle", "asfalto", "asphalt"]),
    ("tile", &["teja", "tile"]),
    ("stamped_concrete", &["estampado", "stamped"]),
];

/// Spelled-out numbers accepted for length and height.
pub const NUMBER_WORDS: &[(&str, f64)] = &[
    ("one", 1.0),
    ("two", 2.0),
    ("three", 3.0),
    ("four", 4.0),
    ("five", 5.0),
    ("six", 6.0),
    ("seven", 7.0),
    ("eight", 8.0),
    ("nine", 9.0),
    ("ten", 10.0),
    ("eleven", 11.0),
    ("twelve", 12.0),
    ("thirteen", 13.0),
    ("fourteen", 14.0),
    ("fifteen", 15.0),
    ("sixteen", 16.0),
    ("seventeen", 17.0),
    ("eighteen", 18.0),
    ("nineteen", 19.0),
    ("twenty", 20.0),
    ("thirty", 30.0),
    ("forty", 40.0),
    ("fifty", 50.0),
    ("sixty", 60.0),
    ("seventy", 70.0),
    ("eighty", 80.0),
    ("ninety", 90.0),
    ("hundred", 100.0),
    ("uno", 1.0),
    ("dos", 2.0),
    ("tres", 3.0),
    ("cuatro", 4.0),
    ("cinco", 5.0),
    ("seis", 6.0),
    ("siete", 7.0),
    ("ocho", 8.0),
    ("nueve", 9.0),
    ("diez", 10.0),
    ("once", 11.0),
    ("doce", 12.0),
    ("trece", 13.0),
    ("catorce", 14.0),
    ("quince", 15.0),
    ("dieciséis", 16.0),
    ("dieciseis", 16.0),
    ("diecisiete", 17.0),
    ("dieciocho", 18.0),
    ("diecinueve", 19.0),
    ("veinte", 20.0),
    ("treinta", 30.0),
    ("cuarenta", 40.0),
    ("cincuenta", 50.0),
    ("sesenta", 60.0),
    ("setenta", 70.0),
    ("ochenta", 80.0),
    ("noventa", 90.0),
    ("cien", 100.0),
    ("ciento", 100.0),
];

/// Looks up a spelled-out number.
pub fn number_word_value(word: &str) -> Option<f64> {
    let lower = word.to_lowercase();
    NUMBER_WORDS
        .iter()
        .find(|(w, _)| *w == lower)
        .map(|(_, v)| *v)
}

/// US state names (English and common Spanish spellings) to postal code.
pub const US_STATES: &[(&str, &str)] = &[
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("carolina del norte", "NC"),
    ("carolina del sur", "SC"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("dakota del norte", "ND"),
    ("dakota del sur", "SD"),
    ("delaware", "DE"),
    ("district of columbia", "DC"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("luisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("nueva jersey", "NJ"),
    ("nueva york", "NY"),
    ("nuevo méxico", "NM"),
    ("nuevo mexico", "NM"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("pensilvania", "PA"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("virginia occidental", "WV"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
];

/// Returns true if `code` is a known two-letter state code.
pub fn is_state_code(code: &str) -> bool {
    US_STATES.iter().any(|(_, c)| *c == code)
}

/// Phrases in a user message that ask for a price.
pub const ESTIMATE_KEYWORDS: &[&str] = &[
    "estimado",
    "estimación",
    "estimacion",
    "cotización",
    "cotizacion",
    "presupuesto",
    "precio",
    "costo",
    "cuánto",
    "cuanto",
    "estimate",
    "quote",
    "price",
    "cost",
    "how much",
];

/// Returns true if the (lower-cased) message asks about price or estimate.
pub fn asks_for_estimate(lower_message: &str) -> bool {
    ESTIMATE_KEYWORDS.iter().any(|k| lower_message.contains(k))
}
