//! Word lists
//!
//! Every word uses only [`LETTERS`], the letters the segment glass can
//! draw legibly in any digit slot.

/// Letters a guess can be built from, in cycling order
pub const LETTERS: [u8; 13] = *b"ACDEILNOPRSTU";

/// Words that can be picked as the answer
pub const ANSWERS: [&[u8; 5]; 155] = [
    b"APPLE", b"CRANE", b"SLATE", b"TRAIN", b"PLANT", b"STONE", b"LEAST", b"PRICE", b"SAUCE", b"OCEAN",
    b"CLEAN", b"DANCE", b"UNCLE", b"SNARE", b"PLEAD", b"TRIED", b"ROUND", b"SOUND", b"PAINT", b"TOAST",
    b"CLOUD", b"PRIDE", b"SPARE", b"LOANS", b"NOTES", b"RATIO", b"STAIR", b"ALONE", b"ROUTE", b"TULIP",
    b"ADULT", b"ALERT", b"ALIEN", b"ALTER", b"ARISE", b"ASIDE", b"ATONE", b"CANOE", b"CARTS", b"CASTE",
    b"CLEAR", b"CLOSE", b"COAST", b"COUNT", b"COURT", b"CREDO", b"CRUEL", b"CRUST", b"DEALT", b"DEPOT",
    b"DINER", b"DONOR", b"DRAPE", b"DREAD", b"DRESS", b"DRIED", b"DRILL", b"DUNES", b"EDICT", b"ELITE",
    b"ENTER", b"IDEAL", b"INLET", b"INPUT", b"IRONS", b"LADLE", b"LAPSE", b"LASER", b"LATER", b"LEARN",
    b"LEASE", b"LINER", b"LITER", b"LOCAL", b"LOOSE", b"ONSET", b"OPTIC", b"ORDER", b"OUNCE", b"PANEL",
    b"PARSE", b"PASTA", b"PATIO", b"PEARL", b"PEDAL", b"PETAL", b"PILOT", b"PLAIN", b"PLANE", b"POLAR",
    b"POUND", b"PRINT", b"PROSE", b"PROUD", b"RADIO", b"RAISE", b"RAPID", b"RELIC", b"RINSE", b"RIPEN",
    b"RISEN", b"RULER", b"SAINT", b"SALAD", b"SALON", b"SAUNA", b"SCALE", b"SCARE", b"SCENT", b"SCORE",
    b"SCRAP", b"SENSE", b"SIREN", b"SLEPT", b"SLICE", b"SLIDE", b"SNAIL", b"SOLAR", b"SOLID", b"SPACE",
    b"SPADE", b"SPEND", b"SPICE", b"SPINE", b"SPLIT", b"SPORT", b"SPOUT", b"STALE", b"STAND", b"START",
    b"STEAL", b"STEEP", b"STOOL", b"STORE", b"STRAP", b"TALON", b"TAPER", b"TASTE", b"TENOR", b"TIDAL",
    b"TIRED", b"TITLE", b"TONIC", b"TOTAL", b"TREAD", b"TREND", b"TRIAL", b"TROUT", b"TRUCE", b"TUNER",
    b"ULTRA", b"UNDER", b"UNITE", b"UNTIE", b"USUAL",
];

/// Further words accepted as guesses
pub const GUESSES: [&[u8; 5]; 107] = [
    b"ADIEU", b"AUDIO", b"IRATE", b"ROAST", b"SCOUT", b"DRAIN", b"LUNAR", b"POINT", b"UNTIL", b"ACORN",
    b"CAROL", b"OPERA", b"SPOIL", b"TRACE", b"CIDER", b"LANCE", b"ACRID", b"ADORN", b"AISLE", b"ALDER",
    b"ALTOS", b"ANODE", b"APRON", b"ARSON", b"ASCOT", b"ASTIR", b"AUDIT", b"CADET", b"CAIRN", b"CANTO",
    b"CAPER", b"CEDAR", b"CLASP", b"CLEAT", b"CODER", b"CORAL", b"CREPT", b"CRIED", b"DECAL", b"DELTA",
    b"DENSE", b"DIODE", b"DITTO", b"DOSER", b"DUCAT", b"ELUDE", b"ERODE", b"IDLER", b"INERT", b"IONIC",
    b"LAPEL", b"LEANT", b"LEPER", b"LINEN", b"LIONS", b"LOTUS", b"LUCID", b"NADIR", b"NICER", b"NOISE",
    b"OCTAL", b"OLDEN", b"OPINE", b"ORATE", b"OTTER", b"PAEAN", b"PALER", b"PASTE", b"PECAN", b"PERIL",
    b"PIANO", b"PLEAT", b"PLIER", b"POISE", b"POSIT", b"PRONE", b"PUREE", b"RADAR", b"RAINS", b"RECAP",
    b"RESIN", b"RIDER", b"ROSIN", b"ROTOR", b"SAUTE", b"SCION", b"SCOLD", b"SEDAN", b"SNORE", b"SONIC",
    b"SPEAR", b"STEIN", b"STOIC", b"STUNT", b"SUITE", b"TAROT", b"TENET", b"TIARA", b"TOPIC", b"TORSO",
    b"TRICE", b"TUTOR", b"UNCUT", b"UNLIT", b"UNSET", b"UPSET", b"USURP",
];

/// Dictionary index of a word: answers first, then extra guesses
pub fn lookup(word: &[u8; 5]) -> Option<u16> {
    ANSWERS
        .iter()
        .chain(GUESSES.iter())
        .position(|w| *w == word)
        .map(|i| i as u16)
}

/// Index of `letter` in [`LETTERS`]
pub fn letter_index(letter: u8) -> Option<u8> {
    LETTERS.iter().position(|&l| l == letter).map(|i| i as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_use_valid_letters() {
        for word in ANSWERS.iter().chain(GUESSES.iter()) {
            for letter in word.iter() {
                assert!(letter_index(*letter).is_some(), "{}", *letter as char);
            }
        }
    }

    #[test]
    fn test_lookup_order() {
        assert_eq!(lookup(b"APPLE"), Some(0));
        assert_eq!(lookup(b"ADIEU"), Some(ANSWERS.len() as u16));
        assert_eq!(lookup(b"PLACE"), None);
    }

    #[test]
    fn test_no_duplicate_words() {
        let words: Vec<&[u8; 5]> = ANSWERS.iter().chain(GUESSES.iter()).copied().collect();
        for (i, word) in words.iter().enumerate() {
            assert_eq!(lookup(word), Some(i as u16), "{:?}", core::str::from_utf8(*word));
        }
    }
}
