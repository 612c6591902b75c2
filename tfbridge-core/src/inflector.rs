//! English pluralization and singularization.
//!
//! Rules are applied in order: uninflected words first, then irregular
//! pairs, then the first matching suffix rule. All matching is case
//! insensitive. Compiled rule sets live in lazily-initialized statics.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;

/// Words that never change, in both directions.
const UNINFLECTED: &[&str] = &[
    "Amoyese",
    "bison",
    "Borghese",
    "bream",
    "breeches",
    "britches",
    "buffalo",
    "cantus",
    "carp",
    "chassis",
    "clippers",
    "cod",
    "coitus",
    "Congoese",
    "contretemps",
    "corps",
    "debris",
    "diabetes",
    "djinn",
    "eland",
    "elk",
    "equipment",
    "Faroese",
    "flounder",
    "Foochowese",
    "gallows",
    "Genevese",
    "Genoese",
    "Gilbertese",
    "graffiti",
    "headquarters",
    "herpes",
    "hijinks",
    "Hottentotese",
    "information",
    "innings",
    "jackanapes",
    "Kiplingese",
    "Kongoese",
    "Lucchese",
    "mackerel",
    "Maltese",
    ".*?media",
    "mews",
    "moose",
    "mumps",
    "Nankingese",
    "news",
    "nexus",
    "Niasese",
    "Pekingese",
    "Piedmontese",
    "pincers",
    "Pistoiese",
    "pliers",
    "Portuguese",
    "proceedings",
    "rabies",
    "rice",
    "rhinoceros",
    "salmon",
    "Sarawakese",
    "scissors",
    "sea[- ]bass",
    "series",
    "Shavese",
    "shears",
    "siemens",
    "species",
    "swine",
    "testes",
    "trousers",
    "trout",
    "tuna",
    "Vermontese",
    "Wenchowese",
    "whiting",
    "wildebeest",
    "Yengeese",
];

const PLURAL_UNINFLECTED: &[&str] = &[
    ".*[nrlm]ese",
    ".*deer",
    ".*fish",
    ".*measles",
    ".*ois",
    ".*pox",
    ".*sheep",
    "people",
    "feedback",
];

// Words ending in "ss" are deliberately absent, so "address" reads as the
// plural of "addres" and is never pluralized by the naming rule.
const SINGULAR_UNINFLECTED: &[&str] = &[
    ".*[nrlm]ese",
    ".*deer",
    ".*fish",
    ".*measles",
    ".*ois",
    ".*pox",
    ".*sheep",
    "feedback",
];

/// Singular to plural.
const IRREGULAR: &[(&str, &str)] = &[
    ("atlas", "atlases"),
    ("beef", "beefs"),
    ("brother", "brothers"),
    ("cafe", "cafes"),
    ("child", "children"),
    ("cookie", "cookies"),
    ("corpus", "corpuses"),
    ("cow", "cows"),
    ("ganglion", "ganglions"),
    ("genie", "genies"),
    ("genus", "genera"),
    ("graffito", "graffiti"),
    ("hoof", "hoofs"),
    ("loaf", "loaves"),
    ("man", "men"),
    ("money", "monies"),
    ("mongoose", "mongooses"),
    ("move", "moves"),
    ("mythos", "mythoi"),
    ("niche", "niches"),
    ("numen", "numina"),
    ("occiput", "occiputs"),
    ("octopus", "octopuses"),
    ("opus", "opuses"),
    ("ox", "oxen"),
    ("penis", "penises"),
    ("person", "people"),
    ("sex", "sexes"),
    ("soliloquy", "soliloquies"),
    ("testis", "testes"),
    ("trilby", "trilbys"),
    ("turf", "turfs"),
    ("potato", "potatoes"),
    ("hero", "heroes"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("foot", "feet"),
];

const PLURAL_RULES: &[(&str, &str)] = &[
    (r"(?i)(s)tatus$", "${1}tatuses"),
    (r"(?i)(quiz)$", "${1}zes"),
    (r"(?i)^(ox)$", "${1}en"),
    (r"(?i)([m|l])ouse$", "${1}ice"),
    (r"(?i)(matr|vert|ind)(ix|ex)$", "${1}ices"),
    (r"(?i)(x|ch|ss|sh)$", "${1}es"),
    (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
    (r"(?i)(hive)$", "${1}s"),
    (r"(?i)(?:([^f])fe|([lre])f)$", "${1}${2}ves"),
    (r"(?i)sis$", "ses"),
    (r"(?i)([ti])um$", "${1}a"),
    (r"(?i)(p)erson$", "${1}eople"),
    (r"(?i)(m)an$", "${1}en"),
    (r"(?i)(c)hild$", "${1}hildren"),
    (r"(?i)(buffal|tomat)o$", "${1}oes"),
    (
        r"(?i)(alumn|bacill|cact|foc|fung|nucle|radi|stimul|syllab|termin|vir)us$",
        "${1}i",
    ),
    (r"(?i)us$", "uses"),
    (r"(?i)(alias)$", "${1}es"),
    (r"(?i)(ax|cris|test)is$", "${1}es"),
    (r"(?i)s$", "s"),
    (r"^$", ""),
    (r"$", "s"),
];

const SINGULAR_RULES: &[(&str, &str)] = &[
    (r"(?i)(s)tatuses$", "${1}tatus"),
    (r"(?i)^(.*)(menu)s$", "${1}${2}"),
    (r"(?i)(quiz)zes$", "${1}"),
    (r"(?i)(matr)ices$", "${1}ix"),
    (r"(?i)(vert|ind)ices$", "${1}ex"),
    (r"(?i)^(ox)en", "${1}"),
    (r"(?i)(alias)(es)*$", "${1}"),
    (
        r"(?i)(alumn|bacill|cact|foc|fung|nucle|radi|stimul|syllab|termin|viri?)i$",
        "${1}us",
    ),
    (r"(?i)([ftw]ax)es", "${1}"),
    (r"(?i)(cris|ax|test)es$", "${1}is"),
    (r"(?i)(shoe|slave)s$", "${1}"),
    (r"(?i)(o)es$", "${1}"),
    (r"(?i)ouses$", "ouse"),
    (r"(?i)([^a])uses$", "${1}us"),
    (r"(?i)([m|l])ice$", "${1}ouse"),
    (r"(?i)(x|ch|ss|sh)es$", "${1}"),
    (r"(?i)(m)ovies$", "${1}ovie"),
    (r"(?i)(s)eries$", "${1}eries"),
    (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
    (r"(?i)([lr])ves$", "${1}f"),
    (r"(?i)(tive)s$", "${1}"),
    (r"(?i)(hive)s$", "${1}"),
    (r"(?i)(drive)s$", "${1}"),
    (r"(?i)([^fo])ves$", "${1}fe"),
    (r"(?i)(^analy)ses$", "${1}sis"),
    (
        r"(?i)(analy|diagno|^ba|(p)arenthe|(p)rogno|(s)ynop|(t)he)ses$",
        "${1}sis",
    ),
    (r"(?i)([ti])a$", "${1}um"),
    (r"(?i)(p)eople$", "${1}erson"),
    (r"(?i)(m)en$", "${1}an"),
    (r"(?i)(c)hildren$", "${1}hild"),
    (r"(?i)(n)ews$", "${1}ews"),
    (r"eaus$", "eau"),
    (r"^(.*us)$", "${1}"),
    (r"(?i)s$", ""),
];

static PLURAL: LazyLock<Inflections> = LazyLock::new(|| {
    Inflections::new(PLURAL_RULES, PLURAL_UNINFLECTED, IRREGULAR.iter().copied())
});

static SINGULAR: LazyLock<Inflections> = LazyLock::new(|| {
    Inflections::new(
        SINGULAR_RULES,
        SINGULAR_UNINFLECTED,
        IRREGULAR.iter().map(|&(singular, plural)| (plural, singular)),
    )
});

/// Plural form of `word`.
pub fn pluralize(word: &str) -> String {
    PLURAL.apply(word)
}

/// Singular form of `word`.
pub fn singularize(word: &str) -> String {
    SINGULAR.apply(word)
}

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

struct Inflections {
    uninflected: Regex,
    irregular_pattern: Regex,
    /// Lowercase source word to replacement.
    irregular: HashMap<String, &'static str>,
    rules: Vec<Rule>,
}

impl Inflections {
    fn new(
        rules: &[(&'static str, &'static str)],
        uninflected: &[&str],
        irregular: impl Iterator<Item = (&'static str, &'static str)>,
    ) -> Self {
        let irregular: HashMap<String, &'static str> =
            irregular.map(|(from, to)| (from.to_lowercase(), to)).collect();

        let words: Vec<&str> = uninflected.iter().chain(UNINFLECTED).copied().collect();
        let uninflected = Regex::new(&format!("(?i)^(?:{})$", words.join("|")))
            .expect("uninflected word list is a valid regex");

        let mut keys: Vec<&str> = irregular.keys().map(String::as_str).collect();
        // Longest first so "mongoose" wins over "goose".
        keys.sort_by_key(|k| std::cmp::Reverse(k.len()));
        let irregular_pattern = Regex::new(&format!(r"(?i)^(.*?\b)({})$", keys.join("|")))
            .expect("irregular word list is a valid regex");

        let rules = rules
            .iter()
            .map(|&(pattern, replacement)| Rule {
                pattern: Regex::new(pattern).expect("inflection rule is a valid regex"),
                replacement,
            })
            .collect();

        Self {
            uninflected,
            irregular_pattern,
            irregular,
            rules,
        }
    }

    fn apply(&self, word: &str) -> String {
        if self.uninflected.is_match(word) {
            return word.to_string();
        }

        if let Some(caps) = self.irregular_pattern.captures(word) {
            let prefix = caps.get(1).map_or("", |m| m.as_str());
            let matched = caps.get(2).map_or("", |m| m.as_str());
            if let Some(replacement) = self.irregular.get(&matched.to_lowercase()) {
                // Keep the caller's casing of the first letter.
                let mut out = String::from(prefix);
                out.extend(matched.chars().take(1));
                out.extend(replacement.chars().skip(1));
                return out;
            }
        }

        for rule in &self.rules {
            if rule.pattern.is_match(word) {
                return rule.pattern.replace(word, rule.replacement).into_owned();
            }
        }

        word.to_string()
    }
}
