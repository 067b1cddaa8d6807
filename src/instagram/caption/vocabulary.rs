//! Multilingual keyword table for caption classification.
//!
//! Every keyword is a `{language, role, pattern}` row; the matchers in
//! [`Lexicon`] are compiled from the rows of each role, so adding a language
//! means adding rows, not code.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Swedish,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Swedish];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// A line that opens the ingredient list
    IngredientHeader,
    /// A line that opens the method
    InstructionHeader,
    /// Measurement unit token
    Unit,
    /// Indefinite quantity at the start of a line ("a few", "lite")
    QuantityWord,
    /// Trailing preparation clause (", chopped")
    PreparationState,
    /// Verb that signals a cooking action
    CookingVerb,
    /// Noun that follows a servings count
    ServingsWord,
    /// Social-media boilerplate; each pattern is a complete regex
    Junk,
}

#[derive(Debug, Clone, Copy)]
pub struct Term {
    pub language: Language,
    pub role: Role,
    pub pattern: &'static str,
}

const fn en(role: Role, pattern: &'static str) -> Term {
    Term {
        language: Language::English,
        role,
        pattern,
    }
}

const fn sv(role: Role, pattern: &'static str) -> Term {
    Term {
        language: Language::Swedish,
        role,
        pattern,
    }
}

use Role::*;

pub const VOCABULARY: &[Term] = &[
    // Section headers
    en(IngredientHeader, r"ingredients?"),
    en(IngredientHeader, r"what you(?:'|’)?ll need"),
    en(IngredientHeader, r"you(?:'|’)?ll need"),
    en(IngredientHeader, r"shopping list"),
    sv(IngredientHeader, r"ingredienser"),
    sv(IngredientHeader, r"du behöver"),
    sv(IngredientHeader, r"det här behöver du"),
    en(InstructionHeader, r"instructions?"),
    en(InstructionHeader, r"directions?"),
    en(InstructionHeader, r"method"),
    en(InstructionHeader, r"steps?"),
    en(InstructionHeader, r"preparation"),
    en(InstructionHeader, r"how to make(?: it)?"),
    sv(InstructionHeader, r"tillagning"),
    sv(InstructionHeader, r"instruktioner"),
    sv(InstructionHeader, r"gör så här"),
    sv(InstructionHeader, r"så gör du"),
    sv(InstructionHeader, r"metod"),
    sv(InstructionHeader, r"steg för steg"),
    sv(InstructionHeader, r"beskrivning"),
    // Units
    en(Unit, r"cups?"),
    en(Unit, r"tbsps?"),
    en(Unit, r"tbs"),
    en(Unit, r"tablespoons?"),
    en(Unit, r"tsps?"),
    en(Unit, r"teaspoons?"),
    en(Unit, r"oz"),
    en(Unit, r"ounces?"),
    en(Unit, r"lbs?"),
    en(Unit, r"pounds?"),
    en(Unit, r"g"),
    en(Unit, r"grams?"),
    en(Unit, r"kg"),
    en(Unit, r"ml"),
    en(Unit, r"l"),
    en(Unit, r"lit(?:er|re)s?"),
    en(Unit, r"pinch(?:es)?"),
    en(Unit, r"cloves?"),
    en(Unit, r"cans?"),
    en(Unit, r"slices?"),
    en(Unit, r"pieces?"),
    en(Unit, r"handfuls?"),
    en(Unit, r"sticks?"),
    en(Unit, r"bunch(?:es)?"),
    en(Unit, r"dash(?:es)?"),
    en(Unit, r"pints?"),
    en(Unit, r"quarts?"),
    sv(Unit, r"msk"),
    sv(Unit, r"tsk"),
    sv(Unit, r"krm"),
    sv(Unit, r"dl"),
    sv(Unit, r"cl"),
    sv(Unit, r"st"),
    sv(Unit, r"gram"),
    sv(Unit, r"paket"),
    sv(Unit, r"förp"),
    sv(Unit, r"burk(?:ar)?"),
    sv(Unit, r"klyftor?"),
    sv(Unit, r"nypa"),
    sv(Unit, r"knippe"),
    sv(Unit, r"kruka"),
    // Indefinite quantities
    en(QuantityWord, r"a few"),
    en(QuantityWord, r"a couple(?: of)?"),
    en(QuantityWord, r"a pinch"),
    en(QuantityWord, r"a handful"),
    en(QuantityWord, r"a dash"),
    en(QuantityWord, r"some"),
    en(QuantityWord, r"several"),
    sv(QuantityWord, r"lite"),
    sv(QuantityWord, r"några"),
    sv(QuantityWord, r"en nypa"),
    sv(QuantityWord, r"ett par"),
    sv(QuantityWord, r"en skvätt"),
    // Preparation clauses
    en(PreparationState, r"chopped"),
    en(PreparationState, r"diced"),
    en(PreparationState, r"minced"),
    en(PreparationState, r"sliced"),
    en(PreparationState, r"grated"),
    en(PreparationState, r"melted"),
    en(PreparationState, r"softened"),
    en(PreparationState, r"peeled"),
    en(PreparationState, r"crushed"),
    en(PreparationState, r"shredded"),
    en(PreparationState, r"cubed"),
    en(PreparationState, r"halved"),
    en(PreparationState, r"beaten"),
    en(PreparationState, r"drained"),
    en(PreparationState, r"to taste"),
    sv(PreparationState, r"hackade?"),
    sv(PreparationState, r"finhackade?"),
    sv(PreparationState, r"tärnade?"),
    sv(PreparationState, r"riven"),
    sv(PreparationState, r"rivna"),
    sv(PreparationState, r"skivade?"),
    sv(PreparationState, r"smält"),
    sv(PreparationState, r"pressade?"),
    sv(PreparationState, r"skalade?"),
    sv(PreparationState, r"strimlade?"),
    sv(PreparationState, r"efter smak"),
    // Cooking verbs
    en(CookingVerb, r"preheat"),
    en(CookingVerb, r"heat"),
    en(CookingVerb, r"bake"),
    en(CookingVerb, r"boil"),
    en(CookingVerb, r"cook"),
    en(CookingVerb, r"stir"),
    en(CookingVerb, r"mix"),
    en(CookingVerb, r"whisk"),
    en(CookingVerb, r"fry"),
    en(CookingVerb, r"sauté"),
    en(CookingVerb, r"saute"),
    en(CookingVerb, r"simmer"),
    en(CookingVerb, r"add"),
    en(CookingVerb, r"pour"),
    en(CookingVerb, r"combine"),
    en(CookingVerb, r"blend"),
    en(CookingVerb, r"roast"),
    en(CookingVerb, r"grill"),
    en(CookingVerb, r"serve"),
    en(CookingVerb, r"season"),
    en(CookingVerb, r"fold"),
    en(CookingVerb, r"knead"),
    en(CookingVerb, r"place"),
    en(CookingVerb, r"remove"),
    en(CookingVerb, r"transfer"),
    en(CookingVerb, r"spread"),
    en(CookingVerb, r"cover"),
    en(CookingVerb, r"bring"),
    en(CookingVerb, r"reduce"),
    en(CookingVerb, r"melt"),
    en(CookingVerb, r"toss"),
    en(CookingVerb, r"sprinkle"),
    en(CookingVerb, r"garnish"),
    en(CookingVerb, r"marinate"),
    en(CookingVerb, r"let"),
    sv(CookingVerb, r"värm"),
    sv(CookingVerb, r"koka"),
    sv(CookingVerb, r"stek"),
    sv(CookingVerb, r"blanda"),
    sv(CookingVerb, r"vispa"),
    sv(CookingVerb, r"tillsätt"),
    sv(CookingVerb, r"häll"),
    sv(CookingVerb, r"rör"),
    sv(CookingVerb, r"grädda"),
    sv(CookingVerb, r"servera"),
    sv(CookingVerb, r"låt"),
    sv(CookingVerb, r"lägg"),
    sv(CookingVerb, r"fräs"),
    sv(CookingVerb, r"krydda"),
    sv(CookingVerb, r"toppa"),
    sv(CookingVerb, r"mixa"),
    sv(CookingVerb, r"ställ"),
    // Servings nouns
    en(ServingsWord, r"servings"),
    en(ServingsWord, r"portions"),
    sv(ServingsWord, r"portioner"),
    sv(ServingsWord, r"personer"),
    // Boilerplate
    en(Junk, r"^view all [\d,.]+ comments?$"),
    en(Junk, r"^(?:like|reply|share|more|see translation)$"),
    en(Junk, r"^[\d,.]+\s*[km]?\s*likes?$"),
    en(Junk, r"\bfollow (?:me|us)\b"),
    en(Junk, r"\blink in (?:my |the )?bio\b"),
    en(Junk, r"\btag (?:a|your) (?:friend|bestie|someone)"),
    en(Junk, r"\bcomment\b.{0,40}\b(?:to get|to receive|send|dm)\b"),
    en(Junk, r"\bsave (?:this|it|for later)\b"),
    en(Junk, r"\bdouble tap\b"),
    en(Junk, r"\b\d+\s*(?:kcal|calories)\b"),
    en(Junk, r"^(?:calories|macros|protein|carbs|fat)\s*[:\-]"),
    sv(Junk, r"\bfölj (?:mig|oss)\b"),
    sv(Junk, r"\blänk(?:en)? i (?:min )?bio\b"),
    sv(Junk, r"\btagga (?:en vän|någon)"),
    sv(Junk, r"\bkommentera\b.{0,40}\b(?:så skickar|för att få)\b"),
    sv(Junk, r"\bspara (?:detta|receptet|inlägget)\b"),
    sv(Junk, r"\bdubbeltryck\b"),
];

/// Bullet glyphs that may prefix a list item
pub const BULLETS: &[char] = &['-', '•', '·', '◦', '▪', '⁃', '*'];

/// Regex alternation of every pattern with the given role, across languages
pub fn alternation(role: Role) -> String {
    let terms: Vec<&str> = Language::ALL
        .into_iter()
        .flat_map(|language| patterns(role, language))
        .collect();
    format!("(?:{})", terms.join("|"))
}

/// Patterns of a role in one language
pub fn patterns(role: Role, language: Language) -> impl Iterator<Item = &'static str> {
    VOCABULARY
        .iter()
        .filter(move |term| term.role == role && term.language == language)
        .map(|term| term.pattern)
}

/// Compiled matchers for every role.
pub struct Lexicon {
    pub ingredient_header: Regex,
    pub instruction_header: Regex,
    pub ingredient_inline: Regex,
    pub instruction_inline: Regex,
    pub unit: Regex,
    pub quantity_word: Regex,
    pub preparation_state: Regex,
    pub cooking_verb: Regex,
    pub servings_line: Regex,
    pub servings_parenthesized: Regex,
    pub junk: Regex,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid vocabulary pattern {pattern}: {e}"))
}

/// Whole line is the header, optionally followed by a parenthetical and a colon
fn header_line(role: Role) -> Regex {
    compile(&format!(
        r"(?i)^{}\s*(?:\([^)]*\))?\s*:?$",
        alternation(role)
    ))
}

/// Header glued to its first item: "Ingredients• 1 can", "Instructions1. Preheat",
/// "Method: Mix everything". A number only counts when it touches the header,
/// so "Step 1: Mix" stays an ordinary line. A dash or star needs whitespace in
/// front, so "Step-by-step lasagna" is not a header either.
fn header_inline(role: Role) -> Regex {
    compile(&format!(
        r"(?i)^{}(?:\s*:\s*(?P<colon>\S.*)|\s+(?P<bullet>[-*].*)|\s*(?P<dot>[•·◦▪⁃].*)|(?P<glued>[\d½¼¾⅓⅔⅛].*))$",
        alternation(role)
    ))
}

impl Lexicon {
    fn build() -> Self {
        let servings = alternation(ServingsWord);
        let junk: Vec<String> = VOCABULARY
            .iter()
            .filter(|term| term.role == Junk)
            .map(|term| format!("(?:{})", term.pattern))
            .collect();

        Self {
            ingredient_header: header_line(IngredientHeader),
            instruction_header: header_line(InstructionHeader),
            ingredient_inline: header_inline(IngredientHeader),
            instruction_inline: header_inline(InstructionHeader),
            unit: compile(&format!(
                r"(?i)(?:^|[^\p{{L}}]){}\.?(?:$|[^\p{{L}}])",
                alternation(Unit)
            )),
            quantity_word: compile(&format!(r"(?i)^{}\b", alternation(QuantityWord))),
            preparation_state: compile(&format!(
                r"(?i),\s*(?:(?:finely|roughly|thinly|fint|grovt)\s+)?{}\b",
                alternation(PreparationState)
            )),
            cooking_verb: compile(&format!(r"(?i)\b{}\b", alternation(CookingVerb))),
            servings_line: compile(&format!(
                r"(?i)^(\d+(?:\s*[-–]\s*\d+)?\s*{servings})\.?$"
            )),
            servings_parenthesized: compile(&format!(
                r"(?i)\s*\((\d+(?:\s*[-–]\s*\d+)?\s*{servings})\)"
            )),
            junk: compile(&format!("(?i){}", junk.join("|"))),
        }
    }
}

pub static LEXICON: Lazy<Lexicon> = Lazy::new(Lexicon::build);
