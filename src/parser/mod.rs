// ============================================================================
// Module : parser
// ============================================================================
// Détecte un montant et sa devise dans un texte libre ("$28", "50 EUR", ...)
//
// PRINCIPE : cascade ordonnée de stratégies
// - Chaque stratégie essaie de reconnaître une forme d'écriture
// - La première qui reconnaît quelque chose gagne (pas de score)
// - L'ordre est une constante publique : STRATEGY_ORDER
//
// CONCEPTS RUST :
// 1. LazyLock : regex compilées une seule fois, au premier usage
// 2. Option + find_map : "premier résultat non-None" sans boucle manuelle
// 3. Enums sans données : une stratégie = un variant
// ============================================================================

pub mod symbols;

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::models::ParsedAmount;

pub use symbols::{code_for_symbol, display_symbol, SYMBOL_TABLE};

// Chiffres ASCII uniquement : \d accepterait aussi les chiffres Unicode,
// que f64::from_str refuse.
const NUMERAL: &str = r"([0-9]+(?:\.[0-9]+)?)";

// Symboles d'un seul caractère
const SINGLE_SYMBOLS: &str = r"([€£¥₹₽₪$])";

// Symboles composés, le plus spécifique d'abord : "A$" ne doit jamais
// matcher à l'intérieur de "AU$"
const MULTI_SYMBOLS: &str = r"(CA\$|AU\$|NZ\$|HK\$|A\$|C\$|S\$)";

// Lettres qui, collées devant "$", forment un symbole composé complet
const MULTI_SYMBOL_LETTERS: [&str; 7] = ["CA", "AU", "NZ", "HK", "A", "C", "S"];

const CODE: &str = r"([A-Z]{3})";

static SYMBOL_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"{SINGLE_SYMBOLS}\s*{NUMERAL}")));
static SYMBOL_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"{NUMERAL}\s*{SINGLE_SYMBOLS}")));
static MULTI_SYMBOL_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"{MULTI_SYMBOLS}\s*{NUMERAL}")));
static CODE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"{NUMERAL}\s*{CODE}")));
static CODE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"{CODE}\s*{NUMERAL}")));

/// Compile un motif constant
///
/// Les motifs sont des constantes de ce module, couverts par les tests :
/// un échec ici est un bug de programmation, pas une erreur d'exécution.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid built-in currency pattern")
}

// ============================================================================
// Enum : Strategy
// ============================================================================

/// Une règle de reconnaissance de la cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// "$28", "€ 50"
    SymbolPrefix,
    /// "28$", "50 €"
    SymbolSuffix,
    /// "CA$28", "AU$ 50"
    MultiSymbolPrefix,
    /// "28 USD", "50EUR"
    CodeSuffix,
    /// "USD 28", "EUR50"
    CodePrefix,
}

/// Ordre d'évaluation des stratégies
///
/// Symbole préfixe > symbole suffixe > symbole composé > code suffixe > code préfixe
pub const STRATEGY_ORDER: [Strategy; 5] = [
    Strategy::SymbolPrefix,
    Strategy::SymbolSuffix,
    Strategy::MultiSymbolPrefix,
    Strategy::CodeSuffix,
    Strategy::CodePrefix,
];

impl Strategy {
    /// Nom court pour les logs
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::SymbolPrefix => "symbol-prefix",
            Strategy::SymbolSuffix => "symbol-suffix",
            Strategy::MultiSymbolPrefix => "multi-symbol-prefix",
            Strategy::CodeSuffix => "code-suffix",
            Strategy::CodePrefix => "code-prefix",
        }
    }

    /// Essaie de reconnaître un montant dans `text` (déjà nettoyé)
    ///
    /// Retourne None pour "passer la main" à la stratégie suivante.
    pub fn try_match(&self, text: &str) -> Option<ParsedAmount> {
        match self {
            Strategy::SymbolPrefix => SYMBOL_PREFIX_RE
                .captures_iter(text)
                .filter(|caps| !is_part_of_multi_symbol(text, caps))
                .find_map(|caps| from_symbol(&caps[1], &caps[2])),
            Strategy::SymbolSuffix => SYMBOL_SUFFIX_RE
                .captures(text)
                .and_then(|caps| from_symbol(&caps[2], &caps[1])),
            Strategy::MultiSymbolPrefix => MULTI_SYMBOL_PREFIX_RE
                .captures_iter(text)
                .filter(|caps| !follows_letter(text, caps))
                .find_map(|caps| from_symbol(&caps[1], &caps[2])),
            Strategy::CodeSuffix => CODE_SUFFIX_RE
                .captures(text)
                .and_then(|caps| from_code(&caps[2], &caps[1])),
            Strategy::CodePrefix => CODE_PREFIX_RE
                .captures(text)
                .and_then(|caps| from_code(&caps[1], &caps[2])),
        }
    }
}

/// Un "$" précédé d'un symbole composé complet ("CA$", "A$") appartient à
/// MultiSymbolPrefix. Les autres lettres ("US$", "R$") n'en forment pas :
/// le "$" reste un dollar US.
fn is_part_of_multi_symbol(text: &str, caps: &Captures) -> bool {
    let Some(symbol) = caps.get(1) else {
        return false;
    };
    if symbol.as_str() != "$" {
        return false;
    }

    let before = &text[..symbol.start()];
    let letters_start = before
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphabetic())
        .last()
        .map_or(before.len(), |(i, _)| i);

    MULTI_SYMBOL_LETTERS.contains(&&before[letters_start..])
}

/// Vrai si le symbole capturé est collé à une lettre à sa gauche
/// ("S$" dans "US$" n'est pas un dollar de Singapour)
fn follows_letter(text: &str, caps: &Captures) -> bool {
    caps.get(1).is_some_and(|symbol| {
        text[..symbol.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphabetic())
    })
}

fn from_symbol(symbol: &str, numeral: &str) -> Option<ParsedAmount> {
    let amount = parse_numeral(numeral)?;
    // "$" seul vaut USD ; tout symbole inconnu aussi
    let currency = code_for_symbol(symbol).unwrap_or("USD");
    Some(ParsedAmount::new(amount, currency))
}

fn from_code(code: &str, numeral: &str) -> Option<ParsedAmount> {
    let amount = parse_numeral(numeral)?;
    Some(ParsedAmount::new(amount, code))
}

/// Convertit le nombre reconnu en f64
///
/// Le motif n'accepte que des chiffres ASCII avec au plus un point :
/// la conversion ne peut pas échouer, seul un nombre gigantesque donnerait
/// l'infini, qu'on écarte pour garder un montant fini.
fn parse_numeral(numeral: &str) -> Option<f64> {
    numeral.parse::<f64>().ok().filter(|amount| amount.is_finite())
}

// ============================================================================
// Point d'entrée
// ============================================================================

/// Détecte le premier montant avec devise dans un texte sélectionné
///
/// Pré-traitement : suppression des virgules (séparateurs de milliers)
/// puis des espaces en bordure.
///
/// # Exemple
/// ```
/// use lazyfx::parser::parse;
///
/// let parsed = parse("1,234.56 EUR").unwrap();
/// assert_eq!(parsed.amount, 1234.56);
/// assert_eq!(parsed.currency, "EUR");
/// assert!(parse("hello world").is_none());
/// ```
pub fn parse(text: &str) -> Option<ParsedAmount> {
    let cleaned = text.replace(',', "");
    let cleaned = cleaned.trim();
    trace!(text = %cleaned, "Parsing selected text");

    let found = STRATEGY_ORDER.iter().find_map(|strategy| {
        strategy.try_match(cleaned).map(|parsed| (*strategy, parsed))
    });

    match found {
        Some((strategy, parsed)) => {
            debug!(strategy = strategy.label(), amount = parsed.amount, currency = %parsed.currency, "Currency detected");
            Some(parsed)
        }
        None => {
            debug!(text = %cleaned, "No currency detected");
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
