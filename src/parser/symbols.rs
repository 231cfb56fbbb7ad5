// ============================================================================
// Table des symboles monétaires
// ============================================================================
// Correspondance statique symbole -> code devise, en lecture seule
//
// CONCEPT RUST : &'static [(&str, &str)]
// - Slice de tuples stockée dans le binaire (aucune allocation)
// - L'ordre compte : pour la recherche inverse (code -> symbole),
//   le premier symbole trouvé est le symbole "préféré"
// ============================================================================

/// Symboles connus et leur code devise
pub const SYMBOL_TABLE: &[(&str, &str)] = &[
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("¥", "JPY"),
    ("₹", "INR"),
    ("₽", "RUB"),
    ("₪", "ILS"),
    ("CA$", "CAD"),
    ("A$", "AUD"),
    ("C$", "CAD"),
    ("AU$", "AUD"),
    ("NZ$", "NZD"),
    ("HK$", "HKD"),
    ("S$", "SGD"),
    ("kr", "SEK"),
    ("CHF", "CHF"),
];

/// Code devise associé à un symbole (ex: "€" -> "EUR")
pub fn code_for_symbol(symbol: &str) -> Option<&'static str> {
    SYMBOL_TABLE
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, code)| *code)
}

/// Symbole d'affichage préféré pour un code (ex: "ILS" -> "₪")
pub fn display_symbol(code: &str) -> Option<&'static str> {
    SYMBOL_TABLE
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(symbol, _)| *symbol)
}
