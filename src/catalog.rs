// Static catalog of the Kraken pairs the analyzer is known to work with.

const SUPPORTED_PAIRS: &[&str] = &[
    "XXBTZEUR", "XXBTZUSD", "XETHZEUR", "XETHZUSD", "XZECZEUR", "XZECZUSD", "XLTCZEUR",
    "XLTCZUSD", "XXRPZEUR", "XXRPZUSD", "XXLMZEUR", "XXMRZEUR", "XETCZEUR", "XREPZEUR",
    "XXDGZEUR", "ADAEUR", "DOTEUR", "SOLEUR", "LINKEUR", "ATOMEUR", "USDTEUR", "ZEURZUSD",
];

/// Supported pair symbols in declaration order.
pub fn list_supported_pairs() -> &'static [&'static str] {
    SUPPORTED_PAIRS
}

pub fn is_supported(symbol: &str) -> bool {
    SUPPORTED_PAIRS.contains(&symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PairSymbol;

    #[test]
    fn catalog_is_non_empty_and_well_formed() {
        let pairs = list_supported_pairs();
        assert!(!pairs.is_empty());
        for pair in pairs {
            assert!(PairSymbol::new(*pair).is_ok(), "malformed symbol {pair}");
        }
    }

    #[test]
    fn catalog_is_stable_across_calls() {
        assert_eq!(list_supported_pairs(), list_supported_pairs());
        assert_eq!(list_supported_pairs()[0], "XXBTZEUR");
    }

    #[test]
    fn membership() {
        assert!(is_supported("XZECZEUR"));
        assert!(!is_supported("xzeczeur"));
        assert!(!is_supported("FOOBAR"));
    }
}
