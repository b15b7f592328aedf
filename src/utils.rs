//! Funções auxiliares: texto de células, valores em BRL e regex.

use crate::types::Money;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::str::FromStr;

/// Normaliza uma sequência de caracteres, colapsando espaços em branco.
fn normalize_chars<I: IntoIterator<Item = char>>(iter: I) -> String {
    let mut output = String::new();
    let mut prev_space = false;
    for ch in iter {
        let is_space = ch.is_whitespace();
        if is_space {
            if !prev_space {
                output.push(' ');
            }
        } else {
            output.push(ch);
        }
        prev_space = is_space;
    }
    output.trim().to_string()
}

/// Junta o texto de todos os descendentes e normaliza os espaços.
pub fn collect_text(element: ElementRef) -> String {
    normalize_chars(element.text().flat_map(|s| s.chars()))
}

/// Converte um valor no formato brasileiro (`1.234,56`) em [`Money`].
///
/// Pontos são separadores de milhar e a vírgula é o separador decimal.
/// Retorna `None` quando o texto não vira um número depois da troca.
pub fn parse_brl_amount(value: &str) -> Option<Money> {
    let normalized = value.trim().replace('.', "").replace(',', ".");
    Money::from_str(&normalized).ok()
}

/// Primeiro grupo de captura de `pattern` em `text`.
pub fn capture_text(text: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Compila um seletor constante do módulo `portal`.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid portal selector")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn parses_thousands_and_decimal_separators() {
        assert_eq!(parse_brl_amount("1.234,56"), Some(Decimal::new(123_456, 2)));
        assert_eq!(parse_brl_amount("0,00"), Some(Decimal::ZERO));
        assert_eq!(parse_brl_amount("12,5"), Some(Decimal::new(125, 1)));
        assert_eq!(
            parse_brl_amount(" 1.000.000,01 "),
            Some(Decimal::new(100_000_001, 2))
        );
    }

    #[test]
    fn rejects_text_that_is_not_a_number() {
        assert_eq!(parse_brl_amount(""), None);
        assert_eq!(parse_brl_amount("R$ 10,00"), None);
        assert_eq!(parse_brl_amount("1,2,3"), None);
        assert_eq!(parse_brl_amount("abc"), None);
    }

    #[test]
    fn collapses_whitespace_in_cells() {
        let html = scraper::Html::parse_fragment("<p>  03/2025 \n\t <b>x</b> </p>");
        let p = html.select(&selector("p")).next().unwrap();
        assert_eq!(collect_text(p), "03/2025 x");
    }
}
