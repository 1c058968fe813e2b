//! Utility functions and helpers.

pub mod format;

use std::sync::OnceLock;

use regex::Regex;

/// Lower-case a string and strip Portuguese diacritics.
pub fn normalize_text(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Generate a URL-safe slug from free text.
///
/// Accents are stripped, punctuation removed, whitespace runs become a
/// single dash.
pub fn slugify(text: &str) -> String {
    static STRIP: OnceLock<Regex> = OnceLock::new();
    static DASHES: OnceLock<Regex> = OnceLock::new();

    let strip = STRIP.get_or_init(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
    let dashes = DASHES.get_or_init(|| Regex::new(r"[\s-]+").expect("valid regex"));

    let normalized = normalize_text(text);
    let cleaned = strip.replace_all(&normalized, "");
    dashes
        .replace_all(cleaned.trim(), "-")
        .trim_matches('-')
        .to_string()
}

/// Build the detail page slug for a product name.
///
/// Unlike [`slugify`] this keeps accents, matching the links the site
/// has always generated.
pub fn product_slug(produto: &str) -> String {
    produto
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Recover the searchable product name from a detail page slug.
pub fn slug_to_name(slug: &str) -> String {
    slug.replace('-', " ").to_lowercase()
}

/// Capitalize the first letter of each word.
pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("Açúcar Cristal"), "acucar cristal");
        assert_eq!(normalize_text("FEIJÃO"), "feijao");
        assert_eq!(normalize_text("gasolina"), "gasolina");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Óleo de Soja 900ml"), "oleo-de-soja-900ml");
        assert_eq!(slugify("  Gás   de Cozinha! "), "gas-de-cozinha");
        assert_eq!(slugify("Arroz 5kg"), "arroz-5kg");
    }

    #[test]
    fn test_product_slug_keeps_accents() {
        assert_eq!(product_slug("Gás de Cozinha 13kg"), "gás-de-cozinha-13kg");
        assert_eq!(product_slug("Arroz  5kg"), "arroz-5kg");
    }

    #[test]
    fn test_slug_to_name() {
        assert_eq!(slug_to_name("arroz-5kg"), "arroz 5kg");
        assert_eq!(slug_to_name("gasolina-comum"), "gasolina comum");
    }

    #[test]
    fn test_capitalize_words() {
        assert_eq!(capitalize_words("arroz 5kg"), "Arroz 5kg");
        assert_eq!(capitalize_words("gasolina COMUM"), "Gasolina Comum");
        assert_eq!(capitalize_words(""), "");
    }
}
