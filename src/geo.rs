//! Plots listings on the feed map by scanning their free-text location
//! for a known Brazilian city, state or abbreviation. Longest keys are
//! tried first and only whole-word occurrences count, so "MA" never fires
//! inside "Palmas" and "São Paulo - SP" resolves to the city, not the
//! state code.

use std::sync::LazyLock;

/// Fallback when no listing location matches: the federal capital.
pub const DEFAULT_POINT: (f64, f64) = (-15.7939, -47.8828);

// Keys are pre-normalized: lowercase, accents stripped. States and their
// two-letter codes resolve to the state capital.
const PLACES: &[(&str, f64, f64)] = &[
    // Capitals
    ("rio branco", -9.9754, -67.8249),
    ("maceio", -9.6498, -35.7089),
    ("macapa", 0.0349, -51.0694),
    ("manaus", -3.1190, -60.0217),
    ("salvador", -12.9777, -38.5016),
    ("fortaleza", -3.7319, -38.5267),
    ("brasilia", -15.7939, -47.8828),
    ("vitoria", -20.3155, -40.3128),
    ("goiania", -16.6869, -49.2648),
    ("sao luis", -2.5307, -44.3068),
    ("cuiaba", -15.6014, -56.0979),
    ("campo grande", -20.4697, -54.6201),
    ("belo horizonte", -19.9167, -43.9345),
    ("belem", -1.4558, -48.4902),
    ("joao pessoa", -7.1195, -34.8450),
    ("curitiba", -25.4284, -49.2733),
    ("recife", -8.0476, -34.8770),
    ("teresina", -5.0892, -42.8019),
    ("rio de janeiro", -22.9068, -43.1729),
    ("natal", -5.7945, -35.2110),
    ("porto alegre", -30.0346, -51.2177),
    ("porto velho", -8.7612, -63.9004),
    ("boa vista", 2.8235, -60.6758),
    ("florianopolis", -27.5954, -48.5480),
    ("sao paulo", -23.5505, -46.6333),
    ("aracaju", -10.9472, -37.0731),
    ("palmas", -10.2491, -48.3243),
    // Other large cities
    ("campinas", -22.9099, -47.0626),
    ("guarulhos", -23.4545, -46.5333),
    ("santos", -23.9618, -46.3322),
    ("sao jose dos campos", -23.2237, -45.9009),
    ("ribeirao preto", -21.1775, -47.8103),
    ("uberlandia", -18.9186, -48.2772),
    ("juiz de fora", -21.7642, -43.3503),
    ("niteroi", -22.8832, -43.1034),
    ("londrina", -23.3045, -51.1696),
    ("joinville", -26.3044, -48.8487),
    ("caxias do sul", -29.1678, -51.1794),
    ("feira de santana", -12.2664, -38.9663),
    // States (by capital)
    ("acre", -9.9754, -67.8249),
    ("alagoas", -9.6498, -35.7089),
    ("amapa", 0.0349, -51.0694),
    ("amazonas", -3.1190, -60.0217),
    ("bahia", -12.9777, -38.5016),
    ("ceara", -3.7319, -38.5267),
    ("distrito federal", -15.7939, -47.8828),
    ("espirito santo", -20.3155, -40.3128),
    ("goias", -16.6869, -49.2648),
    ("maranhao", -2.5307, -44.3068),
    ("mato grosso", -15.6014, -56.0979),
    ("mato grosso do sul", -20.4697, -54.6201),
    ("minas gerais", -19.9167, -43.9345),
    ("para", -1.4558, -48.4902),
    ("paraiba", -7.1195, -34.8450),
    ("parana", -25.4284, -49.2733),
    ("pernambuco", -8.0476, -34.8770),
    ("piaui", -5.0892, -42.8019),
    ("rio grande do norte", -5.7945, -35.2110),
    ("rio grande do sul", -30.0346, -51.2177),
    ("rondonia", -8.7612, -63.9004),
    ("roraima", 2.8235, -60.6758),
    ("santa catarina", -27.5954, -48.5480),
    ("sergipe", -10.9472, -37.0731),
    ("tocantins", -10.2491, -48.3243),
    // State codes (by capital)
    ("ac", -9.9754, -67.8249),
    ("al", -9.6498, -35.7089),
    ("ap", 0.0349, -51.0694),
    ("am", -3.1190, -60.0217),
    ("ba", -12.9777, -38.5016),
    ("ce", -3.7319, -38.5267),
    ("df", -15.7939, -47.8828),
    ("es", -20.3155, -40.3128),
    ("go", -16.6869, -49.2648),
    ("ma", -2.5307, -44.3068),
    ("mt", -15.6014, -56.0979),
    ("ms", -20.4697, -54.6201),
    ("mg", -19.9167, -43.9345),
    ("pa", -1.4558, -48.4902),
    ("pb", -7.1195, -34.8450),
    ("pr", -25.4284, -49.2733),
    ("pe", -8.0476, -34.8770),
    ("pi", -5.0892, -42.8019),
    ("rj", -22.9068, -43.1729),
    ("rn", -5.7945, -35.2110),
    ("rs", -30.0346, -51.2177),
    ("ro", -8.7612, -63.9004),
    ("rr", 2.8235, -60.6758),
    ("sc", -27.5954, -48.5480),
    ("sp", -23.5505, -46.6333),
    ("se", -10.9472, -37.0731),
    ("to", -10.2491, -48.3243),
    // Country
    ("brasil", -15.7939, -47.8828),
];

// Longest key first, so "sao paulo" beats "sp" and "mato grosso do sul"
// beats "mato grosso".
static ORDERED: LazyLock<Vec<&'static (&'static str, f64, f64)>> = LazyLock::new(|| {
    let mut places: Vec<_> = PLACES.iter().collect();
    places.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    places
});

/// Lowercase and strip the accented characters that appear in Brazilian
/// place names.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
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

/// Whole-word occurrence check: the match must not touch an alphanumeric
/// character on either side.
fn contains_word(text: &str, key: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = text[start..].find(key) {
        let begin = start + pos;
        let end = begin + key.len();
        let bounded_before = text[..begin]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let bounded_after = text[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        if bounded_before && bounded_after {
            return true;
        }
        start = begin
            + text[begin..]
                .chars()
                .next()
                .map_or(1, |c| c.len_utf8());
    }
    false
}

/// Coordinates for a free-text listing location, if any table key occurs
/// in it as a whole word. The first (longest) match wins.
pub fn locate(location: &str) -> Option<(f64, f64)> {
    let text = normalize(location);
    ORDERED
        .iter()
        .find(|(key, _, _)| contains_word(&text, key))
        .map(|(_, lat, lon)| (*lat, *lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents() {
        assert_eq!(normalize("São Paulo"), "sao paulo");
        assert_eq!(normalize("Florianópolis - SC"), "florianopolis - sc");
        assert_eq!(normalize("Conceição do Araguaia"), "conceicao do araguaia");
    }

    #[test]
    fn test_longest_match_wins_over_state_code() {
        // Both "sao paulo" and "sp" occur; the city must win.
        let sp = locate("São Paulo - SP").unwrap();
        assert_eq!(sp, (-23.5505, -46.6333));
    }

    #[test]
    fn test_word_boundary_blocks_embedded_codes() {
        // "Palmas" contains "pa", "al" and "ma" as substrings; none of the
        // two-letter codes may fire inside it.
        let palmas = locate("Palmas").unwrap();
        assert_eq!(palmas, (-10.2491, -48.3243));

        // "to" inside "Tocantins" must not match either; the state name does.
        let tocantins = locate("interior do Tocantins").unwrap();
        assert_eq!(tocantins, (-10.2491, -48.3243));
    }

    #[test]
    fn test_state_code_matches_as_own_word() {
        let rj = locate("Escritório central, RJ").unwrap();
        assert_eq!(rj, (-22.9068, -43.1729));
    }

    #[test]
    fn test_compound_state_name_beats_prefix() {
        let ms = locate("Mato Grosso do Sul").unwrap();
        assert_eq!(ms, (-20.4697, -54.6201));
        let mt = locate("Mato Grosso").unwrap();
        assert_eq!(mt, (-15.6014, -56.0979));
    }

    #[test]
    fn test_unknown_location_yields_none() {
        assert_eq!(locate("Remoto"), None);
        assert_eq!(locate(""), None);
        assert_eq!(locate("Lisboa, Portugal"), None);
    }

    #[test]
    fn test_punctuation_is_a_boundary() {
        let sp = locate("Híbrido (SP)").unwrap();
        assert_eq!(sp, (-23.5505, -46.6333));
    }
}
