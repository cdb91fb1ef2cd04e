//! Two-stage territory and locality resolution.
//!
//! Stage 1 searches the text for a gazetteer locality as a whole word;
//! stage 2 falls back to inferring the territory from the outlet name.
//! Explicit textual mention always outranks publication identity, a
//! precision-over-recall ordering.

use regex::Regex;

use conflictometro_common::{normalize, ConflictometroError, NO_LOCALITY, UNKNOWN_TERRITORY};

use crate::lexicon::TerritoryEntry;

struct Locality {
    display: String,
    pattern: Regex,
}

struct CompiledTerritory {
    name: String,
    localities: Vec<Locality>,
    outlet_hints: Vec<String>,
}

/// Gazetteer matcher compiled once from lexicon entries.
pub struct TerritoryResolver {
    territories: Vec<CompiledTerritory>,
}

impl TerritoryResolver {
    pub fn new(gazetteer: &[TerritoryEntry]) -> Result<Self, ConflictometroError> {
        let mut territories = Vec::with_capacity(gazetteer.len());
        for entry in gazetteer {
            let mut localities = Vec::with_capacity(entry.localities.len());
            for raw in &entry.localities {
                let canonical = normalize(raw);
                if canonical.is_empty() {
                    continue;
                }
                let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&canonical)))
                    .map_err(|e| {
                        ConflictometroError::Lexicon(format!(
                            "Invalid locality pattern for {raw:?}: {e}"
                        ))
                    })?;
                localities.push(Locality { display: capitalize(&canonical), pattern });
            }
            let outlet_hints = entry
                .outlet_hints
                .iter()
                .map(|h| normalize(h))
                .filter(|h| !h.is_empty())
                .collect();
            territories.push(CompiledTerritory {
                name: entry.name.clone(),
                localities,
                outlet_hints,
            });
        }
        Ok(Self { territories })
    }

    /// Resolve `(territory, locality)` for a record. The first gazetteer
    /// locality found in the text wins, in declaration order; only when no
    /// locality matches is the outlet name consulted.
    pub fn resolve(&self, text: &str, outlet: &str) -> (String, String) {
        let text = normalize(text);
        let outlet = normalize(outlet);

        for territory in &self.territories {
            for locality in &territory.localities {
                if locality.pattern.is_match(&text) {
                    return (territory.name.clone(), locality.display.clone());
                }
            }
        }

        for territory in &self.territories {
            if territory.outlet_hints.iter().any(|h| outlet.contains(h.as_str())) {
                return (territory.name.clone(), NO_LOCALITY.to_string());
            }
        }

        (UNKNOWN_TERRITORY.to_string(), NO_LOCALITY.to_string())
    }
}

/// First character uppercased, the rest left as-is (localities are stored
/// normalized, so the rest is already lowercase).
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;

    fn resolver() -> TerritoryResolver {
        TerritoryResolver::new(&Lexicon::builtin().gazetteer).unwrap()
    }

    #[test]
    fn direct_locality_match() {
        let (territory, locality) =
            resolver().resolve("Los docentes de Rafaela reclaman mejoras", "El Litoral");
        assert_eq!(territory, "Santa Fe");
        assert_eq!(locality, "Rafaela");
    }

    #[test]
    fn accented_locality_matches_whole_word() {
        let (territory, locality) =
            resolver().resolve("movilización en Paraná por los despidos", "diario local");
        assert_eq!(territory, "Entre Ríos");
        assert_eq!(locality, "Paraná");
    }

    #[test]
    fn locality_inside_larger_word_does_not_match() {
        // "ceres" must not match inside "terceres"; no other locality or
        // hint applies, so the record stays unresolved.
        let (territory, locality) = resolver().resolve("los terceres puestos", "boletín");
        assert_eq!(territory, UNKNOWN_TERRITORY);
        assert_eq!(locality, NO_LOCALITY);
    }

    #[test]
    fn text_mention_outranks_outlet_inference() {
        // Outlet says Entre Ríos; text says Rafaela. The explicit mention
        // wins.
        let (territory, locality) =
            resolver().resolve("protesta docente en Rafaela", "Uno Entre Ríos");
        assert_eq!(territory, "Santa Fe");
        assert_eq!(locality, "Rafaela");
    }

    #[test]
    fn outlet_fallback_when_text_is_silent() {
        let (territory, locality) =
            resolver().resolve("los gremios anunciaron medidas de fuerza", "Rosario3");
        assert_eq!(territory, "Santa Fe");
        assert_eq!(locality, NO_LOCALITY);
    }

    #[test]
    fn outlet_fallback_entre_rios() {
        let (territory, locality) =
            resolver().resolve("nuevo paro anunciado para la semana próxima", "El Once Entre Ríos");
        assert_eq!(territory, "Entre Ríos");
        assert_eq!(locality, NO_LOCALITY);
    }

    #[test]
    fn nothing_resolves_to_unknown() {
        let (territory, locality) = resolver().resolve("", "");
        assert_eq!(territory, UNKNOWN_TERRITORY);
        assert_eq!(locality, NO_LOCALITY);
    }

    #[test]
    fn multi_word_locality_matches() {
        let (territory, locality) =
            resolver().resolve("acto en Venado Tuerto por los despidos", "La Capital");
        assert_eq!(territory, "Santa Fe");
        assert_eq!(locality, "Venado tuerto");
    }

    #[test]
    fn gazetteer_declaration_order_decides_first_match() {
        // Text mentions both a Santa Fe and an Entre Ríos locality; Santa
        // Fe is declared first in the gazetteer.
        let (territory, locality) =
            resolver().resolve("delegaciones de Rafaela y Concordia", "agencia");
        assert_eq!(territory, "Santa Fe");
        assert_eq!(locality, "Rafaela");
    }

    #[test]
    fn capitalize_handles_accents_and_empty() {
        assert_eq!(capitalize("paraná"), "Paraná");
        assert_eq!(capitalize("venado tuerto"), "Venado tuerto");
        assert_eq!(capitalize(""), "");
    }
}
