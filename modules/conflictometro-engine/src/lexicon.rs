//! Classification dictionaries and the territory gazetteer.
//!
//! The lexicon is immutable configuration loaded once at startup and
//! injected into the classifier and resolver. Rule order is a semantic
//! contract: a text that triggers several categories gets the first one in
//! declared order, so every collection here is a `Vec`, never a hash map.
//!
//! A built-in lexicon ships with the crate; a TOML file can replace any
//! section for alternate dictionaries (tests, other regions).

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use conflictometro_common::{ConflictType, Sector};

use crate::classify::Classifier;

/// One conflict-type rule: the label and its trigger phrases.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConflictRule {
    pub label: ConflictType,
    pub triggers: Vec<String>,
}

/// One sector rule: the label and its trigger phrases.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectorRule {
    pub label: Sector,
    pub triggers: Vec<String>,
}

/// One gazetteer entry: a territory, its known localities, and the tokens
/// that identify the territory inside an outlet name.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerritoryEntry {
    pub name: String,
    pub localities: Vec<String>,
    #[serde(default)]
    pub outlet_hints: Vec<String>,
}

/// The full dictionary set driving classification, territory resolution and
/// rule-based enrichment.
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub conflict_types: Vec<ConflictRule>,
    pub sectors: Vec<SectorRule>,
    pub gazetteer: Vec<TerritoryEntry>,
    /// Labor organizations the rule-based extractor reports as actors, in
    /// display form.
    pub organizations: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Sections of a TOML lexicon file. Any section left out falls back to the
/// built-in one.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LexiconFile {
    #[serde(default)]
    conflict_type: Option<Vec<ConflictRule>>,
    #[serde(default)]
    sector: Option<Vec<SectorRule>>,
    #[serde(default)]
    territory: Option<Vec<TerritoryEntry>>,
    #[serde(default)]
    organizations: Option<Vec<String>>,
}

impl Lexicon {
    /// Load a lexicon from a TOML file, filling missing sections from the
    /// built-in dictionaries.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file: {}", path.display()))?;
        let file: LexiconFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse lexicon file: {}", path.display()))?;

        let builtin = Self::builtin();
        let lexicon = Self {
            conflict_types: file.conflict_type.unwrap_or(builtin.conflict_types),
            sectors: file.sector.unwrap_or(builtin.sectors),
            gazetteer: file.territory.unwrap_or(builtin.gazetteer),
            organizations: file.organizations.unwrap_or(builtin.organizations),
        };
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Reject lexicons that would silently misclassify: repeated labels
    /// (only the first would ever win) and gazetteer entries with nothing
    /// to match on.
    pub fn validate(&self) -> Result<()> {
        let mut seen_types = Vec::new();
        for rule in &self.conflict_types {
            if seen_types.contains(&rule.label) {
                bail!("Duplicate conflict type rule: {}", rule.label);
            }
            seen_types.push(rule.label);
        }

        let mut seen_sectors = Vec::new();
        for rule in &self.sectors {
            if seen_sectors.contains(&rule.label) {
                bail!("Duplicate sector rule: {}", rule.label);
            }
            seen_sectors.push(rule.label);
        }

        let mut seen_names: Vec<&str> = Vec::new();
        for entry in &self.gazetteer {
            if seen_names.contains(&entry.name.as_str()) {
                bail!("Duplicate territory entry: {}", entry.name);
            }
            seen_names.push(&entry.name);
            if entry.localities.is_empty() && entry.outlet_hints.is_empty() {
                bail!("Territory {} has no localities and no outlet hints", entry.name);
            }
        }

        Ok(())
    }

    /// The conflict-type classifier for this lexicon.
    pub fn conflict_classifier(&self) -> Classifier<ConflictType> {
        Classifier::new(
            self.conflict_types
                .iter()
                .map(|r| (r.label, r.triggers.clone())),
            ConflictType::Indeterminado,
        )
    }

    /// The sector classifier for this lexicon.
    pub fn sector_classifier(&self) -> Classifier<Sector> {
        Classifier::new(
            self.sectors.iter().map(|r| (r.label, r.triggers.clone())),
            Sector::General,
        )
    }

    /// The built-in dictionaries for the Litoral press corpus.
    pub fn builtin() -> Self {
        Self {
            conflict_types: vec![
                rule_type(
                    ConflictType::Reivindicativo,
                    &[
                        "reclamo",
                        "reclaman",
                        "exigen",
                        "pedido",
                        "petitorio",
                        "demanda",
                        "aumento",
                        "paritaria",
                        "incremento",
                        "recomposición",
                        "revisión salarial",
                        "mejora salarial",
                        "convenio colectivo",
                        "mejoras en las condiciones",
                        "regularización",
                        "bono",
                        "equiparación",
                    ],
                ),
                rule_type(
                    ConflictType::Defensivo,
                    &[
                        "despido",
                        "cesante",
                        "cesantías",
                        "suspensión",
                        "lockout",
                        "crisis",
                        "recorte",
                        "cierre",
                        "retiro voluntario",
                        "liquidación",
                        "atraso salarial",
                        "falta de pago",
                        "reducción",
                    ],
                ),
                rule_type(
                    ConflictType::Institucional,
                    &[
                        "ministerio",
                        "intendencia",
                        "municipio",
                        "funcionario",
                        "autoridad",
                        "gobernador",
                        "secretaría",
                        "ministro",
                        "consejo",
                        "gobierno",
                        "paritaria provincial",
                    ],
                ),
                rule_type(
                    ConflictType::PoliticoSolidario,
                    &[
                        "reforma laboral",
                        "protesta nacional",
                        "ajuste del gobierno",
                        "ley",
                        "política nacional",
                        "represión",
                        "crisis económica",
                        "solidaridad",
                    ],
                ),
                rule_type(
                    ConflictType::SindicalInterno,
                    &[
                        "asamblea",
                        "delegados",
                        "comisión directiva",
                        "elección sindical",
                        "internas gremiales",
                        "disputa gremial",
                        "cambio de conducción",
                        "renovación autoridades",
                    ],
                ),
                rule_type(
                    ConflictType::LaboralGeneral,
                    &[
                        "trabajador",
                        "trabajadores",
                        "empleado",
                        "empleados",
                        "paro",
                        "huelga",
                        "manifestación",
                        "piquete",
                    ],
                ),
            ],
            sectors: vec![
                rule_sector(
                    Sector::Educacion,
                    &["docente", "maestro", "profesor", "universidad", "facultad", "escuela", "amafe", "amsafe"],
                ),
                rule_sector(
                    Sector::Salud,
                    &["hospital", "médico", "enfermero", "sanatorio", "clínica", "salud pública"],
                ),
                rule_sector(
                    Sector::Transporte,
                    &["chofer", "colectivo", "transporte", "camionero", "uta", "taxista", "ferroviario"],
                ),
                rule_sector(
                    Sector::Industria,
                    &["fábrica", "metalúrgico", "planta", "obreros", "industrial", "smata", "uom"],
                ),
                rule_sector(
                    Sector::Estatales,
                    &["ate", "upcn", "empleado público", "ministerio", "provincia"],
                ),
                rule_sector(
                    Sector::Municipales,
                    &["municipal", "intendencia", "empleados municipales", "obrador"],
                ),
                rule_sector(Sector::Bancarios, &["banco", "bancario", "la bancaria"]),
                rule_sector(Sector::Rurales, &["campo", "peón", "uatre", "agro", "tractor"]),
                rule_sector(
                    Sector::Comercio,
                    &["empleado de comercio", "supermercado", "vendedor", "shopping"],
                ),
                rule_sector(
                    Sector::Servicios,
                    &["telefonía", "energía", "gas", "agua", "obra social", "electricista"],
                ),
                rule_sector(
                    Sector::Seguridad,
                    &["policía", "penitenciario", "guardia", "bombero"],
                ),
            ],
            gazetteer: vec![
                TerritoryEntry {
                    name: "Santa Fe".to_string(),
                    localities: list(&[
                        "santa fe",
                        "rafaela",
                        "reconquista",
                        "esperanza",
                        "venado tuerto",
                        "santa fe capital",
                        "san lorenzo",
                        "casilda",
                        "galvez",
                        "ceres",
                        "sunchales",
                        "cañada de gómez",
                        "coronda",
                    ]),
                    outlet_hints: list(&["santa fe", "rosario"]),
                },
                TerritoryEntry {
                    name: "Entre Ríos".to_string(),
                    localities: list(&[
                        "paraná",
                        "concordia",
                        "gualeguaychú",
                        "concepción del uruguay",
                        "villaguay",
                        "nogoyá",
                        "victoria",
                        "colón",
                        "gualeguay",
                        "diamante",
                        "feliciano",
                        "san josé",
                        "villa elisa",
                        "ubajay",
                        "oro verde",
                        "santa ana",
                        "liebig",
                        "rosario del tala",
                        "basavilbaso",
                    ]),
                    outlet_hints: list(&["ríos", "entrerios", "paraná"]),
                },
            ],
            organizations: list(&[
                "AMSAFE", "AGMER", "ATE", "UPCN", "UOM", "SMATA", "UTA", "UATRE", "CTERA",
                "CGT", "CTA", "La Bancaria", "SADOP", "FESTRAM",
            ]),
        }
    }
}

fn rule_type(label: ConflictType, triggers: &[&str]) -> ConflictRule {
    ConflictRule { label, triggers: list(triggers) }
}

fn rule_sector(label: Sector, triggers: &[&str]) -> SectorRule {
    SectorRule { label, triggers: list(triggers) }
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
