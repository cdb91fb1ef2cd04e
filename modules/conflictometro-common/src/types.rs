use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::normalize::identity_key;

/// Territory assigned when neither the text nor the outlet identifies one.
pub const UNKNOWN_TERRITORY: &str = "no identificado";

/// Locality assigned when the text carries no direct gazetteer mention.
pub const NO_LOCALITY: &str = "no se menciona localidad";

// --- Enums ---

/// Conflict-type taxonomy. Variant order matters nowhere; classification
/// priority lives in the lexicon's declared rule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictType {
    #[serde(rename = "Reivindicativo")]
    Reivindicativo,
    #[serde(rename = "Defensivo")]
    Defensivo,
    #[serde(rename = "Institucional")]
    Institucional,
    #[serde(rename = "Político-solidario")]
    PoliticoSolidario,
    #[serde(rename = "Sindical interno")]
    SindicalInterno,
    #[serde(rename = "Laboral general")]
    LaboralGeneral,
    #[serde(rename = "Indeterminado")]
    Indeterminado,
}

impl ConflictType {
    /// The Spanish label used in the persisted dataset.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConflictType::Reivindicativo => "Reivindicativo",
            ConflictType::Defensivo => "Defensivo",
            ConflictType::Institucional => "Institucional",
            ConflictType::PoliticoSolidario => "Político-solidario",
            ConflictType::SindicalInterno => "Sindical interno",
            ConflictType::LaboralGeneral => "Laboral general",
            ConflictType::Indeterminado => "Indeterminado",
        }
    }

    /// Parse a dataset label. Unknown labels yield `None`; callers decide
    /// whether that falls back to [`ConflictType::default`].
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Reivindicativo" => Some(ConflictType::Reivindicativo),
            "Defensivo" => Some(ConflictType::Defensivo),
            "Institucional" => Some(ConflictType::Institucional),
            "Político-solidario" => Some(ConflictType::PoliticoSolidario),
            "Sindical interno" => Some(ConflictType::SindicalInterno),
            "Laboral general" => Some(ConflictType::LaboralGeneral),
            "Indeterminado" => Some(ConflictType::Indeterminado),
            _ => None,
        }
    }
}

impl Default for ConflictType {
    fn default() -> Self {
        ConflictType::Indeterminado
    }
}

impl std::fmt::Display for ConflictType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

/// Economic-sector taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    #[serde(rename = "educación")]
    Educacion,
    #[serde(rename = "salud")]
    Salud,
    #[serde(rename = "transporte")]
    Transporte,
    #[serde(rename = "industria")]
    Industria,
    #[serde(rename = "estatales")]
    Estatales,
    #[serde(rename = "municipales")]
    Municipales,
    #[serde(rename = "bancarios")]
    Bancarios,
    #[serde(rename = "rurales")]
    Rurales,
    #[serde(rename = "comercio")]
    Comercio,
    #[serde(rename = "servicios")]
    Servicios,
    #[serde(rename = "seguridad")]
    Seguridad,
    #[serde(rename = "general")]
    General,
}

impl Sector {
    pub fn as_label(&self) -> &'static str {
        match self {
            Sector::Educacion => "educación",
            Sector::Salud => "salud",
            Sector::Transporte => "transporte",
            Sector::Industria => "industria",
            Sector::Estatales => "estatales",
            Sector::Municipales => "municipales",
            Sector::Bancarios => "bancarios",
            Sector::Rurales => "rurales",
            Sector::Comercio => "comercio",
            Sector::Servicios => "servicios",
            Sector::Seguridad => "seguridad",
            Sector::General => "general",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "educación" => Some(Sector::Educacion),
            "salud" => Some(Sector::Salud),
            "transporte" => Some(Sector::Transporte),
            "industria" => Some(Sector::Industria),
            "estatales" => Some(Sector::Estatales),
            "municipales" => Some(Sector::Municipales),
            "bancarios" => Some(Sector::Bancarios),
            "rurales" => Some(Sector::Rurales),
            "comercio" => Some(Sector::Comercio),
            "servicios" => Some(Sector::Servicios),
            "seguridad" => Some(Sector::Seguridad),
            "general" => Some(Sector::General),
            _ => None,
        }
    }
}

impl Default for Sector {
    fn default() -> Self {
        Sector::General
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

// --- Enrichment ---

/// Entity/actor/location sets from the external NLP collaborator.
///
/// Optional in every sense: absence or failure of the collaborator degrades
/// to empty sets and never blocks classification or dedup. Ordered sets so
/// serialized output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichment {
    pub entities: BTreeSet<String>,
    pub actors: BTreeSet<String>,
    pub places: BTreeSet<String>,
}

impl Enrichment {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.actors.is_empty() && self.places.is_empty()
    }
}

// --- Article ---

/// One news-article record flowing through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub outlet: String,
    pub body: String,
    /// Date the scraper collected this record, when the source carried one.
    pub surveyed_at: Option<NaiveDate>,
    pub text_length: usize,
    /// Identity key: hex SHA-256 of normalized title + outlet. Computed at
    /// ingestion, immutable afterward.
    pub uid: String,
    pub conflict_type: ConflictType,
    pub sector: Sector,
    pub territory: String,
    pub locality: String,
    pub enrichment: Enrichment,
}

impl Article {
    /// Build a record from the minimum a source row provides. The identity
    /// key and text length are derived; classification fields start at
    /// their defaults until the pipeline populates them.
    pub fn new(
        title: impl Into<String>,
        outlet: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let outlet = outlet.into();
        let body = body.into();
        let uid = identity_key(&title, &outlet);
        let text_length = body.chars().count();
        Self {
            title,
            outlet,
            body,
            surveyed_at: None,
            text_length,
            uid,
            conflict_type: ConflictType::default(),
            sector: Sector::default(),
            territory: UNKNOWN_TERRITORY.to_string(),
            locality: NO_LOCALITY.to_string(),
            enrichment: Enrichment::default(),
        }
    }

    pub fn with_surveyed_at(mut self, date: NaiveDate) -> Self {
        self.surveyed_at = Some(date);
        self
    }

    pub fn with_text_length(mut self, length: usize) -> Self {
        self.text_length = length;
        self
    }
}
