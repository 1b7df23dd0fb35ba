//! Home Document Model
//!
//! The home page is a single JSON object. Sector and "o que esperar" card
//! fields live under numbered keys on disk (`expositor_setor3_logos`,
//! `oqueesperar_card2_img`) and are lifted into ordered collections here.
//! Keys the model does not know are carried through untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Sectors 1..=4 always exist and can never be removed
pub const MIN_PROTECTED_SECTORS: usize = 4;

/// Upper bound on `total_setores_expositor`
pub const MAX_SECTORS: usize = 64;

/// Number of "o que esperar" cards
pub const EXPECTATION_CARD_COUNT: usize = 8;

/// Number of positional image slots in the "A Feira" section
pub const AFEIRA_SLOT_COUNT: usize = 3;

const SECTOR_PREFIX: &str = "expositor_setor";
const CARD_PREFIX: &str = "oqueesperar_card";

/// Exhibitor sector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    /// Display name; `None` when never written
    pub texto: Option<String>,
    /// Accumulated logo paths, in upload order
    pub logos: Vec<String>,
}

impl Sector {
    /// A sector is live when it has a name or at least one logo
    pub fn is_live(&self) -> bool {
        self.texto.is_some() || !self.logos.is_empty()
    }
}

/// "O que esperar" card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectationCard {
    pub texto: Option<String>,
    pub img: String,
}

/// One day of the schedule (`programacao_online` / `programacao_presencial`)
///
/// Entries are free-form objects; only `data` is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleEntry(pub Map<String, Value>);

impl ScheduleEntry {
    /// The `data` field, when it is a string
    pub fn date(&self) -> Option<&str> {
        self.0.get("data").and_then(Value::as_str)
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.0.insert("data".to_string(), Value::String(date.into()));
    }
}

/// Home page document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawHomeDocument", into = "RawHomeDocument")]
pub struct HomeDocument {
    pub banner: String,
    /// Pre-single-banner format, dropped on the next update
    pub banners: Option<Vec<Value>>,

    pub faixa_titulo: Option<String>,
    pub faixa_texto: Option<String>,
    pub faixa_botao_texto: Option<String>,
    pub faixa_botao_url: Option<String>,
    pub faixa_botao_ativo: bool,

    /// ISO-8601 UTC instant of the fair
    pub contador_data_feira: Option<String>,
    pub contador_data_ativo: bool,

    pub local_maps_url: Option<String>,
    pub local_endereco: Option<String>,

    pub afeira_titulo: Option<String>,
    pub afeira_texto: Option<String>,
    pub afeira_imagens: Vec<String>,

    pub mapa_imagem: String,

    pub oqueesperar_titulo: Option<String>,
    /// Always [`EXPECTATION_CARD_COUNT`] entries
    pub cards: Vec<ExpectationCard>,

    pub expositor_titulo: Option<String>,
    /// Index 0 is sector 1; never shorter than [`MIN_PROTECTED_SECTORS`]
    pub sectors: Vec<Sector>,

    pub programacao_online: Option<Vec<ScheduleEntry>>,
    pub programacao_presencial: Option<Vec<ScheduleEntry>>,

    pub material_manual: String,
    pub material_release: String,

    /// Keys not modelled above
    pub extra: Map<String, Value>,
}

impl Default for HomeDocument {
    fn default() -> Self {
        Self::from(RawHomeDocument::default())
    }
}

impl HomeDocument {
    /// Sector by 1-based index
    pub fn sector(&self, setor: usize) -> Option<&Sector> {
        setor.checked_sub(1).and_then(|i| self.sectors.get(i))
    }

    /// Mutable sector by 1-based index
    pub fn sector_mut(&mut self, setor: usize) -> Option<&mut Sector> {
        setor.checked_sub(1).and_then(move |i| self.sectors.get_mut(i))
    }

    /// Pad to the protected minimum and drop trailing sectors that are not live
    pub fn normalize_sectors(&mut self) {
        while self.sectors.len() > MIN_PROTECTED_SECTORS
            && self.sectors.last().is_some_and(|s| !s.is_live())
        {
            self.sectors.pop();
        }
        if self.sectors.len() < MIN_PROTECTED_SECTORS {
            self.sectors.resize_with(MIN_PROTECTED_SECTORS, Sector::default);
        }
    }
}

// ==================== On-disk representation ====================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RawHomeDocument {
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    banner: Option<String>,
    #[serde(deserialize_with = "lenient_array", skip_serializing_if = "Option::is_none")]
    banners: Option<Vec<Value>>,

    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    faixa_titulo: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    faixa_texto: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    faixa_botao_texto: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    faixa_botao_url: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    faixa_botao_ativo: bool,

    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    contador_data_feira: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    contador_data_ativo: bool,

    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    local_maps_url: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    local_endereco: Option<String>,

    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    afeira_titulo: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    afeira_texto: Option<String>,
    #[serde(deserialize_with = "lenient_slot_list")]
    afeira_imagens: Vec<String>,

    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    mapa_imagem: Option<String>,

    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    oqueesperar_titulo: Option<String>,

    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    expositor_titulo: Option<String>,

    #[serde(deserialize_with = "lenient_schedule", skip_serializing_if = "Option::is_none")]
    programacao_online: Option<Vec<ScheduleEntry>>,
    #[serde(deserialize_with = "lenient_schedule", skip_serializing_if = "Option::is_none")]
    programacao_presencial: Option<Vec<ScheduleEntry>>,

    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    material_manual: Option<String>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    material_release: Option<String>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Split `expositor_setor12_logos` into `(12, "logos")`
fn numbered_key<'a>(key: &'a str, prefix: &str) -> Option<(usize, &'a str)> {
    let rest = key.strip_prefix(prefix)?;
    let (digits, suffix) = rest.split_once('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: usize = digits.parse().ok()?;
    (index >= 1).then_some((index, suffix))
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_to_string_list(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn take_sectors(extra: &mut Map<String, Value>) -> Vec<Sector> {
    let keys: Vec<(String, usize, bool)> = extra
        .keys()
        .filter_map(|k| {
            let (index, suffix) = numbered_key(k, SECTOR_PREFIX)?;
            match suffix {
                "texto" => Some((k.clone(), index, true)),
                "logos" => Some((k.clone(), index, false)),
                _ => None,
            }
        })
        .collect();

    let mut by_index: BTreeMap<usize, Sector> = BTreeMap::new();
    for (key, index, is_text) in keys {
        let Some(value) = extra.remove(&key) else {
            continue;
        };
        let sector = by_index.entry(index).or_default();
        if is_text {
            sector.texto = value_to_string(value);
        } else {
            sector.logos = value_to_string_list(value);
        }
    }

    let len = by_index
        .iter()
        .filter(|(_, s)| s.is_live())
        .map(|(i, _)| *i)
        .max()
        .unwrap_or(0)
        .max(MIN_PROTECTED_SECTORS);

    (1..=len)
        .map(|i| by_index.remove(&i).unwrap_or_default())
        .collect()
}

fn take_cards(extra: &mut Map<String, Value>) -> Vec<ExpectationCard> {
    (1..=EXPECTATION_CARD_COUNT)
        .map(|i| ExpectationCard {
            texto: extra
                .remove(&format!("{CARD_PREFIX}{i}_texto"))
                .and_then(value_to_string),
            img: extra
                .remove(&format!("{CARD_PREFIX}{i}_img"))
                .and_then(value_to_string)
                .unwrap_or_default(),
        })
        .collect()
}

impl From<RawHomeDocument> for HomeDocument {
    fn from(mut raw: RawHomeDocument) -> Self {
        let sectors = take_sectors(&mut raw.extra);
        let cards = take_cards(&mut raw.extra);
        Self {
            banner: raw.banner.unwrap_or_default(),
            banners: raw.banners,
            faixa_titulo: raw.faixa_titulo,
            faixa_texto: raw.faixa_texto,
            faixa_botao_texto: raw.faixa_botao_texto,
            faixa_botao_url: raw.faixa_botao_url,
            faixa_botao_ativo: raw.faixa_botao_ativo,
            contador_data_feira: raw.contador_data_feira,
            contador_data_ativo: raw.contador_data_ativo,
            local_maps_url: raw.local_maps_url,
            local_endereco: raw.local_endereco,
            afeira_titulo: raw.afeira_titulo,
            afeira_texto: raw.afeira_texto,
            afeira_imagens: raw.afeira_imagens,
            mapa_imagem: raw.mapa_imagem.unwrap_or_default(),
            oqueesperar_titulo: raw.oqueesperar_titulo,
            cards,
            expositor_titulo: raw.expositor_titulo,
            sectors,
            programacao_online: raw.programacao_online,
            programacao_presencial: raw.programacao_presencial,
            material_manual: raw.material_manual.unwrap_or_default(),
            material_release: raw.material_release.unwrap_or_default(),
            extra: raw.extra,
        }
    }
}

impl From<HomeDocument> for RawHomeDocument {
    fn from(doc: HomeDocument) -> Self {
        let mut extra = doc.extra;
        for (i, card) in doc.cards.into_iter().enumerate() {
            let n = i + 1;
            if let Some(texto) = card.texto {
                extra.insert(format!("{CARD_PREFIX}{n}_texto"), Value::String(texto));
            }
            extra.insert(format!("{CARD_PREFIX}{n}_img"), Value::String(card.img));
        }
        for (i, sector) in doc.sectors.into_iter().enumerate() {
            let n = i + 1;
            if let Some(texto) = sector.texto {
                extra.insert(format!("{SECTOR_PREFIX}{n}_texto"), Value::String(texto));
            }
            extra.insert(
                format!("{SECTOR_PREFIX}{n}_logos"),
                Value::Array(sector.logos.into_iter().map(Value::String).collect()),
            );
        }
        Self {
            banner: Some(doc.banner),
            banners: doc.banners,
            faixa_titulo: doc.faixa_titulo,
            faixa_texto: doc.faixa_texto,
            faixa_botao_texto: doc.faixa_botao_texto,
            faixa_botao_url: doc.faixa_botao_url,
            faixa_botao_ativo: doc.faixa_botao_ativo,
            contador_data_feira: doc.contador_data_feira,
            contador_data_ativo: doc.contador_data_ativo,
            local_maps_url: doc.local_maps_url,
            local_endereco: doc.local_endereco,
            afeira_titulo: doc.afeira_titulo,
            afeira_texto: doc.afeira_texto,
            afeira_imagens: doc.afeira_imagens,
            mapa_imagem: Some(doc.mapa_imagem),
            oqueesperar_titulo: doc.oqueesperar_titulo,
            expositor_titulo: doc.expositor_titulo,
            programacao_online: doc.programacao_online,
            programacao_presencial: doc.programacao_presencial,
            material_manual: Some(doc.material_manual),
            material_release: Some(doc.material_release),
            extra,
        }
    }
}

// ==================== Lenient field decoding ====================
//
// Hand-edited files may carry nulls or mistyped values. Bad values degrade to
// "absent" instead of failing the whole document.

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(value_to_string(Value::deserialize(d)?))
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => b,
        Value::String(s) => s == "true" || s == "on",
        _ => false,
    })
}

fn lenient_array<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<Value>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => Some(items),
        _ => None,
    })
}

fn lenient_string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(value_to_string_list(Value::deserialize(d)?))
}

/// Positional list: a non-string entry becomes `""` and keeps its index
fn lenient_slot_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .map(|v| match v {
                Value::String(s) => s,
                _ => String::new(),
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_schedule<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<Vec<ScheduleEntry>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(map) => Some(ScheduleEntry(map)),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}
