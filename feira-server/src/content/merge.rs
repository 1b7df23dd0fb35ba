//! Home document merge
//!
//! [`apply`] folds one [`HomeUpdate`] into the stored document. Field
//! policies:
//!
//! | Kind | Rule |
//! |------|------|
//! | single image | new file, else previous value, else `""` |
//! | sector logos | previous ++ uploaded, no dedup, no cap |
//! | `afeira_imagens` | 3 slots, each replaced or kept |
//! | flags | recomputed from input every time; absent is `false` |
//! | text | overwritten when the key is present (even empty) |
//! | schedules | replaced from JSON text; unparseable text gives `[]` |

use shared::models::{
    AFEIRA_SLOT_COUNT, EXPECTATION_CARD_COUNT, ExpectationCard, HomeDocument, MAX_SECTORS,
    MIN_PROTECTED_SECTORS, ScheduleEntry, Sector,
};
use std::collections::BTreeSet;

use super::dates::{normalize_entries, parse_countdown};
use super::field::HomeUpdate;

const SECTOR_PREFIX: &str = "expositor_setor";

/// Apply `update` to `current` and return the new document
pub fn apply(mut doc: HomeDocument, update: &HomeUpdate) -> HomeDocument {
    merge_banner(&mut doc, update);
    merge_afeira_slots(&mut doc, update);
    doc.mapa_imagem = single_image(update, "mapa_imagem", &doc.mapa_imagem);

    overwrite(&mut doc.faixa_titulo, update, "faixa_titulo");
    overwrite(&mut doc.faixa_texto, update, "faixa_texto");
    overwrite(&mut doc.faixa_botao_texto, update, "faixa_botao_texto");
    overwrite(&mut doc.faixa_botao_url, update, "faixa_botao_url");
    doc.faixa_botao_ativo = update.field("faixa_botao_ativo").is_truthy();

    if let Some(raw) = update.field("contador_data_feira").as_str() {
        match parse_countdown(raw) {
            Some(iso) => doc.contador_data_feira = Some(iso),
            None => tracing::warn!(value = %raw, "Ignoring unparseable countdown date"),
        }
    }
    doc.contador_data_ativo = update.field("contador_data_ativo").is_truthy();

    overwrite(&mut doc.local_maps_url, update, "local_maps_url");
    overwrite(&mut doc.local_endereco, update, "local_endereco");
    overwrite(&mut doc.afeira_titulo, update, "afeira_titulo");
    overwrite(&mut doc.afeira_texto, update, "afeira_texto");
    overwrite(&mut doc.oqueesperar_titulo, update, "oqueesperar_titulo");
    merge_cards(&mut doc, update);

    overwrite(&mut doc.expositor_titulo, update, "expositor_titulo");
    merge_sectors(&mut doc, update);

    if let Some(entries) = schedule(update, "programacao_online") {
        doc.programacao_online = Some(entries);
    }
    if let Some(entries) = schedule(update, "programacao_presencial") {
        doc.programacao_presencial = Some(entries);
    }

    doc.material_manual = single_image(update, "material_manual", &doc.material_manual);
    doc.material_release = single_image(update, "material_release", &doc.material_release);

    doc
}

fn overwrite(slot: &mut Option<String>, update: &HomeUpdate, key: &str) {
    if let Some(value) = update.field(key).overwrite() {
        *slot = Some(value);
    }
}

fn single_image(update: &HomeUpdate, field: &str, previous: &str) -> String {
    match update.file_for(field) {
        Some(file) => file.stored_path.clone(),
        None => previous.to_string(),
    }
}

/// Single banner, migrating the legacy `banners` list
fn merge_banner(doc: &mut HomeDocument, update: &HomeUpdate) {
    if let Some(file) = update.file_for("banner") {
        doc.banner = file.stored_path.clone();
    } else if doc.banner.is_empty() {
        let legacy = doc
            .banners
            .as_ref()
            .and_then(|list| list.first())
            .and_then(legacy_banner_path);
        if let Some(path) = legacy {
            tracing::info!(banner = %path, "Migrated legacy banner list to single banner");
            doc.banner = path;
        }
    }
    if doc.banners.take().is_some() {
        tracing::info!("Dropped legacy banners field");
    }
}

/// `arquivo`, falling back to `src`, of a legacy banner entry
fn legacy_banner_path(entry: &serde_json::Value) -> Option<String> {
    ["arquivo", "src"]
        .iter()
        .filter_map(|k| entry.get(*k).and_then(|v| v.as_str()))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn merge_afeira_slots(doc: &mut HomeDocument, update: &HomeUpdate) {
    let slots: Vec<String> = (0..AFEIRA_SLOT_COUNT)
        .map(|i| {
            let field = format!("afeira_imagem{}", i + 1);
            match update.file_for(&field) {
                Some(file) => file.stored_path.clone(),
                None => doc.afeira_imagens.get(i).cloned().unwrap_or_default(),
            }
        })
        .collect();
    doc.afeira_imagens = slots;
}

fn merge_cards(doc: &mut HomeDocument, update: &HomeUpdate) {
    doc.cards
        .resize_with(EXPECTATION_CARD_COUNT, ExpectationCard::default);
    for (i, card) in doc.cards.iter_mut().enumerate() {
        let n = i + 1;
        overwrite(&mut card.texto, update, &format!("oqueesperar_card{n}_texto"));
        card.img = single_image(update, &format!("oqueesperar_card{n}_img"), &card.img);
    }
}

/// JavaScript-style `parseInt`: optional sign and leading digits
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Sector indices mentioned by this update's fields or files
fn referenced_sectors(update: &HomeUpdate) -> BTreeSet<usize> {
    let field_keys = update.fields.keys();
    let file_keys = update.files.iter().map(|f| f.field_name.as_str());
    field_keys
        .chain(file_keys)
        .filter_map(|key| {
            let rest = key.strip_prefix(SECTOR_PREFIX)?;
            let (digits, suffix) = rest.split_once('_')?;
            if suffix != "texto" && suffix != "logos" {
                return None;
            }
            digits.parse::<usize>().ok().filter(|i| *i >= 1)
        })
        .collect()
}

/// Sector text and logo accumulation for sectors 1..=total
///
/// `total` is `total_setores_expositor` clamped to `4..=MAX_SECTORS`. The
/// loop stops at the last sector this update touches or the document already
/// holds.
fn merge_sectors(doc: &mut HomeDocument, update: &HomeUpdate) {
    let requested = update
        .field("total_setores_expositor")
        .as_str()
        .and_then(parse_leading_int)
        .filter(|n| *n > MIN_PROTECTED_SECTORS as i64)
        .map(|n| usize::try_from(n).unwrap_or(usize::MAX).min(MAX_SECTORS))
        .unwrap_or(MIN_PROTECTED_SECTORS);

    let touched = referenced_sectors(update)
        .into_iter()
        .filter(|i| *i <= requested)
        .max()
        .unwrap_or(0);
    let upto = requested
        .min(touched.max(doc.sectors.len()))
        .max(MIN_PROTECTED_SECTORS);

    if doc.sectors.len() < upto {
        doc.sectors.resize_with(upto, Sector::default);
    }

    for (i, sector) in doc.sectors.iter_mut().take(upto).enumerate() {
        let n = i + 1;
        overwrite(&mut sector.texto, update, &format!("{SECTOR_PREFIX}{n}_texto"));

        let logos_key = format!("{SECTOR_PREFIX}{n}_logos");
        let before = sector.logos.len();
        sector
            .logos
            .extend(update.files_for(&logos_key).map(|f| f.stored_path.clone()));
        let added = sector.logos.len() - before;
        if added > 0 {
            tracing::info!(setor = n, added, total = sector.logos.len(), "Sector logos appended");
        }
    }

    doc.normalize_sectors();
}

/// Replacement schedule, when the field is present
fn schedule(update: &HomeUpdate, key: &str) -> Option<Vec<ScheduleEntry>> {
    let raw = update.field(key).as_str()?;
    let mut entries = match serde_json::from_str::<Vec<ScheduleEntry>>(raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(field = key, error = %e, "Invalid schedule JSON, storing empty list");
            Vec::new()
        }
    };
    normalize_entries(&mut entries);
    Some(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::field::{FormFields, UploadedFile};
    use serde_json::json;

    fn file(field: &str, path: &str) -> UploadedFile {
        UploadedFile {
            field_name: field.into(),
            stored_path: path.into(),
            size_bytes: 10,
        }
    }

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs.iter().copied().collect()
    }

    fn doc_from(value: serde_json::Value) -> HomeDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_logos_are_appended() {
        let doc = doc_from(json!({"expositor_setor1_logos": ["/uploads/a.png"]}));
        let update = HomeUpdate::new(
            FormFields::new(),
            vec![file("expositor_setor1_logos", "/uploads/new.png")],
        );
        let doc = apply(doc, &update);
        assert_eq!(doc.sectors[0].logos, vec!["/uploads/a.png", "/uploads/new.png"]);
    }

    #[test]
    fn test_logos_unchanged_without_files() {
        let doc = doc_from(json!({"expositor_setor2_logos": ["/uploads/a.png", "/uploads/b.png"]}));
        let doc = apply(doc, &HomeUpdate::default());
        assert_eq!(doc.sectors[1].logos.len(), 2);
    }

    #[test]
    fn test_logos_grow_monotonically() {
        let mut doc = HomeDocument::default();
        let mut last = 0;
        for round in 0..5 {
            let files = (0..round)
                .map(|k| file("expositor_setor3_logos", &format!("/uploads/{round}-{k}.png")))
                .collect();
            doc = apply(doc, &HomeUpdate::new(FormFields::new(), files));
            let len = doc.sectors[2].logos.len();
            assert!(len >= last);
            last = len;
        }
        assert_eq!(last, 1 + 2 + 3 + 4);
    }

    #[test]
    fn test_single_image_replace_retain_default() {
        let doc = doc_from(json!({"mapa_imagem": "/uploads/old-map.png"}));
        let update = HomeUpdate::new(
            FormFields::new(),
            vec![file("material_manual", "/uploads/manual.pdf")],
        );
        let doc = apply(doc, &update);
        assert_eq!(doc.mapa_imagem, "/uploads/old-map.png");
        assert_eq!(doc.material_manual, "/uploads/manual.pdf");
        assert_eq!(doc.material_release, "");

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["material_release"], "");
        assert_eq!(value["oqueesperar_card1_img"], "");
    }

    #[test]
    fn test_afeira_slots_always_three() {
        for previous in [json!([]), json!(["/uploads/1.jpg"]), json!(["a", "b", "c", "d", "e"])] {
            let doc = doc_from(json!({"afeira_imagens": previous}));
            let doc = apply(doc, &HomeUpdate::default());
            assert_eq!(doc.afeira_imagens.len(), AFEIRA_SLOT_COUNT);
        }

        let doc = doc_from(json!({"afeira_imagens": ["/uploads/1.jpg", "/uploads/2.jpg"]}));
        let update = HomeUpdate::new(
            FormFields::new(),
            vec![file("afeira_imagem2", "/uploads/new2.jpg")],
        );
        let doc = apply(doc, &update);
        assert_eq!(doc.afeira_imagens, vec!["/uploads/1.jpg", "/uploads/new2.jpg", ""]);
    }

    #[test]
    fn test_afeira_null_slot_keeps_positions() {
        let doc = doc_from(json!({
            "afeira_imagens": [null, "/uploads/slot2.jpg", "/uploads/slot3.jpg"]
        }));
        let doc = apply(doc, &HomeUpdate::default());
        assert_eq!(
            doc.afeira_imagens,
            vec!["", "/uploads/slot2.jpg", "/uploads/slot3.jpg"]
        );

        let doc = doc_from(json!({"afeira_imagens": ["/uploads/a.jpg", 7, "/uploads/c.jpg"]}));
        let update = HomeUpdate::new(
            FormFields::new(),
            vec![file("afeira_imagem2", "/uploads/b.jpg")],
        );
        let doc = apply(doc, &update);
        assert_eq!(
            doc.afeira_imagens,
            vec!["/uploads/a.jpg", "/uploads/b.jpg", "/uploads/c.jpg"]
        );
    }

    #[test]
    fn test_flags_recomputed_every_update() {
        for (input, expected) in [(Some("on"), true), (Some("true"), true), (Some("yes"), false), (None, false)] {
            let doc = doc_from(json!({"faixa_botao_ativo": true, "contador_data_ativo": true}));
            let update = match input {
                Some(v) => HomeUpdate::new(
                    fields(&[("faixa_botao_ativo", v), ("contador_data_ativo", v)]),
                    vec![],
                ),
                None => HomeUpdate::default(),
            };
            let doc = apply(doc, &update);
            assert_eq!(doc.faixa_botao_ativo, expected, "input {:?}", input);
            assert_eq!(doc.contador_data_ativo, expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_json_true_flag() {
        let object = json!({"faixa_botao_ativo": true});
        let update = HomeUpdate::new(
            FormFields::from_json_object(object.as_object().unwrap().clone()),
            vec![],
        );
        let doc = apply(HomeDocument::default(), &update);
        assert!(doc.faixa_botao_ativo);
    }

    #[test]
    fn test_text_overwrite_and_retain() {
        let doc = doc_from(json!({"faixa_titulo": "Antigo", "local_endereco": "Rua A"}));
        let update = HomeUpdate::new(fields(&[("faixa_titulo", "")]), vec![]);
        let doc = apply(doc, &update);
        assert_eq!(doc.faixa_titulo.as_deref(), Some(""));
        assert_eq!(doc.local_endereco.as_deref(), Some("Rua A"));
    }

    #[test]
    fn test_legacy_banner_migration() {
        let doc = doc_from(json!({"banners": [{"arquivo": "/uploads/old.jpg"}, {"src": "/x"}]}));
        let doc = apply(doc, &HomeUpdate::default());
        assert_eq!(doc.banner, "/uploads/old.jpg");
        assert!(doc.banners.is_none());

        let doc = doc_from(json!({"banners": [{"src": "/uploads/src.jpg"}]}));
        let doc = apply(doc, &HomeUpdate::default());
        assert_eq!(doc.banner, "/uploads/src.jpg");
    }

    #[test]
    fn test_legacy_banners_dropped_when_banner_exists() {
        let doc = doc_from(json!({
            "banner": "/uploads/current.jpg",
            "banners": [{"arquivo": "/uploads/old.jpg"}]
        }));
        let doc = apply(doc, &HomeUpdate::default());
        assert_eq!(doc.banner, "/uploads/current.jpg");
        assert!(doc.banners.is_none());

        let doc = doc_from(json!({"banners": [{"arquivo": "/uploads/old.jpg"}]}));
        let update = HomeUpdate::new(FormFields::new(), vec![file("banner", "/uploads/new.jpg")]);
        let doc = apply(doc, &update);
        assert_eq!(doc.banner, "/uploads/new.jpg");
        assert!(doc.banners.is_none());
    }

    #[test]
    fn test_extra_sectors_follow_total() {
        let update = HomeUpdate::new(
            fields(&[
                ("total_setores_expositor", "6"),
                ("expositor_setor5_texto", "ESPAÇO NOVO"),
                ("expositor_setor9_texto", "fora do total"),
            ]),
            vec![file("expositor_setor6_logos", "/uploads/l6.png")],
        );
        let doc = apply(HomeDocument::default(), &update);
        assert_eq!(doc.sectors.len(), 6);
        assert_eq!(doc.sectors[4].texto.as_deref(), Some("ESPAÇO NOVO"));
        assert_eq!(doc.sectors[5].logos, vec!["/uploads/l6.png"]);
    }

    #[test]
    fn test_sectors_beyond_minimum_ignored_without_total() {
        let update = HomeUpdate::new(fields(&[("expositor_setor5_texto", "X")]), vec![]);
        let doc = apply(HomeDocument::default(), &update);
        assert_eq!(doc.sectors.len(), MIN_PROTECTED_SECTORS);
    }

    #[test]
    fn test_total_sectors_parse_int_semantics() {
        assert_eq!(parse_leading_int("6"), Some(6));
        assert_eq!(parse_leading_int(" 7 setores"), Some(7));
        assert_eq!(parse_leading_int("-2"), Some(-2));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn test_huge_total_does_not_materialize_sectors() {
        let update = HomeUpdate::new(fields(&[("total_setores_expositor", "1000000000")]), vec![]);
        let doc = apply(HomeDocument::default(), &update);
        assert_eq!(doc.sectors.len(), MIN_PROTECTED_SECTORS);
    }

    #[test]
    fn test_total_sectors_is_capped() {
        let last = format!("expositor_setor{MAX_SECTORS}_texto");
        let past = format!("expositor_setor{}_texto", MAX_SECTORS + 1);
        let update = HomeUpdate::new(
            fields(&[
                ("total_setores_expositor", "100000"),
                (last.as_str(), "ULTIMO"),
                (past.as_str(), "ALEM"),
            ]),
            vec![],
        );
        let doc = apply(HomeDocument::default(), &update);
        assert_eq!(doc.sectors.len(), MAX_SECTORS);
        assert_eq!(doc.sectors[MAX_SECTORS - 1].texto.as_deref(), Some("ULTIMO"));
    }

    #[test]
    fn test_schedule_replaced_and_normalized() {
        let doc = doc_from(json!({"programacao_online": [{"data": "01/01/2020"}]}));
        let update = HomeUpdate::new(
            fields(&[(
                "programacao_online",
                r#"[{"data":"05/20/2024","atividades":[]},{"data":"05/10/2024"}]"#,
            )]),
            vec![],
        );
        let doc = apply(doc, &update);
        let online = doc.programacao_online.unwrap();
        assert_eq!(online.len(), 2);
        assert_eq!(online[0].date(), Some("20/05/2024"));
        assert_eq!(online[1].date(), Some("05/10/2024"));
    }

    #[test]
    fn test_schedule_parse_failure_gives_empty() {
        let doc = doc_from(json!({"programacao_presencial": [{"data": "01/01/2020"}]}));
        let update = HomeUpdate::new(
            fields(&[("programacao_presencial", "{broken"), ("faixa_titulo", "ok")]),
            vec![],
        );
        let doc = apply(doc, &update);
        assert_eq!(doc.programacao_presencial, Some(vec![]));
        assert_eq!(doc.faixa_titulo.as_deref(), Some("ok"));
    }

    #[test]
    fn test_schedule_retained_when_absent() {
        let doc = doc_from(json!({"programacao_online": [{"data": "01/01/2020"}]}));
        let doc = apply(doc, &HomeUpdate::default());
        assert_eq!(doc.programacao_online.unwrap().len(), 1);
    }

    #[test]
    fn test_countdown() {
        let doc = doc_from(json!({"contador_data_feira": "2024-01-01T00:00:00.000Z"}));
        let update = HomeUpdate::new(fields(&[("contador_data_feira", "2025-09-12T18:30")]), vec![]);
        let doc = apply(doc, &update);
        assert_eq!(doc.contador_data_feira.as_deref(), Some("2025-09-12T18:30:00.000Z"));

        let update = HomeUpdate::new(fields(&[("contador_data_feira", "")]), vec![]);
        let doc = apply(doc, &update);
        assert_eq!(doc.contador_data_feira.as_deref(), Some("2025-09-12T18:30:00.000Z"));
    }

    #[test]
    fn test_cards() {
        let doc = doc_from(json!({"oqueesperar_card2_img": "/uploads/c2.jpg"}));
        let update = HomeUpdate::new(
            fields(&[("oqueesperar_card1_texto", "Palestras")]),
            vec![file("oqueesperar_card8_img", "/uploads/c8.jpg")],
        );
        let doc = apply(doc, &update);
        assert_eq!(doc.cards[0].texto.as_deref(), Some("Palestras"));
        assert_eq!(doc.cards[1].img, "/uploads/c2.jpg");
        assert_eq!(doc.cards[7].img, "/uploads/c8.jpg");
    }

    #[test]
    fn test_unknown_keys_survive_merge() {
        let doc = doc_from(json!({"titulo": "legado"}));
        let doc = apply(doc, &HomeUpdate::default());
        assert_eq!(doc.extra["titulo"], "legado");
    }
}
