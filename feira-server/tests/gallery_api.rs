mod common;

use common::{MultipartBody, TestApp};
use http::StatusCode;
use serde_json::{Value, json};

async fn create_gallery(app: &TestApp, ano: &str) -> Value {
    let form = MultipartBody::new()
        .text("ano", ano)
        .file("imagem", "cover.jpg", b"cover");
    let (status, body) = app.multipart("/api/galerias", form).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["galeria"].clone()
}

fn photos(count: usize) -> MultipartBody {
    (0..count).fold(MultipartBody::new(), |form, i| {
        form.file("fotos", &format!("foto{i}.jpg"), b"photo")
    })
}

#[tokio::test]
async fn test_create_then_add_photos() {
    let app = TestApp::new();
    let galeria = create_gallery(&app, "2024").await;

    assert!(galeria["id"].is_i64());
    assert_eq!(galeria["ano"], "2024");
    let cover = galeria["imagem"].as_str().unwrap();
    assert!(cover.starts_with("/uploads/galeria-"));
    assert!(cover.ends_with(".jpg"));
    assert_eq!(galeria["fotos"], json!([cover]));

    let id = galeria["id"].as_i64().unwrap();
    let (status, body) = app
        .multipart(&format!("/api/galerias/{id}/fotos"), photos(2))
        .await;
    assert_eq!(status, StatusCode::OK);
    let fotos = body["fotos"].as_array().unwrap();
    assert_eq!(fotos.len(), 3);
    assert_eq!(fotos[0], cover);
    assert!(fotos[1].as_str().unwrap().starts_with(&format!("/uploads/gal_{id}-")));

    let (status, stored) = app.get(&format!("/api/galerias/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["fotos"].as_array().unwrap().len(), 3);

    let (_, list) = app.get("/api/galerias").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_photo_cap() {
    let app = TestApp::new();
    let id = create_gallery(&app, "2024").await["id"].as_i64().unwrap();
    let uri = format!("/api/galerias/{id}/fotos");

    let (status, body) = app.multipart(&uri, photos(39)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fotos"].as_array().unwrap().len(), 40);
    let files_before = app.upload_count();

    let (status, body) = app.multipart(&uri, photos(1)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Limite de 40 fotos por galeria.");
    assert_eq!(app.upload_count(), files_before);

    let (status, body) = app.multipart(&uri, photos(41)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], 3002);
    assert_eq!(app.upload_count(), files_before);
}

#[tokio::test]
async fn test_create_requires_ano_and_cover() {
    let app = TestApp::new();
    let form = MultipartBody::new().file("imagem", "cover.jpg", b"cover");
    let (status, body) = app.multipart("/api/galerias", form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Ano e imagem são obrigatórios.");
    assert_eq!(app.upload_count(), 0);

    let form = MultipartBody::new().text("ano", "2024");
    let (status, _) = app.multipart("/api/galerias", form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_photo_is_rejected() {
    let app = TestApp::with_config(|c| c.max_gallery_photo_bytes = 8);
    let form = MultipartBody::new()
        .text("ano", "2024")
        .file("imagem", "big.jpg", b"0123456789abcdef");
    let (status, body) = app.multipart("/api/galerias", form).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], 3001);
    assert_eq!(app.upload_count(), 0);
}

#[tokio::test]
async fn test_remove_photo() {
    let app = TestApp::new();
    let id = create_gallery(&app, "2024").await["id"].as_i64().unwrap();
    let (_, body) = app
        .multipart(&format!("/api/galerias/{id}/fotos"), photos(1))
        .await;
    let foto = body["fotos"][1].as_str().unwrap().to_string();

    let uri = format!("/api/galerias/{id}/fotos");
    let (status, body) = app.json("DELETE", &uri, json!({"foto": foto})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fotos"].as_array().unwrap().len(), 1);
    assert!(!app.upload_file(&foto).exists());

    let (status, body) = app.json("DELETE", &uri, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Campo foto obrigatório.");
}

#[tokio::test]
async fn test_remove_gallery_deletes_every_file() {
    let app = TestApp::new();
    let galeria = create_gallery(&app, "2024").await;
    let id = galeria["id"].as_i64().unwrap();
    let (_, body) = app
        .multipart(&format!("/api/galerias/{id}/fotos"), photos(3))
        .await;
    let fotos: Vec<String> = body["fotos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_str().unwrap().to_string())
        .collect();
    assert_eq!(fotos.len(), 4);

    let (status, body) = app.json("DELETE", &format!("/api/galerias/{id}"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    assert!(fotos.iter().all(|f| !app.upload_file(f).exists()));
    assert_eq!(app.upload_count(), 0);

    let (status, body) = app.get(&format!("/api/galerias/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Galeria não encontrada.");
}

#[tokio::test]
async fn test_delete_by_body_id() {
    let app = TestApp::new();
    let id = create_gallery(&app, "2023").await["id"].as_i64().unwrap();

    let (status, body) = app.json("DELETE", "/api/galerias", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "id é obrigatório.");

    let (status, _) = app
        .json("DELETE", "/api/galerias", json!({"id": id.to_string()}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = app.get("/api/galerias").await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_remove_fallback() {
    let app = TestApp::new();
    let first = create_gallery(&app, "2022").await;
    create_gallery(&app, "2023").await;

    let (status, _) = app
        .json(
            "POST",
            "/api/galerias/remover",
            json!({"id": 1, "imagem": first["imagem"]}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .json("POST", "/api/galerias/remover", json!({"ano": 2023}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .json("POST", "/api/galerias/remover", json!({"ano": "1999"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(app.upload_count(), 0);
}

#[tokio::test]
async fn test_legacy_records_are_healed_once() {
    let app = TestApp::with_files(
        None,
        Some(json!([
            {"ano": "2019", "imagem": "/uploads/antiga.jpg"},
            {"id": 7, "ano": "2020", "imagem": "/uploads/b.jpg", "fotos": ["/uploads/b.jpg"]}
        ])),
    );

    let stored = app.stored_json("galerias.json");
    let healed_id = stored[0]["id"].as_i64().unwrap();
    assert_eq!(stored[0]["fotos"], json!(["/uploads/antiga.jpg"]));
    assert_eq!(stored[1]["id"], 7);

    let (_, first) = app.get("/api/galerias").await;
    let (_, second) = app.get("/api/galerias").await;
    assert_eq!(first, second);
    assert_eq!(first[0]["id"], healed_id);
}

#[tokio::test]
async fn test_unknown_gallery() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/galerias/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 2001);

    let (status, _) = app.multipart("/api/galerias/42/fotos", photos(2)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.upload_count(), 0);
}

#[tokio::test]
async fn test_text_ids_are_kept_and_addressable() {
    let app = TestApp::with_files(
        None,
        Some(json!([
            {"id": "legacy-a", "ano": "2018", "imagem": "/uploads/l.jpg", "fotos": ["/uploads/l.jpg"]}
        ])),
    );
    assert_eq!(app.stored_json("galerias.json")[0]["id"], "legacy-a");

    let (status, galeria) = app.get("/api/galerias/legacy-a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(galeria["ano"], "2018");

    let (status, body) = app
        .json("DELETE", "/api/galerias", json!({"id": "legacy-a"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(app.stored_json("galerias.json"), json!([]));
}
