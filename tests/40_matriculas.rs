mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use estudiantes_api::database::{Fault, Store};
use estudiantes_api::types::Operation;

#[tokio::test]
async fn enrollment_creates_blank_grade_record() -> Result<()> {
    let server = common::spawn_server().await?;
    let est = server.create_estudiante("Ana").await?["id_estudiantes"].as_str().unwrap().to_string();

    let created = server.create_matricula(&est, &server.catalog.asignacion).await?;
    assert_eq!(created["version"], 1);
    assert_eq!(created["id_estudiantes"], est.as_str());
    assert!(created.get("nombre_estudiante").is_none(), "{}", created);
    let id = created["id_matriculas"].as_str().unwrap().to_string();

    let nota = server.store.find_nota_by_matricula(&id).await?.expect("grade record");
    assert_eq!((nota.nota1, nota.nota2, nota.sup, nota.version), (0.0, 0.0, 0, 1));

    let fetched = server.client.get(server.url(&format!("/matriculas/{}", id))).send().await?.json::<Value>().await?;
    assert_eq!(fetched["nombre_estudiante"], "Ana");
    assert_eq!(fetched["nombre_asignatura"], "Matemáticas");

    let events = server.notifier.events_for("matriculas");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].operation, Operation::Create);
    assert_eq!(events[0].data["id_matriculas"], id.as_str());
    Ok(())
}

#[tokio::test]
async fn duplicate_enrollment_is_rejected() -> Result<()> {
    let server = common::spawn_server().await?;
    let est = server.create_estudiante("Ana").await?["id_estudiantes"].as_str().unwrap().to_string();
    server.create_matricula(&est, &server.catalog.asignacion).await?;

    let res = server
        .client
        .post(server.url("/matriculas"))
        .json(&json!({ "id_estudiantes": est, "id_profesores_ciclos_asignaturas": server.catalog.asignacion }))
        .send()
        .await?;
    common::assert_text_error(res, StatusCode::BAD_REQUEST, "El estudiante ya está matriculado en esta asignatura")
        .await?;

    let pair = server
        .store
        .count_matriculas_for_pair(&est, &server.catalog.asignacion, None)
        .await?;
    assert_eq!(pair, 1);
    assert_eq!(server.store.nota_count(), 1);
    Ok(())
}

#[tokio::test]
async fn enrollment_references_must_exist() -> Result<()> {
    let server = common::spawn_server().await?;
    let est = server.create_estudiante("Ana").await?["id_estudiantes"].as_str().unwrap().to_string();

    let res = server
        .client
        .post(server.url("/matriculas"))
        .json(&json!({ "id_estudiantes": "ghost", "id_profesores_ciclos_asignaturas": server.catalog.asignacion }))
        .send()
        .await?;
    common::assert_text_error(res, StatusCode::NOT_FOUND, "Estudiante no encontrado").await?;

    let res = server
        .client
        .post(server.url("/matriculas"))
        .json(&json!({ "id_estudiantes": est, "id_profesores_ciclos_asignaturas": "ghost" }))
        .send()
        .await?;
    common::assert_text_error(res, StatusCode::NOT_FOUND, "Asignación no encontrada").await?;

    let res = server
        .client
        .post(server.url("/matriculas"))
        .json(&json!({ "id_estudiantes": est }))
        .send()
        .await?;
    common::assert_text_error(res, StatusCode::BAD_REQUEST, "Todos los campos son requeridos").await?;

    let res = server
        .client
        .post(server.url("/matriculas"))
        .json(&json!({ "id_estudiantes": est, "id_profesores_ciclos_asignaturas": null }))
        .send()
        .await?;
    common::assert_text_error(res, StatusCode::BAD_REQUEST, "Todos los campos son requeridos").await?;

    // Whitespace is a value, so it is looked up like any other id
    let res = server
        .client
        .post(server.url("/matriculas"))
        .json(&json!({ "id_estudiantes": " ", "id_profesores_ciclos_asignaturas": server.catalog.asignacion }))
        .send()
        .await?;
    common::assert_text_error(res, StatusCode::NOT_FOUND, "Estudiante no encontrado").await?;

    let res = server
        .client
        .post(server.url("/matriculas"))
        .body(json!([est, server.catalog.asignacion]).to_string())
        .send()
        .await?;
    common::assert_text_error(res, StatusCode::BAD_REQUEST, "Datos inválidos").await?;

    assert_eq!(server.store.matricula_count(), 0);
    assert_eq!(server.store.nota_count(), 0);
    assert!(server.notifier.events_for("matriculas").is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_grade_insert_rolls_back_enrollment() -> Result<()> {
    let server = common::spawn_server().await?;
    let est = server.create_estudiante("Ana").await?["id_estudiantes"].as_str().unwrap().to_string();
    server.store.inject_fault(Fault::InsertNota);

    let res = server
        .client
        .post(server.url("/matriculas"))
        .json(&json!({ "id_estudiantes": est, "id_profesores_ciclos_asignaturas": server.catalog.asignacion }))
        .send()
        .await?;
    common::assert_text_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Error al crear registro de notas").await?;

    assert_eq!(server.store.matricula_count(), 0);
    assert_eq!(server.store.nota_count(), 0);
    assert!(server.notifier.events_for("matriculas").is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_rollback_leaves_visible_orphan() -> Result<()> {
    let server = common::spawn_server().await?;
    let est = server.create_estudiante("Ana").await?["id_estudiantes"].as_str().unwrap().to_string();
    server.store.inject_fault(Fault::InsertNota);
    server.store.inject_fault(Fault::DeleteMatricula);

    let res = server
        .client
        .post(server.url("/matriculas"))
        .json(&json!({ "id_estudiantes": est, "id_profesores_ciclos_asignaturas": server.catalog.asignacion }))
        .send()
        .await?;
    common::assert_text_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Error al crear registro de notas").await?;

    assert_eq!(server.store.matricula_count(), 1);
    assert_eq!(server.store.nota_count(), 0);
    Ok(())
}

#[tokio::test]
async fn enrollment_can_be_repointed() -> Result<()> {
    let server = common::spawn_server().await?;
    let ana = server.create_estudiante("Ana").await?["id_estudiantes"].as_str().unwrap().to_string();
    let first = server.create_matricula(&ana, &server.catalog.asignacion).await?;
    let second = server.create_matricula(&ana, &server.catalog.otra_asignacion).await?;
    let id = first["id_matriculas"].as_str().unwrap().to_string();

    // Moving the first onto the pair the second already holds is a duplicate.
    let res = server
        .client
        .put(server.url(&format!("/matriculas/{}", id)))
        .json(&json!({ "id_estudiantes": ana, "id_profesores_ciclos_asignaturas": server.catalog.otra_asignacion }))
        .send()
        .await?;
    common::assert_text_error(res, StatusCode::BAD_REQUEST, "El estudiante ya está matriculado en esta asignatura")
        .await?;

    // Re-saving its own pair is not.
    let res = server
        .client
        .put(server.url(&format!("/matriculas/{}", id)))
        .json(&json!({ "id_estudiantes": ana, "id_profesores_ciclos_asignaturas": server.catalog.asignacion }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["version"], 2);

    let luis = server.create_estudiante("Luis").await?["id_estudiantes"].as_str().unwrap().to_string();
    let res = server
        .client
        .put(server.url(&format!("/api/matriculas/{}", second["id_matriculas"].as_str().unwrap())))
        .json(&json!({ "id_estudiantes": luis, "id_profesores_ciclos_asignaturas": server.catalog.otra_asignacion }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let moved = res.json::<Value>().await?;
    assert_eq!(moved["id_estudiantes"], luis.as_str());
    assert_eq!(moved["version"], 2);

    let updates = server
        .notifier
        .events_for("matriculas")
        .into_iter()
        .filter(|e| e.operation == Operation::Update)
        .count();
    assert_eq!(updates, 2);
    Ok(())
}

#[tokio::test]
async fn update_checks_run_in_order() -> Result<()> {
    let server = common::spawn_server().await?;
    let ana = server.create_estudiante("Ana").await?["id_estudiantes"].as_str().unwrap().to_string();
    let id = server.create_matricula(&ana, &server.catalog.asignacion).await?["id_matriculas"]
        .as_str()
        .unwrap()
        .to_string();

    let res = server
        .client
        .put(server.url("/matriculas/ghost"))
        .json(&json!({ "id_estudiantes": "ghost", "id_profesores_ciclos_asignaturas": "ghost" }))
        .send()
        .await?;
    common::assert_text_error(res, StatusCode::NOT_FOUND, "Matrícula no encontrada").await?;

    let res = server
        .client
        .put(server.url(&format!("/matriculas/{}", id)))
        .json(&json!({ "id_estudiantes": "ghost", "id_profesores_ciclos_asignaturas": "ghost" }))
        .send()
        .await?;
    common::assert_text_error(res, StatusCode::NOT_FOUND, "Estudiante no encontrado").await?;

    let res = server
        .client
        .put(server.url(&format!("/matriculas/{}", id)))
        .json(&json!({ "id_estudiantes": ana, "id_profesores_ciclos_asignaturas": "ghost" }))
        .send()
        .await?;
    common::assert_text_error(res, StatusCode::NOT_FOUND, "Asignación no encontrada").await?;

    let res = server
        .client
        .put(server.url(&format!("/matriculas/{}", id)))
        .body("[]")
        .send()
        .await?;
    common::assert_text_error(res, StatusCode::BAD_REQUEST, "Datos inválidos").await?;

    Ok(())
}

#[tokio::test]
async fn delete_removes_grade_record_then_enrollment() -> Result<()> {
    let server = common::spawn_server().await?;
    let ana = server.create_estudiante("Ana").await?["id_estudiantes"].as_str().unwrap().to_string();
    let keep = server.create_matricula(&ana, &server.catalog.otra_asignacion).await?;
    let id = server.create_matricula(&ana, &server.catalog.asignacion).await?["id_matriculas"]
        .as_str()
        .unwrap()
        .to_string();

    let res = server.client.delete(server.url(&format!("/matriculas/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "message": "Matrícula eliminada correctamente" }));

    assert_eq!(server.store.matricula_count(), 1);
    assert_eq!(server.store.nota_count(), 1);
    assert!(server
        .store
        .find_matricula_row(keep["id_matriculas"].as_str().unwrap())
        .await?
        .is_some());

    let deletes: Vec<(String, Operation)> = server
        .notifier
        .events()
        .into_iter()
        .filter(|e| e.operation == Operation::Delete)
        .map(|e| (e.table, e.operation))
        .collect();
    assert_eq!(
        deletes,
        vec![
            ("registro_notas".to_string(), Operation::Delete),
            ("matriculas".to_string(), Operation::Delete),
        ]
    );

    let res = server.client.delete(server.url(&format!("/matriculas/{}", id))).send().await?;
    common::assert_text_error(res, StatusCode::NOT_FOUND, "Matrícula no encontrada").await?;
    Ok(())
}
