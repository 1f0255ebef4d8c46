//! Integration tests for server-backed edits through a session

use std::sync::{Arc, Mutex};

use synthdata_foundation::{ColumnType, ErrorKind, ParamBag, ParamValue, ProjectId, RemoteError};
use synthdata_runtime::{ActiveProject, ColumnCreate, DatabaseParams, GeneratorSettingWrite};

use crate::{AUTHOR, FIRST_NAME, LIBRARY, Reported, server};

async fn loaded() -> ActiveProject {
    let session = ActiveProject::new(server(), Reported::default().sink());
    session.select(LIBRARY).await.unwrap();
    session.catalog().refresh().await.unwrap();
    session
}

// =============================================================================
// Generator settings
// =============================================================================

#[tokio::test]
async fn assign_first_name_generator() {
    let session = loaded().await;
    let notified = Arc::new(Mutex::new(0));
    {
        let notified = Arc::clone(&notified);
        session.store().subscribe_fn(move |_| *notified.lock().unwrap() += 1);
    }

    let generator = session.catalog().by_name("FirstName").unwrap();
    let setting = session
        .generators()
        .create_setting(AUTHOR, FIRST_NAME, &generator)
        .await
        .unwrap();

    let author = session.store().find_table(AUTHOR).unwrap();
    assert_eq!(author.find_generator_setting(setting.id()).unwrap().name(), "FirstName");
    assert_eq!(
        author.find_column(FIRST_NAME).unwrap().generator_setting_id(),
        Some(setting.id())
    );
    // One replay on subscribe, one commit for setting and reference together.
    assert_eq!(*notified.lock().unwrap(), 2);
    assert!(session.current().unwrap().validate().is_ok());
}

#[tokio::test]
async fn tune_then_remove_generator() {
    let session = loaded().await;
    let generator = session.catalog().by_name("FirstName").unwrap();
    let setting = session
        .generators()
        .create_setting(AUTHOR, FIRST_NAME, &generator)
        .await
        .unwrap();

    let patch = GeneratorSettingWrite {
        params: Some(ParamBag::new().insert("locale".to_string(), ParamValue::from("en_US"))),
        null_frequency: Some(0.1),
        ..GeneratorSettingWrite::default()
    };
    session
        .generators()
        .patch_params(AUTHOR, setting.id(), patch)
        .await
        .unwrap();
    let author = session.store().find_table(AUTHOR).unwrap();
    let stored = author.find_generator_setting(setting.id()).unwrap();
    assert_eq!(stored.param("locale").and_then(ParamValue::as_str), Some("en_US"));

    session
        .generators()
        .delete_setting(AUTHOR, setting.id())
        .await
        .unwrap();
    let author = session.store().find_table(AUTHOR).unwrap();
    assert!(author.generator_settings().is_empty());
    assert_eq!(author.find_column(FIRST_NAME).unwrap().generator_setting_id(), None);
}

#[tokio::test]
async fn rejected_null_frequency_leaves_store() {
    let session = loaded().await;
    let generator = session.catalog().by_name("FirstName").unwrap();
    let setting = session
        .generators()
        .create_setting(AUTHOR, FIRST_NAME, &generator)
        .await
        .unwrap();
    let before = session.current();

    let patch = GeneratorSettingWrite {
        null_frequency: Some(2.0),
        ..GeneratorSettingWrite::default()
    };
    let err = session
        .generators()
        .patch_params(AUTHOR, setting.id(), patch)
        .await
        .unwrap_err();

    assert!(matches!(err.as_remote(), Some(RemoteError::Rejected(_))));
    assert!(synthdata_storage::transform::same_root(&before, &session.current()));
}

// =============================================================================
// Tables and columns
// =============================================================================

#[tokio::test]
async fn build_a_table_from_scratch() {
    let session = loaded().await;
    let table = session.tables().create_table("book").await.unwrap();
    let column = session
        .columns()
        .create_column(ColumnCreate::new(table.id(), "title", ColumnType::String))
        .await
        .unwrap();
    session.tables().rename_table(table.id(), "books").await.unwrap();

    let stored = session.store().find_table(table.id()).unwrap();
    assert_eq!(stored.name(), "books");
    assert!(stored.find_column(column.id()).is_some());
}

#[tokio::test]
async fn delete_column_takes_server_project() {
    let session = loaded().await;
    session.columns().delete_column(FIRST_NAME).await.unwrap();

    let author = session.store().find_table(AUTHOR).unwrap();
    assert!(author.find_column(FIRST_NAME).is_none());
    assert_eq!(author.columns().len(), 1);
}

#[tokio::test]
async fn delete_table_removes_it() {
    let session = loaded().await;
    session.tables().delete_table(AUTHOR).await.unwrap();
    assert!(session.current().unwrap().tables().is_empty());
}

#[tokio::test]
async fn edits_need_an_active_project() {
    let session = ActiveProject::new(server(), Reported::default().sink());
    let err = session.tables().create_table("orphan").await.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NoActiveProject));

    let err = session
        .columns()
        .create_column(ColumnCreate::new(AUTHOR, "age", ColumnType::Integer))
        .await
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NoActiveProject));

    session.catalog().refresh().await.unwrap();
    let generator = session.catalog().by_name("FirstName").unwrap();
    let err = session
        .generators()
        .create_setting(AUTHOR, FIRST_NAME, &generator)
        .await
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NoActiveProject));
}

#[tokio::test]
async fn answers_for_a_replaced_project_are_dropped() {
    let session = loaded().await;
    session.select(ProjectId::new(4)).await.unwrap();

    // The library project is no longer active: its column delete answer is
    // not applied to the shop project.
    session.columns().delete_column(FIRST_NAME).await.unwrap();
    assert_eq!(session.project_id(), Some(ProjectId::new(4)));
    assert!(session.current().unwrap().tables().is_empty());
}

// =============================================================================
// Data sources
// =============================================================================

#[tokio::test]
async fn connect_database_and_import_schema() {
    let session = loaded().await;
    let source = session
        .data_sources()
        .create_database(DatabaseParams {
            driver: "postgres".to_string(),
            db: "library".to_string(),
            usr: "reader".to_string(),
            pwd: "secret".to_string(),
            host: "db.local".to_string(),
            port: 5432,
        })
        .await
        .unwrap();
    assert_eq!(source.host(), Some("db.local"));

    let project = session.data_sources().import_schema(source.id()).await.unwrap();
    assert_eq!(project.tables().len(), 2);
    assert_eq!(session.current().unwrap().tables().len(), 2);
}

#[tokio::test]
async fn project_list_tracks_imported_schema() {
    let session = loaded().await;
    assert_eq!(session.projects().refresh().await.unwrap(), 2);
    let source = session.data_sources().mock_database().await.unwrap();

    session.data_sources().import_schema(source.id()).await.unwrap();
    let listed = session.projects().get(LIBRARY).unwrap();
    assert_eq!(listed.tables().len(), 2);
    assert!(listed.find_data_source(source.id()).is_some());
    assert_eq!(session.projects().get(ProjectId::new(4)).unwrap().name(), "shop");
}

#[tokio::test]
async fn upload_file_source() {
    let session = loaded().await;
    let source = session
        .data_sources()
        .create_file_source("authors.csv", "text/csv", b"first_name\nAda\n".to_vec())
        .await
        .unwrap();
    assert_eq!(source.file_name(), Some("authors.csv"));
    assert!(session.current().unwrap().find_data_source(source.id()).is_some());
}
