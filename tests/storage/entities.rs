//! Integration tests for entity snapshots and validation

use std::sync::Arc;

use synthdata_foundation::{
    ColumnId, ColumnType, ConstraintId, DataSourceId, EntityRef, ErrorKind, GeneratorSettingId,
    ProjectId, TableId,
};
use synthdata_storage::{
    Column, Constraint, ConstraintType, DataSource, DataSourceKind, GeneratorSetting, Project,
    Table,
};

fn library() -> Project {
    Project::new(ProjectId::new(3), "library")
        .with_table(
            Table::new(TableId::new(26), "author")
                .with_column(Column::new(ColumnId::new(126), "first_name", ColumnType::String))
                .with_column(
                    Column::new(ColumnId::new(127), "born", ColumnType::Datetime).nullable(true),
                )
                .with_constraint(
                    Constraint::new(ConstraintId::new(1), ConstraintType::Primary)
                        .on_column(ColumnId::new(126), "first_name"),
                ),
        )
        .with_table(Table::new(TableId::new(27), "book"))
        .with_data_source(
            DataSource::database(DataSourceId::new(4), "postgres", "library")
                .with_host("db.local", 5432)
                .with_user("reader"),
        )
}

// =============================================================================
// Snapshots
// =============================================================================

#[test]
fn lookups_follow_the_tree() {
    let project = library();
    let author = project.find_table(TableId::new(26)).unwrap();
    assert_eq!(author.columns().len(), 2);
    assert_eq!(author.constraints().len(), 1);
    assert!(author.find_column(ColumnId::new(127)).unwrap().is_nullable());
    assert!(project.find_table(TableId::new(99)).is_none());
}

#[test]
fn renamed_project_shares_tables() {
    let project = library();
    let renamed = project.renamed("archive");
    assert_eq!(renamed.name(), "archive");
    assert!(Arc::ptr_eq(
        renamed.tables().first().unwrap(),
        project.tables().first().unwrap()
    ));
}

#[test]
fn renamed_table_keeps_constraints() {
    let project = library();
    let author = project.find_table(TableId::new(26)).unwrap();
    let renamed = author.renamed("writer");
    assert_eq!(renamed.constraints(), author.constraints());
    assert_eq!(renamed.id(), TableId::new(26));
}

#[test]
fn data_source_kinds() {
    let db = DataSource::database(DataSourceId::new(1), "mysql", "shop").with_host("h", 3306);
    assert_eq!(db.kind(), DataSourceKind::Database);
    assert_eq!(db.port(), Some(3306));
    assert_eq!(db.file_name(), None);

    let file = DataSource::file(DataSourceId::new(2), "people.csv", "text/csv");
    assert_eq!(file.kind(), DataSourceKind::File);
    assert_eq!(file.mime_type(), Some("text/csv"));
    assert_eq!(file.driver(), None);
}

#[test]
fn setting_resolves_through_table() {
    let table = Table::new(TableId::new(26), "author")
        .with_generator_setting(GeneratorSetting::new(GeneratorSettingId::new(103), "FirstName"))
        .with_column(
            Column::new(ColumnId::new(126), "first_name", ColumnType::String)
                .with_generator(GeneratorSettingId::new(103)),
        )
        .with_column(Column::new(ColumnId::new(127), "last_name", ColumnType::String));

    let first = table.find_column(ColumnId::new(126)).unwrap();
    assert_eq!(table.setting_for(first).unwrap().name(), "FirstName");
    let last = table.find_column(ColumnId::new(127)).unwrap();
    assert!(table.setting_for(last).is_none());
    assert_eq!(table.columns_using(GeneratorSettingId::new(103)).count(), 1);
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn valid_project_passes() {
    assert!(library().validate().is_ok());
}

#[test]
fn duplicate_table_ids_rejected() {
    let project = library().with_table(Table::new(TableId::new(26), "again"));
    let err = project.validate().unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::DuplicateId(EntityRef::Table(id)) if id == TableId::new(26)
    ));
}

#[test]
fn duplicate_data_source_ids_rejected() {
    let project =
        library().with_data_source(DataSource::file(DataSourceId::new(4), "a.csv", "text/csv"));
    assert!(matches!(
        project.validate().unwrap_err().kind,
        ErrorKind::DuplicateId(EntityRef::DataSource(_))
    ));
}

#[test]
fn dangling_generator_reference_rejected() {
    let project = Project::new(ProjectId::new(1), "p").with_table(
        Table::new(TableId::new(5), "t").with_column(
            Column::new(ColumnId::new(50), "c", ColumnType::Integer)
                .with_generator(GeneratorSettingId::new(9)),
        ),
    );
    match project.validate().unwrap_err().kind {
        ErrorKind::DanglingGeneratorReference {
            table,
            column,
            setting,
        } => {
            assert_eq!(table, TableId::new(5));
            assert_eq!(column, ColumnId::new(50));
            assert_eq!(setting, GeneratorSettingId::new(9));
        }
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[test]
fn null_frequency_out_of_range_rejected() {
    for value in [-0.1, 1.5, f64::NAN] {
        let setting =
            GeneratorSetting::new(GeneratorSettingId::new(1), "Integer").with_null_frequency(value);
        assert!(matches!(
            setting.validate().unwrap_err().kind,
            ErrorKind::InvalidNullFrequency { .. }
        ));
    }
    let edge = GeneratorSetting::new(GeneratorSettingId::new(1), "Integer").with_null_frequency(1.0);
    assert!(edge.validate().is_ok());
}

#[test]
fn multi_column_setting_is_valid() {
    let table = Table::new(TableId::new(5), "person")
        .with_generator_setting(GeneratorSetting::new(GeneratorSettingId::new(1), "FullName"))
        .with_column(
            Column::new(ColumnId::new(1), "first", ColumnType::String)
                .with_generator(GeneratorSettingId::new(1)),
        )
        .with_column(
            Column::new(ColumnId::new(2), "last", ColumnType::String)
                .with_generator(GeneratorSettingId::new(1)),
        );
    assert!(table.validate().is_ok());
    assert_eq!(table.columns_using(GeneratorSettingId::new(1)).count(), 2);
}
