//! Integration tests for the root store and its observers

use std::sync::{Arc, Mutex};
use std::thread;

use synthdata_foundation::{
    ColumnId, ColumnType, DataSourceId, GeneratorSettingId, ProjectId, TableId,
};
use synthdata_storage::{
    Column, DataSource, GeneratorSetting, Observer, Project, Root, RootStore, Table,
};

fn library() -> Project {
    Project::new(ProjectId::new(3), "library").with_table(
        Table::new(TableId::new(26), "author").with_column(Column::new(
            ColumnId::new(126),
            "first_name",
            ColumnType::String,
        )),
    )
}

/// Records the project id of every root it sees.
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<Option<ProjectId>>>,
}

impl Observer for Recorder {
    fn notify(&self, root: &Root) {
        self.seen.lock().unwrap().push(root.as_ref().map(|p| p.id()));
    }
}

impl Recorder {
    fn seen(&self) -> Vec<Option<ProjectId>> {
        self.seen.lock().unwrap().clone()
    }
}

// =============================================================================
// Observer protocol
// =============================================================================

#[test]
fn late_subscriber_sees_current_root() {
    let store = RootStore::new();
    store.replace_root(library());

    let recorder = Arc::new(Recorder::default());
    store.subscribe(Arc::clone(&recorder) as Arc<dyn Observer>);
    assert_eq!(recorder.seen(), vec![Some(ProjectId::new(3))]);
}

#[test]
fn select_edit_clear_sequence() {
    let store = RootStore::new();
    let recorder = Arc::new(Recorder::default());
    store.subscribe(Arc::clone(&recorder) as Arc<dyn Observer>);

    assert!(store.replace_root(library()));
    assert!(store.add_generator_setting(
        TableId::new(26),
        ColumnId::new(126),
        GeneratorSetting::new(GeneratorSettingId::new(103), "FirstName"),
    ));
    assert!(!store.delete_table(TableId::new(404)));
    assert!(store.clear());
    assert!(!store.clear());

    assert_eq!(
        recorder.seen(),
        vec![None, Some(ProjectId::new(3)), Some(ProjectId::new(3)), None]
    );
}

#[test]
fn observers_run_in_registration_order() {
    let store = RootStore::new();
    let order = Arc::new(Mutex::new(Vec::new()));
    for name in ["grid", "sidebar", "toolbar"] {
        let order = Arc::clone(&order);
        store.subscribe_fn(move |_| order.lock().unwrap().push(name));
    }
    order.lock().unwrap().clear();

    store.replace_root(library());
    assert_eq!(*order.lock().unwrap(), vec!["grid", "sidebar", "toolbar"]);
}

#[test]
fn edits_without_a_project_are_silent() {
    let store = RootStore::new();
    let recorder = Arc::new(Recorder::default());
    store.subscribe(Arc::clone(&recorder) as Arc<dyn Observer>);

    let author = TableId::new(26);
    let first_name = ColumnId::new(126);
    let setting = GeneratorSettingId::new(103);
    let column = || Column::new(first_name, "first_name", ColumnType::String);
    let source = || DataSource::file(DataSourceId::new(1), "a.csv", "text/csv");

    let applied = [
        ("add_table", store.add_table(Table::new(author, "author"))),
        ("patch_table", store.patch_table(Table::new(author, "writer"))),
        ("delete_table", store.delete_table(author)),
        ("add_column", store.add_column(author, column())),
        ("patch_column", store.patch_column(author, column())),
        ("delete_column", store.delete_column(author, first_name)),
        (
            "add_generator_setting",
            store.add_generator_setting(author, first_name, GeneratorSetting::new(setting, "FirstName")),
        ),
        (
            "patch_generator_setting",
            store.patch_generator_setting(author, GeneratorSetting::new(setting, "LastName")),
        ),
        ("delete_generator_setting", store.delete_generator_setting(author, setting)),
        ("add_data_source", store.add_data_source(source())),
        ("patch_data_source", store.patch_data_source(source())),
        ("delete_data_source", store.delete_data_source(DataSourceId::new(1))),
        ("clear", store.clear()),
    ];
    for (name, changed) in applied {
        assert!(!changed, "{name} reported a change on an empty store");
    }
    assert!(store.current().is_none());
    // Only the replay on subscribe.
    assert_eq!(recorder.seen(), vec![None]);
}

#[test]
fn unsubscribed_observer_is_not_called() {
    let store = RootStore::new();
    let recorder = Arc::new(Recorder::default());
    let id = store.subscribe(Arc::clone(&recorder) as Arc<dyn Observer>);

    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.replace_root(library());
    assert_eq!(recorder.seen(), vec![None]);
    assert_eq!(store.observer_count(), 0);
}

#[test]
fn observer_sees_committed_root() {
    let store = Arc::new(RootStore::new());
    let mismatches = Arc::new(Mutex::new(0));
    {
        let store_ref = Arc::downgrade(&store);
        let mismatches = Arc::clone(&mismatches);
        store.subscribe_fn(move |root| {
            if let Some(store) = store_ref.upgrade() {
                let current = store.current();
                if !synthdata_storage::transform::same_root(root, &current) {
                    *mismatches.lock().unwrap() += 1;
                }
            }
        });
    }
    store.replace_root(library());
    store.add_table(Table::new(TableId::new(27), "book"));
    assert_eq!(*mismatches.lock().unwrap(), 0);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn concurrent_edits_are_serialized() {
    let store = Arc::new(RootStore::new());
    store.replace_root(Project::new(ProjectId::new(1), "p"));

    let handles: Vec<_> = (0..8_u64)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for j in 0..16_u64 {
                    store.add_table(Table::new(TableId::new(i * 100 + j), "t"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let project = store.current().unwrap();
    assert_eq!(project.tables().len(), 8 * 16);
    assert!(project.validate().is_ok());
}
