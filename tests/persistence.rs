use tempfile::tempdir;

use pyramid_rs::export::ExportFormat;
use pyramid_rs::form::FormInput;
use pyramid_rs::storage::{KEY_DATA, KEY_SOURCE, KEY_TITLE, PersistedState, StateStore};
use pyramid_rs::{App, ChartError, LayoutConfig, Role, SideLabels};

const DATA: &str = r#"[{"age":"0-4","male":1000,"female":900},{"age":"5-9","male":800,"female":1200}]"#;

#[test]
fn state_round_trips_through_the_file() {
    let dir = tempdir().unwrap();
    let store = StateStore::new(dir.path().join("state.json"));
    let state = PersistedState {
        title: "Population 2020".into(),
        data: DATA.into(),
        source: "UN".into(),
    };
    store.save(&state).unwrap();

    let reopened = StateStore::new(dir.path().join("state.json"));
    assert_eq!(reopened.load().unwrap(), Some(state));
    assert_eq!(reopened.get(KEY_TITLE).unwrap().as_deref(), Some("Population 2020"));
    assert_eq!(reopened.get(KEY_DATA).unwrap().as_deref(), Some(DATA));
    assert_eq!(reopened.get(KEY_SOURCE).unwrap().as_deref(), Some("UN"));
}

#[test]
fn corrupt_state_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(StateStore::new(&path).load().is_err());
}

#[test]
fn submit_saves_and_restore_redraws_the_same_chart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut first = App::new(LayoutConfig::default(), Some(StateStore::new(&path)));
    first.form = FormInput::new("Population 2020", DATA, "UN");
    let tree = first.submit().unwrap().tree.clone();
    assert_eq!(tree.texts(Role::Source), vec!["Source: UN"]);

    let mut second = App::new(LayoutConfig::default(), Some(StateStore::new(&path)));
    assert!(second.restore().unwrap());
    assert_eq!(second.form, first.form);
    assert_eq!(second.tree(), Some(&tree));
}

#[test]
fn failed_submit_changes_nothing() {
    let dir = tempdir().unwrap();
    let store = StateStore::new(dir.path().join("state.json"));
    let mut app = App::new(LayoutConfig::default(), Some(store.clone()));

    app.form = FormInput::new("", DATA, "");
    assert!(matches!(app.submit(), Err(ChartError::MissingField("title"))));
    app.form = FormInput::new("t", "   ", "");
    assert!(matches!(app.submit(), Err(ChartError::MissingField("data"))));
    app.form = FormInput::new("t", "not json", "");
    assert!(matches!(app.submit(), Err(ChartError::MalformedData(_))));

    assert!(app.chart().is_none());
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn failed_submit_keeps_the_previous_chart() {
    let mut app = App::new(LayoutConfig::default(), None);
    app.form = FormInput::new("first", DATA, "");
    app.submit().unwrap();

    app.form = FormInput::new("second", "[]", "");
    assert!(matches!(app.submit(), Err(ChartError::EmptyRows)));
    assert_eq!(app.chart().unwrap().title, "first");
}

#[test]
fn resubmit_replaces_the_chart() {
    let mut app = App::new(LayoutConfig::default(), None);
    app.form = FormInput::new("first", DATA, "");
    app.submit().unwrap();
    app.form = FormInput::new("second", DATA, "src");
    app.submit().unwrap();
    let tree = app.tree().unwrap();
    assert_eq!(tree.texts(Role::Title), vec!["second"]);
    assert_eq!(tree.count(Role::Title), 1);
}

#[test]
fn restore_without_saved_state_draws_nothing() {
    let dir = tempdir().unwrap();
    let mut app = App::new(
        LayoutConfig::default(),
        Some(StateStore::new(dir.path().join("missing.json"))),
    );
    assert!(!app.restore().unwrap());
    assert!(app.chart().is_none());
    assert_eq!(app.form, FormInput::default());
}

#[test]
fn export_into_uses_the_title_file_name() {
    let dir = tempdir().unwrap();
    let mut app = App::new(LayoutConfig::default(), None);
    app.form = FormInput::new("Population 2020", DATA, "");
    app.submit().unwrap();

    app.export_into(dir.path(), ExportFormat::Svg).unwrap();
    app.export_into(dir.path(), ExportFormat::Jpeg).unwrap();
    assert!(dir.path().join("chart_Population 2020.svg").is_file());
    assert!(dir.path().join("chart_Population 2020.jpg").is_file());
}

#[test]
fn restore_brings_back_the_side_labels() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let labels = SideLabels {
        a: "Urban".into(),
        b: "Rural".into(),
    };

    let mut first = App::new(
        LayoutConfig::default().with_labels(labels.clone()),
        Some(StateStore::new(&path)),
    );
    first.form = FormInput::new("Settlement", DATA, "");
    let tree = first.submit().unwrap().tree.clone();

    let mut second = App::new(LayoutConfig::default(), Some(StateStore::new(&path)));
    assert!(second.restore().unwrap());
    assert_eq!(second.config().labels, labels);
    assert_eq!(second.tree(), Some(&tree));
    assert_eq!(tree.texts(Role::SideCaption), vec!["Urban", "Rural"]);
}
