use std::fs;
use std::path::Path;
use std::sync::Arc;

use ab_core::{EnvironmentMode, GateState, OwnedInstance, ReadinessError};
use ab_data::{
    build_controller, build_gate, BrowserConfig, Owners, TypeFilterConfig, REQUIRED_ARCHIVES,
};

fn populate_arena2(dir: &Path) {
    for archive in REQUIRED_ARCHIVES {
        fs::write(dir.join(archive.to_lowercase()), b"").unwrap();
    }
    fs::write(dir.join("TEXTURE.000"), b"").unwrap();
    fs::write(dir.join("TEXTURE.001"), b"").unwrap();
}

#[test]
fn gate_opens_on_a_complete_arena2_folder() {
    let install = tempfile::tempdir().unwrap();
    let arena2 = install.path().join("arena2");
    fs::create_dir(&arena2).unwrap();
    populate_arena2(&arena2);

    let config = BrowserConfig {
        root_path: Some(arena2.clone()),
        ..Default::default()
    };
    let owners = Owners::default();
    let gate = build_gate(&config, &owners.gates);

    let reader = gate.ensure_ready().unwrap();
    assert!(reader.has_archive("MAPS.BSA"));
    assert!(reader.has_archive("texture.001"));
    assert_eq!(reader.root(), arena2.as_path());
    assert_eq!(gate.ready_info().unwrap().root, arena2);
}

#[test]
fn gate_reports_missing_archives() {
    let arena2 = tempfile::tempdir().unwrap();
    fs::write(arena2.path().join("MAPS.BSA"), b"").unwrap();

    let config = BrowserConfig {
        root_path: Some(arena2.path().to_path_buf()),
        ..Default::default()
    };
    let owners = Owners::default();
    let gate = build_gate(&config, &owners.gates);

    match gate.ensure_ready() {
        Err(ReadinessError::ValidationFailed { details, .. }) => {
            assert!(details.contains(&"missing WOODS.WLD".to_string()));
            assert!(!details.contains(&"missing MAPS.BSA".to_string()));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("incomplete folder validated"),
    }
    assert_eq!(gate.state(), GateState::Failed);

    populate_arena2(arena2.path());
    assert!(gate.refresh().is_ok());
}

#[test]
fn editor_sessions_use_the_developer_root() {
    let workspace = tempfile::tempdir().unwrap();
    let arena2 = workspace.path().join("arena2");
    fs::create_dir(&arena2).unwrap();
    populate_arena2(&arena2);

    let dev_file = workspace.path().join("dev-root.txt");
    fs::write(&dev_file, format!("{}\n", arena2.display())).unwrap();

    let config = BrowserConfig {
        environment: EnvironmentMode::Editor,
        developer_root_file: Some(dev_file),
        ..Default::default()
    };
    let owners = Owners::default();
    let gate = build_gate(&config, &owners.gates);

    gate.ensure_ready().unwrap();
    assert_eq!(gate.root(), Some(arena2));
}

#[test]
fn controller_browses_from_config() {
    let install = tempfile::tempdir().unwrap();
    let arena2 = install.path().join("arena2");
    fs::create_dir(&arena2).unwrap();
    populate_arena2(&arena2);
    fs::write(arena2.join("notes.txt"), b"").unwrap();

    let config = BrowserConfig {
        initial_path: Some(arena2.clone()),
        excluded_extensions: vec!["txt".to_string()],
        type_filters: vec![TypeFilterConfig {
            name: "Block archives".to_string(),
            extensions: vec!["bsa".to_string()],
        }],
        ..Default::default()
    };
    let owners = Owners::default();
    let controller = build_controller(&config, &owners.controllers);
    controller.open(None).unwrap();

    let mut names: Vec<String> = controller
        .valid_entries()
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    names.sort();
    assert_eq!(names.len(), 7);
    assert!(!names.contains(&"notes.txt".to_string()));

    assert_eq!(
        controller.filter_labels(),
        vec!["All Files (.*)", "Block archives (bsa)"]
    );
    controller.set_active_filter(1);
    assert_eq!(controller.valid_entries().len(), 4);
}

#[test]
fn config_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = BrowserConfig {
        show_hidden: true,
        excluded_extensions: vec!["log".to_string()],
        ..Default::default()
    };
    config.save(&path).unwrap();

    assert_eq!(BrowserConfig::load(&path).unwrap(), config);
    assert_eq!(
        BrowserConfig::load(dir.path().join("absent.json")).unwrap(),
        BrowserConfig::default()
    );
}

#[test]
fn builders_hand_back_the_live_owner() {
    let arena2 = tempfile::tempdir().unwrap();
    populate_arena2(arena2.path());

    let config = BrowserConfig {
        root_path: Some(arena2.path().to_path_buf()),
        ..Default::default()
    };
    let owners = Owners::default();

    let gate = build_gate(&config, &owners.gates);
    gate.ensure_ready().unwrap();
    let again = build_gate(&config, &owners.gates);
    assert!(Arc::ptr_eq(&gate, &again));
    assert_eq!(again.instance_id(), gate.instance_id());
    assert!(again.is_ready());

    let controller = build_controller(&config, &owners.controllers);
    let second = build_controller(&config, &owners.controllers);
    assert!(Arc::ptr_eq(&controller, &second));

    let first_id = controller.instance_id();
    drop(controller);
    drop(second);
    assert!(!owners.controllers.has_owner());

    let fresh = build_controller(&config, &owners.controllers);
    assert_ne!(fresh.instance_id(), first_id);
    assert!(owners.controllers.has_owner());
}
