use std::sync::Arc;

use ab_core::{
    DirectoryEntry, FileAttributes, FilterState, MemoryFileSystem, NavigationController,
    NavigationError, TypeFilter,
};

fn install_tree() -> Arc<MemoryFileSystem> {
    let fs = MemoryFileSystem::new();
    fs.add_dir("/games");
    fs.add_dir("/games/arena2");
    fs.add_file("/games/arena2/ARCH3D.BSA");
    fs.add_file("/games/arena2/MAPS.BSA");
    fs.add_file("/games/arena2/TEXTURE.000");
    fs.add_file("/games/arena2/readme.txt");
    fs.add_entry(
        "/games/arena2",
        Ok(DirectoryEntry::file("Thumbs.db").with_attributes(FileAttributes::SYSTEM)),
    );
    fs.add_dir("/games/arena2/saves");
    fs.add_dir("/games/mods");
    Arc::new(fs)
}

fn names(controller: &NavigationController) -> Vec<String> {
    controller
        .valid_entries()
        .into_iter()
        .map(|entry| entry.name)
        .collect()
}

#[test]
fn browse_pick_and_return() {
    let controller = NavigationController::new(install_tree())
        .with_filter_state(FilterState::new().with_excluded_extensions([".TXT"]))
        .with_default_path("/games");

    let start = controller.open(None).unwrap();
    assert_eq!(start.to_string(), "/games");
    assert_eq!(names(&controller), vec!["arena2", "mods"]);

    controller.set_path("/games/arena2").unwrap();
    assert_eq!(
        names(&controller),
        vec!["ARCH3D.BSA", "MAPS.BSA", "TEXTURE.000", "saves"]
    );

    controller.set_filters(vec![TypeFilter::single("Texture archives", "000")]);
    controller.set_active_filter(1);
    assert_eq!(names(&controller), vec!["TEXTURE.000", "saves"]);

    let picked = controller.select_at(0).unwrap();
    assert_eq!(picked.name, "TEXTURE.000");
    assert_eq!(
        controller.selected_path().unwrap(),
        std::path::PathBuf::from("/games/arena2/TEXTURE.000")
    );

    let back = controller.go_back().unwrap().unwrap();
    assert_eq!(back.to_string(), "/games");
    assert!(controller.selected_entry().is_none());
    assert!(controller.can_go_forward());
}

#[test]
fn redirected_history_drops_forward_entries() {
    let controller = NavigationController::new(install_tree());
    controller.set_path("/games").unwrap();
    controller.set_path("/games/arena2").unwrap();
    controller.set_path("/games/arena2/saves").unwrap();

    controller.go_back().unwrap();
    controller.set_path("/games/mods").unwrap();

    let visited: Vec<String> = controller
        .history()
        .paths()
        .iter()
        .map(|p| p.to_string())
        .collect();
    assert_eq!(visited, vec!["/games", "/games/arena2", "/games/mods"]);
    assert_eq!(controller.history().index(), Some(2));
    assert!(controller.go_forward().unwrap().is_none());
}

#[test]
fn filter_changes_always_clear_selection() {
    let controller = NavigationController::new(install_tree());
    controller.set_path("/games/arena2").unwrap();

    controller.select_at(1);
    controller.set_search("bsa");
    assert_eq!(controller.selected_position(), None);
    assert_eq!(names(&controller), vec!["ARCH3D.BSA", "MAPS.BSA"]);

    controller.select_at(1);
    controller.set_show_hidden(true);
    assert_eq!(controller.selected_position(), None);

    controller.select_at(0);
    controller.reload().unwrap();
    assert_eq!(controller.selected_position(), None);
}

#[test]
fn system_entries_never_shown() {
    let controller = NavigationController::new(install_tree());
    controller.set_path("/games/arena2").unwrap();
    controller.set_show_hidden(true);
    assert!(!names(&controller).contains(&"Thumbs.db".to_string()));
}

#[test]
fn rejected_paths_are_reported() {
    let controller = NavigationController::new(install_tree());
    assert!(matches!(
        controller.set_path("   "),
        Err(NavigationError::InvalidPath(_))
    ));
    assert!(matches!(
        controller.set_path("/games/arena2/MAPS.BSA"),
        Err(NavigationError::NotADirectory(_))
    ));
    assert!(controller.current().is_none());
    assert!(controller.history().is_empty());
}

#[test]
fn folder_mode_lists_directories_only() {
    let controller = NavigationController::new(install_tree());
    controller.set_folder_select_mode(true);
    controller.set_path("/games/arena2").unwrap();

    assert_eq!(names(&controller), vec!["saves"]);
    assert_eq!(controller.filter_labels(), vec!["Folders"]);
}
