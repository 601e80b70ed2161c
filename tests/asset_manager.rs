use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use aegis::{
    ArtifactLocator, AssetManager, CleanPlan, MediaTreeLocator, ProjectConfig, PublishOutcome,
    WarehouseListing,
};

fn write_render(path: &Path, contents: &str, age_secs: u64) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
    let mtime = SystemTime::now() - Duration::from_secs(age_secs);
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(mtime)
        .unwrap();
}

fn project() -> (tempfile::TempDir, ProjectConfig) {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = ProjectConfig::anchored(tmp.path());
    (tmp, cfg)
}

fn videos(cfg: &ProjectConfig) -> PathBuf {
    cfg.artifact_root()
}

#[test]
fn publish_copies_newest_match() {
    let (_tmp, cfg) = project();
    let root = videos(&cfg);
    write_render(&root.join("economics_static/480p15/SupplyDemandScene.mp4"), "old", 300);
    write_render(&root.join("economics_v2/480p15/SupplyDemandScene.mp4"), "new", 10);
    write_render(&root.join("economics_v3/480p15/SupplyDemandScene.mp4"), "mid", 100);

    let manager = AssetManager::from_config(&cfg);
    let PublishOutcome::Published(receipt) = manager.publish("SupplyDemandScene", None).unwrap()
    else {
        panic!("expected a publish");
    };

    assert_eq!(
        receipt.source,
        root.join("economics_v2/480p15/SupplyDemandScene.mp4")
    );
    assert_eq!(
        receipt.destination,
        cfg.warehouse_dir().join("SupplyDemandScene.mp4")
    );
    assert!(receipt.created_warehouse);
    assert_eq!(fs::read_to_string(&receipt.destination).unwrap(), "new");
}

#[test]
fn publish_preserves_modification_time() {
    let (_tmp, cfg) = project();
    let src = videos(&cfg).join("s/480p15/Clip.mp4");
    write_render(&src, "data", 3600);

    let manager = AssetManager::from_config(&cfg);
    let PublishOutcome::Published(receipt) = manager.publish("Clip", None).unwrap() else {
        panic!("expected a publish");
    };

    let src_mtime = fs::metadata(&src).unwrap().modified().unwrap();
    let dst_mtime = fs::metadata(&receipt.destination)
        .unwrap()
        .modified()
        .unwrap();
    assert_eq!(src_mtime, dst_mtime);
    assert_eq!(receipt.bytes, 4);
}

#[test]
fn publish_with_rename_keeps_extension() {
    let (_tmp, cfg) = project();
    write_render(&videos(&cfg).join("x/720p30/Orbit.mov"), "mov", 5);

    let manager = AssetManager::from_config(&cfg);
    let PublishOutcome::Published(receipt) = manager.publish("Orbit", Some("lesson_03")).unwrap()
    else {
        panic!("expected a publish");
    };
    assert_eq!(receipt.destination, cfg.warehouse_dir().join("lesson_03.mov"));
    assert!(receipt.destination.is_file());
}

#[test]
fn republish_overwrites_existing_entry() {
    let (_tmp, cfg) = project();
    let src = videos(&cfg).join("x/480p15/Scene.mp4");
    write_render(&src, "first", 50);

    let manager = AssetManager::from_config(&cfg);
    manager.publish("Scene", Some("final")).unwrap();

    write_render(&src, "second", 1);
    let PublishOutcome::Published(receipt) = manager.publish("Scene", Some("final")).unwrap()
    else {
        panic!("expected a publish");
    };
    assert!(!receipt.created_warehouse);
    assert_eq!(fs::read_to_string(receipt.destination).unwrap(), "second");
}

#[test]
fn partial_files_and_other_names_are_not_found() {
    let (_tmp, cfg) = project();
    let root = videos(&cfg);
    write_render(
        &root.join("x/480p15/partial_movie_files/Scene/Scene.mp4"),
        "partial",
        1,
    );
    write_render(&root.join("x/480p15/OtherScene.mp4"), "other", 1);
    write_render(&root.join("x/480p15/Scene.png"), "still", 1);

    let manager = AssetManager::from_config(&cfg);
    let outcome = manager.publish("Scene", None).unwrap();
    assert_eq!(
        outcome,
        PublishOutcome::NotFound {
            scene: "Scene".to_string(),
            searched: root,
        }
    );
    assert!(!cfg.warehouse_dir().exists());
}

#[test]
fn missing_media_tree_is_not_found() {
    let (_tmp, cfg) = project();
    let manager = AssetManager::from_config(&cfg);
    assert!(matches!(
        manager.publish("Anything", None).unwrap(),
        PublishOutcome::NotFound { .. }
    ));
    assert!(!cfg.warehouse_dir().exists());
}

#[test]
fn locator_orders_candidates_newest_first() {
    let (_tmp, cfg) = project();
    let root = videos(&cfg);
    write_render(&root.join("a/S.mp4"), "a", 30);
    write_render(&root.join("b/S.webm"), "b", 10);
    write_render(&root.join("c/S.mp4"), "c", 20);

    let found = MediaTreeLocator::from_config(&cfg).find("S").unwrap();
    let order: Vec<_> = found
        .iter()
        .map(|a| a.path.strip_prefix(&root).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        order,
        vec![
            PathBuf::from("b/S.webm"),
            PathBuf::from("c/S.mp4"),
            PathBuf::from("a/S.mp4"),
        ]
    );
}

#[test]
fn list_distinguishes_missing_empty_and_populated() {
    let (_tmp, cfg) = project();
    let manager = AssetManager::from_config(&cfg);
    assert_eq!(manager.list().unwrap(), WarehouseListing::Missing);

    let wh = cfg.warehouse_dir();
    fs::create_dir_all(&wh).unwrap();
    assert_eq!(manager.list().unwrap(), WarehouseListing::Empty);

    fs::write(wh.join(".DS_Store"), "").unwrap();
    assert_eq!(manager.list().unwrap(), WarehouseListing::Empty);

    fs::write(wh.join("b.mp4"), "").unwrap();
    fs::write(wh.join("a.mp4"), "").unwrap();
    assert_eq!(
        manager.list().unwrap(),
        WarehouseListing::Entries(vec!["a.mp4".to_string(), "b.mp4".to_string()])
    );
}

#[test]
fn clean_plan_is_pure_until_committed() {
    let (_tmp, cfg) = project();
    let manager = AssetManager::from_config(&cfg);
    assert_eq!(manager.plan_clean().unwrap(), CleanPlan::NothingToDo);

    write_render(&videos(&cfg).join("x/480p15/A.mp4"), "12345", 1);
    write_render(
        &cfg.media_dir().join("images/x/frame.png"),
        "1234567890",
        1,
    );

    let plan = manager.plan_clean().unwrap();
    assert_eq!(
        plan,
        CleanPlan::Pending {
            root: cfg.media_dir(),
            total_bytes: 15,
            file_count: 2,
        }
    );
    assert!(cfg.media_dir().exists());

    let report = plan.commit().unwrap().unwrap();
    assert_eq!(report.freed_bytes, 15);
    assert!(!cfg.media_dir().exists());
    assert_eq!(manager.plan_clean().unwrap(), CleanPlan::NothingToDo);
}
