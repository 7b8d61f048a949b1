/// Integration tests for worldmap
///
/// Exercises the public entry points end to end: documents on disk split
/// across includes, warning policies, and write/read round trips.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use worldmap_lib::{
    error::MapError,
    io::{Dispatch, FileOpener, IncludingStream, MapReader, TokenStream},
    model::{Fixture, Player, Point, SimpleTerrain, TileType},
    read_map_file, read_map_str, write_map_file,
    warning::{CollectWarnings, DieWarning},
    MapIoConfig, MapSummary,
};

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

const MAIN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<view current_player="1" current_turn="12">
    <map version="2" rows="2" columns="2">
        <include file="players.xml"/>
        <row index="0">
            <tile row="0" column="0" kind="plains">
                <include file="tiles/north.xml"/>
                <hill id="20"/>
            </tile>
        </row>
    </map>
</view>
"#;

const PLAYERS: &str = r#"<player number="1" code_name="Alice"/>"#;

// Relative to tiles/, so this names tiles/deep.xml
const NORTH: &str = r#"<unit owner="1" kind="scouts" name="Eyes" id="7"><include file="deep.xml"/></unit>"#;

const DEEP: &str = r#"<worker name="Jo" id="8"/>"#;

fn build_tree(dir: &Path) {
    write(dir, "main.xml", MAIN);
    write(dir, "players.xml", PLAYERS);
    write(dir, "tiles/north.xml", NORTH);
    write(dir, "tiles/deep.xml", DEEP);
}

// ============================================================================
// Inclusion on disk
// ============================================================================

#[test]
fn test_nested_includes_on_disk() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path());

    let warner = CollectWarnings::new();
    let view = read_map_file(
        dir.path().join("main.xml"),
        Dispatch::shared(),
        &MapIoConfig::default(),
        &warner,
    )
    .expect("map should load");

    assert_eq!(view.current_turn, 12);
    assert_eq!(view.map.players.current(), Some(Player::new(1, "Alice")));

    let tile = view.map.tile(Point::new(0, 0)).unwrap();
    assert_eq!(tile.terrain, TileType::Plains);
    assert_eq!(tile.fixtures.len(), 2);
    match &tile.fixtures[0] {
        Fixture::Unit(unit) => {
            assert_eq!(unit.owner.name, "Alice");
            assert_eq!(unit.members.len(), 1);
            assert_eq!(unit.members[0].name, "Jo");
        }
        other => panic!("Expected unit, got {:?}", other),
    }
    assert_eq!(tile.fixtures[1], Fixture::Hill(SimpleTerrain::new(20)));
    assert!(warner.is_empty(), "{:?}", warner.messages());
}

#[test]
fn test_current_file_follows_includes() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.xml", r#"<map rows="1" columns="1"><include file="b.xml"/></map>"#);
    write(dir.path(), "b.xml", r#"<player number="2" code_name="Bram"/>"#);

    let opener = FileOpener;
    let root = dir.path().join("a.xml");
    let mut stream = IncludingStream::open(&root.to_string_lossy(), &opener).unwrap();

    stream.next_token().unwrap(); // <map>
    assert!(stream.current_file().ends_with("a.xml"));
    stream.next_token().unwrap(); // <player> from b.xml
    assert!(stream.current_file().ends_with("b.xml"));
}

#[test]
fn test_missing_include_names_the_file() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "main.xml",
        r#"<map rows="1" columns="1"><include file="gone.xml"/></map>"#,
    );

    let warner = CollectWarnings::new();
    let result = read_map_file(
        dir.path().join("main.xml"),
        Dispatch::shared(),
        &MapIoConfig::default(),
        &warner,
    );

    match result {
        Err(MapError::Include { file, .. }) => assert!(file.ends_with("gone.xml")),
        other => panic!("Expected include failure, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_include_cycle_on_disk() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.xml", r#"<map rows="1" columns="1"><include file="b.xml"/></map>"#);
    write(dir.path(), "b.xml", r#"<include file="a.xml"/>"#);

    let warner = CollectWarnings::new();
    let result = read_map_file(dir.path().join("a.xml"), Dispatch::shared(), &MapIoConfig::default(), &warner);

    assert!(matches!(result, Err(MapError::IncludeCycle { .. })));
}

#[test]
fn test_include_depth_from_config() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path());
    let config = MapIoConfig {
        max_include_depth: 1,
        ..MapIoConfig::default()
    };

    let warner = CollectWarnings::new();
    let result = read_map_file(dir.path().join("main.xml"), Dispatch::shared(), &config, &warner);

    assert!(matches!(result, Err(MapError::IncludeTooDeep { max: 1, .. })));
}

// ============================================================================
// Warning policies
// ============================================================================

const SLOPPY: &str = r#"<map version="2" rows="1" columns="1">
    <tile row="0" column="0" type="swamp">
        <shrub shrub="reed"/>
    </tile>
</map>"#;

#[test]
fn test_collected_warnings() {
    let warner = CollectWarnings::new();
    let view = read_map_str(SLOPPY, "sloppy.xml", Dispatch::shared(), &MapIoConfig::default(), &warner).unwrap();

    // tile `type`, shrub `shrub`, shrub without id
    assert_eq!(warner.count(), 3);
    assert_eq!(view.map.tile(Point::new(0, 0)).unwrap().terrain, TileType::Swamp);
}

#[test]
fn test_die_policy_fails_the_read() {
    let reader = MapReader::new(Dispatch::shared(), &DieWarning);
    let mut stream = worldmap_lib::io::XmlTokenSource::from_text(SLOPPY, "sloppy.xml");

    let err = reader.read_view(&mut stream).unwrap_err();
    match err {
        MapError::WarningEscalated(inner) => {
            assert!(matches!(*inner, MapError::DeprecatedProperty { line: 2, .. }));
        }
        other => panic!("Expected escalated warning, got {:?}", other),
    }
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_normalized_output_is_stable() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path());
    let config = MapIoConfig::default();
    let warner = CollectWarnings::new();

    let view = read_map_file(dir.path().join("main.xml"), Dispatch::shared(), &config, &warner).unwrap();
    let first = dir.path().join("first.xml");
    write_map_file(&first, &view, Dispatch::shared(), &config).unwrap();

    let reread = read_map_file(&first, Dispatch::shared(), &config, &warner).unwrap();
    let second = dir.path().join("second.xml");
    write_map_file(&second, &reread, Dispatch::shared(), &config).unwrap();

    assert_eq!(reread, view);
    assert_eq!(fs::read_to_string(first).unwrap(), fs::read_to_string(second).unwrap());
}

#[test]
fn test_summary_of_included_map() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path());
    let warner = CollectWarnings::new();
    let view = read_map_file(
        dir.path().join("main.xml"),
        Dispatch::shared(),
        &MapIoConfig::default(),
        &warner,
    )
    .unwrap();

    let summary = MapSummary::from_view(&view);
    assert_eq!(summary.tiles, 1);
    assert_eq!(summary.fixtures.get("Unit"), Some(&1));
    assert_eq!(summary.fixtures.get("Hill"), Some(&1));
}
