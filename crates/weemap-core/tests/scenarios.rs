use serde_json::json;
use weemap_core::{
    Config, FileStore, MarkerSession, Point, StateStore, decode_url, export_with_config, merge,
    parse_import,
};

fn fixture_text() -> &'static str {
    "\
Big Ben
https://www.openstreetmap.org/?mlat=51.5007&mlon=-0.1246&zoom=15

51.5,-0.09
River view

Shared: https://weemap.org/#40.7128,-74.006,NYC;51.5007,-0.1246,Elizabeth%20Tower
"
}

#[test]
fn file_backed_session_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.url");

    let mut session = MarkerSession::new(FileStore::new(&path, "https://weemap.org/"));
    let report = session.import(fixture_text()).unwrap();
    assert_eq!(report.points.len(), 3);
    assert_eq!(report.duplicates, 1);
    session.add_point(-33.856784, 151.215297).unwrap();

    let reopened = MarkerSession::new(FileStore::new(&path, "https://weemap.org/"));
    let points = reopened.points().unwrap();
    assert_eq!(
        points,
        vec![
            Point::new(51.5007, -0.1246, "Big Ben"),
            Point::new(51.5, -0.09, "River view"),
            Point::new(40.7128, -74.006, "NYC"),
            Point::new(-33.856784, 151.215297, "wee"),
        ]
    );
    assert_eq!(decode_url(&reopened.store().url().unwrap()), points);
}

#[test]
fn export_then_import_into_another_instance() {
    let config = Config::default();
    let ours = parse_import(fixture_text()).unwrap().points;
    let text = export_with_config(&ours, &config);

    let theirs = vec![Point::new(40.7128, -74.006, "New York")];
    let merged = merge(&theirs, &parse_import(&text).unwrap().points);
    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0].comment, "New York");
    assert_eq!(merge(&merged, &ours), merged);
}

#[test]
fn points_serialize_as_plain_records() {
    let point = Point::new(51.50000049, -0.09, "Tower Bridge");
    assert_eq!(
        serde_json::to_value(&point).unwrap(),
        json!({ "lat": 51.5, "lng": -0.09, "comment": "Tower Bridge" })
    );
}
