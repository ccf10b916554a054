use crate::*;

fn points(text: &str) -> PointCollection {
    parse_import(text).unwrap().points
}

#[test]
fn permalink_block_takes_preceding_comment() {
    let config = Config::default().with_permalink_base("https://service/");
    let report = ImportParser::new(&config)
        .parse("Big Ben\nhttps://service/?mlat=51.5007&mlon=-0.1246&zoom=15")
        .unwrap();
    assert_eq!(report.points, vec![Point::new(51.5007, -0.1246, "Big Ben")]);
    assert_eq!(report.duplicates, 0);
    assert_eq!(report.skipped_lines, 0);
}

#[test]
fn coordinate_line_takes_following_comment() {
    assert_eq!(
        points("51.5,-0.09\nRiver view"),
        vec![Point::new(51.5, -0.09, "River view")]
    );
}

#[test]
fn coordinate_line_followed_by_url_gets_default_comment() {
    let text = "51.5,-0.09\nhttps://www.openstreetmap.org/?mlat=1&mlon=2&zoom=15";
    assert_eq!(
        points(text),
        vec![
            Point::new(51.5, -0.09, DEFAULT_COMMENT),
            Point::new(1.0, 2.0, DEFAULT_COMMENT),
        ]
    );
    assert_eq!(
        points("  40.7128 , -74.006  "),
        vec![Point::new(40.7128, -74.006, DEFAULT_COMMENT)]
    );
}

#[test]
fn records_flush_without_blank_lines() {
    let text = "\
Big Ben
https://www.openstreetmap.org/?mlat=51.5007&mlon=-0.1246&zoom=15
51.5,-0.09
Café, <nice>
NYC
https://www.openstreetmap.org/?mlat=40.7128&mlon=-74.006&zoom=15";
    assert_eq!(
        points(text),
        vec![
            Point::new(51.5007, -0.1246, "Big Ben"),
            Point::new(51.5, -0.09, "Café   nice"),
            Point::new(40.7128, -74.006, "NYC"),
        ]
    );
}

#[test]
fn pending_comment_is_kept_until_a_location_arrives() {
    let text = "First\nSecond\n\nhttps://www.openstreetmap.org/?mlat=1&mlon=2";
    assert_eq!(points(text), vec![Point::new(1.0, 2.0, "First")]);

    let dangling = parse_import("just a note").unwrap();
    assert!(dangling.points.is_empty());
}

#[test]
fn unrelated_urls_are_ignored() {
    let text = "https://example.com/blog\nHome\nhttps://www.openstreetmap.org/?mlat=1&mlon=2";
    assert_eq!(points(text), vec![Point::new(1.0, 2.0, "Home")]);
}

#[test]
fn unreadable_permalink_is_skipped() {
    let text = "\
Broken
https://www.openstreetmap.org/?mlat=abc&mlon=1&zoom=15
https://www.openstreetmap.org/?mlat=1&mlon=2&zoom=15";
    let report = parse_import(text).unwrap();
    assert_eq!(report.points, vec![Point::new(1.0, 2.0, "Broken")]);
    assert_eq!(report.skipped_lines, 1);
}

#[test]
fn embedded_self_link_contributes_all_its_points() {
    let text = "\
Shared with me: https://weemap.org/#40.7128,-74.006,NYC;48.85837,2.294481,Eiffel%20Tower
weemap.org/#1,2,bare";
    assert_eq!(
        points(text),
        vec![
            Point::new(40.7128, -74.006, "NYC"),
            Point::new(48.85837, 2.294481, "Eiffel Tower"),
            Point::new(1.0, 2.0, "bare"),
        ]
    );
}

#[test]
fn undecodable_self_link_fails_the_whole_import() {
    let text = "\
Big Ben
https://www.openstreetmap.org/?mlat=51.5007&mlon=-0.1246&zoom=15
https://[weemap.org/#1,2,x";
    let err = parse_import(text).unwrap_err();
    assert!(matches!(err, Error::MalformedLink { .. }));
}

#[test]
fn link_like_comments_survive_export_and_import() {
    let ours = vec![
        Point::new(1.0, 2.0, "[weemap.org/#"),
        Point::new(3.0, 4.0, "see weemap.org/#"),
        Point::new(5.0, 6.0, "Big Ben"),
    ];
    let text = export_with_config(&ours, &Config::default());
    let report = parse_import(&text).unwrap();
    assert_eq!(report.points, ours);
    assert_eq!(report.skipped_lines, 0);

    let err = parse_import("http://[weemap.org/#1,2,x").unwrap_err();
    assert!(matches!(err, Error::MalformedLink { .. }));
}

#[test]
fn url_comments_are_dropped_on_import() {
    let ours = vec![Point::new(1.0, 2.0, "http://example.com/page")];
    let text = export_with_config(&ours, &Config::default());
    assert_eq!(points(&text), vec![Point::new(1.0, 2.0, DEFAULT_COMMENT)]);
}

#[test]
fn coordinate_line_followed_by_blank_line_gets_default_comment() {
    let text = "51.5,-0.09

River view
https://www.openstreetmap.org/?mlat=1&mlon=2";
    assert_eq!(
        points(text),
        vec![
            Point::new(51.5, -0.09, DEFAULT_COMMENT),
            Point::new(1.0, 2.0, "River view"),
        ]
    );
}

#[test]
fn self_link_keeps_pending_comment_for_next_permalink() {
    let text = "\
Pending
https://weemap.org/#3,4,linked
https://www.openstreetmap.org/?mlat=1&mlon=2";
    assert_eq!(
        points(text),
        vec![Point::new(3.0, 4.0, "linked"), Point::new(1.0, 2.0, "Pending")]
    );
}

#[test]
fn duplicates_keep_first_seen_comment() {
    let text = "\
51.5,-0.09
first
51.50000001,-0.09
second
https://weemap.org/#51.5,-0.09,third;2,3,new";
    let report = parse_import(text).unwrap();
    assert_eq!(
        report.points,
        vec![Point::new(51.5, -0.09, "first"), Point::new(2.0, 3.0, "new")]
    );
    assert_eq!(report.duplicates, 2);
}

#[test]
fn export_output_imports_back() {
    let ours = vec![
        Point::new(51.5007, -0.1246, "Big Ben"),
        Point::new(40.7128, -74.006, "NYC"),
        Point::new(-33.856784, 151.215297, DEFAULT_COMMENT),
    ];
    let text = export_with_config(&ours, &Config::default());
    assert_eq!(points(&text), ours);
}

#[test]
fn configured_default_comment_applies_to_imports() {
    let config = Config::default().with_default_comment("pin");
    let report = ImportParser::new(&config).parse("1,2").unwrap();
    assert_eq!(report.points[0].comment, "pin");
}
