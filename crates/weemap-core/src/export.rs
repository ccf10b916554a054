use crate::config::Config;
use crate::permalink::PermalinkFormat;
use crate::point::Point;

/// Renders `comment\npermalink` blocks separated by a blank line. The output is valid input
/// for [`crate::import::ImportParser`].
pub fn format_export(points: &[Point], permalinks: &PermalinkFormat) -> String {
    points
        .iter()
        .map(|point| {
            format!(
                "{}\n{}",
                point.comment,
                permalinks.build(point.lat, point.lng)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn export_with_config(points: &[Point], config: &Config) -> String {
    format_export(points, &PermalinkFormat::from_config(config))
}
