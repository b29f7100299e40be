//! Title-based re-ranking on top of the engine's order

use super::models::ResultRecord;

/// How closely a title matches the query; lower sorts first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TitleMatch {
    Exact,
    Prefix,
    Contains,
    None,
}

impl TitleMatch {
    fn of(title: &str, query: &str) -> Self {
        let title = title.to_lowercase();
        if title == query {
            Self::Exact
        } else if title.starts_with(query) {
            Self::Prefix
        } else if title.contains(query) {
            Self::Contains
        } else {
            Self::None
        }
    }
}

/// Re-order `records` so exact title matches come first, then titles that
/// start with the query, then titles containing it. Comparison is
/// case-insensitive and the sort is stable, so engine order breaks ties.
pub fn rank(query: &str, mut records: Vec<ResultRecord>) -> Vec<ResultRecord> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return records;
    }

    records.sort_by_cached_key(|record| TitleMatch::of(&record.title, &query));
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(titles: &[&str]) -> Vec<ResultRecord> {
        titles
            .iter()
            .map(|t| ResultRecord::new(format!("/{}.htm", t), *t))
            .collect()
    }

    fn titles(records: &[ResultRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_tiers() {
        let ranked = rank("wall", titled(&["IfcWall", "Wall Widget", "wall"]));
        assert_eq!(titles(&ranked), vec!["wall", "Wall Widget", "IfcWall"]);
    }

    #[test]
    fn test_engine_order_breaks_ties() {
        let ranked = rank(
            "wall",
            titled(&["Slab", "IfcWallType", "Beam", "IfcWall", "WallStandardCase", "Wallpaper"]),
        );
        assert_eq!(
            titles(&ranked),
            vec!["WallStandardCase", "Wallpaper", "IfcWallType", "IfcWall", "Slab", "Beam"]
        );
    }

    #[test]
    fn test_query_case_is_ignored() {
        let ranked = rank("  IFCWALL ", titled(&["IfcWallType", "ifcwall"]));
        assert_eq!(titles(&ranked), vec!["ifcwall", "IfcWallType"]);
    }

    #[test]
    fn test_no_matches_keep_order() {
        let input = titled(&["Column", "Beam", "Slab"]);
        assert_eq!(rank("wall", input.clone()), input);
    }
}
