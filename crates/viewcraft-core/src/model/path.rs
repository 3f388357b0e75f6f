//! Source path helpers
//!
//! A source path names a connection and a table (or other source) inside it,
//! as `/`-separated segments that are either bare values or `key=value`
//! pairs, e.g. `conn1/tableA` or `connection=pgconn/schema=public/table=orders`.
//! The first segment names the connection and the last names the source.

fn segments(path: &str) -> impl DoubleEndedIterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn segment_value(segment: &str) -> &str {
    segment
        .split_once('=')
        .map(|(_, value)| value)
        .unwrap_or(segment)
}

/// Connection name of a source path
pub fn connection_name(path: &str) -> Option<&str> {
    segments(path).next().map(segment_value)
}

/// Source (table) name of a source path
pub fn source_name(path: &str) -> Option<&str> {
    segments(path).next_back().map(segment_value)
}

/// `[connection] source`
pub fn source_display(path: &str) -> String {
    format!(
        "[{}] {}",
        connection_name(path).unwrap_or_default(),
        source_name(path).unwrap_or_default()
    )
}

/// Canvas label for a source node: `[connection]: source`
pub fn source_label(path: &str) -> String {
    format!(
        "[{}]: {}",
        connection_name(path).unwrap_or_default(),
        source_name(path).unwrap_or_default()
    )
}
