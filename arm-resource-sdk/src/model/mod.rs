pub mod resource_identifier;
pub mod resource_type;


/// Splits on `/`, dropping empty segments so `//` and a trailing `/` are ignored.
pub(crate) fn split_segments(value: &str) -> Vec<&str> {
    value.split('/').filter(|s| !s.is_empty()).collect()
}
