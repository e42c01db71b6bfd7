/// Output name for chunk `index` of the folder `parent`.
///
/// The first chunk keeps the folder name as-is, so a folder that fits in one
/// chunk produces the same file name it always did.
pub fn chunk_name(parent: &str, index: usize) -> String {
    if index == 0 {
        parent.to_string()
    } else {
        format!("{}-{}", parent, index)
    }
}
