use crate::model::{Collection, Info, Item, ItemGroup};

/// Builds a standalone collection named `chunk_name` whose only folder is
/// `group_name` holding `children` in their original order.
///
/// The identifier is left unset; it is injected after serialization by
/// [`crate::rewrite::rewrite_identifier`].
pub fn assemble(chunk_name: &str, group_name: &str, children: &[Item]) -> Collection {
    Collection {
        auth: None,
        info: Info::new(chunk_name),
        item: vec![Item::Group(ItemGroup::new(group_name, children.to_vec()))],
        event: None,
        variable: None,
    }
}

/// Copies collection-level auth, scripts and variables from `source`, and the
/// folder's own description and settings from `group`, into an assembled chunk.
pub fn inherit_settings(collection: &mut Collection, source: &Collection, group: &ItemGroup) {
    collection.auth = source.auth.clone();
    collection.event = source.event.clone();
    collection.variable = source.variable.clone();

    for item in &mut collection.item {
        if let Item::Group(folder) = item {
            folder.description = group.description.clone();
            folder.extra = group.extra.clone();
        }
    }
}
