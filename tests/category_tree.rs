use bookstore_api::dto::categories::{build_tree, flat_list, tree_node};
use bookstore_api::entity::categories::Model;
use uuid::Uuid;

fn category(name: &str, parent_id: Option<Uuid>) -> Model {
    Model {
        id: Uuid::new_v4(),
        name: name.to_string(),
        parent_id,
    }
}

#[test]
fn tree_mode_nests_children_under_roots() {
    let books = category("Books", None);
    let fiction = category("Fiction", Some(books.id));
    let technical = category("Technical", Some(books.id));

    let tree = build_tree(vec![fiction.clone(), books.clone(), technical.clone()]);

    assert_eq!(tree.len(), 1);
    let root = &tree[0];
    assert_eq!(root.id, books.id);
    assert_eq!(root.children.len(), 2);
    assert!(root.children.iter().all(|c| c.parent_id == Some(books.id)));
}

#[test]
fn tree_mode_attaches_grandchildren() {
    let books = category("Books", None);
    let fiction = category("Fiction", Some(books.id));
    let fantasy = category("Fantasy", Some(fiction.id));

    let tree = build_tree(vec![fantasy.clone(), fiction.clone(), books.clone()]);

    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].children.len(), 1);
    assert_eq!(tree[0].children[0].children.len(), 1);
    assert_eq!(tree[0].children[0].children[0].id, fantasy.id);
}

#[test]
fn several_roots_stay_separate() {
    let books = category("Books", None);
    let media = category("Media", None);
    let fiction = category("Fiction", Some(books.id));

    let tree = build_tree(vec![books.clone(), media.clone(), fiction]);

    assert_eq!(tree.len(), 2);
}

#[test]
fn flat_mode_returns_all_nodes_unnested() {
    let books = category("Books", None);
    let fiction = category("Fiction", Some(books.id));
    let technical = category("Technical", Some(books.id));

    let flat = flat_list(vec![books, fiction, technical]);

    assert_eq!(flat.len(), 3);
    assert!(flat.iter().all(|c| c.children.is_empty()));
}

#[test]
fn tree_node_builds_the_requested_subtree() {
    let books = category("Books", None);
    let fiction = category("Fiction", Some(books.id));
    let fantasy = category("Fantasy", Some(fiction.id));

    let rows = vec![books.clone(), fiction.clone(), fantasy.clone()];
    let node = tree_node(fiction.id, rows).expect("fiction subtree");

    assert_eq!(node.id, fiction.id);
    assert_eq!(node.parent_id, Some(books.id));
    assert_eq!(node.children.len(), 1);
    assert_eq!(node.children[0].id, fantasy.id);
}

#[test]
fn tree_node_is_none_for_unknown_id() {
    let books = category("Books", None);
    assert!(tree_node(Uuid::new_v4(), vec![books]).is_none());
}
