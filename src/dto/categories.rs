use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::categories;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    /// Empty in flat mode and for leaves.
    #[serde(default)]
    pub children: Vec<CategoryDto>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<CategoryDto>,
}

/// Flat projection: every row becomes a DTO with no children attached.
pub fn flat_list(rows: Vec<categories::Model>) -> Vec<CategoryDto> {
    rows.into_iter()
        .map(|row| CategoryDto {
            id: row.id,
            name: row.name,
            parent_id: row.parent_id,
            children: Vec::new(),
        })
        .collect()
}

/// Rooted tree: rows without a parent become roots and children are
/// attached recursively. Each row is consumed at most once, so a corrupted
/// parent chain drops nodes rather than looping.
pub fn build_tree(rows: Vec<categories::Model>) -> Vec<CategoryDto> {
    let mut roots = Vec::new();
    let mut by_parent: HashMap<Uuid, Vec<categories::Model>> = HashMap::new();
    for row in rows {
        match row.parent_id {
            None => roots.push(row),
            Some(parent) => by_parent.entry(parent).or_default().push(row),
        }
    }

    roots
        .into_iter()
        .map(|root| attach(root, &mut by_parent))
        .collect()
}

/// Subtree rooted at `id`, built from the full category list.
pub fn tree_node(id: Uuid, rows: Vec<categories::Model>) -> Option<CategoryDto> {
    let mut target = None;
    let mut by_parent: HashMap<Uuid, Vec<categories::Model>> = HashMap::new();
    for row in rows {
        if row.id == id {
            target = Some(row);
        } else if let Some(parent) = row.parent_id {
            by_parent.entry(parent).or_default().push(row);
        }
    }

    target.map(|root| attach(root, &mut by_parent))
}

fn attach(
    node: categories::Model,
    by_parent: &mut HashMap<Uuid, Vec<categories::Model>>,
) -> CategoryDto {
    let children = by_parent
        .remove(&node.id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| attach(child, by_parent))
        .collect();

    CategoryDto {
        id: node.id,
        name: node.name,
        parent_id: node.parent_id,
        children,
    }
}
