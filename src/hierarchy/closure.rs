//! Closure-table maintenance for the deck forest.
//!
//! All functions take a plain `&Connection` so they compose inside a single
//! caller-owned transaction; none of them commits on its own.

use std::collections::{BTreeMap, BTreeSet};

use rusqlite::{named_params, Connection, OptionalExtension};

use super::models::{ClosureEdge, DeckNode, DeckUpdate, HierarchySnapshot};
use crate::error::{Result, StoreError};
use crate::ids::DeckId;

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StoreError::constraint("deck name must not be empty"));
    }
    Ok(())
}

fn read_deck(row: &rusqlite::Row<'_>) -> rusqlite::Result<DeckNode> {
    Ok(DeckNode {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

fn collect_ids(conn: &Connection, sql: &str, node: DeckId) -> Result<Vec<DeckId>> {
    let mut stmt = conn.prepare(sql)?;
    let ids = stmt
        .query_map(named_params! { ":node": node }, |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<DeckId>>>()?;
    Ok(ids)
}

// ==================== Nodes ====================

/// Insert a deck and its `(id, id, 0)` self edge
pub fn insert_deck(conn: &Connection, name: &str, description: &str) -> Result<DeckId> {
    validate_name(name)?;

    conn.execute(
        "INSERT INTO decks (name, description) VALUES (:name, :description)",
        named_params! { ":name": name, ":description": description },
    )?;
    let id = DeckId(conn.last_insert_rowid());

    conn.execute(
        "INSERT OR IGNORE INTO deck_closure (ancestor, descendant, depth) VALUES (:id, :id, 0)",
        named_params! { ":id": id },
    )?;

    Ok(id)
}

pub fn get_deck(conn: &Connection, id: DeckId) -> Result<DeckNode> {
    conn.query_row(
        "SELECT deck_id, name, description FROM decks WHERE deck_id = :id",
        named_params! { ":id": id },
        read_deck,
    )
    .optional()?
    .ok_or(StoreError::DeckNotFound(id))
}

pub fn deck_exists(conn: &Connection, id: DeckId) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM decks WHERE deck_id = :id)",
        named_params! { ":id": id },
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn require_deck(conn: &Connection, id: DeckId) -> Result<()> {
    if deck_exists(conn, id)? {
        Ok(())
    } else {
        Err(StoreError::DeckNotFound(id))
    }
}

pub fn list_decks(conn: &Connection) -> Result<Vec<DeckNode>> {
    let mut stmt = conn.prepare("SELECT deck_id, name, description FROM decks ORDER BY deck_id")?;
    let decks = stmt
        .query_map([], read_deck)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(decks)
}

/// Decks without a parent, in id order
pub fn roots(conn: &Connection) -> Result<Vec<DeckNode>> {
    let mut stmt = conn.prepare(
        "SELECT d.deck_id, d.name, d.description
         FROM decks AS d
         WHERE NOT EXISTS (
             SELECT 1 FROM deck_closure AS dc
             WHERE dc.descendant = d.deck_id AND dc.depth = 1
         )
         ORDER BY d.deck_id",
    )?;
    let decks = stmt
        .query_map([], read_deck)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(decks)
}

pub fn update_deck(conn: &Connection, id: DeckId, update: &DeckUpdate) -> Result<DeckNode> {
    if update.is_empty() {
        return Err(StoreError::constraint("deck update has no fields"));
    }
    if let Some(name) = &update.name {
        validate_name(name)?;
    }
    require_deck(conn, id)?;

    conn.execute(
        "UPDATE decks
         SET name = COALESCE(:name, name),
             description = COALESCE(:description, description)
         WHERE deck_id = :id",
        named_params! {
            ":id": id,
            ":name": update.name,
            ":description": update.description,
        },
    )?;

    get_deck(conn, id)
}

/// Delete a deck together with every deck beneath it.
///
/// Cards in those decks go with them, and foreign-key cascades remove their
/// scores, history, stash memberships and pinned picks. Returns the removed
/// deck ids, the requested deck first.
pub fn delete_subtree(conn: &Connection, id: DeckId) -> Result<Vec<DeckId>> {
    require_deck(conn, id)?;

    let mut doomed = vec![id];
    doomed.extend(descendants(conn, id)?);

    for deck in &doomed {
        conn.execute(
            "DELETE FROM decks WHERE deck_id = :id",
            named_params! { ":id": deck },
        )?;
    }

    Ok(doomed)
}

// ==================== Queries ====================

/// Ancestors ordered farthest to nearest, excluding the node itself
pub fn ancestors(conn: &Connection, node: DeckId) -> Result<Vec<DeckId>> {
    require_deck(conn, node)?;
    collect_ids(
        conn,
        "SELECT ancestor FROM deck_closure
         WHERE descendant = :node AND depth > 0
         ORDER BY depth DESC",
        node,
    )
}

/// Direct children in id order
pub fn children(conn: &Connection, node: DeckId) -> Result<Vec<DeckId>> {
    require_deck(conn, node)?;
    collect_ids(
        conn,
        "SELECT descendant FROM deck_closure
         WHERE ancestor = :node AND depth = 1
         ORDER BY descendant",
        node,
    )
}

/// Every deck strictly below `node`, nearest first
pub fn descendants(conn: &Connection, node: DeckId) -> Result<Vec<DeckId>> {
    require_deck(conn, node)?;
    collect_ids(
        conn,
        "SELECT descendant FROM deck_closure
         WHERE ancestor = :node AND depth > 0
         ORDER BY depth, descendant",
        node,
    )
}

pub fn parent(conn: &Connection, node: DeckId) -> Result<Option<DeckId>> {
    require_deck(conn, node)?;
    let parent = conn
        .query_row(
            "SELECT ancestor FROM deck_closure WHERE descendant = :node AND depth = 1",
            named_params! { ":node": node },
            |row| row.get(0),
        )
        .optional()?;
    Ok(parent)
}

/// Reachability test. Every node counts as a descendant of itself.
pub fn is_descendant(conn: &Connection, ancestor: DeckId, node: DeckId) -> Result<bool> {
    let reachable = conn.query_row(
        "SELECT EXISTS(
             SELECT 1 FROM deck_closure WHERE ancestor = :ancestor AND descendant = :node
         )",
        named_params! { ":ancestor": ancestor, ":node": node },
        |row| row.get(0),
    )?;
    Ok(reachable)
}

/// Path length between two nodes, if `ancestor` is above (or equal to) `node`
pub fn depth_between(conn: &Connection, ancestor: DeckId, node: DeckId) -> Result<Option<u32>> {
    let depth = conn
        .query_row(
            "SELECT depth FROM deck_closure WHERE ancestor = :ancestor AND descendant = :node",
            named_params! { ":ancestor": ancestor, ":node": node },
            |row| row.get(0),
        )
        .optional()?;
    Ok(depth)
}

// ==================== Structure changes ====================

/// Sever every edge linking the subtree under `child` to the strict
/// ancestors of `child`. Edges inside the subtree are left alone.
fn splice_out(conn: &Connection, child: DeckId) -> Result<usize> {
    let removed = conn.execute(
        "DELETE FROM deck_closure
         WHERE descendant IN (
             SELECT descendant FROM deck_closure WHERE ancestor = :child
         )
         AND ancestor IN (
             SELECT ancestor FROM deck_closure
             WHERE descendant = :child AND ancestor != descendant
         )",
        named_params! { ":child": child },
    )?;
    Ok(removed)
}

/// Link every ancestor-or-self of `parent` to every descendant-or-self of `child`
fn splice_in(conn: &Connection, child: DeckId, parent: DeckId) -> Result<usize> {
    let added = conn.execute(
        "INSERT OR IGNORE INTO deck_closure (ancestor, descendant, depth)
         SELECT p.ancestor, c.descendant, p.depth + c.depth + 1
         FROM deck_closure AS p, deck_closure AS c
         WHERE p.descendant = :parent AND c.ancestor = :child",
        named_params! { ":parent": parent, ":child": child },
    )?;
    Ok(added)
}

/// Make `child` (a root) a direct child of `parent`.
///
/// If `child` already has decks beneath it they come along. Repeating an
/// attach that is already in place writes nothing.
pub fn attach_child(conn: &Connection, parent: DeckId, child: DeckId) -> Result<()> {
    require_deck(conn, parent)?;
    require_deck(conn, child)?;

    if parent == child {
        return Err(StoreError::hierarchy(format!(
            "cannot attach {} under itself",
            child
        )));
    }
    match self::parent(conn, child)? {
        Some(existing) if existing == parent => return Ok(()),
        Some(existing) => {
            return Err(StoreError::hierarchy(format!(
                "{} is already attached under {}",
                child, existing
            )));
        }
        None => {}
    }
    if is_descendant(conn, child, parent)? {
        return Err(StoreError::hierarchy(format!(
            "attaching {} under {} would create a cycle",
            child, parent
        )));
    }

    splice_in(conn, child, parent)?;
    Ok(())
}

/// Relocate `child` and everything under it beneath `new_parent`.
///
/// Returns `false` when `child` already sits directly under `new_parent`.
/// Phase one (detach) completes before phase two (reattach) starts; both
/// run on the caller's transaction.
pub fn move_subtree(conn: &Connection, child: DeckId, new_parent: DeckId) -> Result<bool> {
    require_deck(conn, child)?;
    require_deck(conn, new_parent)?;

    if is_descendant(conn, child, new_parent)? {
        return Err(StoreError::hierarchy(format!(
            "cannot move {} under its own descendant {}",
            child, new_parent
        )));
    }
    if parent(conn, child)? == Some(new_parent) {
        return Ok(false);
    }

    splice_out(conn, child)?;
    splice_in(conn, child, new_parent)?;
    Ok(true)
}

/// Turn `child` into a root, keeping its own subtree intact
pub fn detach_subtree(conn: &Connection, child: DeckId) -> Result<bool> {
    if parent(conn, child)?.is_none() {
        return Ok(false);
    }
    splice_out(conn, child)?;
    Ok(true)
}

// ==================== Export / import ====================

pub fn export_edges(conn: &Connection) -> Result<Vec<ClosureEdge>> {
    let mut stmt = conn.prepare(
        "SELECT ancestor, descendant, depth FROM deck_closure ORDER BY ancestor, descendant",
    )?;
    let edges = stmt
        .query_map([], |row| {
            Ok(ClosureEdge {
                ancestor: row.get(0)?,
                descendant: row.get(1)?,
                depth: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(edges)
}

pub fn export(conn: &Connection) -> Result<HierarchySnapshot> {
    Ok(HierarchySnapshot {
        decks: list_decks(conn)?,
        edges: export_edges(conn)?,
    })
}

/// Load a snapshot into a collection that has no decks yet.
///
/// The snapshot is validated with [`check_forest`] before anything is written.
pub fn import(conn: &Connection, snapshot: &HierarchySnapshot) -> Result<()> {
    check_forest(&snapshot.decks, &snapshot.edges)?;

    let existing: i64 = conn.query_row("SELECT COUNT(1) FROM decks", [], |row| row.get(0))?;
    if existing > 0 {
        return Err(StoreError::constraint(
            "hierarchy import requires a collection without decks",
        ));
    }

    for deck in &snapshot.decks {
        conn.execute(
            "INSERT INTO decks (deck_id, name, description) VALUES (:id, :name, :description)",
            named_params! {
                ":id": deck.id,
                ":name": deck.name,
                ":description": deck.description,
            },
        )?;
    }
    for edge in &snapshot.edges {
        conn.execute(
            "INSERT INTO deck_closure (ancestor, descendant, depth)
             VALUES (:ancestor, :descendant, :depth)",
            named_params! {
                ":ancestor": edge.ancestor,
                ":descendant": edge.descendant,
                ":depth": edge.depth,
            },
        )?;
    }

    Ok(())
}

/// Verify that `edges` is exactly the transitive closure of a forest over `decks`.
///
/// Checks: unique deck ids and non-empty names, edges only between known
/// decks, no duplicate pairs, at most one parent per deck, no cycles, and
/// that every implied ancestor path is present with the right depth and
/// nothing else is.
pub fn check_forest(decks: &[DeckNode], edges: &[ClosureEdge]) -> Result<()> {
    let mut known = BTreeSet::new();
    for deck in decks {
        validate_name(&deck.name)?;
        if !known.insert(deck.id) {
            return Err(StoreError::hierarchy(format!("{} listed twice", deck.id)));
        }
    }

    let mut actual: BTreeMap<(DeckId, DeckId), u32> = BTreeMap::new();
    let mut parents: BTreeMap<DeckId, DeckId> = BTreeMap::new();
    for edge in edges {
        for end in [edge.ancestor, edge.descendant] {
            if !known.contains(&end) {
                return Err(StoreError::hierarchy(format!(
                    "edge references unknown {}",
                    end
                )));
            }
        }
        if actual
            .insert((edge.ancestor, edge.descendant), edge.depth)
            .is_some()
        {
            return Err(StoreError::hierarchy(format!(
                "duplicate edge {} -> {}",
                edge.ancestor, edge.descendant
            )));
        }
        if edge.depth == 1 {
            if let Some(other) = parents.insert(edge.descendant, edge.ancestor) {
                return Err(StoreError::hierarchy(format!(
                    "{} has two parents ({} and {})",
                    edge.descendant, other, edge.ancestor
                )));
            }
        }
    }

    let mut expected: BTreeMap<(DeckId, DeckId), u32> = BTreeMap::new();
    for &node in &known {
        expected.insert((node, node), 0);

        let mut cursor = node;
        let mut depth = 0u32;
        while let Some(&above) = parents.get(&cursor) {
            depth += 1;
            if above == node || depth as usize > known.len() {
                return Err(StoreError::hierarchy(format!("cycle through {}", node)));
            }
            expected.insert((above, node), depth);
            cursor = above;
        }
    }

    if let Some(((a, d), depth)) = expected
        .iter()
        .find(|(key, depth)| actual.get(*key) != Some(*depth))
    {
        return Err(StoreError::hierarchy(format!(
            "missing edge {} -> {} at depth {}",
            a, d, depth
        )));
    }
    if let Some(((a, d), depth)) = actual
        .iter()
        .find(|(key, _)| !expected.contains_key(*key))
    {
        return Err(StoreError::hierarchy(format!(
            "stray edge {} -> {} at depth {}",
            a, d, depth
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store;

    fn deck(conn: &Connection, name: &str) -> DeckId {
        insert_deck(conn, name, "").unwrap()
    }

    /// root -> a -> b -> c, plus root -> d
    fn sample_tree(conn: &Connection) -> [DeckId; 5] {
        let root = deck(conn, "root");
        let a = deck(conn, "a");
        let b = deck(conn, "b");
        let c = deck(conn, "c");
        let d = deck(conn, "d");
        attach_child(conn, root, a).unwrap();
        attach_child(conn, a, b).unwrap();
        attach_child(conn, b, c).unwrap();
        attach_child(conn, root, d).unwrap();
        [root, a, b, c, d]
    }

    fn assert_consistent(conn: &Connection) {
        let snapshot = export(conn).unwrap();
        check_forest(&snapshot.decks, &snapshot.edges).unwrap();
    }

    #[test]
    fn test_new_deck_has_single_self_edge() {
        let conn = store::open_in_memory().unwrap();
        let id = deck(&conn, "Languages");

        let edges = export_edges(&conn).unwrap();
        assert_eq!(
            edges,
            vec![ClosureEdge { ancestor: id, descendant: id, depth: 0 }]
        );
        assert_eq!(parent(&conn, id).unwrap(), None);
    }

    #[test]
    fn test_empty_name_rejected() {
        let conn = store::open_in_memory().unwrap();
        let err = insert_deck(&conn, "   ", "blank").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
        assert!(list_decks(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_attach_extends_parent_ancestry() {
        let conn = store::open_in_memory().unwrap();
        let [root, a, b, c, _] = sample_tree(&conn);

        assert_eq!(ancestors(&conn, c).unwrap(), vec![root, a, b]);
        let mut expected = ancestors(&conn, b).unwrap();
        expected.push(b);
        assert_eq!(ancestors(&conn, c).unwrap(), expected);

        for above in ancestors(&conn, b).unwrap() {
            let to_parent = depth_between(&conn, above, b).unwrap().unwrap();
            let to_child = depth_between(&conn, above, c).unwrap().unwrap();
            assert_eq!(to_child, to_parent + 1);
        }
        assert_consistent(&conn);
    }

    #[test]
    fn test_children_and_parent() {
        let conn = store::open_in_memory().unwrap();
        let [root, a, b, _, d] = sample_tree(&conn);

        assert_eq!(children(&conn, root).unwrap(), vec![a, d]);
        assert_eq!(parent(&conn, b).unwrap(), Some(a));
        assert_eq!(parent(&conn, root).unwrap(), None);
        assert_eq!(roots(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_second_attach_rejected() {
        let conn = store::open_in_memory().unwrap();
        let [root, _, b, _, d] = sample_tree(&conn);
        let before = export_edges(&conn).unwrap();

        let err = attach_child(&conn, d, b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHierarchy);

        let err = attach_child(&conn, root, root).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHierarchy);

        assert_eq!(export_edges(&conn).unwrap(), before);
    }

    #[test]
    fn test_repeated_attach_is_idempotent() {
        let conn = store::open_in_memory().unwrap();
        let [_, a, b, _, _] = sample_tree(&conn);
        let before = export_edges(&conn).unwrap();

        attach_child(&conn, a, b).unwrap();
        attach_child(&conn, a, b).unwrap();

        assert_eq!(parent(&conn, b).unwrap(), Some(a));
        assert_eq!(export_edges(&conn).unwrap(), before);
        assert_consistent(&conn);
    }

    #[test]
    fn test_attach_under_own_descendant_rejected() {
        let conn = store::open_in_memory().unwrap();
        let [root, _, _, c, _] = sample_tree(&conn);

        let err = attach_child(&conn, c, root).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHierarchy);
    }

    #[test]
    fn test_attach_unknown_parent_is_not_found() {
        let conn = store::open_in_memory().unwrap();
        let child = deck(&conn, "orphan");

        let err = attach_child(&conn, DeckId(999), child).unwrap_err();
        assert!(matches!(err, StoreError::DeckNotFound(DeckId(999))));
    }

    #[test]
    fn test_attach_root_with_subtree_carries_descendants() {
        let conn = store::open_in_memory().unwrap();
        let top = deck(&conn, "top");
        let mid = deck(&conn, "mid");
        let leaf = deck(&conn, "leaf");
        attach_child(&conn, mid, leaf).unwrap();

        attach_child(&conn, top, mid).unwrap();

        assert_eq!(ancestors(&conn, leaf).unwrap(), vec![top, mid]);
        assert_eq!(depth_between(&conn, top, leaf).unwrap(), Some(2));
        assert_consistent(&conn);
    }

    #[test]
    fn test_move_subtree_preserves_internal_depths() {
        let conn = store::open_in_memory().unwrap();
        let [root, a, b, c, d] = sample_tree(&conn);

        assert!(move_subtree(&conn, a, d).unwrap());

        assert_eq!(ancestors(&conn, a).unwrap(), vec![root, d]);
        assert_eq!(ancestors(&conn, c).unwrap(), vec![root, d, a, b]);
        assert_eq!(depth_between(&conn, a, b).unwrap(), Some(1));
        assert_eq!(depth_between(&conn, a, c).unwrap(), Some(2));
        assert_eq!(depth_between(&conn, b, c).unwrap(), Some(1));
        assert_eq!(depth_between(&conn, root, c).unwrap(), Some(4));
        assert_eq!(children(&conn, root).unwrap(), vec![d]);
        assert_consistent(&conn);
    }

    #[test]
    fn test_move_into_own_subtree_rejected_without_mutation() {
        let conn = store::open_in_memory().unwrap();
        let [_, a, _, c, _] = sample_tree(&conn);
        let before = export_edges(&conn).unwrap();

        let err = move_subtree(&conn, a, c).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHierarchy);

        let err = move_subtree(&conn, a, a).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHierarchy);

        assert_eq!(export_edges(&conn).unwrap(), before);
    }

    #[test]
    fn test_move_to_current_parent_is_noop() {
        let conn = store::open_in_memory().unwrap();
        let [root, a, ..] = sample_tree(&conn);
        let before = export_edges(&conn).unwrap();

        assert!(!move_subtree(&conn, a, root).unwrap());
        assert_eq!(export_edges(&conn).unwrap(), before);
    }

    #[test]
    fn test_move_between_separate_trees() {
        let conn = store::open_in_memory().unwrap();
        let [root, a, b, c, _] = sample_tree(&conn);
        let other = deck(&conn, "other");

        move_subtree(&conn, b, other).unwrap();

        assert_eq!(ancestors(&conn, c).unwrap(), vec![other, b]);
        assert!(!is_descendant(&conn, root, c).unwrap());
        assert!(!is_descendant(&conn, a, b).unwrap());
        assert_consistent(&conn);
    }

    #[test]
    fn test_detach_subtree_makes_root() {
        let conn = store::open_in_memory().unwrap();
        let [root, a, b, c, d] = sample_tree(&conn);

        assert!(detach_subtree(&conn, b).unwrap());
        assert!(!detach_subtree(&conn, b).unwrap());

        assert_eq!(parent(&conn, b).unwrap(), None);
        assert_eq!(ancestors(&conn, c).unwrap(), vec![b]);
        assert_eq!(descendants(&conn, root).unwrap(), vec![a, d]);
        assert_consistent(&conn);
    }

    #[test]
    fn test_delete_subtree_removes_descendants() {
        let conn = store::open_in_memory().unwrap();
        let [root, a, b, c, d] = sample_tree(&conn);

        let removed = delete_subtree(&conn, a).unwrap();
        assert_eq!(removed, vec![a, b, c]);

        assert!(!deck_exists(&conn, c).unwrap());
        assert_eq!(children(&conn, root).unwrap(), vec![d]);
        assert_consistent(&conn);
    }

    #[test]
    fn test_update_deck_fields() {
        let conn = store::open_in_memory().unwrap();
        let id = deck(&conn, "Old");

        let updated = update_deck(
            &conn,
            id,
            &DeckUpdate {
                description: Some("notes".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.name, "Old");
        assert_eq!(updated.description, "notes");

        let err = update_deck(
            &conn,
            id,
            &DeckUpdate {
                name: Some(String::new()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);

        let err = update_deck(&conn, id, &DeckUpdate::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    }

    #[test]
    fn test_check_forest_rejects_two_parents() {
        let decks: Vec<DeckNode> = (1..=3)
            .map(|i| DeckNode {
                id: DeckId(i),
                name: format!("d{}", i),
                description: String::new(),
            })
            .collect();
        let edge = |a, d, depth| ClosureEdge {
            ancestor: DeckId(a),
            descendant: DeckId(d),
            depth,
        };
        let edges = vec![
            edge(1, 1, 0),
            edge(2, 2, 0),
            edge(3, 3, 0),
            edge(1, 3, 1),
            edge(2, 3, 1),
        ];

        let err = check_forest(&decks, &edges).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHierarchy);
    }

    #[test]
    fn test_check_forest_rejects_missing_self_edge_and_cycles() {
        let decks: Vec<DeckNode> = (1..=2)
            .map(|i| DeckNode {
                id: DeckId(i),
                name: format!("d{}", i),
                description: String::new(),
            })
            .collect();
        let edge = |a, d, depth| ClosureEdge {
            ancestor: DeckId(a),
            descendant: DeckId(d),
            depth,
        };

        assert!(check_forest(&decks, &[edge(1, 1, 0)]).is_err());
        assert!(check_forest(
            &decks,
            &[edge(1, 1, 0), edge(2, 2, 0), edge(1, 2, 1), edge(2, 1, 1)]
        )
        .is_err());
        assert!(check_forest(&decks, &[edge(1, 1, 0), edge(2, 2, 0), edge(1, 2, 2)]).is_err());
        assert!(check_forest(&decks, &[edge(1, 1, 0), edge(2, 2, 0), edge(1, 2, 1)]).is_ok());
    }
}
