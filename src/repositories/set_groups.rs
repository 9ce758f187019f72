//! Shared storage for "exercise + ordered sets" graphs.
//!
//! Workout templates and workout records store the same shape in parallel
//! tables; this module inserts and eagerly loads either.

use rusqlite::Connection;
use uuid::Uuid;

use crate::models::{FromSqliteRow, GroupInput};

pub(crate) struct GroupTables {
    pub groups: &'static str,
    pub owner_column: &'static str,
    pub items: &'static str,
}

pub(crate) const WORKOUT_SETS: GroupTables = GroupTables {
    groups: "exercise_set_groups",
    owner_column: "workout_id",
    items: "exercise_sets",
};

pub(crate) const RECORD_SETS: GroupTables = GroupTables {
    groups: "exercise_record_groups",
    owner_column: "workout_record_id",
    items: "exercise_records",
};

pub(crate) fn insert_groups(
    conn: &Connection,
    tables: &GroupTables,
    owner_id: &str,
    groups: &[GroupInput],
) -> rusqlite::Result<()> {
    let mut insert_group = conn.prepare(&format!(
        "INSERT INTO {} (id, {}, exercise_id, position) VALUES (?, ?, ?, ?)",
        tables.groups, tables.owner_column
    ))?;
    let mut insert_item = conn.prepare(&format!(
        "INSERT INTO {} (id, group_id, position, reps, weight, time_secs) VALUES (?, ?, ?, ?, ?, ?)",
        tables.items
    ))?;

    for (group_position, group) in groups.iter().enumerate() {
        let group_id = Uuid::new_v4().to_string();
        insert_group.execute(rusqlite::params![
            group_id,
            owner_id,
            group.exercise_id,
            group_position as i64
        ])?;

        for (item_position, values) in group.sets.iter().enumerate() {
            insert_item.execute(rusqlite::params![
                Uuid::new_v4().to_string(),
                group_id,
                item_position as i64,
                values.reps,
                values.weight,
                values.time_secs
            ])?;
        }
    }

    Ok(())
}

pub(crate) fn delete_groups(
    conn: &Connection,
    tables: &GroupTables,
    owner_id: &str,
) -> rusqlite::Result<()> {
    // Items go with their groups through ON DELETE CASCADE.
    conn.execute(
        &format!(
            "DELETE FROM {} WHERE {} = ?",
            tables.groups, tables.owner_column
        ),
        [owner_id],
    )?;
    Ok(())
}

/// Loads the groups of one owner in position order, each with its items.
///
/// Group rows expose `exercise_name` and `exercise_type` from the joined
/// exercise.
pub(crate) fn load_groups<G, I>(
    conn: &Connection,
    tables: &GroupTables,
    owner_id: &str,
) -> rusqlite::Result<Vec<(G, Vec<I>)>>
where
    G: FromSqliteRow,
    I: FromSqliteRow,
{
    let mut group_stmt = conn.prepare_cached(&format!(
        "SELECT g.id, g.exercise_id, g.position, e.name AS exercise_name, e.exercise_type
         FROM {} g
         JOIN exercises e ON g.exercise_id = e.id
         WHERE g.{} = ?
         ORDER BY g.position",
        tables.groups, tables.owner_column
    ))?;
    let rows = group_stmt
        .query_map([owner_id], |row| {
            let id: String = row.get("id")?;
            Ok((id, G::from_row(row)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut item_stmt = conn.prepare_cached(&format!(
        "SELECT id, position, reps, weight, time_secs FROM {} WHERE group_id = ? ORDER BY position",
        tables.items
    ))?;

    let mut groups = Vec::with_capacity(rows.len());
    for (group_id, group) in rows {
        let items = item_stmt
            .query_map([&group_id], I::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        groups.push((group, items));
    }

    Ok(groups)
}

/// Whether any group in `tables` references the exercise.
pub(crate) fn references_exercise(
    conn: &Connection,
    tables: &GroupTables,
    exercise_id: &str,
) -> rusqlite::Result<bool> {
    conn.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE exercise_id = ?)",
            tables.groups
        ),
        [exercise_id],
        |row| row.get(0),
    )
}
