//! External recipe store (read-only SQLite).
//!
//! One query joins the format table to its localized names; the rows are
//! folded by recipe code into [`Recipe`] entities. The store is an
//! external collaborator: a failure to open or query it aborts the run.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::Connection;

use crate::error::StoreResult;
use crate::models::Recipe;

/// Formats joined to their localized names, ordered by format number then
/// language code.
pub const RECIPES_QUERY: &str = "\
SELECT
    f.Numero,
    f.Actif,
    tf.Langue,
    tf.Nom
FROM Format f
LEFT JOIN TRAD_Format tf
    ON tf.IDFormat = f.IDFormat
ORDER BY f.Numero, tf.Langue;";

/// One row of the recipe query. Everything is nullable: the join is a
/// LEFT JOIN and the store's own data is not validated here.
#[derive(Debug, Clone)]
pub struct RecipeRow {
    pub numero: Option<i64>,
    pub actif: Option<i64>,
    pub langue: Option<i64>,
    pub nom: Option<String>,
}

/// Fetch all recipe rows from the store at `path`.
pub fn fetch_recipe_rows(path: &Path) -> StoreResult<Vec<RecipeRow>> {
    let conn = Connection::open(path)?;
    fetch_from(&conn)
}

fn fetch_from(conn: &Connection) -> StoreResult<Vec<RecipeRow>> {
    let mut stmt = conn.prepare(RECIPES_QUERY)?;
    let rows = stmt.query_map([], |row| {
        Ok(RecipeRow {
            numero: row.get(0)?,
            actif: row.get(1)?,
            langue: row.get(2)?,
            nom: row.get(3)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Fold rows by recipe code.
///
/// Rows with a null code are discarded. The entity for a code is created
/// from its first row: `used` is fixed there (`actif == 1`) and never
/// updated by later rows, names default to `Recipe {code}`. The
/// first-locale name comes from the store's language 0, the second-locale
/// name from the row matching `store_lang`.
pub fn fold_recipes(rows: &[RecipeRow], store_lang: i64) -> Vec<Recipe> {
    let mut recipes: BTreeMap<i64, Recipe> = BTreeMap::new();

    for row in rows {
        let Some(num) = row.numero else {
            continue;
        };

        let recipe = recipes
            .entry(num)
            .or_insert_with(|| Recipe::placeholder(num, row.actif == Some(1)));

        let Some(ref nom) = row.nom else {
            continue;
        };
        if row.langue == Some(0) {
            recipe.name_1 = nom.clone();
        }
        if row.langue == Some(store_lang) {
            recipe.name_2 = nom.clone();
        }
    }

    recipes.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Format (IDFormat INTEGER PRIMARY KEY, Numero INTEGER, Actif INTEGER);
             CREATE TABLE TRAD_Format (IDFormat INTEGER, Langue INTEGER, Nom TEXT);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_fetch_and_fold_worked_example() {
        let conn = seeded_store();
        conn.execute_batch(
            "INSERT INTO Format VALUES (10, 5, 1);
             INSERT INTO TRAD_Format VALUES (10, 0, 'A');
             INSERT INTO TRAD_Format VALUES (10, 3, 'B');",
        )
        .unwrap();

        let rows = fetch_from(&conn).unwrap();
        assert_eq!(rows.len(), 2);

        // actif=0 on the second row must not flip `used`: it was fixed at
        // creation from the first row.
        let mut rows = rows;
        rows[1].actif = Some(0);

        let recipes = fold_recipes(&rows, 3);
        assert_eq!(recipes.len(), 1);
        let recipe = &recipes[0];
        assert_eq!(recipe.num, 5);
        assert_eq!(recipe.name_1, "A");
        assert_eq!(recipe.name_2, "B");
        assert!(recipe.used);
        assert!(recipe.checked);
    }

    #[test]
    fn test_format_without_translation_keeps_placeholders() {
        let conn = seeded_store();
        conn.execute_batch("INSERT INTO Format VALUES (1, 7, 0);").unwrap();

        let rows = fetch_from(&conn).unwrap();
        let recipes = fold_recipes(&rows, 2);

        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name_1, "Recipe 7");
        assert_eq!(recipes[0].name_2, "Recipe 7");
        assert!(!recipes[0].used);
    }

    #[test]
    fn test_null_code_rows_discarded() {
        let rows = vec![RecipeRow {
            numero: None,
            actif: Some(1),
            langue: Some(0),
            nom: Some("orphan".into()),
        }];
        assert!(fold_recipes(&rows, 1).is_empty());
    }

    #[test]
    fn test_store_lang_zero_fills_both_names() {
        let rows = vec![RecipeRow {
            numero: Some(1),
            actif: Some(1),
            langue: Some(0),
            nom: Some("brut".into()),
        }];
        let recipes = fold_recipes(&rows, 0);
        assert_eq!(recipes[0].name_1, "brut");
        assert_eq!(recipes[0].name_2, "brut");
    }

    #[test]
    fn test_recipes_ordered_by_code() {
        let mk = |num: i64| RecipeRow {
            numero: Some(num),
            actif: Some(1),
            langue: None,
            nom: None,
        };
        let recipes = fold_recipes(&[mk(3), mk(1), mk(2)], 1);
        let codes: Vec<i64> = recipes.iter().map(|r| r.num).collect();
        assert_eq!(codes, vec![1, 2, 3]);
    }
}
