//! Query fragments shared by the catalog repositories.

use packline_core::catalog::CatalogError;
use packline_shared::PageWindow;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, DbErr, EntityTrait, QuerySelect, Select};
use uuid::Uuid;

/// `lower(col) = lower(value)`.
pub(crate) fn lower_eq<C: ColumnTrait + 'static>(col: C, value: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).eq(value.to_lowercase())
}

/// Case-insensitive substring match with LIKE metacharacters escaped.
pub(crate) fn contains_ci<C: ColumnTrait + 'static>(col: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Escapes `\`, `%` and `_` for use inside a LIKE pattern.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Applies an optional offset/limit window.
pub(crate) fn windowed<E: EntityTrait>(select: Select<E>, window: Option<PageWindow>) -> Select<E> {
    match window {
        Some(w) => select.offset(w.offset).limit(w.limit),
        None => select,
    }
}

/// Maps a failed update to `NotFound` when the row was missing.
pub(crate) fn update_error(err: DbErr, label: &'static str, id: Uuid) -> CatalogError {
    match err {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => CatalogError::not_found(label, id),
        other => CatalogError::repository(other.to_string()),
    }
}

/// Maps any other database failure.
pub(crate) fn db_error(err: DbErr) -> CatalogError {
    CatalogError::repository(err.to_string())
}

/// Decodes a JSONB array column, treating anything malformed as empty.
pub(crate) fn json_list<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Vec<T> {
    serde_json::from_value(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("box"), "box");
        assert_eq!(escape_like("50%_off"), r"50\%\_off");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
    }

    #[test]
    fn test_json_list_tolerates_garbage() {
        let urls: Vec<String> = json_list(serde_json::json!(["a", "b"]));
        assert_eq!(urls, vec!["a", "b"]);

        let none: Vec<String> = json_list(serde_json::json!({"not": "a list"}));
        assert!(none.is_empty());
    }
}
