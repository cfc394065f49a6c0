//! Statement building
//!
//! Identifiers are always quoted for the target dialect and values are always
//! bound as parameters, never spliced into the statement text.

use crate::config::Dialect;

/// Quote an identifier, doubling any embedded quote character
pub fn quote_ident(dialect: Dialect, ident: &str) -> String {
    match dialect {
        Dialect::Postgres => format!("\"{}\"", ident.replace('"', "\"\"")),
        Dialect::MySql => format!("`{}`", ident.replace('`', "``")),
    }
}

/// Bind placeholder for the 1-based parameter `index`
pub fn placeholder(dialect: Dialect, index: usize) -> String {
    match dialect {
        Dialect::Postgres => format!("${index}"),
        Dialect::MySql => "?".to_string(),
    }
}

fn select_list(dialect: Dialect, primary_key: &str, columns: &[String]) -> String {
    std::iter::once(primary_key)
        .chain(columns.iter().map(String::as_str))
        .map(|c| quote_ident(dialect, c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `SELECT COUNT(*) FROM t`
pub fn count_sql(dialect: Dialect, table: &str) -> String {
    format!("SELECT COUNT(*) AS row_count FROM {}", quote_ident(dialect, table))
}

/// Page of rows in key order; binds `(limit, offset)`
pub fn select_page_sql(dialect: Dialect, table: &str, primary_key: &str, columns: &[String]) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {} LIMIT {} OFFSET {}",
        select_list(dialect, primary_key, columns),
        quote_ident(dialect, table),
        quote_ident(dialect, primary_key),
        placeholder(dialect, 1),
        placeholder(dialect, 2)
    )
}

/// First row in key order
pub fn select_sample_sql(dialect: Dialect, table: &str, primary_key: &str, columns: &[String]) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {} LIMIT 1",
        select_list(dialect, primary_key, columns),
        quote_ident(dialect, table),
        quote_ident(dialect, primary_key)
    )
}

/// Keyed update; binds the new column values in order, then the key
pub fn update_sql(dialect: Dialect, table: &str, primary_key: &str, columns: &[String]) -> String {
    let assignments = columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = {}", quote_ident(dialect, c), placeholder(dialect, i + 1)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "UPDATE {} SET {} WHERE {} = {}",
        quote_ident(dialect, table),
        assignments,
        quote_ident(dialect, primary_key),
        placeholder(dialect, columns.len() + 1)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_quote_ident_escapes() {
        assert_eq!(quote_ident(Dialect::Postgres, "users"), "\"users\"");
        assert_eq!(quote_ident(Dialect::Postgres, "we\"ird"), "\"we\"\"ird\"");
        assert_eq!(quote_ident(Dialect::MySql, "users"), "`users`");
        assert_eq!(quote_ident(Dialect::MySql, "we`ird"), "`we``ird`");
    }

    #[test]
    fn test_select_page_postgres() {
        let sql = select_page_sql(Dialect::Postgres, "users", "id", &cols(&["email", "phone"]));
        assert_eq!(
            sql,
            r#"SELECT "id", "email", "phone" FROM "users" ORDER BY "id" LIMIT $1 OFFSET $2"#
        );
    }

    #[test]
    fn test_select_page_mysql() {
        let sql = select_page_sql(Dialect::MySql, "users", "id", &cols(&["email"]));
        assert_eq!(
            sql,
            "SELECT `id`, `email` FROM `users` ORDER BY `id` LIMIT ? OFFSET ?"
        );
    }

    #[test]
    fn test_update_postgres() {
        let sql = update_sql(Dialect::Postgres, "users", "id", &cols(&["email", "password"]));
        assert_eq!(
            sql,
            r#"UPDATE "users" SET "email" = $1, "password" = $2 WHERE "id" = $3"#
        );
    }

    #[test]
    fn test_update_mysql() {
        let sql = update_sql(Dialect::MySql, "orders", "order_id", &cols(&["shipping_address"]));
        assert_eq!(
            sql,
            "UPDATE `orders` SET `shipping_address` = ? WHERE `order_id` = ?"
        );
    }

    #[test]
    fn test_count_and_sample() {
        assert_eq!(
            count_sql(Dialect::Postgres, "users"),
            r#"SELECT COUNT(*) AS row_count FROM "users""#
        );
        assert_eq!(
            select_sample_sql(Dialect::MySql, "users", "id", &cols(&["email"])),
            "SELECT `id`, `email` FROM `users` ORDER BY `id` LIMIT 1"
        );
    }
}
